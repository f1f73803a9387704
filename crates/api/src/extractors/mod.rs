//! Custom Axum extractors.

pub mod json;
pub mod path;
pub mod session;

pub use json::JsonBody;
pub use path::PathParam;
pub use session::{CurrentUser, SessionContext};
