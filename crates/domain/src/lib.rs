//! Domain layer for the Nightout backend.
//!
//! This crate contains:
//! - Domain models (User, Event, Invitation, Message, Notification, Place)
//! - Business logic services (event lifecycle, RSVP, messaging, places search)
//! - Store and notification traits implemented by outer layers

pub mod models;
pub mod services;
