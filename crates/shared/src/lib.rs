//! Shared utilities and common types for the Nightout backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (token generation, hashing)
//! - Great-circle distance calculation
//! - Common validation logic

pub mod crypto;
pub mod geo;
pub mod validation;
