//! Shared utilities for the activity dashboard backend.
//!
//! This crate provides functionality used across the other crates:
//! - Duration and percentage formatting for report payloads
//! - Password hashing with Argon2id for dashboard accounts
//! - Common validation logic for request bodies

pub mod duration;
pub mod password;
pub mod validation;
