//! Domain layer for the activity dashboard backend.
//!
//! This crate contains:
//! - Report filter types (date range, shift, user, timezone)
//! - Derived metrics (activity levels, targets, late starts)
//! - Request/response models for the REST API
//! - Domain error types

pub mod errors;
pub mod models;
