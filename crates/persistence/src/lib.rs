//! Persistence layer for the activity dashboard backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Report filter to SQL predicate translation
//! - Repository implementations

pub mod db;
pub mod entities;
pub mod filter;
pub mod repositories;
