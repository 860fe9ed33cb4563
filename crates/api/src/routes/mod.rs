//! HTTP route handlers.

pub mod auth;
pub mod dashboard;
pub mod dashboard_users;
pub mod health;
pub mod mappings;
pub mod shifts;
pub mod summary;
pub mod timeline;
pub mod users;
pub mod usertypes;
