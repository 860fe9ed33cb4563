//! Monitored user domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A person whose work sessions are tracked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: String,
    pub usertype_id: Option<i64>,
    pub usertype: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// Category of monitored user (e.g. "Agent", "Supervisor").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserType {
    pub id: i64,
    pub name: String,
}

/// Query parameters for `GET /api/users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    pub status: Option<String>,
}

/// Request body for `POST /api/users`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    #[validate(custom(function = "shared::validation::validate_status"))]
    pub status: Option<String>,

    pub usertype_id: Option<i64>,
}

/// Request body for `PUT /api/users/:id`. Missing fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    #[validate(custom(function = "shared::validation::validate_status"))]
    pub status: Option<String>,

    pub usertype_id: Option<i64>,
}

/// Request body for `POST /api/usertypes`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserTypeRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}
