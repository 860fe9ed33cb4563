//! Dashboard operator accounts and login models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An account allowed to sign in to the dashboard.
///
/// Distinct from [`super::User`], which is a monitored person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardUser {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(rename = "type")]
    pub user_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DashboardUser {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// Request body for `POST /api/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response of a successful login. The frontend keeps it until `expires_at`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub user: DashboardUser,
    pub expires_at: DateTime<Utc>,
}

/// Request body for `POST /api/dashboard-users`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDashboardUserRequest {
    #[validate(custom(function = "shared::validation::validate_username"))]
    pub username: String,

    #[validate(custom(function = "shared::validation::validate_password"))]
    pub password: String,

    #[serde(rename = "type")]
    #[validate(custom(function = "shared::validation::validate_dashboard_user_type"))]
    pub user_type: Option<String>,

    #[validate(custom(function = "shared::validation::validate_status"))]
    pub status: Option<String>,
}

/// Request body for `PUT /api/dashboard-users/:id`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDashboardUserRequest {
    #[validate(custom(function = "shared::validation::validate_username"))]
    pub username: Option<String>,

    #[serde(rename = "type")]
    #[validate(custom(function = "shared::validation::validate_dashboard_user_type"))]
    pub user_type: Option<String>,

    #[validate(custom(function = "shared::validation::validate_status"))]
    pub status: Option<String>,
}

/// Request body for `PUT /api/dashboard-users/:id/password`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(custom(function = "shared::validation::validate_password"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = DashboardUser {
            id: 1,
            username: "admin".into(),
            password_hash: "$argon2id$secret".into(),
            user_type: "admin".into(),
            status: "active".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["type"], "admin");
    }

    #[test]
    fn test_create_request_validation() {
        let request: CreateDashboardUserRequest = serde_json::from_value(serde_json::json!({
            "username": "ops",
            "password": "short",
            "type": "superuser"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
        assert!(errors.field_errors().contains_key("user_type"));
    }

    #[test]
    fn test_login_request_requires_fields() {
        let request = LoginRequest {
            username: "".into(),
            password: "".into(),
        };
        assert!(request.validate().is_err());
    }
}
