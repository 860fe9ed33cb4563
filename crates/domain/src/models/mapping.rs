//! Monitoring agent to user mappings.
//!
//! Agents identify themselves by a device id and/or the OS username they run
//! under. Until one of those is mapped to a registered user, their sessions
//! are parked as unregistered sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Links an agent's device id to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceMapping {
    pub id: i64,
    pub device_id: String,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Links a Windows account name to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowsUsernameMapping {
    pub id: i64,
    pub windows_username: String,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An agent that reported activity but is not mapped to any user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnregisteredSession {
    pub id: i64,
    pub device_id: Option<String>,
    pub windows_username: Option<String>,
    pub hostname: Option<String>,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub total_time: i64,
    pub total_time_formatted: String,
}

impl UnregisteredSession {
    /// Whether the agent sent anything that can be mapped.
    pub fn has_identity(&self) -> bool {
        self.device_id.as_deref().is_some_and(|s| !s.is_empty())
            || self.windows_username.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Request body for `POST /api/device-mappings`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDeviceMappingRequest {
    #[validate(length(min = 1, max = 255, message = "Device id must be 1-255 characters"))]
    pub device_id: String,
    pub user_id: i64,
}

/// Request body for `POST /api/windows-username-mappings`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWindowsUsernameMappingRequest {
    #[validate(length(min = 1, max = 255, message = "Windows username must be 1-255 characters"))]
    pub windows_username: String,
    pub user_id: i64,
}

/// Request body for `POST /api/register-user-from-session`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUserFromSessionRequest {
    pub session_id: i64,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    pub usertype_id: Option<i64>,
}

/// Request body for `POST /api/map-user-to-session`.
#[derive(Debug, Clone, Deserialize)]
pub struct MapUserToSessionRequest {
    pub session_id: i64,
    pub user_id: i64,
}

/// Result of resolving an unregistered session to a user.
#[derive(Debug, Clone, Serialize)]
pub struct SessionMappingResult {
    pub user_id: i64,
    pub device_mapping: Option<DeviceMapping>,
    pub windows_username_mapping: Option<WindowsUsernameMapping>,
}
