//! Agent mapping entities.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use shared::duration::format_duration;

/// Row of `device_mappings` joined with the user's name.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceMappingEntity {
    pub id: i64,
    pub device_id: String,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DeviceMappingEntity> for domain::models::DeviceMapping {
    fn from(entity: DeviceMappingEntity) -> Self {
        Self {
            id: entity.id,
            device_id: entity.device_id,
            user_id: entity.user_id,
            user_name: entity.user_name,
            created_at: entity.created_at,
        }
    }
}

/// Row of `windows_username_mappings` joined with the user's name.
#[derive(Debug, Clone, FromRow)]
pub struct WindowsUsernameMappingEntity {
    pub id: i64,
    pub windows_username: String,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<WindowsUsernameMappingEntity> for domain::models::WindowsUsernameMapping {
    fn from(entity: WindowsUsernameMappingEntity) -> Self {
        Self {
            id: entity.id,
            windows_username: entity.windows_username,
            user_id: entity.user_id,
            user_name: entity.user_name,
            created_at: entity.created_at,
        }
    }
}

/// Row of `unregistered_sessions`.
#[derive(Debug, Clone, FromRow)]
pub struct UnregisteredSessionEntity {
    pub id: i64,
    pub device_id: Option<String>,
    pub windows_username: Option<String>,
    pub hostname: Option<String>,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub total_time: i64,
}

impl From<UnregisteredSessionEntity> for domain::models::UnregisteredSession {
    fn from(entity: UnregisteredSessionEntity) -> Self {
        Self {
            id: entity.id,
            device_id: entity.device_id,
            windows_username: entity.windows_username,
            hostname: entity.hostname,
            first_seen: entity.first_seen,
            last_seen: entity.last_seen,
            total_time_formatted: format_duration(entity.total_time),
            total_time: entity.total_time,
        }
    }
}
