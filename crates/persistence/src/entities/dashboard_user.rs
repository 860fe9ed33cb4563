//! Dashboard account entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of `dashboard_users`.
#[derive(Debug, Clone, FromRow)]
pub struct DashboardUserEntity {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    #[sqlx(rename = "type")]
    pub user_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DashboardUserEntity> for domain::models::DashboardUser {
    fn from(entity: DashboardUserEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            password_hash: entity.password_hash,
            user_type: entity.user_type,
            status: entity.status,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
