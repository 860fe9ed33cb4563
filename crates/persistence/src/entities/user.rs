//! Monitored user entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of `users` joined with its usertype name.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: String,
    pub usertype_id: Option<i64>,
    pub usertype: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            phone: entity.phone,
            status: entity.status,
            usertype_id: entity.usertype_id,
            usertype: entity.usertype,
            created_at: entity.created_at,
        }
    }
}

/// Row of `usertypes`.
#[derive(Debug, Clone, FromRow)]
pub struct UserTypeEntity {
    pub id: i64,
    pub name: String,
}

impl From<UserTypeEntity> for domain::models::UserType {
    fn from(entity: UserTypeEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }
}
