//! Monitored user and usertype repository.

use sqlx::PgPool;

use crate::entities::{UserEntity, UserTypeEntity};

const USER_COLUMNS: &str = r#"
    u.id, u.name, u.email, u.phone, u.status, u.usertype_id,
    t.name AS usertype, u.created_at
"#;

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub status: &'a str,
    pub usertype_id: Option<i64>,
}

/// Partial update of a user. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub status: Option<&'a str>,
    pub usertype_id: Option<i64>,
}

/// Repository for `users` and `usertypes`.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List users, optionally by status, ordered by name.
    pub async fn list(&self, status: Option<&str>) -> Result<Vec<UserEntity>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM users u LEFT JOIN usertypes t ON t.id = u.usertype_id \
             WHERE ($1::TEXT IS NULL OR u.status = $1) ORDER BY u.name, u.id",
            USER_COLUMNS
        );
        sqlx::query_as::<_, UserEntity>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM users u LEFT JOIN usertypes t ON t.id = u.usertype_id WHERE u.id = $1",
            USER_COLUMNS
        );
        sqlx::query_as::<_, UserEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Create a user and return it.
    pub async fn create(&self, user: NewUser<'_>) -> Result<UserEntity, sqlx::Error> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, email, phone, status, usertype_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.phone)
        .bind(user.status)
        .bind(user.usertype_id)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Apply a partial update. Returns `None` when the user does not exist.
    pub async fn update(
        &self,
        id: i64,
        changes: UserChanges<'_>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                status = COALESCE($5, status),
                usertype_id = COALESCE($6, usertype_id)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.phone)
        .bind(changes.status)
        .bind(changes.usertype_id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    /// Delete a user and, by cascade, their sessions, shift and mappings.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check a user exists.
    pub async fn exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    /// List usertypes by name.
    pub async fn list_usertypes(&self) -> Result<Vec<UserTypeEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserTypeEntity>("SELECT id, name FROM usertypes ORDER BY name")
            .fetch_all(&self.pool)
            .await
    }

    /// Create a usertype.
    pub async fn create_usertype(&self, name: &str) -> Result<UserTypeEntity, sqlx::Error> {
        sqlx::query_as::<_, UserTypeEntity>(
            "INSERT INTO usertypes (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }
}
