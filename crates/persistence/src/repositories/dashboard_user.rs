//! Dashboard account repository.

use sqlx::PgPool;

use crate::entities::DashboardUserEntity;

/// Repository for `dashboard_users`.
#[derive(Debug, Clone)]
pub struct DashboardUserRepository {
    pool: PgPool,
}

impl DashboardUserRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List accounts by username.
    pub async fn list(&self) -> Result<Vec<DashboardUserEntity>, sqlx::Error> {
        sqlx::query_as::<_, DashboardUserEntity>(
            r#"
            SELECT id, username, password_hash, type, status, created_at, updated_at
            FROM dashboard_users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<DashboardUserEntity>, sqlx::Error> {
        sqlx::query_as::<_, DashboardUserEntity>(
            r#"
            SELECT id, username, password_hash, type, status, created_at, updated_at
            FROM dashboard_users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Case-insensitive lookup used at login.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<DashboardUserEntity>, sqlx::Error> {
        sqlx::query_as::<_, DashboardUserEntity>(
            r#"
            SELECT id, username, password_hash, type, status, created_at, updated_at
            FROM dashboard_users
            WHERE LOWER(username) = LOWER($1)
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        user_type: &str,
        status: &str,
    ) -> Result<DashboardUserEntity, sqlx::Error> {
        sqlx::query_as::<_, DashboardUserEntity>(
            r#"
            INSERT INTO dashboard_users (username, password_hash, type, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, type, status, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(user_type)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    /// Update profile fields. `None` keeps the current value.
    pub async fn update_profile(
        &self,
        id: i64,
        username: Option<&str>,
        user_type: Option<&str>,
        status: Option<&str>,
    ) -> Result<Option<DashboardUserEntity>, sqlx::Error> {
        sqlx::query_as::<_, DashboardUserEntity>(
            r#"
            UPDATE dashboard_users SET
                username = COALESCE($2, username),
                type = COALESCE($3, type),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, password_hash, type, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(user_type)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE dashboard_users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dashboard_users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of active admin accounts, used to keep at least one.
    pub async fn count_active_admins(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM dashboard_users WHERE type = 'admin' AND status = 'active'",
        )
        .fetch_one(&self.pool)
        .await
    }
}
