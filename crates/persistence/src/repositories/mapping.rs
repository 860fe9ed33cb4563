//! Agent mapping repository.
//!
//! Device and Windows-username mappings, the queue of unregistered agent
//! sessions, and the transactional hand-over from the latter to the former.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use domain::models::UnregisteredSession;

use super::user::NewUser;
use crate::entities::{DeviceMappingEntity, UnregisteredSessionEntity, WindowsUsernameMappingEntity};

/// Mappings created when an unregistered session is resolved.
#[derive(Debug, Clone)]
pub struct SessionResolution {
    pub user_id: i64,
    pub device_mapping: Option<DeviceMappingEntity>,
    pub windows_username_mapping: Option<WindowsUsernameMappingEntity>,
}

/// Result of resolving an unregistered session.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    Resolved(SessionResolution),
    /// The session row does not exist (or was resolved concurrently).
    Missing,
    /// The agent reported neither a device id nor a Windows username.
    /// Nothing is written and the row is kept.
    NoIdentity,
}

/// Repository for agent mappings.
#[derive(Debug, Clone)]
pub struct MappingRepository {
    pool: PgPool,
}

impl MappingRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_device_mappings(&self) -> Result<Vec<DeviceMappingEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceMappingEntity>(
            r#"
            SELECT m.id, m.device_id, m.user_id, u.name AS user_name, m.created_at
            FROM device_mappings m
            LEFT JOIN users u ON u.id = m.user_id
            ORDER BY m.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn create_device_mapping(
        &self,
        device_id: &str,
        user_id: i64,
    ) -> Result<DeviceMappingEntity, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mapping = insert_device_mapping(&mut tx, device_id, user_id).await?;
        tx.commit().await?;
        Ok(mapping)
    }

    pub async fn delete_device_mapping(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM device_mappings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_windows_username_mappings(
        &self,
    ) -> Result<Vec<WindowsUsernameMappingEntity>, sqlx::Error> {
        sqlx::query_as::<_, WindowsUsernameMappingEntity>(
            r#"
            SELECT m.id, m.windows_username, m.user_id, u.name AS user_name, m.created_at
            FROM windows_username_mappings m
            LEFT JOIN users u ON u.id = m.user_id
            ORDER BY m.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn create_windows_username_mapping(
        &self,
        windows_username: &str,
        user_id: i64,
    ) -> Result<WindowsUsernameMappingEntity, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mapping = insert_windows_username_mapping(&mut tx, windows_username, user_id).await?;
        tx.commit().await?;
        Ok(mapping)
    }

    pub async fn delete_windows_username_mapping(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM windows_username_mappings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Unregistered agent sessions, most recently seen first.
    pub async fn list_unregistered_sessions(
        &self,
    ) -> Result<Vec<UnregisteredSessionEntity>, sqlx::Error> {
        sqlx::query_as::<_, UnregisteredSessionEntity>(
            r#"
            SELECT id, device_id, windows_username, hostname, first_seen, last_seen,
                   COALESCE(total_time, 0) AS total_time
            FROM unregistered_sessions
            ORDER BY last_seen DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_unregistered_session(
        &self,
        id: i64,
    ) -> Result<Option<UnregisteredSessionEntity>, sqlx::Error> {
        sqlx::query_as::<_, UnregisteredSessionEntity>(
            r#"
            SELECT id, device_id, windows_username, hostname, first_seen, last_seen,
                   COALESCE(total_time, 0) AS total_time
            FROM unregistered_sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Create a user from an unregistered session and map the agent to it.
    pub async fn register_user_from_session(
        &self,
        session_id: i64,
        user: NewUser<'_>,
    ) -> Result<SessionOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let session = match lock_mappable_session(&mut tx, session_id).await? {
            Ok(session) => session,
            Err(outcome) => return Ok(outcome),
        };

        let user_id: i64 = sqlx::query_scalar(
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
        .fetch_one(&mut *tx)
        .await?;

        let resolution = attach_session(&mut tx, &session, user_id).await?;
        tx.commit().await?;
        Ok(SessionOutcome::Resolved(resolution))
    }

    /// Map an unregistered session's agent to an existing user.
    pub async fn map_session_to_user(
        &self,
        session_id: i64,
        user_id: i64,
    ) -> Result<SessionOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let session = match lock_mappable_session(&mut tx, session_id).await? {
            Ok(session) => session,
            Err(outcome) => return Ok(outcome),
        };

        let resolution = attach_session(&mut tx, &session, user_id).await?;
        tx.commit().await?;
        Ok(SessionOutcome::Resolved(resolution))
    }
}

/// Locks the session row, or says why it cannot be resolved.
///
/// On `Err` the transaction is dropped, which rolls it back.
async fn lock_mappable_session(
    tx: &mut Transaction<'_, Postgres>,
    session_id: i64,
) -> Result<Result<UnregisteredSessionEntity, SessionOutcome>, sqlx::Error> {
    let Some(session) = lock_unregistered_session(tx, session_id).await? else {
        debug!(session_id, "Unregistered session already resolved or missing");
        return Ok(Err(SessionOutcome::Missing));
    };

    if !UnregisteredSession::from(session.clone()).has_identity() {
        debug!(session_id, "Unregistered session has no agent identity");
        return Ok(Err(SessionOutcome::NoIdentity));
    }

    Ok(Ok(session))
}

async fn lock_unregistered_session(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<Option<UnregisteredSessionEntity>, sqlx::Error> {
    sqlx::query_as::<_, UnregisteredSessionEntity>(
        r#"
        SELECT id, device_id, windows_username, hostname, first_seen, last_seen,
               COALESCE(total_time, 0) AS total_time
        FROM unregistered_sessions
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
}

/// Map the session's identities to `user_id` and drop the session row.
async fn attach_session(
    tx: &mut Transaction<'_, Postgres>,
    session: &UnregisteredSessionEntity,
    user_id: i64,
) -> Result<SessionResolution, sqlx::Error> {
    let device_mapping = match session.device_id.as_deref().filter(|s| !s.is_empty()) {
        Some(device_id) => Some(insert_device_mapping(tx, device_id, user_id).await?),
        None => None,
    };

    let windows_username_mapping = match session.windows_username.as_deref().filter(|s| !s.is_empty()) {
        Some(username) => Some(insert_windows_username_mapping(tx, username, user_id).await?),
        None => None,
    };

    sqlx::query("DELETE FROM unregistered_sessions WHERE id = $1")
        .bind(session.id)
        .execute(&mut **tx)
        .await?;

    debug!(
        session_id = session.id,
        user_id,
        device = device_mapping.is_some(),
        windows_username = windows_username_mapping.is_some(),
        "Unregistered session attached"
    );

    Ok(SessionResolution {
        user_id,
        device_mapping,
        windows_username_mapping,
    })
}

async fn insert_device_mapping(
    tx: &mut Transaction<'_, Postgres>,
    device_id: &str,
    user_id: i64,
) -> Result<DeviceMappingEntity, sqlx::Error> {
    sqlx::query_as::<_, DeviceMappingEntity>(
        r#"
        WITH inserted AS (
            INSERT INTO device_mappings (device_id, user_id)
            VALUES ($1, $2)
            RETURNING id, device_id, user_id, created_at
        )
        SELECT inserted.id, inserted.device_id, inserted.user_id, u.name AS user_name,
               inserted.created_at
        FROM inserted
        LEFT JOIN users u ON u.id = inserted.user_id
        "#,
    )
    .bind(device_id)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await
}

async fn insert_windows_username_mapping(
    tx: &mut Transaction<'_, Postgres>,
    windows_username: &str,
    user_id: i64,
) -> Result<WindowsUsernameMappingEntity, sqlx::Error> {
    sqlx::query_as::<_, WindowsUsernameMappingEntity>(
        r#"
        WITH inserted AS (
            INSERT INTO windows_username_mappings (windows_username, user_id)
            VALUES ($1, $2)
            RETURNING id, windows_username, user_id, created_at
        )
        SELECT inserted.id, inserted.windows_username, inserted.user_id, u.name AS user_name,
               inserted.created_at
        FROM inserted
        LEFT JOIN users u ON u.id = inserted.user_id
        "#,
    )
    .bind(windows_username)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await
}
