//! Shift assignment repository.

use sqlx::PgPool;

use crate::entities::{ShiftOptionEntity, UserShiftEntity};
use domain::models::ShiftWindow;

/// Repository for `user_shifts`.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: PgPool,
}

impl ShiftRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All assignments with user names.
    pub async fn list(&self) -> Result<Vec<UserShiftEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserShiftEntity>(
            r#"
            SELECT us.id, us.user_id, u.name AS user_name, us.shift_start, us.shift_end
            FROM user_shifts us
            JOIN users u ON u.id = us.user_id
            ORDER BY us.shift_start, u.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Distinct shift windows with their user counts.
    pub async fn options(&self) -> Result<Vec<ShiftOptionEntity>, sqlx::Error> {
        sqlx::query_as::<_, ShiftOptionEntity>(
            r#"
            SELECT shift_start, shift_end, COUNT(*) AS user_count
            FROM user_shifts
            GROUP BY shift_start, shift_end
            ORDER BY shift_start, shift_end
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Assign or replace a user's shift.
    pub async fn upsert(
        &self,
        user_id: i64,
        window: ShiftWindow,
    ) -> Result<UserShiftEntity, sqlx::Error> {
        sqlx::query_as::<_, UserShiftEntity>(
            r#"
            WITH upserted AS (
                INSERT INTO user_shifts (user_id, shift_start, shift_end)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id) DO UPDATE SET
                    shift_start = EXCLUDED.shift_start,
                    shift_end = EXCLUDED.shift_end
                RETURNING id, user_id, shift_start, shift_end
            )
            SELECT upserted.id, upserted.user_id, u.name AS user_name,
                   upserted.shift_start, upserted.shift_end
            FROM upserted
            JOIN users u ON u.id = upserted.user_id
            "#,
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&self.pool)
        .await
    }

    /// Remove a user's shift.
    pub async fn delete_for_user(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_shifts WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
