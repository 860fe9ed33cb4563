//! Shift entities.

use chrono::NaiveTime;
use sqlx::FromRow;

use domain::models::{ShiftOption, ShiftWindow};

/// Row of `user_shifts` joined with the user's name.
#[derive(Debug, Clone, FromRow)]
pub struct UserShiftEntity {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
}

impl From<UserShiftEntity> for domain::models::UserShift {
    fn from(entity: UserShiftEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            user_name: entity.user_name,
            shift_start: entity.shift_start,
            shift_end: entity.shift_end,
        }
    }
}

/// A distinct shift window and how many users it is assigned to.
#[derive(Debug, Clone, FromRow)]
pub struct ShiftOptionEntity {
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
    pub user_count: i64,
}

impl From<ShiftOptionEntity> for ShiftOption {
    fn from(entity: ShiftOptionEntity) -> Self {
        ShiftOption::new(
            ShiftWindow::new(entity.shift_start, entity.shift_end),
            entity.user_count,
        )
    }
}
