//! Shift assignment models.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::filter::{parse_time_of_day, ShiftWindow};
use crate::errors::FilterError;

/// A user's assigned shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserShift {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
}

impl UserShift {
    pub fn window(&self) -> ShiftWindow {
        ShiftWindow::new(self.shift_start, self.shift_end)
    }
}

/// A selectable shift in the dashboard's shift filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftOption {
    /// Token accepted by the `shift` query parameter.
    pub value: String,
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
    pub overnight: bool,
    pub user_count: i64,
}

impl ShiftOption {
    pub fn new(window: ShiftWindow, user_count: i64) -> Self {
        ShiftOption {
            value: window.to_string(),
            shift_start: window.start,
            shift_end: window.end,
            overnight: window.is_overnight(),
            user_count,
        }
    }
}

/// Request body for `PUT /api/shifts/:user_id`. Times are `HH:MM[:SS]`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertShiftRequest {
    pub shift_start: String,
    pub shift_end: String,
}

impl UpsertShiftRequest {
    pub fn window(&self) -> Result<ShiftWindow, FilterError> {
        let invalid = || FilterError::InvalidShift(format!("{}-{}", self.shift_start, self.shift_end));
        let start = parse_time_of_day(&self.shift_start).ok_or_else(invalid)?;
        let end = parse_time_of_day(&self.shift_end).ok_or_else(invalid)?;
        if start == end {
            return Err(invalid());
        }
        Ok(ShiftWindow::new(start, end))
    }
}
