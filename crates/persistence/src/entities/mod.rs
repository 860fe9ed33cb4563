//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod dashboard_user;
pub mod mapping;
pub mod report;
pub mod shift;
pub mod user;

pub use dashboard_user::DashboardUserEntity;
pub use mapping::{DeviceMappingEntity, UnregisteredSessionEntity, WindowsUsernameMappingEntity};
pub use report::{
    AppUsageEntity, CategoryTotalsEntity, DailyTotalsEntity, FirstActivityEntity,
    HourlyTotalsEntity, KpiTotalsEntity, TimelineSessionEntity, UserAppUsageEntity,
    UserTotalsEntity,
};
pub use shift::{ShiftOptionEntity, UserShiftEntity};
pub use user::{UserEntity, UserTypeEntity};
