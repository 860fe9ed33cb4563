//! Domain models for the activity dashboard.

pub mod dashboard_user;
pub mod filter;
pub mod mapping;
pub mod metrics;
pub mod report;
pub mod shift;
pub mod user;

pub use dashboard_user::{
    ChangePasswordRequest, CreateDashboardUserRequest, DashboardUser, LoginRequest, LoginResponse,
    UpdateDashboardUserRequest,
};
pub use filter::{DateRange, ReportFilter, ReportQuery, ReportTimezone, ShiftFilter, ShiftWindow};
pub use mapping::{
    CreateDeviceMappingRequest, CreateWindowsUsernameMappingRequest, DeviceMapping,
    MapUserToSessionRequest, RegisterUserFromSessionRequest, SessionMappingResult,
    UnregisteredSession, WindowsUsernameMapping,
};
pub use metrics::{
    ActivityDistribution, ActivityLevel, CategoryTotals, LateStartSummary, RangeTargets,
};
pub use report::{
    CategoryTimes, ChartsResponse, DailyPoint, DashboardOverview, HourlyPoint, KpiSummary,
    TimeValue, TimelineEntry, TopApp, UserActivity, UserBreakdown, UserTimeline,
};
pub use shift::{ShiftOption, UpsertShiftRequest, UserShift};
pub use user::{
    CreateUserRequest, CreateUserTypeRequest, ListUsersQuery, UpdateUserRequest, User, UserType,
};
