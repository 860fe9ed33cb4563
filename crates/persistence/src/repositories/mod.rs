//! Repository implementations for database operations.

pub mod dashboard_user;
pub mod mapping;
pub mod report;
pub mod shift;
pub mod user;

pub use dashboard_user::DashboardUserRepository;
pub use mapping::{MappingRepository, SessionOutcome, SessionResolution};
pub use report::ReportRepository;
pub use shift::ShiftRepository;
pub use user::{NewUser, UserChanges, UserRepository};
