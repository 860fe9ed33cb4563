//! Business logic services.

pub mod reports;

pub use reports::ReportService;
