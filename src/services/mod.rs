pub mod match_service;
pub mod reporting_service;

pub use match_service::MatchService;
pub use reporting_service::ReportingService;
