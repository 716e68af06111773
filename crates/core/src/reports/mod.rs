//! User reports about content and other users

pub mod ports;
pub mod service;

pub use ports::ReportRepository;
pub use service::ReportService;
