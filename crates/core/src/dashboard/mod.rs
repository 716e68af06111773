//! Admin and organizer dashboards

pub mod ports;
pub mod service;

pub use ports::DashboardRepository;
pub use service::DashboardService;
