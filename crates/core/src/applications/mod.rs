//! Organizer applications

pub mod ports;
pub mod service;

pub use ports::ApplicationRepository;
pub use service::OrganizerApplicationService;
