//! In-app notifications

pub mod ports;
pub mod service;

pub use ports::NotificationRepository;
pub use service::NotificationService;
