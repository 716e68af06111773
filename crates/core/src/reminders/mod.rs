//! Per-user event reminders and the periodic reminder sweep

pub mod ports;
pub mod service;

pub use ports::ReminderRepository;
pub use service::ReminderService;
