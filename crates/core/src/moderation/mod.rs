//! Admin review of events and groups

pub mod service;

pub use service::ModerationService;
