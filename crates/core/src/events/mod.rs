//! Event lifecycle, visibility and search

pub mod ports;
pub mod service;

pub use ports::EventRepository;
pub use service::EventService;
