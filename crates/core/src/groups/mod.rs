//! Fan groups and membership

pub mod ports;
pub mod service;

pub use ports::GroupRepository;
pub use service::GroupService;
