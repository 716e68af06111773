//! User profiles and identity sync

pub mod ports;
pub mod service;

pub use ports::UserRepository;
pub use service::UserService;
