//! Event likes

pub mod ports;
pub mod service;

pub use ports::LikeRepository;
pub use service::LikeService;
