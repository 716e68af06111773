//! Direct conversations and messages

pub mod ports;
pub mod service;

pub use ports::ConversationRepository;
pub use service::MessagingService;
