//! RSVPs, check-in/check-out and attendance hours

pub mod ports;
pub mod service;

pub use ports::{RsvpOutcome, RsvpRepository};
pub use service::RsvpService;
