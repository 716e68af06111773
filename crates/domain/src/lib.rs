//! # Fanevent Domain
//!
//! Business domain types and models for Fanevent.
//!
//! This crate contains:
//! - Domain data types (Event, Group, Rsvp, Notification, etc.)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Pure helpers that need no I/O (attendance math, event search)
//!
//! ## Architecture
//! - No dependencies on other Fanevent crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::attendance::{attendance_hours, AttendanceSummary};
pub use utils::search::{DateBucket, EventFilter, GroupFilter};
