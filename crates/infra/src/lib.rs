//! # Fanevent Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repositories and the schema migration runner
//! - Configuration loading from environment and files
//! - Identity token verification
//! - Cron-driven background jobs (reminder sweep)
//!
//! ## Architecture
//! - Implements traits defined in `fanevent-core`
//! - Depends on `fanevent-common`, `fanevent-domain` and `fanevent-core`
//! - Contains all "impure" code (I/O, clocks, crypto)

pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod scheduling;

// Re-export commonly used items
pub use auth::JwtVerifier;
pub use database::*;
pub use errors::InfraError;
pub use scheduling::{ReminderScheduler, ReminderSchedulerConfig, ReminderSweepJob};
