//! Shared helpers for the HTTP layer

pub mod handler_helpers;
pub mod health;
pub mod logging;

pub use handler_helpers::execute_logged;
