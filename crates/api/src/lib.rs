//! # Fanevent API
//!
//! HTTP application layer - handlers, router and process entry helpers.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - axum handlers and router
//! - Error-to-status mapping and request extractors
//! - Logging bootstrap
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Role checks stay in the core services; handlers only route

pub mod context;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod utils;

pub use context::AppContext;
pub use error::{ApiError, ApiResult};
pub use routes::router;
