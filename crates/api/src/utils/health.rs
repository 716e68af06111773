//! Health report for the `/health` endpoint
//!
//! Each dependency contributes a [`ComponentHealth`]; the overall status is
//! healthy only when every component is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall health status of the service
///
/// # Example
/// ```
/// use fanevent_api::utils::health::{ComponentHealth, HealthStatus};
///
/// let status = HealthStatus::new()
///     .add_component(ComponentHealth::healthy("database"))
///     .add_component(ComponentHealth::unhealthy("reminders", "scheduler stopped"));
///
/// assert!(!status.is_healthy);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub version: String,
    pub components: Vec<ComponentHealth>,
    pub timestamp: DateTime<Utc>,
}

impl HealthStatus {
    pub fn new() -> Self {
        Self {
            is_healthy: true,
            version: env!("CARGO_PKG_VERSION").to_string(),
            components: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Add a component and fold its state into the overall flag.
    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.is_healthy &= component.is_healthy;
        self.components.push(component);
        self
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Health of an individual dependency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component identifier (e.g. "database")
    pub name: String,
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }
}
