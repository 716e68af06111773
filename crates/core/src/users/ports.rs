//! Port interfaces for user profile management

use async_trait::async_trait;
use fanevent_domain::{Result, UserProfile};

/// Trait for user profile persistence and retrieval
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get user profile by ID
    async fn get_by_id(&self, id: &str) -> Result<Option<UserProfile>>;

    /// Get user profile by identity provider subject
    async fn get_by_subject(&self, subject: &str) -> Result<Option<UserProfile>>;

    /// Create a new user profile
    async fn create(&self, profile: UserProfile) -> Result<()>;

    /// Update an existing user profile
    async fn update(&self, profile: UserProfile) -> Result<()>;

    /// Page through profiles, oldest first
    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<UserProfile>>;

    /// Every profile, oldest first
    async fn list_all(&self) -> Result<Vec<UserProfile>>;
}
