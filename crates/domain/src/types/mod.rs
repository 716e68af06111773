//! Domain types and models
//!
//! One module per aggregate. Every record carries a UUID v4 string id and
//! UTC timestamps.

pub mod application;
pub mod dashboard;
pub mod event;
pub mod group;
pub mod messaging;
pub mod moderation;
pub mod notification;
pub mod reminder;
pub mod report;
pub mod rsvp;
pub mod user;

pub use application::*;
pub use dashboard::*;
pub use event::*;
pub use group::*;
pub use messaging::*;
pub use moderation::*;
pub use notification::*;
pub use reminder::*;
pub use report::*;
pub use rsvp::*;
pub use user::*;

/// Generate a new record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
