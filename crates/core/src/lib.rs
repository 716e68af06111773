//! # Fanevent Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for every store the service needs
//! - Caller identity and role guards
//! - Use cases and services, one module per feature area
//!
//! ## Architecture Principles
//! - Only depends on `fanevent-domain` and `fanevent-common`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod access;
pub mod applications;
pub mod attendance;
pub mod dashboard;
pub mod events;
pub mod exports;
pub mod groups;
pub mod likes;
pub mod messaging;
pub mod moderation;
pub mod notifications;
pub mod reminders;
pub mod reports;
pub mod users;

mod validation;

pub use access::Actor;
pub use applications::{ApplicationRepository, OrganizerApplicationService};
pub use attendance::{RsvpOutcome, RsvpRepository, RsvpService};
pub use dashboard::{DashboardRepository, DashboardService};
pub use events::{EventRepository, EventService};
pub use exports::{CsvExport, ExportService};
pub use groups::{GroupRepository, GroupService};
pub use likes::{LikeRepository, LikeService};
pub use messaging::{ConversationRepository, MessagingService};
pub use moderation::ModerationService;
pub use notifications::{NotificationRepository, NotificationService};
pub use reminders::{ReminderRepository, ReminderService};
pub use reports::service::ReportTargets;
pub use reports::{ReportRepository, ReportService};
pub use users::{UserRepository, UserService};
