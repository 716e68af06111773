//! Database implementations

pub mod application_repository;
pub mod conversation_repository;
pub mod dashboard_repository;
pub mod event_repository;
pub mod group_repository;
pub mod like_repository;
pub mod manager;
pub mod notification_repository;
pub mod reminder_repository;
pub mod report_repository;
pub mod rsvp_repository;
pub mod user_repository;

mod rows;

pub use application_repository::SqliteApplicationRepository;
pub use conversation_repository::SqliteConversationRepository;
pub use dashboard_repository::SqliteDashboardRepository;
pub use event_repository::SqliteEventRepository;
pub use group_repository::SqliteGroupRepository;
pub use like_repository::SqliteLikeRepository;
pub use manager::{DbManager, SCHEMA_VERSION};
pub use notification_repository::SqliteNotificationRepository;
pub use reminder_repository::SqliteReminderRepository;
pub use report_repository::SqliteReportRepository;
pub use rsvp_repository::SqliteRsvpRepository;
pub use user_repository::SqliteUserRepository;
