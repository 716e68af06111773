//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Text limits
pub const EVENT_TITLE_MIN_LENGTH: usize = 3;
pub const EVENT_TITLE_MAX_LENGTH: usize = 120;
pub const GROUP_NAME_MIN_LENGTH: usize = 3;
pub const GROUP_NAME_MAX_LENGTH: usize = 80;
pub const DESCRIPTION_MAX_LENGTH: usize = 5000;
pub const LOCATION_MAX_LENGTH: usize = 200;
pub const CATEGORY_MAX_LENGTH: usize = 60;
pub const ORGANIZATION_NAME_MAX_LENGTH: usize = 120;
pub const DISPLAY_NAME_MAX_LENGTH: usize = 60;
pub const BIO_MAX_LENGTH: usize = 500;
pub const MESSAGE_MAX_LENGTH: usize = 2000;
pub const MESSAGE_PREVIEW_LENGTH: usize = 80;
pub const MOTIVATION_MIN_LENGTH: usize = 20;
pub const MOTIVATION_MAX_LENGTH: usize = 2000;
pub const REPORT_REASON_MAX_LENGTH: usize = 1000;
pub const MODERATION_NOTE_MAX_LENGTH: usize = 500;

// Reminders
pub const REMINDER_MIN_OFFSET_MINUTES: i64 = 1;
pub const REMINDER_MAX_OFFSET_MINUTES: i64 = 7 * 24 * 60;
pub const MAX_REMINDERS_PER_EVENT: usize = 5;
pub const DEFAULT_REMINDER_CRON: &str = "0 */5 * * * *";

// Attendance
pub const SELF_CHECK_IN_WINDOW_MINUTES: i64 = 60;

// Paging
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MESSAGE_PAGE_SIZE: u32 = 50;
pub const DEFAULT_NOTIFICATION_PAGE_SIZE: u32 = 50;
