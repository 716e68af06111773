//! Event and group search filters
//!
//! Filtering is text containment plus date-bucket membership over records
//! already loaded from storage. Date buckets are evaluated in UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::types::{Event, Group};

/// Calendar bucket relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateBucket {
    Today,
    Tomorrow,
    ThisWeek,
    ThisWeekend,
    ThisMonth,
    Upcoming,
    Past,
}

impl DateBucket {
    pub fn contains(self, starts_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let today = now.date_naive();
        let day = starts_at.date_naive();

        match self {
            Self::Today => day == today,
            Self::Tomorrow => Some(day) == today.succ_opt(),
            Self::ThisWeek => day >= today && day <= end_of_week(today),
            Self::ThisWeekend => {
                let is_weekend = matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
                is_weekend && day >= today && day <= end_of_week(today)
            }
            Self::ThisMonth => {
                day >= today && day.year() == today.year() && day.month() == today.month()
            }
            Self::Upcoming => starts_at >= now,
            Self::Past => starts_at < now,
        }
    }
}

/// Sunday closing the ISO week that contains `day`.
fn end_of_week(day: NaiveDate) -> NaiveDate {
    let days_left = 6 - i64::from(day.weekday().num_days_from_monday());
    day + Duration::days(days_left)
}

fn normalize(query: Option<&str>) -> Option<String> {
    query.map(str::trim).filter(|q| !q.is_empty()).map(str::to_lowercase)
}

fn page_bounds(limit: Option<u32>, offset: Option<u32>) -> (usize, usize) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (offset.unwrap_or(0) as usize, limit as usize)
}

/// Query parameters for listing events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub when: Option<DateBucket>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event, now: DateTime<Utc>) -> bool {
        if let Some(query) = normalize(self.q.as_deref()) {
            if !event.search_text().contains(&query) {
                return false;
            }
        }
        if let Some(category) = normalize(self.category.as_deref()) {
            if event.category.to_lowercase() != category {
                return false;
            }
        }
        if let Some(group_id) = self.group_id.as_deref() {
            if event.group_id.as_deref() != Some(group_id) {
                return false;
            }
        }
        self.when.map_or(true, |bucket| bucket.contains(event.starts_at, now))
    }

    /// Filter, sort by start time and paginate. The `past` bucket lists the
    /// most recent events first.
    pub fn apply(&self, events: Vec<Event>, now: DateTime<Utc>) -> Vec<Event> {
        let mut matched: Vec<Event> =
            events.into_iter().filter(|event| self.matches(event, now)).collect();

        if self.when == Some(DateBucket::Past) {
            matched.sort_by(|a, b| b.starts_at.cmp(&a.starts_at));
        } else {
            matched.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        }

        let (offset, limit) = page_bounds(self.limit, self.offset);
        matched.into_iter().skip(offset).take(limit).collect()
    }
}

/// Query parameters for listing groups
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupFilter {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl GroupFilter {
    pub fn matches(&self, group: &Group) -> bool {
        if let Some(query) = normalize(self.q.as_deref()) {
            if !group.search_text().contains(&query) {
                return false;
            }
        }
        normalize(self.category.as_deref())
            .map_or(true, |category| group.category.to_lowercase() == category)
    }

    /// Filter, sort by name and paginate.
    pub fn apply(&self, groups: Vec<Group>) -> Vec<Group> {
        let mut matched: Vec<Group> =
            groups.into_iter().filter(|group| self.matches(group)).collect();
        matched.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        let (offset, limit) = page_bounds(self.limit, self.offset);
        matched.into_iter().skip(offset).take(limit).collect()
    }
}
