//! crates/profendorse_core/src/display.rs
//!
//! Labels, colors and urgency buckets used when presenting requests.
//! All functions are pure; anything date-relative takes `today` explicitly
//! and must be recomputed at render time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::{RequestPurpose, RequestStatus};

const GRAY: &str = "#95a5a6";
const YELLOW: &str = "#f1c40f";
const BLUE: &str = "#3498db";
const GREEN: &str = "#2ecc71";
const RED: &str = "#e74c3c";

/// User-facing status name. `completed` is shown as "Fulfilled".
pub fn status_label(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Pending => "Pending",
        RequestStatus::InProgress => "In Progress",
        RequestStatus::Completed => "Fulfilled",
        RequestStatus::Rejected => "Rejected",
    }
}

pub fn status_color(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Pending => YELLOW,
        RequestStatus::InProgress => BLUE,
        RequestStatus::Completed => GREEN,
        RequestStatus::Rejected => RED,
    }
}

/// Turns a snake_case identifier into capitalized words: `graduate_school` -> "Graduate School".
pub fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display name of a purpose. `other` shows the custom text when one was given.
pub fn purpose_label(purpose: RequestPurpose, custom_purpose: Option<&str>) -> String {
    match (purpose, custom_purpose.map(str::trim)) {
        (RequestPurpose::Other, Some(custom)) if !custom.is_empty() => custom.to_string(),
        _ => title_case(purpose.as_str()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    High,
    Medium,
    Low,
}

/// Whole days from `today` until `due`. Negative when overdue.
pub fn days_remaining(due: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    due.map(|due| (due - today).num_days())
}

/// `High` within 3 days (or overdue), `Medium` within 7, otherwise `Low`.
pub fn urgency_level(due: Option<NaiveDate>, today: NaiveDate) -> Option<UrgencyLevel> {
    days_remaining(due, today).map(|days| match days {
        d if d <= 3 => UrgencyLevel::High,
        d if d <= 7 => UrgencyLevel::Medium,
        _ => UrgencyLevel::Low,
    })
}

impl UrgencyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            UrgencyLevel::High => "high",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::Low => "low",
        }
    }
}

pub fn urgency_color(level: Option<UrgencyLevel>) -> &'static str {
    match level {
        Some(UrgencyLevel::High) => RED,
        Some(UrgencyLevel::Medium) => YELLOW,
        Some(UrgencyLevel::Low) => GREEN,
        None => GRAY,
    }
}

/// The three dashboard tabs. Both terminal states are listed under `Completed`,
/// while remaining distinct statuses on the request itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardTab {
    Pending,
    InProgress,
    Completed,
}

impl DashboardTab {
    pub fn for_status(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Pending => DashboardTab::Pending,
            RequestStatus::InProgress => DashboardTab::InProgress,
            RequestStatus::Completed | RequestStatus::Rejected => DashboardTab::Completed,
        }
    }

    pub fn contains(self, status: RequestStatus) -> bool {
        DashboardTab::for_status(status) == self
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DashboardTab::Pending => "pending",
            DashboardTab::InProgress => "in_progress",
            DashboardTab::Completed => "completed",
        }
    }
}

impl FromStr for DashboardTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DashboardTab::Pending),
            "in_progress" => Ok(DashboardTab::InProgress),
            "completed" => Ok(DashboardTab::Completed),
            _ => Err(format!("Unknown dashboard tab: {}", s)),
        }
    }
}

/// Short form used in lists: "Mar 15, 2024".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Long form stamped on letters: "March 15, 2024".
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn completed_is_labelled_fulfilled() {
        assert_eq!(status_label(RequestStatus::Completed), "Fulfilled");
        assert_eq!(status_label(RequestStatus::InProgress), "In Progress");
        assert_eq!(status_label(RequestStatus::Pending), "Pending");
        assert_eq!(status_label(RequestStatus::Rejected), "Rejected");
    }

    #[test]
    fn status_colors() {
        assert_eq!(
            RequestStatus::ALL.map(status_color),
            ["#f1c40f", "#3498db", "#2ecc71", "#e74c3c"]
        );
    }

    #[test]
    fn urgency_boundaries() {
        let today = day(2024, 3, 20);
        assert_eq!(urgency_level(None, today), None);
        assert_eq!(urgency_level(Some(day(2024, 3, 23)), today), Some(UrgencyLevel::High));
        assert_eq!(urgency_level(Some(day(2024, 3, 24)), today), Some(UrgencyLevel::Medium));
        assert_eq!(urgency_level(Some(day(2024, 3, 27)), today), Some(UrgencyLevel::Medium));
        assert_eq!(urgency_level(Some(day(2024, 3, 28)), today), Some(UrgencyLevel::Low));
        assert_eq!(urgency_level(Some(day(2024, 3, 1)), today), Some(UrgencyLevel::High));
    }

    #[test]
    fn days_remaining_crosses_month_end() {
        assert_eq!(days_remaining(Some(day(2024, 3, 2)), day(2024, 2, 28)), Some(3));
        assert_eq!(days_remaining(Some(day(2024, 2, 27)), day(2024, 2, 28)), Some(-1));
    }

    #[test]
    fn urgency_colors() {
        assert_eq!(urgency_color(Some(UrgencyLevel::High)), "#e74c3c");
        assert_eq!(urgency_color(None), "#95a5a6");
    }

    #[test]
    fn purpose_labels() {
        assert_eq!(purpose_label(RequestPurpose::GraduateSchool, None), "Graduate School");
        assert_eq!(purpose_label(RequestPurpose::ResearchPosition, None), "Research Position");
        assert_eq!(purpose_label(RequestPurpose::Other, None), "Other");
        assert_eq!(
            purpose_label(RequestPurpose::Other, Some("Exchange semester")),
            "Exchange semester"
        );
        assert_eq!(
            purpose_label(RequestPurpose::Internship, Some("ignored")),
            "Internship"
        );
    }

    #[test]
    fn terminal_states_share_the_completed_tab() {
        assert_eq!(DashboardTab::for_status(RequestStatus::Rejected), DashboardTab::Completed);
        assert_eq!(DashboardTab::for_status(RequestStatus::Completed), DashboardTab::Completed);
        assert!(DashboardTab::InProgress.contains(RequestStatus::InProgress));
        assert!(!DashboardTab::Pending.contains(RequestStatus::Rejected));
        assert_eq!("in_progress".parse::<DashboardTab>(), Ok(DashboardTab::InProgress));
        assert!("rejected".parse::<DashboardTab>().is_err());
    }

    #[test]
    fn date_formats() {
        assert_eq!(format_date(day(2024, 3, 5)), "Mar 5, 2024");
        assert_eq!(format_long_date(day(2024, 3, 5)), "March 5, 2024");
    }
}
