use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::ChatMessage;

/// Grouping key for the day separators rendered between message runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum DayLabel {
    Today,
    Yesterday,
    Date(NaiveDate),
}

impl DayLabel {
    /// Label for a message's calendar date relative to the viewer's current
    /// date.
    pub fn for_date(date: NaiveDate, today: NaiveDate) -> Self {
        if date == today {
            DayLabel::Today
        } else if date == today - Duration::days(1) {
            DayLabel::Yesterday
        } else {
            DayLabel::Date(date)
        }
    }
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayLabel::Today => write!(f, "Today"),
            DayLabel::Yesterday => write!(f, "Yesterday"),
            DayLabel::Date(date) => {
                write!(f, "{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
            }
        }
    }
}

impl From<DayLabel> for String {
    fn from(label: DayLabel) -> Self {
        label.to_string()
    }
}

/// Pure transform from an unordered message snapshot to the render sequence:
/// messages sorted ascending by timestamp (stable, so equal timestamps keep
/// their input order) and bucketed by day label in order of first appearance.
///
/// Re-run on every snapshot the live feed delivers; same input, same output.
pub fn group_by_day(
    messages: &[ChatMessage],
    today: NaiveDate,
) -> Vec<(DayLabel, Vec<ChatMessage>)> {
    let mut ordered: Vec<ChatMessage> = messages.to_vec();
    ordered.sort_by_key(|message| message.timestamp);

    let mut groups: Vec<(DayLabel, Vec<ChatMessage>)> = Vec::new();
    for message in ordered {
        let label = DayLabel::for_date(message.timestamp.date_naive(), today);
        match groups.last_mut() {
            Some((current, bucket)) if *current == label => bucket.push(message),
            _ => groups.push((label, vec![message])),
        }
    }

    groups
}
