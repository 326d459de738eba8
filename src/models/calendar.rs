//! Calendar event records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An upcoming event scraped from a coin's calendar page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarRecord {
    /// Coin slug the page was fetched for
    pub coin_name: String,

    /// Event title
    pub title: String,

    /// Date the event takes place
    pub event_date: NaiveDate,

    /// Event description
    pub description: String,

    /// Vote count as displayed by the site
    pub vote_count: String,
}
