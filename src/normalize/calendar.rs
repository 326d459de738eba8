// src/normalize/calendar.rs

//! Calendar page extraction.
//!
//! Calendar pages are scraped markup, so the extractor sits behind a narrow
//! trait and can be replaced when the page layout changes.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::CalendarRecord;

/// Extract calendar entries from page markup.
pub trait CalendarExtractor: Send + Sync {
    /// Records found on `coin`'s page, in document order.
    fn extract(&self, coin: &str, markup: &str) -> Vec<CalendarRecord>;
}

/// Extractor for CoinMarketCal coin pages.
///
/// Each event has a reminder anchor carrying its id, title and date, and a
/// separate `div#box-{id}` card holding the description and vote count.
pub struct CoinMarketCalExtractor {
    reminder: Selector,
    card: Selector,
    description: Selector,
    votes: Selector,
}

impl CoinMarketCalExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            reminder: Self::parse_selector(r##"a[href="#alertReminder"]"##)?,
            card: Self::parse_selector(r#"div[id^="box-"]"#)?,
            description: Self::parse_selector("p.card__description")?,
            votes: Self::parse_selector("div.progress__votes")?,
        })
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }

    fn extract_one(
        &self,
        coin: &str,
        anchor: ElementRef<'_>,
        cards: &HashMap<&str, ElementRef<'_>>,
    ) -> Option<CalendarRecord> {
        let anchor = anchor.value();
        let id = anchor.attr("data-idevent")?;
        let title = anchor.attr("data-title")?;
        let event_date = parse_event_date(anchor.attr("data-date")?)?;

        let card = cards.get(id)?;
        let description = card
            .select(&self.description)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())?;
        let vote_count = card
            .select(&self.votes)
            .next()
            .and_then(|el| {
                el.text()
                    .collect::<String>()
                    .split_whitespace()
                    .next()
                    .map(str::to_string)
            })?;

        Some(CalendarRecord {
            coin_name: coin.to_string(),
            title: title.trim().to_string(),
            event_date,
            description,
            vote_count,
        })
    }
}

impl CalendarExtractor for CoinMarketCalExtractor {
    fn extract(&self, coin: &str, markup: &str) -> Vec<CalendarRecord> {
        let document = Html::parse_document(markup);

        // First card in document order wins when an id repeats
        let mut cards: HashMap<&str, ElementRef<'_>> = HashMap::new();
        for el in document.select(&self.card) {
            if let Some(id) = el.value().id().and_then(|id| id.strip_prefix("box-")) {
                cards.entry(id).or_insert(el);
            }
        }

        let mut records = Vec::new();
        for (index, anchor) in document.select(&self.reminder).enumerate() {
            match self.extract_one(coin, anchor, &cards) {
                Some(record) => records.push(record),
                None => log::warn!("Skipping malformed calendar event #{index} for '{coin}'"),
            }
        }

        log::debug!("Extracted {} calendar events for '{coin}'", records.len());
        records
    }
}

/// Parse an event date in any of the layouts the calendar pages use.
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }

    ["%d %B %Y", "%d %b %Y", "%B %d, %Y", "%b %d, %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <html><body>
        <div class="card">
            <a href="#alertReminder" data-idevent="101" data-title="Mainnet Launch" data-date="14 March 2024">Remind</a>
            <a href="/en/event/101">Details</a>
        </div>
        <div id="box-101">
            <p class="card__description">
                Mainnet goes live.
            </p>
            <div class="progress__votes">152 votes</div>
        </div>
        <div class="card">
            <a href="#alertReminder" data-idevent="102" data-title="Broken" data-date="someday">Remind</a>
        </div>
        <div id="box-102">
            <p class="card__description">No date.</p>
            <div class="progress__votes">3 votes</div>
        </div>
        <div class="card">
            <a href="#alertReminder" data-idevent="103" data-title="AMA" data-date="2024-04-02T10:00:00+00:00">Remind</a>
        </div>
        <div id="box-103">
            <p class="card__description">Community AMA</p>
            <div class="progress__votes"> 47 (82%) </div>
        </div>
        <div class="card">
            <a href="#alertReminder" data-idevent="104" data-title="Orphan" data-date="2024-04-03">Remind</a>
        </div>
        </body></html>
    "##;

    #[test]
    fn test_parse_selector_invalid() {
        assert!(CoinMarketCalExtractor::parse_selector("[[invalid").is_err());
    }

    #[test]
    fn test_extract_events() {
        let extractor = CoinMarketCalExtractor::new().unwrap();
        let records = extractor.extract("bitcoin", PAGE);

        assert_eq!(records.len(), 2);

        assert_eq!(records[0].coin_name, "bitcoin");
        assert_eq!(records[0].title, "Mainnet Launch");
        assert_eq!(
            records[0].event_date,
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
        );
        assert_eq!(records[0].description, "Mainnet goes live.");
        assert_eq!(records[0].vote_count, "152");

        assert_eq!(records[1].title, "AMA");
        assert_eq!(records[1].vote_count, "47");
    }

    #[test]
    fn test_duplicate_card_uses_first() {
        let page = r##"
            <a href="#alertReminder" data-idevent="7" data-title="Fork" data-date="2024-05-01">Remind</a>
            <div id="box-7">
                <p class="card__description">FIRST</p>
                <div class="progress__votes">1 votes</div>
            </div>
            <div id="box-7">
                <p class="card__description">SECOND</p>
                <div class="progress__votes">2 votes</div>
            </div>
        "##;
        let extractor = CoinMarketCalExtractor::new().unwrap();
        let records = extractor.extract("ethereum", page);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "FIRST");
        assert_eq!(records[0].vote_count, "1");
    }

    #[test]
    fn test_extract_from_unrelated_page() {
        let extractor = CoinMarketCalExtractor::new().unwrap();
        assert!(extractor.extract("bitcoin", "<html><p>maintenance</p></html>").is_empty());
    }

    #[test]
    fn test_parse_event_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        for raw in [
            "2024-03-14",
            "2024-03-14T10:00:00",
            "2024-03-14T10:00:00+02:00",
            "14 March 2024",
            "14 Mar 2024",
            "Mar 14, 2024",
            " March 14, 2024 ",
        ] {
            assert_eq!(parse_event_date(raw), Some(expected), "{raw}");
        }
        assert_eq!(parse_event_date("next week"), None);
    }
}
