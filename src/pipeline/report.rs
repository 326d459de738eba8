//! HTML rendering of digest sections.
//!
//! Fragment shapes are fixed so mail clients render every digest the same
//! way. All record text is escaped before it is placed in markup.

use std::fmt::Display;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::models::{CalendarRecord, DigestSection, PriceRecord, SectionStatus, ThreadRecord};

pub const PRICE_HEADING: &str = "Price changes";
pub const CALENDAR_HEADING: &str = "Calendar";

const PRICE_COLUMNS: [&str; 4] = ["Symbol", "Price in USD", "24h change in %", "7d change in %"];
const CALENDAR_COLUMNS: [&str; 5] = ["Coin name", "Title", "Date", "Description", "Votes"];

/// Renders records into self-contained section fragments.
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    forum_heading: String,
    calendar_base_url: String,
}

impl ReportAssembler {
    pub fn new(forum_heading: impl Into<String>, calendar_base_url: impl Into<String>) -> Self {
        let calendar_base_url: String = calendar_base_url.into();
        Self {
            forum_heading: forum_heading.into(),
            calendar_base_url: calendar_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn forum_heading(&self) -> &str {
        &self.forum_heading
    }

    /// Forum section: one sub-heading per run of the same group.
    pub fn render_forum(&self, threads: &[ThreadRecord]) -> DigestSection {
        let mut html = heading(&self.forum_heading);
        let mut current_group: Option<&str> = None;

        for thread in threads {
            if current_group != Some(thread.source_group.as_str()) {
                current_group = Some(&thread.source_group);
                html.push_str(&format!("<h2>{}</h2>", text(&thread.source_group)));
            }
            html.push_str(&format!(
                "<a href=\"{}\">{}</a><br>",
                attr(&thread.url),
                text(&thread.title)
            ));
        }

        ready(&self.forum_heading, html, threads.len())
    }

    /// Price section: a table row per record with emphasized changes.
    pub fn render_prices(&self, prices: &[PriceRecord]) -> DigestSection {
        let mut html = table_shell(PRICE_HEADING, &PRICE_COLUMNS);
        for price in prices {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                text(&price.symbol),
                text(&price.price),
                emphasize(price.change_24h, format!("{:.1}", price.change_24h)),
                emphasize(price.change_7d as f64, price.change_7d),
            ));
        }
        html.push_str("</table>");

        ready(PRICE_HEADING, html, prices.len())
    }

    /// Calendar section: a table row per event, coin linked to its page.
    pub fn render_calendar(&self, events: &[CalendarRecord]) -> DigestSection {
        let mut html = table_shell(CALENDAR_HEADING, &CALENDAR_COLUMNS);
        for event in events {
            let link = format!("{}/{}#upcoming", self.calendar_base_url, event.coin_name);
            html.push_str(&format!(
                "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                attr(&link),
                text(&event.coin_name),
                text(&event.title),
                event.event_date.format("%Y-%m-%d"),
                text(&event.description),
                text(&event.vote_count),
            ));
        }
        html.push_str("</table>");

        ready(CALENDAR_HEADING, html, events.len())
    }

    /// Placeholder for a section whose source failed. The anchor stays so
    /// the navigation line never points nowhere.
    pub fn render_unavailable(&self, section_heading: &str) -> DigestSection {
        DigestSection {
            heading: section_heading.to_string(),
            body_html: format!(
                "{}<p><i>{} is unavailable for this digest.</i></p>",
                heading(section_heading),
                text(section_heading)
            ),
            status: SectionStatus::Unavailable,
        }
    }
}

fn ready(section_heading: &str, body_html: String, records: usize) -> DigestSection {
    DigestSection {
        heading: section_heading.to_string(),
        body_html,
        status: SectionStatus::Ready { records },
    }
}

fn heading(title: &str) -> String {
    format!("<h1 id=\"{}\">{}</h1>", attr(title), text(title))
}

fn table_shell(title: &str, columns: &[&str]) -> String {
    let mut html = format!(
        "\n    {}\n    <style>\n    table, th, td {{\n      border: 1px solid black;\n    }}\n    </style>\n    <table>\n    <tr>\n",
        heading(title)
    );
    for column in columns {
        html.push_str(&format!("    <th>{}</th>\n", text(column)));
    }
    html.push_str("    </tr>\n    ");
    html
}

/// Color a change by sign and bold it when its magnitude exceeds 10.
fn emphasize(value: f64, display: impl Display) -> String {
    let colored = if value > 0.0 {
        format!("<font color=\"green\">{display}</font>")
    } else if value < 0.0 {
        format!("<font color=\"red\">{display}</font>")
    } else {
        display.to_string()
    };

    if value.abs() > 10.0 {
        format!("<b>{colored}</b>")
    } else {
        colored
    }
}
