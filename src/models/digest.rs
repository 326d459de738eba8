//! Digest document structures.

use serde::{Deserialize, Serialize};

/// Outcome of one source pipeline within a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionStatus {
    /// Section rendered from `records` items
    Ready { records: usize },
    /// Source failed; the section carries a placeholder
    Unavailable,
}

/// One rendered section of the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSection {
    /// Section heading, also used as the anchor id
    pub heading: String,

    /// Self-contained HTML fragment, heading included
    pub body_html: String,

    pub status: SectionStatus,
}

impl DigestSection {
    pub fn is_available(&self) -> bool {
        matches!(self.status, SectionStatus::Ready { .. })
    }
}

/// The composed report for one cycle.
#[derive(Debug, Clone)]
pub struct Digest {
    pub subject: String,
    pub sections: Vec<DigestSection>,
}

impl Digest {
    /// Navigation line linking every section anchor.
    pub fn navigation_html(&self) -> String {
        let links: Vec<String> = self
            .sections
            .iter()
            .map(|s| {
                format!(
                    "<a href=\"#{}\">{}</a>",
                    html_escape::encode_double_quoted_attribute(&s.heading),
                    html_escape::encode_text(&s.heading)
                )
            })
            .collect();
        format!("Quick navigation: {}", links.join(", "))
    }

    /// Full HTML body: navigation followed by every section in order.
    pub fn to_html(&self) -> String {
        let bodies: Vec<&str> = self.sections.iter().map(|s| s.body_html.as_str()).collect();
        format!("{}{}", self.navigation_html(), bodies.join(" "))
    }

    /// Headings of sections whose source failed.
    pub fn unavailable_sections(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| !s.is_available())
            .map(|s| s.heading.as_str())
            .collect()
    }

    /// Whether every source contributed to this digest.
    pub fn is_complete(&self) -> bool {
        self.sections.iter().all(DigestSection::is_available)
    }

    /// Package the digest for delivery.
    pub fn to_message(&self) -> DigestMessage {
        DigestMessage {
            subject: self.subject.clone(),
            html_body: self.to_html(),
        }
    }
}

/// A rendered document ready for transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DigestMessage {
    pub subject: String,
    pub html_body: String,
}
