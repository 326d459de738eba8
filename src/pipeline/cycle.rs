// src/pipeline/cycle.rs

//! One digest cycle: fetch, normalize, filter, render, deliver.

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Config, Digest, DigestSection, SectionStatus};
use crate::normalize::{self, CalendarExtractor};
use crate::services::{CalendarSource, DigestDelivery, ForumSource, MarketSource};
use crate::storage::{IdentityStore, Outbox};
use crate::utils::log as progress;

use super::novelty::NoveltyFilter;
use super::report::{CALENDAR_HEADING, PRICE_HEADING, ReportAssembler};

/// The collaborators a cycle reads from.
pub struct Sources<'a> {
    pub forum: &'a dyn ForumSource,
    pub market: &'a dyn MarketSource,
    pub calendar: &'a dyn CalendarSource,
    pub extractor: &'a dyn CalendarExtractor,
}

/// Runs the three source pipelines and composes the digest.
///
/// Pipelines run one after another in the fixed order forum, price,
/// calendar. A failing source becomes an unavailable section; only an
/// identity store failure aborts the cycle.
pub struct DigestOrchestrator<'a> {
    config: &'a Config,
    sources: Sources<'a>,
    store: &'a dyn IdentityStore,
    assembler: ReportAssembler,
}

impl<'a> DigestOrchestrator<'a> {
    pub fn new(config: &'a Config, sources: Sources<'a>, store: &'a dyn IdentityStore) -> Self {
        let assembler = ReportAssembler::new(&config.forum.heading, &config.calendar.base_url);
        Self {
            config,
            sources,
            store,
            assembler,
        }
    }

    /// Build the digest for `today`.
    pub async fn assemble(&self, today: NaiveDate) -> Result<Digest> {
        progress::step(1, 3, "Forum - Collecting new threads");
        let forum = self.forum_section().await;
        let forum = self.recover(self.assembler.forum_heading(), forum)?;

        progress::step(2, 3, "Price - Fetching market listings");
        let prices = self.price_section().await;
        let prices = self.recover(PRICE_HEADING, prices)?;

        progress::step(3, 3, "Calendar - Scraping coin events");
        let calendar = self.calendar_section().await;
        let calendar = self.recover(CALENDAR_HEADING, calendar)?;

        Ok(Digest {
            subject: format!(
                "{} {}",
                self.config.email.subject_prefix,
                today.format("%Y-%m-%d")
            ),
            sections: vec![forum, prices, calendar],
        })
    }

    /// Turn a source-level failure into a placeholder; pass fatal ones up.
    fn recover(&self, heading: &str, section: Result<DigestSection>) -> Result<DigestSection> {
        match section {
            Ok(section) => Ok(section),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                log::error!("Section '{heading}' unavailable: {e}");
                Ok(self.assembler.render_unavailable(heading))
            }
        }
    }

    async fn forum_section(&self) -> Result<DigestSection> {
        let forum = &self.config.forum;

        // Every group is fetched before anything is recorded, so a failed
        // group never leaves half of the forum committed but unreported.
        let mut threads = Vec::new();
        for group in &forum.groups {
            let payload = self.sources.forum.fetch_listing(group).await?;
            let listing = normalize::normalize_listing(group, &payload, &forum.link_base)?;
            progress::sub_item(&format!("{group}: {} threads", listing.len()));
            threads.extend(listing);
        }

        let novel = NoveltyFilter::new(self.store).filter(threads).await?;
        Ok(self.assembler.render_forum(&novel))
    }

    async fn price_section(&self) -> Result<DigestSection> {
        let payload = self.sources.market.fetch_listings().await?;
        let prices = normalize::normalize_listings(&payload, &self.config.market.symbols)?;
        progress::sub_item(&format!("{} tracked coins", prices.len()));
        Ok(self.assembler.render_prices(&prices))
    }

    async fn calendar_section(&self) -> Result<DigestSection> {
        let mut events = Vec::new();
        for coin in &self.config.calendar.coins {
            let markup = self.sources.calendar.fetch_page(coin).await?;
            let found = self.sources.extractor.extract(coin, &markup);
            progress::sub_item(&format!("{coin}: {} events", found.len()));
            events.extend(found);
        }
        Ok(self.assembler.render_calendar(&events))
    }
}

/// Assemble a digest and deliver it.
///
/// If delivery fails the rendered message is parked in `outbox` (when
/// given) and the delivery error is returned.
pub async fn run_digest(
    orchestrator: &DigestOrchestrator<'_>,
    today: NaiveDate,
    delivery: &dyn DigestDelivery,
    outbox: Option<&Outbox>,
) -> Result<Digest> {
    progress::header(&format!("Daily digest for {today}"));

    let digest = orchestrator.assemble(today).await?;
    let message = digest.to_message();

    if let Err(e) = delivery.deliver(&message).await {
        log::error!("Delivery of '{}' failed: {e}", message.subject);
        if let Some(outbox) = outbox {
            match outbox.park(&message).await {
                Ok(path) => log::warn!("Parked digest at {}", path.display()),
                Err(park_err) => log::error!("Could not park digest: {park_err}"),
            }
        }
        return Err(e);
    }

    let sections: Vec<(&str, String)> = digest
        .sections
        .iter()
        .map(|s| {
            let status = match s.status {
                SectionStatus::Ready { records } => format!("{records} items"),
                SectionStatus::Unavailable => "unavailable".to_string(),
            };
            (s.heading.as_str(), status)
        })
        .collect();
    progress::summary(&digest.subject, &sections);

    if !digest.is_complete() {
        log::error!(
            "Digest delivered without: {}",
            digest.unavailable_sections().join(", ")
        );
    }

    Ok(digest)
}
