// src/normalize/forum.rs

//! Forum listing normalizer.

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::ThreadRecord;
use crate::utils::resolve_url;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    created: f64,
    title: String,
    permalink: String,
}

/// Normalize one group's listing payload into thread records.
///
/// `created` is converted to a calendar date in UTC, and permalinks are
/// resolved against `link_base`.
pub fn normalize_listing(group: &str, payload: &str, link_base: &str) -> Result<Vec<ThreadRecord>> {
    let listing: Listing = serde_json::from_str(payload)
        .map_err(|e| AppError::fetch(format!("forum group '{group}'"), e))?;
    let base = Url::parse(link_base)?;

    let mut threads = Vec::with_capacity(listing.data.children.len());
    for (index, child) in listing.data.children.into_iter().enumerate() {
        let post = match serde_json::from_value::<Child>(child) {
            Ok(child) => child.data,
            Err(e) => {
                log::warn!("Skipping malformed post #{index} in '{group}': {e}");
                continue;
            }
        };

        let Some(created) = DateTime::from_timestamp(post.created as i64, 0) else {
            log::warn!(
                "Skipping post #{index} in '{group}': timestamp {} out of range",
                post.created
            );
            continue;
        };

        threads.push(ThreadRecord {
            source_group: group.to_string(),
            observed_date: created.date_naive(),
            title: post.title.trim().to_string(),
            url: resolve_url(&base, &post.permalink),
        });
    }

    log::debug!("Normalized {} threads from '{group}'", threads.len());
    Ok(threads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const PAYLOAD: &str = r#"{
        "kind": "Listing",
        "data": {
            "children": [
                {"kind": "t3", "data": {"created": 1709251200.0, "title": "  Weekly thread ", "permalink": "/r/rust/comments/a1/weekly/"}},
                {"kind": "t3", "data": {"title": "no timestamp", "permalink": "/r/rust/comments/a2/x/"}},
                {"kind": "t3", "data": {"created": 1709337599.9, "title": "Late post", "permalink": "/r/rust/comments/a3/late/"}}
            ]
        }
    }"#;

    #[test]
    fn test_normalize_listing() {
        let threads = normalize_listing("rust", PAYLOAD, "https://reddit.com").unwrap();
        assert_eq!(threads.len(), 2);

        assert_eq!(threads[0].source_group, "rust");
        assert_eq!(threads[0].title, "Weekly thread");
        assert_eq!(
            threads[0].observed_date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(
            threads[0].url,
            "https://reddit.com/r/rust/comments/a1/weekly/"
        );

        // fractional seconds truncate, still the same UTC day
        assert_eq!(threads[1].title, "Late post");
        assert_eq!(
            threads[1].observed_date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_empty_listing() {
        let payload = r#"{"data": {"children": []}}"#;
        assert!(normalize_listing("rust", payload, "https://reddit.com").unwrap().is_empty());
    }

    #[test]
    fn test_bad_envelope_is_source_error() {
        let err = normalize_listing("rust", "<html>rate limited</html>", "https://reddit.com")
            .unwrap_err();
        assert!(matches!(err, AppError::Fetch { .. }));
        assert!(!err.is_fatal());
    }
}
