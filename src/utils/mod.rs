//! Utility functions and helpers.

pub mod http;
pub mod log;

use url::Url;

use crate::error::Result;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Append percent-encoded path segments to a base URL.
pub fn append_segments(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://reddit.com").unwrap();
        assert_eq!(
            resolve_url(&base, "/r/rust/comments/abc/title/"),
            "https://reddit.com/r/rust/comments/abc/title/"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_append_segments() {
        let url = append_segments("https://www.reddit.com", &["r", "rust.json"]).unwrap();
        assert_eq!(url.as_str(), "https://www.reddit.com/r/rust.json");

        let url = append_segments("https://coinmarketcal.com/en/coin/", &["bitcoin"]).unwrap();
        assert_eq!(url.as_str(), "https://coinmarketcal.com/en/coin/bitcoin");
    }

    #[test]
    fn test_append_segments_encodes() {
        let url = append_segments("https://example.com/coin", &["a b"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/coin/a%20b");
    }

    #[test]
    fn test_append_segments_rejects_relative_base() {
        assert!(append_segments("not a url", &["x"]).is_err());
    }
}
