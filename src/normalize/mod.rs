//! Source normalizers.
//!
//! Each normalizer turns one raw payload into records, keeping the source's
//! order and doing only structural extraction and type coercion.
//!
//! Failure is two-level: an unusable envelope is an error for the whole
//! source, while a malformed item is logged and skipped so its siblings
//! still come through.

pub mod calendar;
pub mod forum;
pub mod market;

pub use calendar::{CalendarExtractor, CoinMarketCalExtractor};
pub use forum::normalize_listing;
pub use market::normalize_listings;
