//! Pipeline entry points for digest operations.
//!
//! - `run_digest`: Collect all sources, render, and deliver one digest
//! - `run_resend`: Retry delivery of digests parked in the outbox

pub mod cycle;
pub mod novelty;
pub mod report;
pub mod resend;

pub use cycle::{DigestOrchestrator, Sources, run_digest};
pub use novelty::NoveltyFilter;
pub use report::ReportAssembler;
pub use resend::run_resend;
