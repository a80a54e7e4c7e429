//! Pure aggregation engine for fraud rule validation
//!
//! Everything in this crate is deterministic compute over typed rows fetched
//! by the store layer: no I/O, no clock reads. The three entry points mirror
//! the three analyses the validation service exposes:
//!
//! - [`aggregate_msisdns`]: one deduplicated row per subscriber over the
//!   union of alerted and decided subscribers
//! - [`analyze_rules`]: per-rule credibility scoring over a window
//! - [`build_timeline`]: a single subscriber's merged alert/decision history

pub mod aggregate;
pub mod credibility;
pub mod timeline;

pub use aggregate::aggregate_msisdns;
pub use credibility::analyze_rules;
pub use timeline::build_timeline;
