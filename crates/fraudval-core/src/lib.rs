//! Core types for the fraud rule validation engine
//!
//! This crate holds the domain model shared by every layer: the two immutable
//! event streams (alerts, decisions), rule reference data, query windows, and
//! the derived aggregates (per-subscriber detections, per-rule credibility,
//! subscriber timelines). Derived records are computed fresh per request and
//! never persisted.

pub mod credibility;
pub mod detection;
pub mod error;
pub mod event;
pub mod rule;
pub mod timeline;
pub mod window;

pub use credibility::{round2, CredibilityRating, RuleCredibilityAnalysis};
pub use detection::{DetectionSource, MsisdnDetection};
pub use error::{CoreError, Result};
pub use event::{AlertEvent, Decision, DecisionEvent, DecisionStatusFilter};
pub use rule::{Rule, RuleKind, UNCATEGORIZED};
pub use timeline::{EventSeverity, TimelineEvent, TimelineEventKind};
pub use window::{OpenWindow, QueryWindow};
