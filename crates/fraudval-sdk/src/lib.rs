//! Rule validation and credibility analysis engine
//!
//! Entry point for the fraud rule validation service: given a set of
//! detection rules and a calendar-date window, it reconciles the alert and
//! decision streams into deduplicated per-subscriber detections, scores each
//! rule's credibility (share of alerted subscribers later confirmed as
//! fraud), and reconstructs full subscriber histories.
//!
//! ```
//! use fraudval_sdk::{ValidationEngine, ValidationRequest};
//! use fraudval_store::MemoryStore;
//! use chrono::NaiveDate;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let engine = ValidationEngine::builder()
//!     .with_memory_store(MemoryStore::new())
//!     .build()?;
//!
//! let request = ValidationRequest::new(
//!     vec![1, 2],
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//! );
//! let report = engine.validate_rules(&request).await?;
//! assert!(report.detections.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod request;
pub mod response;

pub use builder::ValidationEngineBuilder;
pub use engine::ValidationEngine;
pub use error::{Result, ValidationError};
pub use request::{DetectionQuery, ValidationRequest};
pub use response::{Page, SummaryStatistics, ValidationReport};

pub use fraudval_core::{
    AlertEvent, CredibilityRating, Decision, DecisionEvent, DecisionStatusFilter, DetectionSource,
    MsisdnDetection, OpenWindow, QueryWindow, Rule, RuleCredibilityAnalysis, RuleKind,
    TimelineEvent, TimelineEventKind,
};
pub use fraudval_store::MemoryStore;
