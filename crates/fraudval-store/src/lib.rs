//! Store abstraction for the fraud rule validation engine
//!
//! This crate defines the three read-only accessors the validation engine
//! needs — alerts, decisions, and rule reference data — and two backends:
//!
//! - [`MemoryStore`]: in-memory datasets, used by tests and anywhere the join
//!   logic must run without a live database
//! - [`PostgresStore`]: PostgreSQL backend with parameterized queries
//!   (behind the `postgres` feature)
//!
//! Both backends honor the same contracts: whole-day window semantics,
//! first-class latest-decision-per-subscriber resolution, and no silently
//! dropped rows.
//!
//! # Example
//!
//! ```
//! use fraudval_store::{AlertStore, MemoryStore};
//! use fraudval_core::QueryWindow;
//! use chrono::NaiveDate;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let store = MemoryStore::new();
//! let window = QueryWindow::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//! )?;
//! let alerts = store.alerts_for_rules(&[1, 2], &window).await?;
//! assert!(alerts.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod memory;
pub mod traits;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::{AlertStore, DecisionStore, RuleStore};

#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
