//! Reader trait definitions
//!
//! Three read-only accessors over the relational store:
//!
//! - [`AlertStore`]: the append-only alert stream
//! - [`DecisionStore`]: the append-only decision stream
//! - [`RuleStore`]: rule reference data
//!
//! All windowed queries use whole-day semantics (see
//! [`QueryWindow`](fraudval_core::QueryWindow)). Implementations must never
//! drop rows silently: any failure surfaces as a [`StoreError`](crate::StoreError)
//! and the whole operation fails.
//!
//! Reads within one logical operation should come from a consistent snapshot;
//! read-committed isolation is sufficient. Appends landing inside an in-flight
//! window may or may not be visible, which is acceptable for these
//! time-windowed aggregations.

use async_trait::async_trait;
use fraudval_core::{AlertEvent, DecisionEvent, OpenWindow, QueryWindow, Rule};

use crate::StoreResult;

/// Read-only access to the alert stream.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// All alerts raised by any of `rule_ids` inside the window.
    ///
    /// `rule_ids` must be non-empty; an empty set is a caller error and
    /// yields [`StoreError::InvalidQuery`](crate::StoreError::InvalidQuery).
    async fn alerts_for_rules(
        &self,
        rule_ids: &[i32],
        window: &QueryWindow,
    ) -> StoreResult<Vec<AlertEvent>>;

    /// All alerts for one subscriber (any rule), optionally bounded in time.
    async fn alerts_for_msisdn(
        &self,
        msisdn: &str,
        window: &OpenWindow,
    ) -> StoreResult<Vec<AlertEvent>>;
}

/// Read-only access to the decision stream.
#[async_trait]
pub trait DecisionStore: Send + Sync {
    /// Every decision recorded inside the window, for any subscriber and any
    /// rule. Deliberately not filterable by rule id: a decision may reference
    /// a rule outside the set being validated, or none at all.
    async fn decisions_in_window(&self, window: &QueryWindow) -> StoreResult<Vec<DecisionEvent>>;

    /// The most recent decision per subscriber inside the window, resolved by
    /// the store itself (it participates in a join, not a post-fetch pass).
    ///
    /// Ordering contract: latest `decision_time` wins; equal times resolve to
    /// the highest surrogate id. At most one row per subscriber.
    async fn latest_decisions(&self, window: &QueryWindow) -> StoreResult<Vec<DecisionEvent>>;

    /// All decisions for one subscriber, optionally bounded in time, ordered
    /// ascending by decision time (ties by id).
    async fn decisions_for_msisdn(
        &self,
        msisdn: &str,
        window: &OpenWindow,
    ) -> StoreResult<Vec<DecisionEvent>>;
}

/// Read-only access to rule reference data.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Reference rows for the given rule ids. Unknown ids are simply absent
    /// from the result; that is not an error.
    async fn rules_by_ids(&self, rule_ids: &[i32]) -> StoreResult<Vec<Rule>>;
}
