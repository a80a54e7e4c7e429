//! Alert and decision event records
//!
//! Both streams are append-only and produced outside this engine: alerts by the
//! automated detection pipeline, decisions by analysts (or automated blocking).
//! The engine only ever reads them.

use crate::error::{CoreError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One automated fraud-detection hit: a rule fired for a subscriber at a
/// point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Surrogate row id.
    pub id: i64,
    /// Subscriber identity (phone number).
    pub msisdn: String,
    pub rule_id: i32,
    pub detection_time: NaiveDateTime,
}

/// Adjudication outcome for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Block,
    Whitelist,
}

impl Decision {
    /// Decode a stored decision code. The store keeps legacy single-letter
    /// codes (`D` for blocked, `W` for whitelisted) alongside the full words.
    pub fn from_code(code: &str) -> Result<Self> {
        match code.trim() {
            "D" | "BLOCK" => Ok(Decision::Block),
            "W" | "WHITELIST" => Ok(Decision::Whitelist),
            other => Err(CoreError::UnknownDecisionCode(other.to_string())),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Decision::Block => "D",
            Decision::Whitelist => "W",
        }
    }

    /// Human-readable label used in narratives and exports.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Block => "Blocked",
            Decision::Whitelist => "Whitelisted",
        }
    }
}

/// One manual or automated adjudication for a subscriber.
///
/// `rule_id` is optional: a manual decision may have no triggering rule.
/// Several decisions can exist per subscriber over time; only the most recent
/// by `decision_time` is authoritative (ties resolve to the highest `id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionEvent {
    /// Surrogate row id; also the tie-breaker for equal decision times.
    pub id: i64,
    pub msisdn: String,
    pub rule_id: Option<i32>,
    pub decision: Decision,
    pub decision_time: NaiveDateTime,
    pub decided_by: Option<String>,
}

/// Filter over a subscriber's latest decision status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatusFilter {
    Block,
    Whitelist,
    /// No decision recorded yet.
    Pending,
}

impl DecisionStatusFilter {
    pub fn matches(&self, latest: Option<Decision>) -> bool {
        match (self, latest) {
            (DecisionStatusFilter::Block, Some(Decision::Block)) => true,
            (DecisionStatusFilter::Whitelist, Some(Decision::Whitelist)) => true,
            (DecisionStatusFilter::Pending, None) => true,
            _ => false,
        }
    }
}
