//! Per-subscriber detection aggregate
//!
//! `MsisdnDetection` is the deduplicated view the validation engine produces:
//! exactly one row per subscriber appearing in the queried window, regardless
//! of how many rules alerted on it or how many decisions were recorded.

use crate::event::Decision;
use crate::rule::RuleKind;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Which stream(s) a subscriber's aggregate row stems from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionSource {
    AlertOnly,
    DecisionOnly,
    AlertAndDecision,
    NoData,
}

/// One aggregate row per subscriber for a query window.
///
/// The primary rule is the one with the most alerts for this subscriber
/// in-window; ties go to the rule with the most recent alert, then the lowest
/// rule id. `alert_count` covers the primary rule only, while
/// `total_alerts_all_rules` sums across every rule that fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsisdnDetection {
    pub msisdn: String,

    pub primary_rule_id: Option<i32>,
    pub primary_rule_name: Option<String>,
    pub primary_rule_category: Option<String>,
    pub primary_rule_kind: Option<RuleKind>,

    /// Alerts attributed to the primary rule only.
    pub alert_count: u64,
    pub total_alerts_all_rules: u64,
    pub total_rules_triggered: u64,

    pub first_detection_time: Option<NaiveDateTime>,
    pub last_detection_time: Option<NaiveDateTime>,

    pub detection_source: DetectionSource,

    /// Latest decision in-window, if any (ties on time resolve to the highest
    /// surrogate id).
    pub decision_status: Option<Decision>,
    pub decision_time: Option<NaiveDateTime>,
    pub decision_user: Option<String>,
    pub decision_rule_id: Option<i32>,

    /// Narrative summary of how this subscriber ended up in the result.
    pub decision_reason: String,
}

impl MsisdnDetection {
    /// Sort key for the contractual output order: most recently active first,
    /// where activity is the last detection, or the decision time for
    /// decision-only rows.
    pub fn activity_time(&self) -> Option<NaiveDateTime> {
        self.last_detection_time.or(self.decision_time)
    }
}
