//! Per-rule credibility aggregate

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Round to two decimal places, the precision used by every percentage and
/// rate in the credibility report.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Efficiency band derived from the credibility percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CredibilityRating {
    Excellent,
    Good,
    Average,
    Fair,
    Poor,
}

impl CredibilityRating {
    /// Band thresholds: >= 80 EXCELLENT, >= 60 GOOD, >= 40 AVERAGE,
    /// >= 20 FAIR, else POOR.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            CredibilityRating::Excellent
        } else if percentage >= 60.0 {
            CredibilityRating::Good
        } else if percentage >= 40.0 {
            CredibilityRating::Average
        } else if percentage >= 20.0 {
            CredibilityRating::Fair
        } else {
            CredibilityRating::Poor
        }
    }
}

/// One credibility aggregate per rule for a query window.
///
/// Computed independently per rule: the same subscriber can contribute to
/// several rules' counters here even though the detection view deduplicates
/// it to one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCredibilityAnalysis {
    pub rule_id: i32,
    pub rule_name: String,
    pub rule_category: String,

    pub period_start: NaiveDate,
    pub period_end: NaiveDate,

    /// Distinct subscribers alerted by this rule in-window.
    pub total_msisdns_detected: u64,
    pub total_alerts: u64,

    /// Detected subscribers with any in-window decision.
    pub total_decisions: u64,
    /// Detected subscribers with any in-window BLOCK decision.
    pub fraudulent_msisdns: u64,
    /// Detected subscribers with any in-window WHITELIST decision.
    pub whitelisted_msisdns: u64,
    pub pending_msisdns: u64,

    pub first_alert: Option<NaiveDateTime>,
    pub last_alert: Option<NaiveDateTime>,

    /// `fraudulent / total_detected * 100`, two decimals, 0 when nothing was
    /// detected.
    pub credibility_percentage: f64,
    pub decision_rate: f64,
    pub average_alerts_per_day: f64,

    pub rating: CredibilityRating,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_band_edges_are_exact() {
        assert_eq!(
            CredibilityRating::from_percentage(100.0),
            CredibilityRating::Excellent
        );
        assert_eq!(
            CredibilityRating::from_percentage(80.0),
            CredibilityRating::Excellent
        );
        assert_eq!(
            CredibilityRating::from_percentage(79.99),
            CredibilityRating::Good
        );
        assert_eq!(
            CredibilityRating::from_percentage(60.0),
            CredibilityRating::Good
        );
        assert_eq!(
            CredibilityRating::from_percentage(40.0),
            CredibilityRating::Average
        );
        assert_eq!(
            CredibilityRating::from_percentage(20.0),
            CredibilityRating::Fair
        );
        assert_eq!(
            CredibilityRating::from_percentage(19.99),
            CredibilityRating::Poor
        );
        assert_eq!(
            CredibilityRating::from_percentage(0.0),
            CredibilityRating::Poor
        );
    }

    #[test]
    fn round2_half_up() {
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(100.0), 100.0);
    }
}
