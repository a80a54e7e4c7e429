//! Subscriber timeline events
//!
//! A timeline is the chronological merge of one subscriber's alert and
//! decision streams, each entry carrying point-in-time context (how many rules
//! and alerts had fired as of that instant).

use crate::event::Decision;
use crate::rule::RuleKind;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Display severity attached to a timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    Info,
    Warning,
    Danger,
    Success,
}

/// Variant payload of a timeline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimelineEventKind {
    /// One detection batch: a rule firing at one timestamp, possibly several
    /// rows at once.
    Alert {
        rule_id: i32,
        rule_name: String,
        rule_kind: Option<RuleKind>,
        rule_category: String,
        alert_count: u64,
        first_alert_time: NaiveDateTime,
        last_alert_time: NaiveDateTime,
    },
    /// One adjudication, with the decision that immediately preceded it for
    /// the same subscriber (none for the first).
    Decision {
        decision: Decision,
        previous_decision: Option<Decision>,
        decision_user: Option<String>,
        rule_id: Option<i32>,
        rule_name: String,
    },
}

/// One entry in a subscriber's merged history, ordered ascending by
/// `event_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub msisdn: String,
    pub event_time: NaiveDateTime,

    /// Distinct rules that had alerted on this subscriber at or before
    /// `event_time`.
    pub rules_triggered_so_far: u64,
    /// Alert rows recorded for this subscriber at or before `event_time`.
    pub total_alerts_so_far: u64,

    pub description: String,
    pub severity: EventSeverity,

    #[serde(flatten)]
    pub kind: TimelineEventKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn event_kind_serializes_with_tag() {
        let kind = TimelineEventKind::Decision {
            decision: Decision::Block,
            previous_decision: None,
            decision_user: Some("agent1".into()),
            rule_id: None,
            rule_name: "Manual Decision".into(),
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["event_type"], "DECISION");
        assert_eq!(json["decision"], "BLOCK");
        assert!(json["previous_decision"].is_null());
    }

    #[test]
    fn timeline_event_flattens_kind() {
        let event = TimelineEvent {
            msisdn: "20000001".into(),
            event_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
            rules_triggered_so_far: 1,
            total_alerts_so_far: 3,
            description: "Rule 'Wangiri callback' triggered 3 alert(s)".into(),
            severity: EventSeverity::Warning,
            kind: TimelineEventKind::Alert {
                rule_id: 1,
                rule_name: "Wangiri callback".into(),
                rule_kind: Some(RuleKind::Automatic),
                rule_category: "Voice".into(),
                alert_count: 3,
                first_alert_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(8, 30, 0)
                    .unwrap(),
                last_alert_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(8, 30, 0)
                    .unwrap(),
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "ALERT");
        assert_eq!(json["alert_count"], 3);
        assert_eq!(json["severity"], "warning");
    }
}
