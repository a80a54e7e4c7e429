//! MSISDN aggregation
//!
//! Reconciles the alert and decision streams into exactly one row per
//! subscriber: the union of everyone alerted in-window and everyone decided
//! in-window, with the primary rule resolved deterministically and the latest
//! decision joined in.

use chrono::NaiveDateTime;
use fraudval_core::{
    AlertEvent, DecisionEvent, DetectionSource, MsisdnDetection, Rule,
};
use std::collections::{BTreeSet, HashMap};

/// Per-subscriber rollup of the alert stream.
#[derive(Debug, Default)]
struct AlertAggregate {
    /// rule id -> (alert count, most recent detection for that rule)
    per_rule: HashMap<i32, (u64, NaiveDateTime)>,
    total_alerts: u64,
    first_detection: Option<NaiveDateTime>,
    last_detection: Option<NaiveDateTime>,
}

impl AlertAggregate {
    fn record(&mut self, alert: &AlertEvent) {
        let entry = self
            .per_rule
            .entry(alert.rule_id)
            .or_insert((0, alert.detection_time));
        entry.0 += 1;
        if alert.detection_time > entry.1 {
            entry.1 = alert.detection_time;
        }
        self.total_alerts += 1;
        self.first_detection = Some(match self.first_detection {
            Some(t) if t <= alert.detection_time => t,
            _ => alert.detection_time,
        });
        self.last_detection = Some(match self.last_detection {
            Some(t) if t >= alert.detection_time => t,
            _ => alert.detection_time,
        });
    }

    /// Primary rule: most alerts, then most recent alert, then lowest rule id
    /// so reruns always pick the same rule.
    fn primary_rule(&self) -> Option<(i32, u64)> {
        self.per_rule
            .iter()
            .map(|(rule_id, (count, last))| (*rule_id, *count, *last))
            .max_by_key(|(rule_id, count, last)| (*count, *last, std::cmp::Reverse(*rule_id)))
            .map(|(rule_id, count, _)| (rule_id, count))
    }
}

/// Collapse the two streams into one deduplicated row per subscriber.
///
/// `alerts` must already be filtered to the validated rule set and window;
/// `decisions` must be window-filtered only — deliberately not rule-filtered,
/// so subscribers decided under an out-of-scope rule (or no rule) still
/// surface. Only the latest decision per subscriber is used; if several are
/// passed for one subscriber, the latest by time (then highest id) wins.
///
/// Output is ordered most-recently-active first: descending by the last
/// detection, or the decision time when no alert exists, with ties broken by
/// subscriber id ascending. This ordering is the pagination contract.
pub fn aggregate_msisdns(
    alerts: &[AlertEvent],
    decisions: &[DecisionEvent],
    rules: &HashMap<i32, Rule>,
) -> Vec<MsisdnDetection> {
    let mut aggregates: HashMap<&str, AlertAggregate> = HashMap::new();
    for alert in alerts {
        aggregates
            .entry(alert.msisdn.as_str())
            .or_default()
            .record(alert);
    }

    let mut latest: HashMap<&str, &DecisionEvent> = HashMap::new();
    for decision in decisions {
        match latest.get(decision.msisdn.as_str()) {
            Some(current)
                if (current.decision_time, current.id) >= (decision.decision_time, decision.id) => {
            }
            _ => {
                latest.insert(decision.msisdn.as_str(), decision);
            }
        }
    }

    let subscribers: BTreeSet<&str> = aggregates
        .keys()
        .copied()
        .chain(latest.keys().copied())
        .collect();

    let mut detections: Vec<MsisdnDetection> = subscribers
        .into_iter()
        .map(|msisdn| build_detection(msisdn, aggregates.get(msisdn), latest.get(msisdn).copied(), rules))
        .collect();

    detections.sort_by(|a, b| {
        b.activity_time()
            .cmp(&a.activity_time())
            .then_with(|| a.msisdn.cmp(&b.msisdn))
    });

    tracing::debug!(
        subscribers = detections.len(),
        alerts = alerts.len(),
        "aggregated msisdn detections"
    );

    detections
}

fn build_detection(
    msisdn: &str,
    aggregate: Option<&AlertAggregate>,
    decision: Option<&DecisionEvent>,
    rules: &HashMap<i32, Rule>,
) -> MsisdnDetection {
    let primary = aggregate.and_then(AlertAggregate::primary_rule);
    let primary_rule = primary.and_then(|(rule_id, _)| rules.get(&rule_id));

    let detection_source = match (aggregate, decision) {
        (Some(_), Some(_)) => DetectionSource::AlertAndDecision,
        (Some(_), None) => DetectionSource::AlertOnly,
        (None, Some(_)) => DetectionSource::DecisionOnly,
        (None, None) => DetectionSource::NoData,
    };

    let total_rules_triggered = aggregate.map_or(0, |a| a.per_rule.len() as u64);
    let total_alerts_all_rules = aggregate.map_or(0, |a| a.total_alerts);

    let decision_reason = build_decision_reason(
        decision,
        rules,
        total_rules_triggered,
        total_alerts_all_rules,
    );

    MsisdnDetection {
        msisdn: msisdn.to_string(),
        primary_rule_id: primary.map(|(rule_id, _)| rule_id),
        primary_rule_name: primary_rule.map(|r| r.name.clone()),
        primary_rule_category: primary_rule.map(|r| r.category_label().to_string()),
        primary_rule_kind: primary_rule.map(|r| r.kind),
        alert_count: primary.map_or(0, |(_, count)| count),
        total_alerts_all_rules,
        total_rules_triggered,
        first_detection_time: aggregate.and_then(|a| a.first_detection),
        last_detection_time: aggregate.and_then(|a| a.last_detection),
        detection_source,
        decision_status: decision.map(|d| d.decision),
        decision_time: decision.map(|d| d.decision_time),
        decision_user: decision.and_then(|d| d.decided_by.clone()),
        decision_rule_id: decision.and_then(|d| d.rule_id),
        decision_reason,
    }
}

/// Narrative summary shown alongside each aggregate row, e.g.
/// `Blocked by agent1 after 2 rule(s) triggered 4 alert(s)`.
fn build_decision_reason(
    decision: Option<&DecisionEvent>,
    rules: &HashMap<i32, Rule>,
    total_rules_triggered: u64,
    total_alerts: u64,
) -> String {
    match decision {
        Some(d) => {
            let mut reason = String::from(d.decision.label());
            let decision_rule = d.rule_id.and_then(|id| rules.get(&id));
            if let Some(rule) = decision_rule {
                reason.push_str(&format!(" by rule '{}'", rule.name));
            } else if let Some(user) = &d.decided_by {
                reason.push_str(&format!(" by {user}"));
            }
            reason.push_str(&format!(
                " after {total_rules_triggered} rule(s) triggered {total_alerts} alert(s)"
            ));
            reason
        }
        None => format!(
            "Pending decision. Triggered by {total_rules_triggered} rule(s) with {total_alerts} alert(s)"
        ),
    }
}
