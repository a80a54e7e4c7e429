//! Subscriber timeline merging
//!
//! Produces a single time-ascending sequence for one subscriber: detection
//! batches (one entry per rule per detection timestamp) interleaved with
//! decisions, each entry carrying the cumulative rule/alert counts as of its
//! own timestamp.

use chrono::NaiveDateTime;
use fraudval_core::{
    AlertEvent, Decision, DecisionEvent, EventSeverity, Rule, TimelineEvent, TimelineEventKind,
    UNCATEGORIZED,
};
use std::collections::{HashMap, HashSet};

/// Rule name used for decision entries with no triggering rule.
const MANUAL_DECISION: &str = "Manual Decision";

/// Alert batches with more rows than this render as high severity.
const ALERT_BURST_THRESHOLD: u64 = 5;

/// Merge one subscriber's alert and decision history into a chronological
/// timeline.
///
/// `alerts` and `decisions` are that subscriber's rows (any rule), already
/// window-filtered by the caller; the cumulative counters are computed over
/// the rows passed in. An empty input yields an empty timeline, never an
/// error.
///
/// Ordering: ascending by event time; entries at the same instant order
/// alerts before decisions, then by rule id, then by decision id, so replays
/// are byte-identical.
pub fn build_timeline(
    msisdn: &str,
    alerts: &[AlertEvent],
    decisions: &[DecisionEvent],
    rules: &HashMap<i32, Rule>,
) -> Vec<TimelineEvent> {
    // One ALERT entry per (rule, detection timestamp) batch.
    let mut batches: HashMap<(i32, NaiveDateTime), u64> = HashMap::new();
    for alert in alerts.iter().filter(|a| a.msisdn == msisdn) {
        *batches
            .entry((alert.rule_id, alert.detection_time))
            .or_insert(0) += 1;
    }

    enum Entry<'a> {
        Alert {
            rule_id: i32,
            time: NaiveDateTime,
            count: u64,
        },
        Decision {
            event: &'a DecisionEvent,
            previous: Option<Decision>,
        },
    }

    let mut entries: Vec<Entry> = batches
        .iter()
        .map(|(&(rule_id, time), &count)| Entry::Alert {
            rule_id,
            time,
            count,
        })
        .collect();

    // Running previous-decision scan over the time-ordered decision stream.
    let mut ordered_decisions: Vec<&DecisionEvent> =
        decisions.iter().filter(|d| d.msisdn == msisdn).collect();
    ordered_decisions.sort_by_key(|d| (d.decision_time, d.id));
    let mut previous: Option<Decision> = None;
    for event in ordered_decisions {
        entries.push(Entry::Decision { event, previous });
        previous = Some(event.decision);
    }

    entries.sort_by_key(|e| match e {
        Entry::Alert { rule_id, time, .. } => (*time, 0u8, *rule_id, 0i64),
        Entry::Decision { event, .. } => {
            (event.decision_time, 1u8, event.rule_id.unwrap_or(0), event.id)
        }
    });

    // Sweep the subscriber's alert rows in time order to backfill the
    // point-in-time counters without rescanning per event.
    let mut alert_rows: Vec<(NaiveDateTime, i32)> = alerts
        .iter()
        .filter(|a| a.msisdn == msisdn)
        .map(|a| (a.detection_time, a.rule_id))
        .collect();
    alert_rows.sort();
    let mut cursor = 0usize;
    let mut rules_seen: HashSet<i32> = HashSet::new();
    let mut alerts_seen: u64 = 0;

    let mut timeline = Vec::with_capacity(entries.len());
    for entry in entries {
        let event_time = match &entry {
            Entry::Alert { time, .. } => *time,
            Entry::Decision { event, .. } => event.decision_time,
        };
        while cursor < alert_rows.len() && alert_rows[cursor].0 <= event_time {
            rules_seen.insert(alert_rows[cursor].1);
            alerts_seen += 1;
            cursor += 1;
        }

        let event = match entry {
            Entry::Alert {
                rule_id,
                time,
                count,
            } => {
                let rule = rules.get(&rule_id);
                let rule_name = rule
                    .map(|r| r.name.clone())
                    .unwrap_or_else(|| format!("Rule {rule_id}"));
                let rule_category = rule
                    .map(|r| r.category_label().to_string())
                    .unwrap_or_else(|| UNCATEGORIZED.to_string());
                let mut description = format!("Rule '{rule_name}' triggered {count} alert(s)");
                if let Some(category) = rule.and_then(|r| r.category.as_deref()) {
                    description.push_str(&format!(" [{category}]"));
                }
                let severity = if count > ALERT_BURST_THRESHOLD {
                    EventSeverity::Danger
                } else {
                    EventSeverity::Warning
                };
                TimelineEvent {
                    msisdn: msisdn.to_string(),
                    event_time: time,
                    rules_triggered_so_far: rules_seen.len() as u64,
                    total_alerts_so_far: alerts_seen,
                    description,
                    severity,
                    kind: TimelineEventKind::Alert {
                        rule_id,
                        rule_name,
                        rule_kind: rule.map(|r| r.kind),
                        rule_category,
                        alert_count: count,
                        first_alert_time: time,
                        last_alert_time: time,
                    },
                }
            }
            Entry::Decision { event, previous } => {
                let rule = event.rule_id.and_then(|id| rules.get(&id));
                let rule_name = rule
                    .map(|r| r.name.clone())
                    .unwrap_or_else(|| MANUAL_DECISION.to_string());
                let description = decision_description(event, previous);
                let severity = match event.decision {
                    Decision::Block => EventSeverity::Danger,
                    Decision::Whitelist => EventSeverity::Success,
                };
                TimelineEvent {
                    msisdn: msisdn.to_string(),
                    event_time: event.decision_time,
                    rules_triggered_so_far: rules_seen.len() as u64,
                    total_alerts_so_far: alerts_seen,
                    description,
                    severity,
                    kind: TimelineEventKind::Decision {
                        decision: event.decision,
                        previous_decision: previous,
                        decision_user: event.decided_by.clone(),
                        rule_id: event.rule_id,
                        rule_name,
                    },
                }
            }
        };
        timeline.push(event);
    }

    tracing::debug!(msisdn, events = timeline.len(), "built subscriber timeline");
    timeline
}

fn decision_description(event: &DecisionEvent, previous: Option<Decision>) -> String {
    let mut description = format!("MSISDN {}", event.decision.label().to_lowercase());
    if let Some(user) = &event.decided_by {
        description.push_str(&format!(" by {user}"));
    }
    if let Some(prev) = previous {
        description.push_str(&format!(" (previously {})", prev.label().to_lowercase()));
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fraudval_core::RuleKind;

    fn dt(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn alert(id: i64, rule_id: i32, time: NaiveDateTime) -> AlertEvent {
        AlertEvent {
            id,
            msisdn: "20000001".into(),
            rule_id,
            detection_time: time,
        }
    }

    fn decision(id: i64, decision: Decision, time: NaiveDateTime) -> DecisionEvent {
        DecisionEvent {
            id,
            msisdn: "20000001".into(),
            rule_id: None,
            decision,
            decision_time: time,
            decided_by: Some("agent1".into()),
        }
    }

    fn rules() -> HashMap<i32, Rule> {
        [(
            1,
            Rule {
                id: 1,
                name: "Wangiri".into(),
                category: Some("Voice".into()),
                kind: RuleKind::Automatic,
            },
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn events_are_time_ascending() {
        let alerts = vec![
            alert(1, 1, dt(3, 8)),
            alert(2, 1, dt(1, 8)),
            alert(3, 2, dt(2, 8)),
        ];
        let decisions = vec![decision(1, Decision::Block, dt(2, 12))];
        let timeline = build_timeline("20000001", &alerts, &decisions, &rules());
        assert_eq!(timeline.len(), 4);
        for pair in timeline.windows(2) {
            assert!(pair[0].event_time <= pair[1].event_time);
        }
    }

    #[test]
    fn alert_batches_group_by_rule_and_timestamp() {
        // Three rows of rule 1 at the same instant form one entry of count 3;
        // the same rule at a later instant is a separate entry.
        let alerts = vec![
            alert(1, 1, dt(1, 8)),
            alert(2, 1, dt(1, 8)),
            alert(3, 1, dt(1, 8)),
            alert(4, 1, dt(2, 8)),
        ];
        let timeline = build_timeline("20000001", &alerts, &[], &rules());
        assert_eq!(timeline.len(), 2);
        match &timeline[0].kind {
            TimelineEventKind::Alert { alert_count, .. } => assert_eq!(*alert_count, 3),
            other => panic!("expected alert entry, got {other:?}"),
        }
    }

    #[test]
    fn previous_decision_chain() {
        let decisions = vec![
            decision(1, Decision::Block, dt(1, 8)),
            decision(2, Decision::Whitelist, dt(2, 8)),
            decision(3, Decision::Block, dt(3, 8)),
        ];
        let timeline = build_timeline("20000001", &[], &decisions, &rules());
        let previous: Vec<Option<Decision>> = timeline
            .iter()
            .map(|e| match &e.kind {
                TimelineEventKind::Decision {
                    previous_decision, ..
                } => *previous_decision,
                other => panic!("expected decision entry, got {other:?}"),
            })
            .collect();
        assert_eq!(
            previous,
            vec![None, Some(Decision::Block), Some(Decision::Whitelist)]
        );
    }

    #[test]
    fn first_decision_has_no_previous() {
        let decisions = vec![decision(1, Decision::Whitelist, dt(1, 8))];
        let timeline = build_timeline("20000001", &[], &decisions, &rules());
        match &timeline[0].kind {
            TimelineEventKind::Decision {
                previous_decision, ..
            } => assert!(previous_decision.is_none()),
            other => panic!("expected decision entry, got {other:?}"),
        }
    }

    #[test]
    fn cumulative_counters_are_inclusive() {
        let alerts = vec![
            alert(1, 1, dt(1, 8)),
            alert(2, 2, dt(2, 8)),
            alert(3, 1, dt(3, 8)),
        ];
        let decisions = vec![decision(1, Decision::Block, dt(2, 8))];
        let timeline = build_timeline("20000001", &alerts, &decisions, &rules());

        // Decision at dt(2,8): the rule-2 alert at the same instant counts.
        let decision_entry = timeline
            .iter()
            .find(|e| matches!(e.kind, TimelineEventKind::Decision { .. }))
            .unwrap();
        assert_eq!(decision_entry.rules_triggered_so_far, 2);
        assert_eq!(decision_entry.total_alerts_so_far, 2);

        // Final alert sees everything.
        let last = timeline.last().unwrap();
        assert_eq!(last.rules_triggered_so_far, 2);
        assert_eq!(last.total_alerts_so_far, 3);
    }

    #[test]
    fn alerts_sort_before_decisions_at_equal_time() {
        let alerts = vec![alert(1, 1, dt(2, 8))];
        let decisions = vec![decision(1, Decision::Block, dt(2, 8))];
        let timeline = build_timeline("20000001", &alerts, &decisions, &rules());
        assert!(matches!(timeline[0].kind, TimelineEventKind::Alert { .. }));
        assert!(matches!(timeline[1].kind, TimelineEventKind::Decision { .. }));
    }

    #[test]
    fn manual_decision_naming_and_severity() {
        let decisions = vec![decision(1, Decision::Whitelist, dt(1, 8))];
        let timeline = build_timeline("20000001", &[], &decisions, &rules());
        assert_eq!(timeline[0].severity, EventSeverity::Success);
        match &timeline[0].kind {
            TimelineEventKind::Decision { rule_name, .. } => {
                assert_eq!(rule_name, MANUAL_DECISION);
            }
            other => panic!("expected decision entry, got {other:?}"),
        }
        assert_eq!(
            timeline[0].description,
            "MSISDN whitelisted by agent1"
        );
    }

    #[test]
    fn alert_description_brackets_category_only_when_present() {
        let mut rules = rules();
        rules.insert(
            3,
            Rule {
                id: 3,
                name: "IRSF".into(),
                category: None,
                kind: RuleKind::Automatic,
            },
        );
        let alerts = vec![alert(1, 1, dt(1, 8)), alert(2, 3, dt(2, 8))];
        let timeline = build_timeline("20000001", &alerts, &[], &rules);
        assert_eq!(
            timeline[0].description,
            "Rule 'Wangiri' triggered 1 alert(s) [Voice]"
        );
        assert_eq!(timeline[1].description, "Rule 'IRSF' triggered 1 alert(s)");
    }

    #[test]
    fn alert_burst_is_high_severity() {
        let alerts: Vec<AlertEvent> = (0..6).map(|i| alert(i, 1, dt(1, 8))).collect();
        let timeline = build_timeline("20000001", &alerts, &[], &rules());
        assert_eq!(timeline[0].severity, EventSeverity::Danger);
    }

    #[test]
    fn empty_input_yields_empty_timeline() {
        let timeline = build_timeline("20000001", &[], &[], &rules());
        assert!(timeline.is_empty());
    }

    #[test]
    fn other_subscribers_rows_are_ignored() {
        let mut foreign = alert(1, 1, dt(1, 8));
        foreign.msisdn = "99999999".into();
        let timeline = build_timeline("20000001", &[foreign], &[], &rules());
        assert!(timeline.is_empty());
    }
}
