//! Rule credibility analysis
//!
//! Scores each rule independently over a window: how many distinct
//! subscribers it alerted on, and what fraction of those were later confirmed
//! as fraud (blocked). Unlike the MSISDN aggregation there is no cross-rule
//! deduplication here; one subscriber can contribute to several rules.

use chrono::NaiveDateTime;
use fraudval_core::{
    round2, AlertEvent, CredibilityRating, Decision, DecisionEvent, QueryWindow, Rule,
    RuleCredibilityAnalysis, UNCATEGORIZED,
};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Compute one credibility aggregate per requested rule id.
///
/// `alerts` must be filtered to the requested rules and window; `decisions`
/// are window-filtered only. The blocked/whitelisted joins match on
/// subscriber alone — a decision "counts" for a rule once that rule alerted
/// on the subscriber, even when the decision references a different rule (or
/// none). Duplicate rule ids are collapsed; output is ordered by rule id.
pub fn analyze_rules(
    rule_ids: &[i32],
    rules: &HashMap<i32, Rule>,
    alerts: &[AlertEvent],
    decisions: &[DecisionEvent],
    window: &QueryWindow,
) -> Vec<RuleCredibilityAnalysis> {
    let decided: HashSet<&str> = decisions.iter().map(|d| d.msisdn.as_str()).collect();
    let blocked: HashSet<&str> = decisions
        .iter()
        .filter(|d| d.decision == Decision::Block)
        .map(|d| d.msisdn.as_str())
        .collect();
    let whitelisted: HashSet<&str> = decisions
        .iter()
        .filter(|d| d.decision == Decision::Whitelist)
        .map(|d| d.msisdn.as_str())
        .collect();

    let requested: BTreeSet<i32> = rule_ids.iter().copied().collect();

    requested
        .into_iter()
        .map(|rule_id| analyze_one(rule_id, rules, alerts, &decided, &blocked, &whitelisted, window))
        .collect()
}

fn analyze_one(
    rule_id: i32,
    rules: &HashMap<i32, Rule>,
    alerts: &[AlertEvent],
    decided: &HashSet<&str>,
    blocked: &HashSet<&str>,
    whitelisted: &HashSet<&str>,
    window: &QueryWindow,
) -> RuleCredibilityAnalysis {
    let mut detected: HashSet<&str> = HashSet::new();
    let mut total_alerts: u64 = 0;
    let mut first_alert: Option<NaiveDateTime> = None;
    let mut last_alert: Option<NaiveDateTime> = None;

    for alert in alerts.iter().filter(|a| a.rule_id == rule_id) {
        detected.insert(alert.msisdn.as_str());
        total_alerts += 1;
        first_alert = Some(match first_alert {
            Some(t) if t <= alert.detection_time => t,
            _ => alert.detection_time,
        });
        last_alert = Some(match last_alert {
            Some(t) if t >= alert.detection_time => t,
            _ => alert.detection_time,
        });
    }

    let total_detected = detected.len() as u64;
    let total_decisions = detected.iter().filter(|m| decided.contains(*m)).count() as u64;
    let fraudulent = detected.iter().filter(|m| blocked.contains(*m)).count() as u64;
    let whitelisted_count = detected.iter().filter(|m| whitelisted.contains(*m)).count() as u64;
    let pending = total_detected - total_decisions;

    let credibility_percentage = if total_detected > 0 {
        round2(fraudulent as f64 / total_detected as f64 * 100.0)
    } else {
        0.0
    };
    let decision_rate = if total_detected > 0 {
        round2(total_decisions as f64 / total_detected as f64 * 100.0)
    } else {
        0.0
    };
    let average_alerts_per_day = match (first_alert, last_alert) {
        (Some(first), Some(last)) => {
            let days = (last.date() - first.date()).num_days() + 1;
            round2(total_alerts as f64 / days as f64)
        }
        _ => 0.0,
    };

    let (rule_name, rule_category) = match rules.get(&rule_id) {
        Some(rule) => (rule.name.clone(), rule.category_label().to_string()),
        // Requested id with no reference row still gets an aggregate.
        None => (format!("Rule {rule_id}"), UNCATEGORIZED.to_string()),
    };

    RuleCredibilityAnalysis {
        rule_id,
        rule_name,
        rule_category,
        period_start: window.start_date(),
        period_end: window.end_date(),
        total_msisdns_detected: total_detected,
        total_alerts,
        total_decisions,
        fraudulent_msisdns: fraudulent,
        whitelisted_msisdns: whitelisted_count,
        pending_msisdns: pending,
        first_alert,
        last_alert,
        credibility_percentage,
        decision_rate,
        average_alerts_per_day,
        rating: CredibilityRating::from_percentage(credibility_percentage),
    }
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

    fn window() -> QueryWindow {
        QueryWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    fn alert(id: i64, msisdn: &str, rule_id: i32, time: NaiveDateTime) -> AlertEvent {
        AlertEvent {
            id,
            msisdn: msisdn.into(),
            rule_id,
            detection_time: time,
        }
    }

    fn decision(id: i64, msisdn: &str, decision: Decision, time: NaiveDateTime) -> DecisionEvent {
        DecisionEvent {
            id,
            msisdn: msisdn.into(),
            rule_id: None,
            decision,
            decision_time: time,
            decided_by: None,
        }
    }

    fn rules() -> HashMap<i32, Rule> {
        [
            (
                1,
                Rule {
                    id: 1,
                    name: "Wangiri".into(),
                    category: Some("Voice".into()),
                    kind: RuleKind::Automatic,
                },
            ),
            (
                2,
                Rule {
                    id: 2,
                    name: "SIM box".into(),
                    category: None,
                    kind: RuleKind::Automatic,
                },
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn basic_ratio_and_rating() {
        let alerts = vec![
            alert(1, "1001", 1, dt(1, 8)),
            alert(2, "1002", 1, dt(2, 8)),
            alert(3, "1003", 1, dt(3, 8)),
            alert(4, "1004", 1, dt(4, 8)),
        ];
        let decisions = vec![
            decision(1, "1001", Decision::Block, dt(5, 8)),
            decision(2, "1002", Decision::Block, dt(5, 9)),
            decision(3, "1003", Decision::Block, dt(5, 10)),
            decision(4, "1004", Decision::Whitelist, dt(5, 11)),
        ];
        let out = analyze_rules(&[1], &rules(), &alerts, &decisions, &window());
        assert_eq!(out.len(), 1);
        let a = &out[0];
        assert_eq!(a.total_msisdns_detected, 4);
        assert_eq!(a.fraudulent_msisdns, 3);
        assert_eq!(a.whitelisted_msisdns, 1);
        assert_eq!(a.total_decisions, 4);
        assert_eq!(a.pending_msisdns, 0);
        assert_eq!(a.credibility_percentage, 75.0);
        assert_eq!(a.decision_rate, 100.0);
        assert_eq!(a.rating, CredibilityRating::Good);
    }

    #[test]
    fn zero_alert_rule_scores_zero_not_nan() {
        let out = analyze_rules(&[2], &rules(), &[], &[], &window());
        let a = &out[0];
        assert_eq!(a.total_msisdns_detected, 0);
        assert_eq!(a.credibility_percentage, 0.0);
        assert_eq!(a.decision_rate, 0.0);
        assert_eq!(a.average_alerts_per_day, 0.0);
        assert_eq!(a.rating, CredibilityRating::Poor);
        assert!(a.first_alert.is_none());
    }

    #[test]
    fn credibility_stays_within_bounds() {
        let alerts = vec![alert(1, "1001", 1, dt(1, 8))];
        let decisions = vec![decision(1, "1001", Decision::Block, dt(2, 8))];
        let out = analyze_rules(&[1, 2], &rules(), &alerts, &decisions, &window());
        for a in &out {
            assert!(a.credibility_percentage >= 0.0);
            assert!(a.credibility_percentage <= 100.0);
        }
    }

    #[test]
    fn decision_on_other_rule_still_counts() {
        // The decision references no rule at all; the subscriber was alerted
        // by rule 1, so rule 1 gets the credit.
        let alerts = vec![alert(1, "1001", 1, dt(1, 8))];
        let decisions = vec![decision(1, "1001", Decision::Block, dt(2, 8))];
        let out = analyze_rules(&[1], &rules(), &alerts, &decisions, &window());
        assert_eq!(out[0].fraudulent_msisdns, 1);
        assert_eq!(out[0].credibility_percentage, 100.0);
    }

    #[test]
    fn same_subscriber_counts_for_every_alerting_rule() {
        let alerts = vec![
            alert(1, "1001", 1, dt(1, 8)),
            alert(2, "1001", 2, dt(1, 9)),
        ];
        let decisions = vec![decision(1, "1001", Decision::Block, dt(2, 8))];
        let out = analyze_rules(&[1, 2], &rules(), &alerts, &decisions, &window());
        assert_eq!(out[0].fraudulent_msisdns, 1);
        assert_eq!(out[1].fraudulent_msisdns, 1);
    }

    #[test]
    fn block_and_whitelist_both_count_for_one_subscriber() {
        // "Any decision" semantics: a subscriber with both outcomes in-window
        // contributes to both counters.
        let alerts = vec![alert(1, "1001", 1, dt(1, 8))];
        let decisions = vec![
            decision(1, "1001", Decision::Block, dt(2, 8)),
            decision(2, "1001", Decision::Whitelist, dt(3, 8)),
        ];
        let out = analyze_rules(&[1], &rules(), &alerts, &decisions, &window());
        assert_eq!(out[0].fraudulent_msisdns, 1);
        assert_eq!(out[0].whitelisted_msisdns, 1);
        assert_eq!(out[0].total_decisions, 1);
    }

    #[test]
    fn average_alerts_per_day_spans_first_to_last() {
        let alerts = vec![
            alert(1, "1001", 1, dt(1, 8)),
            alert(2, "1002", 1, dt(1, 9)),
            alert(3, "1003", 1, dt(3, 8)),
        ];
        let out = analyze_rules(&[1], &rules(), &alerts, &[], &window());
        // 3 alerts over 3 days (Jan 1 through Jan 3)
        assert_eq!(out[0].average_alerts_per_day, 1.0);
    }

    #[test]
    fn duplicate_rule_ids_collapse() {
        let out = analyze_rules(&[1, 1, 1], &rules(), &[], &[], &window());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn unknown_rule_id_gets_fallback_name() {
        let out = analyze_rules(&[42], &rules(), &[], &[], &window());
        assert_eq!(out[0].rule_name, "Rule 42");
        assert_eq!(out[0].rule_category, UNCATEGORIZED);
    }
}
