//! In-memory store backend
//!
//! Holds the three datasets as plain vectors and answers every reader query
//! without I/O. This is the backend the aggregation logic is unit-tested
//! against; it implements the exact same contracts as the database backend,
//! including latest-decision resolution and the empty-rule-set guard.

use async_trait::async_trait;
use fraudval_core::{AlertEvent, DecisionEvent, OpenWindow, QueryWindow, Rule};
use std::collections::HashMap;

use crate::error::{StoreError, StoreResult};
use crate::traits::{AlertStore, DecisionStore, RuleStore};

/// In-memory backend over fixed alert/decision/rule datasets.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    alerts: Vec<AlertEvent>,
    decisions: Vec<DecisionEvent>,
    rules: Vec<Rule>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alerts(mut self, alerts: Vec<AlertEvent>) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn with_decisions(mut self, decisions: Vec<DecisionEvent>) -> Self {
        self.decisions = decisions;
        self
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn push_alert(&mut self, alert: AlertEvent) {
        self.alerts.push(alert);
    }

    pub fn push_decision(&mut self, decision: DecisionEvent) {
        self.decisions.push(decision);
    }

    pub fn push_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn alerts_for_rules(
        &self,
        rule_ids: &[i32],
        window: &QueryWindow,
    ) -> StoreResult<Vec<AlertEvent>> {
        if rule_ids.is_empty() {
            return Err(StoreError::InvalidQuery(
                "rule id set must not be empty".to_string(),
            ));
        }
        let rows: Vec<AlertEvent> = self
            .alerts
            .iter()
            .filter(|a| rule_ids.contains(&a.rule_id) && window.contains(a.detection_time))
            .cloned()
            .collect();
        tracing::debug!(rules = rule_ids.len(), rows = rows.len(), "alert scan");
        Ok(rows)
    }

    async fn alerts_for_msisdn(
        &self,
        msisdn: &str,
        window: &OpenWindow,
    ) -> StoreResult<Vec<AlertEvent>> {
        let mut rows: Vec<AlertEvent> = self
            .alerts
            .iter()
            .filter(|a| a.msisdn == msisdn && window.contains(a.detection_time))
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.detection_time, a.id));
        Ok(rows)
    }
}

#[async_trait]
impl DecisionStore for MemoryStore {
    async fn decisions_in_window(&self, window: &QueryWindow) -> StoreResult<Vec<DecisionEvent>> {
        Ok(self
            .decisions
            .iter()
            .filter(|d| window.contains(d.decision_time))
            .cloned()
            .collect())
    }

    async fn latest_decisions(&self, window: &QueryWindow) -> StoreResult<Vec<DecisionEvent>> {
        let mut latest: HashMap<&str, &DecisionEvent> = HashMap::new();
        for decision in self
            .decisions
            .iter()
            .filter(|d| window.contains(d.decision_time))
        {
            match latest.get(decision.msisdn.as_str()) {
                Some(current)
                    if (current.decision_time, current.id)
                        >= (decision.decision_time, decision.id) => {}
                _ => {
                    latest.insert(decision.msisdn.as_str(), decision);
                }
            }
        }
        let mut rows: Vec<DecisionEvent> = latest.into_values().cloned().collect();
        rows.sort_by(|a, b| a.msisdn.cmp(&b.msisdn));
        Ok(rows)
    }

    async fn decisions_for_msisdn(
        &self,
        msisdn: &str,
        window: &OpenWindow,
    ) -> StoreResult<Vec<DecisionEvent>> {
        let mut rows: Vec<DecisionEvent> = self
            .decisions
            .iter()
            .filter(|d| d.msisdn == msisdn && window.contains(d.decision_time))
            .cloned()
            .collect();
        rows.sort_by_key(|d| (d.decision_time, d.id));
        Ok(rows)
    }
}

#[async_trait]
impl RuleStore for MemoryStore {
    async fn rules_by_ids(&self, rule_ids: &[i32]) -> StoreResult<Vec<Rule>> {
        Ok(self
            .rules
            .iter()
            .filter(|r| rule_ids.contains(&r.id))
            .cloned()
            .collect())
    }
}
