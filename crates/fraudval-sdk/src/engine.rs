//! Validation engine
//!
//! Orchestrates the store readers and the pure aggregation functions into the
//! four public operations. Each operation validates its arguments, fetches
//! typed rows, runs the compute, and logs parameters, row counts, and timing
//! at the boundary. No partial results: any store failure aborts the whole
//! operation.

use crate::builder::ValidationEngineBuilder;
use crate::error::{Result, ValidationError};
use crate::request::{DetectionQuery, ValidationRequest};
use crate::response::{Page, SummaryStatistics, ValidationReport};
use fraudval_core::{
    round2, Decision, MsisdnDetection, OpenWindow, Rule, RuleCredibilityAnalysis, TimelineEvent,
};
use fraudval_engine::{aggregate_msisdns, analyze_rules, build_timeline};
use fraudval_store::{AlertStore, DecisionStore, RuleStore};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Facade over the three stores and the aggregation engine.
///
/// Cheap to clone; all state is shared behind `Arc`.
#[derive(Clone)]
pub struct ValidationEngine {
    pub(crate) alerts: Arc<dyn AlertStore>,
    pub(crate) decisions: Arc<dyn DecisionStore>,
    pub(crate) rules: Arc<dyn RuleStore>,
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationEngine").finish_non_exhaustive()
    }
}

impl ValidationEngine {
    pub fn builder() -> ValidationEngineBuilder {
        ValidationEngineBuilder::new()
    }

    /// Run a full validation over the requested rules and window: the
    /// deduplicated per-subscriber detections plus summary statistics.
    ///
    /// Deterministic: identical store state and request produce an identical
    /// report.
    pub async fn validate_rules(&self, request: &ValidationRequest) -> Result<ValidationReport> {
        let window = request.window()?;
        let started = Instant::now();
        tracing::info!(
            rule_ids = ?request.rule_ids,
            start = %window.start_date(),
            end = %window.end_date(),
            "validating rules"
        );

        let alerts = self.alerts.alerts_for_rules(&request.rule_ids, &window).await?;
        let latest = self.decisions.latest_decisions(&window).await?;
        let all_decisions = self.decisions.decisions_in_window(&window).await?;
        let rules = self.rule_map(&request.rule_ids).await?;

        let detections = aggregate_msisdns(&alerts, &latest, &rules);
        let analyses = analyze_rules(&request.rule_ids, &rules, &alerts, &all_decisions, &window);
        let summary = build_summary(&detections, &analyses, &alerts);

        tracing::info!(
            detections = detections.len(),
            alerts = alerts.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rule validation complete"
        );

        Ok(ValidationReport {
            rule_ids: request.rule_ids.clone(),
            start_date: window.start_date(),
            end_date: window.end_date(),
            detections,
            summary,
        })
    }

    /// Paginated detection listing with optional subscriber and
    /// decision-status filters.
    ///
    /// Filters apply to the fully aggregated result, so pagination and the
    /// contractual recency ordering are stable across pages.
    pub async fn detected_msisdns(&self, query: &DetectionQuery) -> Result<Page<MsisdnDetection>> {
        query.validate()?;
        let request = query.validation_request();
        let window = request.window()?;
        let started = Instant::now();
        tracing::info!(
            rule_ids = ?query.rule_ids,
            msisdn = query.msisdn.as_deref(),
            status = ?query.decision_status,
            page = query.page,
            "listing detected msisdns"
        );

        let alerts = self.alerts.alerts_for_rules(&query.rule_ids, &window).await?;
        let latest = self.decisions.latest_decisions(&window).await?;
        let rules = self.rule_map(&query.rule_ids).await?;

        let mut detections = aggregate_msisdns(&alerts, &latest, &rules);
        if let Some(msisdn) = &query.msisdn {
            detections.retain(|d| d.msisdn == msisdn.trim());
        }
        if let Some(status) = query.decision_status {
            detections.retain(|d| status.matches(d.decision_status));
        }

        let page = Page::slice(detections, query.page, query.page_size);
        tracing::info!(
            returned = page.items.len(),
            total = page.total_elements,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "detection listing complete"
        );
        Ok(page)
    }

    /// Per-rule credibility scoring over the window, one aggregate per
    /// requested rule id (duplicates collapsed), ordered by rule id.
    pub async fn analyze_rule_credibility(
        &self,
        request: &ValidationRequest,
    ) -> Result<Vec<RuleCredibilityAnalysis>> {
        let window = request.window()?;
        let started = Instant::now();
        tracing::info!(
            rule_ids = ?request.rule_ids,
            start = %window.start_date(),
            end = %window.end_date(),
            "analyzing rule credibility"
        );

        let alerts = self.alerts.alerts_for_rules(&request.rule_ids, &window).await?;
        let decisions = self.decisions.decisions_in_window(&window).await?;
        let rules = self.rule_map(&request.rule_ids).await?;

        let analyses = analyze_rules(&request.rule_ids, &rules, &alerts, &decisions, &window);
        tracing::info!(
            rules = analyses.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "credibility analysis complete"
        );
        Ok(analyses)
    }

    /// Complete alert/decision timeline for one subscriber, optionally
    /// bounded in time. A subscriber with no history yields an empty
    /// timeline.
    pub async fn msisdn_complete_history(
        &self,
        msisdn: &str,
        window: &OpenWindow,
    ) -> Result<Vec<TimelineEvent>> {
        let msisdn = msisdn.trim();
        if msisdn.is_empty() {
            return Err(ValidationError::InvalidArgument(
                "msisdn must not be blank".into(),
            ));
        }
        let started = Instant::now();
        tracing::info!(msisdn, "building subscriber history");

        let alerts = self.alerts.alerts_for_msisdn(msisdn, window).await?;
        let decisions = self.decisions.decisions_for_msisdn(msisdn, window).await?;

        // Reference rows for every rule the history touches.
        let rule_ids: BTreeSet<i32> = alerts
            .iter()
            .map(|a| a.rule_id)
            .chain(decisions.iter().filter_map(|d| d.rule_id))
            .collect();
        let rule_ids: Vec<i32> = rule_ids.into_iter().collect();
        let rules = if rule_ids.is_empty() {
            HashMap::new()
        } else {
            self.rule_map(&rule_ids).await?
        };

        let timeline = build_timeline(msisdn, &alerts, &decisions, &rules);
        tracing::info!(
            msisdn,
            events = timeline.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "subscriber history complete"
        );
        Ok(timeline)
    }

    async fn rule_map(&self, rule_ids: &[i32]) -> Result<HashMap<i32, Rule>> {
        let rows = self.rules.rules_by_ids(rule_ids).await?;
        Ok(rows.into_iter().map(|r| (r.id, r)).collect())
    }
}

fn build_summary(
    detections: &[MsisdnDetection],
    analyses: &[RuleCredibilityAnalysis],
    alerts: &[fraudval_core::AlertEvent],
) -> SummaryStatistics {
    let total = detections.len() as u64;
    let fraudulent = detections
        .iter()
        .filter(|d| d.decision_status == Some(Decision::Block))
        .count() as u64;
    let whitelisted = detections
        .iter()
        .filter(|d| d.decision_status == Some(Decision::Whitelist))
        .count() as u64;
    let pending = total - fraudulent - whitelisted;

    let overall_decision_rate = if total > 0 {
        round2((fraudulent + whitelisted) as f64 / total as f64 * 100.0)
    } else {
        0.0
    };
    let overall_fraud_rate = if total > 0 {
        round2(fraudulent as f64 / total as f64 * 100.0)
    } else {
        0.0
    };
    let average_rule_credibility = if analyses.is_empty() {
        0.0
    } else {
        round2(
            analyses.iter().map(|a| a.credibility_percentage).sum::<f64>() / analyses.len() as f64,
        )
    };

    let mut alert_distribution_by_rule: BTreeMap<i32, u64> = BTreeMap::new();
    for alert in alerts {
        *alert_distribution_by_rule.entry(alert.rule_id).or_insert(0) += 1;
    }

    let highly = analyses
        .iter()
        .filter(|a| a.credibility_percentage >= 80.0)
        .count() as u64;
    let moderately = analyses
        .iter()
        .filter(|a| a.credibility_percentage >= 50.0 && a.credibility_percentage < 80.0)
        .count() as u64;
    let low = analyses
        .iter()
        .filter(|a| a.credibility_percentage < 50.0)
        .count() as u64;

    SummaryStatistics {
        total_unique_msisdns: total,
        fraudulent_msisdns: fraudulent,
        whitelisted_msisdns: whitelisted,
        pending_msisdns: pending,
        overall_decision_rate,
        overall_fraud_rate,
        average_rule_credibility,
        alert_distribution_by_rule,
        highly_effective_rules: highly,
        moderately_effective_rules: moderately,
        low_effective_rules: low,
    }
}
