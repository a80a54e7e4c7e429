//! PostgreSQL store backend
//!
//! Reads the `fraud_alerts` / `fraud_decisions` streams and the
//! `detection_rules` reference table. Every query is fully parameterized
//! (`= ANY($n)` for rule sets, bound timestamps for windows); no identifier is
//! ever spliced into SQL text.

use async_trait::async_trait;
use fraudval_core::{AlertEvent, Decision, DecisionEvent, OpenWindow, QueryWindow, Rule, RuleKind};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::error::{StoreError, StoreResult};
use crate::traits::{AlertStore, DecisionStore, RuleStore};

/// PostgreSQL-backed reader over the alert/decision streams.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to the database.
    pub async fn new(database_url: &str) -> StoreResult<Self> {
        tracing::info!("Connecting validation store to PostgreSQL");
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing connection pool.
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    fn alert_from_row(row: &PgRow) -> StoreResult<AlertEvent> {
        Ok(AlertEvent {
            id: row.try_get("id")?,
            msisdn: row.try_get("msisdn")?,
            rule_id: row.try_get("rule_id")?,
            detection_time: row.try_get("detection_time")?,
        })
    }

    fn decision_from_row(row: &PgRow) -> StoreResult<DecisionEvent> {
        let code: String = row.try_get("decision")?;
        Ok(DecisionEvent {
            id: row.try_get("id")?,
            msisdn: row.try_get("msisdn")?,
            rule_id: row.try_get("rule_id")?,
            decision: Decision::from_code(&code)?,
            decision_time: row.try_get("decision_time")?,
            decided_by: row.try_get("decided_by")?,
        })
    }

    fn rule_from_row(row: &PgRow) -> StoreResult<Rule> {
        let kind: String = row.try_get("kind")?;
        Ok(Rule {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            kind: RuleKind::from_code(&kind)?,
        })
    }

    fn collect_alerts(rows: Vec<PgRow>) -> StoreResult<Vec<AlertEvent>> {
        rows.iter().map(Self::alert_from_row).collect()
    }

    fn collect_decisions(rows: Vec<PgRow>) -> StoreResult<Vec<DecisionEvent>> {
        rows.iter().map(Self::decision_from_row).collect()
    }
}

#[async_trait]
impl AlertStore for PostgresStore {
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
        let rows = sqlx::query(
            r#"
            SELECT id, msisdn, rule_id, detection_time
            FROM fraud_alerts
            WHERE rule_id = ANY($1)
              AND detection_time BETWEEN $2 AND $3
            ORDER BY detection_time, id
            "#,
        )
        .bind(rule_ids.to_vec())
        .bind(window.starts_at())
        .bind(window.ends_at())
        .fetch_all(&self.pool)
        .await?;
        Self::collect_alerts(rows)
    }

    async fn alerts_for_msisdn(
        &self,
        msisdn: &str,
        window: &OpenWindow,
    ) -> StoreResult<Vec<AlertEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT id, msisdn, rule_id, detection_time
            FROM fraud_alerts
            WHERE msisdn = $1
              AND ($2::timestamp IS NULL OR detection_time >= $2)
              AND ($3::timestamp IS NULL OR detection_time <= $3)
            ORDER BY detection_time, id
            "#,
        )
        .bind(msisdn)
        .bind(window.starts_at())
        .bind(window.ends_at())
        .fetch_all(&self.pool)
        .await?;
        Self::collect_alerts(rows)
    }
}

#[async_trait]
impl DecisionStore for PostgresStore {
    async fn decisions_in_window(&self, window: &QueryWindow) -> StoreResult<Vec<DecisionEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT id, msisdn, rule_id, decision, decision_time, decided_by
            FROM fraud_decisions
            WHERE decision_time BETWEEN $1 AND $2
            ORDER BY decision_time, id
            "#,
        )
        .bind(window.starts_at())
        .bind(window.ends_at())
        .fetch_all(&self.pool)
        .await?;
        Self::collect_decisions(rows)
    }

    async fn latest_decisions(&self, window: &QueryWindow) -> StoreResult<Vec<DecisionEvent>> {
        // DISTINCT ON gives exactly one row per subscriber; the ORDER BY makes
        // the winner the latest decision_time with the highest id on ties.
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT ON (msisdn)
                   id, msisdn, rule_id, decision, decision_time, decided_by
            FROM fraud_decisions
            WHERE decision_time BETWEEN $1 AND $2
            ORDER BY msisdn, decision_time DESC, id DESC
            "#,
        )
        .bind(window.starts_at())
        .bind(window.ends_at())
        .fetch_all(&self.pool)
        .await?;
        Self::collect_decisions(rows)
    }

    async fn decisions_for_msisdn(
        &self,
        msisdn: &str,
        window: &OpenWindow,
    ) -> StoreResult<Vec<DecisionEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT id, msisdn, rule_id, decision, decision_time, decided_by
            FROM fraud_decisions
            WHERE msisdn = $1
              AND ($2::timestamp IS NULL OR decision_time >= $2)
              AND ($3::timestamp IS NULL OR decision_time <= $3)
            ORDER BY decision_time, id
            "#,
        )
        .bind(msisdn)
        .bind(window.starts_at())
        .bind(window.ends_at())
        .fetch_all(&self.pool)
        .await?;
        Self::collect_decisions(rows)
    }
}

#[async_trait]
impl RuleStore for PostgresStore {
    async fn rules_by_ids(&self, rule_ids: &[i32]) -> StoreResult<Vec<Rule>> {
        if rule_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            r#"
            SELECT id, name, category, kind
            FROM detection_rules
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(rule_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::rule_from_row).collect()
    }
}
