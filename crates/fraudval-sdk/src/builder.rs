//! Builder for [`ValidationEngine`]
//!
//! The three store roles can be wired independently (different backends per
//! stream) or all at once from a single backend that implements every trait.

use crate::engine::ValidationEngine;
use crate::error::{Result, ValidationError};
use fraudval_store::{AlertStore, DecisionStore, MemoryStore, RuleStore};
use std::sync::Arc;

/// # Example
///
/// ```
/// use fraudval_sdk::ValidationEngineBuilder;
/// use fraudval_store::MemoryStore;
///
/// # fn main() -> anyhow::Result<()> {
/// let engine = ValidationEngineBuilder::new()
///     .with_memory_store(MemoryStore::new())
///     .build()?;
/// # let _ = engine;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ValidationEngineBuilder {
    alerts: Option<Arc<dyn AlertStore>>,
    decisions: Option<Arc<dyn DecisionStore>>,
    rules: Option<Arc<dyn RuleStore>>,
}

impl ValidationEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alert_store(mut self, store: Arc<dyn AlertStore>) -> Self {
        self.alerts = Some(store);
        self
    }

    pub fn with_decision_store(mut self, store: Arc<dyn DecisionStore>) -> Self {
        self.decisions = Some(store);
        self
    }

    pub fn with_rule_store(mut self, store: Arc<dyn RuleStore>) -> Self {
        self.rules = Some(store);
        self
    }

    /// Wire all three roles to one in-memory store.
    pub fn with_memory_store(self, store: MemoryStore) -> Self {
        let store = Arc::new(store);
        self.with_alert_store(store.clone())
            .with_decision_store(store.clone())
            .with_rule_store(store)
    }

    /// Connect to PostgreSQL and wire all three roles to it.
    #[cfg(feature = "postgres")]
    pub async fn with_postgres(self, database_url: &str) -> Result<Self> {
        let store = Arc::new(fraudval_store::PostgresStore::new(database_url).await?);
        Ok(self
            .with_alert_store(store.clone())
            .with_decision_store(store.clone())
            .with_rule_store(store))
    }

    pub fn build(self) -> Result<ValidationEngine> {
        let alerts = self
            .alerts
            .ok_or_else(|| ValidationError::Configuration("alert store not configured".into()))?;
        let decisions = self
            .decisions
            .ok_or_else(|| ValidationError::Configuration("decision store not configured".into()))?;
        let rules = self
            .rules
            .ok_or_else(|| ValidationError::Configuration("rule store not configured".into()))?;
        Ok(ValidationEngine {
            alerts,
            decisions,
            rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_store_is_a_configuration_error() {
        let err = ValidationEngineBuilder::new().build().unwrap_err();
        assert!(matches!(err, ValidationError::Configuration(_)));
        assert!(err.to_string().contains("alert store"));
    }

    #[test]
    fn memory_store_wires_all_roles() {
        let engine = ValidationEngineBuilder::new()
            .with_memory_store(MemoryStore::new())
            .build();
        assert!(engine.is_ok());
    }
}
