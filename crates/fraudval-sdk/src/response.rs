//! Response types
//!
//! Reports are fully deterministic for a given store state and request, so
//! two identical calls serialize byte-identically. Wall-clock measurements
//! are logged, never embedded in the payload.

use chrono::NaiveDate;
use fraudval_core::MsisdnDetection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of a full rule validation run: the deduplicated per-subscriber rows
/// plus the roll-up statistics over them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub rule_ids: Vec<i32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub detections: Vec<MsisdnDetection>,
    pub summary: SummaryStatistics,
}

/// Roll-up over one validation run.
///
/// Subscriber counters classify by the latest in-window decision; rates are
/// percentages rounded to two decimals, `0.0` when nothing was detected.
/// The effectiveness buckets count rules by credibility: highly `>= 80`,
/// moderately `50..80`, low `< 50`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_unique_msisdns: u64,
    pub fraudulent_msisdns: u64,
    pub whitelisted_msisdns: u64,
    pub pending_msisdns: u64,

    pub overall_decision_rate: f64,
    pub overall_fraud_rate: f64,
    pub average_rule_credibility: f64,

    /// Total in-window alerts per rule id, across all subscribers. Ordered
    /// map so reports serialize identically across runs.
    pub alert_distribution_by_rule: BTreeMap<i32, u64>,

    pub highly_effective_rules: u64,
    pub moderately_effective_rules: u64,
    pub low_effective_rules: u64,
}

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// Slice one page out of the full ordered result set.
    pub(crate) fn slice(all: Vec<T>, page: u64, page_size: u64) -> Self {
        let total_elements = all.len() as u64;
        let start = page.saturating_mul(page_size);
        let items = all
            .into_iter()
            .skip(start as usize)
            .take(page_size as usize)
            .collect();
        Self {
            items,
            page,
            page_size,
            total_elements,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.total_elements == 0 {
            0
        } else {
            self.total_elements.div_ceil(self.page_size)
        }
    }
}
