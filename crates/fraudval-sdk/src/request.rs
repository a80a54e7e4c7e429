//! Request types
//!
//! All requests are plain serde-friendly structs; validation happens when the
//! engine turns them into query windows, so a deserialized request with bad
//! fields fails with `InvalidArgument` rather than panicking.

use crate::error::{Result, ValidationError};
use chrono::NaiveDate;
use fraudval_core::{DecisionStatusFilter, QueryWindow};
use serde::{Deserialize, Serialize};

/// A rule set and a closed calendar-date window to validate over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub rule_ids: Vec<i32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ValidationRequest {
    pub fn new(rule_ids: Vec<i32>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            rule_ids,
            start_date,
            end_date,
        }
    }

    /// Validate the request and produce its query window.
    pub(crate) fn window(&self) -> Result<QueryWindow> {
        if self.rule_ids.is_empty() {
            return Err(ValidationError::InvalidArgument(
                "rule_ids must not be empty".into(),
            ));
        }
        QueryWindow::new(self.start_date, self.end_date).map_err(|_| {
            ValidationError::InvalidArgument(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            ))
        })
    }
}

/// Paginated detection listing query: a validation request plus optional
/// subscriber and decision-status filters.
///
/// Filters apply after aggregation, so a status filter of `Pending` matches
/// subscribers with no in-window decision at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionQuery {
    pub rule_ids: Vec<i32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub msisdn: Option<String>,
    #[serde(default)]
    pub decision_status: Option<DecisionStatusFilter>,
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page_size() -> u64 {
    50
}

impl DetectionQuery {
    pub fn new(rule_ids: Vec<i32>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            rule_ids,
            start_date,
            end_date,
            msisdn: None,
            decision_status: None,
            page: 0,
            page_size: default_page_size(),
        }
    }

    pub fn with_msisdn(mut self, msisdn: impl Into<String>) -> Self {
        self.msisdn = Some(msisdn.into());
        self
    }

    pub fn with_decision_status(mut self, status: DecisionStatusFilter) -> Self {
        self.decision_status = Some(status);
        self
    }

    pub fn with_page(mut self, page: u64, page_size: u64) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub(crate) fn validation_request(&self) -> ValidationRequest {
        ValidationRequest::new(self.rule_ids.clone(), self.start_date, self.end_date)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ValidationError::InvalidArgument(
                "page_size must be at least 1".into(),
            ));
        }
        if let Some(msisdn) = &self.msisdn {
            if msisdn.trim().is_empty() {
                return Err(ValidationError::InvalidArgument(
                    "msisdn filter must not be blank".into(),
                ));
            }
        }
        Ok(())
    }
}
