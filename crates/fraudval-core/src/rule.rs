//! Detection rule reference data

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Category label applied when a rule carries none.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// How a rule produces its alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    Manual,
    Automatic,
}

impl RuleKind {
    pub fn from_code(code: &str) -> Result<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "MANUAL" | "M" => Ok(RuleKind::Manual),
            "AUTOMATIC" | "AUTO" | "A" => Ok(RuleKind::Automatic),
            other => Err(CoreError::UnknownRuleKind(other.to_string())),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RuleKind::Manual => "MANUAL",
            RuleKind::Automatic => "AUTOMATIC",
        }
    }
}

/// Reference row for a detection rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: i32,
    pub name: String,
    /// `None` renders as [`UNCATEGORIZED`].
    pub category: Option<String>,
    pub kind: RuleKind,
}

impl Rule {
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}
