use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::feature::Complexity;
use super::tech_stack::TechStack;

/// A persisted estimate snapshot.
///
/// Records are **append-only**: the store assigns `id` and `created_at` on
/// creation and never updates or deletes them afterwards. Callers always
/// receive copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub id: i64,
    #[serde(flatten)]
    pub data: NewEstimate,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an estimate: the selection set plus the derived totals.
///
/// The totals are stored as supplied; the store does not recompute them.
/// The derived JSON Schema is what `POST /api/estimates` bodies are checked
/// against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEstimate {
    #[schemars(regex(pattern = r"\S"))]
    pub project_name: String,
    pub project_type: String,
    pub selected_features: Vec<String>,
    pub tech_stack: TechStack,
    pub complexity: Complexity,
    #[schemars(range(min = 0, max = MAX_AMOUNT))]
    pub hourly_rate: u64,
    #[schemars(range(min = 0, max = MAX_AMOUNT))]
    pub total_hours: u64,
    #[schemars(range(min = 0, max = MAX_AMOUNT))]
    pub total_cost: u64,
}

/// Largest amount a record may carry: the largest integer a JSON number holds
/// exactly. Every store can persist it.
pub const MAX_AMOUNT: u64 = 9_007_199_254_740_991;

/// The user's selections, before any totals are derived.
///
/// Missing fields fall back to the same defaults a fresh wizard starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectData {
    pub project_name: String,
    pub project_type: String,
    /// Feature ids. Ids missing from the catalog are tolerated and ignored.
    pub selected_features: Vec<String>,
    pub tech_stack: TechStack,
    pub complexity: Complexity,
    /// Currency units per hour.
    pub hourly_rate: u64,
}

/// Hourly rate a fresh selection starts with.
pub const DEFAULT_HOURLY_RATE: u64 = 500;

impl Default for ProjectData {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            project_type: String::new(),
            selected_features: Vec::new(),
            tech_stack: TechStack::default(),
            complexity: Complexity::default(),
            hourly_rate: DEFAULT_HOURLY_RATE,
        }
    }
}

/// Project types offered when describing a project. `project_type` itself
/// stays a free string.
pub const PROJECT_TYPES: &[(&str, &str)] = &[
    ("web-app", "Web Application"),
    ("mobile-app", "Mobile Application"),
    ("api", "API/Backend Service"),
    ("ecommerce", "E-commerce Platform"),
    ("cms", "Content Management System"),
    ("saas", "SaaS Platform"),
    ("other", "Other"),
];
