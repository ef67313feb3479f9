use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::estimated_weeks;
use crate::models::{Complexity, Estimate, TechStack};

/// Downloadable JSON document for a saved estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateExport {
    pub project_name: String,
    pub project_type: String,
    pub selected_features: Vec<String>,
    pub tech_stack: TechStack,
    pub complexity: Complexity,
    pub hourly_rate: u64,
    pub total_hours: u64,
    pub total_cost: u64,
    pub estimated_weeks: u64,
    pub generated_at: DateTime<Utc>,
}

impl EstimateExport {
    pub fn new(estimate: &Estimate, generated_at: DateTime<Utc>) -> Self {
        let data = &estimate.data;
        Self {
            project_name: data.project_name.clone(),
            project_type: data.project_type.clone(),
            selected_features: data.selected_features.clone(),
            tech_stack: data.tech_stack.clone(),
            complexity: data.complexity,
            hourly_rate: data.hourly_rate,
            total_hours: data.total_hours,
            total_cost: data.total_cost,
            estimated_weeks: estimated_weeks(data.total_hours),
            generated_at,
        }
    }
}

/// File name for an exported estimate, e.g. `my-shop-estimate.json`.
///
/// Only ASCII letters, digits and `-` survive, so the name is always a valid
/// quoted header parameter. A name with nothing left becomes `estimate.json`.
pub fn export_filename(project_name: &str) -> String {
    let words: Vec<String> = project_name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();

    if words.is_empty() {
        "estimate.json".to_string()
    } else {
        format!("{}-estimate.json", words.join("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_collapses_whitespace_and_lowercases() {
        assert_eq!(export_filename("My  Shop App"), "my-shop-app-estimate.json");
        assert_eq!(export_filename("API"), "api-estimate.json");
    }

    #[test]
    fn filename_drops_unsafe_characters() {
        assert_eq!(
            export_filename("Say \"hi\" there"),
            "say-hi-there-estimate.json"
        );
        assert_eq!(export_filename("Tab\u{1}Ctl"), "tabctl-estimate.json");
        assert_eq!(export_filename("C++ / Rust"), "c-rust-estimate.json");
        assert_eq!(export_filename("../etc/passwd"), "etcpasswd-estimate.json");
    }

    #[test]
    fn filename_falls_back_when_nothing_is_left() {
        assert_eq!(export_filename("日本語"), "estimate.json");
        assert_eq!(export_filename("\"\""), "estimate.json");
    }
}
