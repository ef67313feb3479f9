//! The estimation engine.
//!
//! Pure functions from a selection set to effort and cost figures. Nothing
//! here fails: ids missing from the catalog are skipped and unknown tech keys
//! use [`DEFAULT_TECH_MULTIPLIER`](crate::catalog::DEFAULT_TECH_MULTIPLIER).
//!
//! Two surcharges exist and are rounded independently:
//! [`total_hours`] applies [`HOURS_QA_FACTOR`] to the whole effort, while
//! [`cost_breakdown`] adds [`TESTING_COST_SHARE`] of the rounded development
//! buckets. `total_cost(total_hours(..), rate)` and `cost_breakdown(..).total`
//! can therefore differ slightly.

mod export;

pub use export::*;

use serde::{Deserialize, Serialize};

use crate::catalog::{self, tech_multiplier};
use crate::models::{
    Complexity, Feature, FeatureCategory, NewEstimate, ProjectData, TechAxis, TechStack,
    MAX_AMOUNT,
};

/// Whole-effort multiplier covering testing and QA.
pub const HOURS_QA_FACTOR: f64 = 1.15;

/// Share of the development cost added as the testing bucket.
pub const TESTING_COST_SHARE: f64 = 0.15;

/// Working hours in one estimated week.
pub const HOURS_PER_WEEK: u64 = 40;

/// Cost per category, each rounded up to a whole currency unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub authentication: u64,
    pub database: u64,
    pub api: u64,
    pub ui: u64,
    pub testing: u64,
    pub total: u64,
}

impl CostBreakdown {
    pub fn category(&self, category: FeatureCategory) -> u64 {
        match category {
            FeatureCategory::Authentication => self.authentication,
            FeatureCategory::Database => self.database,
            FeatureCategory::Api => self.api,
            FeatureCategory::Ui => self.ui,
        }
    }

    /// Sum of the four category buckets, excluding testing.
    pub fn development_total(&self) -> u64 {
        self.authentication + self.database + self.api + self.ui
    }
}

/// Development versus testing share of a total-hours figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourSplit {
    pub development_hours: u64,
    pub testing_hours: u64,
}

/// Everything derived from one selection set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculation {
    pub total_hours: u64,
    pub total_cost: f64,
    pub estimated_weeks: u64,
    pub hour_split: HourSplit,
    pub average_multiplier: f64,
    pub breakdown: CostBreakdown,
    /// Selected ids that matched a catalog feature, in catalog order.
    pub matched_features: Vec<String>,
}

/// Catalog features whose id is selected, in catalog order.
pub fn matched_features<S: AsRef<str>>(
    selected: &[S],
) -> impl Iterator<Item = &'static Feature> + '_ {
    catalog::features()
        .iter()
        .filter(move |f| selected.iter().any(|id| id.as_ref() == f.id))
}

/// Arithmetic mean of the four per-axis multipliers.
pub fn average_multiplier(stack: &TechStack) -> f64 {
    let sum: f64 = TechAxis::ALL
        .iter()
        .map(|&axis| tech_multiplier(axis, stack.choice(axis)))
        .sum();
    sum / TechAxis::ALL.len() as f64
}

/// Total effort in whole hours, including the QA surcharge.
pub fn total_hours<S: AsRef<str>>(selected: &[S], tier: Complexity, stack: &TechStack) -> u64 {
    let raw_hours: f64 = matched_features(selected).map(|f| f.hours_at(tier)).sum();
    let avg = average_multiplier(stack);

    (raw_hours * avg * HOURS_QA_FACTOR).ceil() as u64
}

/// `total_hours * hourly_rate`, unrounded.
pub fn total_cost(total_hours: u64, hourly_rate: f64) -> f64 {
    total_hours as f64 * hourly_rate
}

/// Per-category cost, scaled by the stack and rounded up bucket by bucket.
///
/// `hourly_rate` is expected to be non-negative; validating it is up to the
/// caller.
pub fn cost_breakdown<S: AsRef<str>>(
    selected: &[S],
    tier: Complexity,
    stack: &TechStack,
    hourly_rate: f64,
) -> CostBreakdown {
    let mut raw = [0.0_f64; 4];
    for feature in matched_features(selected) {
        raw[bucket_index(feature.category)] += feature.hours_at(tier) * hourly_rate;
    }

    let avg = average_multiplier(stack);
    let [authentication, database, api, ui] = raw.map(|cost| (cost * avg).ceil() as u64);

    let development_total = authentication + database + api + ui;
    let testing = (development_total as f64 * TESTING_COST_SHARE).ceil() as u64;

    CostBreakdown {
        authentication,
        database,
        api,
        ui,
        testing,
        total: development_total + testing,
    }
}

fn bucket_index(category: FeatureCategory) -> usize {
    match category {
        FeatureCategory::Authentication => 0,
        FeatureCategory::Database => 1,
        FeatureCategory::Api => 2,
        FeatureCategory::Ui => 3,
    }
}

/// Calendar weeks at [`HOURS_PER_WEEK`], rounded up.
pub fn estimated_weeks(total_hours: u64) -> u64 {
    total_hours.div_ceil(HOURS_PER_WEEK)
}

/// Split total hours into development and testing, rounding testing up.
pub fn hour_split(total_hours: u64) -> HourSplit {
    let testing_hours = (total_hours as f64 * TESTING_COST_SHARE).ceil() as u64;
    HourSplit {
        development_hours: total_hours.saturating_sub(testing_hours),
        testing_hours,
    }
}

/// Run every engine function over a selection set.
pub fn calculate(data: &ProjectData) -> Calculation {
    let rate = data.hourly_rate as f64;
    let hours = total_hours(&data.selected_features, data.complexity, &data.tech_stack);

    Calculation {
        total_hours: hours,
        total_cost: total_cost(hours, rate),
        estimated_weeks: estimated_weeks(hours),
        hour_split: hour_split(hours),
        average_multiplier: average_multiplier(&data.tech_stack),
        breakdown: cost_breakdown(
            &data.selected_features,
            data.complexity,
            &data.tech_stack,
            rate,
        ),
        matched_features: matched_features(&data.selected_features)
            .map(|f| f.id.to_string())
            .collect(),
    }
}

/// Build the record to persist: the selections plus their computed totals.
///
/// Fails when the cost does not fit in a storable amount.
pub fn to_new_estimate(data: ProjectData) -> anyhow::Result<NewEstimate> {
    let hours = total_hours(&data.selected_features, data.complexity, &data.tech_stack);
    let cost = hours
        .checked_mul(data.hourly_rate)
        .filter(|&cost| cost <= MAX_AMOUNT)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Total cost of {} h at {}/h exceeds the largest storable amount",
                hours,
                data.hourly_rate
            )
        })?;

    Ok(NewEstimate {
        project_name: data.project_name,
        project_type: data.project_type,
        selected_features: data.selected_features,
        tech_stack: data.tech_stack,
        complexity: data.complexity,
        hourly_rate: data.hourly_rate,
        total_hours: hours,
        total_cost: cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> TechStack {
        TechStack::default()
    }

    #[test]
    fn baseline_stack_averages_to_one() {
        assert_eq!(average_multiplier(&baseline()), 1.0);
    }

    #[test]
    fn single_feature_medium_baseline() {
        assert_eq!(total_hours(&["basic-auth"], Complexity::Medium, &baseline()), 14);
        assert_eq!(total_cost(14, 500.0), 7000.0);
    }

    #[test]
    fn one_axis_at_1_2_raises_hours() {
        let stack = TechStack::new("angular", "nodejs", "postgresql", "cloud");
        assert!((average_multiplier(&stack) - 1.05).abs() < 1e-12);
        assert_eq!(total_hours(&["basic-auth"], Complexity::Medium, &stack), 15);
    }

    #[test]
    fn breakdown_for_authentication_only() {
        let breakdown = cost_breakdown(&["basic-auth"], Complexity::Medium, &baseline(), 500.0);
        assert_eq!(
            breakdown,
            CostBreakdown {
                authentication: 6000,
                database: 0,
                api: 0,
                ui: 0,
                testing: 900,
                total: 6900,
            }
        );
    }

    #[test]
    fn duplicate_ids_count_once() {
        let once = total_hours(&["crud"], Complexity::Complex, &baseline());
        let twice = total_hours(&["crud", "crud"], Complexity::Complex, &baseline());
        assert_eq!(once, twice);
    }

    #[test]
    fn weeks_round_up() {
        assert_eq!(estimated_weeks(0), 0);
        assert_eq!(estimated_weeks(40), 1);
        assert_eq!(estimated_weeks(41), 2);
    }

    #[test]
    fn hour_split_rounds_testing_up() {
        assert_eq!(
            hour_split(14),
            HourSplit {
                development_hours: 11,
                testing_hours: 3,
            }
        );
        assert_eq!(
            hour_split(0),
            HourSplit {
                development_hours: 0,
                testing_hours: 0,
            }
        );
    }

    #[test]
    fn to_new_estimate_carries_selection_and_totals() {
        let data = ProjectData {
            project_name: "Shop".to_string(),
            project_type: "ecommerce".to_string(),
            selected_features: vec!["basic-auth".to_string(), "ghost".to_string()],
            ..ProjectData::default()
        };

        let estimate = to_new_estimate(data.clone()).unwrap();
        assert_eq!(estimate.total_hours, 14);
        assert_eq!(estimate.total_cost, 7000);
        assert_eq!(estimate.selected_features, data.selected_features);
        assert_eq!(estimate.hourly_rate, 500);
    }

    #[test]
    fn to_new_estimate_rejects_unstorable_cost() {
        let data = ProjectData {
            project_name: "Moonshot".to_string(),
            selected_features: vec!["basic-auth".to_string()],
            hourly_rate: u64::MAX / 2,
            ..ProjectData::default()
        };
        assert!(to_new_estimate(data).is_err());

        let data = ProjectData {
            project_name: "Edge".to_string(),
            selected_features: vec!["basic-auth".to_string()],
            hourly_rate: MAX_AMOUNT / 14,
            ..ProjectData::default()
        };
        let estimate = to_new_estimate(data).unwrap();
        assert_eq!(estimate.total_cost, (MAX_AMOUNT / 14) * 14);
    }
}
