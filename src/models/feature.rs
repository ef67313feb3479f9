use serde::{Deserialize, Serialize};

/// One selectable unit of project work in the estimation catalog.
///
/// Catalog features are static data: they are compiled into the binary and
/// never created or mutated at runtime. Selections reference them by `id`,
/// which stays stable across catalog revisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: FeatureCategory,
    /// Nominal effort at baseline complexity and baseline tech stack.
    pub base_hours: f64,
    pub complexity_multiplier: ComplexityMultipliers,
}

impl Feature {
    /// Effort for this feature at the given tier, before any tech-stack scaling.
    pub fn hours_at(&self, tier: Complexity) -> f64 {
        self.base_hours * self.complexity_multiplier.get(tier)
    }
}

/// Cost-breakdown bucket a feature belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    Authentication,
    Database,
    Api,
    Ui,
}

impl FeatureCategory {
    pub const ALL: [FeatureCategory; 4] = [
        Self::Authentication,
        Self::Database,
        Self::Api,
        Self::Ui,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Database => "database",
            Self::Api => "api",
            Self::Ui => "ui",
        }
    }
}

/// The overall complexity tier chosen for a project.
///
/// - `Simple`: standard components, minimal customization
/// - `Medium`: some custom functionality on top of standard building blocks
/// - `Complex`: heavily customized UX, advanced workflows and integrations
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    clap::ValueEnum,
    schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    #[default]
    Medium,
    Complex,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Self::Simple, Self::Medium, Self::Complex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "simple" => Some(Self::Simple),
            "medium" => Some(Self::Medium),
            "complex" => Some(Self::Complex),
            _ => None,
        }
    }
}

/// Per-tier hour multipliers. Every tier has an entry by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplexityMultipliers {
    pub simple: f64,
    pub medium: f64,
    pub complex: f64,
}

impl ComplexityMultipliers {
    pub const fn new(simple: f64, medium: f64, complex: f64) -> Self {
        Self {
            simple,
            medium,
            complex,
        }
    }

    pub fn get(&self, tier: Complexity) -> f64 {
        match tier {
            Complexity::Simple => self.simple,
            Complexity::Medium => self.medium,
            Complexity::Complex => self.complex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_round_trips_through_str() {
        for tier in Complexity::ALL {
            assert_eq!(Complexity::from_str(tier.as_str()), Some(tier));
        }
        assert_eq!(Complexity::from_str("extreme"), None);
    }

    #[test]
    fn complexity_defaults_to_medium() {
        assert_eq!(Complexity::default(), Complexity::Medium);
    }

    #[test]
    fn hours_at_applies_tier_multiplier() {
        let feature = Feature {
            id: "x",
            name: "X",
            description: "",
            category: FeatureCategory::Ui,
            base_hours: 10.0,
            complexity_multiplier: ComplexityMultipliers::new(0.5, 1.0, 2.0),
        };

        assert_eq!(feature.hours_at(Complexity::Simple), 5.0);
        assert_eq!(feature.hours_at(Complexity::Medium), 10.0);
        assert_eq!(feature.hours_at(Complexity::Complex), 20.0);
    }
}
