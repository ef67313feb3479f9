//! The static feature catalog and technology multiplier tables.
//!
//! Both tables are compiled in and immutable. Lookups are linear scans; the
//! catalog is small and fixed.

use crate::models::{ComplexityMultipliers, Feature, FeatureCategory, TechAxis};

/// Multiplier used for any tech-stack key missing from its axis table.
pub const DEFAULT_TECH_MULTIPLIER: f64 = 1.0;

const fn feature(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: FeatureCategory,
    base_hours: f64,
    multipliers: (f64, f64, f64),
) -> Feature {
    Feature {
        id,
        name,
        description,
        category,
        base_hours,
        complexity_multiplier: ComplexityMultipliers::new(
            multipliers.0,
            multipliers.1,
            multipliers.2,
        ),
    }
}

static FEATURES: [Feature; 16] = [
    // Authentication
    feature(
        "basic-auth",
        "Basic Login/Signup",
        "Email/password authentication",
        FeatureCategory::Authentication,
        12.0,
        (0.8, 1.0, 1.2),
    ),
    feature(
        "oauth",
        "OAuth Integration",
        "Google, GitHub, Facebook login",
        FeatureCategory::Authentication,
        8.0,
        (0.8, 1.0, 1.3),
    ),
    feature(
        "two-factor",
        "Two-Factor Authentication",
        "SMS/App-based 2FA",
        FeatureCategory::Authentication,
        16.0,
        (1.0, 1.2, 1.5),
    ),
    feature(
        "rbac",
        "Role-Based Access",
        "User roles and permissions",
        FeatureCategory::Authentication,
        24.0,
        (1.0, 1.3, 1.8),
    ),
    // Database
    feature(
        "crud",
        "CRUD Operations",
        "Basic data operations",
        FeatureCategory::Database,
        16.0,
        (0.7, 1.0, 1.4),
    ),
    feature(
        "search-filter",
        "Search & Filtering",
        "Advanced query capabilities",
        FeatureCategory::Database,
        12.0,
        (0.8, 1.0, 1.5),
    ),
    feature(
        "file-upload",
        "File Upload/Storage",
        "Image and document handling",
        FeatureCategory::Database,
        14.0,
        (0.8, 1.0, 1.3),
    ),
    feature(
        "analytics",
        "Data Analytics",
        "Reports and insights",
        FeatureCategory::Database,
        32.0,
        (1.0, 1.3, 2.0),
    ),
    // API integrations
    feature(
        "payment",
        "Payment Processing",
        "Stripe, PayPal integration",
        FeatureCategory::Api,
        20.0,
        (1.0, 1.2, 1.6),
    ),
    feature(
        "email-service",
        "Email Services",
        "SendGrid, Mailgun integration",
        FeatureCategory::Api,
        10.0,
        (0.8, 1.0, 1.3),
    ),
    feature(
        "social-media",
        "Social Media APIs",
        "Twitter, Instagram, LinkedIn",
        FeatureCategory::Api,
        16.0,
        (1.0, 1.2, 1.7),
    ),
    feature(
        "ai-ml",
        "AI/ML Services",
        "OpenAI, AWS AI services",
        FeatureCategory::Api,
        30.0,
        (1.0, 1.5, 2.2),
    ),
    // UI/UX
    feature(
        "responsive",
        "Responsive Design",
        "Mobile-first responsive layout",
        FeatureCategory::Ui,
        32.0,
        (0.8, 1.0, 1.4),
    ),
    feature(
        "dark-mode",
        "Dark Mode",
        "Theme switching capability",
        FeatureCategory::Ui,
        12.0,
        (0.7, 1.0, 1.3),
    ),
    feature(
        "charts",
        "Interactive Charts",
        "Data visualization components",
        FeatureCategory::Ui,
        24.0,
        (1.0, 1.3, 1.8),
    ),
    feature(
        "real-time",
        "Real-time Updates",
        "WebSocket/SSE implementation",
        FeatureCategory::Ui,
        18.0,
        (1.0, 1.4, 2.0),
    ),
];

const FRONTEND_MULTIPLIERS: &[(&str, f64)] = &[
    ("react", 1.0),
    ("vue", 0.9),
    ("angular", 1.2),
    ("svelte", 0.8),
];

const BACKEND_MULTIPLIERS: &[(&str, f64)] = &[
    ("nodejs", 1.0),
    ("python", 1.1),
    ("php", 0.8),
    ("java", 1.3),
];

const DATABASE_MULTIPLIERS: &[(&str, f64)] = &[
    ("postgresql", 1.0),
    ("mysql", 0.9),
    ("mongodb", 1.1),
    ("sqlite", 0.7),
];

const DEPLOYMENT_MULTIPLIERS: &[(&str, f64)] = &[
    ("cloud", 1.0),
    ("vps", 0.8),
    ("shared", 0.6),
    ("docker", 1.2),
];

/// The full catalog, in display order.
pub fn features() -> &'static [Feature] {
    &FEATURES
}

/// Look up a feature by id. `None` is a normal outcome, not an error.
pub fn find_feature(id: &str) -> Option<&'static Feature> {
    FEATURES.iter().find(|f| f.id == id)
}

/// Catalog features in the given category, in display order.
pub fn features_in(category: FeatureCategory) -> impl Iterator<Item = &'static Feature> {
    FEATURES.iter().filter(move |f| f.category == category)
}

/// The known keys and their multipliers for one axis.
pub fn multiplier_table(axis: TechAxis) -> &'static [(&'static str, f64)] {
    match axis {
        TechAxis::Frontend => FRONTEND_MULTIPLIERS,
        TechAxis::Backend => BACKEND_MULTIPLIERS,
        TechAxis::Database => DATABASE_MULTIPLIERS,
        TechAxis::Deployment => DEPLOYMENT_MULTIPLIERS,
    }
}

/// Multiplier for `key` on `axis`, or [`DEFAULT_TECH_MULTIPLIER`] when the
/// key is not in the table.
pub fn tech_multiplier(axis: TechAxis, key: &str) -> f64 {
    lookup_or_default(multiplier_table(axis), key, DEFAULT_TECH_MULTIPLIER)
}

fn lookup_or_default(table: &[(&str, f64)], key: &str, default: f64) -> f64 {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, m)| *m)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Complexity;
    use std::collections::HashSet;

    #[test]
    fn feature_ids_are_unique() {
        let ids: HashSet<_> = features().iter().map(|f| f.id).collect();
        assert_eq!(ids.len(), features().len());
    }

    #[test]
    fn every_feature_has_positive_hours_and_multipliers() {
        for f in features() {
            assert!(f.base_hours > 0.0, "{} has non-positive base hours", f.id);
            for tier in Complexity::ALL {
                assert!(f.complexity_multiplier.get(tier) > 0.0, "{} / {:?}", f.id, tier);
            }
        }
    }

    #[test]
    fn every_category_has_four_features() {
        for category in FeatureCategory::ALL {
            assert_eq!(features_in(category).count(), 4, "{:?}", category);
        }
    }

    #[test]
    fn find_feature_returns_none_for_unknown_id() {
        assert!(find_feature("teleportation").is_none());
        assert_eq!(find_feature("basic-auth").map(|f| f.base_hours), Some(12.0));
    }

    #[test]
    fn unknown_tech_key_falls_back_to_default() {
        for axis in TechAxis::ALL {
            assert_eq!(tech_multiplier(axis, "cobol"), DEFAULT_TECH_MULTIPLIER);
        }
        assert_eq!(tech_multiplier(TechAxis::Frontend, "angular"), 1.2);
        assert_eq!(tech_multiplier(TechAxis::Deployment, "shared"), 0.6);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(tech_multiplier(TechAxis::Backend, "Java"), DEFAULT_TECH_MULTIPLIER);
    }
}
