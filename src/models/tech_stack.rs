use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Technology choices for a project, one free-form key per axis.
///
/// Keys are not validated against the multiplier tables: an unrecognized
/// choice simply contributes the default multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TechStack {
    pub frontend: String,
    pub backend: String,
    pub database: String,
    pub deployment: String,
}

impl TechStack {
    pub fn new(
        frontend: impl Into<String>,
        backend: impl Into<String>,
        database: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            frontend: frontend.into(),
            backend: backend.into(),
            database: database.into(),
            deployment: deployment.into(),
        }
    }

    /// The chosen key on one axis.
    pub fn choice(&self, axis: TechAxis) -> &str {
        match axis {
            TechAxis::Frontend => &self.frontend,
            TechAxis::Backend => &self.backend,
            TechAxis::Database => &self.database,
            TechAxis::Deployment => &self.deployment,
        }
    }
}

impl Default for TechStack {
    fn default() -> Self {
        Self::new("react", "nodejs", "postgresql", "cloud")
    }
}

/// One of the four technology axes a stack is chosen along.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TechAxis {
    Frontend,
    Backend,
    Database,
    Deployment,
}

impl TechAxis {
    pub const ALL: [TechAxis; 4] = [
        Self::Frontend,
        Self::Backend,
        Self::Database,
        Self::Deployment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Database => "database",
            Self::Deployment => "deployment",
        }
    }
}
