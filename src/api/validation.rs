//! Request-body validation for estimate creation.
//!
//! Bodies are checked against the JSON Schema derived from [`NewEstimate`].
//! Every violation is collected, so a client sees all problems in one
//! response. Unknown fields are ignored.

use std::sync::LazyLock;

use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{ValidationError, Validator};
use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;
use crate::models::NewEstimate;

/// Top-level fields, in the order their violations are reported.
const FIELD_ORDER: [&str; 8] = [
    "projectName",
    "projectType",
    "selectedFeatures",
    "techStack",
    "complexity",
    "hourlyRate",
    "totalHours",
    "totalCost",
];

static ESTIMATE_SCHEMA: LazyLock<Result<Validator, String>> = LazyLock::new(|| {
    let schema = schemars::schema_for!(NewEstimate);
    jsonschema::validator_for(schema.as_value()).map_err(|e| e.to_string())
});

/// One schema violation, addressed by its path into the request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub code: &'static str,
    pub path: Vec<PathSegment>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl Violation {
    pub fn new(code: &'static str, path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            code,
            path,
            message: message.into(),
        }
    }

    fn from_schema_error(error: &ValidationError<'_>) -> Self {
        let mut path = parse_pointer(error.instance_path.as_str());
        let instance = error.instance.as_ref();

        match &error.kind {
            ValidationErrorKind::Required { property } => {
                let key = property
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| property.to_string());
                path.push(PathSegment::Key(key));
                Self::new("invalid_type", path, "Required")
            }
            ValidationErrorKind::Type { kind } => Self::new(
                "invalid_type",
                path,
                format!(
                    "Expected {}, received {}",
                    expected_type(kind),
                    json_type(instance)
                ),
            ),
            ValidationErrorKind::Enum { options } => Self::new(
                "invalid_enum_value",
                path,
                format!(
                    "Invalid enum value. Expected {}, received {}",
                    enum_options(options),
                    quoted(instance)
                ),
            ),
            ValidationErrorKind::Minimum { limit } => Self::new(
                "too_small",
                path,
                format!("Number must be greater than or equal to {}", limit),
            ),
            ValidationErrorKind::Maximum { limit } => Self::new(
                "too_big",
                path,
                format!("Number must be less than or equal to {}", limit),
            ),
            ValidationErrorKind::Pattern { .. } => Self::new(
                "too_small",
                path,
                "String must contain at least 1 non-whitespace character(s)",
            ),
            _ => Self::new("custom", path, error.to_string()),
        }
    }

    fn field_rank(&self) -> usize {
        match self.path.first() {
            Some(PathSegment::Key(key)) => FIELD_ORDER
                .iter()
                .position(|f| f == key)
                .unwrap_or(FIELD_ORDER.len()),
            _ => 0,
        }
    }
}

/// Split a JSON pointer such as `/techStack/backend` into path segments.
fn parse_pointer(pointer: &str) -> Vec<PathSegment> {
    pointer
        .split('/')
        .skip(1)
        .map(|raw| match raw.parse::<usize>() {
            Ok(index) => PathSegment::Index(index),
            Err(_) => PathSegment::Key(raw.replace("~1", "/").replace("~0", "~")),
        })
        .collect()
}

fn expected_type(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Single(expected) => expected.to_string(),
        TypeKind::Multiple(_) => "a different type".to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn quoted(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}

fn enum_options(options: &Value) -> String {
    match options.as_array() {
        Some(values) => values.iter().map(quoted).collect::<Vec<_>>().join(" | "),
        None => options.to_string(),
    }
}

/// Parse and validate a create-estimate body.
pub fn parse_new_estimate(body: &[u8]) -> Result<NewEstimate, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ApiError::Validation(vec![Violation::new(
            "invalid_json",
            vec![],
            format!("Malformed JSON: {}", e),
        )])
    })?;
    validate_new_estimate(&value)
}

/// Validate an already-decoded JSON value against the estimate schema.
///
/// Violations come back grouped by field in declaration order, one per path.
pub fn validate_new_estimate(value: &Value) -> Result<NewEstimate, ApiError> {
    let validator = ESTIMATE_SCHEMA
        .as_ref()
        .map_err(|e| ApiError::Internal {
            context: "Estimate schema is unavailable",
            source: anyhow::anyhow!("{}", e),
        })?;

    let mut violations: Vec<Violation> = validator
        .iter_errors(value)
        .map(|e| Violation::from_schema_error(&e))
        .collect();

    if !violations.is_empty() {
        // A wrong type makes the enum check on the same value redundant.
        violations.sort_by(|a, b| {
            a.field_rank()
                .cmp(&b.field_rank())
                .then_with(|| a.path.cmp(&b.path))
                .then_with(|| (a.code != "invalid_type").cmp(&(b.code != "invalid_type")))
        });
        violations.dedup_by(|later, earlier| later.path == earlier.path);
        return Err(ApiError::Validation(violations));
    }

    // The schema's `integer` admits `75.0`; the typed record does not.
    serde_json::from_value(value.clone()).map_err(|e| {
        ApiError::Validation(vec![Violation::new(
            "invalid_type",
            vec![],
            format!("Expected integer amounts: {}", e),
        )])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "projectName": "Shop",
            "projectType": "ecommerce",
            "selectedFeatures": ["basic-auth", "payment"],
            "techStack": {
                "frontend": "react",
                "backend": "nodejs",
                "database": "postgresql",
                "deployment": "cloud"
            },
            "complexity": "medium",
            "hourlyRate": 500,
            "totalHours": 42,
            "totalCost": 21000
        })
    }

    fn violations(body: &Value) -> Vec<Violation> {
        match validate_new_estimate(body) {
            Err(ApiError::Validation(violations)) => violations,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    fn paths(violations: &[Violation]) -> Vec<String> {
        violations
            .iter()
            .map(|v| serde_json::to_string(&v.path).unwrap())
            .collect()
    }

    #[test]
    fn schema_compiles() {
        assert!(ESTIMATE_SCHEMA.is_ok(), "{:?}", ESTIMATE_SCHEMA.as_ref().err());
    }

    #[test]
    fn accepts_a_complete_body() {
        let estimate = validate_new_estimate(&valid_body()).unwrap();
        assert_eq!(estimate.project_name, "Shop");
        assert_eq!(estimate.complexity, crate::models::Complexity::Medium);
        assert_eq!(estimate.total_cost, 21000);
    }

    #[test]
    fn ignores_unknown_fields() {
        let mut body = valid_body();
        body["id"] = json!(99);
        body["notes"] = json!("extra");
        assert!(validate_new_estimate(&body).is_ok());
    }

    #[test]
    fn reports_every_missing_field_in_order() {
        let violations = violations(&json!({}));
        assert_eq!(violations.len(), 8);
        assert!(violations.iter().all(|v| v.message == "Required"));
        let fields: Vec<_> = violations
            .iter()
            .map(|v| serde_json::to_string(&v.path).unwrap())
            .collect();
        let expected: Vec<_> = FIELD_ORDER.iter().map(|f| format!("[\"{}\"]", f)).collect();
        assert_eq!(fields, expected);
    }

    #[test]
    fn reports_nested_paths() {
        let mut body = valid_body();
        body["techStack"]["backend"] = json!(3);
        body["selectedFeatures"] = json!(["crud", false]);

        let violations = violations(&body);
        assert_eq!(
            paths(&violations),
            vec![r#"["selectedFeatures",1]"#, r#"["techStack","backend"]"#]
        );
    }

    #[test]
    fn reports_missing_tech_axis_by_full_path() {
        let mut body = valid_body();
        body["techStack"].as_object_mut().unwrap().remove("deployment");

        let violations = violations(&body);
        assert_eq!(paths(&violations), vec![r#"["techStack","deployment"]"#]);
        assert_eq!(violations[0].message, "Required");
    }

    #[test]
    fn rejects_unknown_complexity() {
        let mut body = valid_body();
        body["complexity"] = json!("extreme");

        let violations = violations(&body);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, "invalid_enum_value");
        assert!(violations[0].message.ends_with("received 'extreme'"));
    }

    #[test]
    fn wrong_complexity_type_is_one_violation() {
        let mut body = valid_body();
        body["complexity"] = json!(2);

        let violations = violations(&body);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, "invalid_type");
    }

    #[test]
    fn rejects_negative_and_fractional_amounts() {
        let mut body = valid_body();
        body["hourlyRate"] = json!(-5);
        body["totalHours"] = json!(1.5);
        body["totalCost"] = json!("100");

        let violations = violations(&body);
        let codes: Vec<_> = violations.iter().map(|v| v.code).collect();
        assert_eq!(codes, vec!["too_small", "invalid_type", "invalid_type"]);
    }

    #[test]
    fn rejects_amounts_beyond_the_storable_range() {
        let mut body = valid_body();
        body["totalCost"] = json!(10_000_000_000_000_000_000u64);
        body["totalHours"] = json!(crate::models::MAX_AMOUNT + 1);

        let violations = violations(&body);
        let codes: Vec<_> = violations.iter().map(|v| v.code).collect();
        assert_eq!(codes, vec!["too_big", "too_big"]);
        assert_eq!(
            paths(&violations),
            vec![r#"["totalHours"]"#, r#"["totalCost"]"#]
        );
    }

    #[test]
    fn accepts_the_largest_storable_amount() {
        let mut body = valid_body();
        body["totalCost"] = json!(crate::models::MAX_AMOUNT);
        assert_eq!(
            validate_new_estimate(&body).unwrap().total_cost,
            crate::models::MAX_AMOUNT
        );
    }

    #[test]
    fn rejects_blank_project_name() {
        let mut body = valid_body();
        body["projectName"] = json!("   ");

        let violations = violations(&body);
        assert_eq!(violations[0].code, "too_small");
        assert_eq!(paths(&violations), vec![r#"["projectName"]"#]);
    }

    #[test]
    fn malformed_json_is_a_single_violation() {
        match parse_new_estimate(b"{not json") {
            Err(ApiError::Validation(violations)) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].code, "invalid_json");
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn non_object_body_is_rejected() {
        let violations = violations(&json!([1, 2]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "Expected object, received array");
    }

    #[test]
    fn pointer_segments_become_keys_and_indexes() {
        assert_eq!(
            parse_pointer("/selectedFeatures/3"),
            vec![
                PathSegment::Key("selectedFeatures".to_string()),
                PathSegment::Index(3)
            ]
        );
        assert!(parse_pointer("").is_empty());
    }
}
