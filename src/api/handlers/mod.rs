use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;

use super::error::ApiError;
use super::validation::{self, Violation};
use super::SharedStore;
use crate::catalog;
use crate::estimation::{self, Calculation, EstimateExport};
use crate::models::*;

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Estimates
// ============================================================

pub async fn list_estimates(
    State(store): State<SharedStore>,
) -> Result<Json<Vec<Estimate>>, ApiError> {
    store
        .get_all_estimates()
        .map(Json)
        .map_err(ApiError::internal("Failed to fetch estimates"))
}

pub async fn get_estimate(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<Estimate>, ApiError> {
    let id = parse_id(&id)?;

    store
        .get_estimate(id)
        .map_err(ApiError::internal("Failed to fetch estimate"))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn create_estimate(
    State(store): State<SharedStore>,
    body: Bytes,
) -> Result<(StatusCode, Json<Estimate>), ApiError> {
    let input = validation::parse_new_estimate(&body)?;

    store
        .create_estimate(input)
        .map(|e| (StatusCode::CREATED, Json(e)))
        .map_err(ApiError::internal("Failed to create estimate"))
}

/// Compute totals for a selection set without saving anything.
pub async fn calculate_estimate(
    payload: Result<Json<ProjectData>, JsonRejection>,
) -> Result<Json<Calculation>, ApiError> {
    let Json(data) = payload.map_err(|rejection| {
        ApiError::Validation(vec![Violation::new(
            "invalid_body",
            vec![],
            rejection.body_text(),
        )])
    })?;

    Ok(Json(estimation::calculate(&data)))
}

/// Download a saved estimate as a JSON attachment.
pub async fn export_estimate(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;

    let estimate = store
        .get_estimate(id)
        .map_err(ApiError::internal("Failed to fetch estimate"))?
        .ok_or(ApiError::NotFound)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        estimation::export_filename(&estimate.data.project_name)
    );

    Ok((
        [(header::CONTENT_DISPOSITION, disposition)],
        Json(EstimateExport::new(&estimate, Utc::now())),
    ))
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| {
        tracing::warn!("Rejected non-numeric estimate id: {}", raw);
        ApiError::InvalidId
    })
}

// ============================================================
// Catalog
// ============================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub features: &'static [Feature],
    pub tech_multipliers: Vec<TechAxisOptions>,
    pub complexities: [Complexity; 3],
    pub project_types: Vec<ProjectTypeOption>,
    pub defaults: ProjectData,
}

#[derive(Debug, Serialize)]
pub struct TechAxisOptions {
    pub axis: TechAxis,
    pub options: Vec<TechOption>,
}

#[derive(Debug, Serialize)]
pub struct TechOption {
    pub value: &'static str,
    pub multiplier: f64,
}

#[derive(Debug, Serialize)]
pub struct ProjectTypeOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub async fn get_catalog() -> Json<CatalogResponse> {
    let tech_multipliers = TechAxis::ALL
        .iter()
        .map(|&axis| TechAxisOptions {
            axis,
            options: catalog::multiplier_table(axis)
                .iter()
                .map(|&(value, multiplier)| TechOption { value, multiplier })
                .collect(),
        })
        .collect();

    let project_types = PROJECT_TYPES
        .iter()
        .map(|&(value, label)| ProjectTypeOption { value, label })
        .collect();

    Json(CatalogResponse {
        features: catalog::features(),
        tech_multipliers,
        complexities: Complexity::ALL,
        project_types,
        defaults: ProjectData::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_integers_only() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(ApiError::InvalidId)));
        assert!(matches!(parse_id("12abc"), Err(ApiError::InvalidId)));
        assert!(matches!(parse_id("1.5"), Err(ApiError::InvalidId)));
    }
}
