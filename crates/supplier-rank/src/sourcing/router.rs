use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{PartQuery, PurchaseOrderRecord, ALL_YEARS_LABEL};
use super::recommendation::RecommendationView;
use super::service::SupplierRecommender;
use crate::error::AppError;
use crate::history::{DataStatus, HistoryHandle, ReloadError};

/// Router builder exposing the recommendation, catalogue and reload endpoints.
pub fn sourcing_router(handle: HistoryHandle) -> Router {
    Router::new()
        .route("/api/v1/parts", get(catalogue_handler))
        .route(
            "/api/v1/parts/:part_id/recommendation",
            get(recommendation_handler),
        )
        .route("/api/v1/parts/:part_id/orders", get(order_log_handler))
        .route("/api/v1/history/reload", post(reload_handler))
        .with_state(handle)
}

#[derive(Debug, Default, Deserialize)]
pub struct YearParams {
    #[serde(default)]
    pub year: Option<String>,
}

impl YearParams {
    fn query_for(&self, part_id: &str) -> Result<PartQuery, AppError> {
        let year = self.year.as_deref().unwrap_or(ALL_YEARS_LABEL);
        Ok(PartQuery::parse(part_id, year)?)
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogueView {
    pub parts: Vec<String>,
    pub suppliers: Vec<String>,
    pub years: Vec<i32>,
    /// Selector choices: "All Years" followed by each year, newest first.
    pub year_options: Vec<String>,
    pub record_count: usize,
    pub loaded_at: DateTime<Utc>,
    pub data: DataStatus,
}

#[derive(Debug, Serialize)]
pub struct OrderLogView {
    pub part_id: String,
    pub year: String,
    pub orders: Vec<PurchaseOrderRecord>,
}

pub(crate) async fn catalogue_handler(State(handle): State<HistoryHandle>) -> Json<CatalogueView> {
    let snapshot = handle.snapshot();
    let store = snapshot.store();
    let years = store.years();
    let year_options = std::iter::once(ALL_YEARS_LABEL.to_string())
        .chain(years.iter().map(i32::to_string))
        .collect();

    Json(CatalogueView {
        parts: store.parts(),
        suppliers: store.suppliers(),
        years,
        year_options,
        record_count: store.len(),
        loaded_at: snapshot.loaded_at(),
        data: snapshot.status().clone(),
    })
}

pub(crate) async fn recommendation_handler(
    State(handle): State<HistoryHandle>,
    Path(part_id): Path<String>,
    Query(params): Query<YearParams>,
) -> Result<Json<RecommendationView>, AppError> {
    let query = params.query_for(&part_id)?;
    let snapshot = handle.snapshot();
    let recommendation = SupplierRecommender::new().recommend(&snapshot, &query);
    Ok(Json(RecommendationView::new(&query, recommendation)))
}

pub(crate) async fn order_log_handler(
    State(handle): State<HistoryHandle>,
    Path(part_id): Path<String>,
    Query(params): Query<YearParams>,
) -> Result<Json<OrderLogView>, AppError> {
    let query = params.query_for(&part_id)?;
    let snapshot = handle.snapshot();
    let orders = SupplierRecommender::new()
        .order_log(snapshot.store(), &query)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(OrderLogView {
        part_id: query.part_id().to_string(),
        year: query.year().label(),
        orders,
    }))
}

/// Re-reads the history file on the blocking pool; readers keep the old snapshot meanwhile.
pub(crate) async fn reload_handler(State(handle): State<HistoryHandle>) -> Response {
    let outcome = match tokio::task::spawn_blocking(move || handle.reload()).await {
        Ok(outcome) => outcome,
        Err(err) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("history reload task failed: {}", err) })),
            )
                .into_response();
        }
    };

    match outcome {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({ "status": "reloaded", "report": report })),
        )
            .into_response(),
        Err(ReloadError::NoSource) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": ReloadError::NoSource.to_string() })),
        )
            .into_response(),
        Err(ReloadError::Load(err)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": err.to_string(),
                "status": "previous history retained",
            })),
        )
            .into_response(),
    }
}
