use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use papertrade_core::{
    history::{Order, ValuationHistory},
    provisioning::ResolvedRequest,
    Money,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiResult, main_lib::AppState};

/// Orders of the caller, oldest first.
async fn get_orders(
    State(state): State<Arc<AppState>>,
    Extension(resolved): Extension<ResolvedRequest>,
) -> ApiResult<Json<Vec<Order>>> {
    let mut orders = state
        .history_service
        .list_orders(resolved.user_id())
        .await?;
    orders.sort_by_key(|o| o.date);
    Ok(Json(orders))
}

/// Valuation history of the caller, oldest first.
async fn get_valuations(
    State(state): State<Arc<AppState>>,
    Extension(resolved): Extension<ResolvedRequest>,
) -> ApiResult<Json<Vec<ValuationHistory>>> {
    let mut history = state
        .history_service
        .list_valuation_history(resolved.user_id())
        .await?;
    history.sort_by_key(|v| v.date);
    Ok(Json(history))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordValuationRequest {
    /// Defaults to now.
    date: Option<DateTime<Utc>>,
    value: Money,
}

async fn record_valuation(
    State(state): State<Arc<AppState>>,
    Extension(resolved): Extension<ResolvedRequest>,
    Json(body): Json<RecordValuationRequest>,
) -> ApiResult<Json<ValuationHistory>> {
    let at = body.date.unwrap_or_else(|| state.clock.now());
    let entry = state
        .history_service
        .record_valuation(resolved.user_id(), at, body.value)
        .await?;
    Ok(Json(entry))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RotateRequest {
    /// Defaults to now minus the configured retention.
    before: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RotateResponse {
    deleted: usize,
    before: DateTime<Utc>,
}

async fn rotate_valuations(
    State(state): State<Arc<AppState>>,
    Extension(resolved): Extension<ResolvedRequest>,
    Json(body): Json<RotateRequest>,
) -> ApiResult<Json<RotateResponse>> {
    let before = body
        .before
        .unwrap_or_else(|| state.clock.now() - state.valuation_retention);
    let deleted = state
        .history_service
        .rotate_valuation_history(resolved.user_id(), before)
        .await?;
    Ok(Json(RotateResponse { deleted, before }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRequest {
    /// Price per unit of every held ticker.
    quotes: HashMap<String, Money>,
}

async fn record_snapshot(
    State(state): State<Arc<AppState>>,
    Extension(resolved): Extension<ResolvedRequest>,
    Json(body): Json<SnapshotRequest>,
) -> ApiResult<Json<ValuationHistory>> {
    let entry = state
        .history_service
        .record_portfolio_snapshot(resolved.user(), &body.quotes, state.clock.now())
        .await?;
    Ok(Json(entry))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(get_orders))
        .route("/valuations", get(get_valuations).post(record_valuation))
        .route("/valuations/rotate", post(rotate_valuations))
        .route("/valuations/snapshot", post(record_snapshot))
}
