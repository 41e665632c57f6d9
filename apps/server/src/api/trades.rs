use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Extension, Json, Router};
use papertrade_core::{history::Order, provisioning::ResolvedRequest, Money, TradeAction};
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TradeRequest {
    ticker: String,
    action: TradeAction,
    /// Quote price per unit, supplied by the caller.
    price: Money,
    quantity: Money,
}

async fn execute_trade(
    State(state): State<Arc<AppState>>,
    Extension(resolved): Extension<ResolvedRequest>,
    Json(body): Json<TradeRequest>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = state
        .ledger_service
        .execute_trade(
            resolved.user_id(),
            &body.ticker,
            body.action,
            body.price,
            body.quantity,
        )
        .await?;
    tracing::info!(
        "{} executed {} {} {}",
        resolved.user_id(),
        order.action,
        order.size,
        order.ticker
    );
    Ok((StatusCode::CREATED, Json(order)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/trades", post(execute_trade))
}
