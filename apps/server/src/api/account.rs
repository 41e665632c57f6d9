use std::sync::Arc;

use axum::{routing::get, Extension, Json, Router};
use papertrade_core::{accounts::User, provisioning::ResolvedRequest};

use crate::{error::ApiResult, main_lib::AppState};

/// The caller's account, created on first contact.
async fn get_account(Extension(resolved): Extension<ResolvedRequest>) -> ApiResult<Json<User>> {
    Ok(Json(resolved.user().clone()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/account", get(get_account))
}
