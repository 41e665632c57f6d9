//! Identity extraction and account provisioning for authenticated routes.
//!
//! Credentials are verified by the proxy in front of the server, which
//! forwards the caller's identity in `x-auth-*` headers.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use papertrade_core::{accounts::AuthenticatedIdentity, provisioning::UnresolvedRequest};

use crate::{error::ApiError, main_lib::AppState};

pub const PROVIDER_HEADER: &str = "x-auth-provider";
pub const SUBJECT_HEADER: &str = "x-auth-subject";
pub const DISPLAY_NAME_HEADER: &str = "x-auth-display-name";
pub const PROFILE_URL_HEADER: &str = "x-auth-profile-url";

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn identity_from_headers(headers: &HeaderMap) -> Result<AuthenticatedIdentity, ApiError> {
    let (Some(provider), Some(subject)) = (
        header_value(headers, PROVIDER_HEADER),
        header_value(headers, SUBJECT_HEADER),
    ) else {
        return Err(ApiError::Unauthorized(
            "missing authenticated identity".to_string(),
        ));
    };

    Ok(AuthenticatedIdentity {
        provider,
        subject,
        display_name: header_value(headers, DISPLAY_NAME_HEADER).unwrap_or_default(),
        profile_url: header_value(headers, PROFILE_URL_HEADER).unwrap_or_default(),
    })
}

/// Resolves the caller's account and stores the `ResolvedRequest` in the
/// request extensions for handlers to extract.
pub async fn require_account(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = identity_from_headers(request.headers())?;
    let resolved = state
        .provisioning
        .resolve(UnresolvedRequest::new(identity))
        .await?;
    request.extensions_mut().insert(resolved);
    Ok(next.run(request).await)
}
