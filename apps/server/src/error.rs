use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use papertrade_core::errors::Error as CoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Unauthorized(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => match e {
                CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                CoreError::AlreadyExists(_)
                | CoreError::DuplicateKey(_)
                | CoreError::TransactionConflict(_) => StatusCode::CONFLICT,
                CoreError::InsufficientFunds(_) | CoreError::InsufficientHolding(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                CoreError::Provisioning(_) => StatusCode::SERVICE_UNAVAILABLE,
                CoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
