use axum::{
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::response::PrettyJson;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Authentication required")]
    Unauthorized,
    #[error("{message}: {cause:#}")]
    Internal { message: &'static str, cause: anyhow::Error },
}

impl AppError {
    pub fn missing_field(name: &str) -> Self {
        Self::BadRequest(format!("Missing required field: {name}"))
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Internal { message, .. } => (*message).to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Internal { message: "Internal server error", cause: anyhow::Error::new(err) }
    }
}

/// Attaches the client-facing message a route reports when its storage call
/// fails.
pub trait OrFail<T> {
    fn or_fail(self, message: &'static str) -> AppResult<T>;
}

impl<T> OrFail<T> for AppResult<T> {
    fn or_fail(self, message: &'static str) -> AppResult<T> {
        self.map_err(|err| match err {
            AppError::Internal { cause, .. } => AppError::Internal { message, cause },
            other => other,
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Internal { message, cause } = &self {
            tracing::error!(error = %cause, "{message}");
        }

        let mut resp =
            (status, PrettyJson(json!({ "error": self.public_message() }))).into_response();
        if matches!(self, AppError::Unauthorized) {
            resp.headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Basic realm=\"Admin Panel\""));
        }
        resp
    }
}

pub type AppResult<T> = Result<T, AppError>;
