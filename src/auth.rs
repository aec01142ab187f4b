use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
    typed_header::TypedHeaderRejection,
};
use tracing::warn;

use crate::{AppState, error::AppError};

/// Rejects requests that lack the configured Basic credentials.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    credentials: Result<TypedHeader<Authorization<Basic>>, TypedHeaderRejection>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Ok(TypedHeader(Authorization(basic))) = credentials else {
        return Err(AppError::Unauthorized);
    };

    if !state.config.admin.matches(basic.username(), basic.password()) {
        warn!(
            username = %basic.username(),
            path = %request.uri().path(),
            "rejected admin credentials"
        );
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
