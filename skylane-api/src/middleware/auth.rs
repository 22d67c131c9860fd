use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{auth::verify_token, error::AppError, state::AppState};

/// Bearer-token gate for the nested account resources. On success the
/// verified claims are placed in the request extensions for handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthenticated("Not authenticated".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthenticated("Not authenticated".to_string()))?;

    let claims = verify_token(&state.auth, token)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
