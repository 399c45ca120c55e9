use crate::{error::ApiError, state::AppState};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Axum middleware running every request through the access table.
///
/// On success the caller's verified claims (if any) are stored in the
/// request extensions as a `ClaimSet`.
pub async fn require_access(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let admission = state
        .guard
        .admit(req.method().as_str(), req.uri().path(), authorization)?;

    if let Some(claims) = admission.into_claims() {
        req.extensions_mut().insert(claims);
    }

    Ok(next.run(req).await)
}
