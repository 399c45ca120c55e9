use crate::{error::ApiError, state::AppState};
use axum::{Extension, Json, extract::State};
use bookstore_token::ClaimSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub roles: BTreeSet<String>,
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(identity) = state
        .credentials
        .verify(body.username.trim(), &body.password)
        .await
    else {
        tracing::info!(username = %body.username, "login rejected");
        return Err(ApiError::invalid_credentials());
    };

    let issued = state.issuer.issue(identity).map_err(|e| {
        tracing::error!(error = %e, "failed to issue token");
        ApiError::internal("failed to issue token")
    })?;

    tracing::info!(subject = issued.claims.subject(), "login succeeded");
    Ok(Json(LoginResponse {
        expires_at: issued.claims.expires_at(),
        roles: issued.claims.roles().clone(),
        access_token: issued.token.into_string(),
        token_type: "Bearer",
    }))
}

/// `GET /api/auth/me`: the verified claims of the caller.
pub async fn me(Extension(claims): Extension<ClaimSet>) -> Json<ClaimSet> {
    Json(claims)
}
