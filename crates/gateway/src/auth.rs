//! Request identity extractors.
//!
//! Identity is optional on the chat endpoint and mandatory on history
//! endpoints. A missing or invalid bearer token downgrades the caller to
//! anonymous rather than rejecting the request, so the chat endpoint
//! keeps working for logged-out sessions.

use axum::{extract::FromRequestParts, http::request::Parts};
use shastra_common::{auth::extract_bearer_token, AppError};
use uuid::Uuid;

use crate::AppState;

/// Caller identity, if a valid bearer token was presented.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<Uuid>);

/// Caller identity, required. Rejects with 401 when absent or invalid.
#[derive(Debug, Clone, Copy)]
pub struct RequireUser(pub Uuid);

fn resolve_user(parts: &Parts, state: &AppState) -> Option<Uuid> {
    let jwt = state.jwt.as_ref()?;

    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    let token = extract_bearer_token(header)?;

    match jwt.validate_token(token) {
        Ok(user_id) => Some(user_id),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token; treating caller as anonymous");
            None
        }
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve_user(parts, state)))
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state)
            .map(RequireUser)
            .ok_or_else(|| AppError::Unauthorized {
                message: "Valid bearer token required".to_string(),
            })
    }
}
