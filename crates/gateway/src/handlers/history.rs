//! Chat history handlers
//!
//! History is only recorded for identified users, so both endpoints
//! require a valid bearer token.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shastra_common::Result;
use tracing::info;
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::AppState;

const DEFAULT_HISTORY_LIMIT: u64 = 50;
const MAX_HISTORY_LIMIT: u64 = 200;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    DEFAULT_HISTORY_LIMIT
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub query_mode: String,
    pub user_query: String,
    pub bot_response: String,
    pub citations: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<HistoryEntry>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteHistoryResponse {
    pub deleted: u64,
}

/// List the caller's most recent exchanges, newest first
pub async fn list_history(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>> {
    let limit = params.limit.clamp(1, MAX_HISTORY_LIMIT);

    let messages = state.repo.list_exchanges(user_id, limit).await?;

    let entries: Vec<HistoryEntry> = messages
        .into_iter()
        .map(|m| HistoryEntry {
            id: m.id,
            query_mode: m.query_mode,
            user_query: m.user_query,
            bot_response: m.bot_response,
            citations: m.citations,
            created_at: m.created_at.with_timezone(&Utc),
        })
        .collect();

    let total = entries.len();
    Ok(Json(HistoryResponse {
        messages: entries,
        total,
    }))
}

/// Delete all of the caller's stored exchanges
pub async fn delete_history(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> Result<Json<DeleteHistoryResponse>> {
    let deleted = state.repo.delete_exchanges(user_id).await?;

    info!(%user_id, deleted, "Cleared chat history");

    Ok(Json(DeleteHistoryResponse { deleted }))
}
