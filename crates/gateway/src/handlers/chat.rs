//! Chat endpoint handler
//!
//! Runs a grounded question-answering exchange: retrieve scriptural
//! context for the query, prompt the completion model against it, and
//! return the answer with its citations. Queries with no matching
//! context receive a fixed refusal instead of an ungrounded answer.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use shastra_common::{
    metrics,
    rag::pipeline::ChatQuery,
    AppError, ChatMode, Citation, Result,
};
use std::time::Instant;
use tracing::info;

use crate::auth::MaybeUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Missing query falls through to the blank-query rejection.
    #[serde(default)]
    pub query: String,

    /// Answer mode; unrecognized values fall back to seeker.
    #[serde(default)]
    pub mode: ChatMode,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub citations: Vec<Citation>,
    pub mode: ChatMode,
}

/// Oversize guard; the bound comes from `server.max_query_chars`.
fn check_query_length(query: &str, max_chars: usize) -> Result<()> {
    if query.chars().count() > max_chars {
        return Err(AppError::Validation {
            message: format!("Query must be at most {} characters", max_chars),
        });
    }
    Ok(())
}

/// Handle a chat query
pub async fn chat(
    State(state): State<AppState>,
    user: MaybeUser,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let start = Instant::now();

    check_query_length(&request.query, state.config.server.max_query_chars)?;

    let answer = state
        .pipeline
        .handle(ChatQuery {
            text: request.query,
            mode: request.mode,
            user_id: user.0,
        })
        .await?;

    let elapsed = start.elapsed().as_secs_f64();
    metrics::record_chat_latency(elapsed, answer.mode.as_str());

    info!(
        mode = answer.mode.as_str(),
        refused = answer.refused,
        citations = answer.citations.len(),
        duration_secs = elapsed,
        identified = user.0.is_some(),
        "Chat exchange completed"
    );

    Ok(Json(ChatResponse {
        response: answer.response,
        citations: answer.citations,
        mode: answer.mode,
    }))
}
