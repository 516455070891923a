//! Request handlers for the gateway endpoints.

use std::path::PathBuf;

use axum::Json;
use axum::extract::{Query, State};
use codechat_core::ChatSession;
use codechat_core::session::{FAREWELL, NOT_INITIALIZED_REPLY, RESPONSE_PREFIX, is_exit_phrase};
use codechat_index::{ChunkerConfig, RetrieverConfig, build_index, chunk_directory};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct InitializeParams {
    pub directory_path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InitializeResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

/// Chunk the directory, embed everything and swap in a fresh session.
/// Any failure leaves the current session untouched.
pub async fn initialize(
    State(state): State<AppState>,
    Query(params): Query<InitializeParams>,
) -> Result<Json<InitializeResponse>, GatewayError> {
    let directory = PathBuf::from(&params.directory_path);
    let chunker_config = ChunkerConfig {
        chunk_size: state.config.index.chunk_size,
        chunk_overlap: state.config.index.chunk_overlap,
        ignore_folders: state.config.index.ignore_folders.clone(),
        ignore_files: state.config.index.ignore_files.clone(),
    };

    let walk_dir = directory.clone();
    let chunks = tokio::task::spawn_blocking(move || chunk_directory(&walk_dir, &chunker_config))
        .await
        .map_err(|e| GatewayError::Internal(e.to_string()))??;

    let (index, report) = build_index(chunks, &state.provider).await?;

    let retriever_config = RetrieverConfig {
        k: state.config.index.k,
        fetch_k: state.config.index.fetch_k,
        lambda: state.config.index.lambda,
    };
    let session = ChatSession::new(
        state.provider.clone(),
        index,
        retriever_config,
        state.config.chat.history_budget_tokens,
    );

    *state.session.write().await = Some(session);
    tracing::info!(
        directory = %directory.display(),
        chunks = report.chunks_indexed,
        "session initialized"
    );

    Ok(Json(InitializeResponse {
        message: format!(
            "Initialized codebase at {}: {} chunks indexed",
            params.directory_path, report.chunks_indexed
        ),
    }))
}

/// Answer a chat message. Exit phrases return the farewell without
/// touching the session or the model; an uninitialized session gets a
/// fixed reply instead of an error.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, GatewayError> {
    if is_exit_phrase(&request.message) {
        return Ok(Json(ChatResponse {
            response: FAREWELL.to_string(),
        }));
    }

    let mut guard = state.session.write().await;
    let Some(session) = guard.as_mut() else {
        return Ok(Json(ChatResponse {
            response: NOT_INITIALIZED_REPLY.to_string(),
        }));
    };

    let answer = session.ask(&request.message).await?;
    Ok(Json(ChatResponse {
        response: format!("{RESPONSE_PREFIX}{answer}"),
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
