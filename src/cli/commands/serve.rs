//! HTTP API server for the mascot front end.
//!
//! Exposes health check, single-turn query, and session-based chat endpoints.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::emotion::{Emotion, EmotionClassifier};
use crate::orchestrator::Orchestrator;
use crate::rag::QueryPipeline;
use crate::session::{ChatTurn, SessionStore};
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared application state.
struct AppState {
    pipeline: QueryPipeline,
    classifier: EmotionClassifier,
    sessions: SessionStore,
    /// Set once the index has been loaded or built.
    ready: AtomicBool,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve) {
        Output::error(&format!("{}", e));
        Output::info("Run 'maskot doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let cors_origin = settings.server.cors_origin.clone();

    let orchestrator = Orchestrator::new(settings)?;

    let state = Arc::new(AppState {
        pipeline: orchestrator.query_pipeline(None),
        classifier: EmotionClassifier::new(),
        sessions: SessionStore::new(),
        ready: AtomicBool::new(false),
    });

    // Prepare the index in the background; requests arriving before it
    // finishes get a 503
    {
        let state = state.clone();
        tokio::spawn(async move {
            match orchestrator.ensure_index().await {
                Ok(report) => {
                    info!(
                        "Index ready ({} chunks{})",
                        report.chunks_indexed,
                        if report.rebuilt { ", rebuilt" } else { "" }
                    );
                    state.ready.store(true, Ordering::SeqCst);
                }
                Err(e) => {
                    error!("Failed to prepare index: {}", e);
                }
            }
        });
    }

    // The mascot front end is the only expected caller
    let cors = match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/", get(health))
        .route("/query", post(query))
        .route("/chat", post(chat))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Maskot API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /");
    Output::kv("Query", "POST /query");
    Output::kv("Chat", "POST /chat");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct QueryRequest {
    question: String,
}

#[derive(Serialize)]
struct QueryResponse {
    text: String,
    emotion: Emotion,
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    session_id: Option<String>,
    /// Turns from a previous session the client wants carried over.
    #[serde(default)]
    history: Vec<ChatTurn>,
}

#[derive(Serialize)]
struct ChatResponse {
    session_id: String,
    text: String,
    emotion: Emotion,
    chat_history: Vec<ChatTurn>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn not_ready() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse {
            error: "Index not ready yet.".to_string(),
        }),
    )
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "Maskot backend running!" }))
}

async fn query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> impl IntoResponse {
    if !state.ready.load(Ordering::SeqCst) {
        return not_ready().into_response();
    }

    match state.pipeline.run(&req.question).await {
        Ok(result) => {
            let emotion = state.classifier.classify(&result.answer);
            Json(QueryResponse {
                text: result.answer,
                emotion,
            })
            .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    if !state.ready.load(Ordering::SeqCst) {
        return not_ready().into_response();
    }

    let is_new_session = req.session_id.is_none();
    let session_id = state.sessions.resolve(req.session_id);

    // Seed a fresh session with any history the client carried over
    if is_new_session {
        for turn in &req.history {
            state.sessions.record_turn(&session_id, &turn.question, &turn.answer);
        }
    }

    match state.pipeline.run(&req.message).await {
        Ok(result) => {
            let emotion = state.classifier.classify(&result.answer);
            state.sessions.record_turn(&session_id, &req.message, &result.answer);

            Json(ChatResponse {
                chat_history: state.sessions.history(&session_id),
                session_id,
                text: result.answer,
                emotion,
            })
            .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}
