//! Shastra Chat API Gateway
//!
//! The entry point for all external API requests.
//! Handles:
//! - The chat endpoint and its grounding pipeline
//! - Chat history for identified users
//! - Observability (logging, metrics, tracing)

mod auth;
mod handlers;

use axum::{
    routing::{delete, get, post},
    Router,
};
use shastra_common::{
    auth::JwtManager,
    completion::create_completion_client,
    config::AppConfig,
    db::DbPool,
    metrics,
    rag::pipeline::ChatPipeline,
    rag::retrieve::DbContextSource,
    Repository,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, Level};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repo: Repository,
    pub pipeline: Arc<ChatPipeline>,
    pub jwt: Option<JwtManager>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .json()
        .init();

    info!("Starting Shastra Chat API Gateway v{}", shastra_common::VERSION);

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    let config = Arc::new(config);

    // Initialize metrics
    metrics::register_metrics();

    // Initialize database connection
    info!("Connecting to scripture store...");
    let db = DbPool::new(&config.database).await?;
    let repo = Repository::new(db);

    // Completion client, with credentials injected from configuration
    let completion = create_completion_client(&config.completion)?;
    info!(model = completion.model_name(), "Completion client ready");

    // Assemble the chat pipeline over its seams
    let source = Arc::new(DbContextSource::new(repo.clone(), &config.retrieval));
    let pipeline = Arc::new(ChatPipeline::new(
        source,
        completion,
        Arc::new(repo.clone()),
    ));

    let jwt = config
        .auth
        .jwt_secret
        .as_deref()
        .map(|secret| JwtManager::new(secret, 3600));
    if jwt.is_none() {
        info!("No JWT secret configured; all callers treated as anonymous");
    }

    // Create app state
    let state = AppState {
        config: config.clone(),
        repo,
        pipeline,
        jwt,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration (mobile clients call from app webviews)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // API routes
    let api_routes = Router::new()
        // Chat endpoint (identity optional)
        .route("/chat", post(handlers::chat::chat))

        // Chat history (identity required)
        .route("/chat/history", get(handlers::history::list_history))
        .route("/chat/history", delete(handlers::history::delete_history));

    // Compose the app
    Router::new()
        // Health endpoints (no auth, unversioned)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
