//! Pollcast server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use pollcast_api::{router as api_router, AppState};
use pollcast_common::Config;
use pollcast_core::{ChatClient, PollService, SurveyService};
use pollcast_db::repositories::{
    BlockRepository, DistributedPollRepository, PollRepository, QuestionRepository,
    ResponseRepository, UserRepository, VoteRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
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
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pollcast=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting pollcast server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = pollcast_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    pollcast_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let poll_repo = PollRepository::new(Arc::clone(&db));
    let vote_repo = VoteRepository::new(Arc::clone(&db));
    let survey_repo = DistributedPollRepository::new(Arc::clone(&db));
    let block_repo = BlockRepository::new(Arc::clone(&db));
    let question_repo = QuestionRepository::new(Arc::clone(&db));
    let response_repo = ResponseRepository::new(Arc::clone(&db));

    // Initialize outbound chat client and services
    let chat = ChatClient::new(&config.chat)?;
    let poll_service = PollService::new(poll_repo, vote_repo, user_repo.clone(), chat.clone());
    let survey_service = SurveyService::new(
        Arc::clone(&db),
        survey_repo,
        block_repo,
        question_repo,
        response_repo,
        user_repo,
        chat.clone(),
    );

    // Create app state
    let state = AppState {
        poll_service,
        survey_service,
        chat,
        chat_config: config.chat.clone(),
    };

    // Build router
    let app = api_router()
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
