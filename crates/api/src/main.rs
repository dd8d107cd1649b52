use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mentorly_api::auth::jwt::TokenCodec;
use mentorly_api::auth::oauth::HttpOAuthClient;
use mentorly_api::config::ServerConfig;
use mentorly_api::router::build_app_router;
use mentorly_api::state::AppState;
use mentorly_events::{EmailConfig, EmailDelivery, EmailQueue, RetryPolicy};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mentorly_api=debug,mentorly_events=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        session_policy = ?config.session_policy,
        oauth_providers = ?config.oauth.enabled(),
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = mentorly_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    mentorly_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    mentorly_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Token codec ---
    let tokens = Arc::new(TokenCodec::new(&config.jwt).expect("Failed to build token codec"));

    // --- OAuth ---
    let oauth = Arc::new(
        HttpOAuthClient::new(
            config.oauth.clone(),
            Duration::from_secs(config.oauth_timeout_secs),
        )
        .expect("Failed to build OAuth HTTP client"),
    );

    // --- Email ---
    let email_cancel = CancellationToken::new();
    let (mailer, email_handle) = match EmailConfig::from_env().map(EmailDelivery::new) {
        Some(Ok(delivery)) => {
            let (queue, worker) = EmailQueue::new(
                config.email_queue_capacity,
                Arc::new(delivery),
                RetryPolicy::default(),
            );
            let handle = tokio::spawn(worker.run(email_cancel.clone()));
            (Some(queue), Some(handle))
        }
        Some(Err(e)) => {
            tracing::error!(error = %e, "Invalid SMTP configuration, email disabled");
            (None, None)
        }
        None => {
            tracing::info!("SMTP_HOST not set, email disabled");
            (None, None)
        }
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        tokens,
        oauth,
        mailer,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    email_cancel.cancel();
    if let Some(handle) = email_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Email worker stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
