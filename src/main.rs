use axum::http::header::{ACCESS_CONTROL_ALLOW_CREDENTIALS, CONTENT_TYPE, COOKIE};
use axum::http::{HeaderValue, Method};
use fintastic_backend::config::{parse_log_level, Config};
use fintastic_backend::db::SqliteBackend;
use fintastic_backend::{build_router, AppState, PreferenceStore};
use rusqlite::Connection;
use time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::{self, TraceLayer};
use tower_sessions::{ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_rusqlite_store::RusqliteStore;
use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set the log level based on the first argument
    let args: Vec<String> = std::env::args().collect();
    let log_level = parse_log_level(args.get(1).map(String::as_str));

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .with_max_level(log_level)
        .init();

    tracing::info!("Log level set to: {}", log_level);

    let config = Config::from_env();

    // Initialize our session store as a SQLite database
    let conn = Connection::open(&config.sessions_db_path)?;
    let session_store = RusqliteStore::new(conn.into());
    session_store.migrate().await?;

    // Start a task to delete expired sessions every 5 seconds
    let deletion_task = tokio::task::spawn(
        session_store
            .clone()
            .continuously_delete_expired(tokio::time::Duration::from_secs(5)),
    );

    // Create session layer with some configuration
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)))
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/");

    // Initialize CORS layer
    let cors = CorsLayer::new()
        .allow_credentials(true)
        .allow_origin(config.frontend_url.parse::<HeaderValue>()?)
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(vec![ACCESS_CONTROL_ALLOW_CREDENTIALS, CONTENT_TYPE, COOKIE]);

    // Preferences live in their own SQLite database
    let prefs = PreferenceStore::new(SqliteBackend::open(&config.prefs_db_path)?);
    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config, prefs).await?;

    let app = build_router(state)
        // Session, CORS, and tracing layers
        .layer(session_layer)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        );

    // Run server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Listening on: {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    deletion_task.await??;

    Ok(())
}
