//! Libris Server - Library Catalog Management System
//!
//! A Rust REST API server for managing a library catalog, its borrow
//! workflow and its readers.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libris_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{storage::StorageService, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("libris_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Libris Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Initialize object storage client
    let storage = StorageService::new(&config.storage).await;

    tracing::info!("Object storage client ready (bucket '{}')", config.storage.bucket);

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone(), storage);

    // Ensure the administrator account exists
    services
        .auth
        .bootstrap_admin(&config.admin)
        .await
        .expect("Failed to bootstrap administrator account");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Books (catalog)
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id", patch(api::books::update_book))
        .route("/books/:id", delete(api::books::delete_book))
        .route("/books/:id/rate", patch(api::books::rate_book))
        .route("/books/:id/review", post(api::books::review_book))
        .route("/books/:id/reviews", get(api::books::list_reviews))
        // Categories
        .route("/categories", get(api::categories::list_categories))
        .route("/categories", post(api::categories::create_category))
        .route("/categories/:id", get(api::categories::get_category))
        .route("/categories/:id", patch(api::categories::update_category))
        .route("/categories/:id", delete(api::categories::delete_category))
        // Borrow workflow
        .route("/borrow", post(api::borrows::create_borrow))
        .route("/borrow/my", get(api::borrows::my_borrows))
        .route("/borrow/:id/status", patch(api::borrows::update_borrow_status))
        .route("/borrow/:id/request", patch(api::borrows::update_request_status))
        .route("/borrow/:id", delete(api::borrows::delete_borrow))
        .route("/borrow/status/:status/count", get(api::borrows::count_by_borrow_status))
        .route("/borrow/status/:status/list", get(api::borrows::list_by_borrow_status))
        .route("/borrow/request/:status/count", get(api::borrows::count_by_request_status))
        .route("/borrow/request/:status/list", get(api::borrows::list_by_request_status))
        // Administration
        .route("/admin/users", post(api::users::create_user))
        .route("/admin/settings", get(api::settings::get_settings))
        .route("/admin/settings", put(api::settings::update_settings))
        // Public settings
        .route("/settings/public", get(api::settings::get_public_settings))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
