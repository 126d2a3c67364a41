//! Bookshelf Server - Library Catalog Manager
//!
//! REST API server tracking books, physical copies, and borrow history,
//! backed by a flat JSON document.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    store::JsonFileStore,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("bookshelf_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Bookshelf Server v{}", env!("CARGO_PKG_VERSION"));

    // Open the catalog document and build the repository
    let store = Arc::new(JsonFileStore::new(&config.storage.data_file));
    let repository = Repository::open(store)
        .await
        .expect("Failed to load catalog document");

    tracing::info!("Catalog document: {}", config.storage.data_file);

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create application state
    let services = Services::new(repository);
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(server_host.parse().expect("Invalid host address"), server_port);

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

    // API routes
    let api = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Books
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:book_id", get(api::books::get_book))
        .route("/books/:book_id", put(api::books::update_book))
        .route("/books/:book_id", delete(api::books::delete_book))
        // Copies
        .route("/books/:book_id/copies", post(api::copies::add_copy))
        .route("/books/:book_id/copies/:copy_id", put(api::copies::update_copy))
        .route("/books/:book_id/copies/:copy_id", delete(api::copies::remove_copy))
        // Circulation
        .route("/books/:book_id/copies/:copy_id/borrow", post(api::copies::borrow_copy))
        .route("/books/:book_id/copies/:copy_id/return", post(api::copies::return_copy))
        .route("/books/:book_id/copies/:copy_id/archive", post(api::copies::archive_copy))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api", api)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
