use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::db::sqlite::VaultStorage;
use crate::handlers;
use crate::storage::ImageStore;
use crate::token::TokenKeys;

/// Body cap for the multipart routes: one 5 MiB image plus form overhead.
const BODY_LIMIT_BYTES: usize = 6 * 1024 * 1024;

/// Shared state handed to every handler; constructed once in `main` (or a
/// test harness) and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub storage: VaultStorage,
    pub images: Arc<dyn ImageStore>,
    pub keys: TokenKeys,
}

impl AppState {
    pub fn new(storage: VaultStorage, images: Arc<dyn ImageStore>, keys: TokenKeys) -> Self {
        Self {
            storage,
            images,
            keys,
        }
    }
}

/// Build the application router. `image_root` must match the directory the
/// state's image store writes into, so stored `images/...` references
/// resolve over HTTP.
pub fn vault_router(state: AppState, image_root: &Path) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route(
            "/accounts",
            post(handlers::accounts::create_account).get(handlers::accounts::list_accounts),
        )
        .route(
            "/accounts/{id}",
            put(handlers::accounts::update_account).delete(handlers::accounts::delete_account),
        )
        .nest_service("/images", ServeDir::new(image_root))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
