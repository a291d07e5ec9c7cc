/// Application state and router builder
///
/// # Example
///
/// ```
/// use bazaar_api::{app::{build_router, AppState}, config::Config};
///
/// let state = AppState::in_memory(Config::in_memory());
/// let app = build_router(state);
/// ```

use crate::{
    config::Config,
    middleware::{auth::token_auth_layer, security::SecurityHeadersLayer},
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use bazaar_shared::repository::{
    AccountRepository, InMemoryStore, PostgresStore, ProductRepository, TokenRepository,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; every field is
/// behind an `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountRepository>,

    pub products: Arc<dyn ProductRepository>,

    pub tokens: Arc<dyn TokenRepository>,

    /// Present with PostgreSQL storage, used by the health check
    pub db: Option<PgPool>,

    pub config: Arc<Config>,
}

impl AppState {
    /// State backed by PostgreSQL
    pub fn postgres(pool: PgPool, config: Config) -> Self {
        let store = Arc::new(PostgresStore::new(pool.clone()));

        Self {
            accounts: store.clone(),
            products: store.clone(),
            tokens: store,
            db: Some(pool),
            config: Arc::new(config),
        }
    }

    /// State backed by process-local memory
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(InMemoryStore::new());

        Self {
            accounts: store.clone(),
            products: store.clone(),
            tokens: store,
            db: None,
            config: Arc::new(config),
        }
    }

    pub fn page_size(&self) -> i64 {
        self.config.pagination.page_size
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET  /health
/// └── /api/
///     ├── POST            /login/
///     ├── GET, POST       /accounts/
///     ├── GET             /accounts/newest/:num
///     ├── PATCH, PUT      /accounts/:id/
///     ├── PATCH           /accounts/:id/management/
///     ├── GET, POST       /products/
///     └── GET, PATCH, PUT /products/:id/
/// ```
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, request tracing, then token
/// authentication on the `/api` routes.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let api_routes = Router::new()
        .route("/login/", post(routes::auth::login))
        .route(
            "/accounts/",
            get(routes::accounts::list_accounts).post(routes::accounts::create_account),
        )
        .route("/accounts/newest/:num", get(routes::accounts::newest_accounts))
        .route(
            "/accounts/:id/",
            patch(routes::accounts::partial_update_account).put(routes::accounts::update_account),
        )
        .route(
            "/accounts/:id/management/",
            patch(routes::accounts::set_account_active),
        )
        .route(
            "/products/",
            get(routes::products::list_products).post(routes::products::create_product),
        )
        .route(
            "/products/:id/",
            get(routes::products::get_product)
                .patch(routes::products::partial_update_product)
                .put(routes::products::update_product),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            token_auth_layer,
        ));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
