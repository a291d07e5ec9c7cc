//! # Bazaar API Server
//!
//! REST backend for a small marketplace: account registration and token
//! login, seller-owned products, and administrator account management.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/bazaar cargo run -p bazaar-api
//! STORAGE=memory cargo run -p bazaar-api
//! ```

use bazaar_api::{
    app::{build_router, AppState},
    bootstrap::ensure_admin,
    config::{Config, StorageBackend},
};
use bazaar_shared::db::{
    migrations::{ensure_database_exists, run_migrations},
    pool::{close_pool, create_pool, DatabaseConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the log format is read
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!(
        "Bazaar API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let bind_address = config.bind_address();
    let bootstrap_admin = config.bootstrap_admin.clone();

    let state = match config.storage {
        StorageBackend::Postgres => {
            ensure_database_exists(&config.database.url).await?;

            let pool = create_pool(DatabaseConfig {
                url: config.database.url.clone(),
                max_connections: config.database.max_connections,
                ..Default::default()
            })
            .await?;

            run_migrations(&pool).await?;
            AppState::postgres(pool, config)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; all data is lost on shutdown");
            AppState::in_memory(config)
        }
    };

    if let Some(credentials) = &bootstrap_admin {
        ensure_admin(&state, credentials).await?;
    }

    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = state.db {
        close_pool(pool).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` filter, `LOG_FORMAT=json` for JSON lines
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar_api=debug,bazaar_shared=info,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
