/*
 * Responsibility
 * - Load Config → build dependencies (store client, identity) → assemble the Router
 * - Apply middleware (bearer auth on /api, HTTP plumbing, CORS outermost)
 * - Start with axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, handlers::health::health};
use crate::config::Config;
use crate::middleware::{self, cors::OriginPolicy};
use crate::repos::{LinkStore, PgLinkStore};
use crate::services::identity::IdentityService;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,linkbin_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash the whole process so it gets noticed
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, OriginPolicy::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    // One pool for the whole process, handed to handlers through AppState.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to the link store")?;

    if config.database_run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to apply migrations")?;
        tracing::info!("migrations applied");
    }

    let store = PgLinkStore::new(pool);

    let identity = IdentityService::from_secret(config.auth_jwt_secret.as_deref());
    if !identity.verifies_signatures() {
        tracing::warn!(
            "AUTH_JWT_SECRET is not set: bearer tokens are decoded WITHOUT signature verification"
        );
    }

    tracing::info!(backend = store.backend_name(), "link store ready");

    Ok(AppState::new(Arc::new(store), Arc::new(identity)))
}

pub(crate) fn build_router(state: AppState, cors: OriginPolicy) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", api::routes(state.clone()))
        .with_state(state);

    let router = middleware::http::apply(router);
    middleware::cors::apply(router, cors)
}
