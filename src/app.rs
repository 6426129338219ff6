/*
 * Responsibility
 * - Load Config → build the gate → assemble the Router
 * - Apply HTTP-level middleware
 * - Start axum::serve()
 */
use std::{panic, process};

use anyhow::Result;
use axum::{Router, routing::get};
use basic_auth_gate::BasicAuthGate;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::v1::handlers::health::health;
use crate::config::{Config, ConfigError};
use crate::error::AppError;
use crate::{api, http, state::AppState};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,basic_auth_gate=debug,tower_http=debug cargo run
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

        // Development: crash the whole process so a broken authorizer is noticed.
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
        users = config.users.len(),
        challenge = config.challenge,
        "starting in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState, ConfigError> {
    let mut gate = BasicAuthGate::builder()
        .users(config.users.clone())
        .challenge(config.challenge)
        .allow_empty_credentials(config.allow_empty_credentials);

    if let Some(realm) = &config.realm {
        gate = gate.realm(realm.clone());
    }

    Ok(AppState::new(gate.build()?))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(&state))
        .fallback(not_found)
        .with_state(state);

    http::apply(router, config)
}

async fn not_found() -> AppError {
    AppError::NotFound
}
