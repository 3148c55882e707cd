//! # campus-cms
//!
//! The entry point that assembles the application from its adapters:
//! Postgres storage, Argon2 passwords, JWT session tokens and the axum router.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{AppState, Ports, SessionPolicy};
use auth_adapters::{Argon2PasswordVerifier, JwtSessionTokens};
use configs::{LogSettings, Settings};
use secrecy::ExposeSecret;
use storage_adapters::PgStore;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings.log);

    // 1. Storage
    let store = Arc::new(
        PgStore::connect(
            settings.database.url.expose_secret(),
            settings.database.max_connections,
        )
        .await?,
    );
    store.migrate().await?;

    // 2. Auth
    let tokens = JwtSessionTokens::new(settings.auth.jwt_secret.expose_secret().as_bytes());

    // 3. Services and HTTP state
    let ports = Ports {
        posts: store.clone(),
        blocklist: store.clone(),
        admins: store,
        passwords: Arc::new(Argon2PasswordVerifier),
        tokens: Arc::new(tokens),
    };
    let session = SessionPolicy::from_settings(&settings.auth, settings.is_production());
    let state = AppState::new(ports, session);

    let app = api_adapters::router(state, &settings.cors.allowed_origins);

    // 4. Serve
    let address = settings.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(%address, environment = ?settings.environment, "campus-cms listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("server shut down");
    Ok(())
}

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
