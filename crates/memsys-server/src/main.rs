//! memsys-server - Memory System backend server
//!
//! Role-gated REST API for events, feedback and reports.

use anyhow::Context;
use memsys_core::db::NewUser;
use memsys_core::{Database, Role};
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod middleware;
mod routes;
mod sessions;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("memsys_server=info".parse()?))
        .init();

    info!("memsys-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = config::Config::load()?;
    info!("Config loaded from {:?}", config.config_path);

    let db = Database::open_path(&config.database_path)
        .with_context(|| format!("opening database {:?}", config.database_path))?;
    info!("Database ready at {:?}", config.database_path);

    bootstrap_admin(&config, &db)?;

    let bind_addr = config.bind_addr.clone();
    let state = state::AppState::new(config, db);
    spawn_session_sweeper(state.clone());
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down...");
    Ok(())
}

/// Seed the configured admin account into an empty user table
fn bootstrap_admin(config: &config::Config, db: &Database) -> anyhow::Result<()> {
    if db.count_users()? > 0 {
        return Ok(());
    }

    let Some(admin) = &config.bootstrap_admin else {
        warn!("No users exist and no bootstrap admin is configured; nobody can sign in");
        return Ok(());
    };

    let user = db.create_user(&NewUser {
        name: admin.name.clone(),
        email: admin.email.clone(),
        role: Role::Admin,
        password: admin.password.clone(),
    })?;
    info!("Bootstrapped admin account {}", user.email);
    Ok(())
}

/// Periodically drop expired login sessions
fn spawn_session_sweeper(state: Arc<state::AppState>) {
    let period = Duration::from_secs(state.config.session_ttl_secs.clamp(60, 15 * 60));
    tokio::spawn(async move {
        let mut ticker = interval(period);
        loop {
            ticker.tick().await;
            let removed = state.sessions.sweep_expired().await;
            if removed > 0 {
                debug!("Swept {} expired sessions", removed);
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
