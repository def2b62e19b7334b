use std::sync::Arc;

use golf_persistence_sqlite::{Repositories, connect_and_migrate};
use golf_server_api::SessionStore;
use golf_server_app::{build_application, ports::clock::SystemClock};
use log::info;

use crate::config::ServerConfig;

mod config;
mod logs;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "Ctrl+C",
        _ = terminate => "SIGTERM",
    };

    info!("Received {}, finishing open requests before exit", signal);
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env().expect("Invalid configuration");
    logs::init_logger(&config.log).expect("Failed to initialize logger");

    let pool = connect_and_migrate(&config.db_path)
        .await
        .expect("Failed to open database");
    info!("Opened database at {}", config.db_path);

    let repos = Repositories::new(pool);
    let app = Arc::new(build_application(
        Arc::new(repos.players),
        Arc::new(repos.admins),
        Arc::new(repos.rates),
        Arc::new(repos.games),
        Arc::new(repos.demo_numbers),
        Arc::new(SystemClock),
        config.calendar,
        config.policy,
    ));

    let report = app
        .admin_bootstrap_workflow
        .ensure_seeded(config.admin_seed.clone())
        .await
        .expect("Failed to seed initial data");
    if report.created_admin.is_some() || report.seeded_rate {
        info!(
            "First boot seeding done (admin: {}, default pricing: {})",
            report.created_admin.as_deref().unwrap_or("existing"),
            report.seeded_rate
        );
    }

    info!("Starting application");

    let sessions = Arc::new(SessionStore::new(config.session_ttl));
    if let Err(e) =
        golf_server_api::run(app, sessions, config.listen_addr, shutdown_signal()).await
    {
        log::error!("HTTP API failed: {}", e);
    }
}
