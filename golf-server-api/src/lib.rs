use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{delete, get, post},
};
use golf_server_app::Application;
use log::info;

mod admin;
mod auth;
mod demo_numbers;
mod error;
mod games;
mod players;
mod pricing;
mod reports;

pub use auth::{AdminSession, SESSION_COOKIE, SessionStore};
pub use error::ServiceError;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
    pub sessions: Arc<SessionStore>,
}

pub fn router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/login", post(admin::login))
        .route("/logout", post(admin::logout))
        .route("/me", get(admin::me))
        .route("/dashboard-stats", get(reports::dashboard_stats))
        .route("/recent-games", get(reports::recent_games))
        .route("/sales/{period}", get(reports::sales_for_period))
        .route("/hourly-sales", get(reports::hourly_sales))
        .route("/weekly-sales", get(reports::weekly_sales))
        .route("/monthly-sales", get(reports::monthly_sales))
        .route("/custom-sales", get(reports::custom_sales))
        .route("/transactions", get(reports::transactions))
        .route("/pricing", post(pricing::set_rate))
        .route("/pricing-history", get(pricing::rate_history))
        .route(
            "/demo-numbers",
            get(demo_numbers::list).post(demo_numbers::add),
        )
        .route("/demo-numbers/{id}", delete(demo_numbers::remove));

    let router: Router<AppState> = Router::new().nest(
        "/api",
        Router::new()
            .route("/players", post(players::register))
            .route("/games", post(games::create))
            .route("/games/{id}", get(games::get_by_id))
            .route("/games/{id}/scores", post(games::append_scores))
            .route("/pricing", get(pricing::current_rate))
            .nest("/admin", admin_routes),
    );
    router.with_state(state)
}

pub async fn run(
    app: Arc<Application>,
    sessions: Arc<SessionStore>,
    addr: SocketAddr,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API server listening on {}", addr);
    axum::serve(listener, router(AppState { app, sessions }))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP API shut down gracefully");
    Ok(())
}
