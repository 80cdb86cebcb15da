use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};
use service::auth::repo::seaorm::SeaOrmUserStore;
use service::auth::repository::UserStore;
use service::auth::AuthConfig;
use service::flight::repo::seaorm::SeaOrmFlightStore;
use service::flight::repository::FlightStore;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load and validate configuration, then serve until the task is dropped.
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_and_validate()?;
    run_with_config(cfg).await
}

/// Connect storage, build the services and serve the router.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;

    let users: Arc<dyn UserStore> = Arc::new(SeaOrmUserStore { db: db.clone() });
    let flights: Arc<dyn FlightStore> = Arc::new(SeaOrmFlightStore { db });
    let auth_cfg = AuthConfig::from(&cfg.auth);
    info!(config = ?auth_cfg, "auth configured");
    let state = ServerState::new(users, flights, auth_cfg);

    let timeout = Duration::from_secs(cfg.server.request_timeout_secs);
    let app: Router = routes::build_router(state, build_cors(), timeout);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
