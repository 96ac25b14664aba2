use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use common_auth::SecurityManager;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;

use task_service::app::build_router;
use task_service::auth_service::AuthService;
use task_service::config::load_service_config;
use task_service::metrics::ServiceMetrics;
use task_service::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = load_service_config()?;
    info!(environment = %config.environment, "configuration loaded");

    let db = PgPool::connect(&config.database_url).await?;
    let security = Arc::new(SecurityManager::new(config.security));
    let auth = AuthService::new(db.clone(), security);
    let metrics = Arc::new(ServiceMetrics::new()?);

    let app = build_router(AppState { db, auth, metrics });

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);
    let ip: std::net::IpAddr = host.parse()?;
    let addr = SocketAddr::from((ip, port));

    println!("starting task-service on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
