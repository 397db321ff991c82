mod api;
mod cache;
mod middleware;
mod otp;
mod scheduler;
mod session;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use crate::cache::ResponseCache;
use crate::otp::OtpStore;
use crate::session::SessionStore;

const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(60);
const PRODUCT_CACHE_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(moonlight_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = moonlight_db::PoolConfig::from_app_config(&config);
    let pool = moonlight_db::connect_pool(&config.database_url, pool_config).await?;
    moonlight_db::run_migrations(&pool).await?;

    let _scheduler = scheduler::build_scheduler(pool.clone()).await?;

    let state = AppState {
        pool,
        sessions: SessionStore::new(Duration::from_secs(config.session_ttl_secs)),
        otp: OtpStore::new(Duration::from_secs(config.otp_ttl_secs)),
        product_cache: ResponseCache::new(PRODUCT_CACHE_TTL, PRODUCT_CACHE_CAPACITY),
        config: Arc::clone(&config),
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "storefront listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
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

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
