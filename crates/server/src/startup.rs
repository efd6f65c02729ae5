use std::future::Future;
use std::net::SocketAddr;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use service::seed;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

/// CORS for the configured frontend origin; `*` allows any origin.
pub fn build_cors(cfg: &configs::CorsConfig) -> Result<CorsLayer, StartupError> {
    let origin = cfg.allowed_origin.trim();
    if origin == "*" {
        return Ok(CorsLayer::very_permissive());
    }
    let origin = HeaderValue::from_str(origin)
        .map_err(|e| StartupError::InvalidConfig(format!("cors.allowed_origin: {e}")))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

/// Open the pool and, when enabled, bring the schema up to date.
pub async fn connect_database(cfg: &configs::DatabaseConfig) -> Result<DatabaseConnection, StartupError> {
    let db = models::db::connect_with_config(&models::db::DatabaseConfig::from(cfg)).await?;
    // Production schemas may be managed out of band; AUTO_MIGRATE=false skips this
    if cfg.auto_migrate {
        migration::Migrator::up(&db, None).await?;
        info!("database schema up to date");
    }
    Ok(db)
}

/// Router plus the pool handle the caller must close on shutdown.
pub async fn build_app(cfg: &AppConfig) -> Result<(Router, DatabaseConnection), StartupError> {
    let db = connect_database(&cfg.database).await?;
    let state = AppState::new(db.clone(), &cfg.auth);

    // Demo rows go through the services so they obey the same validation
    if cfg.database.seed_demo_data {
        let report = seed::seed_demo_data(state.customers.as_ref(), state.products.as_ref()).await?;
        info!(inserted = report.inserted, skipped = report.skipped, "demo data loaded");
    }

    // CORS is validated before any request is served
    let app = routes::build_router(state, build_cors(&cfg.cors)?);
    Ok((app, db))
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    // Whichever signal arrives first starts the graceful shutdown
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

/// Serve until `shutdown` resolves, then close the pool.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    db: DatabaseConnection,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    db.close().await?;
    info!("database pool closed");
    Ok(())
}

/// Public entry: build the app from an already validated config and run
/// the HTTP server until a shutdown signal arrives.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    // Pool, migrations and optional demo data come before the listener
    let (app, db) = build_app(&cfg).await?;

    // Bind by (host, port) so hostnames resolve as well as literal IPs
    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, sqlite = cfg.database.is_sqlite(), "listening");

    // Drain in-flight requests, then release the pool
    serve(listener, app, db, shutdown_signal()).await
}
