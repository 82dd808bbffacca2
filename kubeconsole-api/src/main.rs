use kubeconsole_api::cmdb::{CmdbAccessor, SqlCmdb};
use kubeconsole_api::config::ConsoleConfig;
use kubeconsole_api::handlers;
use kubeconsole_api::logging::LoggingConfig;
use kubeconsole_api::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let console_config = ConsoleConfig::load();

    // Initialize logging; the guard flushes file output on exit
    let _log_guard = LoggingConfig::from(&console_config.logging)
        .init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if let Err(e) = console_config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(anyhow::anyhow!("Invalid configuration: {}", e));
    }
    info!("Configuration loaded successfully");
    let console_config = Arc::new(console_config);

    // Connect to the CMDB
    let cmdb = SqlCmdb::new(
        &console_config.database.url,
        console_config.database.max_connections,
    )
    .await?;

    if console_config.database.run_migrations {
        cmdb.migrate().await?;
    }
    info!("CMDB initialized");

    let cmdb: Arc<dyn CmdbAccessor> = Arc::new(cmdb);
    let state = AppState::new(console_config.clone(), cmdb);
    info!(
        kinds = state.dispatcher.registry().kinds().len(),
        page_size = console_config.paging.page_size,
        "Resource registry ready"
    );

    let app = handlers::router(state);

    let addr = format!(
        "{}:{}",
        console_config.server.host, console_config.server.port
    );
    info!("Kubeconsole API listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}

/// Resolves on SIGTERM or Ctrl+C
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = tokio::signal::ctrl_c() => info!("Received Ctrl+C"),
                }
            }
            Err(e) => {
                error!("Failed to register SIGTERM handler: {}", e);
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for Ctrl+C: {}", e);
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
        info!("Received Ctrl+C");
    }
}
