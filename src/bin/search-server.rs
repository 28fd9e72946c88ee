use std::sync::Arc;

use tracing::info;

use webquarry::core::config::Config;
use webquarry::server::{self, ServerState};
use webquarry::store::SearchIndex;

fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("=== Search Engine Server ===");

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.ini".to_string());
    let config = Config::load(&config_path)?;

    // The configured thread count sizes the I/O runtime.
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.search_server.threads.max(1))
        .enable_all()
        .build()?
        .block_on(run(config))
}

async fn run(config: Config) -> anyhow::Result<()> {
    let index = SearchIndex::connect(&config.database).await?;

    let app = server::router(ServerState {
        backend: Arc::new(index),
        max_results: config.search_server.max_results,
    });

    let bind_addr = format!("{}:{}", config.search_server.host, config.search_server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("search server listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).ok();

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = async {
                if let Some(ref mut s) = sigterm {
                    s.recv().await;
                } else {
                    futures::future::pending::<()>().await;
                }
            } => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
