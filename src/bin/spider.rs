use std::sync::Arc;

use tracing::info;

use webquarry::core::config::Config;
use webquarry::fetch::HttpFetcher;
use webquarry::spider::CrawlEngine;
use webquarry::store::SearchIndex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("=== Search Engine Spider ===");

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.ini".to_string());
    let config = Config::load(&config_path)?;

    let index = SearchIndex::connect(&config.database).await?;
    index.create_tables().await?;

    let fetcher = HttpFetcher::new(
        &config.spider.user_agent,
        config.spider.request_timeout,
    )?;

    let engine = CrawlEngine::new(
        config.spider,
        Arc::new(fetcher),
        Arc::new(index.clone()),
    );
    let stats = engine.run().await;

    let index_stats = index.stats().await?;
    info!(
        "index now holds {} documents, {} words, {} document-word pairs",
        index_stats.documents, index_stats.words, index_stats.document_words
    );
    info!(
        "processed {} urls ({} errors, {} skipped)",
        stats.processed, stats.errors, stats.skipped
    );

    Ok(())
}
