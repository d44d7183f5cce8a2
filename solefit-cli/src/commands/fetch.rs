//! `solefit fetch` - load a model through the cache and print its summary.

use std::sync::Arc;

use clap::Args;
use solefit::model::{HttpAssetFetcher, ModelCache, ModelCacheConfig, ModelId};
use solefit::telemetry::EngineMetrics;
use solefit::AppConfig;

use super::CommandResult;

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Model identifier (resolves to models/<id>.glb on the asset host).
    pub id: String,

    /// Override the configured asset base URL.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Load the model twice to demonstrate the cache hit.
    #[arg(long)]
    pub twice: bool,
}

pub async fn run(args: FetchArgs, config: &AppConfig) -> CommandResult {
    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| config.asset_base_url.clone());

    let metrics = Arc::new(EngineMetrics::new());
    let fetcher = Arc::new(HttpAssetFetcher::with_timeout(config.fetch_timeout)?);
    let cache = ModelCache::new(
        ModelCacheConfig {
            base_url,
            max_asset_bytes: config.max_asset_bytes,
        },
        fetcher,
        Arc::clone(&metrics),
    );

    let id = ModelId::new(args.id);
    println!("fetching {}", cache.asset_url(&id));

    let entry = cache.load(&id).await;
    println!("{}", entry.info());
    if entry.is_fallback {
        println!("note: asset unavailable, fallback geometry substituted");
    }

    if args.twice {
        cache.load(&id).await;
        let snapshot = metrics.snapshot();
        println!(
            "second load: {} cache hit(s), {} fetch(es)",
            snapshot.cache_hits, snapshot.model_loads
        );
    }

    Ok(())
}
