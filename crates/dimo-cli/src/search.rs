//! `search` and `store` command handlers.
//!
//! Both run the same pipeline the server uses, against a snapshot loaded
//! for this invocation only.

use std::sync::Arc;
use std::time::Duration;

use dimo_core::{AppConfig, Coordinate};
use dimo_db::PgCatalog;
use dimo_recsys::RecsysClient;
use dimo_search::{
    CatalogSnapshot, DisabledRanker, PersonalizedRanker, ScoredCandidate, SearchEngine,
    SearchRequest, SearchResult,
};

#[derive(Debug, Clone)]
pub(crate) struct SearchArgs {
    pub user_id: i64,
    pub lat: f64,
    pub long: f64,
    pub km_limit: f64,
    pub recsys_url: Option<String>,
}

fn build_engine(
    catalog: Arc<PgCatalog>,
    config: &AppConfig,
    recsys_url: Option<&str>,
) -> anyhow::Result<SearchEngine> {
    let timeout = Duration::from_millis(config.recsys_timeout_ms);
    let ranker: Arc<dyn PersonalizedRanker> = match recsys_url {
        Some(url) => Arc::new(RecsysClient::new(url, timeout)?),
        None => Arc::new(DisabledRanker),
    };
    Ok(SearchEngine::new(catalog.clone(), catalog, ranker, timeout))
}

/// Run a nearby search and print the ordered results.
///
/// # Errors
///
/// Returns an error if the coordinates or radius are invalid, the ranking
/// service URL cannot be parsed, or the catalog cannot be loaded.
pub(crate) async fn run_search(
    pool: sqlx::PgPool,
    config: &AppConfig,
    args: SearchArgs,
) -> anyhow::Result<()> {
    let origin = Coordinate::new(args.lat, args.long)?;
    if !args.km_limit.is_finite() || args.km_limit <= 0.0 {
        anyhow::bail!("--km-limit must be a positive number of kilometres");
    }

    let catalog = Arc::new(PgCatalog::new(pool));
    let recsys_url = args.recsys_url.as_deref().or(config.recsys_url.as_deref());
    let engine = build_engine(Arc::clone(&catalog), config, recsys_url)?;

    let snapshot = CatalogSnapshot::load(catalog.as_ref()).await?;
    tracing::debug!(stores = snapshot.len(), "catalog snapshot loaded");

    let result = engine
        .search(
            &snapshot,
            &SearchRequest {
                user_id: args.user_id,
                origin,
                radius_km: args.km_limit,
            },
        )
        .await?;

    for line in format_results(&result) {
        println!("{line}");
    }
    Ok(())
}

/// Print one store with its distance from `(lat, long)`.
///
/// # Errors
///
/// Returns an error if the coordinates are invalid, the store does not
/// exist, or the query fails.
pub(crate) async fn run_store(
    pool: sqlx::PgPool,
    config: &AppConfig,
    id: i64,
    lat: f64,
    long: f64,
) -> anyhow::Result<()> {
    let origin = Coordinate::new(lat, long)?;
    let catalog = Arc::new(PgCatalog::new(pool));
    let engine = build_engine(catalog, config, None)?;

    let store = engine
        .store_detail(id, origin)
        .await?
        .ok_or_else(|| anyhow::anyhow!("store {id} not found"))?;

    println!("{}", table_header());
    println!("{}", table_row(&store));
    Ok(())
}

fn table_header() -> String {
    format!(
        "{:<8}{:<6}{:<24}{:<24}{:>10}  ADDRESS",
        "ID", "RANK", "BRAND", "BRANCH", "KM"
    )
}

fn table_row(store: &ScoredCandidate) -> String {
    let rank = if store.rank == 0 {
        "-".to_string()
    } else {
        store.rank.to_string()
    };
    format!(
        "{:<8}{:<6}{:<24}{:<24}{:>10.3}  {}",
        store.store_id,
        rank,
        truncate(&store.brand_name, 22),
        truncate(&store.sub_name, 22),
        store.distance_km,
        store.address
    )
}

pub(crate) fn format_results(result: &SearchResult) -> Vec<String> {
    if result.stores.is_empty() {
        return vec![format!(
            "no stores in range ({} outside the radius)",
            result.rejected
        )];
    }

    let mut lines = Vec::with_capacity(result.stores.len() + 2);
    lines.push(table_header());
    lines.extend(result.stores.iter().map(table_row));
    lines.push(format!(
        "{} store(s), ranking: {}, {:.3}s",
        result.stores.len(),
        result.ranking_source,
        result.elapsed.as_secs_f64()
    ));
    lines
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        format!("{}...", value.chars().take(max_chars - 3).collect::<String>())
    } else {
        value.to_string()
    }
}
