//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and, when a refresh
//! schedule is configured, registers the catalog snapshot reload job.

use std::sync::Arc;

use dimo_search::{SharedCatalog, StoreCatalog};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    refresh_cron: Option<&str>,
    shared: SharedCatalog,
    source: Arc<dyn StoreCatalog>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    match refresh_cron {
        Some(cron) => register_refresh_job(&scheduler, cron, shared, source).await?,
        None => tracing::info!("scheduler: no catalog refresh schedule; snapshot is fixed"),
    }

    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_refresh_job(
    scheduler: &JobScheduler,
    cron: &str,
    shared: SharedCatalog,
    source: Arc<dyn StoreCatalog>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let shared = shared.clone();
        let source = Arc::clone(&source);

        Box::pin(async move {
            refresh_catalog(&shared, source.as_ref()).await;
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: catalog refresh registered");
    Ok(())
}

/// Reload the snapshot. A failed reload keeps serving the previous one.
async fn refresh_catalog(shared: &SharedCatalog, source: &dyn StoreCatalog) {
    match shared.refresh(source).await {
        Ok(stores) => tracing::info!(stores, "scheduler: catalog snapshot refreshed"),
        Err(e) => tracing::error!(
            error = %e,
            "scheduler: catalog refresh failed; keeping previous snapshot"
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use dimo_core::{Coordinate, RatingAggregate, StoreRecord};
    use dimo_search::{CatalogSnapshot, SourceError};

    use super::*;

    struct FlakyCatalog {
        healthy: AtomicBool,
    }

    #[async_trait]
    impl StoreCatalog for FlakyCatalog {
        async fn all_stores(&self) -> Result<Vec<StoreRecord>, SourceError> {
            if !self.healthy.load(Ordering::SeqCst) {
                return Err(SourceError::Unconfigured("catalog"));
            }
            Ok(vec![StoreRecord {
                id: 1,
                brand_name: "A".to_string(),
                sub_name: String::new(),
                category: String::new(),
                address: String::new(),
                coordinate: Coordinate {
                    latitude: 0.0,
                    longitude: 0.0,
                },
                rating: RatingAggregate::default(),
            }])
        }

        async fn store_by_id(&self, _id: i64) -> Result<Option<StoreRecord>, SourceError> {
            Ok(None)
        }

        async fn count_stores_by_brand(&self, _brand_id: i64) -> Result<i64, SourceError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn refresh_replaces_snapshot_and_survives_failures() {
        let shared = SharedCatalog::new(CatalogSnapshot::from_stores(Vec::new()));
        let source = FlakyCatalog {
            healthy: AtomicBool::new(true),
        };

        refresh_catalog(&shared, &source).await;
        assert_eq!(shared.current().await.len(), 1);

        source.healthy.store(false, Ordering::SeqCst);
        refresh_catalog(&shared, &source).await;
        assert_eq!(shared.current().await.len(), 1);
    }

    #[tokio::test]
    async fn invalid_cron_expression_is_rejected() {
        let shared = SharedCatalog::new(CatalogSnapshot::from_stores(Vec::new()));
        let source: Arc<dyn StoreCatalog> = Arc::new(FlakyCatalog {
            healthy: AtomicBool::new(true),
        });

        let result = build_scheduler(Some("not a cron"), shared, source).await;
        assert!(result.is_err());
    }
}
