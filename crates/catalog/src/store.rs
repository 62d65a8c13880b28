use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use upsell_core::config::CatalogSourceKind;
use upsell_core::domain::vehicle::VehicleCategory;
use upsell_core::offer::catalog::Catalog;
use upsell_core::offer::protection::PROTECTION_TIER_COUNT;

use crate::cache::CatalogCache;
use crate::client::CatalogSource;
use crate::error::CatalogError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotOrigin {
    Remote,
    Cache,
}

/// One immutable catalog version. Requests hold an `Arc` to it for their
/// whole lifetime, so a refresh never changes the data under a running
/// selection.
#[derive(Clone, Debug)]
pub struct CatalogSnapshot {
    pub catalog: Catalog,
    pub fetched_at: DateTime<Utc>,
    pub origin: SnapshotOrigin,
}

impl CatalogSnapshot {
    pub fn new(catalog: Catalog, origin: SnapshotOrigin) -> Self {
        Self { catalog, fetched_at: Utc::now(), origin }
    }

    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.fetched_at).num_seconds().max(0)
    }

    /// Both pools populated and exactly the expected number of tiers.
    pub fn is_ready(&self) -> bool {
        self.catalog.pool_len(VehicleCategory::Comparable) > 0
            && self.catalog.pool_len(VehicleCategory::Upsell) > 0
            && self.catalog.protections().len() == PROTECTION_TIER_COUNT
    }
}

pub struct CatalogStore {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self { current: RwLock::new(Arc::new(snapshot)) }
    }

    /// Builds the first snapshot. A remote source falls back to the disk
    /// cache when the provider is unreachable.
    pub async fn initialize(
        preferred: CatalogSourceKind,
        source: &dyn CatalogSource,
        cache: &CatalogCache,
    ) -> Result<Self, CatalogError> {
        let snapshot = match preferred {
            CatalogSourceKind::Cache => CatalogSnapshot::new(cache.load()?, SnapshotOrigin::Cache),
            CatalogSourceKind::Remote => match source.fetch_catalog().await {
                Ok(catalog) => {
                    persist(cache, &catalog);
                    CatalogSnapshot::new(catalog, SnapshotOrigin::Remote)
                }
                Err(error) => {
                    warn!(
                        event_name = "catalog.remote_unavailable",
                        error = %error,
                        cache_dir = %cache.dir().display(),
                        "remote catalog fetch failed, falling back to cache"
                    );
                    CatalogSnapshot::new(cache.load()?, SnapshotOrigin::Cache)
                }
            },
        };

        info!(
            event_name = "catalog.loaded",
            origin = ?snapshot.origin,
            vehicle_count = snapshot.catalog.vehicles().len(),
            protection_count = snapshot.catalog.protections().len(),
            "catalog snapshot published"
        );
        Ok(Self::new(snapshot))
    }

    pub async fn current(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    pub async fn publish(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self.current.write().await = Arc::clone(&snapshot);
        snapshot
    }

    /// Fetches a fresh catalog and swaps it in. On failure the previous
    /// snapshot stays published.
    pub async fn refresh(
        &self,
        source: &dyn CatalogSource,
        cache: &CatalogCache,
    ) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        let catalog = source.fetch_catalog().await?;
        persist(cache, &catalog);
        Ok(self.publish(CatalogSnapshot::new(catalog, SnapshotOrigin::Remote)).await)
    }

    pub fn spawn_refresh(
        self: Arc<Self>,
        source: Arc<dyn CatalogSource>,
        cache: CatalogCache,
        interval: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately and the store is already fresh.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match self.refresh(source.as_ref(), &cache).await {
                    Ok(snapshot) => info!(
                        event_name = "catalog.refreshed",
                        vehicle_count = snapshot.catalog.vehicles().len(),
                        protection_count = snapshot.catalog.protections().len(),
                        "catalog refreshed"
                    ),
                    Err(error) => warn!(
                        event_name = "catalog.refresh_failed",
                        error = %error,
                        "catalog refresh failed, keeping previous snapshot"
                    ),
                }
            }
        })
    }
}

fn persist(cache: &CatalogCache, catalog: &Catalog) {
    if let Err(error) = cache.store(catalog) {
        warn!(event_name = "catalog.cache_write_failed", error = %error, "catalog cache not updated");
    }
}
