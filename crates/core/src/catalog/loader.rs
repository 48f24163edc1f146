//! # Catalog Loader
//!
//! One index request, a concurrent fan-out of record fetches, and an
//! order-preserving reassembly.
//!
//! ```text
//! fetch_index ──▶ [e0, e1, e2, …]
//!                   │   │   │
//!                JoinSet (any completion order)
//!                   │   │   │
//!                slots[0] slots[1] slots[2]   (each written once)
//!                   └───┴───┴──▶ Catalog in index order
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::error::{CatalogError, RecordError};
use super::record::{IndexEntry, Locator, Record};
use super::source::RecordSource;
use crate::config::{DexConfig, FetchWindow};

/// An index entry that did not make it into the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedEntry {
    /// Position in the index page
    pub position: usize,
    pub name: String,
    /// Empty when the catalog was built directly from records
    pub locator: Locator,
    /// `fetch`, `parse`, `duplicate`, or `incomplete`
    pub kind: String,
    pub reason: String,
}

/// The fetch task panicked or was aborted before filling its slot
const KIND_INCOMPLETE: &str = "incomplete";
const KIND_DUPLICATE: &str = "duplicate";

/// Outcome of one load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    /// Entries listed by the index page
    pub requested: usize,
    /// Records kept in the catalog
    pub loaded: usize,
    pub dropped: Vec<DroppedEntry>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadReport {
    /// True when at least one index entry was dropped
    pub fn is_partial(&self) -> bool {
        !self.dropped.is_empty()
    }
}

/// Ordered, immutable set of resolved records
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    records: Vec<Arc<Record>>,
    report: LoadReport,
}

impl Catalog {
    /// Build a catalog directly from records, keeping the first of any
    /// duplicate id. Later duplicates are listed in the report.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        let mut dropped = Vec::new();
        let mut requested = 0;
        for (position, record) in records.into_iter().enumerate() {
            requested += 1;
            if seen.insert(record.id) {
                kept.push(Arc::new(record));
            } else {
                tracing::warn!(id = record.id, name = %record.name, "Duplicate record id dropped");
                dropped.push(DroppedEntry {
                    position,
                    reason: format!("duplicate id {}", record.id),
                    name: record.name,
                    locator: Locator::new(String::new()),
                    kind: KIND_DUPLICATE.to_string(),
                });
            }
        }
        let report = LoadReport {
            requested,
            loaded: kept.len(),
            dropped,
            loaded_at: Utc::now(),
        };
        Self {
            records: kept,
            report,
        }
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Record>> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look a record up by id
    pub fn get(&self, id: u32) -> Option<&Arc<Record>> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}

/// Loads a catalog from a record source
pub struct CatalogLoader {
    source: Arc<dyn RecordSource>,
    max_concurrent: Option<usize>,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            max_concurrent: None,
        }
    }

    /// Loader configured from a `DexConfig` (only the concurrency cap is read)
    pub fn with_config(source: Arc<dyn RecordSource>, config: &DexConfig) -> Self {
        Self {
            source,
            max_concurrent: config.max_concurrent_fetches,
        }
    }

    /// Limit the number of record fetches in flight
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = Some(max.max(1));
        self
    }

    /// Fetch the index window and resolve every entry.
    ///
    /// Fails only when the index itself cannot be fetched. Records that
    /// fail to resolve are left out and listed in the catalog's report.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self, window: FetchWindow) -> Result<Catalog, CatalogError> {
        let entries = self.source.fetch_index(window).await?;
        tracing::info!(entries = entries.len(), "Index page fetched");

        let slots = self.resolve_all(&entries).await;
        Ok(assemble(&entries, slots))
    }

    async fn resolve_all(&self, entries: &[IndexEntry]) -> Vec<Option<Result<Record, RecordError>>> {
        let limiter = self.max_concurrent.map(|n| Arc::new(Semaphore::new(n.max(1))));
        let mut join_set = JoinSet::new();

        // SCATTER
        for (position, entry) in entries.iter().enumerate() {
            let source = Arc::clone(&self.source);
            let locator = entry.locator.clone();
            let limiter = limiter.clone();

            join_set.spawn(async move {
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                (position, source.fetch_record(&locator).await)
            });
        }

        // GATHER into write-once slots
        let mut slots: Vec<Option<Result<Record, RecordError>>> =
            entries.iter().map(|_| None).collect();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((position, result)) => {
                    debug_assert!(slots[position].is_none(), "slot written twice");
                    slots[position] = Some(result);
                }
                Err(e) => tracing::warn!(error = %e, "Record fetch task did not complete"),
            }
        }

        slots
    }
}

fn assemble(entries: &[IndexEntry], slots: Vec<Option<Result<Record, RecordError>>>) -> Catalog {
    let mut records = Vec::with_capacity(entries.len());
    let mut dropped = Vec::new();
    let mut seen = HashSet::new();

    for (position, (entry, slot)) in entries.iter().zip(slots).enumerate() {
        let (kind, reason) = match slot {
            Some(Ok(record)) if seen.insert(record.id) => {
                records.push(Arc::new(record));
                continue;
            }
            Some(Ok(record)) => (KIND_DUPLICATE, format!("duplicate id {}", record.id)),
            Some(Err(e)) => (e.kind(), e.to_string()),
            None => (KIND_INCOMPLETE, "fetch task did not complete".to_string()),
        };

        tracing::warn!(
            position,
            name = %entry.name,
            locator = %entry.locator,
            kind,
            reason = %reason,
            "Record excluded from catalog"
        );
        dropped.push(DroppedEntry {
            position,
            name: entry.name.clone(),
            locator: entry.locator.clone(),
            kind: kind.to_string(),
            reason,
        });
    }

    if !dropped.is_empty() {
        tracing::warn!(
            "Catalog loaded with {} of {} records ({} dropped)",
            records.len(),
            entries.len(),
            dropped.len()
        );
    } else {
        tracing::info!(records = records.len(), "Catalog loaded");
    }

    let report = LoadReport {
        requested: entries.len(),
        loaded: records.len(),
        dropped,
        loaded_at: Utc::now(),
    };

    Catalog { records, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{record, FakeSource};
    use std::time::Duration;
    use tokio_test::assert_ok;

    fn ids(catalog: &Catalog) -> Vec<u32> {
        catalog.iter().map(|r| r.id).collect()
    }

    #[tokio::test]
    async fn test_catalog_preserves_index_order() {
        let source = FakeSource::new()
            .with_record(record(495, "snivy", &["grass"]))
            .with_record(record(498, "tepig", &["fire"]))
            .with_record(record(501, "oshawott", &["water"]));
        let loader = CatalogLoader::new(Arc::new(source));

        let catalog = assert_ok!(loader.load(FetchWindow::new(3, 494)).await);
        assert_eq!(ids(&catalog), vec![495, 498, 501]);
        assert!(!catalog.report().is_partial());
        assert_eq!(catalog.report().requested, 3);
    }

    #[tokio::test]
    async fn test_completion_order_does_not_leak() {
        let forward = FakeSource::new()
            .with_delayed(record(1, "a", &["fire"]), Duration::from_millis(5))
            .with_delayed(record(2, "b", &["fire"]), Duration::from_millis(25))
            .with_delayed(record(3, "c", &["fire"]), Duration::from_millis(45));
        let reversed = FakeSource::new()
            .with_delayed(record(1, "a", &["fire"]), Duration::from_millis(45))
            .with_delayed(record(2, "b", &["fire"]), Duration::from_millis(25))
            .with_delayed(record(3, "c", &["fire"]), Duration::from_millis(5));

        let first = CatalogLoader::new(Arc::new(forward))
            .load(FetchWindow::new(3, 0))
            .await
            .unwrap();
        let second = CatalogLoader::new(Arc::new(reversed))
            .load(FetchWindow::new(3, 0))
            .await
            .unwrap();

        assert_eq!(ids(&first), vec![1, 2, 3]);
        assert_eq!(ids(&first), ids(&second));
    }

    #[tokio::test]
    async fn test_index_failure_produces_no_catalog() {
        let source = FakeSource::new()
            .with_record(record(1, "a", &["fire"]))
            .failing_index();
        let loader = CatalogLoader::new(Arc::new(source));

        let err = loader.load(FetchWindow::new(1, 0)).await.unwrap_err();
        assert!(matches!(err, CatalogError::IndexFetch { .. }));
    }

    #[tokio::test]
    async fn test_single_failure_drops_only_that_entry() {
        let source = FakeSource::new()
            .with_record(record(1, "a", &["fire"]))
            .with_fetch_failure("b")
            .with_record(record(3, "c", &["water"]))
            .with_record(record(4, "d", &["grass"]));
        let loader = CatalogLoader::new(Arc::new(source));

        let catalog = loader.load(FetchWindow::new(4, 0)).await.unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(ids(&catalog), vec![1, 3, 4]);

        let report = catalog.report();
        assert!(report.is_partial());
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].position, 1);
        assert_eq!(report.dropped[0].locator, FakeSource::locator_for("b"));
        assert_eq!(report.dropped[0].kind, "fetch");
    }

    #[tokio::test]
    async fn test_panicked_fetch_drops_only_its_slot() {
        let source = FakeSource::new()
            .with_record(record(1, "a", &["fire"]))
            .with_panic("b")
            .with_delayed(record(3, "c", &["water"]), Duration::from_millis(10));
        let loader = CatalogLoader::new(Arc::new(source));

        let catalog = loader.load(FetchWindow::new(3, 0)).await.unwrap();
        assert_eq!(ids(&catalog), vec![1, 3]);

        let report = catalog.report();
        assert_eq!(report.requested, 3);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].position, 1);
        assert_eq!(report.dropped[0].name, "b");
        assert_eq!(report.dropped[0].locator, FakeSource::locator_for("b"));
        assert_eq!(report.dropped[0].kind, "incomplete");
    }

    #[tokio::test]
    async fn test_empty_index_is_empty_catalog() {
        let loader = CatalogLoader::new(Arc::new(FakeSource::new()));

        let catalog = loader.load(FetchWindow::new(0, 0)).await.unwrap();
        assert!(catalog.is_empty());
        assert!(!catalog.report().is_partial());
    }

    #[tokio::test]
    async fn test_duplicate_ids_keep_first() {
        let source = FakeSource::new()
            .with_record(record(7, "first", &["fire"]))
            .with_record(record(7, "second", &["water"]));
        let loader = CatalogLoader::new(Arc::new(source));

        let catalog = loader.load(FetchWindow::new(2, 0)).await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(7).unwrap().name, "first");
        assert_eq!(catalog.report().dropped[0].name, "second");
        assert_eq!(catalog.report().dropped[0].kind, "duplicate");
    }

    #[tokio::test]
    async fn test_concurrency_cap_still_loads_everything() {
        let source = (1..=6).fold(FakeSource::new(), |source, id| {
            source.with_delayed(record(id, &format!("mon{}", id), &["bug"]), Duration::from_millis(2))
        });
        let loader = CatalogLoader::new(Arc::new(source)).with_max_concurrent(2);

        let catalog = loader.load(FetchWindow::new(6, 0)).await.unwrap();
        assert_eq!(ids(&catalog), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_from_records_dedupes() {
        let catalog = Catalog::from_records(vec![
            record(1, "a", &["fire"]),
            record(1, "b", &["fire"]),
            record(2, "c", &["water"]),
        ]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(3).is_none());

        let report = catalog.report();
        assert_eq!(report.requested, 3);
        assert_eq!(report.loaded, 2);
        assert!(report.is_partial());
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].position, 1);
        assert_eq!(report.dropped[0].name, "b");
        assert_eq!(report.dropped[0].reason, "duplicate id 1");
    }

    #[test]
    fn test_from_records_without_duplicates_is_complete() {
        let catalog = Catalog::from_records(vec![record(1, "a", &["fire"]), record(2, "b", &["water"])]);
        assert!(!catalog.report().is_partial());
        assert_eq!(catalog.report().loaded, 2);
    }
}
