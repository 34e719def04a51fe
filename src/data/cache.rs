use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use super::error::DataSourceError;
use super::loader::load_file;
use super::model::RentTable;

/// A published dataset snapshot: the table plus the load error, if any.
///
/// On failure `table` is empty, so every query degrades to NotFound / an
/// empty ranking instead of failing.
#[derive(Debug)]
pub struct LoadedDataset {
    pub source: PathBuf,
    pub table: RentTable,
    pub error: Option<DataSourceError>,
}

impl LoadedDataset {
    fn read(source: &Path) -> Self {
        match load_file(source) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows with {} columns from {}",
                    table.len(),
                    table.column_names.len(),
                    source.display()
                );
                LoadedDataset {
                    source: source.to_path_buf(),
                    table,
                    error: None,
                }
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                LoadedDataset {
                    source: source.to_path_buf(),
                    table: RentTable::empty(),
                    error: Some(e),
                }
            }
        }
    }
}

/// Process-wide, load-once holder of the rent table.
///
/// Snapshots are immutable and shared through `Arc`. A reload builds a new
/// snapshot and swaps it in whole; readers keep whichever snapshot they
/// already hold.
#[derive(Debug)]
pub struct DatasetCache {
    source: RwLock<PathBuf>,
    current: RwLock<Option<Arc<LoadedDataset>>>,
}

impl DatasetCache {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        DatasetCache {
            source: RwLock::new(source.into()),
            current: RwLock::new(None),
        }
    }

    pub fn source(&self) -> PathBuf {
        self.source
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The published snapshot, reading the source on first access only.
    ///
    /// A failed first read is cached too; retry with [`DatasetCache::reload`].
    pub fn load(&self) -> Arc<LoadedDataset> {
        if let Some(snapshot) = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Arc::clone(snapshot);
        }

        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have loaded between the two locks.
        if let Some(snapshot) = slot.as_ref() {
            return Arc::clone(snapshot);
        }
        let snapshot = Arc::new(LoadedDataset::read(&self.source()));
        *slot = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Read the source again and publish the result in place of the old
    /// snapshot.
    pub fn reload(&self) -> Arc<LoadedDataset> {
        let snapshot = Arc::new(LoadedDataset::read(&self.source()));
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Point the cache at another file and publish its contents.
    pub fn replace_source(&self, source: impl Into<PathBuf>) -> Arc<LoadedDataset> {
        let source = source.into();
        log::info!("Switching dataset source to {}", source.display());
        *self.source.write().unwrap_or_else(PoisonError::into_inner) = source;
        self.reload()
    }
}
