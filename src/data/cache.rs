use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use std::time::SystemTime;

use super::error::LoadError;
use super::loader;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

/// Identifies one version of a source file. Two keys compare equal only when
/// they name the same path with the same length and modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceKey {
    pub path: PathBuf,
    len: u64,
    modified: Option<SystemTime>,
}

impl SourceKey {
    /// Fingerprint the file currently at `path`.
    pub fn for_path(path: &Path) -> Result<Self, LoadError> {
        let io_err = |source: std::io::Error| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let path = path.canonicalize().map_err(io_err)?;
        let meta = std::fs::metadata(&path).map_err(io_err)?;
        Ok(SourceKey {
            path,
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Single-slot dataset cache
// ---------------------------------------------------------------------------

/// Holds the most recently loaded dataset together with the key it was
/// loaded from. Readers share the lock; only a miss takes the write lock.
#[derive(Debug, Default)]
pub struct DatasetCache {
    slot: RwLock<Option<(SourceKey, Arc<Dataset>)>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache instance.
    pub fn global() -> &'static DatasetCache {
        static GLOBAL: OnceLock<DatasetCache> = OnceLock::new();
        GLOBAL.get_or_init(DatasetCache::new)
    }

    /// Return the cached dataset for `key`, parsing the file on a miss.
    pub fn get_or_load(&self, key: &SourceKey) -> Result<Arc<Dataset>, LoadError> {
        self.get_or_load_with(key, || loader::load_path(&key.path))
    }

    fn get_or_load_with<F>(&self, key: &SourceKey, load: F) -> Result<Arc<Dataset>, LoadError>
    where
        F: FnOnce() -> Result<Dataset, LoadError>,
    {
        {
            let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
            if let Some((cached_key, dataset)) = slot.as_ref() {
                if cached_key == key {
                    log::debug!("Dataset cache hit for {}", key.path.display());
                    return Ok(Arc::clone(dataset));
                }
            }
        }

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have filled the slot while we waited.
        if let Some((cached_key, dataset)) = slot.as_ref() {
            if cached_key == key {
                return Ok(Arc::clone(dataset));
            }
        }

        log::debug!("Dataset cache miss for {}", key.path.display());
        let dataset = Arc::new(load()?);
        *slot = Some((key.clone(), Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Forget the cached dataset so the next access reparses.
    pub fn invalidate(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    const CSV: &str = "name,online_order,book_table,rate,votes,approx_cost(for two people),listed_in(type)\n\
                       A,Yes,No,4.1/5,10,800,Dining\n";

    fn temp_csv(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn same_key_is_loaded_once() {
        let file = temp_csv(CSV);
        let key = SourceKey::for_path(file.path()).unwrap();
        let cache = DatasetCache::new();
        let calls = AtomicUsize::new(0);

        let load = || {
            calls.fetch_add(1, Ordering::SeqCst);
            loader::load_path(&key.path)
        };
        let first = cache.get_or_load_with(&key, load).unwrap();
        let second = cache.get_or_load_with(&key, load).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn changed_source_invalidates_entry() {
        let mut file = temp_csv(CSV);
        let cache = DatasetCache::new();

        let before = cache.get_or_load(&SourceKey::for_path(file.path()).unwrap()).unwrap();
        assert_eq!(before.len(), 1);

        file.write_all(b"B,No,Yes,3.0/5,50,300,Delivery\n").unwrap();
        file.flush().unwrap();

        let key = SourceKey::for_path(file.path()).unwrap();
        let after = cache.get_or_load(&key).unwrap();
        assert_eq!(after.len(), 2);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn failed_load_leaves_cache_empty() {
        let file = temp_csv(CSV);
        let key = SourceKey::for_path(file.path()).unwrap();
        let cache = DatasetCache::new();

        let result = cache.get_or_load_with(&key, || Err(LoadError::MissingColumn("rate")));
        assert!(result.is_err());

        let ds = cache.get_or_load(&key).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn invalidate_forces_reload() {
        let file = temp_csv(CSV);
        let key = SourceKey::for_path(file.path()).unwrap();
        let cache = DatasetCache::new();

        let first = cache.get_or_load(&key).unwrap();
        cache.invalidate();
        let second = cache.get_or_load(&key).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn concurrent_callers_share_one_instance() {
        let file = temp_csv(CSV);
        let key = SourceKey::for_path(file.path()).unwrap();
        let cache = DatasetCache::new();

        let handles: Vec<Arc<Dataset>> = std::thread::scope(|s| {
            let workers: Vec<_> = (0..4)
                .map(|_| s.spawn(|| cache.get_or_load(&key).unwrap()))
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        for ds in &handles[1..] {
            assert!(Arc::ptr_eq(&handles[0], ds));
        }
    }

    #[test]
    fn missing_file_has_no_key() {
        assert!(SourceKey::for_path(Path::new("/definitely/not/here.csv")).is_err());
    }
}
