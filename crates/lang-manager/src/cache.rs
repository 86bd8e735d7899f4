use lang_catalog::{Catalog, Locale};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Locale-keyed store of lazily created catalogs.
///
/// Entries are created at most once per distinct locale: the membership
/// check and the insert run under one mutex, so concurrent first requests
/// for the same locale all receive the same catalog. The cache only ever
/// grows; there is no removal operation.
#[derive(Debug, Default)]
pub struct CatalogCache {
    inner: Mutex<FxHashMap<Locale, Arc<Catalog>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the catalog for `locale`, creating an empty one on first
    /// reference. Never fails.
    pub fn get_or_create(&self, locale: &Locale) -> Arc<Catalog> {
        let mut catalogs = self.inner.lock();
        catalogs
            .entry(locale.clone())
            .or_insert_with(|| Arc::new(Catalog::new(locale.clone())))
            .clone()
    }

    pub fn contains(&self, locale: &Locale) -> bool {
        self.inner.lock().contains_key(locale)
    }

    /// Read-only snapshot of the locales with a catalog entry.
    pub fn locales(&self) -> Vec<Locale> {
        self.inner.lock().keys().cloned().collect()
    }

    /// Snapshot of the cached catalogs, taken so callers can run catalog
    /// I/O without holding the cache lock.
    pub fn catalogs(&self) -> Vec<Arc<Catalog>> {
        self.inner.lock().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
