use crate::cache::CatalogCache;
use crate::fallback::resolve_locale;
use arc_swap::ArcSwap;
use lang_catalog::{CatalogError, Encoding, Locale};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum LanguageError {
    /// A lookup was attempted before `init` or after `destroy`.
    #[error("language manager is not initialized")]
    NotInitialized,
    /// A catalog failed to load during `init`; the manager stays
    /// uninitialized.
    #[error("failed to load catalog for locale '{locale}'")]
    CatalogLoad {
        locale: Locale,
        #[source]
        source: CatalogError,
    },
    /// A source file could not be registered.
    #[error("failed to register source for locale '{locale}'")]
    SourceRegistration {
        locale: Locale,
        #[source]
        source: CatalogError,
    },
}

/// Resolves lookup keys to locale-specific strings across a set of
/// registered catalogs.
///
/// Catalogs are registered per locale with [`add_file`](Self::add_file)
/// and loaded by [`init`](Self::init); lookups are only valid while
/// initialized. [`destroy`](Self::destroy) unloads everything and returns
/// the manager to its uninitialized state, from which it can be
/// re-initialized indefinitely. All operations take `&self` and are safe
/// to call from concurrent threads.
pub struct LanguageManager {
    default_locale: ArcSwap<Locale>,
    cache: CatalogCache,
    initialized: AtomicBool,
}

impl LanguageManager {
    pub fn new(default_locale: Locale) -> Self {
        Self {
            default_locale: ArcSwap::from_pointee(default_locale),
            cache: CatalogCache::new(),
            initialized: AtomicBool::new(false),
        }
    }

    /// Registers a UTF-8 source file for `locale`, creating its catalog on
    /// first reference.
    ///
    /// Valid in either lifecycle state, but a source registered while
    /// initialized is only loaded by the next [`init`](Self::init).
    pub fn add_file(&self, path: impl AsRef<Path>, locale: &Locale) -> Result<(), LanguageError> {
        self.add_file_with_encoding(path, Encoding::default(), locale)
    }

    /// Registers a source file in the given encoding for `locale`.
    pub fn add_file_with_encoding(
        &self,
        path: impl AsRef<Path>,
        encoding: Encoding,
        locale: &Locale,
    ) -> Result<(), LanguageError> {
        self.cache
            .get_or_create(locale)
            .add_source_with_encoding(path, encoding)
            .map_err(|source| LanguageError::SourceRegistration {
                locale: locale.clone(),
                source,
            })
    }

    /// Loads every registered catalog and enables lookups.
    ///
    /// Calling `init` on an initialized manager is a warning-level no-op.
    /// If any catalog fails to load, the error names the offending locale
    /// and the manager stays uninitialized; fixing the source and calling
    /// `init` again retries the whole load.
    pub fn init(&self) -> Result<(), LanguageError> {
        if self.initialized.load(Ordering::SeqCst) {
            warn!("already initialized");
            return Ok(());
        }

        for catalog in self.cache.catalogs() {
            catalog.load().map_err(|source| LanguageError::CatalogLoad {
                locale: catalog.locale().clone(),
                source,
            })?;
        }

        self.initialized.store(true, Ordering::SeqCst);
        info!("initialized");
        Ok(())
    }

    /// Disables lookups and unloads every catalog.
    ///
    /// Calling `destroy` on an uninitialized manager is a warning-level
    /// no-op. The state transition happens before any unloading, and
    /// unload failures are logged rather than returned, so `destroy`
    /// always leaves the manager ready for a later re-init.
    pub fn destroy(&self) {
        if !self.initialized.swap(false, Ordering::SeqCst) {
            warn!("already destroyed");
            return;
        }

        for catalog in self.cache.catalogs() {
            if let Err(err) = catalog.unload() {
                error!(locale = %catalog.locale(), "failed to unload catalog: {err}");
            }
        }

        info!("destroyed");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn default_locale(&self) -> Locale {
        Locale::clone(&self.default_locale.load())
    }

    /// Replaces the default locale used as the final fallback.
    ///
    /// Takes effect on the next resolution; no re-init is required and
    /// already-resolved results are unaffected.
    pub fn set_default_locale(&self, locale: Locale) {
        self.default_locale.store(Arc::new(locale));
    }

    /// Resolves `key` against the catalog selected for `locale`.
    ///
    /// `None` for `locale` means no preference, so resolution starts at
    /// the default locale. Returns `Ok(None)` when the selected catalog
    /// does not contain the key.
    pub fn localize(
        &self,
        key: &str,
        locale: Option<&Locale>,
    ) -> Result<Option<String>, LanguageError> {
        if !self.initialized.load(Ordering::SeqCst) {
            return Err(LanguageError::NotInitialized);
        }

        let default = self.default_locale();
        let resolved = resolve_locale(locale, &self.cache.locales(), &default);
        Ok(self.cache.get_or_create(&resolved).lookup(key))
    }

    /// Read-only snapshot of every locale with a registered catalog.
    pub fn known_locales(&self) -> Vec<Locale> {
        self.cache.locales()
    }
}
