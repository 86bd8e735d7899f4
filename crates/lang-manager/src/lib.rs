#![doc = include_str!("../README.md")]

pub mod cache;
pub mod fallback;
pub mod manager;

pub use cache::CatalogCache;
pub use fallback::{lookup_chain, resolve_locale};
pub use manager::{LanguageError, LanguageManager};

// Re-export the catalog types so callers only need this crate.
pub use lang_catalog::{Catalog, CatalogError, Encoding, Locale, LocaleParseError};
