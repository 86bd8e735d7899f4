#![doc = include_str!("../README.md")]

pub mod catalog;
pub mod locale;

pub use catalog::{Catalog, CatalogError, Encoding};
pub use locale::{Locale, LocaleParseError};
