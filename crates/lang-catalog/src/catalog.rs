use crate::locale::Locale;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::{fmt, fs, io};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The source path could not be referenced at registration time.
    #[error("source '{0}' cannot be referenced")]
    SourceNotFound(PathBuf),
    /// A registered source could not be read during load.
    #[error("failed to read source '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A registered source is not valid text in its declared encoding.
    #[error("source '{path}' is not valid {encoding} text")]
    Decode { path: PathBuf, encoding: Encoding },
    /// A non-comment line has no `=` or `:` separator, or an empty key.
    #[error("malformed entry at {path}:{line}")]
    Parse { path: PathBuf, line: usize },
}

/// Text encoding of a catalog source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
    /// ISO-8859-1, the traditional properties-file encoding.
    Latin1,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => f.write_str("UTF-8"),
            Encoding::Latin1 => f.write_str("ISO-8859-1"),
        }
    }
}

#[derive(Clone, Debug)]
struct Source {
    path: PathBuf,
    encoding: Encoding,
}

/// Key/value entries for exactly one locale.
///
/// Sources are registered up front and read when [`load`](Catalog::load) is
/// called; until then (and again after [`unload`](Catalog::unload)) every
/// lookup reports the key as absent. Registration order matters: the last
/// registered source wins when two sources define the same key.
#[derive(Debug)]
pub struct Catalog {
    locale: Locale,
    sources: Mutex<Vec<Source>>,
    entries: RwLock<Option<FxHashMap<String, String>>>,
}

impl Catalog {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            sources: Mutex::new(Vec::new()),
            entries: RwLock::new(None),
        }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Registers a UTF-8 source file.
    pub fn add_source(&self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        self.add_source_with_encoding(path, Encoding::default())
    }

    /// Registers a source file in the given encoding.
    ///
    /// Fails immediately when the path cannot be referenced; the file is
    /// not read until [`load`](Catalog::load).
    pub fn add_source_with_encoding(
        &self,
        path: impl AsRef<Path>,
        encoding: Encoding,
    ) -> Result<(), CatalogError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CatalogError::SourceNotFound(path.to_path_buf()));
        }

        self.sources.lock().push(Source {
            path: path.to_path_buf(),
            encoding,
        });
        Ok(())
    }

    /// Reads and parses every registered source, replacing any previously
    /// loaded entries wholesale.
    pub fn load(&self) -> Result<(), CatalogError> {
        let sources = self.sources.lock().clone();

        let mut entries = FxHashMap::default();
        for source in &sources {
            let text = read_source(source)?;
            parse_into(&text, &source.path, &mut entries)?;
        }

        debug!(locale = %self.locale, entries = entries.len(), "catalog loaded");
        *self.entries.write() = Some(entries);
        Ok(())
    }

    /// Releases the loaded entries. Registered sources are kept, so a
    /// later [`load`](Catalog::load) restores the catalog.
    pub fn unload(&self) -> Result<(), CatalogError> {
        debug!(locale = %self.locale, "catalog unloaded");
        *self.entries.write() = None;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.read().is_some()
    }

    /// Returns the value for `key`, or `None` when the key is missing or
    /// the catalog is not loaded.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.entries.read().as_ref()?.get(key).cloned()
    }
}

fn read_source(source: &Source) -> Result<String, CatalogError> {
    let bytes = fs::read(&source.path).map_err(|err| CatalogError::Read {
        path: source.path.clone(),
        source: err,
    })?;

    match source.encoding {
        Encoding::Utf8 => String::from_utf8(bytes).map_err(|_| CatalogError::Decode {
            path: source.path.clone(),
            encoding: Encoding::Utf8,
        }),
        // Every ISO-8859-1 byte maps to the code point of the same value.
        Encoding::Latin1 => Ok(bytes.iter().map(|&byte| char::from(byte)).collect()),
    }
}

fn parse_into(
    text: &str,
    path: &Path,
    entries: &mut FxHashMap<String, String>,
) -> Result<(), CatalogError> {
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let separator = line.find(['=', ':']).ok_or_else(|| CatalogError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
        })?;

        let key = line[..separator].trim_end();
        if key.is_empty() {
            return Err(CatalogError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
            });
        }

        entries.insert(key.to_owned(), line[separator + 1..].trim().to_owned());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_source(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_and_looks_up_entries() {
        let dir = TempDir::new().unwrap();
        let path = write_source(
            &dir,
            "test_en.properties",
            "# greeting section\ntest.key.1 = First\n  test.key.2: Second\n\n! trailing comment\n",
        );

        let catalog = Catalog::new(Locale::new("en"));
        catalog.add_source(&path).unwrap();
        assert!(!catalog.is_loaded());

        catalog.load().unwrap();
        assert!(catalog.is_loaded());
        assert_eq!(catalog.lookup("test.key.1").as_deref(), Some("First"));
        assert_eq!(catalog.lookup("test.key.2").as_deref(), Some("Second"));
        assert_eq!(catalog.lookup("test.key.3"), None);
    }

    #[test]
    fn last_registered_source_wins() {
        let dir = TempDir::new().unwrap();
        let base = write_source(&dir, "base.properties", "test.key.1 = First\n");
        let overlay = write_source(&dir, "overlay.properties", "test.key.1 = Override\n");

        let catalog = Catalog::new(Locale::new("en"));
        catalog.add_source(&base).unwrap();
        catalog.add_source(&overlay).unwrap();
        catalog.load().unwrap();

        assert_eq!(catalog.lookup("test.key.1").as_deref(), Some("Override"));
    }

    #[test]
    fn unload_makes_keys_absent() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "test.properties", "test.key.1 = First\n");

        let catalog = Catalog::new(Locale::new("en"));
        catalog.add_source(&path).unwrap();
        catalog.load().unwrap();
        catalog.unload().unwrap();

        assert!(!catalog.is_loaded());
        assert_eq!(catalog.lookup("test.key.1"), None);

        catalog.load().unwrap();
        assert_eq!(catalog.lookup("test.key.1").as_deref(), Some("First"));
    }

    #[test]
    fn rejects_unreferencable_source() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::new(Locale::new("en"));

        let result = catalog.add_source(dir.path().join("missing.properties"));
        assert!(matches!(result, Err(CatalogError::SourceNotFound(_))));
    }

    #[test]
    fn load_fails_on_vanished_source() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "gone.properties", "test.key.1 = First\n");

        let catalog = Catalog::new(Locale::new("en"));
        catalog.add_source(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(matches!(catalog.load(), Err(CatalogError::Read { .. })));
        assert!(!catalog.is_loaded());
    }

    #[test]
    fn load_fails_on_malformed_line() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "bad.properties", "test.key.1 = First\nno separator here\n");

        let catalog = Catalog::new(Locale::new("en"));
        catalog.add_source(&path).unwrap();

        assert!(matches!(
            catalog.load(),
            Err(CatalogError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn decodes_latin1_sources() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test_es.properties");
        // "adiós" in ISO-8859-1; invalid as UTF-8.
        fs::write(&path, b"test.key.1 = adi\xf3s\n").unwrap();

        let catalog = Catalog::new(Locale::new("es"));
        catalog
            .add_source_with_encoding(&path, Encoding::Latin1)
            .unwrap();
        catalog.load().unwrap();

        assert_eq!(catalog.lookup("test.key.1").as_deref(), Some("adiós"));
    }

    #[test]
    fn load_fails_on_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test_es.properties");
        fs::write(&path, b"test.key.1 = adi\xf3s\n").unwrap();

        let catalog = Catalog::new(Locale::new("es"));
        catalog.add_source(&path).unwrap();

        assert!(matches!(
            catalog.load(),
            Err(CatalogError::Decode {
                encoding: Encoding::Utf8,
                ..
            })
        ));
    }
}
