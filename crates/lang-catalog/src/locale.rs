use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string is not a valid locale identifier.
#[derive(Debug, Error)]
#[error("invalid locale identifier '{0}'")]
pub struct LocaleParseError(String);

/// Identifier for a language/region/variant combination.
///
/// A locale is an ordered specificity chain of up to three components: a
/// mandatory language, an optional region and an optional variant (e.g.
/// `es`, `es-ES`, `es-ES-test`). Locales compare and hash by value, which
/// makes them usable as catalog cache keys. Components are kept verbatim;
/// no case normalization is applied.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    region: Option<String>,
    variant: Option<String>,
}

impl Locale {
    /// A language-only locale, e.g. `en`.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            region: None,
            variant: None,
        }
    }

    /// A language+region locale, e.g. `en-US`.
    pub fn with_region(language: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            region: Some(region.into()),
            variant: None,
        }
    }

    /// A fully specified locale, e.g. `es-ES-test`.
    pub fn with_variant(
        language: impl Into<String>,
        region: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            region: Some(region.into()),
            variant: Some(variant.into()),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Returns the next less specific locale, dropping the variant first
    /// and then the region. A language-only locale has no parent.
    pub fn parent(&self) -> Option<Locale> {
        if self.variant.is_some() {
            Some(Locale {
                language: self.language.clone(),
                region: self.region.clone(),
                variant: None,
            })
        } else if self.region.is_some() {
            Some(Locale::new(self.language.clone()))
        } else {
            None
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        if let Some(region) = &self.region {
            write!(f, "-{}", region)?;
        }
        if let Some(variant) = &self.variant {
            write!(f, "-{}", variant)?;
        }
        Ok(())
    }
}

impl FromStr for Locale {
    type Err = LocaleParseError;

    /// Parses `language[-region[-variant]]`; `_` separators are accepted
    /// for compatibility with `es_ES`-style identifiers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(['-', '_']).collect();
        if parts.len() > 3 || parts.iter().any(|part| part.is_empty()) {
            return Err(LocaleParseError(s.to_owned()));
        }

        match parts.as_slice() {
            [language] => Ok(Locale::new(*language)),
            [language, region] => Ok(Locale::with_region(*language, *region)),
            [language, region, variant] => Ok(Locale::with_variant(*language, *region, *variant)),
            _ => Err(LocaleParseError(s.to_owned())),
        }
    }
}
