use lang_catalog::Locale;

/// Returns the ordered fallback chain for a requested locale.
///
/// This yields the requested locale first, then its successively less
/// specific parents (variant dropped, then region), and finally the
/// default locale. An absent request yields just the default.
pub fn lookup_chain(requested: Option<&Locale>, default: &Locale) -> Vec<Locale> {
    let mut chain = Vec::new();

    if let Some(requested) = requested {
        chain.push(requested.clone());
        let mut cursor = requested.parent();
        while let Some(locale) = cursor {
            cursor = locale.parent();
            chain.push(locale);
        }
    }

    if !chain.iter().any(|candidate| candidate == default) {
        chain.push(default.clone());
    }

    chain
}

/// Picks the first available locale from the fallback chain.
///
/// An exact match short-circuits without building the chain. When nothing
/// in the chain is available the requested locale is returned unchanged
/// (or the default when the request was absent), so resolution never
/// fails; the caller's catalog lookup then degrades to an empty catalog.
pub fn resolve_locale(
    requested: Option<&Locale>,
    available: &[Locale],
    default: &Locale,
) -> Locale {
    if let Some(requested) = requested
        && available.contains(requested)
    {
        return requested.clone();
    }

    lookup_chain(requested, default)
        .into_iter()
        .find(|candidate| available.contains(candidate))
        .unwrap_or_else(|| requested.cloned().unwrap_or_else(|| default.clone()))
}
