//! Scope and cache-key derivation.
//!
//! A [`Scope`] is the normalized host of a page URL. Every cache entry,
//! analyzed marker and in-flight slot for page analysis is partitioned by it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Normalized host name under which cache and dedup state is partitioned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Scope {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Namespace of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// Full page-analysis response.
    Page,
    /// Form-analysis response (input and submit locators).
    Form,
    /// Non-empty coupon list kept for display lookups.
    Coupons,
}

impl CacheKind {
    /// Every kind, in the order `clear` visits them.
    pub const ALL: [CacheKind; 3] = [CacheKind::Page, CacheKind::Form, CacheKind::Coupons];

    pub fn as_str(self) -> &'static str {
        match self {
            CacheKind::Page => "page",
            CacheKind::Form => "form",
            CacheKind::Coupons => "coupons",
        }
    }

    /// Compose the `{kind}:{scope}` storage key.
    ///
    /// Kind names contain no `:`, so keys of different kinds never collide.
    pub fn key(self, scope: &Scope) -> String {
        format!("{}:{}", self.as_str(), scope)
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the scope of a page URL.
///
/// The identifier must be an absolute http(s) URL with a host. Whitespace
/// is trimmed; the host is lowercased by the URL parser. Anything else is
/// [`Error::InvalidIdentifier`].
pub fn derive_scope(identifier: &str) -> Result<Scope, Error> {
    let trimmed = identifier.trim();

    if trimmed.is_empty() {
        return Err(Error::InvalidIdentifier("empty URL".into()));
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| Error::InvalidIdentifier(format!("{trimmed}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(Error::InvalidIdentifier(format!("unsupported scheme: {scheme}"))),
    }

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| Error::InvalidIdentifier(format!("{trimmed}: missing host")))?;

    Ok(Scope(host.to_lowercase()))
}

#[cfg(test)]
pub(crate) fn scope(host: &str) -> Scope {
    Scope(host.to_string())
}
