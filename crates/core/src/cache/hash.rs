//! Content signatures for form-analysis deduplication.

use sha2::{Digest, Sha256};

/// Hash the first `max_chars` characters of an HTML snapshot.
///
/// Two snapshots of the same page that differ only past the prefix share a
/// signature. The cut is on character boundaries, never inside a code point.
pub fn content_signature(html: &str, max_chars: usize) -> String {
    let end = html.char_indices().nth(max_chars).map(|(i, _)| i).unwrap_or(html.len());
    let mut hasher = Sha256::new();
    hasher.update(&html.as_bytes()[..end]);
    hex::encode(hasher.finalize())
}
