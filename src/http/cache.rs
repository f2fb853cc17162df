//! HTTP cache control module
//!
//! Validators and `Cache-Control` policies for the static export, the sitemap
//! and the JSON endpoints.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Max-age for unfingerprinted assets and the generated documents
pub const SHORT_MAX_AGE: u32 = 3600;

/// Build output under this prefix carries a content hash in its file name
const FINGERPRINTED_PREFIX: &str = "/_next/static/";

/// Strong `ETag` from body length and content hash, e.g. `"1f4-9a0c3e..."`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// Whether `If-None-Match` lets us answer 304
///
/// Uses weak comparison: a `W/` prefix on either side is ignored. `*` matches
/// any current representation.
pub fn is_not_modified(if_none_match: Option<&str>, etag: &str) -> bool {
    let Some(header) = if_none_match else {
        return false;
    };
    let ours = opaque_tag(etag);
    header.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || (!candidate.is_empty() && opaque_tag(candidate) == ours)
    })
}

fn opaque_tag(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}

/// Cache policy per response kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Shared caches may keep it for the given seconds
    Public(u32),
    /// Fingerprinted build output; never changes under the same URL
    Immutable,
    /// Store, but revalidate every time
    NoCache,
    NoStore,
}

impl CachePolicy {
    /// `Cache-Control` header value
    pub fn header_value(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::Immutable => "public, max-age=31536000, immutable".to_string(),
            Self::NoCache => "no-cache".to_string(),
            Self::NoStore => "no-store".to_string(),
        }
    }
}

/// Policy for a file from the static export
///
/// Pages revalidate so a redeploy shows up at once; fingerprinted build output
/// is immutable; other assets get [`SHORT_MAX_AGE`].
pub fn policy_for_static(path: &str, content_type: &str) -> CachePolicy {
    if path.starts_with(FINGERPRINTED_PREFIX) {
        CachePolicy::Immutable
    } else if content_type.starts_with("text/html") {
        CachePolicy::NoCache
    } else {
        CachePolicy::Public(SHORT_MAX_AGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_tracks_content() {
        let etag = generate_etag(b"<h1>home</h1>");
        assert!(etag.starts_with("\"d-"));
        assert!(etag.ends_with('"'));
        assert_eq!(etag, generate_etag(b"<h1>home</h1>"));
        assert_ne!(etag, generate_etag(b"<h1>about</h1>"));
    }

    #[test]
    fn test_is_not_modified() {
        let etag = "\"d-abc\"";
        assert!(is_not_modified(Some("\"d-abc\""), etag));
        assert!(is_not_modified(Some("\"x\", \"d-abc\""), etag));
        assert!(is_not_modified(Some("W/\"d-abc\""), etag));
        assert!(is_not_modified(Some("*"), etag));
        assert!(!is_not_modified(Some("\"d-abd\""), etag));
        assert!(!is_not_modified(Some(""), etag));
        assert!(!is_not_modified(None, etag));
    }

    #[test]
    fn test_header_values() {
        assert_eq!(CachePolicy::Public(3600).header_value(), "public, max-age=3600");
        assert_eq!(
            CachePolicy::Immutable.header_value(),
            "public, max-age=31536000, immutable"
        );
        assert_eq!(CachePolicy::NoCache.header_value(), "no-cache");
        assert_eq!(CachePolicy::NoStore.header_value(), "no-store");
    }

    #[test]
    fn test_policy_for_static() {
        assert_eq!(
            policy_for_static("/_next/static/chunks/main-4f2a.js", "application/javascript"),
            CachePolicy::Immutable
        );
        assert_eq!(
            policy_for_static("/about", "text/html; charset=utf-8"),
            CachePolicy::NoCache
        );
        assert_eq!(
            policy_for_static("/images/moneytide/icon.png", "image/png"),
            CachePolicy::Public(SHORT_MAX_AGE)
        );
    }
}
