//! Static file serving module
//!
//! Serves the statically exported site: directory index files, the
//! `{path}.html` fallback for extensionless routes, `ETag` revalidation and the
//! exported `404.html` page.

use crate::config::SiteConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::path::{Path, PathBuf};
use tokio::fs;

const NOT_FOUND_PAGE: &str = "404.html";

/// Serve the effective path from the public directory
pub async fn serve_static(ctx: &RequestContext<'_>, site: &SiteConfig) -> Response<Full<Bytes>> {
    let Some(file_path) = resolve_file(Path::new(&site.public_dir), ctx.path, &site.index_files)
    else {
        return serve_not_found(ctx, site).await;
    };

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to read file '{}': {}", file_path.display(), e);
            return serve_not_found(ctx, site).await;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    build_static_file_response(
        content,
        content_type,
        cache::policy_for_static(ctx.path, content_type),
        ctx.if_none_match.as_deref(),
        ctx.is_head,
    )
}

/// Map a request path onto a file inside `public_dir`
///
/// Tries the path itself, the directory's index files, then `{path}.html`.
/// Returns `None` for missing files and for anything escaping the directory.
pub fn resolve_file(public_dir: &Path, path: &str, index_files: &[String]) -> Option<PathBuf> {
    let relative = path.trim_start_matches('/');
    if relative
        .split('/')
        .any(|segment| segment == ".." || segment.contains('\\') || segment.contains('\0'))
    {
        tracing::warn!("Path traversal attempt blocked: {path}");
        return None;
    }

    let public_canonical = match public_dir.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(
                "Static directory not found or inaccessible '{}': {e}",
                public_dir.display()
            );
            return None;
        }
    };

    let base = public_dir.join(relative);
    let mut candidates = Vec::new();
    if base.is_dir() || relative.is_empty() || relative.ends_with('/') {
        candidates.extend(index_files.iter().map(|index| base.join(index)));
    } else {
        candidates.push(base.clone());
        let trimmed = relative.trim_end_matches('/');
        candidates.push(public_dir.join(format!("{trimmed}.html")));
    }

    let found = candidates.into_iter().find(|candidate| candidate.is_file())?;

    // File not found is common (404), no need to log at warning level
    let canonical = found.canonicalize().ok()?;
    if !canonical.starts_with(&public_canonical) {
        tracing::warn!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            canonical.display()
        );
        return None;
    }
    Some(found)
}

/// Exported 404 page when present, plain 404 otherwise
async fn serve_not_found(ctx: &RequestContext<'_>, site: &SiteConfig) -> Response<Full<Bytes>> {
    let page = Path::new(&site.public_dir).join(NOT_FOUND_PAGE);
    match fs::read(&page).await {
        Ok(content) => {
            http::response::build_html_response(StatusCode::NOT_FOUND, Bytes::from(content), ctx.is_head)
        }
        Err(_) => http::build_404_response(),
    }
}

/// Build static file response with `ETag` support
fn build_static_file_response(
    data: Vec<u8>,
    content_type: &str,
    policy: cache::CachePolicy,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    // Check if client has cached version
    if cache::is_not_modified(if_none_match, &etag) {
        return http::build_304_response(&etag, policy);
    }

    http::response::build_cached_response(Bytes::from(data), content_type, &etag, policy, is_head)
}
