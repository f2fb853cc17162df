//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, body size
//! check, health probes, subdomain routing, then dispatch on the effective path.

use crate::config::{AppState, HealthConfig};
use crate::handler::{content_api, sitemap, static_files, well_known};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{route, RequestDescriptor, RouteDecision};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HOST};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const FORWARDED_HOST: &str = "x-forwarded-host";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Effective path: the rewrite target, or the original path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path();
    let is_head = method == Method::HEAD;

    let descriptor = RequestDescriptor {
        host: header_str(req.headers(), HOST.as_str())
            .or_else(|| uri.authority().map(|a| a.as_str().to_string())),
        forwarded_host: header_str(req.headers(), FORWARDED_HOST),
        path: path.to_string(),
        method: method.to_string(),
    };

    let rejected = check_http_method(&method, state.config.http.enable_cors)
        .or_else(|| check_body_size(req.headers(), state.config.http.max_body_size))
        .or_else(|| check_health(path, &state.config.site.health, is_head));

    let (decision, mut response) = match rejected {
        Some(resp) => (RouteDecision::Pass, resp),
        None => {
            // 1. Subdomain routing, only for in-scope paths
            let decision = if state.scope.in_scope(path) {
                route(&descriptor, &state.router)
            } else {
                RouteDecision::Pass
            };

            // 2. Dispatch on the effective path
            let ctx = RequestContext {
                path: decision.resolve(path),
                query: uri.query(),
                is_head,
                if_none_match: header_str(req.headers(), "if-none-match"),
            };
            let resp = dispatch(&ctx, &state).await;
            (decision, resp)
        }
    };

    if state.config.http.security_headers {
        http::response::apply_security_headers(&mut response);
    }
    http::response::apply_server_name(&mut response, &state.config.http.server_name);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            remote_addr.ip().to_string(),
            method.to_string(),
            path.to_string(),
        );
        entry.host = descriptor.effective_host();
        entry.rewritten_path = match decision {
            RouteDecision::Rewrite(target) => Some(target),
            RouteDecision::Pass => None,
        };
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = hyper::body::Body::size_hint(response.body())
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.referer = header_str(req.headers(), "referer");
        entry.user_agent = header_str(req.headers(), "user-agent");
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            tracing::warn!("Method not allowed: {method}");
            Some(http::build_405_response())
        }
    }
}

/// Answer probes on the path as received, before any subdomain rewrite
fn check_health(path: &str, health: &HealthConfig, is_head: bool) -> Option<Response<Full<Bytes>>> {
    (health.enabled && (path == health.liveness_path || path == health.readiness_path))
        .then(|| http::build_health_response("ok", is_head))
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            tracing::warn!("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                tracing::warn!("Request body too large: {size} bytes (max: {max_body_size})");
                Some(http::build_413_response())
            }
            Err(_) => {
                tracing::warn!("Invalid Content-Length value: '{size_str}', skipping size check");
                None
            }
            _ => None,
        },
    )
}

/// Route request based on the effective path
async fn dispatch(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    // 1. App-link association document
    if state.router.well_known_paths.iter().any(|p| p == ctx.path) {
        return well_known::serve_aasa(ctx, &state.config.apple_app_site_association);
    }

    // 2. Sitemap
    if ctx.path == sitemap::SITEMAP_PATH {
        return sitemap::serve_sitemap(ctx, state).await;
    }

    // 3. Content page props
    if ctx.path == content_api::API_PREFIX || ctx.path.starts_with("/api/") {
        return content_api::handle(ctx, state).await;
    }

    // 4. Static export
    static_files::serve_static(ctx, &state.config.site).await
}
