//! HTTP response building module
//!
//! Provides builders for the status codes and content types the site serves.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::cache::CachePolicy;

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, policy: CachePolicy) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", policy.header_value())
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_plain_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let mut resp = build_plain_response(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    resp.headers_mut()
        .insert("Allow", HeaderValue::from_static("GET, HEAD, OPTIONS"));
    resp
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_plain_response(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_plain_response(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build health probe response
pub fn build_health_response(status: &str, is_head: bool) -> Response<Full<Bytes>> {
    let body = format!("{{\"status\":\"{status}\"}}");
    build_body_response(
        StatusCode::OK,
        Bytes::from(body),
        "application/json",
        CachePolicy::NoStore,
        is_head,
    )
}

/// Build HTML response with the given status
pub fn build_html_response(
    status: StatusCode,
    content: Bytes,
    is_head: bool,
) -> Response<Full<Bytes>> {
    build_body_response(
        status,
        content,
        "text/html; charset=utf-8",
        CachePolicy::NoCache,
        is_head,
    )
}

/// Serialize `value` as a JSON response
pub fn build_json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    value: &T,
    policy: CachePolicy,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(body) => build_body_response(
            status,
            Bytes::from(body),
            "application/json",
            policy,
            is_head,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize JSON response");
            build_500_response()
        }
    }
}

/// JSON error body `{"error": message}`
pub fn build_json_error(status: StatusCode, message: &str, is_head: bool) -> Response<Full<Bytes>> {
    build_json_response(
        status,
        &serde_json::json!({ "error": message }),
        CachePolicy::NoStore,
        is_head,
    )
}

/// Build success response with `ETag` and cache control
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    policy: CachePolicy,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let mut resp = build_body_response(StatusCode::OK, data, content_type, policy, is_head);
    if let Ok(value) = HeaderValue::from_str(etag) {
        resp.headers_mut().insert("ETag", value);
    }
    resp
}

/// Add the CORS header used by the app-link document
pub fn allow_any_origin(resp: &mut Response<Full<Bytes>>) {
    resp.headers_mut()
        .insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
}

/// Add nosniff, referrer and framing headers
pub fn apply_security_headers(resp: &mut Response<Full<Bytes>>) {
    let headers = resp.headers_mut();
    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("SAMEORIGIN"));
}

/// Add the `Server` header
pub fn apply_server_name(resp: &mut Response<Full<Bytes>>, server_name: &str) {
    if let Ok(value) = HeaderValue::from_str(server_name) {
        resp.headers_mut().insert("Server", value);
    }
}

fn build_plain_response(status: StatusCode, message: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from_static(message.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from_static(message.as_bytes())))
        })
}

/// Body response; HEAD keeps Content-Length but drops the body
fn build_body_response(
    status: StatusCode,
    data: Bytes,
    content_type: &str,
    policy: CachePolicy,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Cache-Control", policy.header_value())
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    tracing::error!("Failed to build {status} response: {error}");
}
