//! Apple App Site Association module
//!
//! Serves the fixed universal-link document at both association paths, on
//! every host.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::{Response, StatusCode};
use serde_json::{json, Value};

use crate::config::AasaConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, response, CachePolicy};

/// Association document for the configured app
pub fn aasa_document(config: &AasaConfig) -> Value {
    json!({
        "applinks": {
            "apps": [],
            "details": [
                {
                    "appID": format!("{}.{}", config.team_id, config.bundle_id),
                    "paths": config.paths,
                }
            ]
        }
    })
}

pub fn serve_aasa(ctx: &RequestContext<'_>, config: &AasaConfig) -> Response<Full<Bytes>> {
    let mut resp = http::build_json_response(
        StatusCode::OK,
        &aasa_document(config),
        CachePolicy::Public(http::cache::SHORT_MAX_AGE),
        ctx.is_head,
    );
    response::allow_any_origin(&mut resp);
    resp.headers_mut()
        .insert("Access-Control-Allow-Methods", HeaderValue::from_static("GET"));
    resp
}
