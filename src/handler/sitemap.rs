//! Sitemap module
//!
//! `/sitemap.xml` lists the fixed site pages, then every product page, then
//! every blog post, read fresh from the content store.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::config::{AppState, SiteConfig};
use crate::content::blog::parse_date;
use crate::content::{BlogPost, ProductRecord};
use crate::handler::router::RequestContext;
use crate::http::{self, CachePolicy};

pub const SITEMAP_PATH: &str = "/sitemap.xml";

const PRODUCT_CHANGE_FREQUENCY: &str = "monthly";
const PRODUCT_PRIORITY: f32 = 0.9;
const POST_CHANGE_FREQUENCY: &str = "monthly";
const POST_PRIORITY: f32 = 0.7;

struct SitemapEntry {
    loc: String,
    last_modified: DateTime<Utc>,
    change_frequency: String,
    priority: f32,
}

/// Render the sitemap document
///
/// `now` stands in for pages without a modification date of their own.
pub fn build_sitemap(
    site: &SiteConfig,
    products: &[ProductRecord],
    posts: &[BlogPost],
    now: DateTime<Utc>,
) -> String {
    let base = site.base_url.trim_end_matches('/');
    let mut entries: Vec<SitemapEntry> = site
        .static_pages
        .iter()
        .map(|page| SitemapEntry {
            loc: if page.path == "/" {
                base.to_string()
            } else {
                format!("{base}{}", page.path)
            },
            last_modified: now,
            change_frequency: page.change_frequency.clone(),
            priority: page.priority,
        })
        .collect();

    entries.extend(products.iter().map(|record| SitemapEntry {
        loc: format!("{base}/products/{}", record.slug),
        last_modified: parse_date(&record.product.metadata.last_updated).unwrap_or(now),
        change_frequency: PRODUCT_CHANGE_FREQUENCY.to_string(),
        priority: PRODUCT_PRIORITY,
    }));

    entries.extend(posts.iter().map(|post| SitemapEntry {
        loc: format!("{base}/blog/{}", post.slug),
        last_modified: post.metadata.modified_at().unwrap_or(now),
        change_frequency: POST_CHANGE_FREQUENCY.to_string(),
        priority: POST_PRIORITY,
    }));

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in &entries {
        // Writing into a String cannot fail
        let _ = write!(
            xml,
            "<url>\n<loc>{}</loc>\n<lastmod>{}</lastmod>\n<changefreq>{}</changefreq>\n<priority>{:.1}</priority>\n</url>\n",
            escape_xml(&entry.loc),
            entry.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true),
            escape_xml(&entry.change_frequency),
            entry.priority,
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub async fn serve_sitemap(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let resolver = Arc::clone(&state.resolver);
    let site = state.config.site.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        build_sitemap(&site, &resolver.all_products(), &resolver.all_posts(), Utc::now())
    })
    .await;

    match rendered {
        Ok(xml) => {
            let policy = CachePolicy::Public(http::cache::SHORT_MAX_AGE);
            let data = Bytes::from(xml);
            let etag = http::cache::generate_etag(&data);
            if http::cache::is_not_modified(ctx.if_none_match.as_deref(), &etag) {
                return http::build_304_response(&etag, policy);
            }
            http::response::build_cached_response(
                data,
                "application/xml",
                &etag,
                policy,
                ctx.is_head,
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "sitemap task failed");
            http::build_json_error(StatusCode::INTERNAL_SERVER_ERROR, "sitemap unavailable", ctx.is_head)
        }
    }
}
