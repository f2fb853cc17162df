//! Content page-props module
//!
//! JSON endpoints exposing the content resolver:
//!
//! | Path                          | Response                               |
//! |-------------------------------|----------------------------------------|
//! | `/api/products`               | product summaries + organization data  |
//! | `/api/products/{slug}`        | product record + `SoftwareApplication` |
//! | `/api/blog`                   | post summaries (`category`, `tag`, `featured`) |
//! | `/api/blog/tags`              | every tag                              |
//! | `/api/blog/{category}/{slug}` | post + `Article`                       |
//!
//! Resolver calls read the filesystem, so they run on the blocking pool.

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde_json::{json, Value};

use crate::config::{AppState, SiteConfig};
use crate::content::structured_data::{article_schema, organization_schema, product_schema};
use crate::content::{BlogPost, ContentResolver, ContentStore, ProductRecord};
use crate::handler::router::RequestContext;
use crate::http::{self, CachePolicy};

pub const API_PREFIX: &str = "/api";

/// Endpoint selected by the request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Products,
    Product(String),
    Posts(PostFilter),
    Tags,
    Post(String),
}

/// Blog listing filters; all given filters must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub featured: bool,
}

impl PostFilter {
    pub fn from_query(query: Option<&str>) -> Self {
        let mut filter = Self::default();
        let Some(query) = query else {
            return filter;
        };
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "category" if !value.is_empty() => filter.category = Some(value.into_owned()),
                "tag" if !value.is_empty() => filter.tag = Some(value.into_owned()),
                "featured" => filter.featured = value == "true",
                _ => {}
            }
        }
        filter
    }

    fn matches(&self, post: &BlogPost) -> bool {
        self.category
            .as_deref()
            .map_or(true, |category| post.metadata.category == category)
            && self
                .tag
                .as_deref()
                .map_or(true, |tag| post.metadata.tags.iter().any(|t| t == tag))
    }
}

/// Map an API path to an endpoint; `None` for unknown paths
pub fn parse_endpoint(path: &str, query: Option<&str>) -> Option<Endpoint> {
    let rest = path.strip_prefix(API_PREFIX)?.trim_matches('/');
    let segments: Vec<&str> = rest.split('/').collect();
    match segments.as_slice() {
        ["products"] => Some(Endpoint::Products),
        ["products", slug] if !slug.is_empty() => Some(Endpoint::Product((*slug).to_string())),
        ["blog"] => Some(Endpoint::Posts(PostFilter::from_query(query))),
        ["blog", "tags"] => Some(Endpoint::Tags),
        ["blog", category, slug] if !category.is_empty() && !slug.is_empty() => {
            Some(Endpoint::Post(format!("{category}/{slug}")))
        }
        _ => None,
    }
}

/// Outcome of a resolver query
#[derive(Debug, PartialEq)]
pub enum Reply {
    Found(Value),
    NotFound(&'static str),
}

fn product_summary(record: &ProductRecord) -> Value {
    json!({
        "slug": record.slug,
        "origin": record.origin,
        "excerpt": record.excerpt,
        "metadata": record.product.metadata,
    })
}

fn post_summary(post: &BlogPost) -> Value {
    json!({
        "slug": post.slug,
        "excerpt": post.excerpt,
        "metadata": post.metadata,
    })
}

/// Run one endpoint against the resolver
pub fn query<S: ContentStore>(
    resolver: &ContentResolver<S>,
    site: &SiteConfig,
    endpoint: &Endpoint,
) -> Reply {
    match endpoint {
        Endpoint::Products => {
            let products: Vec<Value> = resolver.all_products().iter().map(product_summary).collect();
            Reply::Found(json!({
                "products": products,
                "structuredData": organization_schema(site),
            }))
        }
        Endpoint::Product(slug) => match resolver.product_by_slug(slug) {
            Some(record) => {
                let schema = product_schema(&record.product, site);
                Reply::Found(json!({ "product": record, "structuredData": schema }))
            }
            None => Reply::NotFound("product not found"),
        },
        Endpoint::Posts(filter) => {
            let base = if filter.featured {
                resolver.featured_posts()
            } else {
                resolver.all_posts()
            };
            let posts: Vec<Value> = base
                .iter()
                .filter(|post| filter.matches(post))
                .map(post_summary)
                .collect();
            Reply::Found(json!({ "total": posts.len(), "posts": posts }))
        }
        Endpoint::Tags => Reply::Found(json!({ "tags": resolver.all_tags() })),
        Endpoint::Post(slug) => match resolver.post_by_slug(slug) {
            Some(post) => {
                let schema = article_schema(&post, site);
                Reply::Found(json!({ "post": post, "structuredData": schema }))
            }
            None => Reply::NotFound("post not found"),
        },
    }
}

pub async fn handle(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let Some(endpoint) = parse_endpoint(ctx.path, ctx.query) else {
        return http::build_json_error(StatusCode::NOT_FOUND, "unknown endpoint", ctx.is_head);
    };

    let resolver = Arc::clone(&state.resolver);
    let site = state.config.site.clone();
    let reply = tokio::task::spawn_blocking(move || query(&resolver, &site, &endpoint)).await;

    match reply {
        Ok(Reply::Found(value)) => {
            http::build_json_response(StatusCode::OK, &value, CachePolicy::NoCache, ctx.is_head)
        }
        Ok(Reply::NotFound(message)) => {
            http::build_json_error(StatusCode::NOT_FOUND, message, ctx.is_head)
        }
        Err(e) => {
            tracing::error!(error = %e, "content query task failed");
            http::build_json_error(StatusCode::INTERNAL_SERVER_ERROR, "content unavailable", ctx.is_head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentType, MemoryStore};
    use crate::handler::router::tests::{make_site, request, send};
    use hyper::Method;

    fn post(category: &str, date: &str, tags: &str, featured: bool) -> String {
        format!(
            "---\nmetadata:\n  title: T\n  description: D\n  publishDate: \"{date}\"\n  author: A\n  category: {category}\n  tags: {tags}\n  featured: {featured}\n---\nBody\n"
        )
    }

    fn make_resolver() -> ContentResolver<MemoryStore> {
        let store = MemoryStore::new()
            .with(ContentType::BlogPost, "insights/a", &post("insights", "2025-01-01", "[money]", true))
            .with(ContentType::BlogPost, "insights/b", &post("insights", "2025-02-01", "[habits]", false))
            .with(ContentType::BlogPost, "philosophy/c", &post("philosophy", "2025-03-01", "[money]", true));
        ContentResolver::new(store)
    }

    fn slugs(reply: Reply) -> Vec<String> {
        let Reply::Found(value) = reply else {
            panic!("expected a listing");
        };
        value["posts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["slug"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_parse_endpoint() {
        assert_eq!(parse_endpoint("/api/products", None), Some(Endpoint::Products));
        assert_eq!(parse_endpoint("/api/products/", None), Some(Endpoint::Products));
        assert_eq!(
            parse_endpoint("/api/products/moneytide", None),
            Some(Endpoint::Product("moneytide".to_string()))
        );
        assert_eq!(parse_endpoint("/api/blog/tags", None), Some(Endpoint::Tags));
        assert_eq!(
            parse_endpoint("/api/blog/insights/tides", None),
            Some(Endpoint::Post("insights/tides".to_string()))
        );
        assert_eq!(
            parse_endpoint("/api/blog", Some("category=insights&featured=true")),
            Some(Endpoint::Posts(PostFilter {
                category: Some("insights".to_string()),
                tag: None,
                featured: true,
            }))
        );
        assert_eq!(parse_endpoint("/api", None), None);
        assert_eq!(parse_endpoint("/api/users", None), None);
        assert_eq!(parse_endpoint("/api/blog/a/b/c", None), None);
    }

    #[test]
    fn test_post_filters() {
        let resolver = make_resolver();
        let site = SiteConfig::default();
        let run = |query: Option<&str>| {
            slugs(super::query(
                &resolver,
                &site,
                &Endpoint::Posts(PostFilter::from_query(query)),
            ))
        };

        assert_eq!(run(None), ["philosophy/c", "insights/b", "insights/a"]);
        assert_eq!(run(Some("category=insights")), ["insights/b", "insights/a"]);
        assert_eq!(run(Some("tag=money")), ["philosophy/c", "insights/a"]);
        assert_eq!(run(Some("featured=true&category=insights")), ["insights/a"]);
        assert_eq!(run(Some("featured=false")).len(), 3);
    }

    #[test]
    fn test_missing_records() {
        let resolver = make_resolver();
        let site = SiteConfig::default();
        assert_eq!(
            query(&resolver, &site, &Endpoint::Product("nope".to_string())),
            Reply::NotFound("product not found")
        );
        assert_eq!(
            query(&resolver, &site, &Endpoint::Post("insights/nope".to_string())),
            Reply::NotFound("post not found")
        );
    }

    #[tokio::test]
    async fn test_product_page_props() {
        let dir = tempfile::tempdir().unwrap();
        let state = make_site(dir.path());
        let (status, _, body) = send(
            &state,
            request(Method::GET, "moneytide.vastsilicon.com", "/api/products/moneytide"),
        )
        .await;
        assert_eq!(status, 200);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["product"]["origin"], "migrated_legacy");
        assert_eq!(value["product"]["product"]["metadata"]["name"], "MoneyTide");
        assert_eq!(value["structuredData"]["@type"], "SoftwareApplication");
        assert_eq!(
            value["structuredData"]["downloadUrl"],
            "https://apps.apple.com/app/id1"
        );
    }

    #[tokio::test]
    async fn test_blog_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let state = make_site(dir.path());

        let (status, _, body) =
            send(&state, request(Method::GET, "vastsilicon.com", "/api/blog/tags")).await;
        assert_eq!(status, 200);
        assert_eq!(body, r#"{"tags":["money"]}"#);

        let (status, _, body) = send(
            &state,
            request(Method::GET, "vastsilicon.com", "/api/blog/insights/why-budgets-fail"),
        )
        .await;
        assert_eq!(status, 200);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["post"]["metadata"]["readTime"], 1);
        assert_eq!(value["structuredData"]["headline"], "Why budgets fail");

        let (status, _, body) =
            send(&state, request(Method::GET, "vastsilicon.com", "/api/blog/insights/nope")).await;
        assert_eq!(status, 404);
        assert_eq!(body, r#"{"error":"post not found"}"#);
    }
}
