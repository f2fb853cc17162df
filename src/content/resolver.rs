//! Content resolver module
//!
//! Uniform, schema-validated queries over a content store. Every call reads
//! fresh from the store. Malformed records are logged and left out of listings;
//! direct lookups turn any failure into `None`.

use chrono::Utc;
use serde::Serialize;

use super::blog::{collect_tags, sort_by_publish_date, validate_blog_post_metadata, BlogPost};
use super::error::Result;
use super::excerpt::{generate_excerpt, DEFAULT_EXCERPT_LENGTH};
use super::frontmatter;
use super::product::{Product, ProductDocument, SchemaOrigin};
use super::store::ContentStore;
use super::ContentType;

/// Most featured posts returned by [`ContentResolver::featured_posts`]
pub const FEATURED_POST_LIMIT: usize = 3;

/// A product in the current schema, with its body and provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub slug: String,
    pub origin: SchemaOrigin,
    pub product: Product,
    pub excerpt: String,
    pub body: String,
}

/// Any resolved record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    Product(ProductRecord),
    BlogPost(BlogPost),
}

impl Record {
    pub fn slug(&self) -> &str {
        match self {
            Self::Product(p) => &p.slug,
            Self::BlogPost(p) => &p.slug,
        }
    }
}

/// Per-record outcome of a content check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum CheckOutcome {
    Current,
    Migrated,
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckEntry {
    pub kind: ContentType,
    pub slug: String,
    pub outcome: CheckOutcome,
}

/// Result of loading every record once
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentReport {
    pub entries: Vec<CheckEntry>,
}

impl ContentReport {
    fn count(&self, pred: impl Fn(&CheckOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }

    pub fn current(&self) -> usize {
        self.count(|o| *o == CheckOutcome::Current)
    }

    pub fn migrated(&self) -> usize {
        self.count(|o| *o == CheckOutcome::Migrated)
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, CheckOutcome::Skipped(_)))
    }
}

pub struct ContentResolver<S> {
    store: S,
    excerpt_length: usize,
}

impl<S: ContentStore> ContentResolver<S> {
    pub const fn new(store: S) -> Self {
        Self {
            store,
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Every valid record of a type
    ///
    /// Blog posts come newest first; products in store order.
    pub fn get_all(&self, kind: ContentType) -> Vec<Record> {
        match kind {
            ContentType::Product => self.all_products().into_iter().map(Record::Product).collect(),
            ContentType::BlogPost => self.all_posts().into_iter().map(Record::BlogPost).collect(),
        }
    }

    /// One record by exact slug
    pub fn get_by_slug(&self, kind: ContentType, slug: &str) -> Option<Record> {
        match kind {
            ContentType::Product => self.product_by_slug(slug).map(Record::Product),
            ContentType::BlogPost => self.post_by_slug(slug).map(Record::BlogPost),
        }
    }

    pub fn all_products(&self) -> Vec<ProductRecord> {
        self.scan(ContentType::Product, |slug| self.load_product(slug))
            .into_iter()
            .filter_map(|(_, loaded)| loaded.ok().flatten())
            .collect()
    }

    pub fn product_by_slug(&self, slug: &str) -> Option<ProductRecord> {
        self.lookup(ContentType::Product, slug, |slug| self.load_product(slug))
    }

    pub fn all_posts(&self) -> Vec<BlogPost> {
        let mut posts: Vec<BlogPost> = self
            .scan(ContentType::BlogPost, |slug| self.load_post(slug))
            .into_iter()
            .filter_map(|(_, loaded)| loaded.ok().flatten())
            .collect();
        sort_by_publish_date(&mut posts);
        posts
    }

    pub fn post_by_slug(&self, slug: &str) -> Option<BlogPost> {
        self.lookup(ContentType::BlogPost, slug, |slug| self.load_post(slug))
    }

    pub fn posts_by_category(&self, category: &str) -> Vec<BlogPost> {
        self.all_posts()
            .into_iter()
            .filter(|post| post.metadata.category == category)
            .collect()
    }

    pub fn featured_posts(&self) -> Vec<BlogPost> {
        self.all_posts()
            .into_iter()
            .filter(|post| post.metadata.featured)
            .take(FEATURED_POST_LIMIT)
            .collect()
    }

    pub fn posts_by_tag(&self, tag: &str) -> Vec<BlogPost> {
        self.all_posts()
            .into_iter()
            .filter(|post| post.metadata.tags.iter().any(|t| t == tag))
            .collect()
    }

    pub fn all_tags(&self) -> Vec<String> {
        collect_tags(&self.all_posts())
    }

    /// Load every record once and report how each was read
    pub fn check(&self) -> ContentReport {
        let mut entries = Vec::new();

        for (slug, loaded) in self.scan(ContentType::Product, |slug| self.load_product(slug)) {
            let outcome = match loaded {
                Ok(Some(record)) if record.origin == SchemaOrigin::Current => CheckOutcome::Current,
                Ok(Some(_)) => CheckOutcome::Migrated,
                Ok(None) => continue,
                Err(e) => CheckOutcome::Skipped(e.to_string()),
            };
            entries.push(CheckEntry {
                kind: ContentType::Product,
                slug,
                outcome,
            });
        }

        for (slug, loaded) in self.scan(ContentType::BlogPost, |slug| self.load_post(slug)) {
            let outcome = match loaded {
                Ok(Some(_)) => CheckOutcome::Current,
                Ok(None) => continue,
                Err(e) => CheckOutcome::Skipped(e.to_string()),
            };
            entries.push(CheckEntry {
                kind: ContentType::BlogPost,
                slug,
                outcome,
            });
        }

        ContentReport { entries }
    }

    /// Load every listed slug, logging failures
    fn scan<T>(
        &self,
        kind: ContentType,
        load: impl Fn(&str) -> Result<Option<T>>,
    ) -> Vec<(String, Result<Option<T>>)> {
        let slugs = match self.store.list(kind) {
            Ok(slugs) => slugs,
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "content listing failed");
                return Vec::new();
            }
        };

        slugs
            .into_iter()
            .map(|slug| {
                let loaded = load(&slug);
                if let Err(e) = &loaded {
                    tracing::warn!(kind = %kind, slug = %slug, error = %e, "skipping content record");
                }
                (slug, loaded)
            })
            .collect()
    }

    fn lookup<T>(
        &self,
        kind: ContentType,
        slug: &str,
        load: impl Fn(&str) -> Result<Option<T>>,
    ) -> Option<T> {
        match load(slug) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(kind = %kind, slug, error = %e, "content lookup failed");
                None
            }
        }
    }

    fn load_product(&self, slug: &str) -> Result<Option<ProductRecord>> {
        let Some(raw) = self.store.read(ContentType::Product, slug)? else {
            return Ok(None);
        };
        let doc = frontmatter::parse(&raw.source)?;
        let document = ProductDocument::classify(&doc.data, slug)?;
        let origin = document.origin();
        let product = document.into_current(slug, raw.modified.unwrap_or_else(Utc::now));

        Ok(Some(ProductRecord {
            slug: slug.to_string(),
            origin,
            product,
            excerpt: generate_excerpt(&doc.body, self.excerpt_length),
            body: doc.body,
        }))
    }

    fn load_post(&self, slug: &str) -> Result<Option<BlogPost>> {
        let Some(raw) = self.store.read(ContentType::BlogPost, slug)? else {
            return Ok(None);
        };
        let doc = frontmatter::parse(&raw.source)?;
        let metadata = validate_blog_post_metadata(doc.fields(), &doc.body)?;

        Ok(Some(BlogPost {
            slug: slug.to_string(),
            metadata,
            excerpt: generate_excerpt(&doc.body, self.excerpt_length),
            body: doc.body,
        }))
    }
}
