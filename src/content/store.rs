//! Content store module
//!
//! Read-only access to content records. The filesystem store maps one root
//! directory per content type; products are flat `{slug}.{ext}` files, blog
//! posts live at `{category}/{name}.{ext}` below the blog root.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::error::{ContentError, Result};
use super::ContentType;
use crate::config::ContentConfig;

/// Raw record text as read from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub slug: String,
    pub source: String,
    pub modified: Option<DateTime<Utc>>,
}

/// Narrow read-only interface over a content source
pub trait ContentStore {
    /// Slugs of every record of a type; a missing root yields an empty list
    fn list(&self, kind: ContentType) -> Result<Vec<String>>;

    /// Read one record; `Ok(None)` when it does not exist
    fn read(&self, kind: ContentType, slug: &str) -> Result<Option<RawRecord>>;
}

/// Check a slug's shape before it touches a path
///
/// Products are a single segment, blog posts exactly `category/name`.
pub fn validate_slug(kind: ContentType, slug: &str) -> Result<()> {
    let segments: Vec<&str> = slug.split('/').collect();
    let expected = match kind {
        ContentType::Product => 1,
        ContentType::BlogPost => 2,
    };
    let well_formed = segments.len() == expected
        && segments.iter().all(|s| {
            !s.is_empty() && *s != "." && *s != ".." && !s.contains('\\') && !s.contains('\0')
        });
    if well_formed {
        Ok(())
    } else {
        Err(ContentError::InvalidSlug(slug.to_string()))
    }
}

/// Filesystem-backed store
#[derive(Debug, Clone)]
pub struct FsContentStore {
    products_dir: PathBuf,
    blog_dir: PathBuf,
    extension: String,
}

impl FsContentStore {
    pub fn new(
        products_dir: impl Into<PathBuf>,
        blog_dir: impl Into<PathBuf>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            products_dir: products_dir.into(),
            blog_dir: blog_dir.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &ContentConfig) -> Self {
        Self::new(&config.products_dir, &config.blog_dir, &config.extension)
    }

    fn root(&self, kind: ContentType) -> &Path {
        match kind {
            ContentType::Product => &self.products_dir,
            ContentType::BlogPost => &self.blog_dir,
        }
    }

    /// File stems with the content extension directly inside `dir`
    fn content_stems(&self, dir: &Path) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(dir).map_err(|e| ContentError::io(dir, e))?;
        let mut stems = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ContentError::io(dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_string());
            }
        }
        Ok(stems)
    }
}

impl ContentStore for FsContentStore {
    fn list(&self, kind: ContentType) -> Result<Vec<String>> {
        let root = self.root(kind);
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        match kind {
            ContentType::Product => self.content_stems(root),
            ContentType::BlogPost => {
                let entries = std::fs::read_dir(root).map_err(|e| ContentError::io(root, e))?;
                let mut slugs = Vec::new();
                for entry in entries {
                    let entry = entry.map_err(|e| ContentError::io(root, e))?;
                    let path = entry.path();
                    if !path.is_dir() {
                        continue;
                    }
                    let Some(category) = path.file_name().and_then(|n| n.to_str()) else {
                        continue;
                    };
                    match self.content_stems(&path) {
                        Ok(stems) => {
                            slugs.extend(stems.into_iter().map(|stem| format!("{category}/{stem}")));
                        }
                        Err(e) => tracing::warn!(category, error = %e, "skipping blog category"),
                    }
                }
                Ok(slugs)
            }
        }
    }

    fn read(&self, kind: ContentType, slug: &str) -> Result<Option<RawRecord>> {
        validate_slug(kind, slug)?;
        let path = self.root(kind).join(format!("{slug}.{}", self.extension));
        if !path.is_file() {
            return Ok(None);
        }

        let source = std::fs::read_to_string(&path).map_err(|e| ContentError::io(&path, e))?;
        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        Ok(Some(RawRecord {
            slug: slug.to_string(),
            source,
            modified,
        }))
    }
}

/// In-memory store, for fixtures and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<(ContentType, String), String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, kind: ContentType, slug: &str, source: &str) -> Self {
        self.insert(kind, slug, source);
        self
    }

    pub fn insert(&mut self, kind: ContentType, slug: &str, source: &str) {
        self.records
            .insert((kind, slug.to_string()), source.to_string());
    }
}

impl ContentStore for MemoryStore {
    fn list(&self, kind: ContentType) -> Result<Vec<String>> {
        Ok(self
            .records
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, slug)| slug.clone())
            .collect())
    }

    fn read(&self, kind: ContentType, slug: &str) -> Result<Option<RawRecord>> {
        validate_slug(kind, slug)?;
        Ok(self
            .records
            .get(&(kind, slug.to_string()))
            .map(|source| RawRecord {
                slug: slug.to_string(),
                source: source.clone(),
                modified: None,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_store(dir: &Path) -> FsContentStore {
        FsContentStore::new(dir.join("products"), dir.join("blog"), "mdx")
    }

    #[test]
    fn test_missing_roots_list_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());
        assert!(store.list(ContentType::Product).unwrap().is_empty());
        assert!(store.list(ContentType::BlogPost).unwrap().is_empty());
        assert_eq!(store.read(ContentType::Product, "moneytide").unwrap(), None);
    }

    #[test]
    fn test_lists_products_flat() {
        let dir = tempfile::tempdir().unwrap();
        let products = dir.path().join("products");
        fs::create_dir_all(products.join("nested")).unwrap();
        fs::write(products.join("moneytide.mdx"), "a").unwrap();
        fs::write(products.join("choicecheck.mdx"), "b").unwrap();
        fs::write(products.join("notes.md"), "c").unwrap();
        fs::write(products.join("nested").join("hidden.mdx"), "d").unwrap();

        let mut slugs = make_store(dir.path()).list(ContentType::Product).unwrap();
        slugs.sort();
        assert_eq!(slugs, ["choicecheck", "moneytide"]);
    }

    #[test]
    fn test_lists_blog_one_level_deep() {
        let dir = tempfile::tempdir().unwrap();
        let blog = dir.path().join("blog");
        fs::create_dir_all(blog.join("insights").join("drafts")).unwrap();
        fs::create_dir_all(blog.join("philosophy")).unwrap();
        fs::write(blog.join("insights").join("tides.mdx"), "a").unwrap();
        fs::write(blog.join("insights").join("drafts").join("wip.mdx"), "b").unwrap();
        fs::write(blog.join("philosophy").join("agency.mdx"), "c").unwrap();
        fs::write(blog.join("top-level.mdx"), "d").unwrap();

        let mut slugs = make_store(dir.path()).list(ContentType::BlogPost).unwrap();
        slugs.sort();
        assert_eq!(slugs, ["insights/tides", "philosophy/agency"]);
    }

    #[test]
    fn test_read_record() {
        let dir = tempfile::tempdir().unwrap();
        let blog = dir.path().join("blog").join("insights");
        fs::create_dir_all(&blog).unwrap();
        fs::write(blog.join("tides.mdx"), "---\ntitle: T\n---\nBody").unwrap();

        let record = make_store(dir.path())
            .read(ContentType::BlogPost, "insights/tides")
            .unwrap()
            .unwrap();
        assert_eq!(record.slug, "insights/tides");
        assert!(record.source.ends_with("Body"));
        assert!(record.modified.is_some());
    }

    #[test]
    fn test_rejects_traversal_slugs() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());
        for slug in ["../secret", "a/b", "", ".."] {
            assert!(matches!(
                store.read(ContentType::Product, slug),
                Err(ContentError::InvalidSlug(_))
            ));
        }
        for slug in ["insights", "../x", "a/b/c", "insights/"] {
            assert!(store.read(ContentType::BlogPost, slug).is_err());
        }
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new()
            .with(ContentType::Product, "moneytide", "x")
            .with(ContentType::BlogPost, "insights/tides", "y");
        assert_eq!(store.list(ContentType::Product).unwrap(), ["moneytide"]);
        assert_eq!(
            store
                .read(ContentType::BlogPost, "insights/tides")
                .unwrap()
                .map(|r| r.source),
            Some("y".to_string())
        );
        assert_eq!(store.read(ContentType::BlogPost, "insights/none").unwrap(), None);
    }
}
