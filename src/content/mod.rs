// Content module entry point
// Typed access to product and blog content files

pub mod blog;
mod error;
pub mod excerpt;
pub mod frontmatter;
pub mod migrate;
pub mod product;
mod resolver;
pub mod store;
pub mod structured_data;

use std::fmt;

use serde::Serialize;

// Re-export public types
pub use blog::{BlogPost, BlogPostMetadata};
pub use error::{ContentError, Result};
pub use product::{Product, ProductDocument, SchemaOrigin};
pub use resolver::{
    CheckEntry, CheckOutcome, ContentReport, ContentResolver, ProductRecord, Record,
    FEATURED_POST_LIMIT,
};
pub use store::{ContentStore, FsContentStore, MemoryStore, RawRecord};

/// Kind of content record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Product,
    BlogPost,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Product => "product",
            Self::BlogPost => "blog post",
        })
    }
}
