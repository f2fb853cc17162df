//! Blog post schema module

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ContentError, Result};
use super::excerpt::calculate_read_time;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostMetadata {
    pub title: String,
    pub description: String,
    pub publish_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,
    pub author: String,
    /// problem-spaces, case-studies, philosophy or insights
    pub category: String,
    pub tags: Vec<String>,
    /// Minutes; computed from the body when the file leaves it out
    #[serde(default)]
    pub read_time: Option<u32>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

impl BlogPostMetadata {
    /// Publish date as a timestamp; `None` when unparsable
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_date(&self.publish_date)
    }

    /// Last modification: updated date if present and valid, else publish date
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.updated_date
            .as_deref()
            .and_then(parse_date)
            .or_else(|| self.published_at())
    }
}

/// A validated blog post with its body and excerpt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPost {
    /// `category/name`
    pub slug: String,
    pub metadata: BlogPostMetadata,
    pub excerpt: String,
    pub body: String,
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Check required blog metadata and deserialize it
pub fn validate_blog_post_metadata(data: &Value, body: &str) -> Result<BlogPostMetadata> {
    if !data.is_object() {
        return Err(ContentError::InvalidField("metadata"));
    }

    for field in ["title", "description", "publishDate", "author", "category"] {
        let present = data
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty());
        if !present {
            return Err(ContentError::InvalidField(field));
        }
    }
    if !data.get("tags").is_some_and(Value::is_array) {
        return Err(ContentError::InvalidField("tags"));
    }

    let mut metadata: BlogPostMetadata = serde_json::from_value(data.clone())?;
    if metadata.read_time.is_none() {
        metadata.read_time = Some(calculate_read_time(body));
    }
    Ok(metadata)
}

/// Newest first; posts with unparsable dates go last, ties keep their order
pub fn sort_by_publish_date(posts: &mut [BlogPost]) {
    posts.sort_by_key(|post| std::cmp::Reverse(post.metadata.published_at()));
}

/// Sorted, de-duplicated tags across posts
pub fn collect_tags(posts: &[BlogPost]) -> Vec<String> {
    let mut tags: Vec<String> = posts
        .iter()
        .flat_map(|post| post.metadata.tags.iter().cloned())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}
