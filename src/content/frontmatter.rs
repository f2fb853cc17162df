//! Frontmatter parsing module
//!
//! Splits a content file into its structured header and free-form body.
//! Supports YAML (`---` fences) and TOML (`+++` fences); files without a
//! header parse as an empty object plus the whole text as body.

use serde_json::{Map, Value};

use super::error::{ContentError, Result};

const YAML_FENCE: &str = "---";
const TOML_FENCE: &str = "+++";

/// A parsed content file
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Header data, always a JSON object
    pub data: Value,
    /// Text after the closing fence
    pub body: String,
}

impl Document {
    /// Structured fields of the record
    ///
    /// Content files keep their fields under a top-level `metadata` key; files
    /// that put them at the top level are accepted as well.
    pub fn fields(&self) -> &Value {
        match self.data.get("metadata") {
            Some(inner @ Value::Object(_)) => inner,
            _ => &self.data,
        }
    }
}

/// Parse a content file into header data and body
pub fn parse(source: &str) -> Result<Document> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let Some((fence, header, body)) = split(source)? else {
        return Ok(Document {
            data: Value::Object(Map::new()),
            body: source.to_string(),
        });
    };

    let data = if header.trim().is_empty() {
        Value::Null
    } else if fence == TOML_FENCE {
        toml_to_json(toml::from_str::<toml::Value>(header)?)
    } else {
        serde_yaml::from_str::<Value>(header)?
    };

    let data = match data {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };

    Ok(Document {
        data,
        body: body.to_string(),
    })
}

/// Split into (fence, header, body); `None` when the file has no header
fn split(source: &str) -> Result<Option<(&'static str, &str, &str)>> {
    let first_line_end = source.find('\n').unwrap_or(source.len());
    let fence = match source[..first_line_end].trim_end() {
        YAML_FENCE => YAML_FENCE,
        TOML_FENCE => TOML_FENCE,
        _ => return Ok(None),
    };

    let header_start = (first_line_end + 1).min(source.len());
    let mut offset = header_start;
    for line in source[header_start..].split_inclusive('\n') {
        if line.trim_end() == fence {
            let header = &source[header_start..offset];
            let body = &source[offset + line.len()..];
            return Ok(Some((fence, header, body)));
        }
        offset += line.len();
    }

    Err(ContentError::UnterminatedFrontmatter(fence))
}

/// Convert TOML into JSON, rendering datetimes as their string form
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yaml_frontmatter() {
        let doc = parse("---\nmetadata:\n  title: Hi\n  tags: [a, b]\n---\n\n# Body\n").unwrap();
        assert_eq!(doc.data, json!({"metadata": {"title": "Hi", "tags": ["a", "b"]}}));
        assert_eq!(doc.fields(), &json!({"title": "Hi", "tags": ["a", "b"]}));
        assert_eq!(doc.body, "\n# Body\n");
    }

    #[test]
    fn test_toml_frontmatter() {
        let doc = parse("+++\ntitle = \"Hi\"\npublishDate = 2024-03-01\n+++\nBody").unwrap();
        assert_eq!(doc.data["title"], "Hi");
        assert_eq!(doc.data["publishDate"], "2024-03-01");
        assert_eq!(doc.fields(), &doc.data);
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_no_frontmatter() {
        let doc = parse("# Just markdown").unwrap();
        assert_eq!(doc.data, json!({}));
        assert_eq!(doc.body, "# Just markdown");
    }

    #[test]
    fn test_empty_frontmatter() {
        let doc = parse("---\n---\nBody").unwrap();
        assert_eq!(doc.data, json!({}));
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_crlf_fences() {
        let doc = parse("---\r\ntitle: Hi\r\n---\r\nBody").unwrap();
        assert_eq!(doc.data["title"], "Hi");
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let err = parse("---\ntitle: Hi\n# Body").unwrap_err();
        assert!(matches!(err, ContentError::UnterminatedFrontmatter("---")));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = parse("---\ntitle: [unclosed\n---\nBody").unwrap_err();
        assert!(matches!(err, ContentError::Yaml(_)));
    }

    #[test]
    fn test_thematic_break_inside_body_is_kept() {
        let doc = parse("---\ntitle: Hi\n---\nIntro\n\n---\n\nMore").unwrap();
        assert_eq!(doc.body, "Intro\n\n---\n\nMore");
    }
}
