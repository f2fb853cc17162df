//! Content loading errors

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unterminated frontmatter block (expected closing '{0}')")]
    UnterminatedFrontmatter(&'static str),

    #[error("invalid YAML frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML frontmatter: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("frontmatter does not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("'{slug}' matches neither the current nor the legacy schema")]
    Schema { slug: String },

    #[error("blog post must have a valid '{0}'")]
    InvalidField(&'static str),

    #[error("invalid slug '{0}'")]
    InvalidSlug(String),
}

impl ContentError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
