//! Subdomain rewrite module
//!
//! Decides per request whether to pass it through or rewrite its path into the
//! product section mapped to the request's subdomain. The client-visible URL never
//! changes; only the internally resolved path does.

use std::collections::BTreeMap;

use thiserror::Error;

use super::subdomain::extract_subdomain;
use crate::config::RoutingConfig;

/// Routing table validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoutingError {
    #[error("subdomain label '{0}' must be non-empty, lowercase and contain no dots")]
    InvalidLabel(String),
    #[error("route prefix '{prefix}' for subdomain '{label}' must start with '/'")]
    InvalidPrefix { label: String, prefix: String },
}

/// Immutable mapping from subdomain label to root path prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingTable {
    routes: BTreeMap<String, String>,
}

impl RoutingTable {
    /// Build a routing table, enforcing label and prefix invariants
    pub fn new<I, K, V>(entries: I) -> Result<Self, RoutingError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut routes = BTreeMap::new();
        for (label, prefix) in entries {
            let label = label.into();
            let prefix = prefix.into();
            if label.is_empty()
                || label.contains('.')
                || label.chars().any(|c| c.is_ascii_uppercase())
            {
                return Err(RoutingError::InvalidLabel(label));
            }
            if !prefix.starts_with('/') {
                return Err(RoutingError::InvalidPrefix { label, prefix });
            }
            routes.insert(label, prefix);
        }
        Ok(Self { routes })
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.routes.get(label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Everything `route` needs, built once at startup
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub table: RoutingTable,
    pub well_known_paths: Vec<String>,
    pub static_extensions: Vec<String>,
}

impl RouterConfig {
    pub fn from_config(config: &RoutingConfig) -> Result<Self, RoutingError> {
        Ok(Self {
            table: RoutingTable::new(config.subdomains.clone())?,
            well_known_paths: config.well_known_paths.clone(),
            static_extensions: config
                .static_extensions
                .iter()
                .map(|ext| ext.to_ascii_lowercase())
                .collect(),
        })
    }

    fn is_well_known(&self, path: &str) -> bool {
        self.well_known_paths.iter().any(|p| p == path)
    }

    fn is_static_asset(&self, path: &str) -> bool {
        let lower = path.to_ascii_lowercase();
        self.static_extensions
            .iter()
            .any(|ext| lower.ends_with(ext.as_str()))
    }
}

/// Per-request routing inputs
#[derive(Debug, Clone, Default)]
pub struct RequestDescriptor {
    pub host: Option<String>,
    pub forwarded_host: Option<String>,
    pub path: String,
    pub method: String,
}

impl RequestDescriptor {
    /// Forwarded host when present and non-empty, otherwise the Host header
    ///
    /// A comma-separated `X-Forwarded-Host` chain contributes its first entry.
    /// The result is ASCII-lowercased.
    pub fn effective_host(&self) -> Option<String> {
        let forwarded = self
            .forwarded_host
            .as_deref()
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        forwarded
            .or_else(|| self.host.as_deref().map(str::trim))
            .filter(|value| !value.is_empty())
            .map(str::to_ascii_lowercase)
    }
}

/// Routing outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Pass,
    Rewrite(String),
}

impl RouteDecision {
    /// Path the request should be served from
    pub fn resolve<'a>(&'a self, original: &'a str) -> &'a str {
        match self {
            Self::Pass => original,
            Self::Rewrite(target) => target,
        }
    }
}

/// Decide how to serve a request
///
/// Precedence:
/// 1. Well-known AASA paths always pass
/// 2. No subdomain label, or label not in the table -> pass
/// 3. Static asset extension -> pass
/// 4. Rewrite: `/` maps to the prefix, unprefixed paths get the prefix prepended,
///    already-prefixed paths stay as they are
pub fn route(request: &RequestDescriptor, config: &RouterConfig) -> RouteDecision {
    let path = request.path.as_str();

    if config.is_well_known(path) {
        tracing::debug!(path, method = %request.method, "well-known path, passing through");
        return RouteDecision::Pass;
    }

    let Some(host) = request.effective_host() else {
        return RouteDecision::Pass;
    };
    let Some(label) = extract_subdomain(&host) else {
        return RouteDecision::Pass;
    };
    let Some(prefix) = config.table.get(label) else {
        return RouteDecision::Pass;
    };

    if config.is_static_asset(path) {
        return RouteDecision::Pass;
    }

    let target = if path == "/" {
        prefix.to_string()
    } else if !path.starts_with(prefix) {
        format!("{prefix}{path}")
    } else {
        path.to_string()
    };

    tracing::debug!(
        host = %host,
        subdomain = label,
        from = path,
        to = %target,
        "subdomain rewrite"
    );
    RouteDecision::Rewrite(target)
}
