//! Router scope matching module
//!
//! Decides which request paths are handed to the subdomain router at all.
//! Framework build output, image optimization, the favicon, robots.txt, public
//! assets and the API are served as-is on every host.

use crate::config::RoutingConfig;

/// Static set of paths the router is invoked for
#[derive(Debug, Clone)]
pub struct MatcherScope {
    pub well_known_paths: Vec<String>,
    pub excluded_prefixes: Vec<String>,
}

impl MatcherScope {
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self {
            well_known_paths: config.well_known_paths.clone(),
            excluded_prefixes: config.excluded_prefixes.clone(),
        }
    }

    /// Check if the router should see this path
    ///
    /// `/` and the well-known paths are always in scope; any other path is in
    /// scope unless it starts with an excluded prefix.
    pub fn in_scope(&self, path: &str) -> bool {
        if path == "/" || self.well_known_paths.iter().any(|p| p == path) {
            return true;
        }

        !self
            .excluded_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_scope() -> MatcherScope {
        MatcherScope {
            well_known_paths: vec![
                "/.well-known/apple-app-site-association".to_string(),
                "/apple-app-site-association".to_string(),
            ],
            excluded_prefixes: [
                "/_next/static",
                "/_next/image",
                "/favicon.ico",
                "/robots.txt",
                "/assets/",
                "/api/",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
        }
    }

    #[test]
    fn test_root_and_well_known_in_scope() {
        let scope = make_scope();
        assert!(scope.in_scope("/"));
        assert!(scope.in_scope("/.well-known/apple-app-site-association"));
        assert!(scope.in_scope("/apple-app-site-association"));
    }

    #[test]
    fn test_excluded_prefixes() {
        let scope = make_scope();
        assert!(!scope.in_scope("/_next/static/chunks/app.js"));
        assert!(!scope.in_scope("/_next/image?url=x"));
        assert!(!scope.in_scope("/favicon.ico"));
        assert!(!scope.in_scope("/robots.txt"));
        assert!(!scope.in_scope("/assets/logo.png"));
        assert!(!scope.in_scope("/api/products"));
    }

    #[test]
    fn test_ordinary_paths_in_scope() {
        let scope = make_scope();
        assert!(scope.in_scope("/faq"));
        assert!(scope.in_scope("/products/moneytide"));
        assert!(scope.in_scope("/_next/data/build.json"));
        // "/api" without trailing slash is a page path, not the API prefix
        assert!(scope.in_scope("/api"));
    }
}
