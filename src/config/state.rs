// Application state module
// Immutable per-process state shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::content::{ContentResolver, FsContentStore};
use crate::routing::{MatcherScope, RouterConfig, RoutingError};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Subdomain routing table and pass-through rules, validated at startup
    pub router: RouterConfig,
    /// Paths the router is invoked for
    pub scope: MatcherScope,
    pub resolver: Arc<ContentResolver<FsContentStore>>,
}

impl AppState {
    /// Build state from configuration, rejecting an invalid routing table
    pub fn new(config: &Config) -> Result<Self, RoutingError> {
        let router = RouterConfig::from_config(&config.routing)?;
        let scope = MatcherScope::from_config(&config.routing);
        let store = FsContentStore::from_config(&config.content);

        Ok(Self {
            config: config.clone(),
            router,
            scope,
            resolver: Arc::new(ContentResolver::new(store)),
        })
    }
}
