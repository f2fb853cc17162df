//! Routing module
//!
//! Hostname-based request routing:
//! - Subdomain label extraction from the effective host
//! - Subdomain-to-section path rewriting
//! - Scope matching that keeps build output, assets and the API out of the router

mod matcher;
mod router;
mod subdomain;

pub use matcher::MatcherScope;
pub use router::{route, RequestDescriptor, RouteDecision, RouterConfig, RoutingError, RoutingTable};
pub use subdomain::extract_subdomain;
