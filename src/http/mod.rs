//! HTTP protocol layer module
//!
//! Response builders, cache validation and MIME detection, independent of
//! routing and content.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cache::CachePolicy;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_health_response, build_json_error, build_json_response,
    build_options_response,
};
