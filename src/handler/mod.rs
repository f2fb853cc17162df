//! Request handler module
//!
//! Responsible for request routing dispatch and the site's endpoints: the
//! static export, the app-link document, the sitemap and content page props.

pub mod content_api;
pub mod router;
pub mod sitemap;
pub mod static_files;
pub mod well_known;

// Re-export main entry point
pub use router::handle_request;
