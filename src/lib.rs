//! Site server for vastsilicon.com
//!
//! Serves the static export of the marketing site, routes product
//! subdomains onto their section of the site and exposes the product and
//! blog content (with legacy product migration) as JSON page props.

pub mod config;
pub mod content;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
