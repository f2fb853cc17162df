// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub apple_app_site_association: AasaConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
    /// Add nosniff/referrer/frame headers to every response
    #[serde(default = "default_true")]
    pub security_headers: bool,
}

/// Subdomain routing configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RoutingConfig {
    /// Subdomain label -> section path prefix
    #[serde(default = "default_subdomains")]
    pub subdomains: BTreeMap<String, String>,
    /// Paths that always pass through untouched
    #[serde(default = "default_well_known_paths")]
    pub well_known_paths: Vec<String>,
    /// Extensions served from their literal path on every host
    #[serde(default = "default_static_extensions")]
    pub static_extensions: Vec<String>,
    /// Path prefixes the router is never invoked for
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,
}

fn default_subdomains() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("moneytide".to_string(), "/products/moneytide".to_string()),
        ("choicecheck".to_string(), "/products/choicecheck".to_string()),
    ])
}

pub const AASA_WELL_KNOWN_PATH: &str = "/.well-known/apple-app-site-association";
pub const AASA_ROOT_PATH: &str = "/apple-app-site-association";

fn default_well_known_paths() -> Vec<String> {
    vec![AASA_WELL_KNOWN_PATH.to_string(), AASA_ROOT_PATH.to_string()]
}

fn default_static_extensions() -> Vec<String> {
    [
        ".svg", ".png", ".jpg", ".jpeg", ".gif", ".ico", ".webp", ".woff", ".woff2", ".ttf",
        ".otf", ".pdf", ".xml", ".txt", ".css", ".js",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_excluded_prefixes() -> Vec<String> {
    [
        "/_next/static",
        "/_next/image",
        "/favicon.ico",
        "/robots.txt",
        "/assets/",
        "/api/",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            subdomains: default_subdomains(),
            well_known_paths: default_well_known_paths(),
            static_extensions: default_static_extensions(),
            excluded_prefixes: default_excluded_prefixes(),
        }
    }
}

/// Content store configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ContentConfig {
    #[serde(default = "default_products_dir")]
    pub products_dir: String,
    #[serde(default = "default_blog_dir")]
    pub blog_dir: String,
    /// Content file extension, without the dot
    #[serde(default = "default_content_extension")]
    pub extension: String,
}

fn default_products_dir() -> String {
    "content/products".to_string()
}

fn default_blog_dir() -> String {
    "content/blog".to_string()
}

fn default_content_extension() -> String {
    "mdx".to_string()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            products_dir: default_products_dir(),
            blog_dir: default_blog_dir(),
            extension: default_content_extension(),
        }
    }
}

/// Site-wide configuration: identity, static export directory, sitemap, health
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_site_name")]
    pub name: String,
    #[serde(default = "default_site_description")]
    pub description: String,
    #[serde(default = "default_logo")]
    pub logo: String,
    #[serde(default = "default_founding_date")]
    pub founding_date: String,
    #[serde(default)]
    pub same_as: Vec<String>,
    /// Statically exported site root
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
    /// Fixed pages listed in the sitemap ahead of content pages
    #[serde(default = "default_static_pages")]
    pub static_pages: Vec<SitemapPage>,
    #[serde(default)]
    pub health: HealthConfig,
}

/// A fixed sitemap entry
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SitemapPage {
    pub path: String,
    pub change_frequency: String,
    pub priority: f32,
}

impl SitemapPage {
    fn new(path: &str, change_frequency: &str, priority: f32) -> Self {
        Self {
            path: path.to_string(),
            change_frequency: change_frequency.to_string(),
            priority,
        }
    }
}

fn default_base_url() -> String {
    "https://vastsilicon.com".to_string()
}

fn default_site_name() -> String {
    "VastSilicon".to_string()
}

fn default_site_description() -> String {
    "Building cognitive infrastructure for human flourishing through AI-augmented decision-making tools".to_string()
}

fn default_logo() -> String {
    "https://vastsilicon.com/vast_silicon_logo.png".to_string()
}

fn default_founding_date() -> String {
    "2024".to_string()
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

fn default_static_pages() -> Vec<SitemapPage> {
    vec![
        SitemapPage::new("/", "weekly", 1.0),
        SitemapPage::new("/about", "monthly", 0.8),
        SitemapPage::new("/blog", "weekly", 0.9),
        SitemapPage::new("/philosophy", "monthly", 0.7),
    ]
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            name: default_site_name(),
            description: default_site_description(),
            logo: default_logo(),
            founding_date: default_founding_date(),
            same_as: Vec::new(),
            public_dir: default_public_dir(),
            index_files: default_index_files(),
            static_pages: default_static_pages(),
            health: HealthConfig::default(),
        }
    }
}

/// Health check configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}

/// Apple App Site Association document served at the well-known paths
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AasaConfig {
    #[serde(default = "default_team_id")]
    pub team_id: String,
    #[serde(default = "default_bundle_id")]
    pub bundle_id: String,
    #[serde(default = "default_aasa_paths")]
    pub paths: Vec<String>,
}

fn default_team_id() -> String {
    "D8NYN6GSAF".to_string()
}

fn default_bundle_id() -> String {
    "com.vastsilicon.FinanceManager".to_string()
}

fn default_aasa_paths() -> Vec<String> {
    ["/invite/friend/*", "/invite/group/*", "/process-receipt/*"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Default for AasaConfig {
    fn default() -> Self {
        Self {
            team_id: default_team_id(),
            bundle_id: default_bundle_id(),
            paths: default_aasa_paths(),
        }
    }
}
