//! Product schema module
//!
//! Current product shape, read-time structural validation, and the
//! current/legacy classification of product frontmatter.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ContentError, Result};
use super::migrate::{migrate_legacy_product, LegacyProduct};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
    Available,
    ComingSoon,
    InDevelopment,
}

impl ProductStatus {
    const ALL: [&'static str; 3] = ["available", "coming-soon", "in-development"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Web,
}

impl Platform {
    const ALL: [&'static str; 3] = ["ios", "android", "web"];

    /// Parse a lowercase platform name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ios" => Some(Self::Ios),
            "android" => Some(Self::Android),
            "web" => Some(Self::Web),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMetadata {
    pub name: String,
    pub slug: String,
    pub tagline: String,
    pub status: ProductStatus,
    pub platforms: Vec<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<String>,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserScenario {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub timeline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductContent {
    pub problem_statement: String,
    pub solution_approach: String,
    pub features: Vec<Feature>,
    pub user_scenarios: Vec<UserScenario>,
    pub pain_points: Vec<String>,
    pub benefits: Vec<String>,
    pub expansion_vision: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roadmap: Option<Vec<RoadmapItem>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAssets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_video: Option<String>,
    pub app_icon: String,
    pub screenshots: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_images: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToAction {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformLink {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<CallToAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<CallToAction>,
    pub platforms: Vec<PlatformLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coming_soon: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustSignalKind {
    UserCount,
    ExpertEndorsement,
    MediaMention,
    CaseStudy,
    Transparency,
    Performance,
    /// Missing or unrecognised `type`
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustSignalData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustSignal {
    #[serde(rename = "type", default)]
    pub kind: TrustSignalKind,
    #[serde(default)]
    pub data: TrustSignalData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
}

/// A/B test descriptor; carried through for templates, never evaluated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbTest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub component: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductGrowth {
    pub conversion_goals: Vec<String>,
    pub key_metrics: Vec<String>,
    pub trust_signals: Vec<TrustSignal>,
    pub seo_metadata: SeoMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ab_tests: Option<Vec<AbTest>>,
}

/// A product in the current schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub metadata: ProductMetadata,
    pub content: ProductContent,
    pub assets: ProductAssets,
    pub links: ProductLinks,
    pub growth: ProductGrowth,
}

// ============================================
// Structural validation
// ============================================

fn is_string(v: &Value, key: &str) -> bool {
    v.get(key).is_some_and(Value::is_string)
}

fn is_array(v: &Value, key: &str) -> bool {
    v.get(key).is_some_and(Value::is_array)
}

fn is_one_of(v: &Value, key: &str, allowed: &[&str]) -> bool {
    v.get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| allowed.contains(&s))
}

/// Check product metadata field presence and types
pub fn validate_product_metadata(metadata: &Value) -> bool {
    metadata.is_object()
        && is_string(metadata, "name")
        && is_string(metadata, "slug")
        && is_string(metadata, "tagline")
        && is_one_of(metadata, "status", &ProductStatus::ALL)
        && metadata
            .get("platforms")
            .and_then(Value::as_array)
            .is_some_and(|platforms| {
                platforms
                    .iter()
                    .all(|p| p.as_str().is_some_and(|p| Platform::ALL.contains(&p)))
            })
        && is_string(metadata, "lastUpdated")
}

/// Check product content field presence and types
pub fn validate_product_content(content: &Value) -> bool {
    content.is_object()
        && is_string(content, "problemStatement")
        && is_string(content, "solutionApproach")
        && is_array(content, "features")
        && is_array(content, "userScenarios")
        && is_array(content, "painPoints")
        && is_array(content, "benefits")
        && is_string(content, "expansionVision")
}

pub fn validate_product_assets(assets: &Value) -> bool {
    assets.is_object() && is_string(assets, "appIcon") && is_array(assets, "screenshots")
}

pub fn validate_product_links(links: &Value) -> bool {
    links.is_object() && is_array(links, "platforms")
}

pub fn validate_product_growth(growth: &Value) -> bool {
    growth.is_object()
        && is_array(growth, "conversionGoals")
        && is_array(growth, "keyMetrics")
        && is_array(growth, "trustSignals")
        && growth.get("seoMetadata").is_some_and(Value::is_object)
}

/// Check that every section of a current-schema product is present and well-typed
pub fn validate_product(product: &Value) -> bool {
    let section = |key: &str| product.get(key).unwrap_or(&Value::Null);
    validate_product_metadata(section("metadata"))
        && validate_product_content(section("content"))
        && validate_product_assets(section("assets"))
        && validate_product_links(section("links"))
        && validate_product_growth(section("growth"))
}

// ============================================
// Current/legacy classification
// ============================================

/// How a product record was read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaOrigin {
    Current,
    MigratedLegacy,
}

/// Product frontmatter, classified by shape
#[derive(Debug, Clone, PartialEq)]
pub enum ProductDocument {
    Current(Box<Product>),
    Legacy(Box<LegacyProduct>),
}

impl ProductDocument {
    /// Classify raw frontmatter: current schema first, then the legacy shape
    ///
    /// Legacy fields are read from the `metadata` object when present, else from
    /// the top level. Nested element fields are lenient, so a record that
    /// validates only fails to read when an element has the wrong primitive type;
    /// that is reported as a shape error rather than retried as legacy.
    pub fn classify(data: &Value, slug: &str) -> Result<Self> {
        if validate_product(data) {
            return serde_json::from_value::<Product>(data.clone())
                .map(|product| Self::Current(Box::new(product)))
                .map_err(|e| {
                    tracing::debug!(slug, error = %e, "current schema element rejected");
                    ContentError::Shape(e)
                });
        }

        let fields = match data.get("metadata") {
            Some(inner @ Value::Object(_)) => inner,
            _ => data,
        };
        serde_json::from_value::<LegacyProduct>(fields.clone())
            .map(|legacy| Self::Legacy(Box::new(legacy)))
            .map_err(|e| {
                tracing::debug!(slug, error = %e, "legacy schema rejected");
                ContentError::Schema {
                    slug: slug.to_string(),
                }
            })
    }

    pub const fn origin(&self) -> SchemaOrigin {
        match self {
            Self::Current(_) => SchemaOrigin::Current,
            Self::Legacy(_) => SchemaOrigin::MigratedLegacy,
        }
    }

    /// Current-schema product; legacy records are migrated
    pub fn into_current(self, slug: &str, last_updated: DateTime<Utc>) -> Product {
        match self {
            Self::Current(product) => *product,
            Self::Legacy(legacy) => migrate_legacy_product(&legacy, slug, last_updated),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub fn current_product_json() -> Value {
        json!({
            "metadata": {
                "name": "MoneyTide",
                "slug": "moneytide",
                "tagline": "See where your money flows",
                "status": "available",
                "platforms": ["ios", "web"],
                "lastUpdated": "2025-01-10T00:00:00Z"
            },
            "content": {
                "problemStatement": "Budgets break.",
                "solutionApproach": "Track the tide.",
                "features": [{"title": "Flows", "description": "See flows", "icon": "wave"}],
                "userScenarios": [{"title": "Rent", "description": "Plan rent", "userType": "renter"}],
                "painPoints": ["surprise bills"],
                "benefits": ["calm"],
                "expansionVision": "Households",
                "roadmap": [{"title": "Sync", "description": "Bank sync", "timeline": "Q3"}]
            },
            "assets": {
                "heroImage": "/images/moneytide/hero.png",
                "appIcon": "/images/moneytide/icon.png",
                "screenshots": ["/images/moneytide/1.png"]
            },
            "links": {
                "primary": {"label": "Download", "href": "https://apps.apple.com/app/1"},
                "platforms": [{"name": "iOS", "url": "https://apps.apple.com/app/1", "available": true}]
            },
            "growth": {
                "conversionGoals": ["app_store_click"],
                "keyMetrics": ["page_views"],
                "trustSignals": [{"type": "transparency", "data": {"source": "Open"}}],
                "seoMetadata": {"title": "MoneyTide"},
                "abTests": [{"name": "hero", "variants": ["a", "b"], "component": "Hero"}]
            }
        })
    }

    #[test]
    fn test_validate_current_product() {
        let product = current_product_json();
        assert!(validate_product_metadata(&product["metadata"]));
        assert!(validate_product_content(&product["content"]));
        assert!(validate_product(&product));
    }

    #[test]
    fn test_validate_rejects_bad_metadata() {
        let mut product = current_product_json();
        product["metadata"]["status"] = json!("beta");
        assert!(!validate_product_metadata(&product["metadata"]));

        let mut product = current_product_json();
        product["metadata"]["platforms"] = json!(["iOS"]);
        assert!(!validate_product_metadata(&product["metadata"]));

        let mut product = current_product_json();
        product["metadata"]["lastUpdated"] = json!(20250110);
        assert!(!validate_product(&product));
    }

    #[test]
    fn test_validate_requires_every_section() {
        for section in ["metadata", "content", "assets", "links", "growth"] {
            let mut product = current_product_json();
            product.as_object_mut().unwrap().remove(section);
            assert!(!validate_product(&product), "missing {section} accepted");
        }
        assert!(!validate_product(&json!(null)));
        assert!(!validate_product_content(&json!("text")));
    }

    #[test]
    fn test_classify_current() {
        let doc = ProductDocument::classify(&current_product_json(), "moneytide").unwrap();
        assert_eq!(doc.origin(), SchemaOrigin::Current);
        let product = doc.into_current("moneytide", Utc::now());
        assert_eq!(product.metadata.status, ProductStatus::Available);
        assert_eq!(product.metadata.platforms, vec![Platform::Ios, Platform::Web]);
        assert_eq!(product.growth.trust_signals[0].kind, TrustSignalKind::Transparency);
        assert_eq!(product.content.roadmap.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_classify_current_with_sparse_elements() {
        let mut data = current_product_json();
        data["content"]["features"] = json!([{"title": "Flows"}]);
        data["content"]["userScenarios"] = json!([{"title": "Rent"}]);
        data["links"]["platforms"] = json!([{"name": "iOS"}]);
        data["growth"]["trustSignals"] = json!([{"type": "award"}, {"data": {"metric": "10k"}}]);
        assert!(validate_product(&data));

        let doc = ProductDocument::classify(&data, "moneytide").unwrap();
        assert_eq!(doc.origin(), SchemaOrigin::Current);
        let product = doc.into_current("moneytide", Utc::now());
        assert_eq!(product.content.features[0].title, "Flows");
        assert_eq!(product.content.features[0].description, "");
        assert_eq!(product.content.user_scenarios[0].user_type, "");
        assert!(!product.links.platforms[0].available);
        assert_eq!(product.growth.trust_signals[0].kind, TrustSignalKind::Other);
        assert_eq!(
            product.growth.trust_signals[1].data.metric.as_deref(),
            Some("10k")
        );
    }

    #[test]
    fn test_classify_current_with_mistyped_element() {
        let mut data = current_product_json();
        data["content"]["painPoints"] = json!([42]);
        let err = ProductDocument::classify(&data, "moneytide").unwrap_err();
        assert!(matches!(err, ContentError::Shape(_)));
    }

    #[test]
    fn test_classify_falls_back_to_legacy() {
        let data = json!({
            "metadata": {
                "name": "ChoiceCheck",
                "tagline": "Decide with confidence",
                "description": "Decisions are hard.",
                "status": "beta",
                "platforms": ["iOS"],
                "primaryColor": "#00aa88",
                "hero": {"image": "/images/choicecheck/hero.png"}
            }
        });
        let doc = ProductDocument::classify(&data, "choicecheck").unwrap();
        assert_eq!(doc.origin(), SchemaOrigin::MigratedLegacy);
    }

    #[test]
    fn test_classify_rejects_unknown_shape() {
        let err = ProductDocument::classify(&json!({"metadata": {"title": "?"}}), "x").unwrap_err();
        assert!(matches!(err, ContentError::Schema { slug } if slug == "x"));
    }

    #[test]
    fn test_serialize_camel_case() {
        let product: Product = serde_json::from_value(current_product_json()).unwrap();
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["metadata"]["lastUpdated"], "2025-01-10T00:00:00Z");
        assert_eq!(value["assets"]["appIcon"], "/images/moneytide/icon.png");
        assert!(value["assets"].get("demoVideo").is_none());
    }
}
