//! Legacy product migration module
//!
//! Older product files use a flat frontmatter shape. Migration into the current
//! schema is a pure function of the legacy record, its slug and a timestamp.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::product::{
    Feature, Platform, PlatformLink, Product, ProductAssets, ProductContent, ProductGrowth,
    ProductLinks, ProductMetadata, ProductStatus, SeoMetadata, TrustSignal, TrustSignalData,
    TrustSignalKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegacyStatus {
    Available,
    ComingSoon,
    Beta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyHero {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyFeature {
    pub title: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStoreLinks {
    #[serde(default)]
    pub ios: Option<String>,
    #[serde(default)]
    pub android: Option<String>,
}

/// Flat product frontmatter from before the sectioned schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyProduct {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub status: LegacyStatus,
    pub platforms: Vec<String>,
    pub primary_color: String,
    pub hero: LegacyHero,
    #[serde(default)]
    pub features: Option<Vec<LegacyFeature>>,
    #[serde(default)]
    pub screenshots: Option<Vec<String>>,
    #[serde(default)]
    pub app_store: Option<AppStoreLinks>,
}

const DEFAULT_CONVERSION_GOALS: [&str; 2] = ["app_store_click", "feature_engagement"];
const DEFAULT_KEY_METRICS: [&str; 3] = ["page_views", "app_downloads", "user_engagement"];

const fn migrate_status(status: LegacyStatus) -> ProductStatus {
    match status {
        LegacyStatus::Available => ProductStatus::Available,
        LegacyStatus::ComingSoon | LegacyStatus::Beta => ProductStatus::ComingSoon,
    }
}

/// Two boilerplate transparency signals parameterized by product name
pub fn default_trust_signals(product_name: &str) -> Vec<TrustSignal> {
    let section = product_name.to_lowercase();
    vec![
        TrustSignal {
            kind: TrustSignalKind::Transparency,
            data: TrustSignalData {
                source: Some("Open Methodology".to_string()),
                description: Some(format!("See exactly how {product_name} works")),
                link: Some(format!("/products/{section}/methodology")),
                ..TrustSignalData::default()
            },
        },
        TrustSignal {
            kind: TrustSignalKind::Transparency,
            data: TrustSignalData {
                source: Some("Privacy First".to_string()),
                description: Some("Your data stays on your device".to_string()),
                link: Some(format!("/products/{section}/privacy")),
                ..TrustSignalData::default()
            },
        },
    ]
}

/// Map a legacy product into the current schema
///
/// - `beta` becomes `coming-soon`; other statuses carry over
/// - platform names are lowercased; names outside ios/android/web are dropped
/// - hero image/video become assets, the app icon path is synthesized from the slug
/// - app store URLs become platform links, available only for `available` products
/// - content, growth goals/metrics, trust signals and SEO fields are synthesized
pub fn migrate_legacy_product(
    legacy: &LegacyProduct,
    slug: &str,
    last_updated: DateTime<Utc>,
) -> Product {
    let available = legacy.status == LegacyStatus::Available;
    let platforms: Vec<Platform> = legacy
        .platforms
        .iter()
        .filter_map(|p| Platform::from_name(&p.to_lowercase()))
        .collect();

    let app_store = legacy.app_store.clone().unwrap_or_default();
    let platform_links = [("iOS", app_store.ios), ("Android", app_store.android)]
        .into_iter()
        .filter_map(|(name, url)| {
            url.map(|url| PlatformLink {
                name: name.to_string(),
                url,
                available,
            })
        })
        .collect();

    let features = legacy
        .features
        .iter()
        .flatten()
        .map(|f| Feature {
            title: f.title.clone(),
            description: f.description.clone(),
            icon: Some(f.icon.clone()),
            image: None,
            category: None,
        })
        .collect();

    let mut keywords = vec![legacy.name.to_lowercase(), "app".to_string()];
    keywords.extend(legacy.platforms.iter().cloned());

    Product {
        metadata: ProductMetadata {
            name: legacy.name.clone(),
            slug: slug.to_string(),
            tagline: legacy.tagline.clone(),
            status: migrate_status(legacy.status),
            platforms,
            primary_color: Some(legacy.primary_color.clone()),
            launch_date: None,
            last_updated: last_updated.to_rfc3339_opts(SecondsFormat::Secs, true),
        },
        content: ProductContent {
            problem_statement: legacy.description.clone(),
            solution_approach: format!("{} is built around one idea: {}", legacy.name, legacy.tagline),
            features,
            user_scenarios: Vec::new(),
            pain_points: Vec::new(),
            benefits: Vec::new(),
            expansion_vision: String::new(),
            roadmap: None,
        },
        assets: ProductAssets {
            hero_image: legacy.hero.image.clone(),
            demo_video: legacy.hero.video.clone(),
            app_icon: format!("/images/{slug}/icon.png"),
            screenshots: legacy.screenshots.clone().unwrap_or_default(),
            feature_images: None,
        },
        links: ProductLinks {
            primary: None,
            secondary: None,
            platforms: platform_links,
            coming_soon: None,
        },
        growth: ProductGrowth {
            conversion_goals: DEFAULT_CONVERSION_GOALS.iter().map(ToString::to_string).collect(),
            key_metrics: DEFAULT_KEY_METRICS.iter().map(ToString::to_string).collect(),
            trust_signals: default_trust_signals(&legacy.name),
            seo_metadata: SeoMetadata {
                title: Some(format!("{} - {}", legacy.name, legacy.tagline)),
                description: Some(legacy.description.clone()),
                keywords: Some(keywords),
                canonical_url: None,
            },
            ab_tests: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::product::validate_product;
    use chrono::TimeZone;

    fn legacy(status: LegacyStatus) -> LegacyProduct {
        LegacyProduct {
            name: "MoneyTide".to_string(),
            tagline: "See where your money flows".to_string(),
            description: "Budgets break when life happens.".to_string(),
            status,
            platforms: vec!["iOS".to_string(), "Android".to_string(), "Watch".to_string()],
            primary_color: "#0055ff".to_string(),
            hero: LegacyHero {
                image: Some("/images/moneytide/hero.png".to_string()),
                video: Some("/videos/moneytide.mp4".to_string()),
            },
            features: Some(vec![LegacyFeature {
                title: "Flows".to_string(),
                description: "Track flows".to_string(),
                icon: "wave".to_string(),
            }]),
            screenshots: None,
            app_store: Some(AppStoreLinks {
                ios: Some("https://apps.apple.com/app/id1".to_string()),
                android: Some("https://play.google.com/store/apps/details?id=x".to_string()),
            }),
        }
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap()
    }

    #[test]
    fn test_beta_becomes_coming_soon() {
        let product = migrate_legacy_product(&legacy(LegacyStatus::Beta), "moneytide", timestamp());
        assert_eq!(product.metadata.status, ProductStatus::ComingSoon);
        assert!(product.links.platforms.iter().all(|l| !l.available));
    }

    #[test]
    fn test_available_status_marks_links_available() {
        let product =
            migrate_legacy_product(&legacy(LegacyStatus::Available), "moneytide", timestamp());
        assert_eq!(product.metadata.status, ProductStatus::Available);
        assert_eq!(product.links.platforms.len(), 2);
        assert_eq!(product.links.platforms[0].name, "iOS");
        assert_eq!(product.links.platforms[1].name, "Android");
        assert!(product.links.platforms.iter().all(|l| l.available));
    }

    #[test]
    fn test_assets_and_platforms() {
        let product =
            migrate_legacy_product(&legacy(LegacyStatus::ComingSoon), "moneytide", timestamp());
        assert_eq!(product.metadata.platforms, vec![Platform::Ios, Platform::Android]);
        assert_eq!(product.metadata.last_updated, "2025-02-03T04:05:06Z");
        assert_eq!(product.assets.app_icon, "/images/moneytide/icon.png");
        assert_eq!(
            product.assets.hero_image.as_deref(),
            Some("/images/moneytide/hero.png")
        );
        assert_eq!(product.assets.demo_video.as_deref(), Some("/videos/moneytide.mp4"));
        assert!(product.assets.screenshots.is_empty());
        assert_eq!(product.content.features[0].icon.as_deref(), Some("wave"));
    }

    #[test]
    fn test_synthesized_content_and_growth() {
        let product =
            migrate_legacy_product(&legacy(LegacyStatus::Available), "moneytide", timestamp());
        assert_eq!(
            product.content.problem_statement,
            "Budgets break when life happens."
        );
        assert!(product.content.solution_approach.contains("See where your money flows"));
        assert_eq!(product.growth.trust_signals, default_trust_signals("MoneyTide"));
        assert_eq!(
            product.growth.trust_signals[0].data.link.as_deref(),
            Some("/products/moneytide/methodology")
        );
        assert_eq!(
            product.growth.seo_metadata.title.as_deref(),
            Some("MoneyTide - See where your money flows")
        );
        assert_eq!(
            product.growth.seo_metadata.keywords,
            Some(vec![
                "moneytide".to_string(),
                "app".to_string(),
                "iOS".to_string(),
                "Android".to_string(),
                "Watch".to_string(),
            ])
        );
    }

    #[test]
    fn test_migrated_product_passes_current_validation() {
        let product =
            migrate_legacy_product(&legacy(LegacyStatus::Beta), "moneytide", timestamp());
        let value = serde_json::to_value(&product).unwrap();
        assert!(validate_product(&value));
    }

    #[test]
    fn test_migration_is_deterministic() {
        let a = migrate_legacy_product(&legacy(LegacyStatus::Beta), "moneytide", timestamp());
        let b = migrate_legacy_product(&legacy(LegacyStatus::Beta), "moneytide", timestamp());
        assert_eq!(a, b);
    }
}
