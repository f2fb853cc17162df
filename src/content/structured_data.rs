//! JSON-LD structured data for pages

use serde::Serialize;

use super::blog::BlogPost;
use super::product::{Platform, Product};
use crate::config::SiteConfig;

const SCHEMA_CONTEXT: &str = "https://schema.org";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub url: String,
    pub description: String,
    pub logo: String,
    pub founding_date: String,
    pub same_as: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offer {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub price: &'static str,
    #[serde(rename = "priceCurrency")]
    pub price_currency: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareApplicationSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub application_category: &'static str,
    pub operating_system: Vec<&'static str>,
    pub description: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    pub offers: Offer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedEntity {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<ImageObject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub headline: String,
    pub description: String,
    pub author: NamedEntity,
    pub publisher: NamedEntity,
    pub date_published: String,
    pub date_modified: String,
    pub main_entity_of_page: String,
}

fn base_url(site: &SiteConfig) -> &str {
    site.base_url.trim_end_matches('/')
}

pub fn organization_schema(site: &SiteConfig) -> OrganizationSchema {
    OrganizationSchema {
        context: SCHEMA_CONTEXT,
        kind: "Organization",
        name: site.name.clone(),
        url: base_url(site).to_string(),
        description: site.description.clone(),
        logo: site.logo.clone(),
        founding_date: site.founding_date.clone(),
        same_as: site.same_as.clone(),
    }
}

const fn operating_system(platform: Platform) -> &'static str {
    match platform {
        Platform::Ios => "iOS",
        Platform::Android => "Android",
        Platform::Web => "Web Browser",
    }
}

fn application_category(product_name: &str) -> &'static str {
    match product_name.to_lowercase().as_str() {
        "choicecheck" => "HealthApplication",
        "moneytide" => "FinanceApplication",
        _ => "ProductivityApplication",
    }
}

/// `SoftwareApplication` schema for a product page
pub fn product_schema(product: &Product, site: &SiteConfig) -> SoftwareApplicationSchema {
    SoftwareApplicationSchema {
        context: SCHEMA_CONTEXT,
        kind: "SoftwareApplication",
        name: product.metadata.name.clone(),
        application_category: application_category(&product.metadata.name),
        operating_system: product
            .metadata
            .platforms
            .iter()
            .copied()
            .map(operating_system)
            .collect(),
        description: product.content.problem_statement.clone(),
        url: format!("{}/products/{}", base_url(site), product.metadata.slug),
        download_url: product
            .links
            .platforms
            .iter()
            .find(|link| link.available)
            .map(|link| link.url.clone()),
        offers: Offer {
            kind: "Offer",
            price: "0",
            price_currency: "USD",
        },
    }
}

/// `Article` schema for a blog post page
pub fn article_schema(post: &BlogPost, site: &SiteConfig) -> ArticleSchema {
    let metadata = &post.metadata;
    ArticleSchema {
        context: SCHEMA_CONTEXT,
        kind: "Article",
        headline: metadata.title.clone(),
        description: metadata.description.clone(),
        author: NamedEntity {
            kind: "Organization",
            name: site.name.clone(),
            logo: None,
        },
        publisher: NamedEntity {
            kind: "Organization",
            name: site.name.clone(),
            logo: Some(ImageObject {
                kind: "ImageObject",
                url: site.logo.clone(),
            }),
        },
        date_published: metadata.publish_date.clone(),
        date_modified: metadata
            .updated_date
            .clone()
            .unwrap_or_else(|| metadata.publish_date.clone()),
        main_entity_of_page: format!("{}/blog/{}", base_url(site), post.slug),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::blog::validate_blog_post_metadata;
    use crate::content::product::tests::current_product_json;
    use serde_json::json;

    fn product() -> Product {
        serde_json::from_value(current_product_json()).unwrap()
    }

    #[test]
    fn test_organization_schema() {
        let value = serde_json::to_value(organization_schema(&SiteConfig::default())).unwrap();
        assert_eq!(value["@context"], "https://schema.org");
        assert_eq!(value["@type"], "Organization");
        assert_eq!(value["name"], "VastSilicon");
        assert_eq!(value["foundingDate"], "2024");
        assert_eq!(value["sameAs"], json!([]));
    }

    #[test]
    fn test_product_schema() {
        let schema = product_schema(&product(), &SiteConfig::default());
        assert_eq!(schema.application_category, "FinanceApplication");
        assert_eq!(schema.operating_system, ["iOS", "Web Browser"]);
        assert_eq!(schema.url, "https://vastsilicon.com/products/moneytide");
        assert_eq!(
            schema.download_url.as_deref(),
            Some("https://apps.apple.com/app/1")
        );

        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["offers"]["priceCurrency"], "USD");
        assert_eq!(value["applicationCategory"], "FinanceApplication");
    }

    #[test]
    fn test_product_schema_without_available_link() {
        let mut product = product();
        product.metadata.name = "Atlas".to_string();
        product.links.platforms[0].available = false;
        let schema = product_schema(&product, &SiteConfig::default());
        assert_eq!(schema.application_category, "ProductivityApplication");
        assert!(schema.download_url.is_none());
        let value = serde_json::to_value(&schema).unwrap();
        assert!(value.get("downloadUrl").is_none());
    }

    #[test]
    fn test_article_schema() {
        let data = json!({
            "title": "Why budgets fail",
            "description": "On tides",
            "publishDate": "2025-03-01",
            "author": "VastSilicon",
            "category": "insights",
            "tags": []
        });
        let post = BlogPost {
            slug: "insights/why-budgets-fail".to_string(),
            metadata: validate_blog_post_metadata(&data, "").unwrap(),
            excerpt: String::new(),
            body: String::new(),
        };
        let value = serde_json::to_value(article_schema(&post, &SiteConfig::default())).unwrap();
        assert_eq!(value["headline"], "Why budgets fail");
        assert_eq!(value["dateModified"], "2025-03-01");
        assert_eq!(value["publisher"]["logo"]["@type"], "ImageObject");
        assert!(value["author"].get("logo").is_none());
        assert_eq!(
            value["mainEntityOfPage"],
            "https://vastsilicon.com/blog/insights/why-budgets-fail"
        );
    }
}
