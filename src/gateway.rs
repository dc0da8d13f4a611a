//! # gateway: HTTP client for the headless CMS
//!
//! [`SanityGateway`] implements [`ContentGateway`] against the CMS query
//! API (GROQ queries with bound `$parameters`, newest-first ordering done
//! server-side) and [`EnquiryWriter`] against the mutate API.
//!
//! Unconfigured environments are a valid non-error state: reads return
//! empty/default results and writes are simulated, so nothing here alarms
//! the user unless a configured backend actually fails.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::config::StudioConfig;
use crate::contract::{ContentGateway, EnquiryWriter, GatewayError};
use crate::model::{ContentItem, EnquiryRequest, EnquiryResult, Filter, Product, ALL_CATEGORY};

const CONTENT_ITEM_FIELDS: &str = "_id, _createdAt, title, slug, excerpt, category";
const PRODUCT_FIELDS: &str =
    "_id, _createdAt, name, slug, description, details, price, category, buyNowUrl";

/// Default categories served while no project is configured.
fn default_categories() -> Vec<String> {
    vec![
        ALL_CATEGORY.to_string(),
        "Technology".to_string(),
        "Science".to_string(),
    ]
}

#[derive(serde::Deserialize)]
struct QueryEnvelope<T> {
    result: T,
}

/// HTTP gateway to a Sanity-style content API.
#[derive(Debug, Clone)]
pub struct SanityGateway {
    config: StudioConfig,
    http: Client,
}

impl SanityGateway {
    pub fn new(config: StudioConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    fn query_url(&self) -> String {
        // The CDN host serves reads only; mutations always go to the live API.
        let host = if self.config.use_cdn {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        format!(
            "https://{}.{}/v{}/data/query/{}",
            self.config.project_id, host, self.config.api_version, self.config.dataset
        )
    }

    fn mutate_url(&self) -> String {
        format!(
            "https://{}.api.sanity.io/v{}/data/mutate/{}",
            self.config.project_id, self.config.api_version, self.config.dataset
        )
    }

    /// Run a GROQ query with bound parameters and unwrap the `result`
    /// envelope.
    async fn query<T>(
        &self,
        groq: &str,
        params: &[(&str, serde_json::Value)],
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let url = self.query_url();
        let mut pairs: Vec<(String, String)> = vec![("query".to_string(), groq.to_string())];
        for (name, value) in params {
            // Parameters are passed JSON-encoded under `$name`.
            pairs.push((format!("${name}"), value.to_string()));
        }
        debug!(url = %url, groq = %groq, "Issuing content query");

        let response = self.http.get(&url).query(&pairs).send().await.map_err(|e| {
            error!(error = ?e, url = %url, "Content API request failed");
            format!("Content API request failed: {e}")
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to decode response body>"));
            error!(status = %status, url = %url, "Content API returned error. Response body: {body}");
            return Err(format!("Content API request failed with status {status}").into());
        }
        let envelope = response.json::<QueryEnvelope<T>>().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to decode content API response");
            format!("Failed to decode content API response: {e}")
        })?;
        Ok(envelope.result)
    }
}

#[async_trait]
impl ContentGateway for SanityGateway {
    async fn list_content(&self, filter: &Filter) -> Result<Vec<ContentItem>, GatewayError> {
        if !self.config.is_configured() {
            warn!("Studio not configured; returning empty content list");
            return Ok(Vec::new());
        }

        let mut groq = String::from(r#"*[_type == "post"]"#);
        let mut params: Vec<(&str, serde_json::Value)> = Vec::new();
        if !filter.category.eq_ignore_ascii_case(ALL_CATEGORY) {
            groq.push_str("[category == $category]");
            params.push(("category", json!(filter.category)));
        }
        let term = filter.search_term.trim();
        if !term.is_empty() {
            groq.push_str(r#"[title match $term + "*" || excerpt match $term + "*"]"#);
            params.push(("term", json!(term)));
        }
        groq.push_str(&format!(
            "{{{CONTENT_ITEM_FIELDS}}} | order(_createdAt desc)"
        ));

        let items: Vec<ContentItem> = self.query(&groq, &params).await?;
        info!(
            items = items.len(),
            category = %filter.category,
            search_term = %filter.search_term,
            "Fetched content items"
        );
        Ok(items)
    }

    async fn list_categories(&self) -> Result<Vec<String>, GatewayError> {
        if !self.config.is_configured() {
            warn!("Studio not configured; returning default categories");
            return Ok(default_categories());
        }

        let groq = r#"array::unique(*[_type == "post" && defined(category)].category)"#;
        let backend: Option<Vec<String>> = self.query(groq, &[]).await?;
        let mut categories = vec![ALL_CATEGORY.to_string()];
        categories.extend(backend.unwrap_or_default());
        info!(categories = categories.len(), "Fetched categories");
        Ok(categories)
    }

    async fn get_product_by_slug(&self, slug: &str) -> Result<Option<Product>, GatewayError> {
        if !self.config.is_configured() {
            warn!(slug, "Studio not configured; no product available");
            return Ok(None);
        }

        let groq = format!(r#"*[_type == "product" && slug.current == $slug][0]{{{PRODUCT_FIELDS}}}"#);
        let product: Option<Product> = self.query(&groq, &[("slug", json!(slug))]).await?;
        info!(slug, found = product.is_some(), "Fetched product by slug");
        Ok(product)
    }
}

#[async_trait]
impl EnquiryWriter for SanityGateway {
    /// Create a `productEnquiry` document through the mutate API.
    ///
    /// Never errors: with no write token the acceptance is simulated (the
    /// message carries a tag so operators can tell), and a failed mutation
    /// returns `success = false` with a diagnostic message.
    async fn create_enquiry(&self, request: &EnquiryRequest) -> EnquiryResult {
        let Some(token) = self.config.write_token() else {
            warn!("Write client is not configured; enquiry not persisted");
            return EnquiryResult::simulated();
        };

        let payload = json!({
            "mutations": [{
                "create": {
                    "_type": "productEnquiry",
                    "productName": request.product_name,
                    "customerName": request.name,
                    "email": request.email,
                    "mobile": request.mobile,
                    "message": request.enquiry,
                    "submittedAt": Utc::now().to_rfc3339(),
                    "status": "new",
                }
            }]
        });

        let url = self.mutate_url();
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!(product = %request.product_name, "Enquiry persisted");
                EnquiryResult::accepted(
                    "Enquiry submitted successfully! We will get back to you soon.",
                )
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to decode response body>"));
                error!(status = %status, url = %url, "Enquiry mutation rejected. Response body: {body}");
                EnquiryResult::rejected(format!(
                    "Server error: Could not submit enquiry (status {status})."
                ))
            }
            Err(e) => {
                error!(error = ?e, url = %url, "Enquiry mutation request failed");
                EnquiryResult::rejected(format!("Server error: Could not submit enquiry. {e}"))
            }
        }
    }
}
