//! Domain data model shared by the fetch, reconciliation and enquiry pipelines.
//!
//! Field names follow the CMS wire format (`_id`, `_createdAt`, `slug.current`)
//! via serde renames, so gateway responses deserialize directly into these
//! types without a mapping layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel category meaning "no category filter".
///
/// The gateway always includes it as the first entry of the category list.
pub const ALL_CATEGORY: &str = "all";

/// A CMS slug object, e.g. `{ "current": "my-product" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    pub current: String,
}

impl Slug {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
        }
    }
}

/// A single displayable content item.
///
/// Invariant: `id` is unique within any displayed collection; the
/// reconciliation pipeline enforces this on feed merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdAt")]
    pub created_at: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub slug: Option<Slug>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// A product shown on the detail page, addressed by slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdAt")]
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub slug: Slug,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "buyNowUrl")]
    pub buy_now_url: Option<String>,
}

/// The current view filter. Not persisted; lives only as UI state.
///
/// Any change triggers a full reload from the gateway, which is the source
/// of truth for filtered views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub category: String,
    pub search_term: String,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORY.to_string(),
            search_term: String::new(),
        }
    }
}

impl Filter {
    pub fn new(category: impl Into<String>, search_term: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            search_term: search_term.into(),
        }
    }

    /// True when neither a category nor a search term narrows the view.
    pub fn is_unfiltered(&self) -> bool {
        self.category.eq_ignore_ascii_case(ALL_CATEGORY) && self.search_term.trim().is_empty()
    }
}

/// User-entered enquiry payload, validated before any network interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnquiryRequest {
    pub product_name: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub enquiry: String,
}

impl EnquiryRequest {
    /// Default form state: the product name re-seeded, all other fields
    /// emptied. Callers reset to this after a successful submission.
    pub fn seeded(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            name: String::new(),
            email: String::new(),
            mobile: String::new(),
            enquiry: String::new(),
        }
    }
}

/// Normalised submission outcome. Never partial: either fully accepted or
/// fully rejected, with a human-readable message either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnquiryResult {
    pub success: bool,
    pub message: String,
}

impl EnquiryResult {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Simulated acceptance, used when the write path is unconfigured. The
    /// message is tagged so operators can tell simulated from real writes.
    pub fn simulated() -> Self {
        Self::accepted(
            "Enquiry (simulated) submitted! Real submission requires SANITY_API_TOKEN.",
        )
    }

    /// True when the message carries the simulated-write tag.
    pub fn is_simulated(&self) -> bool {
        self.message.contains("(simulated)")
    }
}
