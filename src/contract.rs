//! # contract: collaborator interfaces for the browsing pipelines
//!
//! This module defines the traits the pipelines depend on, so the core
//! reconciliation and enquiry logic can be exercised against a real HTTP
//! backend, an in-process channel, or deterministic mocks in tests.
//!
//! ## Interface & Extensibility
//! - [`ContentGateway`]: read interface to the content/product backing store.
//! - [`UpdateFeed`]: push channel delivering newly created items, returning a
//!   [`Subscription`] handle that must be torn down explicitly.
//! - [`EnquiryWriter`]: write collaborator for product enquiries. It never
//!   errors: failures are encoded in the returned [`EnquiryResult`].
//!
//! ## Mocking & Testing
//! - All traits are annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests (gated behind the
//!   `test-export-mocks` feature, like the rest of the crate's test tooling).

use async_trait::async_trait;
use mockall::automock;

use crate::model::{ContentItem, EnquiryRequest, EnquiryResult, Filter, Product};

/// Boxed error for gateway operations. A descriptive message is all the
/// pipelines need; callers decide blocking vs inline presentation.
pub type GatewayError = Box<dyn std::error::Error + Send + Sync>;

/// Read interface to the content/product backing store.
///
/// Absence of configuration is a valid non-error state yielding
/// empty/default results; only a configured-but-failed collaborator
/// returns `Err`.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// List content items matching the filter, ordered newest-first.
    async fn list_content(&self, filter: &Filter) -> Result<Vec<ContentItem>, GatewayError>;

    /// List the available categories. Always includes the `"all"` sentinel,
    /// first.
    async fn list_categories(&self) -> Result<Vec<String>, GatewayError>;

    /// Fetch a single product by slug, or `None` when no product matches.
    async fn get_product_by_slug(&self, slug: &str) -> Result<Option<Product>, GatewayError>;
}

/// Callback invoked for each item delivered by an update feed.
pub type FeedHandler = Box<dyn Fn(ContentItem) + Send + Sync>;

/// Handle for an active feed subscription.
///
/// Unsubscribes when [`Subscription::unsubscribe`] is called or when the
/// handle is dropped, so replacing a stored subscription tears the old one
/// down. At most one subscription is active per displayed page.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// An inert handle, returned by feeds running outside a client context
    /// or without configuration.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Out-of-band channel delivering newly created content items after the
/// initial page load. May be a no-op returning an inert subscription.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait UpdateFeed: Send + Sync {
    /// Register a handler for new items. The feed may redeliver; consumers
    /// must merge idempotently.
    fn subscribe(&self, handler: FeedHandler) -> Subscription;
}

/// Write collaborator for product enquiries.
///
/// Never errors — real failures, simulated acceptance and genuine success
/// are all normalised into the same [`EnquiryResult`] shape so callers never
/// need to distinguish them.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait EnquiryWriter: Send + Sync {
    async fn create_enquiry(&self, request: &EnquiryRequest) -> EnquiryResult;
}
