//! # page: orchestration for the page surfaces
//!
//! [`HomeSession`] wires the gateway, the update feed and the
//! reconciliation pipeline into one home-view session: initial load,
//! filter-driven reloads, feed subscription lifecycle and the render state
//! the UI needs (loading indicator, no-content state, blocking vs inline
//! errors). [`product_page`] resolves the per-product detail view by slug.
//!
//! All list mutations happen on the caller's task: feed deliveries are
//! queued and merged when the caller pumps the session, so no locking is
//! needed around the displayed list.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::contract::{ContentGateway, GatewayError, Subscription, UpdateFeed};
use crate::model::{ContentItem, Filter, Product};
use crate::reconcile::{ContentView, FeedOutcome, Phase, ReloadOutcome};

/// Loading indicator for the home view, distinguishing "first load"
/// (nothing displayed yet) from "refresh" (stale content still visible).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadIndicator {
    None,
    FirstLoad,
    Refresh,
}

/// Lightweight notification surfaced exactly when a feed item is newly
/// admitted into view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedNotice {
    pub title: String,
}

/// Everything the home view needs to render.
#[derive(Debug)]
pub struct HomeRender<'a> {
    pub items: &'a [ContentItem],
    pub categories: &'a [String],
    pub filter: &'a Filter,
    pub indicator: LoadIndicator,
    /// Initial-load failure; the whole page shows this instead of content.
    pub blocking_error: Option<&'a str>,
    /// Failed refresh; shown inline while the last good list stays visible.
    pub inline_error: Option<&'a str>,
    /// Loaded fine, but nothing matches the current filters.
    pub no_content: bool,
    /// False while degraded: filter controls are inert for the session.
    pub filters_enabled: bool,
}

/// One home-view session: owns the displayed list and the single live feed
/// subscription for the page.
pub struct HomeSession<G, F> {
    gateway: G,
    feed: F,
    view: ContentView,
    categories: Vec<String>,
    subscription: Option<Subscription>,
    feed_rx: Option<mpsc::UnboundedReceiver<ContentItem>>,
}

impl<G, F> HomeSession<G, F>
where
    G: ContentGateway,
    F: UpdateFeed,
{
    pub fn new(gateway: G, feed: F) -> Self {
        Self {
            gateway,
            feed,
            view: ContentView::new(),
            categories: Vec::new(),
            subscription: None,
            feed_rx: None,
        }
    }

    pub fn view(&self) -> &ContentView {
        &self.view
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Fetch the category list and the unfiltered content list. If either
    /// fetch fails the session becomes degraded: no inline retries, no feed
    /// subscription, until a fresh session replaces this one.
    pub async fn initial_load(&mut self) {
        self.view.begin_initial_load();

        match self.gateway.list_categories().await {
            Ok(categories) => self.categories = categories,
            Err(e) => {
                self.view.complete_initial_load(Err(e));
                return;
            }
        }
        let result = self.gateway.list_content(self.view.filter()).await;
        self.view.complete_initial_load(result);

        if self.view.phase() == Phase::Ready {
            self.subscribe_feed();
        }
    }

    /// Apply a filter change: a full resynchronisation from the gateway,
    /// never a merge. The previous subscription is torn down first and a
    /// fresh one established after, so no update is delivered against a
    /// stale filter. Inert while degraded.
    pub async fn set_filter(&mut self, filter: Filter) {
        let Some(generation) = self.view.begin_reload(filter) else {
            return;
        };
        self.teardown_feed();

        let result = self.gateway.list_content(self.view.filter()).await;
        match self.view.complete_reload(generation, result) {
            ReloadOutcome::Replaced | ReloadOutcome::Failed => self.subscribe_feed(),
            ReloadOutcome::Stale => {
                debug!(generation, "Reload superseded before completion");
            }
        }
    }

    /// Merge all queued feed deliveries into the view, returning a notice
    /// per newly admitted item (never for duplicates or filtered-out
    /// items).
    pub fn pump_feed(&mut self) -> Vec<FeedNotice> {
        let Some(rx) = self.feed_rx.as_mut() else {
            return Vec::new();
        };
        let mut notices = Vec::new();
        while let Ok(item) = rx.try_recv() {
            if let FeedOutcome::Inserted { title } = self.view.apply_feed_item(item) {
                notices.push(FeedNotice { title });
            }
        }
        notices
    }

    /// Explicit teardown of the live subscription (page teardown).
    pub fn close(&mut self) {
        self.teardown_feed();
    }

    pub fn render(&self) -> HomeRender<'_> {
        let items = self.view.items();
        let indicator = if self.view.is_loading() {
            if items.is_empty() {
                LoadIndicator::FirstLoad
            } else {
                LoadIndicator::Refresh
            }
        } else {
            LoadIndicator::None
        };
        HomeRender {
            items,
            categories: &self.categories,
            filter: self.view.filter(),
            indicator,
            blocking_error: self.view.blocking_error(),
            inline_error: self.view.inline_error(),
            no_content: self.view.phase() == Phase::Ready
                && items.is_empty()
                && self.view.inline_error().is_none(),
            filters_enabled: !self.view.is_degraded(),
        }
    }

    // One live subscription at a time; deliveries are queued and merged on
    // the caller's task via `pump_feed`.
    fn subscribe_feed(&mut self) {
        if !self.view.feed_enabled() {
            warn!("Not subscribing to the update feed: view is degraded");
            return;
        }
        self.teardown_feed();
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.feed.subscribe(Box::new(move |item| {
            // Receiver dropped means the session is gone; nothing to do.
            let _ = tx.send(item);
        }));
        self.subscription = Some(subscription);
        self.feed_rx = Some(rx);
        info!("Live update feed subscribed");
    }

    fn teardown_feed(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            debug!("Live update feed unsubscribed");
        }
        self.feed_rx = None;
    }
}

/// Outcome of resolving the per-product detail view.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductPage {
    Found(Box<Product>),
    NotFound { slug: String },
}

/// Resolve a product detail page by slug. `NotFound` is a normal outcome,
/// not an error; gateway failures propagate.
pub async fn product_page<G>(gateway: &G, slug: &str) -> Result<ProductPage, GatewayError>
where
    G: ContentGateway + ?Sized,
{
    match gateway.get_product_by_slug(slug).await? {
        Some(product) => Ok(ProductPage::Found(Box::new(product))),
        None => {
            info!(slug, "No product matches the requested slug");
            Ok(ProductPage::NotFound {
                slug: slug.to_string(),
            })
        }
    }
}
