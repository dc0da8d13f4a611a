//! # reconcile: the live content reconciliation pipeline
//!
//! Owns the single source of truth for "what content items are currently
//! displayed", merging three independent triggers into one consistent,
//! deduplicated, correctly ordered view:
//!   - the initial load (categories + unfiltered content),
//!   - filter-driven reloads (full replacement from the gateway),
//!   - live feed arrivals (in-memory merge, never a refetch).
//!
//! # State machine
//! `Uninitialized → LoadingInitial → {Ready, Degraded}`. From `Ready`:
//! `Refreshing → Ready | Ready-with-inline-error` (the last good list is
//! preserved on a failed refresh). `Degraded` is terminal for the session:
//! no further automatic transitions, and the live feed is never subscribed
//! while degraded.
//!
//! # Invariants
//! - The displayed list is sorted by `_createdAt` descending after any
//!   merge or reload; ties keep their prior relative order (stable sort).
//! - Item ids are unique within the displayed list; feed redeliveries are
//!   dropped idempotently.
//! - Reloads are generation-tagged: a completion whose generation is no
//!   longer current is discarded, so out-of-order completions of
//!   overlapping reloads can never revert the view, and a completed
//!   reload's replacement wins over interleaved feed insertions.
//!
//! This module is pure logic with no I/O, so the whole pipeline is testable
//! without a live network dependency.

use tracing::{debug, info, warn};

use crate::contract::GatewayError;
use crate::model::{ContentItem, Filter, ALL_CATEGORY};

/// Lifecycle phase of the displayed view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    /// First load, nothing displayed yet.
    LoadingInitial,
    Ready,
    /// A filtered reload is in flight; stale content stays visible.
    Refreshing,
    /// Terminal for this session: the collaborator was unreachable at
    /// startup, so further automatic refetching and feed subscription are
    /// suspended until the page is reloaded.
    Degraded,
}

/// What happened to a feed-delivered item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    /// Newly admitted into view. Surface a notification for exactly these.
    Inserted { title: String },
    /// An item with the same id is already displayed; the redelivery was
    /// dropped.
    Duplicate,
    /// The item does not match the active filter. It stays known to the
    /// backing store and may appear after a later full reload.
    FilteredOut,
    /// The view is degraded; feed deliveries are ignored.
    Suspended,
}

/// What happened to a completed reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The displayed list was replaced outright with the gateway's result.
    Replaced,
    /// The reload failed; the last good list is preserved and an inline
    /// error is surfaced.
    Failed,
    /// The result belonged to a superseded request and was discarded.
    Stale,
}

/// True when the item matches the filter: category equality
/// (case-insensitive, with the `"all"` sentinel matching everything) and
/// the search term as a case-insensitive substring of title or excerpt.
pub fn matches_filter(item: &ContentItem, filter: &Filter) -> bool {
    let category_ok = filter.category.eq_ignore_ascii_case(ALL_CATEGORY)
        || item
            .category
            .as_deref()
            .map_or(false, |c| c.eq_ignore_ascii_case(&filter.category));
    if !category_ok {
        return false;
    }
    let term = filter.search_term.trim();
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    item.title.to_lowercase().contains(&needle)
        || item
            .excerpt
            .as_deref()
            .map_or(false, |e| e.to_lowercase().contains(&needle))
}

/// In-memory state of the displayed content list.
#[derive(Debug)]
pub struct ContentView {
    phase: Phase,
    filter: Filter,
    items: Vec<ContentItem>,
    generation: u64,
    inline_error: Option<String>,
    blocking_error: Option<String>,
}

impl Default for ContentView {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentView {
    pub fn new() -> Self {
        Self {
            phase: Phase::Uninitialized,
            filter: Filter::default(),
            items: Vec::new(),
            generation: 0,
            inline_error: None,
            blocking_error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn inline_error(&self) -> Option<&str> {
        self.inline_error.as_deref()
    }

    pub fn blocking_error(&self) -> Option<&str> {
        self.blocking_error.as_deref()
    }

    pub fn is_degraded(&self) -> bool {
        self.phase == Phase::Degraded
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::LoadingInitial | Phase::Refreshing)
    }

    /// Whether the live feed may be (or stay) subscribed. Never true while
    /// degraded.
    pub fn feed_enabled(&self) -> bool {
        !self.is_degraded()
    }

    /// Enter the first load. Nothing is displayed yet.
    pub fn begin_initial_load(&mut self) {
        debug_assert_eq!(self.phase, Phase::Uninitialized);
        self.phase = Phase::LoadingInitial;
        debug!("Initial load started");
    }

    /// Complete the first load. A failure makes the session degraded:
    /// an unreachable collaborator at startup makes any incremental fetch
    /// equally likely to fail, so one clear terminal error state is
    /// surfaced instead of retrying silently.
    pub fn complete_initial_load(&mut self, result: Result<Vec<ContentItem>, GatewayError>) {
        match result {
            Ok(items) => {
                self.items = items;
                self.sort_items();
                self.phase = Phase::Ready;
                info!(items = self.items.len(), "Initial load complete");
            }
            Err(e) => {
                warn!(error = %e, "Initial load failed; entering degraded state");
                self.blocking_error = Some(format!(
                    "{e} Please check your studio configuration (project id, dataset, CORS) and network connection."
                ));
                self.phase = Phase::Degraded;
            }
        }
    }

    /// Start a filter-driven reload, returning the generation tag the
    /// eventual completion must carry. Returns `None` while degraded —
    /// filter changes are inert for the rest of the session.
    pub fn begin_reload(&mut self, filter: Filter) -> Option<u64> {
        if self.is_degraded() {
            warn!("Ignoring filter change: view is degraded");
            return None;
        }
        self.generation += 1;
        self.filter = filter;
        self.inline_error = None;
        self.phase = Phase::Refreshing;
        debug!(
            generation = self.generation,
            category = %self.filter.category,
            search_term = %self.filter.search_term,
            "Reload started"
        );
        Some(self.generation)
    }

    /// Apply a completed reload. The gateway is the source of truth for
    /// filtered views, so a successful result replaces the displayed list
    /// outright — including any feed-driven insertions that interleaved
    /// while the reload was in flight. A result whose generation is no
    /// longer current is discarded.
    pub fn complete_reload(
        &mut self,
        generation: u64,
        result: Result<Vec<ContentItem>, GatewayError>,
    ) -> ReloadOutcome {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "Discarding superseded reload result"
            );
            return ReloadOutcome::Stale;
        }
        match result {
            Ok(items) => {
                self.items = items;
                self.sort_items();
                self.inline_error = None;
                self.phase = Phase::Ready;
                info!(items = self.items.len(), "Reload complete");
                ReloadOutcome::Replaced
            }
            Err(e) => {
                // Preserve the last good list; this is a refresh, not the
                // initial load.
                warn!(error = %e, "Reload failed; keeping previously displayed items");
                self.inline_error = Some(e.to_string());
                self.phase = Phase::Ready;
                ReloadOutcome::Failed
            }
        }
    }

    /// Merge a feed-delivered item into the view. Applies only to the
    /// in-memory list, never by re-fetching.
    pub fn apply_feed_item(&mut self, item: ContentItem) -> FeedOutcome {
        if self.is_degraded() {
            debug!(id = %item.id, "Feed item ignored: view is degraded");
            return FeedOutcome::Suspended;
        }
        if self.items.iter().any(|existing| existing.id == item.id) {
            debug!(id = %item.id, "Feed item ignored: already displayed");
            return FeedOutcome::Duplicate;
        }
        if !matches_filter(&item, &self.filter) {
            debug!(id = %item.id, "Feed item does not match the active filter");
            return FeedOutcome::FilteredOut;
        }
        info!(id = %item.id, title = %item.title, "New content item admitted into view");
        let title = item.title.clone();
        self.items.insert(0, item);
        self.sort_items();
        FeedOutcome::Inserted { title }
    }

    // Descending `_createdAt`; stable, so equal timestamps keep their
    // prior relative order.
    fn sort_items(&mut self) {
        self.items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
}
