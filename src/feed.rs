//! Update feed implementations.
//!
//! The library treats the feed purely as an abstract push interface
//! ([`crate::contract::UpdateFeed`]); the collaborator decides delivery
//! timing. Two implementations are provided:
//!   - [`NoopFeed`]: inert, for unconfigured or non-client contexts.
//!   - [`ChannelFeed`]: an in-process broadcast channel, used by tests and
//!     the CLI demo to publish items into live sessions.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::contract::{FeedHandler, Subscription, UpdateFeed};
use crate::model::ContentItem;

/// A feed that never delivers anything and returns an inert unsubscribe.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFeed;

impl UpdateFeed for NoopFeed {
    fn subscribe(&self, _handler: FeedHandler) -> Subscription {
        debug!("Update feed is not available; returning inert subscription");
        Subscription::inert()
    }
}

/// An in-process push channel. Every published item is delivered to each
/// active subscription; unsubscribing (or dropping the handle) stops
/// delivery by aborting the forwarding task.
#[derive(Debug, Clone)]
pub struct ChannelFeed {
    sender: broadcast::Sender<ContentItem>,
}

impl Default for ChannelFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    /// Push an item to all active subscriptions. Items published with no
    /// subscriber are dropped.
    pub fn publish(&self, item: ContentItem) {
        let receivers = self.sender.receiver_count();
        if self.sender.send(item).is_err() {
            debug!("Published feed item with no active subscription");
        } else {
            debug!(receivers, "Published feed item");
        }
    }
}

impl UpdateFeed for ChannelFeed {
    fn subscribe(&self, handler: FeedHandler) -> Subscription {
        let mut receiver = self.sender.subscribe();
        let task = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(item) => handler(item),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Feed subscription lagged; items skipped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        debug!("Feed subscription established");
        Subscription::new(move || task.abort())
    }
}
