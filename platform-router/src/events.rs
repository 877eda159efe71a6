//! Navigation event bus
//!
//! The router announces navigation side effects on a broadcast channel so
//! that independently mounted parts of the page can react without the router
//! knowing about them:
//!
//! - `platform-navigation-replace` / `platform-navigation-update` from
//!   [`Router::update_navigation`](crate::Router::update_navigation)
//! - `platform-navigation-context-updated` after a full navigation commits
//! - one event per query key carrying the widget prefix (`platform-chat=open`
//!   is published under the name `platform-chat`)
//!
//! ## Example
//! ```rust,ignore
//! let mut events = router.subscribe();
//! router.navigate_by_path("/clients?platform-chat=open").await?;
//! while let Some(event) = events.try_recv() {
//!     println!("{}", event.name());
//! }
//! ```

use serde::Serialize;
use tokio::sync::broadcast;

use crate::query::QueryValue;
use crate::NavigationContext;

/// Event name published by `update_navigation(.., true)`.
pub const NAVIGATION_REPLACE: &str = "platform-navigation-replace";
/// Event name published by `update_navigation(.., false)`.
pub const NAVIGATION_UPDATE: &str = "platform-navigation-update";
/// Event name published when a navigation commits.
pub const CONTEXT_UPDATED: &str = "platform-navigation-context-updated";

/// Events published by the router.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RouterEvent {
    /// Route bookkeeping changed and the history entry should be replaced
    NavigationReplace {
        /// Resolved navigation
        context: NavigationContext,
    },
    /// Route bookkeeping changed and a history entry should be added
    NavigationUpdate {
        /// Resolved navigation
        context: NavigationContext,
    },
    /// A full navigation committed
    ContextUpdated {
        /// The committed navigation
        current: NavigationContext,
        /// The navigation it replaced
        previous: Option<NavigationContext>,
    },
    /// Sub-route addressed to an embedded widget
    Widget {
        /// Query key, including its prefix
        key: String,
        /// Query value
        value: QueryValue,
    },
}

impl RouterEvent {
    /// Event name as seen by subscribers.
    pub fn name(&self) -> &str {
        match self {
            Self::NavigationReplace { .. } => NAVIGATION_REPLACE,
            Self::NavigationUpdate { .. } => NAVIGATION_UPDATE,
            Self::ContextUpdated { .. } => CONTEXT_UPDATED,
            Self::Widget { key, .. } => key,
        }
    }

    /// Navigation context carried by the event, if any.
    pub fn context(&self) -> Option<&NavigationContext> {
        match self {
            Self::NavigationReplace { context } | Self::NavigationUpdate { context } => {
                Some(context)
            }
            Self::ContextUpdated { current, .. } => Some(current),
            Self::Widget { .. } => None,
        }
    }
}

/// A publisher for broadcasting events to multiple subscribers
#[derive(Debug)]
pub struct EventPublisher<T: Clone + Send + 'static> {
    sender: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> EventPublisher<T> {
    /// Create a new event publisher. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers.
    ///
    /// Returns the number of subscribers that received it. Publishing with
    /// nobody listening is not an error.
    pub fn publish(&self, event: T) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> EventSubscriber<T> {
        EventSubscriber {
            receiver: self.sender.subscribe(),
        }
    }
}

impl<T: Clone + Send + 'static> Clone for EventPublisher<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// A subscriber to an event publisher
pub struct EventSubscriber<T: Clone + Send + 'static> {
    receiver: broadcast::Receiver<T>,
}

impl<T: Clone + Send + 'static> EventSubscriber<T> {
    /// Receive the next event, waiting if none is buffered.
    ///
    /// Returns `None` once the publisher is gone.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(_)) => continue, // Skip lagged messages
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Receive a buffered event without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }

    /// Take every buffered event.
    pub fn drain(&mut self) -> Vec<T> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
