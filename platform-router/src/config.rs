//! Configuration module for the router.
//!
//! This module provides the [`RouterConfig`] struct for customizing router behavior.
//!
//! # Example
//! ```rust,ignore
//! use platform_router::{RouterConfig, NavigationPolicy};
//!
//! let config = RouterConfig::new()
//!     .with_navigation_policy(NavigationPolicy::Supersede)
//!     .with_path_conflict_detection(true);
//! ```

use serde::{Deserialize, Serialize};

use crate::{RouterError, RouterResult};

/// How overlapping calls to `navigate_by_path` are ordered.
///
/// Navigations never interleave: each one holds the navigation lock from
/// resolution until its post-navigate hook returns. The policy decides what
/// happens to calls that queued up behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPolicy {
    /// Every queued navigation runs, strictly in call order.
    #[default]
    Queue,
    /// Only the newest navigation commits. Older queued calls return `false`
    /// once they notice a newer request, either when they acquire the lock or
    /// when their guard settles.
    Supersede,
}

/// Router configuration.
///
/// All fields have defaults that reproduce the classic single-page router
/// behavior. Use [`RouterConfig::default()`] to get the default configuration.
///
/// # Fields
///
/// * `widget_event_prefix` - Query keys starting with this prefix are
///   re-published as widget events. Default: `"platform-"`.
///
/// * `event_capacity` - Buffer size of the broadcast event bus. Default: 256.
///
/// * `navigation_policy` - Ordering of overlapping navigations. Default: `Queue`.
///
/// * `detect_path_conflicts` - Reject templates that match exactly the same
///   paths as an already registered template (`/items/:id` vs `/items/:slug`).
///   Default: false, only literal duplicates are rejected.
///
/// * `resolve_cache_size` - Number of resolved paths to memoize. 0 disables
///   the cache. Default: 64.
///
/// * `sync_history` - Push/replace history entries after navigation. Default: true.
///
/// * `debug_logging` - Log every lifecycle step at debug level. Default: false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Prefix marking query keys addressed to embedded widgets (default: "platform-")
    pub widget_event_prefix: String,
    /// Event bus capacity (default: 256)
    pub event_capacity: usize,
    /// Ordering of overlapping navigations (default: Queue)
    pub navigation_policy: NavigationPolicy,
    /// Reject semantically equivalent templates (default: false)
    pub detect_path_conflicts: bool,
    /// Resolution cache size, 0 to disable (default: 64)
    pub resolve_cache_size: usize,
    /// Write history entries after navigation (default: true)
    pub sync_history: bool,
    /// Enable lifecycle debug logging (default: false)
    pub debug_logging: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            widget_event_prefix: "platform-".to_string(),
            event_capacity: 256,
            navigation_policy: NavigationPolicy::default(),
            detect_path_conflicts: false,
            resolve_cache_size: 64,
            sync_history: true,
            debug_logging: false,
        }
    }
}

impl RouterConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields keep their defaults.
    ///
    /// # Example
    /// ```rust,ignore
    /// let config = RouterConfig::from_json(r#"{"navigation_policy": "supersede"}"#)?;
    /// ```
    pub fn from_json(json: &str) -> RouterResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can be used to build a router.
    pub fn validate(&self) -> RouterResult<()> {
        if self.widget_event_prefix.is_empty() {
            return Err(RouterError::internal(
                "widget_event_prefix must not be empty",
            ));
        }
        if self.event_capacity == 0 {
            return Err(RouterError::internal("event_capacity must be at least 1"));
        }
        Ok(())
    }

    /// Set the widget event prefix.
    pub fn with_widget_event_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.widget_event_prefix = prefix.into();
        self
    }

    /// Set the event bus capacity.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Set the navigation policy.
    ///
    /// # Example
    /// ```rust,ignore
    /// let config = RouterConfig::new().with_navigation_policy(NavigationPolicy::Supersede);
    /// ```
    pub fn with_navigation_policy(mut self, policy: NavigationPolicy) -> Self {
        self.navigation_policy = policy;
        self
    }

    /// Enable or disable semantic path conflict detection.
    pub fn with_path_conflict_detection(mut self, enabled: bool) -> Self {
        self.detect_path_conflicts = enabled;
        self
    }

    /// Set the resolution cache size.
    pub fn with_resolve_cache_size(mut self, size: usize) -> Self {
        self.resolve_cache_size = size;
        self
    }

    /// Enable or disable history synchronization.
    pub fn with_history_sync(mut self, enabled: bool) -> Self {
        self.sync_history = enabled;
        self
    }

    /// Enable or disable debug logging.
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }
}
