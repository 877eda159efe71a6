//! Shell types

use chrono::{DateTime, Duration, Utc};
use platform_router::NavigationContext;
use serde::{Deserialize, Serialize};

// =============================================================================
// Session Types
// =============================================================================

/// Signed-in user session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user_name: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionInfo {
    /// Session issued now and valid for `ttl`.
    pub fn new(user_name: impl Into<String>, ttl: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            user_name: user_name.into(),
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.issued_at <= now && now < self.expires_at
    }
}

// =============================================================================
// View Types
// =============================================================================

/// A view produced by the render callback
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedView {
    /// Component tag resolved from the route's load descriptor
    pub component: String,
    pub context: NavigationContext,
    pub rendered_at: String,
}

impl RenderedView {
    pub fn new(component: impl Into<String>, context: NavigationContext) -> Self {
        Self {
            component: component.into(),
            context,
            rendered_at: Utc::now().to_rfc3339(),
        }
    }
}

// =============================================================================
// Menu Types
// =============================================================================

/// Navigation menu entry built from route metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MenuItem {
    Link {
        name: String,
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        path: String,
    },
    Group {
        title: String,
        icon: String,
        items: Vec<MenuItem>,
    },
}

impl MenuItem {
    pub fn title(&self) -> &str {
        match self {
            Self::Link { title, .. } | Self::Group { title, .. } => title,
        }
    }
}
