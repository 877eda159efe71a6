//! Platform Router
//!
//! Client-side path router: route registration, `:param` pattern matching,
//! guarded navigation with pre/post hooks, default and fallback resolution,
//! history synchronization and widget sub-route events.
//!
//! The router never renders anything itself. Application code registers
//! routes, sets a render callback with [`Router::set_on_navigate`], and
//! drives navigation with [`Router::navigate_by_path`].

pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod handler;
pub mod history;
pub mod matcher;
pub mod query;
pub mod route;
pub mod router;
pub mod table;

#[cfg(test)]
mod tests;

pub use config::{NavigationPolicy, RouterConfig};
pub use context::{NavigationContext, NavigationState};
pub use error::{RouterError, RouterErrorCode, RouterResult};
pub use events::{EventPublisher, EventSubscriber, RouterEvent};
pub use handler::{Guard, Hook, Loader};
pub use history::{History, MemoryHistory};
pub use matcher::{PathParams, PathPattern};
pub use query::{QueryParams, QueryValue};
pub use route::{Route, RouteLoad};
pub use router::{MAX_FALLBACK_DEPTH, MAX_REDIRECT_DEPTH, Router};
pub use table::RouteTable;

/// Common imports for application code.
pub mod prelude {
    pub use crate::{
        History, MemoryHistory, NavigationContext, Route, Router, RouterConfig, RouterError,
        RouterEvent, RouterResult,
    };
}
