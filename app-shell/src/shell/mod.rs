//! App shell - Routes, Types, and Context

mod context;
mod handlers;
mod types;

pub use context::*;
pub use handlers::*;
pub use types::*;

// Re-export router utilities
pub use platform_router::{
    History, MemoryHistory, NavigationContext, Route, Router, RouterConfig, RouterError,
    RouterEvent, RouterResult,
};
