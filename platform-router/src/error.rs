//! Error types for routing operations
//!
//! Configuration mistakes (bad route definitions, navigating before the
//! router is wired up) and failures raised by application callbacks are both
//! reported through [`RouterError`]. Resolution misses and guard rejections
//! are *not* errors; navigation reports them as `Ok(false)`.
//!
//! # Example
//! ```rust,ignore
//! use platform_router::{RouterError, RouterErrorCode};
//!
//! let error = RouterError::new(RouterErrorCode::NoRoutes, "No routes configured");
//! let error = RouterError::duplicate_route("Route with name \"home\" already exists");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Type-safe error codes for routing operations.
///
/// When serialized, codes are converted to SCREAMING_SNAKE_CASE
/// (e.g., `NoFallbackRoute` becomes `"NO_FALLBACK_ROUTE"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouterErrorCode {
    // Configuration errors
    /// A route definition is missing its name, path or load descriptor
    InvalidRoute,
    /// A route with the same name or literal path is already registered
    DuplicateRoute,
    /// A route template matches exactly the same paths as a registered one
    PathConflict,
    /// A path or path template could not be used
    InvalidPath,
    /// Navigation was attempted with an empty route table
    NoRoutes,
    /// Navigation was attempted before a render callback was set
    NoRenderCallback,
    /// No route is flagged as default
    NoDefaultRoute,
    /// No route is flagged as fallback
    NoFallbackRoute,
    /// Fallback escalation did not settle
    FallbackLoop,
    /// Callbacks kept navigating from inside navigations
    RedirectLoop,

    // Collaborator failures
    /// A guard returned an error instead of a decision
    GuardFailed,
    /// A pre- or post-navigate hook failed
    HookFailed,
    /// The render callback failed
    RenderFailed,
    /// A route's view loader failed
    LoadFailed,

    /// An unexpected internal error occurred
    Internal,
}

impl RouterErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRoute => "INVALID_ROUTE",
            Self::DuplicateRoute => "DUPLICATE_ROUTE",
            Self::PathConflict => "PATH_CONFLICT",
            Self::InvalidPath => "INVALID_PATH",
            Self::NoRoutes => "NO_ROUTES",
            Self::NoRenderCallback => "NO_RENDER_CALLBACK",
            Self::NoDefaultRoute => "NO_DEFAULT_ROUTE",
            Self::NoFallbackRoute => "NO_FALLBACK_ROUTE",
            Self::FallbackLoop => "FALLBACK_LOOP",
            Self::RedirectLoop => "REDIRECT_LOOP",
            Self::GuardFailed => "GUARD_FAILED",
            Self::HookFailed => "HOOK_FAILED",
            Self::RenderFailed => "RENDER_FAILED",
            Self::LoadFailed => "LOAD_FAILED",
            Self::Internal => "INTERNAL",
        }
    }

    /// Returns true for programmer errors that surface at the offending call.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRoute
                | Self::DuplicateRoute
                | Self::PathConflict
                | Self::InvalidPath
                | Self::NoRoutes
                | Self::NoRenderCallback
                | Self::NoDefaultRoute
                | Self::NoFallbackRoute
                | Self::FallbackLoop
                | Self::RedirectLoop
        )
    }

    /// Returns true for failures raised by application callbacks.
    pub fn is_collaborator_error(&self) -> bool {
        matches!(
            self,
            Self::GuardFailed | Self::HookFailed | Self::RenderFailed | Self::LoadFailed
        )
    }
}

impl fmt::Display for RouterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Routing error with type-safe code and message.
///
/// # Example
/// ```rust,ignore
/// let error = RouterError::render("view crashed")
///     .with_route("view-clients")
///     .with_cause("template missing");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("[{code}] {message}")]
pub struct RouterError {
    /// Type-safe error code
    pub code: RouterErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Name of the route involved, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Optional cause for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl RouterError {
    /// Create a new error with code and message.
    pub fn new(code: RouterErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            route: None,
            cause: None,
        }
    }

    /// Attach the name of the route involved.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Add a cause string for debugging.
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Returns true when this is a configuration (programmer) error.
    pub fn is_configuration_error(&self) -> bool {
        self.code.is_configuration_error()
    }

    // Convenience constructors

    /// Create an INVALID_ROUTE error.
    pub fn invalid_route(message: impl Into<String>) -> Self {
        Self::new(RouterErrorCode::InvalidRoute, message)
    }

    /// Create a DUPLICATE_ROUTE error.
    pub fn duplicate_route(message: impl Into<String>) -> Self {
        Self::new(RouterErrorCode::DuplicateRoute, message)
    }

    /// Create a PATH_CONFLICT error.
    pub fn path_conflict(message: impl Into<String>) -> Self {
        Self::new(RouterErrorCode::PathConflict, message)
    }

    /// Create an INVALID_PATH error.
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::new(RouterErrorCode::InvalidPath, message)
    }

    /// Create a NO_ROUTES error.
    pub fn no_routes() -> Self {
        Self::new(
            RouterErrorCode::NoRoutes,
            "No routes configured, unable to navigate.",
        )
    }

    /// Create a NO_RENDER_CALLBACK error.
    pub fn no_render_callback() -> Self {
        Self::new(
            RouterErrorCode::NoRenderCallback,
            "No on_navigate() callback configured, unable to navigate.",
        )
    }

    /// Create a NO_DEFAULT_ROUTE error.
    pub fn no_default_route() -> Self {
        Self::new(
            RouterErrorCode::NoDefaultRoute,
            "No route is flagged as default, unable to navigate.",
        )
    }

    /// Create a NO_FALLBACK_ROUTE error.
    pub fn no_fallback_route() -> Self {
        Self::new(
            RouterErrorCode::NoFallbackRoute,
            "No route is flagged as fallback, unable to navigate.",
        )
    }

    /// Create a FALLBACK_LOOP error.
    pub fn fallback_loop(depth: usize) -> Self {
        Self::new(
            RouterErrorCode::FallbackLoop,
            format!("Fallback navigation did not settle after {} attempts", depth),
        )
    }

    /// Create a REDIRECT_LOOP error.
    pub fn redirect_loop(depth: usize) -> Self {
        Self::new(
            RouterErrorCode::RedirectLoop,
            format!("Nested navigation did not settle after {} redirects", depth),
        )
    }

    /// Create a GUARD_FAILED error.
    pub fn guard(message: impl Into<String>) -> Self {
        Self::new(RouterErrorCode::GuardFailed, message)
    }

    /// Create a HOOK_FAILED error.
    pub fn hook(message: impl Into<String>) -> Self {
        Self::new(RouterErrorCode::HookFailed, message)
    }

    /// Create a RENDER_FAILED error.
    pub fn render(message: impl Into<String>) -> Self {
        Self::new(RouterErrorCode::RenderFailed, message)
    }

    /// Create a LOAD_FAILED error.
    pub fn load(message: impl Into<String>) -> Self {
        Self::new(RouterErrorCode::LoadFailed, message)
    }

    /// Create an INTERNAL error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(RouterErrorCode::Internal, message)
    }
}

impl From<serde_json::Error> for RouterError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}

impl From<regex::Error> for RouterError {
    fn from(err: regex::Error) -> Self {
        Self::invalid_path("Route template could not be compiled").with_cause(err.to_string())
    }
}

/// Result type alias for routing operations.
pub type RouterResult<T> = Result<T, RouterError>;
