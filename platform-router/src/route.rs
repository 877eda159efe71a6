//! Route definitions

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

use crate::handler::{
    BoxedGuard, BoxedHook, BoxedLoader, Guard, Hook, Loader, into_boxed_guard, into_boxed_hook,
    into_boxed_loader,
};
use crate::{RouterError, RouterResult};

/// How a route's view is produced.
#[derive(Clone)]
pub enum RouteLoad {
    /// A component tag known up front, e.g. `"client-list-view"`.
    Component(String),
    /// An async loader resolving the component tag on demand.
    Lazy(BoxedLoader),
}

impl fmt::Debug for RouteLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component(tag) => f.debug_tuple("Component").field(tag).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// A named, path-templated navigation target.
///
/// # Example
/// ```rust,ignore
/// let route = Route::new("item", "/items/:id")
///     .component("item-view")
///     .title("Item")
///     .guard(|ctx: NavigationContext| async move { Ok(ctx.path_param("id") != Some("0")) });
/// ```
#[derive(Clone)]
pub struct Route {
    /// Unique route name
    pub name: String,
    /// Path template, e.g. `/books/:id`
    pub path: String,
    /// Menu title
    pub title: Option<String>,
    /// Menu icon
    pub icon: Option<String>,
    /// View descriptor, required at registration
    pub load: Option<RouteLoad>,
    /// Serves the root path `/`
    pub is_default: bool,
    /// Target when nothing else matches
    pub is_fallback: bool,
    /// Consulted before the navigation commits
    pub guard: Option<BoxedGuard>,
    /// Runs after commit, before the render callback
    pub on_pre_navigate: Option<BoxedHook>,
    /// Runs after the render callback
    pub on_post_navigate: Option<BoxedHook>,
}

impl Route {
    /// Create a route with a name and path template and nothing else.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            title: None,
            icon: None,
            load: None,
            is_default: false,
            is_fallback: false,
            guard: None,
            on_pre_navigate: None,
            on_post_navigate: None,
        }
    }

    /// Render a fixed component tag.
    pub fn component(mut self, tag: impl Into<String>) -> Self {
        self.load = Some(RouteLoad::Component(tag.into()));
        self
    }

    /// Resolve the component tag lazily.
    pub fn lazy<L: Loader>(mut self, loader: L) -> Self {
        self.load = Some(RouteLoad::Lazy(into_boxed_loader(loader)));
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Flag this route as the default (root) route.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Flag this route as the fallback route.
    pub fn as_fallback(mut self) -> Self {
        self.is_fallback = true;
        self
    }

    pub fn guard<G: Guard>(mut self, guard: G) -> Self {
        self.guard = Some(into_boxed_guard(guard));
        self
    }

    pub fn on_pre_navigate<H: Hook>(mut self, hook: H) -> Self {
        self.on_pre_navigate = Some(into_boxed_hook(hook));
        self
    }

    pub fn on_post_navigate<H: Hook>(mut self, hook: H) -> Self {
        self.on_post_navigate = Some(into_boxed_hook(hook));
        self
    }

    pub fn has_guard(&self) -> bool {
        self.guard.is_some()
    }

    /// Resolve the component tag for this route's view.
    pub async fn load_view(&self) -> RouterResult<String> {
        match &self.load {
            Some(RouteLoad::Component(tag)) => Ok(tag.clone()),
            Some(RouteLoad::Lazy(loader)) => loader()
                .await
                .map_err(|e| e.with_route(self.name.clone())),
            None => Err(RouterError::load("No route load() provided").with_route(self.name.clone())),
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("title", &self.title)
            .field("load", &self.load)
            .field("is_default", &self.is_default)
            .field("is_fallback", &self.is_fallback)
            .field("guard", &self.guard.is_some())
            .finish_non_exhaustive()
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Route", 6)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("path", &self.path)?;
        s.serialize_field("title", &self.title)?;
        s.serialize_field("icon", &self.icon)?;
        s.serialize_field("isDefault", &self.is_default)?;
        s.serialize_field("isFallback", &self.is_fallback)?;
        s.end()
    }
}
