//! Navigation orchestration
//!
//! A navigation moves through resolve → guard → pre-navigate → render →
//! post-navigate. Resolution misses and guard rejections are expected
//! outcomes and never surface as errors: a miss escalates to the fallback
//! route, a rejection either escalates to the fallback route (nothing shown
//! yet) or steps history forward.
//!
//! Navigations are serialized. A guard, hook or render callback may itself
//! navigate (a redirect): the nested navigation runs in place on the task
//! that holds the navigation lock, and the outer navigation stops at the
//! first step after which the nested one committed.
//!
//! # Example
//! ```rust,ignore
//! let router = Arc::new(Router::new());
//! router.add_route(Route::new("home", "/").component("home-view").as_default())?;
//! router.add_route(Route::new("item", "/items/:id").component("item-view"))?;
//! router.add_route(Route::new("nf", "/missing").component("not-found").as_fallback())?;
//! router.set_on_navigate(|ctx: NavigationContext| async move {
//!     println!("render {}", ctx.route.name);
//!     Ok(())
//! });
//!
//! assert!(router.navigate_by_path("/items/42?tab=info").await?);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::BoxFuture;
use tracing::{debug, error, warn};

use crate::config::{NavigationPolicy, RouterConfig};
use crate::events::{EventPublisher, EventSubscriber, RouterEvent};
use crate::handler::{BoxedHook, Guard, Hook, into_boxed_guard, into_boxed_hook};
use crate::history::{History, MemoryHistory};
use crate::query;
use crate::table::RouteTable;
use crate::{NavigationContext, NavigationState, Route, RouterError, RouterResult};

/// Maximum fallback escalations within one navigation.
pub const MAX_FALLBACK_DEPTH: usize = 5;

/// Maximum navigations nested inside callbacks of a running navigation.
pub const MAX_REDIRECT_DEPTH: usize = 8;

tokio::task_local! {
    // Redirect depth of the navigation running on this task.
    static REDIRECT_DEPTH: usize;
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Client-side path router.
///
/// Construct one per application and share it as `Arc<Router>`.
pub struct Router {
    config: RouterConfig,
    table: RwLock<RouteTable>,
    state: RwLock<NavigationState>,
    on_navigate: RwLock<Option<BoxedHook>>,
    history: Arc<dyn History>,
    events: EventPublisher<RouterEvent>,
    navigation_lock: tokio::sync::Mutex<()>,
    generation: AtomicU64,
    // bumped by every navigation commit, never by update_navigation
    commits: AtomicU64,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a router with the default configuration and an in-memory
    /// history positioned at `/`.
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Create a router with a custom configuration.
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            table: RwLock::new(RouteTable::new(
                config.detect_path_conflicts,
                config.resolve_cache_size,
            )),
            state: RwLock::new(NavigationState::default()),
            on_navigate: RwLock::new(None),
            history: Arc::new(MemoryHistory::default()),
            events: EventPublisher::new(config.event_capacity),
            navigation_lock: tokio::sync::Mutex::new(()),
            generation: AtomicU64::new(0),
            commits: AtomicU64::new(0),
            config,
        }
    }

    /// Use the given session history instead of the in-memory default.
    pub fn with_history(mut self, history: Arc<dyn History>) -> Self {
        self.history = history;
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn history(&self) -> &Arc<dyn History> {
        &self.history
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Register a route. Returns a snapshot of the stored route.
    pub fn add_route(&self, route: Route) -> RouterResult<Route> {
        let route = write(&self.table).insert(route)?;
        debug!(route = %route.name, path = %route.path, "route registered");
        Ok(route)
    }

    /// Make `name` the only default route. Returns false if no such route.
    pub fn set_default(&self, name: &str) -> bool {
        write(&self.table).set_default(name)
    }

    /// Make `name` the only fallback route. Returns false if no such route.
    pub fn set_fallback(&self, name: &str) -> bool {
        write(&self.table).set_fallback(name)
    }

    /// Replace the guard of a registered route. Returns false if no such route.
    pub fn set_guard<G: Guard>(&self, name: &str, guard: G) -> bool {
        match write(&self.table).get_mut(name) {
            Some(route) => {
                route.guard = Some(into_boxed_guard(guard));
                true
            }
            None => false,
        }
    }

    /// Set the render callback invoked for every committed navigation.
    pub fn set_on_navigate<H: Hook>(&self, hook: H) {
        *write(&self.on_navigate) = Some(into_boxed_hook(hook));
    }

    /// Detached copy of the registered routes, in registration order.
    pub fn routes(&self) -> Vec<Route> {
        read(&self.table).snapshot()
    }

    pub fn route(&self, name: &str) -> Option<Route> {
        read(&self.table).get(name).cloned()
    }

    pub fn default_route(&self) -> Option<Route> {
        read(&self.table).default_route().cloned()
    }

    pub fn fallback_route(&self) -> Option<Route> {
        read(&self.table).fallback_route().cloned()
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    /// Route of the last committed navigation.
    pub fn current_route(&self) -> Option<Route> {
        read(&self.state).current_route().cloned()
    }

    /// Last committed navigation.
    pub fn current(&self) -> Option<NavigationContext> {
        read(&self.state).current.clone()
    }

    /// Navigation committed before the current one.
    pub fn previous(&self) -> Option<NavigationContext> {
        read(&self.state).previous.clone()
    }

    pub fn navigation_state(&self) -> NavigationState {
        read(&self.state).clone()
    }

    /// Subscribe to navigation events.
    pub fn subscribe(&self) -> EventSubscriber<RouterEvent> {
        self.events.subscribe()
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Navigate to `path_and_query`, e.g. `/books/1234?foo=bar`.
    ///
    /// Returns `Ok(true)` when a route was resolved and rendered, `Ok(false)`
    /// when its guard rejected the navigation, a newer navigation superseded
    /// it, or its guard, pre-navigate hook or render callback navigated
    /// elsewhere. Configuration errors and errors raised by callbacks are
    /// returned as `Err`.
    ///
    /// Callbacks of a running navigation may call this again. The nested
    /// navigation runs in place; redirects deeper than
    /// [`MAX_REDIRECT_DEPTH`] fail with `RedirectLoop`.
    pub async fn navigate_by_path(&self, path_and_query: &str) -> RouterResult<bool> {
        if let Ok(depth) = REDIRECT_DEPTH.try_with(|depth| *depth) {
            return self.redirect(path_and_query, depth + 1).await;
        }

        let ticket = self.next_ticket();
        let _lock = self.navigation_lock.lock().await;

        if self.is_superseded(ticket) {
            debug!(path = %path_and_query, "navigation superseded before it started");
            return Ok(false);
        }

        let result = REDIRECT_DEPTH
            .scope(0, self.navigate_locked(path_and_query.to_string(), ticket, 0))
            .await;
        if let Err(err) = &result {
            error!(path = %path_and_query, code = %err.code, error = %err, "navigation failed");
        }
        result
    }

    /// Navigate to the route flagged as default.
    pub async fn navigate_to_default_path(&self) -> RouterResult<bool> {
        let path = self.flagged_path(|t| t.default_route(), RouterError::no_default_route)?;
        self.navigate_by_path(&path).await
    }

    /// Navigate to the route flagged as fallback.
    pub async fn navigate_to_fallback_path(&self) -> RouterResult<bool> {
        let path = self.flagged_path(|t| t.fallback_route(), RouterError::no_fallback_route)?;
        self.navigate_by_path(&path).await
    }

    /// Navigate to the history's current location, or to the default route
    /// when the location is empty. Call once at application start.
    pub async fn start(&self) -> RouterResult<bool> {
        let location = self.history.location();
        if location.is_empty() {
            self.navigate_to_default_path().await
        } else {
            self.navigate_by_path(&location).await
        }
    }

    /// Re-navigate after the host moved back or forward in history.
    pub async fn handle_pop_state(&self) -> RouterResult<bool> {
        let location = self.history.location();
        self.navigate_by_path(&location).await
    }

    /// Update the current route without running guard, hooks or render.
    ///
    /// Publishes `platform-navigation-replace` when `is_replace` is true and
    /// `platform-navigation-update` otherwise, followed by widget events.
    /// Returns `Ok(false)` when no route matches.
    pub fn update_navigation(&self, path_and_query: &str, is_replace: bool) -> RouterResult<bool> {
        self.next_ticket();
        self.validate(path_and_query)
            .inspect_err(|err| error!(path = %path_and_query, error = %err, "navigation update failed"))?;

        let Some(context) = self.resolve(path_and_query) else {
            warn!(path = %path_and_query, "Unable to update navigation: route not found");
            return Ok(false);
        };

        write(&self.state).update(context.clone());

        if self.config.sync_history {
            if is_replace {
                self.history.replace(path_and_query);
            } else if self.history.location() != path_and_query {
                self.history.push(path_and_query);
            }
        }

        let event = if is_replace {
            RouterEvent::NavigationReplace {
                context: context.clone(),
            }
        } else {
            RouterEvent::NavigationUpdate {
                context: context.clone(),
            }
        };
        self.events.publish(event);
        self.publish_widget_events(&context);

        debug!(
            navigation = %context.id,
            route = %context.route.name,
            replace = is_replace,
            "navigation updated"
        );
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Navigation requested by a callback of the navigation holding the lock.
    async fn redirect(&self, path_and_query: &str, depth: usize) -> RouterResult<bool> {
        if depth > MAX_REDIRECT_DEPTH {
            return Err(RouterError::redirect_loop(depth));
        }
        debug!(path = %path_and_query, depth, "nested navigation");

        let ticket = self.next_ticket();
        REDIRECT_DEPTH
            .scope(depth, self.navigate_locked(path_and_query.to_string(), ticket, 0))
            .await
    }

    fn commit(&self, context: NavigationContext) -> u64 {
        write(&self.state).update(context);
        self.commits.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether another navigation committed after commit number `seen`.
    fn redirected(&self, seen: u64) -> bool {
        self.commits.load(Ordering::SeqCst) != seen
    }

    fn next_ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_superseded(&self, ticket: u64) -> bool {
        self.config.navigation_policy == NavigationPolicy::Supersede
            && self.generation.load(Ordering::SeqCst) != ticket
    }

    fn validate(&self, path_and_query: &str) -> RouterResult<()> {
        if path_and_query.is_empty() {
            return Err(RouterError::invalid_path(
                "Invalid \"path_and_query\" parameter was specified.",
            ));
        }
        if read(&self.table).is_empty() {
            return Err(RouterError::no_routes());
        }
        Ok(())
    }

    fn render_callback(&self) -> RouterResult<BoxedHook> {
        read(&self.on_navigate)
            .clone()
            .ok_or_else(RouterError::no_render_callback)
    }

    fn flagged_path(
        &self,
        find: impl Fn(&RouteTable) -> Option<&Route>,
        missing: fn() -> RouterError,
    ) -> RouterResult<String> {
        let table = read(&self.table);
        if table.is_empty() {
            return Err(RouterError::no_routes());
        }
        find(&*table).map(|r| r.path.clone()).ok_or_else(missing)
    }

    fn resolve(&self, path_and_query: &str) -> Option<NavigationContext> {
        let (path, query) = query::split(path_and_query);
        let resolved = read(&self.table).resolve(path)?;
        let query_params = query.map(query::parse);

        Some(
            NavigationContext::new(resolved.route, path)
                .with_path_params(resolved.path_params)
                .with_query(query.map(str::to_string), query_params),
        )
    }

    fn navigate_locked(
        &self,
        path_and_query: String,
        ticket: u64,
        depth: usize,
    ) -> BoxFuture<'_, RouterResult<bool>> {
        Box::pin(async move {
            if depth > MAX_FALLBACK_DEPTH {
                return Err(RouterError::fallback_loop(depth));
            }

            self.validate(&path_and_query)?;
            let on_navigate = self.render_callback()?;

            let Some(context) = self.resolve(&path_and_query) else {
                warn!(path = %path_and_query, "no route matches, navigating to fallback route");
                let fallback =
                    self.flagged_path(|t| t.fallback_route(), RouterError::no_fallback_route)?;
                return self.navigate_locked(fallback, ticket, depth + 1).await;
            };

            let route = context.route.clone();
            self.trace(&context, "resolved");

            // 1. Guard
            if let Some(guard) = &route.guard {
                self.trace(&context, "guarding");
                let seen = self.commits.load(Ordering::SeqCst);
                let can_continue = guard(context.clone()).await?;

                if self.redirected(seen) {
                    debug!(navigation = %context.id, "guard navigated elsewhere");
                    return Ok(false);
                }

                if !can_continue {
                    warn!(
                        navigation = %context.id,
                        route = %route.name,
                        "route stopped by its guard function, unable to navigate"
                    );
                    if self.current_route().is_none() {
                        let fallback = self
                            .flagged_path(|t| t.fallback_route(), RouterError::no_fallback_route)?;
                        self.navigate_locked(fallback, ticket, depth + 1).await?;
                    } else if self.history.len() > 1 {
                        self.history.forward();
                    }
                    return Ok(false);
                }

                if self.is_superseded(ticket) {
                    debug!(navigation = %context.id, "navigation superseded after guard");
                    return Ok(false);
                }
            }

            let committed = self.commit(context.clone());

            // 2. Pre-navigate
            if let Some(hook) = &route.on_pre_navigate {
                self.trace(&context, "pre-navigating");
                hook(context.clone()).await?;
                if self.redirected(committed) {
                    debug!(navigation = %context.id, "pre-navigate hook navigated elsewhere");
                    return Ok(false);
                }
            }

            // 3. Navigate
            self.trace(&context, "navigating");
            on_navigate(context.clone()).await?;
            if self.redirected(committed) {
                debug!(navigation = %context.id, "render callback navigated elsewhere");
                return Ok(false);
            }

            if self.config.sync_history && self.history.location() != path_and_query {
                self.history.push(&path_and_query);
            }

            self.publish_widget_events(&context);

            // 4. Post-navigate
            if let Some(hook) = &route.on_post_navigate {
                self.trace(&context, "post-navigating");
                hook(context.clone()).await?;
                if self.redirected(committed) {
                    debug!(navigation = %context.id, "post-navigate hook navigated elsewhere");
                    return Ok(true);
                }
            }

            let previous = self.previous();
            self.events.publish(RouterEvent::ContextUpdated {
                current: context.clone(),
                previous,
            });

            debug!(navigation = %context.id, route = %route.name, path = %context.path, "navigated");
            Ok(true)
        })
    }

    /// Re-publish query keys carrying the widget prefix.
    fn publish_widget_events(&self, context: &NavigationContext) {
        let Some(params) = &context.query_params else {
            return;
        };
        for (key, value) in params.with_prefix(&self.config.widget_event_prefix) {
            let receivers = self.events.publish(RouterEvent::Widget {
                key: key.to_string(),
                value: value.clone(),
            });
            debug!(navigation = %context.id, key, receivers, "widget event published");
        }
    }

    fn trace(&self, context: &NavigationContext, step: &str) {
        if self.config.debug_logging {
            debug!(navigation = %context.id, route = %context.route.name, step, "navigation step");
        }
    }
}
