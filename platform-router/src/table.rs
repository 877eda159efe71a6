//! Route table
//!
//! Ordered collection of registered routes. Registration order is scan
//! order, so the first registered route whose pattern matches wins.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use crate::matcher::{PathParams, PathPattern};
use crate::{Route, RouterError, RouterResult};

/// A registered route and its compiled pattern.
#[derive(Debug, Clone)]
struct RouteEntry {
    route: Route,
    pattern: PathPattern,
}

/// Result of resolving a path against the table.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// The matched route
    pub route: Route,
    /// Extracted parameters, `None` when the template declares none
    pub path_params: Option<PathParams>,
}

/// Registered routes with at most one default and one fallback.
#[derive(Debug)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    detect_conflicts: bool,
    // path -> (entry index, params)
    cache: Option<Mutex<LruCache<String, (usize, Option<PathParams>)>>>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(false, 0)
    }
}

impl RouteTable {
    /// Create an empty table.
    ///
    /// `detect_conflicts` rejects templates equivalent to a registered one.
    /// `cache_size` bounds the resolution cache; 0 disables it.
    pub fn new(detect_conflicts: bool, cache_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            detect_conflicts,
            cache: NonZeroUsize::new(cache_size).map(|n| Mutex::new(LruCache::new(n))),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate and append a route. Returns a snapshot of the stored route.
    pub fn insert(&mut self, route: Route) -> RouterResult<Route> {
        if route.name.is_empty() {
            return Err(RouterError::invalid_route("No route name provided"));
        }
        if route.path.is_empty() {
            return Err(RouterError::invalid_route("No route path provided").with_route(&route.name));
        }
        if route.load.is_none() {
            return Err(
                RouterError::invalid_route("No route load() provided").with_route(&route.name)
            );
        }
        if self.entries.iter().any(|e| e.route.name == route.name) {
            return Err(RouterError::duplicate_route(format!(
                "Route with name \"{}\" already exists",
                route.name
            ))
            .with_route(&route.name));
        }
        if self.entries.iter().any(|e| e.route.path == route.path) {
            return Err(RouterError::duplicate_route(format!(
                "Route with path \"{}\" already exists",
                route.path
            ))
            .with_route(&route.name));
        }

        let pattern = PathPattern::compile(&route.path).map_err(|e| e.with_route(&route.name))?;

        if self.detect_conflicts {
            if let Some(existing) = self.entries.iter().find(|e| e.pattern.conflicts_with(&pattern)) {
                return Err(RouterError::path_conflict(format!(
                    "Route path \"{}\" matches the same paths as \"{}\" (route \"{}\")",
                    route.path,
                    existing.pattern.template(),
                    existing.route.name
                ))
                .with_route(&route.name));
            }
        }

        let name = route.name.clone();
        let (is_default, is_fallback) = (route.is_default, route.is_fallback);
        self.entries.push(RouteEntry { route, pattern });
        self.clear_cache();

        if is_default {
            self.set_default(&name);
        }
        if is_fallback {
            self.set_fallback(&name);
        }

        Ok(self.entries[self.entries.len() - 1].route.clone())
    }

    /// Make `name` the only default route. Returns false if no such route.
    pub fn set_default(&mut self, name: &str) -> bool {
        self.set_flag(name, |route, on| route.is_default = on)
    }

    /// Make `name` the only fallback route. Returns false if no such route.
    pub fn set_fallback(&mut self, name: &str) -> bool {
        self.set_flag(name, |route, on| route.is_fallback = on)
    }

    fn set_flag(&mut self, name: &str, set: impl Fn(&mut Route, bool)) -> bool {
        let Some(target) = self.entries.iter().position(|e| e.route.name == name) else {
            return false;
        };
        for (i, entry) in self.entries.iter_mut().enumerate() {
            set(&mut entry.route, i == target);
        }
        true
    }

    /// Look up a route by name.
    pub fn get(&self, name: &str) -> Option<&Route> {
        self.entries.iter().map(|e| &e.route).find(|r| r.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Route> {
        self.entries
            .iter_mut()
            .map(|e| &mut e.route)
            .find(|r| r.name == name)
    }

    /// The route flagged as default.
    pub fn default_route(&self) -> Option<&Route> {
        self.entries.iter().map(|e| &e.route).find(|r| r.is_default)
    }

    /// The route flagged as fallback.
    pub fn fallback_route(&self) -> Option<&Route> {
        self.entries.iter().map(|e| &e.route).find(|r| r.is_fallback)
    }

    /// Detached copy of every route, in registration order.
    pub fn snapshot(&self) -> Vec<Route> {
        self.entries.iter().map(|e| e.route.clone()).collect()
    }

    /// Resolve a path (without query) to a route.
    ///
    /// `/` is served only by the default route. Any other path goes to the
    /// first registered route whose pattern matches.
    pub fn resolve(&self, path: &str) -> Option<Resolved> {
        if path == "/" {
            return self.default_route().map(|route| Resolved {
                route: route.clone(),
                path_params: None,
            });
        }

        if let Some(hit) = self.cached(path) {
            return Some(hit);
        }

        let (index, path_params) = self.entries.iter().enumerate().find_map(|(i, entry)| {
            let params = entry.pattern.captures(path)?;
            Some((i, (!entry.pattern.keys().is_empty()).then_some(params)))
        })?;

        if let Some(cache) = &self.cache {
            cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .put(path.to_string(), (index, path_params.clone()));
        }

        Some(Resolved {
            route: self.entries[index].route.clone(),
            path_params,
        })
    }

    fn cached(&self, path: &str) -> Option<Resolved> {
        let cache = self.cache.as_ref()?;
        let (index, path_params) = cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()?;
        let entry = self.entries.get(index)?;
        Some(Resolved {
            route: entry.route.clone(),
            path_params,
        })
    }

    fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }
}
