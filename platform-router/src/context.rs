//! Navigation context and state
//!
//! A [`NavigationContext`] describes one navigation attempt: the resolved
//! route plus what was extracted from the path and query. The router keeps
//! the last committed context as `current` and the one before it as
//! `previous`.

use serde::Serialize;
use uuid::Uuid;

use crate::matcher::PathParams;
use crate::query::QueryParams;
use crate::Route;

/// The resolved route plus extracted path/query parameters for one navigation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationContext {
    /// Time-ordered navigation id, recorded on every log line of this navigation
    pub id: Uuid,
    /// Snapshot of the resolved route
    pub route: Route,
    /// Path fragment without the query, e.g. `/books/1234`
    pub path: String,
    /// Path parameters, `None` when the template declares none
    pub path_params: Option<PathParams>,
    /// Raw query fragment including the leading `?`, e.g. `?foo=bar`
    pub query: Option<String>,
    /// Decoded query, `None` when there is no query fragment
    pub query_params: Option<QueryParams>,
}

impl NavigationContext {
    pub fn new(route: Route, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            route,
            path: path.into(),
            path_params: None,
            query: None,
            query_params: None,
        }
    }

    pub fn with_path_params(mut self, params: Option<PathParams>) -> Self {
        self.path_params = params;
        self
    }

    /// Attach the raw query fragment and its decoded form.
    pub fn with_query(mut self, query: Option<String>, params: Option<QueryParams>) -> Self {
        self.query = query;
        self.query_params = params;
        self
    }

    /// Name of the resolved route.
    pub fn route_name(&self) -> &str {
        &self.route.name
    }

    /// Value of a path parameter.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.as_ref().and_then(|p| p.get(name))
    }

    /// First value of a query parameter.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_params.as_ref().and_then(|p| p.get(key))
    }

    /// Path and query as navigated, e.g. `/books/1234?foo=bar`.
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(query) => format!("{}{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

/// Current and previous navigation snapshots.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NavigationState {
    /// Last committed navigation
    pub current: Option<NavigationContext>,
    /// Navigation committed before `current`
    pub previous: Option<NavigationContext>,
}

impl NavigationState {
    /// Record a committed navigation, shifting `current` into `previous`.
    pub fn update(&mut self, context: NavigationContext) {
        if let Some(current) = self.current.take() {
            self.previous = Some(current);
        }
        self.current = Some(context);
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.current.as_ref().map(|c| &c.route)
    }
}
