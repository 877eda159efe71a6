//! Shell context and services

use super::{RenderedView, SessionInfo};
use chrono::{Duration, Utc};
use std::sync::{Arc, Mutex};

/// Services shared by guards, hooks and the render callback
#[derive(Clone, Default)]
pub struct ShellContext {
    /// Authentication service
    pub session: SessionService,
    /// Rendered view log
    pub views: ViewRegistry,
}

impl ShellContext {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Session service (simulated authentication)
#[derive(Clone, Default)]
pub struct SessionService {
    current: Arc<Mutex<Option<SessionInfo>>>,
}

impl SessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `user_name`. Returns `None` for a blank name.
    pub fn sign_in(&self, user_name: &str, ttl: Duration) -> Option<SessionInfo> {
        if user_name.trim().is_empty() {
            return None;
        }
        let session = SessionInfo::new(user_name.trim(), ttl);
        *self.current.lock().ok()? = Some(session.clone());
        Some(session)
    }

    /// End the current session, returning it.
    pub fn sign_out(&self) -> Option<SessionInfo> {
        self.current.lock().ok()?.take()
    }

    pub fn current(&self) -> Option<SessionInfo> {
        self.current.lock().ok()?.clone()
    }

    /// Whether a session exists and has not expired.
    pub fn is_signed_in(&self) -> bool {
        self.current()
            .is_some_and(|session| session.is_active_at(Utc::now()))
    }
}

/// Render log (what the shell would have put on screen)
#[derive(Clone, Default)]
pub struct ViewRegistry {
    rendered: Arc<Mutex<Vec<RenderedView>>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, view: RenderedView) {
        if let Ok(mut rendered) = self.rendered.lock() {
            rendered.push(view);
        }
    }

    pub fn rendered(&self) -> Vec<RenderedView> {
        self.rendered
            .lock()
            .ok()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// The view currently on screen.
    pub fn last(&self) -> Option<RenderedView> {
        self.rendered.lock().ok()?.last().cloned()
    }

    pub fn len(&self) -> usize {
        self.rendered.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
