//! History integration
//!
//! [`History`] is the seam between the router and the host's session
//! history (the browser's `window.history` when running in a page).
//! [`MemoryHistory`] keeps the stack in process and is what the shell and
//! the tests use.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Session history as seen by the router.
///
/// Locations are `path?query` strings, e.g. `/clients/7?tab=info`.
pub trait History: Send + Sync {
    /// Current location.
    fn location(&self) -> String;

    /// Number of entries in the session history.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add an entry after the current one, discarding forward entries.
    fn push(&self, location: &str);

    /// Overwrite the current entry.
    fn replace(&self, location: &str);

    /// Move back one entry. Returns false when already at the start.
    fn back(&self) -> bool;

    /// Move forward one entry. Returns false when already at the end.
    fn forward(&self) -> bool;
}

#[derive(Debug)]
struct Stack {
    entries: Vec<String>,
    index: usize,
}

/// In-process session history.
#[derive(Debug)]
pub struct MemoryHistory {
    stack: Mutex<Stack>,
}

impl MemoryHistory {
    /// Create a history with a single entry.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            stack: Mutex::new(Stack {
                entries: vec![initial.into()],
                index: 0,
            }),
        }
    }

    fn stack(&self) -> MutexGuard<'_, Stack> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.stack().entries.clone()
    }

    /// Index of the current entry.
    pub fn index(&self) -> usize {
        self.stack().index
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        let stack = self.stack();
        stack.entries[stack.index].clone()
    }

    fn len(&self) -> usize {
        self.stack().entries.len()
    }

    fn push(&self, location: &str) {
        let mut stack = self.stack();
        let next = stack.index + 1;
        stack.entries.truncate(next);
        stack.entries.push(location.to_string());
        stack.index = next;
    }

    fn replace(&self, location: &str) {
        let mut stack = self.stack();
        let index = stack.index;
        stack.entries[index] = location.to_string();
    }

    fn back(&self) -> bool {
        let mut stack = self.stack();
        if stack.index == 0 {
            return false;
        }
        stack.index -= 1;
        true
    }

    fn forward(&self) -> bool {
        let mut stack = self.stack();
        if stack.index + 1 >= stack.entries.len() {
            return false;
        }
        stack.index += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_discards_forward_entries() {
        let history = MemoryHistory::new("/login");
        history.push("/clients");
        history.push("/clients/1");
        assert!(history.back());
        assert_eq!(history.location(), "/clients");

        history.push("/help/about");
        assert_eq!(history.entries(), vec!["/login", "/clients", "/help/about"]);
        assert!(!history.forward());
    }

    #[test]
    fn test_back_and_forward() {
        let history = MemoryHistory::default();
        assert!(!history.back());
        history.push("/a");
        assert!(history.back());
        assert_eq!(history.location(), "/");
        assert!(history.forward());
        assert_eq!(history.location(), "/a");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_replace_keeps_length() {
        let history = MemoryHistory::new("/a");
        history.replace("/b?x=1");
        assert_eq!(history.len(), 1);
        assert_eq!(history.location(), "/b?x=1");
    }
}
