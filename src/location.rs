//! Browser location abstraction.
//!
//! Screens and the HTTP adapter never touch a real address bar; they read the
//! current path and perform full-page navigations through [`Location`].

use log::debug;
use std::sync::Mutex;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Current path plus full-page navigation
pub trait Location: Send + Sync {
    /// Path component of the current location, without query or fragment
    fn pathname(&self) -> String;

    /// Replace the current page with `path`
    fn assign(&self, path: &str);
}

/// In-process location used by the CLI and by tests.
///
/// Records every navigation so callers can inspect where they were sent.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    inner: Mutex<MemoryLocationState>,
}

#[derive(Debug, Default)]
struct MemoryLocationState {
    path: String,
    navigations: Vec<String>,
}

impl MemoryLocation {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(MemoryLocationState {
                path: strip_search_and_hash(&path.into()).to_string(),
                navigations: Vec::new(),
            }),
        }
    }

    /// Every path passed to [`Location::assign`], oldest first
    pub fn navigations(&self) -> Vec<String> {
        self.state().navigations.clone()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MemoryLocationState> {
        // A poisoned lock still holds a usable path
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Location for MemoryLocation {
    fn pathname(&self) -> String {
        let state = self.state();
        if state.path.is_empty() {
            HOME_PATH.to_string()
        } else {
            state.path.clone()
        }
    }

    fn assign(&self, path: &str) {
        debug!("Navigating to {}", path);
        let mut state = self.state();
        state.path = strip_search_and_hash(path).to_string();
        state.navigations.push(path.to_string());
    }
}

fn strip_search_and_hash(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pathname_ignores_query_and_fragment() {
        let location = MemoryLocation::new("/kitchen?tab=search#top");
        assert_eq!(location.pathname(), "/kitchen");
    }

    #[test]
    fn test_empty_path_is_home() {
        let location = MemoryLocation::default();
        assert_eq!(location.pathname(), "/");
    }

    #[test]
    fn test_assign_records_navigation() {
        let location = MemoryLocation::new("/");
        location.assign("/login");
        location.assign("/recipe/4");
        assert_eq!(location.pathname(), "/recipe/4");
        assert_eq!(location.navigations(), vec!["/login", "/recipe/4"]);
    }
}
