//! Route dispatch on the current location path.
//!
//! Routes are resolved once per page load. Nothing here touches history;
//! navigation is always a full-page [`Location::assign`](crate::location::Location::assign).

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Top-level screens reachable by path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Register,
    Login,
    Kitchen,
    RecipeDetail(u64),
}

fn recipe_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^/recipe/(\d+)$").expect("valid recipe route pattern"))
}

impl Route {
    /// Select the screen for `path`.
    ///
    /// Exact matches first, then `/recipe/{digits}`; everything else is home.
    /// Query strings, fragments and trailing slashes are not tolerated.
    pub fn resolve(path: &str) -> Self {
        match path {
            "/register" => Route::Register,
            "/login" => Route::Login,
            "/kitchen" => Route::Kitchen,
            _ => recipe_pattern()
                .captures(path)
                .and_then(|caps| caps.get(1))
                .and_then(|id| id.as_str().parse().ok())
                .map(Route::RecipeDetail)
                .unwrap_or(Route::Home),
        }
    }

    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Register => "/register".to_string(),
            Route::Login => "/login".to_string(),
            Route::Kitchen => "/kitchen".to_string(),
            Route::RecipeDetail(id) => format!("/recipe/{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Whether the navbar should treat `path` as the marketing homepage
pub fn is_homepage(path: &str) -> bool {
    path == "/"
}
