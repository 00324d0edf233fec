//! Search query composer.
//!
//! Holds the state behind the kitchen's search box: which mode is active, the
//! free text, the ingredient set, and the latest results. Free text is
//! debounced before it reaches the backend; ingredient searches run on demand.
//! State is published through a watch channel so a renderer can follow along.

use log::{debug, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::client::RecipeBackend;
use crate::config::SearchConfig;
use crate::debounce::Debouncer;
use crate::error::{HestiaError, Result};
use crate::model::{IngredientSearchParams, Recipe, SearchParams};

pub const SEARCH_FAILED: &str = "Failed to search recipes";
pub const NO_INGREDIENTS: &str = "Please add at least one ingredient";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    ByName,
    ByIngredients,
}

/// The query the composer would issue right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    ByName { text: String },
    ByIngredients { ingredients: Vec<String>, match_all: bool },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub mode: SearchMode,
    pub free_text: String,
    /// Ordered, trimmed, duplicate-free
    pub ingredients: Vec<String>,
    /// Text in the "add ingredient" box
    pub ingredient_input: String,
    pub match_all: bool,
    pub recipes: Vec<Recipe>,
    pub loading: bool,
    pub error: Option<String>,
    pub has_searched: bool,
}

impl SearchState {
    pub fn query(&self) -> SearchQuery {
        match self.mode {
            SearchMode::ByName => SearchQuery::ByName {
                text: self.free_text.clone(),
            },
            SearchMode::ByIngredients => SearchQuery::ByIngredients {
                ingredients: self.ingredients.clone(),
                match_all: self.match_all,
            },
        }
    }

    /// "No recipes found" should be shown
    pub fn shows_empty_state(&self) -> bool {
        self.has_searched && !self.loading && self.recipes.is_empty() && self.error.is_none()
    }

    /// Whether the ingredient search button is enabled
    pub fn can_search_ingredients(&self) -> bool {
        !self.ingredients.is_empty() && !self.loading
    }
}

// State shared with debounced tasks
struct Shared {
    backend: Arc<dyn RecipeBackend>,
    state: watch::Sender<SearchState>,
    latest: AtomicU64,
    page_size: u32,
    discard_stale: bool,
}

impl Shared {
    fn modify(&self, f: impl FnOnce(&mut SearchState)) {
        self.state.send_modify(f);
    }

    // Any request issued before this call becomes stale
    fn invalidate(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn begin(&self) -> u64 {
        let ticket = self.invalidate();
        self.modify(|s| {
            s.loading = true;
            s.error = None;
        });
        ticket
    }

    fn finish(&self, ticket: u64, result: Result<Vec<Recipe>>) -> Result<()> {
        if self.discard_stale && ticket != self.latest.load(Ordering::SeqCst) {
            debug!("Discarding response for superseded search #{}", ticket);
            return result.map(|_| ());
        }

        match result {
            Ok(recipes) => {
                info!("Search #{} returned {} recipes", ticket, recipes.len());
                self.modify(|s| {
                    s.recipes = recipes;
                    s.has_searched = true;
                    s.error = None;
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                let message = e.user_message(SEARCH_FAILED);
                debug!("Search #{} failed: {}", ticket, message);
                self.modify(|s| {
                    s.recipes.clear();
                    s.error = Some(message);
                    s.loading = false;
                });
                Err(e)
            }
        }
    }
}

async fn run_name_search(shared: Arc<Shared>, query: String) -> Result<()> {
    if query.trim().is_empty() {
        shared.invalidate();
        shared.modify(|s| {
            s.recipes.clear();
            s.has_searched = false;
            s.loading = false;
        });
        return Ok(());
    }

    let ticket = shared.begin();
    debug!("Search #{} by name: {:?}", ticket, query);
    let params = SearchParams::new(query).with_limit(shared.page_size);
    let result = shared.backend.search_recipes(&params).await;
    shared.finish(ticket, result)
}

pub struct SearchComposer {
    shared: Arc<Shared>,
    debouncer: Debouncer,
    config: SearchConfig,
}

impl SearchComposer {
    pub fn new(backend: Arc<dyn RecipeBackend>, config: SearchConfig) -> Self {
        let (state, _rx) = watch::channel(SearchState::default());
        Self {
            shared: Arc::new(Shared {
                backend,
                state,
                latest: AtomicU64::new(0),
                page_size: config.page_size,
                discard_stale: config.discard_stale_responses,
            }),
            debouncer: Debouncer::new(),
            config,
        }
    }

    pub fn snapshot(&self) -> SearchState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.state.subscribe()
    }

    /// Switch mode, discarding results, the error and the "has searched" flag.
    ///
    /// Ingredients are kept. Entering by-name mode re-runs the debounced search
    /// for the retained free text; leaving it cancels any pending one.
    pub fn set_mode(&self, mode: SearchMode) {
        let previous = self.shared.state.borrow().mode;
        self.shared.invalidate();
        self.shared.modify(|s| {
            s.mode = mode;
            s.recipes.clear();
            s.has_searched = false;
            s.error = None;
            s.loading = false;
        });

        match mode {
            SearchMode::ByName if previous != SearchMode::ByName => self.schedule_name_search(),
            SearchMode::ByName => {}
            SearchMode::ByIngredients => {
                self.debouncer.cancel_pending();
            }
        }
    }

    /// Record a keystroke in the free-text box and (re)start the quiescence window.
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_free_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.shared.modify(|s| s.free_text = text);
        let mode = self.shared.state.borrow().mode;
        if mode == SearchMode::ByName {
            self.schedule_name_search();
        }
    }

    /// Search the given free text immediately, skipping the quiescence window
    pub async fn search_now(&self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.debouncer.cancel_pending();
        self.shared.modify(|s| s.free_text = text.clone());
        run_name_search(self.shared.clone(), text).await
    }

    fn schedule_name_search(&self) {
        let query = self.shared.state.borrow().free_text.clone();
        let shared = self.shared.clone();
        self.debouncer.schedule(
            async move {
                // Failures are already recorded in the state
                let _ = run_name_search(shared, query).await;
            },
            self.config.debounce(),
        );
    }

    pub fn set_ingredient_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.shared.modify(|s| s.ingredient_input = text);
    }

    /// Add `name` to the ingredient set.
    ///
    /// Trims first; empty and already-present names are ignored. On success
    /// the input box is cleared. Returns whether the set changed.
    pub fn add_ingredient(&self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }

        let mut added = false;
        self.shared.state.send_if_modified(|s| {
            if s.ingredients.iter().any(|i| i == trimmed) {
                return false;
            }
            s.ingredients.push(trimmed.to_string());
            s.ingredient_input.clear();
            added = true;
            true
        });
        added
    }

    /// Add whatever is in the input box (Enter key / "Add" button)
    pub fn commit_ingredient_input(&self) -> bool {
        let input = self.shared.state.borrow().ingredient_input.clone();
        self.add_ingredient(&input)
    }

    /// Remove the ingredient at `index`; out-of-range indexes are ignored
    pub fn remove_ingredient(&self, index: usize) -> Option<String> {
        let mut removed = None;
        self.shared.state.send_if_modified(|s| {
            if index < s.ingredients.len() {
                removed = Some(s.ingredients.remove(index));
                true
            } else {
                false
            }
        });
        removed
    }

    pub fn set_match_all(&self, match_all: bool) {
        self.shared.modify(|s| s.match_all = match_all);
    }

    /// Run the ingredient search.
    ///
    /// An empty ingredient set fails locally without touching the backend.
    pub async fn execute_ingredient_search(&self) -> Result<()> {
        let state = self.snapshot();
        if state.ingredients.is_empty() {
            self.shared
                .modify(|s| s.error = Some(NO_INGREDIENTS.to_string()));
            return Err(HestiaError::Validation(NO_INGREDIENTS.to_string()));
        }

        let ticket = self.shared.begin();
        debug!(
            "Search #{} by ingredients {:?} (match_all={})",
            ticket, state.ingredients, state.match_all
        );
        let params = IngredientSearchParams::new(state.ingredients, state.match_all)
            .with_limit(self.shared.page_size);
        let result = self.shared.backend.search_by_ingredients(&params).await;
        self.shared.finish(ticket, result)
    }

    /// Clear the error banner
    pub fn dismiss_error(&self) {
        self.shared.modify(|s| s.error = None);
    }

    /// Whether a debounced free-text search is waiting to fire
    pub fn has_pending_search(&self) -> bool {
        self.debouncer.is_pending()
    }
}
