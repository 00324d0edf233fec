pub mod app;
pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod location;
pub mod model;
pub mod router;
pub mod screens;
pub mod search;
pub mod session;

pub use app::{Hestia, HestiaBuilder};
pub use client::{ApiClient, RecipeBackend};
pub use config::{ClientConfig, SearchConfig};
pub use debounce::Debouncer;
pub use error::{HestiaError, Result};
pub use location::{Location, MemoryLocation};
pub use model::{IngredientItem, Instructions, Recipe, User};
pub use router::Route;
pub use screens::Screen;
pub use search::{SearchComposer, SearchMode, SearchQuery, SearchState};
pub use session::{SessionContext, SessionIndicator, SessionState};

use log::debug;

/// Search recipes by name with the default configuration
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipes = hestia_client::search_by_name("lasagne").await?;
/// # Ok(())
/// # }
/// ```
pub async fn search_by_name(query: &str) -> Result<Vec<Recipe>> {
    let hestia = Hestia::builder().build()?;
    let params = model::SearchParams::new(query).with_limit(hestia.config().search.page_size);
    let recipes = hestia.client().search_recipes(&params).await?;
    debug!("Found {} recipes for {:?}", recipes.len(), query);
    Ok(recipes)
}

/// Fetch a single recipe with the default configuration
pub async fn fetch_recipe(id: u64) -> Result<Recipe> {
    let hestia = Hestia::builder().build()?;
    hestia.client().get_recipe(id).await
}
