use log::{info, warn};

use crate::client::ApiClient;
use crate::error::{HestiaError, Result};
use crate::model::{IngredientItem, Recipe, User};
use crate::router::Route;

const LOAD_FAILED: &str = "Failed to load recipe";
const DELETE_FAILED: &str = "Failed to delete recipe";

/// Detail view for `/recipe/{id}`
pub struct RecipeDetail {
    client: ApiClient,
    recipe_id: u64,
    recipe: Option<Recipe>,
    user: Option<User>,
    loading: bool,
    error: Option<String>,
}

impl RecipeDetail {
    pub fn new(client: ApiClient, recipe_id: u64) -> Self {
        Self {
            client,
            recipe_id,
            recipe: None,
            user: None,
            loading: true,
            error: None,
        }
    }

    /// Load the viewer (if any) and the recipe.
    ///
    /// An anonymous viewer still gets the recipe request; the backend decides
    /// whether that is allowed.
    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        self.error = None;
        self.user = self.client.session().ensure_checked(&self.client).await;

        let result = self.client.get_recipe(self.recipe_id).await;
        self.loading = false;

        match result {
            Ok(recipe) => {
                self.recipe = Some(recipe);
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.user_message(LOAD_FAILED));
                Err(e)
            }
        }
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        self.recipe.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error text, or "Recipe not found" once loading finished without a recipe
    pub fn error(&self) -> Option<String> {
        match (&self.error, &self.recipe) {
            (Some(error), _) => Some(error.clone()),
            (None, None) if !self.loading => Some("Recipe not found".to_string()),
            _ => None,
        }
    }

    /// Edit and delete are only offered to the recipe's owner
    pub fn is_owner(&self) -> bool {
        match (&self.user, &self.recipe) {
            (Some(user), Some(recipe)) => user.id == recipe.user_id,
            _ => false,
        }
    }

    pub fn ingredients(&self) -> Vec<IngredientItem> {
        self.recipe
            .as_ref()
            .map(Recipe::ingredient_items)
            .unwrap_or_default()
    }

    pub fn steps(&self) -> Vec<String> {
        self.recipe.as_ref().map(Recipe::steps).unwrap_or_default()
    }

    pub fn edit_path(&self) -> String {
        format!("{}/edit", Route::RecipeDetail(self.recipe_id).path())
    }

    pub fn edit(&self) {
        if self.is_owner() {
            self.client.location().assign(&self.edit_path());
        }
    }

    pub fn back(&self) {
        self.client.location().assign(&Route::Kitchen.path());
    }

    /// `DELETE` the recipe and return to the kitchen.
    ///
    /// The caller is responsible for asking the user to confirm first.
    pub async fn delete(&mut self) -> Result<()> {
        if !self.is_owner() {
            warn!("Refusing to delete recipe {} not owned by viewer", self.recipe_id);
            return Err(HestiaError::Validation(
                "Only the owner can delete this recipe".to_string(),
            ));
        }

        match self.client.delete_recipe(self.recipe_id).await {
            Ok(()) => {
                info!("Deleted recipe {}", self.recipe_id);
                self.back();
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.user_message(DELETE_FAILED));
                Err(e)
            }
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
