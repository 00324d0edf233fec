use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A recipe as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw ingredient structure; see [`Recipe::ingredient_items`]
    #[serde(default)]
    pub ingredients: Value,
    #[serde(default)]
    pub instructions: Instructions,
    #[serde(default)]
    pub prep_time: Option<i32>,
    #[serde(default)]
    pub cook_time: Option<i32>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub source_url: Option<String>,
    pub user_id: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// A single normalized ingredient line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Instructions arrive either as a list of steps or as one block of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Instructions {
    Steps(Vec<String>),
    Text(String),
}

impl Default for Instructions {
    fn default() -> Self {
        Instructions::Text(String::new())
    }
}

impl Instructions {
    /// Ordered steps, splitting text on runs of newlines and dropping blank lines
    pub fn steps(&self) -> Vec<String> {
        match self {
            Instructions::Steps(steps) => steps.clone(),
            Instructions::Text(text) => text
                .split('\n')
                .map(str::trim)
                .filter(|step| !step.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

impl Recipe {
    /// Normalize the raw ingredient structure into name/quantity/unit lines.
    ///
    /// Plain strings become a bare name. Objects use `name`, then
    /// `ingredient_name`. Anything that is not an array yields no ingredients.
    pub fn ingredient_items(&self) -> Vec<IngredientItem> {
        normalize_ingredients(&self.ingredients)
    }

    /// Ordered instruction steps
    pub fn steps(&self) -> Vec<String> {
        self.instructions.steps()
    }

    /// Prep plus cook time in minutes, `None` when it would be zero.
    ///
    /// Imported recipes carry `-1` for an unknown time; negative parts count
    /// as zero.
    pub fn total_time(&self) -> Option<i32> {
        let minutes = |t: Option<i32>| t.filter(|t| *t > 0).unwrap_or(0);
        let total = minutes(self.prep_time).saturating_add(minutes(self.cook_time));
        (total > 0).then_some(total)
    }
}

pub fn normalize_ingredients(raw: &Value) -> Vec<IngredientItem> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(name) => IngredientItem {
                name: name.clone(),
                quantity: None,
                unit: None,
            },
            _ => IngredientItem {
                name: text_field(item, "name")
                    .or_else(|| text_field(item, "ingredient_name"))
                    .unwrap_or_default(),
                quantity: text_field(item, "quantity"),
                unit: text_field(item, "unit"),
            },
        })
        .collect()
}

// Empty strings count as missing; numbers are rendered as text
fn text_field(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The authenticated user as reported by `/auth/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Parameters for `GET /api/recipes/search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub q: String,
    pub limit: u32,
    pub offset: u32,
}

impl SearchParams {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            limit: 20,
            offset: 0,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Body of `POST /api/recipes/search/ingredients`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientSearchParams {
    pub ingredients: Vec<String>,
    pub match_all: bool,
    pub limit: u32,
    pub offset: u32,
}

impl IngredientSearchParams {
    pub fn new(ingredients: Vec<String>, match_all: bool) -> Self {
        Self {
            ingredients,
            match_all,
            limit: 20,
            offset: 0,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}
