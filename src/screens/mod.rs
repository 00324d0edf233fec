mod home;
mod kitchen;
mod login;
mod recipe_detail;
mod register;

pub use home::Home;
pub use kitchen::Kitchen;
pub use login::LoginForm;
pub use recipe_detail::RecipeDetail;
pub use register::{RegisterForm, PASSWORD_MISMATCH};

use crate::client::ApiClient;
use crate::config::SearchConfig;
use crate::router::Route;

/// The top-level screen selected for the current page load
pub enum Screen {
    Home,
    Register(RegisterForm),
    Login(LoginForm),
    Kitchen(Box<Kitchen>),
    RecipeDetail(Box<RecipeDetail>),
}

impl Screen {
    /// Build the (not yet mounted) screen for `route`
    pub fn for_route(route: Route, client: &ApiClient, search: &SearchConfig) -> Self {
        match route {
            Route::Home => Screen::Home,
            Route::Register => Screen::Register(RegisterForm::new()),
            Route::Login => Screen::Login(LoginForm::new()),
            Route::Kitchen => {
                Screen::Kitchen(Box::new(Kitchen::new(client.clone(), search.clone())))
            }
            Route::RecipeDetail(id) => {
                Screen::RecipeDetail(Box::new(RecipeDetail::new(client.clone(), id)))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Register(_) => "register",
            Screen::Login(_) => "login",
            Screen::Kitchen(_) => "kitchen",
            Screen::RecipeDetail(_) => "recipe",
        }
    }
}
