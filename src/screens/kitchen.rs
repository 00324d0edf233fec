use log::info;
use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::SearchConfig;
use crate::location::LOGIN_PATH;
use crate::model::User;
use crate::router::Route;
use crate::search::SearchComposer;

/// Authenticated landing screen hosting the recipe search
pub struct Kitchen {
    client: ApiClient,
    user: Option<User>,
    loading: bool,
    search: SearchComposer,
}

impl Kitchen {
    pub fn new(client: ApiClient, config: SearchConfig) -> Self {
        let search = SearchComposer::new(Arc::new(client.clone()), config);
        Self {
            client,
            user: None,
            loading: true,
            search,
        }
    }

    /// Check the session; anyone not logged in is sent to the login page
    pub async fn mount(&mut self) -> Option<User> {
        self.user = self.client.session().ensure_checked(&self.client).await;
        self.loading = false;

        match &self.user {
            Some(user) => info!("Kitchen opened for {}", user.username),
            None => self.client.location().assign(LOGIN_PATH),
        }
        self.user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn welcome(&self) -> Option<String> {
        self.user
            .as_ref()
            .map(|user| format!("Welcome back, {}!", user.username))
    }

    pub fn search(&self) -> &SearchComposer {
        &self.search
    }

    /// Full-page navigation to a search result
    pub fn open_recipe(&self, id: i64) {
        if let Ok(id) = u64::try_from(id) {
            self.client.location().assign(&Route::RecipeDetail(id).path());
        }
    }
}
