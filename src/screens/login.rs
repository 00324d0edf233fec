use log::{info, warn};

use crate::client::ApiClient;
use crate::error::{HestiaError, Result};
use crate::model::{LoginRequest, User};
use crate::router::Route;

const LOGIN_FAILED: &str = "An error occurred during login";

/// Login form state
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub loading: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// `POST /login`, re-run the auth check and go to the kitchen.
    ///
    /// Returns the user reported by `/auth/me`, or `None` when the backend
    /// accepted the login without establishing a session.
    pub async fn submit(&mut self, client: &ApiClient) -> Result<Option<User>> {
        self.error = None;

        if self.email.trim().is_empty() || self.password.is_empty() {
            let message = "Email and password are required";
            self.error = Some(message.to_string());
            return Err(HestiaError::Validation(message.to_string()));
        }

        self.loading = true;
        let request = LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        let result = client.login(&request).await;

        if let Err(e) = result {
            self.loading = false;
            self.error = Some(e.user_message(LOGIN_FAILED));
            return Err(e);
        }

        let user = client.session().refresh(client).await;
        self.loading = false;
        match &user {
            Some(user) => info!("Logged in as {}", user.username),
            None => warn!("Login accepted but no session was established"),
        }
        client.location().assign(&Route::Kitchen.path());
        Ok(user)
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
