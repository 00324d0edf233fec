use log::info;

use crate::client::ApiClient;
use crate::error::{HestiaError, Result};
use crate::location::HOME_PATH;
use crate::model::{SignupRequest, User};

pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
const REGISTRATION_FAILED: &str = "An error occurred during registration";

/// Registration form state
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub error: Option<String>,
    pub loading: bool,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate locally, then `POST /signup`.
    ///
    /// On success the new user is cached in the session and the page goes home.
    pub async fn submit(&mut self, client: &ApiClient) -> Result<User> {
        self.error = None;

        if self.password != self.confirm_password {
            self.error = Some(PASSWORD_MISMATCH.to_string());
            return Err(HestiaError::Validation(PASSWORD_MISMATCH.to_string()));
        }

        self.loading = true;
        let request = SignupRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            username: self.username.clone(),
        };
        let result = client.signup(&request).await;
        self.loading = false;

        match result {
            Ok(user) => {
                info!("Registered user {}", user.username);
                client.session().set_user(user.clone());
                client.location().assign(HOME_PATH);
                Ok(user)
            }
            Err(e) => {
                self.error = Some(e.user_message(REGISTRATION_FAILED));
                Err(e)
            }
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
