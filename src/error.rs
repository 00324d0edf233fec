use thiserror::Error;

/// Message used when a failed response carries no `detail`
pub const GENERIC_REQUEST_FAILURE: &str = "Request failed";

/// Errors that can occur while talking to the Hestia backend or driving a screen
#[derive(Error, Debug)]
pub enum HestiaError {
    /// Input rejected locally before any request was made
    #[error("{0}")]
    Validation(String),

    /// Backend answered 401; the cached user has already been cleared
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Backend answered with a non-2xx status other than 401
    #[error("{message}")]
    Request { status: u16, message: String },

    /// Network failure or an undecodable response body
    #[error("Failed to reach backend: {0}")]
    Transport(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),
}

impl HestiaError {
    /// HTTP status of the failure, when the backend produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            HestiaError::NotAuthenticated => Some(401),
            HestiaError::Request { status, .. } => Some(*status),
            HestiaError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Text a screen shows for this failure.
    ///
    /// Falls back to `fallback` when the failure carries no message of its own.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

pub type Result<T> = std::result::Result<T, HestiaError>;
