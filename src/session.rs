//! Shared session context and the navbar's session indicator.
//!
//! The backend owns the session cookie. The client only caches the user that
//! `/auth/me` last reported, in one place, and invalidates it on logout or 401.

use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::watch;

use crate::client::ApiClient;
use crate::location::{Location, HOME_PATH};
use crate::model::User;
use crate::router::is_homepage;

/// Snapshot of what the client believes about the current session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    /// True once an auth check has completed, whatever its outcome
    pub checked: bool,
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Single source of truth for the cached user, shared by every screen
#[derive(Debug, Clone)]
pub struct SessionContext {
    state: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Self {
            state: Arc::new(tx),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_logged_in()
    }

    pub fn set_user(&self, user: User) {
        debug!("Caching session user {}", user.username);
        self.state.send_modify(|state| {
            state.user = Some(user);
            state.checked = true;
        });
    }

    /// Drop the cached user; the cookie itself is left to the backend
    pub fn clear(&self) {
        self.state.send_modify(|state| {
            state.user = None;
            state.checked = true;
        });
    }

    /// Run the auth check and cache its outcome.
    ///
    /// Any failure, network errors included, counts as logged out.
    pub async fn refresh(&self, client: &ApiClient) -> Option<User> {
        match client.current_user().await {
            Ok(user) => {
                self.set_user(user.clone());
                Some(user)
            }
            Err(e) => {
                debug!("Auth check failed, treating as logged out: {}", e);
                self.clear();
                None
            }
        }
    }

    /// Cached user if an auth check already ran, otherwise run one
    pub async fn ensure_checked(&self, client: &ApiClient) -> Option<User> {
        let state = self.snapshot();
        if state.checked {
            state.user
        } else {
            self.refresh(client).await
        }
    }

    /// Best-effort backend logout followed by an unconditional local clear
    pub async fn logout(&self, client: &ApiClient) {
        if let Err(e) = client.logout().await {
            warn!("Backend logout failed, clearing local session anyway: {}", e);
        }
        self.clear();
        info!("Logged out");
    }
}

/// Navbar state: login button vs. account menu
pub struct SessionIndicator {
    session: SessionContext,
    location: Arc<dyn Location>,
    is_homepage: bool,
    menu_open: bool,
}

impl SessionIndicator {
    pub fn new(session: SessionContext, location: Arc<dyn Location>) -> Self {
        let is_homepage = is_homepage(&location.pathname());
        Self {
            session,
            location,
            is_homepage,
            menu_open: false,
        }
    }

    /// Mount-time auth check
    pub async fn mount(&mut self, client: &ApiClient) {
        self.session.refresh(client).await;
        self.is_homepage = is_homepage(&self.location.pathname());
    }

    /// Back/forward navigation only refreshes the homepage flag
    pub fn on_history_change(&mut self) {
        self.is_homepage = is_homepage(&self.location.pathname());
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn user(&self) -> Option<User> {
        self.session.user()
    }

    pub fn shows_login_button(&self) -> bool {
        self.is_homepage && !self.is_logged_in()
    }

    pub fn shows_account_menu(&self) -> bool {
        self.is_logged_in()
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn go_to_login(&self) {
        self.location.assign(crate::location::LOGIN_PATH);
    }

    pub fn go_to_profile(&self) {
        self.location.assign("/profile");
    }

    pub fn go_to_settings(&mut self) {
        self.menu_open = false;
        self.location.assign("/settings");
    }

    pub async fn logout(&mut self, client: &ApiClient) {
        self.session.logout(client).await;
        self.menu_open = false;
        self.location.assign(HOME_PATH);
    }
}
