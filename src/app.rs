use log::debug;
use std::sync::Arc;
use std::time::Duration;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::{HestiaError, Result};
use crate::location::{Location, MemoryLocation};
use crate::router::Route;
use crate::screens::Screen;
use crate::search::SearchComposer;
use crate::session::{SessionContext, SessionIndicator};

/// Builder for wiring a [`Hestia`] client
#[derive(Default)]
pub struct HestiaBuilder {
    config: Option<ClientConfig>,
    base_url: Option<String>,
    location: Option<Arc<dyn Location>>,
    timeout: Option<Duration>,
    debounce: Option<Duration>,
}

impl HestiaBuilder {
    /// Use an explicit configuration instead of loading `hestia.toml`/`HESTIA__*`
    ///
    /// # Example
    /// ```
    /// use hestia_client::{ClientConfig, Hestia};
    ///
    /// let builder = Hestia::builder().config(ClientConfig::default());
    /// ```
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the backend base URL
    ///
    /// # Example
    /// ```
    /// use hestia_client::Hestia;
    ///
    /// let builder = Hestia::builder().base_url("https://hestia.example");
    /// ```
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Share an existing location (e.g. one owned by an embedding shell)
    pub fn location(mut self, location: Arc<dyn Location>) -> Self {
        self.location = Some(location);
        self
    }

    /// Start from an in-memory location at `path`
    ///
    /// # Example
    /// ```
    /// use hestia_client::Hestia;
    ///
    /// let builder = Hestia::builder().path("/kitchen");
    /// ```
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.location = Some(Arc::new(MemoryLocation::new(path)));
        self
    }

    /// Set a timeout for HTTP requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the free-text search quiescence window
    pub fn debounce(mut self, duration: Duration) -> Self {
        self.debounce = Some(duration);
        self
    }

    /// Assemble the client
    ///
    /// # Errors
    /// Returns `HestiaError` if configuration cannot be loaded, the base URL
    /// is empty, or the HTTP client cannot be constructed.
    pub fn build(self) -> Result<Hestia> {
        let mut config = match self.config {
            Some(config) => config,
            None => ClientConfig::load()?,
        };

        if let Some(url) = self.base_url {
            config.api_base_url = url;
        }
        if config.api_base_url.trim().is_empty() {
            return Err(HestiaError::Builder(
                "No backend URL configured. Use .base_url() or HESTIA__API_BASE_URL".to_string(),
            ));
        }
        if let Some(timeout) = self.timeout {
            config.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        }
        if let Some(debounce) = self.debounce {
            config.search.debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        }

        let location = self
            .location
            .unwrap_or_else(|| Arc::new(MemoryLocation::new("/")));
        let session = SessionContext::new();
        let client = ApiClient::new(&config, session.clone(), location.clone())?;
        debug!("Hestia client ready for {}", client.base_url());

        Ok(Hestia {
            config,
            session,
            location,
            client,
        })
    }
}

/// A wired client: configuration, shared session, location and HTTP adapter
pub struct Hestia {
    config: ClientConfig,
    session: SessionContext,
    location: Arc<dyn Location>,
    client: ApiClient,
}

impl Hestia {
    pub fn builder() -> HestiaBuilder {
        HestiaBuilder::default()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn location(&self) -> &Arc<dyn Location> {
        &self.location
    }

    /// Route for the current location
    pub fn route(&self) -> Route {
        Route::resolve(&self.location.pathname())
    }

    /// Screen for the current location, not yet mounted
    pub fn dispatch(&self) -> Screen {
        let route = self.route();
        debug!("Dispatching {} to {:?}", self.location.pathname(), route);
        Screen::for_route(route, &self.client, &self.config.search)
    }

    pub fn session_indicator(&self) -> SessionIndicator {
        SessionIndicator::new(self.session.clone(), self.location.clone())
    }

    /// A standalone search composer using this client as its backend
    pub fn search_composer(&self) -> SearchComposer {
        SearchComposer::new(Arc::new(self.client.clone()), self.config.search.clone())
    }
}
