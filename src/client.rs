//! HTTP client adapter for the Hestia backend.
//!
//! Every call goes through one cookie-carrying `reqwest::Client`. Failed
//! responses are normalized into [`HestiaError`], and a 401 invalidates the
//! shared session and sends the page to the login screen.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::{HestiaError, Result, GENERIC_REQUEST_FAILURE};
use crate::location::{Location, LOGIN_PATH};
use crate::model::{
    IngredientSearchParams, LoginRequest, Recipe, SearchParams, SignupRequest, User,
};
use crate::session::SessionContext;

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Search operations the composer depends on
#[async_trait]
pub trait RecipeBackend: Send + Sync {
    async fn search_recipes(&self, params: &SearchParams) -> Result<Vec<Recipe>>;

    async fn search_by_ingredients(&self, params: &IngredientSearchParams) -> Result<Vec<Recipe>>;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionContext,
    location: Arc<dyn Location>,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(
        config: &ClientConfig,
        session: SessionContext,
        location: Arc<dyn Location>,
    ) -> Result<Self> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(ApiClient {
            client: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
            location,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(
        base_url: impl Into<String>,
        session: SessionContext,
        location: Arc<dyn Location>,
    ) -> Result<Self> {
        let config = ClientConfig {
            api_base_url: base_url.into(),
            ..ClientConfig::default()
        };
        Self::new(&config, session, location)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn location(&self) -> &Arc<dyn Location> {
        &self.location
    }

    /// Send a request with credentials, without interpreting the response status
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            // .json() also sets Content-Type: application/json
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Send a request and decode a successful JSON response.
    ///
    /// Non-2xx responses become [`HestiaError::Request`] carrying the backend's
    /// `detail`, or "Request failed" when there is none. A 401 also clears the
    /// cached user and redirects to `/login` unless the page is already there.
    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_with_fallback(method, path, body, GENERIC_REQUEST_FAILURE)
            .await
    }

    /// Like [`ApiClient::request`] with a caller-chosen fallback message
    pub async fn request_with_fallback<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        fallback: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, body).await?;
        let response = self.check_status(response, fallback).await?;
        Ok(response.json().await?)
    }

    async fn check_status(&self, response: Response, fallback: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
            return Err(HestiaError::NotAuthenticated);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(ErrorBody {
                detail: Some(detail),
            }) if !detail.is_empty() => detail,
            _ => fallback.to_string(),
        };
        warn!("Request failed with status {}: {}", status, message);

        Err(HestiaError::Request {
            status: status.as_u16(),
            message,
        })
    }

    fn handle_unauthorized(&self) {
        self.session.clear();
        if self.location.pathname() != LOGIN_PATH {
            warn!("Session rejected by backend, redirecting to {}", LOGIN_PATH);
            self.location.assign(LOGIN_PATH);
        }
    }

    /// `POST /signup`
    pub async fn signup(&self, body: &SignupRequest) -> Result<User> {
        self.request_with_fallback(Method::POST, "/signup", Some(body), "Registration failed")
            .await
    }

    /// `POST /login`.
    ///
    /// The backend only acknowledges the login and sets the session cookie,
    /// so the body is ignored. Use [`ApiClient::current_user`] for the user.
    pub async fn login(&self, body: &LoginRequest) -> Result<()> {
        let response = self.send(Method::POST, "/login", Some(body)).await?;
        self.check_status(response, "Login failed").await?;
        Ok(())
    }

    /// `GET /auth/me`.
    ///
    /// Never redirects: a 401 here just means nobody is logged in.
    pub async fn current_user(&self) -> Result<User> {
        let response = self.send::<()>(Method::GET, "/auth/me", None).await?;
        Ok(check_status_quietly(response)?.json().await?)
    }

    /// `POST /logout`; the response body is ignored and a 401 does not redirect
    pub async fn logout(&self) -> Result<()> {
        let response = self.send::<()>(Method::POST, "/logout", None).await?;
        check_status_quietly(response)?;
        Ok(())
    }

    /// `GET /api/recipes/{id}`
    pub async fn get_recipe(&self, id: u64) -> Result<Recipe> {
        self.request::<_, ()>(Method::GET, &format!("/api/recipes/{}", id), None)
            .await
    }

    /// `DELETE /api/recipes/{id}`
    pub async fn delete_recipe(&self, id: u64) -> Result<()> {
        let path = format!("/api/recipes/{}", id);
        let response = self.send::<()>(Method::DELETE, &path, None).await?;
        self.check_status(response, "Failed to delete recipe").await?;
        Ok(())
    }

    /// `GET /api/recipes`, one page of the newest recipes (pages start at 1)
    pub async fn list_recipes(&self, page: u32, limit: u32) -> Result<Vec<Recipe>> {
        let offset = page.saturating_sub(1) * limit;
        let path = format!("/api/recipes?limit={}&offset={}", limit, offset);
        self.request::<_, ()>(Method::GET, &path, None).await
    }
}

/// Status check for calls that must not trigger the 401 redirect
fn check_status_quietly(response: Response) -> Result<Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(HestiaError::NotAuthenticated),
        status => Err(HestiaError::Request {
            status: status.as_u16(),
            message: GENERIC_REQUEST_FAILURE.to_string(),
        }),
    }
}

#[async_trait]
impl RecipeBackend for ApiClient {
    /// `GET /api/recipes/search?q=&limit=&offset=`
    async fn search_recipes(&self, params: &SearchParams) -> Result<Vec<Recipe>> {
        let url = format!("{}/api/recipes/search", self.base_url);
        debug!("GET {} q={:?}", url, params.q);

        let response = self
            .client
            .get(url)
            .query(&[
                ("q", params.q.clone()),
                ("limit", params.limit.to_string()),
                ("offset", params.offset.to_string()),
            ])
            .send()
            .await?;
        let response = self.check_status(response, GENERIC_REQUEST_FAILURE).await?;
        Ok(response.json().await?)
    }

    /// `POST /api/recipes/search/ingredients`
    async fn search_by_ingredients(&self, params: &IngredientSearchParams) -> Result<Vec<Recipe>> {
        self.request(Method::POST, "/api/recipes/search/ingredients", Some(params))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::MemoryLocation;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server, path: &str) -> (ApiClient, Arc<MemoryLocation>) {
        let location = Arc::new(MemoryLocation::new(path));
        let client =
            ApiClient::with_base_url(server.url(), SessionContext::new(), location.clone()).unwrap();
        (client, location)
    }

    #[tokio::test]
    async fn test_error_detail_is_surfaced() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/recipes/9")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "Recipe not found"}"#)
            .create();

        let (client, _) = client_for(&server, "/recipe/9");
        let err = client.get_recipe(9).await.unwrap_err();
        assert_eq!(err.to_string(), "Recipe not found");
        assert_eq!(err.status(), Some(404));
        mock.assert();
    }

    #[tokio::test]
    async fn test_unparseable_error_body_uses_generic_message() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/recipes/9")
            .with_status(500)
            .with_body("Internal Server Error")
            .create();

        let (client, _) = client_for(&server, "/recipe/9");
        let err = client.get_recipe(9).await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed");
    }

    #[tokio::test]
    async fn test_unauthorized_redirects_and_clears_session() {
        let mut server = Server::new_async().await;
        let _m = server.mock("GET", "/api/recipes/3").with_status(401).create();

        let (client, location) = client_for(&server, "/recipe/3");
        client.session().set_user(User {
            id: 1,
            username: "cook".to_string(),
            email: "cook@example.com".to_string(),
        });

        let err = client.get_recipe(3).await.unwrap_err();
        assert!(matches!(err, HestiaError::NotAuthenticated));
        assert!(!client.session().is_logged_in());
        assert_eq!(location.navigations(), vec!["/login"]);
    }

    #[tokio::test]
    async fn test_unauthorized_on_login_page_does_not_redirect() {
        let mut server = Server::new_async().await;
        let _m = server.mock("GET", "/api/recipes/3").with_status(401).create();

        let (client, location) = client_for(&server, "/login");
        let err = client.get_recipe(3).await.unwrap_err();
        assert!(matches!(err, HestiaError::NotAuthenticated));
        assert!(location.navigations().is_empty());
    }

    #[tokio::test]
    async fn test_current_user_401_never_redirects() {
        let mut server = Server::new_async().await;
        let _m = server.mock("GET", "/auth/me").with_status(401).create();

        let (client, location) = client_for(&server, "/");
        assert!(client.current_user().await.is_err());
        assert!(location.navigations().is_empty());
    }

    #[tokio::test]
    async fn test_search_sends_query_parameters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/recipes/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "mac and cheese".into()),
                Matcher::UrlEncoded("limit".into(), "20".into()),
                Matcher::UrlEncoded("offset".into(), "0".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create();

        let (client, _) = client_for(&server, "/kitchen");
        let recipes = client
            .search_recipes(&SearchParams::new("mac and cheese"))
            .await
            .unwrap();
        assert!(recipes.is_empty());
        mock.assert();
    }

    #[tokio::test]
    async fn test_list_recipes_computes_offset() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/recipes")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "10".into()),
                Matcher::UrlEncoded("offset".into(), "20".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create();

        let (client, _) = client_for(&server, "/kitchen");
        client.list_recipes(3, 10).await.unwrap();
        mock.assert();
    }
}
