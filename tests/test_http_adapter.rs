use hestia_client::model::{IngredientSearchParams, SearchParams};
use hestia_client::{ClientConfig, Hestia, HestiaError, Location, MemoryLocation, RecipeBackend, User};
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;

fn hestia_at(url: String, path: &str) -> (Hestia, Arc<MemoryLocation>) {
    let location = Arc::new(MemoryLocation::new(path));
    let hestia = Hestia::builder()
        .config(ClientConfig::default())
        .base_url(url)
        .location(location.clone())
        .build()
        .unwrap();
    (hestia, location)
}

fn cook() -> User {
    User {
        id: 4,
        username: "cook".to_string(),
        email: "cook@example.com".to_string(),
    }
}

#[tokio::test]
async fn test_401_while_on_login_page_does_not_redirect() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/api/recipes/search/ingredients")
        .with_status(401)
        .with_body(r#"{"detail": "Not authenticated"}"#)
        .create();

    let (hestia, location) = hestia_at(server.url(), "/login");
    let result = hestia
        .client()
        .search_by_ingredients(&IngredientSearchParams::new(vec!["egg".to_string()], false))
        .await;

    assert!(matches!(result, Err(HestiaError::NotAuthenticated)));
    assert_eq!(location.pathname(), "/login");
    assert!(location.navigations().is_empty());
}

#[tokio::test]
async fn test_401_elsewhere_redirects_once_and_clears_user() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/recipes/5")
        .with_status(401)
        .create();

    let (hestia, location) = hestia_at(server.url(), "/recipe/5");
    hestia.session().set_user(cook());

    let result = hestia.client().get_recipe(5).await;
    assert!(matches!(result, Err(HestiaError::NotAuthenticated)));
    assert!(hestia.session().user().is_none());
    assert_eq!(location.navigations(), vec!["/login"]);

    // Now on /login, a second 401 must not navigate again
    let _ = hestia.client().get_recipe(5).await;
    assert_eq!(location.navigations(), vec!["/login"]);
}

#[tokio::test]
async fn test_ingredient_search_body_shape() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/recipes/search/ingredients")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "ingredients": ["tomato", "basil"],
            "match_all": true,
            "limit": 20,
            "offset": 0
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{
                "id": 11,
                "title": "Caprese",
                "ingredients": [{"name": "tomato"}, {"name": "basil"}],
                "instructions": "Slice.\nLayer.",
                "user_id": 2,
                "created_at": "2024-06-01T12:00:00",
                "updated_at": "2024-06-01T12:00:00"
            }]"#,
        )
        .create();

    let (hestia, _) = hestia_at(server.url(), "/kitchen");
    let recipes = hestia
        .client()
        .search_by_ingredients(&IngredientSearchParams::new(
            vec!["tomato".to_string(), "basil".to_string()],
            true,
        ))
        .await
        .unwrap();

    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].title, "Caprese");
    assert_eq!(recipes[0].steps(), vec!["Slice.", "Layer."]);
    mock.assert();
}

#[tokio::test]
async fn test_search_keeps_recipes_with_unknown_times() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/recipes/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"id": 1, "title": "Pasta alla Norma", "ingredients": ["aubergine"],
                 "instructions": "Fry.", "prep_time": -1, "cook_time": -1,
                 "servings": 4, "user_id": 2},
                {"id": 2, "title": "Pasta e ceci", "ingredients": ["chickpeas"],
                 "instructions": "Simmer.", "prep_time": 5, "cook_time": 25,
                 "servings": 2, "user_id": 2}
            ]"#,
        )
        .create();

    let (hestia, _) = hestia_at(server.url(), "/kitchen");
    let recipes = hestia
        .client()
        .search_recipes(&SearchParams::new("pasta"))
        .await
        .unwrap();

    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0].total_time(), None);
    assert_eq!(recipes[1].total_time(), Some(30));
}

#[tokio::test]
async fn test_error_body_without_detail_uses_generic_message() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/recipes/8")
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"errors": ["bad id"]}"#)
        .create();

    let (hestia, _) = hestia_at(server.url(), "/recipe/8");
    let err = hestia.client().get_recipe(8).await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed");
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn test_session_check_treats_any_failure_as_logged_out() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/auth/me")
        .with_status(500)
        .create();

    let (hestia, location) = hestia_at(server.url(), "/");
    hestia.session().set_user(cook());
    assert!(hestia.session().refresh(hestia.client()).await.is_none());
    assert!(!hestia.session().is_logged_in());
    assert!(location.navigations().is_empty());

    // Nothing listening here: a network failure collapses to logged out too
    let (offline, _) = hestia_at("http://127.0.0.1:1".to_string(), "/");
    assert!(offline.session().refresh(offline.client()).await.is_none());
    assert!(offline.session().snapshot().checked);
}

#[tokio::test]
async fn test_session_check_caches_user() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/auth/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 4, "username": "cook", "email": "cook@example.com"}"#)
        .expect(1)
        .create();

    let (hestia, _) = hestia_at(server.url(), "/");
    assert_eq!(hestia.session().refresh(hestia.client()).await, Some(cook()));
    // A second screen reuses the cached check
    assert_eq!(
        hestia.session().ensure_checked(hestia.client()).await,
        Some(cook())
    );
    mock.assert();
}

#[tokio::test]
async fn test_logout_clears_local_state_even_when_backend_fails() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/logout")
        .with_status(500)
        .create();

    let (hestia, location) = hestia_at(server.url(), "/kitchen");
    hestia.session().set_user(cook());

    let mut indicator = hestia.session_indicator();
    indicator.logout(hestia.client()).await;

    assert!(!hestia.session().is_logged_in());
    assert!(!indicator.shows_account_menu());
    assert_eq!(location.pathname(), "/");
    mock.assert();
}
