//! Integration tests for the HTTP API: auth, role gating, catalog CRUD,
//! prefix search, and the favourites endpoints.

use anidex::config::Config;
use anidex::models::role::{ADMIN_ROLE_ID, CLIENT_ROLE_ID};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Admin registration code from the default config (must match
/// `AuthConfig::default`).
const ADMIN_CODE: &str = "@admin123";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let state = anidex::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    anidex::api::router(state).await
}

async fn body_json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn delete_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    payload: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

async fn register(
    app: &Router,
    username: &str,
    password: &str,
    role_id: i32,
    admin_code: Option<&str>,
) -> Response {
    let mut payload = serde_json::json!({
        "username": username,
        "password": password,
        "role_id": role_id,
    });
    if let Some(code) = admin_code {
        payload["admin_code"] = serde_json::json!(code);
    }

    app.clone()
        .oneshot(json_request("POST", "/api/auth/register", None, &payload))
        .await
        .unwrap()
}

async fn login_token(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &serde_json::json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["data"]["token"]
        .as_str()
        .expect("login should return a token")
        .to_string()
}

/// Registers an Admin account with the configured code and logs it in.
async fn admin_token(app: &Router) -> String {
    let response = register(app, "admin", "admin-pw", ADMIN_ROLE_ID, Some(ADMIN_CODE)).await;
    assert_eq!(response.status(), StatusCode::OK);
    login_token(app, "admin", "admin-pw").await
}

/// Registers a Client account and logs it in. Password is always "client-pw".
async fn client_token(app: &Router, username: &str) -> String {
    let response = register(app, username, "client-pw", CLIENT_ROLE_ID, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    login_token(app, username, "client-pw").await
}

async fn create_anime(app: &Router, token: &str, english: &str, japanese: Option<&str>) -> i64 {
    let payload = serde_json::json!({
        "english_title": english,
        "japanese_title": japanese,
        "image_url": "https://cdn.example/cover.jpg",
        "synopsis": "Test synopsis",
        "episodes": 24,
        "score": 8.1,
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/anime", Some(token), &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["data"]["id"]
        .as_i64()
        .expect("created anime should have an id")
}

#[tokio::test]
async fn test_register_and_login_round_trip() {
    let app = spawn_app().await;

    let response = register(&app, "alice", "pw1", CLIENT_ROLE_ID, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["username"], "alice");
    assert_eq!(json["data"]["role_id"], CLIENT_ROLE_ID);

    // Wrong password is a credential failure, not an error page.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &serde_json::json!({ "username": "alice", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());

    let token = login_token(&app, "alice", "pw1").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_duplicate_username_is_a_conflict() {
    let app = spawn_app().await;

    let first = register(&app, "bob", "pw1", CLIENT_ROLE_ID, None).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = register(&app, "bob", "pw2", CLIENT_ROLE_ID, None).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let json = body_json(second).await;
    assert_eq!(json["success"], false);
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("Username already used")
    );

    // The first registration survived; the second never stuck.
    login_token(&app, "bob", "pw1").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &serde_json::json!({ "username": "bob", "password": "pw2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_usernames_are_case_sensitive() {
    let app = spawn_app().await;

    let response = register(&app, "alice", "pw1", CLIENT_ROLE_ID, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // A differently-cased username is a different account entirely.
    let response = register(&app, "Alice", "pw2", CLIENT_ROLE_ID, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &serde_json::json!({ "username": "ALICE", "password": "pw1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/api/auth/is-admin", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get_request("/api/auth/is-admin", Some("not-a-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A token signed with the wrong secret is rejected the same way.
    let forged = anidex::services::TokenIssuer::new("not-the-secret".to_string(), 3)
        .issue(&anidex::db::Account {
            id: 1,
            username: "mallory".to_string(),
            role_id: CLIENT_ROLE_ID,
            created_at: String::new(),
            updated_at: String::new(),
        })
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/api/auth/is-admin", Some(&forged)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/anime",
            None,
            &serde_json::json!({
                "english_title": "Sneaky",
                "image_url": "https://cdn.example/x.jpg",
                "synopsis": "No token",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_registration_requires_the_code() {
    let app = spawn_app().await;

    let response = register(&app, "eve", "pw", ADMIN_ROLE_ID, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = register(&app, "eve", "pw", ADMIN_ROLE_ID, Some("wrong-code")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = register(&app, "eve", "pw", ADMIN_ROLE_ID, Some(ADMIN_CODE)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The new admin can actually mutate the catalog.
    let token = login_token(&app, "eve", "pw").await;
    let id = create_anime(&app, &token, "Steins;Gate", None).await;
    assert!(id > 0);
}

#[tokio::test]
async fn test_unknown_role_is_rejected() {
    let app = spawn_app().await;

    let response = register(&app, "zed", "pw", 99, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("role"));
}

#[tokio::test]
async fn test_catalog_mutation_is_admin_only() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let client = client_token(&app, "carol").await;

    let payload = serde_json::json!({
        "english_title": "Bleach",
        "japanese_title": "ブリーチ",
        "image_url": "https://cdn.example/bleach.jpg",
        "synopsis": "Soul reapers",
        "episodes": 366,
        "score": 7.9,
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/anime", Some(&client), &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let id = create_anime(&app, &admin, "Bleach", Some("ブリーチ")).await;

    // Reads are public.
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/anime/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["english_title"], "Bleach");

    // Clients can neither update nor delete.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/anime/{id}"),
            Some(&client),
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/anime/{id}"), Some(&client)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admin update replaces the stored fields.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/anime/{id}"),
            Some(&admin),
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["episodes"], 366);

    // Updating an id that does not exist is a 404.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/anime/99999",
            Some(&admin),
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Delete reports whether a row was removed; a second delete is not an
    // error, it just reports false.
    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/anime/{id}"), Some(&admin)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], true);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/anime/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/anime/{id}"), Some(&admin)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], false);
}

#[tokio::test]
async fn test_batch_create() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;

    let payload = serde_json::json!([
        {
            "english_title": "Fullmetal Alchemist",
            "image_url": "https://cdn.example/fma.jpg",
            "synopsis": "Equivalent exchange",
        },
        {
            "english_title": "Fullmetal Alchemist: Brotherhood",
            "image_url": "https://cdn.example/fmab.jpg",
            "synopsis": "Equivalent exchange, again",
        },
    ]);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/anime/range",
            Some(&admin),
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(get_request("/api/anime", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    // An empty batch is rejected before touching the database.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/anime/range",
            Some(&admin),
            &serde_json::json!([]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_role_cannot_hold_favourites() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let id = create_anime(&app, &admin, "Monster", None).await;

    let response = app
        .clone()
        .oneshot(post_request(
            &format!("/api/anime/favourites/{id}"),
            Some(&admin),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(get_request("/api/anime/favourites", Some(&admin)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_favourites_round_trip() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let anime_id = create_anime(&app, &admin, "Naruto", Some("ナルト")).await;
    let client = client_token(&app, "alice").await;

    let status_uri = format!("/api/anime/favourites/{anime_id}");

    let response = app
        .clone()
        .oneshot(get_request(&status_uri, Some(&client)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["favourite"], false);

    let response = app
        .clone()
        .oneshot(post_request(&status_uri, Some(&client)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["favourite"], true);

    // Adding the same pair again is a conflict, not a silent no-op.
    let response = app
        .clone()
        .oneshot(post_request(&status_uri, Some(&client)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(get_request(&status_uri, Some(&client)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["favourite"], true);

    let response = app
        .clone()
        .oneshot(get_request("/api/anime/favourites", Some(&client)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let favourites = json["data"].as_array().unwrap();
    assert_eq!(favourites.len(), 1);
    assert_eq!(favourites[0]["english_title"], "Naruto");

    let response = app
        .clone()
        .oneshot(delete_request(&status_uri, Some(&client)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], true);

    let response = app
        .clone()
        .oneshot(get_request(&status_uri, Some(&client)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["favourite"], false);

    // Removing a link that is already gone reports false.
    let response = app
        .clone()
        .oneshot(delete_request(&status_uri, Some(&client)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], false);
}

#[tokio::test]
async fn test_prefix_search_is_case_sensitive() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;

    create_anime(&app, &admin, "Naruto", Some("ナルト")).await;
    create_anime(&app, &admin, "Naruto Shippuden", Some("ナルト 疾風伝")).await;
    create_anime(&app, &admin, "Attack on Titan", Some("進撃の巨人")).await;

    let response = app
        .clone()
        .oneshot(get_request("/api/anime/search?q=Naruto", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    // Lowercase prefix matches nothing against capitalized titles.
    let response = app
        .clone()
        .oneshot(get_request("/api/anime/search?q=naruto", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 0);

    // Japanese titles participate in the prefix match ("進撃").
    let response = app
        .clone()
        .oneshot(get_request("/api/anime/search?q=%E9%80%B2%E6%92%83", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let results = json["data"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["english_title"], "Attack on Titan");

    let response = app
        .clone()
        .oneshot(get_request("/api/anime/search?q=", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_change_password_round_trip() {
    let app = spawn_app().await;
    let token = client_token(&app, "dana").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/auth/password",
            Some(&token),
            &serde_json::json!({
                "current_password": "wrong",
                "new_password": "fresh-pw",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/auth/password",
            Some(&token),
            &serde_json::json!({
                "current_password": "client-pw",
                "new_password": "fresh-pw",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The old credential is dead; the new one works.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &serde_json::json!({ "username": "dana", "password": "client-pw" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    login_token(&app, "dana", "fresh-pw").await;
}

#[tokio::test]
async fn test_is_admin_probe() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let client = client_token(&app, "carl").await;

    let response = app
        .clone()
        .oneshot(get_request("/api/auth/is-admin", Some(&admin)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["is_admin"], true);

    let response = app
        .clone()
        .oneshot(get_request("/api/auth/is-admin", Some(&client)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["is_admin"], false);
}

#[tokio::test]
async fn test_invalid_anime_ids_are_rejected() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/api/anime/0", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get_request("/api/anime/-5", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/api/system/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(content_type.contains("application/json"));

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "anidex");
    assert!(json["data"]["version"].is_string());

    let response = app
        .clone()
        .oneshot(get_request("/api/system/health/ready", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["ready"], true);
}
