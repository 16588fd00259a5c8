use crate::common::scenarios::session_scenario::string;
use crate::common::{TestApp, ADMIN_PASSWORD};
use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

const PASSWORD: &str = "secret";

pub async fn run(app: &TestApp) {
    let alice = create_user(app, "alice@x.com", "alice").await;
    let bob = create_user(app, "bob@x.com", "bob").await;
    let alice_token = login(app, "alice@x.com", PASSWORD).await;

    // Users can look themselves up by ID, email or username
    for uri in [
        format!("/api/users/{}", alice["id"].as_str().unwrap_or_default()),
        "/api/users/alice@x.com?search_type=email".to_string(),
        "/api/users/alice?search_type=username".to_string(),
    ] {
        let (status, user) = app.get(&uri, Some(&alice_token)).await;
        assert_eq!(status, StatusCode::OK, "GET {uri}");
        assert_eq!(user["id"], alice["id"]);
    }

    // Anybody else requires an administrator, whether the user exists or not
    for uri in [
        format!("/api/users/{}", bob["id"].as_str().unwrap_or_default()),
        "/api/users/bob?search_type=username".to_string(),
        "/api/users/nobody?search_type=username".to_string(),
    ] {
        let (status, _) = app.get(&uri, Some(&alice_token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "GET {uri}");
    }

    let (status, error) = app
        .get("/api/users/alice?search_type=phone", Some(&alice_token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "invalid_search_type");
    let (status, error) = app.get("/api/users/not-a-uuid", Some(&alice_token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "invalid_user_id");

    // Administrators can look up anybody
    let admin_token = login(app, &app.admin_email(), ADMIN_PASSWORD).await;
    let (status, user) = app
        .get("/api/users/BOB@x.com?search_type=email", Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["id"], bob["id"]);
    let (status, user) = app
        .get("/api/users/bob?search_type=username", Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["id"], bob["id"]);

    let (status, _) = app
        .get("/api/users/nobody?search_type=username", Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .get(&format!("/api/users/{}", Uuid::new_v4()), Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn create_user(app: &TestApp, email: &str, username: &str) -> Value {
    let (status, user) = app
        .post(
            "/api/create_user",
            None,
            json!({ "email": email, "username": username, "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    user
}

async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let (status, tokens) = app
        .post(
            "/api/login",
            None,
            json!({ "email": email, "password": password }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    string(&tokens, "auth_token")
}
