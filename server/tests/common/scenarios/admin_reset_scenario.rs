use crate::common::scenarios::session_scenario::string;
use crate::common::{TestApp, ADMIN_PASSWORD};
use axum::http::{Method, StatusCode};
use serde_json::json;

pub async fn run(app: &TestApp) {
    let admin_email = app.admin_email();
    let (status, _) = app
        .post(
            "/api/create_user",
            None,
            json!({ "email": "b@x.com", "username": "bob", "password": "secret" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, user_tokens) = app
        .post(
            "/api/login",
            None,
            json!({ "email": "b@x.com", "password": "secret" }),
        )
        .await;

    let (status, admin_tokens) = app
        .post(
            "/api/login",
            None,
            json!({ "email": admin_email, "password": ADMIN_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let admin_token = string(&admin_tokens, "auth_token");

    let (status, users) = app.get("/api/users", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(users.as_array().is_some_and(|users| users.len() >= 2));

    let (status, admin) = app.post("/admin/reset", Some(&admin_token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(admin["is_admin"], true);

    // Every refresh token issued before the reset is dead
    for tokens in [&user_tokens, &admin_tokens] {
        let (status, _) = app
            .post(
                "/api/refresh",
                None,
                json!({ "refresh_token": string(tokens, "refresh_token") }),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // The previous admin identity no longer resolves
    let (status, _) = app.get("/api/users/me", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/api/login",
            None,
            json!({ "email": "b@x.com", "password": "secret" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The recreated admin can log in with the default credential
    let (status, tokens) = app
        .post(
            "/api/login",
            None,
            json!({ "email": admin_email, "password": ADMIN_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let admin_token = string(&tokens, "auth_token");
    let (status, users) = app.get("/api/users", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().map(Vec::len), Some(1));
    assert_eq!(users[0]["id"], admin["id"]);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/users/{}", admin["id"].as_str().unwrap_or_default()),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
