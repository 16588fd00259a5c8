use crate::common::TestApp;
use axum::http::{Method, StatusCode};
use chrono::TimeDelta;
use serde_json::{json, Value};

const EMAIL: &str = "a@x.com";
const PASSWORD: &str = "secret";

pub async fn run(app: &TestApp) {
    // Registration
    let (status, user) = app
        .post(
            "/api/create_user",
            None,
            json!({ "email": EMAIL, "username": "alice", "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], EMAIL);
    assert!(user.get("password").is_none());

    let (status, _) = app
        .post(
            "/api/create_user",
            None,
            json!({ "email": EMAIL, "username": "alice", "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Wrong password and unknown email look the same
    let (wrong_password_status, wrong_password) = app
        .post(
            "/api/login",
            None,
            json!({ "email": EMAIL, "password": "nope" }),
        )
        .await;
    let (unknown_email_status, unknown_email) = app
        .post(
            "/api/login",
            None,
            json!({ "email": "b@x.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_email);

    // Login
    let (status, tokens) = app
        .post(
            "/api/login",
            None,
            json!({ "email": EMAIL, "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let auth_token = string(&tokens, "auth_token");
    let refresh_token = string(&tokens, "refresh_token");
    assert_eq!(refresh_token.len(), 64);
    assert!(refresh_token
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));

    // Protected resource
    let (status, me) = app.get("/api/users/me", Some(&auth_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user["id"]);
    let (status, _) = app.get("/api/users/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.get("/api/users/me", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Regular users are not administrators
    let (status, _) = app.get("/api/users", Some(&auth_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.post("/admin/reset", Some(&auth_token), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Refresh mints a new access token for the same subject
    app.clock.advance(TimeDelta::seconds(1));
    let (status, refreshed) = app
        .post(
            "/api/refresh",
            None,
            json!({ "refresh_token": refresh_token }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let refreshed_token = string(&refreshed, "auth_token");
    let (status, me) = app.get("/api/users/me", Some(&refreshed_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user["id"]);

    // Access tokens expire after their lifetime
    app.clock.advance(TimeDelta::days(7));
    let (status, _) = app.get("/api/users/me", Some(&auth_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Logout is idempotent and revokes the refresh token
    for _ in 0..2 {
        let (status, _) = app
            .post("/api/logout", None, json!({ "refresh_token": refresh_token }))
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
    let (status, error) = app
        .post(
            "/api/refresh",
            None,
            json!({ "refresh_token": refresh_token }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error["code"], "invalid_credentials");

    let (status, _) = app.post("/api/refresh", None, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Password change revokes every refresh token of the user
    let (_, tokens) = app
        .post(
            "/api/login",
            None,
            json!({ "email": EMAIL, "password": PASSWORD }),
        )
        .await;
    let auth_token = string(&tokens, "auth_token");
    let refresh_token = string(&tokens, "refresh_token");
    let (status, _) = app
        .send(
            Method::PUT,
            "/api/users/password",
            Some(&auth_token),
            Some(json!({ "current_password": PASSWORD, "new_password": "new-secret" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .post(
            "/api/refresh",
            None,
            json!({ "refresh_token": refresh_token }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app
        .post(
            "/api/login",
            None,
            json!({ "email": EMAIL, "password": "new-secret" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

pub fn string(value: &Value, key: &str) -> String {
    value[key]
        .as_str()
        .unwrap_or_else(|| panic!("Missing {key} in: {value}"))
        .to_string()
}
