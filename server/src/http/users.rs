use crate::auth::authenticator::Identity;
use crate::auth::session_service::UserLookup;
use crate::error::AuthError;
use crate::http::error::CustomError;
use crate::http::shared::AppState;
use crate::users::user::UserInfo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Deserialize)]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserSearch {
    pub search_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub auth_token: String,
    pub refresh_token: String,
    pub auth_token_expiry: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub auth_token: String,
    pub auth_token_expiry: u64,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/create_user", post(create_user))
        .route("/api/login", post(login_user))
        .route("/api/refresh", post(refresh_token))
        .route("/api/logout", post(logout_user))
        .route("/api/users", get(get_users))
        .route("/api/users/me", get(get_me))
        .route("/api/users/password", put(change_password))
        .route("/api/users/{search_arg}", get(get_user).delete(delete_user))
        .with_state(state)
}

#[instrument(skip_all, name = "trace_create_user")]
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(command): Json<CreateUser>,
) -> Result<(StatusCode, Json<UserInfo>), CustomError> {
    let user = state
        .session_service
        .create_user(&command.email, &command.username, &command.password)
        .await?;
    Ok((StatusCode::CREATED, Json(UserInfo::from(&user))))
}

#[instrument(skip_all, name = "trace_login_user")]
async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(command): Json<LoginUser>,
) -> Result<Json<LoginResponse>, CustomError> {
    let tokens = state
        .session_service
        .login(&command.email, &command.password)
        .await?;
    Ok(Json(LoginResponse {
        auth_token: tokens.access_token.access_token,
        refresh_token: tokens.refresh_token.token,
        auth_token_expiry: tokens.access_token.access_token_expiry,
    }))
}

#[instrument(skip_all, name = "trace_refresh_token")]
async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(command): Json<RefreshTokenRequest>,
) -> Result<Json<RefreshResponse>, CustomError> {
    let token = state
        .session_service
        .refresh(&command.refresh_token)
        .await?;
    Ok(Json(RefreshResponse {
        auth_token: token.access_token,
        auth_token_expiry: token.access_token_expiry,
    }))
}

#[instrument(skip_all, name = "trace_logout_user")]
async fn logout_user(
    State(state): State<Arc<AppState>>,
    Json(command): Json<RefreshTokenRequest>,
) -> Result<StatusCode, CustomError> {
    state
        .session_service
        .logout(&command.refresh_token)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<UserInfo>, CustomError> {
    let user = state.session_service.get_user(identity.user_id).await?;
    Ok(Json(UserInfo::from(&user)))
}

async fn get_users(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<UserInfo>>, CustomError> {
    state.session_service.ensure_admin(&identity)?;
    let users = state.session_service.get_users().await?;
    Ok(Json(users.iter().map(UserInfo::from).collect()))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(search_arg): Path<String>,
    Query(search): Query<UserSearch>,
) -> Result<Json<UserInfo>, CustomError> {
    let lookup = match search.search_type.as_deref() {
        None => UserLookup::Id(parse_user_id(&search_arg)?),
        Some("email") => UserLookup::Email(search_arg),
        Some("username") => UserLookup::Username(search_arg),
        Some(other) => return Err(AuthError::InvalidSearchType(other.to_string()).into()),
    };

    let user = state.session_service.find_user(&lookup).await?;
    if user.as_ref().map(|user| user.id) != Some(identity.user_id) {
        state.session_service.ensure_admin(&identity)?;
    }

    let Some(user) = user else {
        return Err(CustomError::ResourceNotFound);
    };

    Ok(Json(UserInfo::from(&user)))
}

#[instrument(skip_all, name = "trace_change_password", fields(codium_user_id = %identity.user_id))]
async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(command): Json<ChangePassword>,
) -> Result<StatusCode, CustomError> {
    state
        .session_service
        .change_password(
            identity.user_id,
            &command.current_password,
            &command.new_password,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all, name = "trace_delete_user", fields(codium_user_id = %identity.user_id))]
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(search_arg): Path<String>,
) -> Result<StatusCode, CustomError> {
    state.session_service.ensure_admin(&identity)?;
    let user_id = parse_user_id(&search_arg)?;
    state.session_service.delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_user_id(value: &str) -> Result<Uuid, AuthError> {
    Uuid::parse_str(value).map_err(|_| AuthError::InvalidUserId(value.to_string()))
}
