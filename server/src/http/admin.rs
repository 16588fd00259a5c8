use crate::auth::authenticator::Identity;
use crate::http::error::CustomError;
use crate::http::shared::AppState;
use crate::users::user::UserInfo;
use axum::extract::State;
use axum::routing::post;
use axum::{Extension, Json, Router};
use std::sync::Arc;
use tracing::{info, instrument};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/admin/reset", post(reset))
        .with_state(state)
}

/// Destructive: removes every user and recreates the default administrator.
#[instrument(skip_all, name = "trace_admin_reset", fields(codium_user_id = %identity.user_id))]
async fn reset(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<UserInfo>, CustomError> {
    state.session_service.ensure_admin(&identity)?;
    info!("Admin reset initiated by user with ID: {}.", identity.user_id);
    let admin = state.session_service.admin_reset().await?;
    Ok(Json(UserInfo::from(&admin)))
}
