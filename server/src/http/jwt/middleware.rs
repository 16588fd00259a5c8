use crate::http::error::CustomError;
use crate::http::shared::AppState;
use axum::body::Body;
use axum::{extract::State, http::Request, middleware::Next, response::Response};
use std::sync::Arc;

const UNAUTHORIZED_PATHS: &[&str] = &[
    "/ping",
    "/api/create_user",
    "/api/login",
    "/api/refresh",
    "/api/logout",
];

/// Authenticates every request outside of the public paths and makes the
/// resolved `Identity` available as a request extension.
pub async fn jwt_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, CustomError> {
    if UNAUTHORIZED_PATHS.contains(&request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let identity = state.authenticator.authenticate(request.headers()).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
