use crate::error::AuthError;
use crate::storage::UserRepository;
use crate::tokens::access_token::JwtManager;
use crate::users::user::UserId;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use std::sync::Arc;
use tracing::{debug, error};

const BEARER: &str = "Bearer ";

/// The authenticated caller, resolved from a verified access token to a live user.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub is_admin: bool,
    pub token_expiry: u64,
}

/// Authentication only. Privilege checks are up to the caller, see
/// `SessionService::ensure_admin`.
#[derive(Debug, Clone)]
pub struct Authenticator {
    jwt_manager: Arc<JwtManager>,
    users: Arc<dyn UserRepository>,
}

impl Authenticator {
    pub fn new(jwt_manager: Arc<JwtManager>, users: Arc<dyn UserRepository>) -> Self {
        Self { jwt_manager, users }
    }

    /// Every rejection is `Unauthenticated`, including a verified token whose user
    /// no longer exists and a failing user lookup.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let Some(token) = extract_bearer_token(headers) else {
            debug!("Missing or malformed authorization header.");
            return Err(AuthError::Unauthenticated);
        };

        let claims = self.jwt_manager.decode(token).map_err(|_| {
            debug!("Invalid access token.");
            AuthError::Unauthenticated
        })?;
        let user_id = claims.user_id().map_err(|_| AuthError::Unauthenticated)?;

        let user = match self.users.get_user_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!("User with ID: {user_id} from access token was not found.");
                return Err(AuthError::Unauthenticated);
            }
            Err(err) => {
                error!("Cannot resolve user with ID: {user_id} from access token. Error: {err}");
                return Err(AuthError::Unauthenticated);
            }
        };

        Ok(Identity {
            user_id: user.id,
            email: user.email,
            is_admin: user.is_admin,
            token_expiry: claims.exp,
        })
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER)?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
