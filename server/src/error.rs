use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Error")]
    Error,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Invalid username")]
    InvalidUsername,
    #[error("Invalid password")]
    InvalidPassword,
    #[error("Invalid user ID: {0}")]
    InvalidUserId(String),
    #[error("Missing refresh token")]
    MissingRefreshToken,
    #[error("Invalid search type: {0}")]
    InvalidSearchType(String),
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Password mismatch")]
    PasswordMismatch,
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User with ID: {0} was not found.")]
    UserNotFound(String),
    #[error("Refresh token already exists")]
    RefreshTokenAlreadyExists,
    #[error("Cannot hash password")]
    CannotHashPassword,
    #[error("Cannot verify password")]
    CannotVerifyPassword,
    #[error("Cannot generate token")]
    CannotGenerateToken,
    #[error("Cannot encode token")]
    CannotEncodeToken,
    #[error("Invalid JWT secret.")]
    InvalidJwtSecret,
    #[error("Cannot load resource with key: {0}")]
    CannotLoadResource(String),
    #[error("Cannot save resource with key: {0}")]
    CannotSaveResource(String),
    #[error("Cannot delete resource with key: {0}")]
    CannotDeleteResource(String),
}

impl AuthError {
    pub fn as_code(&self) -> u32 {
        match self {
            AuthError::Error => 1,
            AuthError::InvalidEmail => 10,
            AuthError::InvalidUsername => 11,
            AuthError::InvalidPassword => 12,
            AuthError::InvalidUserId(_) => 13,
            AuthError::MissingRefreshToken => 14,
            AuthError::InvalidSearchType(_) => 15,
            AuthError::Unauthenticated => 40,
            AuthError::Unauthorized => 41,
            AuthError::InvalidCredentials => 42,
            AuthError::InvalidToken => 43,
            AuthError::PasswordMismatch => 44,
            AuthError::UserAlreadyExists => 46,
            AuthError::UserNotFound(_) => 47,
            AuthError::RefreshTokenAlreadyExists => 48,
            AuthError::CannotHashPassword => 60,
            AuthError::CannotVerifyPassword => 61,
            AuthError::CannotGenerateToken => 62,
            AuthError::CannotEncodeToken => 63,
            AuthError::InvalidJwtSecret => 64,
            AuthError::CannotLoadResource(_) => 70,
            AuthError::CannotSaveResource(_) => 71,
            AuthError::CannotDeleteResource(_) => 72,
        }
    }

    pub fn as_string(&self) -> &'static str {
        match self {
            AuthError::Error => "error",
            AuthError::InvalidEmail => "invalid_email",
            AuthError::InvalidUsername => "invalid_username",
            AuthError::InvalidPassword => "invalid_password",
            AuthError::InvalidUserId(_) => "invalid_user_id",
            AuthError::MissingRefreshToken => "missing_refresh_token",
            AuthError::InvalidSearchType(_) => "invalid_search_type",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::Unauthorized => "unauthorized",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidToken => "invalid_token",
            AuthError::PasswordMismatch => "password_mismatch",
            AuthError::UserAlreadyExists => "user_already_exists",
            AuthError::UserNotFound(_) => "user_not_found",
            AuthError::RefreshTokenAlreadyExists => "refresh_token_already_exists",
            AuthError::CannotHashPassword => "cannot_hash_password",
            AuthError::CannotVerifyPassword => "cannot_verify_password",
            AuthError::CannotGenerateToken => "cannot_generate_token",
            AuthError::CannotEncodeToken => "cannot_encode_token",
            AuthError::InvalidJwtSecret => "invalid_jwt_secret",
            AuthError::CannotLoadResource(_) => "cannot_load_resource",
            AuthError::CannotSaveResource(_) => "cannot_save_resource",
            AuthError::CannotDeleteResource(_) => "cannot_delete_resource",
        }
    }

    /// Malformed input supplied by the caller.
    pub fn is_validation_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidEmail
                | AuthError::InvalidUsername
                | AuthError::InvalidPassword
                | AuthError::InvalidUserId(_)
                | AuthError::MissingRefreshToken
                | AuthError::InvalidSearchType(_)
        )
    }

    /// Failures that must reach the caller as an opaque server error, with the
    /// details kept in the server-side logs.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Error
                | AuthError::CannotHashPassword
                | AuthError::CannotVerifyPassword
                | AuthError::CannotGenerateToken
                | AuthError::CannotEncodeToken
                | AuthError::InvalidJwtSecret
                | AuthError::CannotLoadResource(_)
                | AuthError::CannotSaveResource(_)
                | AuthError::CannotDeleteResource(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_and_validation_failures_should_not_overlap() {
        let errors = [
            AuthError::InvalidEmail,
            AuthError::MissingRefreshToken,
            AuthError::InvalidCredentials,
            AuthError::Unauthenticated,
            AuthError::CannotHashPassword,
            AuthError::CannotLoadResource("users".to_string()),
        ];
        for error in errors {
            assert!(!(error.is_internal() && error.is_validation_failure()));
        }
    }

    #[test]
    fn storage_failures_should_be_internal() {
        assert!(AuthError::CannotSaveResource("refresh_token".to_string()).is_internal());
        assert!(!AuthError::InvalidCredentials.is_internal());
        assert_eq!(AuthError::InvalidCredentials.as_code(), 42);
        assert_eq!(AuthError::Unauthenticated.as_string(), "unauthenticated");
    }
}
