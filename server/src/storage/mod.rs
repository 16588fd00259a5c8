pub mod memory;

use crate::error::AuthError;
use crate::tokens::refresh_token::RefreshToken;
use crate::users::user::{User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use std::fmt::Debug;

/// Durable user records. Implementations are expected to be atomic and
/// immediately consistent per call.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;
    async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>, AuthError>;
    /// Usernames are not unique, the earliest created match is returned.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuthError>;
    async fn get_users(&self) -> Result<Vec<User>, AuthError>;
    /// Fails with `UserAlreadyExists` when the ID or the email is taken.
    async fn create_user(&self, user: &User) -> Result<(), AuthError>;
    async fn update_user_password(
        &self,
        id: UserId,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AuthError>;
    /// Returns `false` when there was no such user.
    async fn delete_user(&self, id: UserId) -> Result<bool, AuthError>;
    async fn delete_users(&self) -> Result<(), AuthError>;

    /// Removes every user and stores `admin` as the only one. Stores that support
    /// transactions should override this to run as one.
    async fn replace_all_users(&self, admin: &User) -> Result<(), AuthError> {
        self.delete_users().await?;
        self.create_user(admin).await
    }
}

/// Durable refresh token records, keyed by the token value.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + Debug {
    /// Fails with `RefreshTokenAlreadyExists` on a duplicate token value.
    async fn create_refresh_token(&self, token: &RefreshToken) -> Result<(), AuthError>;
    async fn get_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError>;
    /// Sets the revocation time unless already set. Returns `false` when there was
    /// no such token.
    async fn revoke_token(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, AuthError>;
    /// Revokes every not yet revoked token of the user, returning how many were revoked.
    async fn revoke_all_user_tokens(
        &self,
        user_id: UserId,
        revoked_at: DateTime<Utc>,
    ) -> Result<usize, AuthError>;
}
