use crate::error::AuthError;
use crate::storage::RefreshTokenRepository;
use crate::tokens::refresh_token::RefreshToken;
use crate::users::user::UserId;
use crate::utils::clock::Clock;
use crate::utils::duration::CodiumDuration;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Refresh token lifecycle on top of the repository: issuance, lookup, lazy
/// validity evaluation and revocation.
#[derive(Debug, Clone)]
pub struct RefreshTokenStore {
    repository: Arc<dyn RefreshTokenRepository>,
    clock: Arc<dyn Clock>,
    lifetime: CodiumDuration,
}

impl RefreshTokenStore {
    pub fn new(
        repository: Arc<dyn RefreshTokenRepository>,
        clock: Arc<dyn Clock>,
        lifetime: CodiumDuration,
    ) -> Self {
        Self {
            repository,
            clock,
            lifetime,
        }
    }

    pub fn lifetime(&self) -> CodiumDuration {
        self.lifetime
    }

    pub async fn issue(&self, user_id: UserId) -> Result<RefreshToken, AuthError> {
        let token = RefreshToken::new(user_id, self.clock.now(), self.lifetime.as_time_delta())?;
        self.repository.create_refresh_token(&token).await?;
        debug!(
            "Issued refresh token for user with ID: {user_id}, expiring at: {}.",
            token.expires_at
        );
        Ok(token)
    }

    pub async fn lookup(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
        self.repository.get_token(token).await
    }

    /// Returns the record only if it exists, is not revoked and is not expired.
    /// The three rejections are reported as `InvalidCredentials` alike.
    pub async fn validate(&self, token: &str) -> Result<RefreshToken, AuthError> {
        let Some(refresh_token) = self.lookup(token).await? else {
            warn!("Refresh token was not found.");
            return Err(AuthError::InvalidCredentials);
        };

        if refresh_token.is_revoked() {
            warn!(
                "Refresh token of user with ID: {} has been revoked.",
                refresh_token.user_id
            );
            return Err(AuthError::InvalidCredentials);
        }

        if refresh_token.is_expired(self.clock.now()) {
            warn!(
                "Refresh token of user with ID: {} has expired.",
                refresh_token.user_id
            );
            return Err(AuthError::InvalidCredentials);
        }

        Ok(refresh_token)
    }

    /// Idempotent, revoking an unknown or already revoked token is not an error.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        if !self.repository.revoke_token(token, self.clock.now()).await? {
            debug!("Refresh token to revoke was not found.");
        }
        Ok(())
    }

    pub async fn revoke_all(&self, user_id: UserId) -> Result<usize, AuthError> {
        let revoked = self
            .repository
            .revoke_all_user_tokens(user_id, self.clock.now())
            .await?;
        info!("Revoked {revoked} refresh token(s) of user with ID: {user_id}.");
        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::InMemoryRepository;
    use crate::storage::MockRefreshTokenRepository;
    use crate::utils::clock::ManualClock;
    use chrono::TimeDelta;
    use uuid::Uuid;

    const THIRTY_DAYS: u64 = 30 * 24 * 60 * 60;

    fn store() -> (RefreshTokenStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let store = RefreshTokenStore::new(
            Arc::new(InMemoryRepository::new()),
            clock.clone(),
            CodiumDuration::from_secs(THIRTY_DAYS),
        );
        (store, clock)
    }

    #[tokio::test]
    async fn issued_token_should_be_valid_and_owned_by_user() {
        let (store, clock) = store();
        let user_id = Uuid::new_v4();
        let token = store.issue(user_id).await.unwrap();
        assert_eq!(token.expires_at, clock.now() + TimeDelta::days(30));

        let validated = store.validate(&token.token).await.unwrap();
        assert_eq!(validated.user_id, user_id);
        assert_eq!(validated, token);
    }

    #[tokio::test]
    async fn unknown_token_should_be_rejected() {
        let (store, _) = store();
        assert!(store.lookup("missing").await.unwrap().is_none());
        assert!(matches!(
            store.validate("missing").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn token_should_turn_invalid_by_clock_passage_alone() {
        let (store, clock) = store();
        let token = store.issue(Uuid::new_v4()).await.unwrap();
        clock.advance(TimeDelta::days(30) - TimeDelta::seconds(1));
        assert!(store.validate(&token.token).await.is_ok());
        clock.advance(TimeDelta::seconds(1));
        assert!(matches!(
            store.validate(&token.token).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn revoked_token_should_be_rejected_and_revoking_again_should_succeed() {
        let (store, _) = store();
        let token = store.issue(Uuid::new_v4()).await.unwrap();
        store.revoke(&token.token).await.unwrap();
        assert!(matches!(
            store.validate(&token.token).await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(store.revoke(&token.token).await.is_ok());
        assert!(store.revoke("missing").await.is_ok());
    }

    #[tokio::test]
    async fn revoke_all_should_invalidate_previous_tokens_but_not_later_ones() {
        let (store, _) = store();
        let user_id = Uuid::new_v4();
        let first = store.issue(user_id).await.unwrap();
        let second = store.issue(user_id).await.unwrap();

        assert_eq!(store.revoke_all(user_id).await.unwrap(), 2);
        assert_eq!(store.revoke_all(user_id).await.unwrap(), 0);
        assert!(store.validate(&first.token).await.is_err());
        assert!(store.validate(&second.token).await.is_err());

        let third = store.issue(user_id).await.unwrap();
        assert!(store.validate(&third.token).await.is_ok());
    }

    #[tokio::test]
    async fn repository_failure_should_surface_as_internal_error() {
        let mut repository = MockRefreshTokenRepository::new();
        repository
            .expect_get_token()
            .returning(|_| Err(AuthError::CannotLoadResource("refresh_token".to_string())));
        let store = RefreshTokenStore::new(
            Arc::new(repository),
            Arc::new(ManualClock::starting_now()),
            CodiumDuration::from_secs(THIRTY_DAYS),
        );

        let error = store.validate("token").await.unwrap_err();
        assert!(error.is_internal());
    }
}
