use crate::error::AuthError;
use crate::users::user::UserId;
use chrono::{DateTime, TimeDelta, Utc};
use ring::rand::SecureRandom;
use serde::{Deserialize, Serialize};
use tracing::error;

const SIZE: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    pub fn new(
        user_id: UserId,
        now: DateTime<Utc>,
        lifetime: TimeDelta,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            token: Self::generate_value()?,
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now
                .checked_add_signed(lifetime)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            revoked_at: None,
        })
    }

    /// 32 bytes from the system CSPRNG as 64 lowercase hex characters.
    pub fn generate_value() -> Result<String, AuthError> {
        let mut buffer: [u8; SIZE] = [0; SIZE];
        let system_random = ring::rand::SystemRandom::new();
        system_random.fill(&mut buffer).map_err(|_| {
            error!("Cannot generate refresh token, system random source failed.");
            AuthError::CannotGenerateToken
        })?;
        Ok(hex::encode(buffer))
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Evaluated at use time, a token turns invalid by clock passage alone.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired(now)
    }

    /// Sets the revocation time once, returns `false` if it was already set.
    pub fn revoke(&mut self, now: DateTime<Utc>) -> bool {
        if self.revoked_at.is_some() {
            return false;
        }

        self.revoked_at = Some(now);
        self.updated_at = now;
        true
    }
}
