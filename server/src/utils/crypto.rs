use crate::error::AuthError;
use bcrypt::{non_truncating_hash, non_truncating_verify, verify};
use std::fmt::{Debug, Formatter};
use tracing::error;

const DUMMY_PASSWORD: &str = "codium-dummy-password";

/// bcrypt only reads 72 bytes including a terminating NUL, longer secrets would be
/// cut silently.
pub const MAX_PASSWORD_BYTES: usize = 71;

/// One-way salted password hashing (bcrypt). The cost factor and salt are encoded
/// in the produced hash, so verification needs nothing but the hash itself.
///
/// Both operations are CPU-bound on purpose. Async callers should go through
/// `tokio::task::spawn_blocking`, see `SessionService`.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: String,
}

impl Debug for PasswordHasher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish()
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        let dummy_hash = hash_with_cost(DUMMY_PASSWORD, cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Fails with `InvalidPassword` for secrets over `MAX_PASSWORD_BYTES`.
    pub fn hash(&self, secret: &str) -> Result<String, AuthError> {
        if secret.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::InvalidPassword);
        }

        hash_with_cost(secret, self.cost)
    }

    /// `PasswordMismatch` is the expected failure, everything else is internal.
    /// A secret over `MAX_PASSWORD_BYTES` never matches.
    pub fn verify(&self, secret: &str, hashed: &str) -> Result<(), AuthError> {
        if secret.len() > MAX_PASSWORD_BYTES {
            self.verify_dummy(secret);
            return Err(AuthError::PasswordMismatch);
        }

        match non_truncating_verify(secret, hashed) {
            Ok(true) => Ok(()),
            Ok(false) => Err(AuthError::PasswordMismatch),
            Err(err) => {
                error!("Cannot verify password against stored hash. Error: {err}");
                Err(AuthError::CannotVerifyPassword)
            }
        }
    }

    /// Performs a full verification that can never succeed, so that a lookup miss
    /// costs as much as a password mismatch.
    pub fn verify_dummy(&self, secret: &str) {
        let _ = verify(secret, &self.dummy_hash);
    }
}

fn hash_with_cost(secret: &str, cost: u32) -> Result<String, AuthError> {
    non_truncating_hash(secret, cost).map_err(|err| {
        error!("Cannot hash password. Error: {err}");
        AuthError::CannotHashPassword
    })
}
