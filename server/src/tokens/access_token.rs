use crate::configs::jwt::JwtConfig;
use crate::error::AuthError;
use crate::users::user::UserId;
use crate::utils::clock::Clock;
use crate::utils::duration::CodiumDuration;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

pub const ISSUER: &str = "Codium";
const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JwtClaims {
    pub iss: String,
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

impl JwtClaims {
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedToken {
    pub user_id: UserId,
    pub access_token: String,
    pub access_token_expiry: u64,
}

/// Issues and verifies stateless HS256 access tokens. The key and the lifetime
/// are fixed at construction; there is no revocation list, a token stays valid
/// until its expiry.
pub struct JwtManager {
    lifetime: CodiumDuration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl Debug for JwtManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("issuer", &ISSUER)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl JwtManager {
    pub fn new(
        secret: &str,
        lifetime: CodiumDuration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::InvalidJwtSecret);
        }

        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against the injected clock in `decode`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Ok(Self {
            lifetime,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        })
    }

    pub fn from_config(config: &JwtConfig, clock: Arc<dyn Clock>) -> Result<Self, AuthError> {
        Self::new(&config.secret, config.access_token_expiry, clock)
    }

    pub fn lifetime(&self) -> CodiumDuration {
        self.lifetime
    }

    pub fn generate(&self, user_id: UserId) -> Result<GeneratedToken, AuthError> {
        let header = Header::new(ALGORITHM);
        let iat = self.clock.now().timestamp().max(0) as u64;
        let exp = iat.saturating_add(self.lifetime.as_secs());
        let claims = JwtClaims {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat,
            exp,
        };

        let access_token = encode::<JwtClaims>(&header, &claims, &self.encoding_key)
            .map_err(|err| {
                error!("Cannot encode access token for user with ID: {user_id}. Error: {err}");
                AuthError::CannotEncodeToken
            })?;

        Ok(GeneratedToken {
            user_id,
            access_token,
            access_token_expiry: exp,
        })
    }

    /// Signature first, then issuer, then expiry. Every failure is `InvalidToken`.
    pub fn decode(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let token_data =
            jsonwebtoken::decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
                .map_err(|_| AuthError::InvalidToken)?;

        let now = self.clock.now().timestamp();
        if now < 0 || now as u64 >= token_data.claims.exp {
            return Err(AuthError::InvalidToken);
        }

        Ok(token_data.claims)
    }

    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        self.decode(token)?.user_id()
    }
}
