use crate::configs::jwt::JwtConfig;
use crate::configs::server::{AdminConfig, PasswordConfig, ServerConfig};
use crate::server_error::ServerError;
use crate::utils::crypto::MAX_PASSWORD_BYTES;
use crate::utils::text;
use tracing::error;

const MIN_HASHING_COST: u32 = 4;
const MAX_HASHING_COST: u32 = 31;

pub trait Validatable<E> {
    fn validate(&self) -> Result<(), E>;
}

impl Validatable<ServerError> for ServerConfig {
    fn validate(&self) -> Result<(), ServerError> {
        self.jwt.validate()?;
        self.password.validate()?;
        self.admin.validate()?;

        if self.refresh_token.expiry.is_zero() {
            error!("Refresh token configuration -> expiry cannot be zero.");
            return Err(ServerError::InvalidConfiguration(
                "refresh token expiry cannot be zero".to_string(),
            ));
        }

        if self.jwt.access_token_expiry.get_duration() >= self.refresh_token.expiry.get_duration()
        {
            error!(
                "JWT configuration -> access token expiry: {} must be shorter than refresh token expiry: {}.",
                self.jwt.access_token_expiry, self.refresh_token.expiry
            );
            return Err(ServerError::InvalidConfiguration(
                "access token expiry must be shorter than refresh token expiry".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validatable<ServerError> for JwtConfig {
    fn validate(&self) -> Result<(), ServerError> {
        if self.secret.is_empty() {
            error!("JWT configuration -> secret cannot be empty, set it via CODIUM_JWT_SECRET.");
            return Err(ServerError::InvalidConfiguration(
                "JWT secret is empty".to_string(),
            ));
        }

        if self.access_token_expiry.is_zero() {
            error!("JWT configuration -> access token expiry cannot be zero.");
            return Err(ServerError::InvalidConfiguration(
                "access token expiry cannot be zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validatable<ServerError> for PasswordConfig {
    fn validate(&self) -> Result<(), ServerError> {
        if !(MIN_HASHING_COST..=MAX_HASHING_COST).contains(&self.hashing_cost) {
            error!(
                "Password configuration -> hashing cost must be between {MIN_HASHING_COST} and {MAX_HASHING_COST}."
            );
            return Err(ServerError::InvalidConfiguration(format!(
                "invalid hashing cost: {}",
                self.hashing_cost
            )));
        }

        Ok(())
    }
}

impl Validatable<ServerError> for AdminConfig {
    fn validate(&self) -> Result<(), ServerError> {
        if !text::is_valid_email(&text::normalize_email(&self.email)) {
            error!("Admin configuration -> invalid email: {}.", self.email);
            return Err(ServerError::InvalidConfiguration(
                "invalid admin email".to_string(),
            ));
        }

        if self.username.trim().is_empty() {
            error!("Admin configuration -> username cannot be empty.");
            return Err(ServerError::InvalidConfiguration(
                "admin username is empty".to_string(),
            ));
        }

        if self.default_password.is_empty() {
            error!(
                "Admin configuration -> default password cannot be empty, set it via CODIUM_ADMIN_DEFAULT_PASSWORD."
            );
            return Err(ServerError::InvalidConfiguration(
                "admin default password is empty".to_string(),
            ));
        }

        if self.default_password.len() > MAX_PASSWORD_BYTES {
            error!(
                "Admin configuration -> default password cannot be longer than {MAX_PASSWORD_BYTES} bytes."
            );
            return Err(ServerError::InvalidConfiguration(
                "admin default password is too long".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::duration::CodiumDuration;

    fn valid_config() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.jwt.secret = "secret".to_string();
        config.admin.default_password = "admin".to_string();
        config
    }

    #[test]
    fn default_config_with_secrets_should_be_valid() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn default_config_without_secrets_should_be_invalid() {
        assert!(ServerConfig::default().validate().is_err());
    }

    #[test]
    fn access_token_outliving_refresh_token_should_be_invalid() {
        let mut config = valid_config();
        config.jwt.access_token_expiry = "60 days".parse().unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn too_long_admin_password_should_be_invalid() {
        let mut config = valid_config();
        config.admin.default_password = "a".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_lifetimes_should_be_invalid() {
        let mut config = valid_config();
        config.jwt.access_token_expiry = CodiumDuration::default();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.refresh_token.expiry = CodiumDuration::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn hashing_cost_out_of_range_should_be_invalid() {
        let mut config = valid_config();
        config.password.hashing_cost = 3;
        assert!(config.validate().is_err());
        config.password.hashing_cost = 32;
        assert!(config.validate().is_err());
    }
}
