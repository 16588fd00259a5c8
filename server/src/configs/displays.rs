use crate::configs::http::{HttpConfig, HttpCorsConfig};
use crate::configs::jwt::JwtConfig;
use crate::configs::server::{
    AdminConfig, ConsoleConfig, LoggingConfig, PasswordConfig, RefreshTokenConfig, ServerConfig,
};
use std::fmt::{Display, Formatter};

const MASK: &str = "******";
const UNSET: &str = "<unset>";

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() {
        UNSET
    } else {
        MASK
    }
}

impl Display for ServerConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ http: {}, jwt: {}, refresh_token: {}, password: {}, admin: {}, console: {}, logging: {} }}",
            self.http,
            self.jwt,
            self.refresh_token,
            self.password,
            self.admin,
            self.console,
            self.logging
        )
    }
}

impl Display for HttpConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ address: {}, cors: {} }}", self.address, self.cors)
    }
}

impl Display for HttpCorsConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
          f,
          "{{ enabled: {}, allowed_methods: {:?}, allowed_origins: {:?}, allowed_headers: {:?}, exposed_headers: {:?}, allow_credentials: {}, allow_private_network: {} }}",
          self.enabled, self.allowed_methods, self.allowed_origins, self.allowed_headers, self.exposed_headers, self.allow_credentials, self.allow_private_network
      )
    }
}

impl Display for JwtConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ secret: {}, access_token_expiry: {} }}",
            mask(&self.secret),
            self.access_token_expiry
        )
    }
}

impl Display for RefreshTokenConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ expiry: {} }}", self.expiry)
    }
}

impl Display for PasswordConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ hashing_cost: {} }}", self.hashing_cost)
    }
}

impl Display for AdminConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ email: {}, username: {}, default_password: {} }}",
            self.email,
            self.username,
            mask(&self.default_password)
        )
    }
}

impl Display for ConsoleConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ enabled: {} }}", self.enabled)
    }
}

impl Display for LoggingConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ level: {}, path: {}, file_name: {} }}",
            self.level, self.path, self.file_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_should_never_be_displayed() {
        let mut config = ServerConfig::default();
        config.jwt.secret = "super-secret-signing-key".to_string();
        config.admin.default_password = "admin-password".to_string();
        let displayed = config.to_string();
        assert!(!displayed.contains("super-secret-signing-key"));
        assert!(!displayed.contains("admin-password"));
        assert!(displayed.contains(MASK));
    }
}
