use crate::configs::config_provider::ConfigProvider;
use crate::configs::http::HttpConfig;
use crate::configs::jwt::JwtConfig;
use crate::server_error::ServerError;
use crate::utils::duration::CodiumDuration;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::DisplayFromStr;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub http: HttpConfig,
    pub jwt: JwtConfig,
    pub refresh_token: RefreshTokenConfig,
    pub password: PasswordConfig,
    pub admin: AdminConfig,
    pub console: ConsoleConfig,
    pub logging: LoggingConfig,
}

#[serde_as]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RefreshTokenConfig {
    #[serde_as(as = "DisplayFromStr")]
    pub expiry: CodiumDuration,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PasswordConfig {
    pub hashing_cost: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdminConfig {
    pub email: String,
    pub username: String,
    pub default_password: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConsoleConfig {
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub path: String,
    pub file_name: String,
}

impl ServerConfig {
    pub async fn load(config_provider: &dyn ConfigProvider) -> Result<ServerConfig, ServerError> {
        let server_config = config_provider.load_config().await?;
        Ok(server_config)
    }
}
