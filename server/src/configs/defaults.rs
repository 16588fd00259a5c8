use crate::configs::http::{HttpConfig, HttpCorsConfig};
use crate::configs::jwt::JwtConfig;
use crate::configs::server::{
    AdminConfig, ConsoleConfig, LoggingConfig, PasswordConfig, RefreshTokenConfig, ServerConfig,
};

static_toml::static_toml! {
    // static_toml crate always starts from CARGO_MANIFEST_DIR (in this case the server crate root)
    static SERVER_CONFIG = include_toml!("../configs/server.toml");
}

impl Default for ServerConfig {
    fn default() -> ServerConfig {
        ServerConfig {
            http: HttpConfig::default(),
            jwt: JwtConfig::default(),
            refresh_token: RefreshTokenConfig::default(),
            password: PasswordConfig::default(),
            admin: AdminConfig::default(),
            console: ConsoleConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> HttpConfig {
        HttpConfig {
            address: SERVER_CONFIG.http.address.to_string(),
            cors: HttpCorsConfig::default(),
        }
    }
}

impl Default for HttpCorsConfig {
    fn default() -> HttpCorsConfig {
        HttpCorsConfig {
            enabled: SERVER_CONFIG.http.cors.enabled,
            allowed_methods: SERVER_CONFIG
                .http
                .cors
                .allowed_methods
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allowed_origins: SERVER_CONFIG
                .http
                .cors
                .allowed_origins
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allowed_headers: SERVER_CONFIG
                .http
                .cors
                .allowed_headers
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exposed_headers: SERVER_CONFIG
                .http
                .cors
                .exposed_headers
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allow_credentials: SERVER_CONFIG.http.cors.allow_credentials,
            allow_private_network: SERVER_CONFIG.http.cors.allow_private_network,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> JwtConfig {
        JwtConfig {
            secret: SERVER_CONFIG.jwt.secret.to_string(),
            access_token_expiry: SERVER_CONFIG.jwt.access_token_expiry.parse().unwrap(),
        }
    }
}

impl Default for RefreshTokenConfig {
    fn default() -> RefreshTokenConfig {
        RefreshTokenConfig {
            expiry: SERVER_CONFIG.refresh_token.expiry.parse().unwrap(),
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> PasswordConfig {
        PasswordConfig {
            hashing_cost: SERVER_CONFIG.password.hashing_cost as u32,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> AdminConfig {
        AdminConfig {
            email: SERVER_CONFIG.admin.email.to_string(),
            username: SERVER_CONFIG.admin.username.to_string(),
            default_password: SERVER_CONFIG.admin.default_password.to_string(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> ConsoleConfig {
        ConsoleConfig {
            enabled: SERVER_CONFIG.console.enabled,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> LoggingConfig {
        LoggingConfig {
            level: SERVER_CONFIG.logging.level.to_string(),
            path: SERVER_CONFIG.logging.path.to_string(),
            file_name: SERVER_CONFIG.logging.file_name.to_string(),
        }
    }
}
