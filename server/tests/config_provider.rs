use serial_test::serial;
use server::configs::config_provider::{ConfigProvider, FileConfigProvider};
use server::server_error::ServerError;
use std::io::Write;
use std::path::PathBuf;

const SECRET_ENV: &str = "CODIUM_JWT_SECRET";
const ADMIN_PASSWORD_ENV: &str = "CODIUM_ADMIN_DEFAULT_PASSWORD";
const REFRESH_EXPIRY_ENV: &str = "CODIUM_REFRESH_TOKEN_EXPIRY";

fn repository_config_path() -> String {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set!");
    PathBuf::from(manifest_dir)
        .join("../configs/server.toml")
        .to_str()
        .expect("Failed to convert config file to String")
        .to_owned()
}

fn clear_env() {
    for key in [SECRET_ENV, ADMIN_PASSWORD_ENV, REFRESH_EXPIRY_ENV] {
        std::env::remove_var(key);
    }
}

#[tokio::test]
#[serial]
async fn repository_config_with_secrets_from_env_should_be_valid() {
    clear_env();
    std::env::set_var(SECRET_ENV, "signing-key");
    std::env::set_var(ADMIN_PASSWORD_ENV, "admin-password");

    let config = FileConfigProvider::new(repository_config_path())
        .load_config()
        .await;
    clear_env();

    let config = config.expect("ConfigProvider failed to parse config");
    assert_eq!(config.jwt.secret, "signing-key");
    assert_eq!(config.admin.default_password, "admin-password");
    assert_eq!(config.jwt.access_token_expiry.as_secs(), 7 * 24 * 60 * 60);
    assert_eq!(config.refresh_token.expiry.as_secs(), 30 * 24 * 60 * 60);
    assert_eq!(config.http.address, "0.0.0.0:6767");
}

#[tokio::test]
#[serial]
async fn repository_config_without_secret_should_be_rejected() {
    clear_env();
    std::env::set_var(ADMIN_PASSWORD_ENV, "admin-password");

    let result = FileConfigProvider::new(repository_config_path())
        .load_config()
        .await;
    clear_env();

    assert!(matches!(result, Err(ServerError::InvalidConfiguration(_))));
}

#[tokio::test]
#[serial]
async fn multi_word_section_should_be_overridden_from_env() {
    clear_env();
    std::env::set_var(SECRET_ENV, "signing-key");
    std::env::set_var(ADMIN_PASSWORD_ENV, "admin-password");
    std::env::set_var(REFRESH_EXPIRY_ENV, "60 days");

    let config = FileConfigProvider::new(repository_config_path())
        .load_config()
        .await;
    clear_env();

    let config = config.expect("ConfigProvider failed to parse config");
    assert_eq!(config.refresh_token.expiry.as_secs(), 60 * 24 * 60 * 60);
}

#[tokio::test]
#[serial]
async fn access_lifetime_not_shorter_than_refresh_lifetime_should_be_rejected() {
    clear_env();
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create config file");
    let config = std::fs::read_to_string(repository_config_path())
        .expect("Failed to read config file")
        .replace("secret = \"\"", "secret = \"signing-key\"")
        .replace("default_password = \"\"", "default_password = \"admin\"")
        .replace("access_token_expiry = \"7 days\"", "access_token_expiry = \"30 days\"");
    file.write_all(config.as_bytes())
        .expect("Failed to write config file");

    let path = file.path().to_str().expect("Invalid path").to_owned();
    let result = FileConfigProvider::new(path).load_config().await;

    assert!(matches!(result, Err(ServerError::InvalidConfiguration(_))));
}

#[tokio::test]
#[serial]
async fn json_config_file_should_be_loaded() {
    clear_env();
    let content = std::fs::read_to_string(repository_config_path())
        .expect("Failed to read config file");
    let mut config: serde_json::Value = toml::from_str(&content).expect("Invalid TOML config");
    config["jwt"]["secret"] = "signing-key".into();
    config["admin"]["default_password"] = "admin".into();
    config["refresh_token"]["expiry"] = "14 days".into();

    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("Failed to create config file");
    file.write_all(config.to_string().as_bytes())
        .expect("Failed to write config file");

    let path = file.path().to_str().expect("Invalid path").to_owned();
    let config = FileConfigProvider::new(path)
        .load_config()
        .await
        .expect("Failed to load JSON config");

    assert_eq!(config.jwt.secret, "signing-key");
    assert_eq!(config.refresh_token.expiry.as_secs(), 14 * 24 * 60 * 60);
}

#[tokio::test]
async fn missing_config_file_should_fail_to_load() {
    let result = FileConfigProvider::new("/nonexistent/codium/server.toml".to_string())
        .load_config()
        .await;
    assert!(matches!(result, Err(ServerError::CannotLoadConfiguration(_))));
}
