use crate::error::AuthError;
use thiserror::Error;
use tokio::io;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error")]
    IoError(#[from] io::Error),
    #[error("Invalid configuration provider: {0}")]
    InvalidConfigurationProvider(String),
    #[error("Cannot load configuration: {0}")]
    CannotLoadConfiguration(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Auth error")]
    AuthError(#[from] AuthError),
    #[error("Task has failed")]
    TaskFailure(#[from] tokio::task::JoinError),
    #[error("Cannot bind HTTP listener to address: {0}")]
    CannotBindHttpListener(String),
    #[error("Logging filter reload failure")]
    FilterReloadFailure,
    #[error("Logging file reload failure")]
    FileReloadFailure,
}
