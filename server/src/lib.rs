pub mod args;
pub mod auth;
pub mod configs;
pub mod console;
pub mod error;
pub mod http;
pub mod log;
pub mod server_error;
pub mod storage;
pub mod tokens;
pub mod users;
pub mod utils;
