pub mod config_provider;
pub mod defaults;
pub mod displays;
pub mod http;
pub mod jwt;
pub mod server;
pub mod validators;
