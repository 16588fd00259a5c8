pub mod admin;
pub mod error;
pub mod http_server;
pub mod jwt;
pub mod shared;
pub mod system;
pub mod users;
