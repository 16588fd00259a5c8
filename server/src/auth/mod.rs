pub mod authenticator;
pub mod session_service;
