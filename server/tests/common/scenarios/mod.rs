pub mod admin_reset_scenario;
pub mod session_scenario;
pub mod user_lookup_scenario;
