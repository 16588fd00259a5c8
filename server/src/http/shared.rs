use crate::auth::authenticator::Authenticator;
use crate::auth::session_service::SessionService;

pub struct AppState {
    pub session_service: SessionService,
    pub authenticator: Authenticator,
}

impl AppState {
    pub fn new(session_service: SessionService) -> Self {
        let authenticator =
            Authenticator::new(session_service.jwt_manager(), session_service.users());
        Self {
            session_service,
            authenticator,
        }
    }
}
