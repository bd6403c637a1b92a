mod health;
mod session;

pub use health::health_handler;
pub use session::{
    current_session_handler, issue_session_handler, logout_handler, refresh_session_handler,
    LogoutResponse, SessionResponse,
};
