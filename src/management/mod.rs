mod auth;
mod session;

pub use auth::EXPIRY_MARGIN_SECS;
pub use auth::TokenManager;
pub use auth::is_expired_at;
pub use session::SpotifySession;
