// Public API - what other modules can use
pub use handlers::{login, me, signup};
pub use middleware::jwt_auth;
pub use service::AuthService;
pub use types::{TokenClaims, TokenKind};

// Internal modules
mod handlers;
mod middleware;
pub mod password;
pub mod service;
pub mod token;
pub mod types;
