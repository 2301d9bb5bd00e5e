// Public API - what other modules can use
pub use google::{GoogleIdentity, GoogleTokenVerifier, HttpGoogleTokenVerifier};
pub use handlers::{google_login, login, register};
pub use middleware::jwt_auth;
pub use repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};
pub use service::AuthService;
pub use token::TokenConfig;
pub use types::{AuthClaims, AuthResponse, UserResponse};

// Internal modules
pub mod google;
mod handlers;
mod middleware;
pub mod models;
mod password;
pub mod repository;
pub mod service;
mod token;
mod types;
