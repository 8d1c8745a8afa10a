pub mod cookies;
pub mod credentials;
pub mod errors;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod registry;
pub mod session;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use cookies::SessionCookies;
pub use credentials::{CredentialStore, MemoryCredentialStore, PgCredentialStore};
pub use errors::AuthError;
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use registry::{MemorySessionRegistry, PgSessionRegistry, SessionRegistry};
pub use session::{Authenticated, AuthSessionManager, LoginOutcome};
pub use token::{Claims, TokenCodec, TokenError, TokenKind};

/// Cookie carrying the access token.
pub const ACCESS_COOKIE: &str = "token";
/// Cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Represents the payload for a user login request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    #[validate(email(message = "Please enter a valid E-mail!"))]
    pub email: String,
    /// User's password. Only presence is checked here.
    #[validate(length(min = 1, message = "Password can't be empty."))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name for the new account.
    #[validate(
        length(max = 100, message = "Name is too long."),
        custom(function = "crate::models::validate_not_blank", message = "Name cannot be empty.")
    )]
    pub name: String,
    /// Email address for the new account. Must be unique.
    #[validate(email(message = "Please enter a valid E-mail!"))]
    pub email: String,
    /// Password for the new account.
    #[validate(length(min = 5, message = "Password must have at least 5 characters."))]
    pub password: String,
}
