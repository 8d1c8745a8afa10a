use actix_web::http::StatusCode;
use std::fmt;

/// Failures of the session lifecycle.
///
/// The variants exist for server logs and tests. Clients only ever see one of
/// three messages, so a caller cannot tell an expired token from a revoked one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password. The two cases are indistinguishable.
    InvalidCredentials,
    /// No usable access token and no refresh token.
    Unauthenticated,
    /// The refresh token failed verification, was revoked, or maps to another user.
    InvalidRefreshToken,
    /// The token was valid but its user row no longer exists.
    UserNotFound,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidRefreshToken => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "Invalid credentials",
            AuthError::InvalidRefreshToken => "Invalid refresh token",
            AuthError::Unauthenticated | AuthError::UserNotFound => "Not authenticated",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "invalid credentials"),
            AuthError::Unauthenticated => write!(f, "no valid session"),
            AuthError::InvalidRefreshToken => write!(f, "invalid refresh token"),
            AuthError::UserNotFound => write!(f, "token subject no longer exists"),
        }
    }
}

impl std::error::Error for AuthError {}
