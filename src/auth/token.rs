use crate::error::AppError;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Represents the claims encoded within both access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Identifier of the user the token was issued to.
    #[serde(rename = "userId")]
    pub user_id: i32,
    /// Email of the user at issue time.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Random token id. Keeps two tokens issued in the same second distinct.
    pub jti: String,
}

/// Which of the two signing secrets a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Why a token was rejected. Only ever logged, never sent to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    InvalidSignature,
    Malformed(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenError::Expired => write!(f, "token expired"),
            TokenError::InvalidSignature => write!(f, "token signature mismatch"),
            TokenError::Malformed(reason) => write!(f, "malformed token: {}", reason),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> TokenError {
        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed(error.to_string()),
        }
    }
}

/// Signs and verifies access and refresh tokens.
///
/// Access and refresh tokens use separate HMAC secrets, so a leaked access
/// secret cannot be used to forge refresh tokens and the other way round.
#[derive(Clone)]
pub struct TokenCodec {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Issues a short-lived access token.
    pub fn issue_access_token(&self, user_id: i32, email: &str) -> Result<String, AppError> {
        self.issue(TokenKind::Access, user_id, email)
    }

    /// Issues a refresh token valid for the configured refresh window.
    pub fn issue_refresh_token(&self, user_id: i32, email: &str) -> Result<String, AppError> {
        self.issue(TokenKind::Refresh, user_id, email)
    }

    fn issue(&self, kind: TokenKind, user_id: i32, email: &str) -> Result<String, AppError> {
        let (key, ttl) = match kind {
            TokenKind::Access => (&self.access_encoding, self.access_ttl),
            TokenKind::Refresh => (&self.refresh_encoding, self.refresh_ttl),
        };
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            user_id,
            email: email.to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to sign token: {}", e)))
    }

    /// Verifies signature and expiry and returns the claims.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let key = match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(decode::<Claims>(token, key, &validation)?.claims)
    }
}
