//! Session lifecycle: register, login, request authentication, refresh, logout.
//!
//! A request is authenticated by its access token when that token verifies.
//! Otherwise the refresh token is checked twice, once by signature and expiry
//! and once against the [`SessionRegistry`], and a new access token is minted.
//! Refresh tokens are not rotated; they live until expiry or logout.

use std::sync::Arc;
use validator::Validate;

use super::credentials::CredentialStore;
use super::errors::AuthError;
use super::extractors::AuthenticatedUser;
use super::password::{hash_password, hash_password_blocking, verify_password_blocking};
use super::registry::SessionRegistry;
use super::token::{Claims, TokenCodec, TokenKind};
use super::{LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::UserProfile;

/// Tokens and profile handed back by a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of authenticating a request.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: AuthenticatedUser,
    /// Set when the access token was missing or invalid and a new one was minted
    /// from the refresh token. The caller must send it back as a cookie.
    pub renewed_access_token: Option<String>,
}

pub struct AuthSessionManager {
    credentials: Arc<dyn CredentialStore>,
    registry: Arc<dyn SessionRegistry>,
    codec: TokenCodec,
    bcrypt_cost: u32,
    // Verified against when the email is unknown so both login failures cost one bcrypt check.
    dummy_hash: String,
}

impl AuthSessionManager {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        registry: Arc<dyn SessionRegistry>,
        codec: TokenCodec,
        bcrypt_cost: u32,
    ) -> Result<Self, AppError> {
        let dummy_hash = hash_password("timing-equalizer", bcrypt_cost)?;
        Ok(Self {
            credentials,
            registry,
            codec,
            bcrypt_cost,
            dummy_hash,
        })
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, AppError> {
        request.validate()?;
        let email = request.email.trim();

        if self.credentials.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("User already exists.".into()));
        }

        let password_hash = hash_password_blocking(&request.password, self.bcrypt_cost).await?;
        let user = self
            .credentials
            .create(request.name.trim(), email, &password_hash)
            .await?;

        log::info!("registered user {}", user.id);
        Ok(user.into())
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, AppError> {
        request.validate()?;

        let user = match self.credentials.find_by_email(request.email.trim()).await? {
            Some(user) => user,
            None => {
                verify_password_blocking(&request.password, &self.dummy_hash).await?;
                log::info!("login rejected: unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !verify_password_blocking(&request.password, &user.password_hash).await? {
            log::info!("login rejected: wrong password for user {}", user.id);
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token = self.codec.issue_access_token(user.id, &user.email)?;
        let refresh_token = self.codec.issue_refresh_token(user.id, &user.email)?;
        self.registry
            .put(&refresh_token, user.id, self.codec.refresh_ttl())
            .await?;

        log::info!("user {} logged in", user.id);
        Ok(LoginOutcome {
            user: user.into(),
            access_token,
            refresh_token,
        })
    }

    /// Authenticates a request from its cookies.
    ///
    /// Every credential failure collapses into `AuthError::Unauthenticated` (or
    /// `UserNotFound`); store and registry outages still surface as 500s.
    pub async fn authenticate(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<Authenticated, AppError> {
        if let Some(token) = access_token {
            match self.codec.verify(token, TokenKind::Access) {
                Ok(claims) => {
                    let user = self.resolve_user(&claims).await?;
                    return Ok(Authenticated {
                        user,
                        renewed_access_token: None,
                    });
                }
                Err(reason) => log::debug!("access token rejected ({}), trying refresh", reason),
            }
        }

        let (renewed, claims) = match self.refresh_session(refresh_token).await {
            Ok(renewed) => renewed,
            Err(AppError::Auth(reason)) => {
                log::info!("request not authenticated: {}", reason);
                return Err(AuthError::Unauthenticated.into());
            }
            Err(other) => return Err(other),
        };

        let user = self.resolve_user(&claims).await?;
        Ok(Authenticated {
            user,
            renewed_access_token: Some(renewed),
        })
    }

    /// Mints a new access token from a registered refresh token.
    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<String, AppError> {
        let (access_token, claims) = self.refresh_session(refresh_token).await?;
        log::debug!("issued new access token for user {}", claims.user_id);
        Ok(access_token)
    }

    /// Revokes the refresh token if one is given. Always succeeds on a healthy registry.
    pub async fn logout(&self, refresh_token: Option<&str>) -> Result<(), AppError> {
        if let Some(token) = refresh_token {
            self.registry.delete(token).await?;
            log::info!("refresh session revoked");
        }
        Ok(())
    }

    async fn refresh_session(
        &self,
        refresh_token: Option<&str>,
    ) -> Result<(String, Claims), AppError> {
        let token = refresh_token.ok_or(AuthError::Unauthenticated)?;

        let claims = self
            .codec
            .verify(token, TokenKind::Refresh)
            .map_err(|reason| {
                log::info!("refresh token rejected: {}", reason);
                AuthError::InvalidRefreshToken
            })?;

        match self.registry.get(token).await? {
            Some(user_id) if user_id == claims.user_id => {}
            Some(user_id) => {
                log::warn!(
                    "refresh token for user {} registered to user {}",
                    claims.user_id,
                    user_id
                );
                return Err(AuthError::InvalidRefreshToken.into());
            }
            None => {
                log::info!("refresh token for user {} is revoked", claims.user_id);
                return Err(AuthError::InvalidRefreshToken.into());
            }
        }

        let access_token = self
            .codec
            .issue_access_token(claims.user_id, &claims.email)?;
        Ok((access_token, claims))
    }

    async fn resolve_user(&self, claims: &Claims) -> Result<AuthenticatedUser, AppError> {
        match self.credentials.find_by_id(claims.user_id).await? {
            Some(user) => Ok(AuthenticatedUser(user.into())),
            None => Err(AuthError::UserNotFound.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryCredentialStore, MemorySessionRegistry};
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const ACCESS_SECRET: &str = "access-secret";
    const REFRESH_SECRET: &str = "refresh-secret";

    struct Harness {
        manager: AuthSessionManager,
        credentials: Arc<MemoryCredentialStore>,
        registry: Arc<MemorySessionRegistry>,
    }

    fn harness() -> Harness {
        let credentials = Arc::new(MemoryCredentialStore::new());
        let registry = Arc::new(MemorySessionRegistry::new());
        let codec = TokenCodec::new(
            ACCESS_SECRET,
            REFRESH_SECRET,
            Duration::from_secs(900),
            Duration::from_secs(7 * 24 * 60 * 60),
        );
        let manager =
            AuthSessionManager::new(credentials.clone(), registry.clone(), codec, 4).unwrap();
        Harness {
            manager,
            credentials,
            registry,
        }
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "A".into(),
            email: email.into(),
            password: "secret1".into(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    async fn registered_and_logged_in(h: &Harness) -> LoginOutcome {
        h.manager
            .register(&register_request("a@x.com"))
            .await
            .unwrap();
        h.manager
            .login(&login_request("a@x.com", "secret1"))
            .await
            .unwrap()
    }

    fn assert_auth_error<T: std::fmt::Debug>(result: Result<T, AppError>, expected: AuthError) {
        match result {
            Err(AppError::Auth(err)) => assert_eq!(err, expected),
            other => panic!("expected {:?}, got {:?}", expected, other),
        }
    }

    #[test_log::test(actix_rt::test)]
    async fn test_duplicate_registration_conflicts() {
        let h = harness();
        let user = h
            .manager
            .register(&register_request("a@x.com"))
            .await
            .unwrap();
        assert_eq!(user.email, "a@x.com");

        match h.manager.register(&register_request("a@x.com")).await {
            Err(AppError::Conflict(_)) => {}
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test_log::test(actix_rt::test)]
    async fn test_login_registers_refresh_session() {
        let h = harness();
        let outcome = registered_and_logged_in(&h).await;

        assert_eq!(outcome.user.name, "A");
        assert_eq!(
            h.registry.get(&outcome.refresh_token).await.unwrap(),
            Some(outcome.user.id)
        );
        assert_eq!(h.registry.len().await, 1);
    }

    #[test_log::test(actix_rt::test)]
    async fn test_login_failures_are_indistinguishable() {
        let h = harness();
        registered_and_logged_in(&h).await;

        let wrong_password = h.manager.login(&login_request("a@x.com", "nope")).await;
        let unknown_email = h
            .manager
            .login(&login_request("ghost@x.com", "secret1"))
            .await;

        assert_auth_error(wrong_password, AuthError::InvalidCredentials);
        assert_auth_error(unknown_email, AuthError::InvalidCredentials);
    }

    #[test_log::test(actix_rt::test)]
    async fn test_refresh_then_logout_revokes() {
        let h = harness();
        let outcome = registered_and_logged_in(&h).await;

        let access = h
            .manager
            .refresh(Some(&outcome.refresh_token))
            .await
            .unwrap();
        let claims = h.manager.codec().verify(&access, TokenKind::Access).unwrap();
        assert_eq!(claims.user_id, outcome.user.id);

        h.manager
            .logout(Some(&outcome.refresh_token))
            .await
            .unwrap();
        assert_auth_error(
            h.manager.refresh(Some(&outcome.refresh_token)).await,
            AuthError::InvalidRefreshToken,
        );
    }

    #[test_log::test(actix_rt::test)]
    async fn test_refresh_does_not_rotate() {
        let h = harness();
        let outcome = registered_and_logged_in(&h).await;

        for _ in 0..3 {
            assert!(h
                .manager
                .refresh(Some(&outcome.refresh_token))
                .await
                .is_ok());
        }
    }

    #[test_log::test(actix_rt::test)]
    async fn test_logout_is_idempotent() {
        let h = harness();
        let outcome = registered_and_logged_in(&h).await;

        assert!(h.manager.logout(Some(&outcome.refresh_token)).await.is_ok());
        assert!(h.manager.logout(Some(&outcome.refresh_token)).await.is_ok());
        assert!(h.manager.logout(None).await.is_ok());
        assert!(h.registry.is_empty().await);
    }

    #[test_log::test(actix_rt::test)]
    async fn test_refresh_without_token_is_unauthenticated() {
        let h = harness();
        assert_auth_error(h.manager.refresh(None).await, AuthError::Unauthenticated);
    }

    #[test_log::test(actix_rt::test)]
    async fn test_unregistered_refresh_token_is_rejected() {
        let h = harness();
        let outcome = registered_and_logged_in(&h).await;
        let stray = h
            .manager
            .codec()
            .issue_refresh_token(outcome.user.id, "a@x.com")
            .unwrap();

        assert_auth_error(
            h.manager.refresh(Some(&stray)).await,
            AuthError::InvalidRefreshToken,
        );
    }

    #[test_log::test(actix_rt::test)]
    async fn test_registry_user_mismatch_is_rejected() {
        let h = harness();
        let outcome = registered_and_logged_in(&h).await;
        h.registry
            .put(
                &outcome.refresh_token,
                outcome.user.id + 100,
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        assert_auth_error(
            h.manager.refresh(Some(&outcome.refresh_token)).await,
            AuthError::InvalidRefreshToken,
        );
    }

    #[test_log::test(actix_rt::test)]
    async fn test_access_token_is_not_a_refresh_token() {
        let h = harness();
        let outcome = registered_and_logged_in(&h).await;

        assert_auth_error(
            h.manager.refresh(Some(&outcome.access_token)).await,
            AuthError::InvalidRefreshToken,
        );
    }

    #[test_log::test(actix_rt::test)]
    async fn test_authenticate_fast_path_does_not_renew() {
        let h = harness();
        let outcome = registered_and_logged_in(&h).await;

        let auth = h
            .manager
            .authenticate(Some(&outcome.access_token), None)
            .await
            .unwrap();
        assert_eq!(auth.user.0, outcome.user);
        assert!(auth.renewed_access_token.is_none());
    }

    #[test_log::test(actix_rt::test)]
    async fn test_authenticate_falls_back_to_refresh_when_access_expired() {
        let h = harness();
        let outcome = registered_and_logged_in(&h).await;
        let now = chrono::Utc::now().timestamp();
        let expired = encode(
            &Header::new(Algorithm::HS256),
            &Claims {
                user_id: outcome.user.id,
                email: "a@x.com".into(),
                iat: now - 120,
                exp: now - 60,
                jti: "expired".into(),
            },
            &EncodingKey::from_secret(ACCESS_SECRET.as_bytes()),
        )
        .unwrap();

        let auth = h
            .manager
            .authenticate(Some(&expired), Some(&outcome.refresh_token))
            .await
            .unwrap();
        assert_eq!(auth.user.id(), outcome.user.id);
        let renewed = auth.renewed_access_token.expect("a new access token");
        assert!(h.manager.codec().verify(&renewed, TokenKind::Access).is_ok());
    }

    #[test_log::test(actix_rt::test)]
    async fn test_authenticate_without_cookies_is_unauthenticated() {
        let h = harness();
        assert_auth_error(
            h.manager.authenticate(None, None).await,
            AuthError::Unauthenticated,
        );
    }

    #[test_log::test(actix_rt::test)]
    async fn test_authenticate_hides_revocation_reason() {
        let h = harness();
        let outcome = registered_and_logged_in(&h).await;
        h.manager
            .logout(Some(&outcome.refresh_token))
            .await
            .unwrap();

        assert_auth_error(
            h.manager
                .authenticate(Some("garbage"), Some(&outcome.refresh_token))
                .await,
            AuthError::Unauthenticated,
        );
    }

    #[test_log::test(actix_rt::test)]
    async fn test_authenticate_reports_vanished_user() {
        let h = harness();
        let outcome = registered_and_logged_in(&h).await;
        assert!(h.credentials.remove(outcome.user.id).await);

        assert_auth_error(
            h.manager
                .authenticate(Some(&outcome.access_token), None)
                .await,
            AuthError::UserNotFound,
        );
    }
}
