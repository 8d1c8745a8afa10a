use crate::{
    auth::{
        AuthSessionManager, AuthenticatedUser, LoginRequest, RegisterRequest, SessionCookies,
        ACCESS_COOKIE, REFRESH_COOKIE,
    },
    error::AppError,
};
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

/// Register a new user
///
/// Creates an account and returns its public profile. No session is started.
///
/// ## Responses:
/// - `201 Created`: `{isSuccess, message, user}`.
/// - `400 Bad Request`: Invalid name, email or password.
/// - `409 Conflict`: The email is already registered.
#[post("/register")]
pub async fn register(
    sessions: web::Data<AuthSessionManager>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = sessions.register(&register_data).await?;

    Ok(HttpResponse::Created().json(json!({
        "isSuccess": true,
        "message": "User registered successfully",
        "user": user,
    })))
}

/// Login user
///
/// Verifies the credentials and starts a session: the access token goes into the
/// `token` cookie, the refresh token into `refreshToken`.
///
/// ## Responses:
/// - `200 OK`: `{isSuccess, message, user}` with both cookies set.
/// - `400 Bad Request`: Malformed email or empty password.
/// - `401 Unauthorized`: Unknown email or wrong password, reported identically.
#[post("/login")]
pub async fn login(
    sessions: web::Data<AuthSessionManager>,
    cookies: web::Data<SessionCookies>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let outcome = sessions.login(&login_data).await?;

    Ok(HttpResponse::Ok()
        .cookie(cookies.access(&outcome.access_token))
        .cookie(cookies.refresh(&outcome.refresh_token))
        .json(json!({
            "isSuccess": true,
            "message": "Login successful",
            "user": outcome.user,
        })))
}

/// Mints a new access token from the `refreshToken` cookie.
///
/// ## Responses:
/// - `200 OK`: New `token` cookie set.
/// - `401 Unauthorized`: No refresh cookie.
/// - `403 Forbidden`: Refresh token invalid, expired or revoked.
#[post("/refresh")]
pub async fn refresh(
    sessions: web::Data<AuthSessionManager>,
    cookies: web::Data<SessionCookies>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let refresh_token = req.cookie(REFRESH_COOKIE);
    let access_token = sessions
        .refresh(refresh_token.as_ref().map(|c| c.value()))
        .await?;

    Ok(HttpResponse::Ok()
        .cookie(cookies.access(&access_token))
        .json(json!({
            "isSuccess": true,
            "message": "Access token refreshed",
        })))
}

/// Ends the session. Succeeds with or without a refresh cookie.
#[post("/logout")]
pub async fn logout(
    sessions: web::Data<AuthSessionManager>,
    cookies: web::Data<SessionCookies>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let refresh_token = req.cookie(REFRESH_COOKIE);
    sessions
        .logout(refresh_token.as_ref().map(|c| c.value()))
        .await?;

    Ok(HttpResponse::Ok()
        .cookie(cookies.removal(ACCESS_COOKIE))
        .cookie(cookies.removal(REFRESH_COOKIE))
        .json(json!({
            "isSuccess": true,
            "message": "Logout successful",
        })))
}

/// The authenticated caller's profile.
#[get("/me")]
pub async fn me(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "User fetched successfully",
        "user": user.profile(),
    }))
}
