use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::UserProfile;

/// The authenticated caller of a request.
///
/// Handlers take this as an explicit parameter. It is produced by `AuthMiddleware`,
/// which authenticates the request cookies and hands the result to this extractor
/// through the request extensions. On a route without the middleware the extractor
/// fails with 401.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser(pub UserProfile);

impl AuthenticatedUser {
    pub fn id(&self) -> i32 {
        self.0.id
    }

    pub fn profile(&self) -> &UserProfile {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                let err = AppError::Unauthorized("Not authenticated".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
