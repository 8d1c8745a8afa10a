use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use super::{AuthSessionManager, SessionCookies, ACCESS_COOKIE, REFRESH_COOKIE};
use crate::error::AppError;

/// Authenticates every request of the scope it wraps.
///
/// Reads the `token` and `refreshToken` cookies and runs them through
/// [`AuthSessionManager::authenticate`]. On success the caller becomes available
/// to handlers as an [`AuthenticatedUser`](super::AuthenticatedUser) parameter, and a
/// renewed access token, if one was minted, is set as a cookie on the response.
/// Requires `web::Data<AuthSessionManager>` and `web::Data<SessionCookies>` app data.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let manager = req
                .app_data::<web::Data<AuthSessionManager>>()
                .cloned()
                .ok_or_else(|| {
                    AppError::InternalServerError("AuthSessionManager is not registered".into())
                })?;
            let cookies = req
                .app_data::<web::Data<SessionCookies>>()
                .cloned()
                .ok_or_else(|| {
                    AppError::InternalServerError("SessionCookies is not registered".into())
                })?;

            let access_token = req.cookie(ACCESS_COOKIE).map(|c| c.value().to_string());
            let refresh_token = req.cookie(REFRESH_COOKIE).map(|c| c.value().to_string());

            let authenticated = manager
                .authenticate(access_token.as_deref(), refresh_token.as_deref())
                .await?;
            req.extensions_mut().insert(authenticated.user);

            let mut res = service.call(req).await?;

            if let Some(token) = authenticated.renewed_access_token {
                res.response_mut()
                    .add_cookie(&cookies.access(&token))
                    .map_err(|e| AppError::InternalServerError(e.to_string()))?;
            }
            Ok(res)
        })
    }
}
