#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use boardforge::auth::{
    AuthSessionManager, MemoryCredentialStore, MemorySessionRegistry, SessionCookies, TokenCodec,
    ACCESS_COOKIE, REFRESH_COOKIE,
};
use boardforge::routes;
use boardforge::store::{KanbanStore, MemoryKanbanStore};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

pub const ACCESS_SECRET: &str = "integration-access-secret";
pub const REFRESH_SECRET: &str = "integration-refresh-secret";

/// Shared state behind one test application. Cloning shares the backends.
#[derive(Clone)]
pub struct TestState {
    pub sessions: web::Data<AuthSessionManager>,
    pub cookies: web::Data<SessionCookies>,
    pub store: web::Data<dyn KanbanStore>,
}

impl TestState {
    pub fn new() -> Self {
        Self::with_access_ttl(Duration::from_secs(900))
    }

    pub fn with_access_ttl(access_ttl: Duration) -> Self {
        let refresh_ttl = Duration::from_secs(7 * 24 * 60 * 60);
        let codec = TokenCodec::new(ACCESS_SECRET, REFRESH_SECRET, access_ttl, refresh_ttl);
        let sessions = AuthSessionManager::new(
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(MemorySessionRegistry::new()),
            codec,
            4,
        )
        .expect("session manager");
        let store: Arc<dyn KanbanStore> = Arc::new(MemoryKanbanStore::new());

        Self {
            sessions: web::Data::new(sessions),
            cookies: web::Data::new(SessionCookies::new(false, access_ttl, refresh_ttl)),
            store: web::Data::from(store),
        }
    }

    /// The application as `main` assembles it, minus PostgreSQL.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(self.sessions.clone())
            .app_data(self.cookies.clone())
            .app_data(self.store.clone())
            .configure(routes::config)
    }
}

/// Cookies handed out by a successful login.
pub struct TestSession {
    pub user_id: i64,
    pub access: Cookie<'static>,
    pub refresh: Cookie<'static>,
}

pub fn response_cookie<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}

pub async fn register_and_login_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
    password: &str,
) -> Result<TestSession, String> {
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(&json!({"name": name, "email": email, "password": password}))
        .to_request();
    let resp = test::call_service(app, req).await;
    if !resp.status().is_success() {
        let status = resp.status();
        let body = test::read_body(resp).await;
        return Err(format!(
            "Failed to register user. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(&json!({"email": email, "password": password}))
        .to_request();
    let resp = test::call_service(app, req).await;
    if !resp.status().is_success() {
        return Err(format!("Failed to log in. Status: {}", resp.status()));
    }

    let access = response_cookie(&resp, ACCESS_COOKIE).ok_or("login set no access cookie")?;
    let refresh = response_cookie(&resp, REFRESH_COOKIE).ok_or("login set no refresh cookie")?;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let user_id = body["user"]["id"]
        .as_i64()
        .ok_or("login response carries no user id")?;

    Ok(TestSession {
        user_id,
        access,
        refresh,
    })
}
