use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use std::time::Duration;

use super::{ACCESS_COOKIE, REFRESH_COOKIE};

/// Builds the session cookies with the deployment's security attributes.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    secure: bool,
    same_site: SameSite,
    access_max_age: Duration,
    refresh_max_age: Duration,
}

impl SessionCookies {
    /// Production cookies are `Secure` and `SameSite=None` so a separately hosted
    /// frontend can send them; elsewhere they are `SameSite=Lax` over plain HTTP.
    pub fn new(production: bool, access_max_age: Duration, refresh_max_age: Duration) -> Self {
        Self {
            secure: production,
            same_site: if production {
                SameSite::None
            } else {
                SameSite::Lax
            },
            access_max_age,
            refresh_max_age,
        }
    }

    pub fn access(&self, token: &str) -> Cookie<'static> {
        self.build(ACCESS_COOKIE, token.to_string(), self.access_max_age)
    }

    pub fn refresh(&self, token: &str) -> Cookie<'static> {
        self.build(REFRESH_COOKIE, token.to_string(), self.refresh_max_age)
    }

    /// An expired, empty cookie that makes the browser drop `name`.
    pub fn removal(&self, name: &'static str) -> Cookie<'static> {
        let mut cookie = self.build(name, String::new(), Duration::ZERO);
        cookie.make_removal();
        cookie
    }

    fn build(&self, name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build(name, value)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(CookieDuration::seconds(max_age.as_secs() as i64))
            .finish()
    }
}
