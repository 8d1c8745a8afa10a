use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which [`SessionRegistry`](crate::auth::SessionRegistry) backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
    SharedJwtSecret,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has an invalid value: {}", key, value),
            ConfigError::SharedJwtSecret => {
                write!(f, "JWT_SECRET and JWT_REFRESH_SECRET must differ")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub session_store: SessionStoreKind,
    /// Turns on `Secure` + `SameSite=None` session cookies.
    pub production: bool,
    pub cors_origin: Option<String>,
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

/// Longest accepted access token lifetime: one day.
const MAX_ACCESS_TTL_SECS: u64 = 24 * 60 * 60;
/// Longest accepted refresh token lifetime: one year.
const MAX_REFRESH_TTL_SECS: u64 = 365 * 24 * 60 * 60;

fn ttl(key: &'static str, default: u64, max: u64) -> Result<Duration, ConfigError> {
    let secs: u64 = parsed(key, default)?;
    if secs == 0 || secs > max {
        return Err(ConfigError::Invalid {
            key,
            value: secs.to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = required("JWT_SECRET")?;
        let jwt_refresh_secret = required("JWT_REFRESH_SECRET")?;
        if jwt_secret == jwt_refresh_secret {
            return Err(ConfigError::SharedJwtSecret);
        }

        let session_store = match env::var("SESSION_STORE").as_deref() {
            Err(_) | Ok("postgres") => SessionStoreKind::Postgres,
            Ok("memory") => SessionStoreKind::Memory,
            Ok(other) => {
                return Err(ConfigError::Invalid {
                    key: "SESSION_STORE",
                    value: other.to_string(),
                })
            }
        };

        let production = match env::var("APP_ENV").as_deref() {
            Err(_) | Ok("development") => false,
            Ok("production") => true,
            Ok(other) => {
                return Err(ConfigError::Invalid {
                    key: "APP_ENV",
                    value: other.to_string(),
                })
            }
        };

        let bcrypt_cost = parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", 10)?,
            server_port: parsed("SERVER_PORT", 4000)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret,
            jwt_refresh_secret,
            access_token_ttl: ttl("ACCESS_TOKEN_TTL_SECS", 900, MAX_ACCESS_TTL_SECS)?,
            refresh_token_ttl: ttl("REFRESH_TOKEN_TTL_SECS", 604_800, MAX_REFRESH_TTL_SECS)?,
            bcrypt_cost,
            session_store,
            production,
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
