use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use boardforge::{
    auth::{
        AuthSessionManager, CredentialStore, MemorySessionRegistry, PgCredentialStore,
        PgSessionRegistry, SessionCookies, SessionRegistry, TokenCodec,
    },
    config::{Config, SessionStoreKind},
    routes,
    store::{KanbanStore, PgKanbanStore},
};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    log::error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

fn cors(origin: Option<&str>) -> Cors {
    let cors = match origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .supports_credentials(),
        None => Cors::default().allow_any_origin(),
    };
    cors.allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| startup_error("invalid configuration", e))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| startup_error("failed to connect to database", e))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| startup_error("failed to run migrations", e))?;

    let registry: Arc<dyn SessionRegistry> = match config.session_store {
        SessionStoreKind::Postgres => Arc::new(PgSessionRegistry::new(pool.clone())),
        SessionStoreKind::Memory => {
            log::warn!("refresh sessions are kept in memory and will not survive a restart");
            Arc::new(MemorySessionRegistry::new())
        }
    };
    let credentials: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(pool.clone()));
    let store: Arc<dyn KanbanStore> = Arc::new(PgKanbanStore::new(pool));

    let codec = TokenCodec::new(
        &config.jwt_secret,
        &config.jwt_refresh_secret,
        config.access_token_ttl,
        config.refresh_token_ttl,
    );
    let sessions = web::Data::new(
        AuthSessionManager::new(credentials, registry, codec, config.bcrypt_cost)
            .map_err(|e| startup_error("failed to initialise sessions", e))?,
    );
    let cookies = web::Data::new(SessionCookies::new(
        config.production,
        config.access_token_ttl,
        config.refresh_token_ttl,
    ));
    let store = web::Data::from(store);
    let cors_origin = config.cors_origin.clone();

    log::info!("Starting Boardforge server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .wrap(cors(cors_origin.as_deref()))
            .wrap(Logger::default())
            .app_data(sessions.clone())
            .app_data(cookies.clone())
            .app_data(store.clone())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
