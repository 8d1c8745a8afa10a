pub mod auth;
pub mod boards;
pub mod cards;
pub mod health;
pub mod lists;

use crate::{auth::AuthMiddleware, error::AppError};
use actix_web::{web, HttpResponse};

/// JSON bodies that fail to decode get the same error shape as every other failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        log::debug!("rejected JSON body for {}: {}", req.path(), err);
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    })
}

/// Ids that do not parse name no resource, so they answer like a missing one.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        log::debug!("rejected path {}: {}", req.path(), err);
        AppError::NotFound("Resource not found".into()).into()
    })
}

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("Route not found".into()))
}

/// Registers every route. Public routes come first because the protected
/// scope has an empty prefix and would otherwise capture them.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .default_service(web::to(not_found))
        .service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login)
                .service(auth::refresh),
        )
        .service(auth::logout)
        .service(
            web::scope("")
                .wrap(AuthMiddleware)
                .default_service(web::to(not_found))
                .service(auth::me)
                .service(cards::get_cards)
                .service(cards::toggle_card)
                .service(
                    web::scope("/boards")
                        .service(boards::get_boards)
                        .service(boards::create_board)
                        .service(boards::get_board)
                        .service(boards::update_board)
                        .service(boards::delete_board)
                        .service(lists::get_lists)
                        .service(lists::create_list)
                        .service(lists::get_list)
                        .service(lists::update_list)
                        .service(lists::delete_list),
                )
                .service(
                    web::scope("/cards")
                        .service(cards::create_card)
                        .service(cards::get_card)
                        .service(cards::update_card)
                        .service(cards::delete_card),
                ),
        );
}
