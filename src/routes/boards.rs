use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::BoardInput,
    services::boards,
    store::KanbanStore,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;

/// Retrieves the boards owned by the authenticated user, newest first.
///
/// ## Responses:
/// - `200 OK`: `{isSuccess, message, boards}`.
/// - `401 Unauthorized`: No valid session.
#[get("")]
pub async fn get_boards(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let boards = boards::list_boards(store.get_ref(), user.id()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "Boards fetched successfully",
        "boards": boards,
    })))
}

/// Creates a board owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: Non-blank, at most 255 characters.
///
/// ## Responses:
/// - `201 Created`: `{isSuccess, message, board}`.
/// - `400 Bad Request`: Blank or oversized title.
#[post("")]
pub async fn create_board(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    board_data: web::Json<BoardInput>,
) -> Result<impl Responder, AppError> {
    let board = boards::create_board(store.get_ref(), user.id(), &board_data).await?;

    Ok(HttpResponse::Created().json(json!({
        "isSuccess": true,
        "message": "Board created successfully",
        "board": board,
    })))
}

/// Retrieves one board with its lists, each carrying its cards.
///
/// ## Path Parameters:
/// - `board_id`: The board's id.
///
/// ## Responses:
/// - `200 OK`: `{isSuccess, message, board}` where `board.lists[].cards[]` are nested.
/// - `403 Forbidden`: The board belongs to another user.
/// - `404 Not Found`: No such board.
#[get("/{board_id}")]
pub async fn get_board(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let board = boards::get_board(store.get_ref(), user.id(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "Board fetched successfully",
        "board": board,
    })))
}

/// Renames a board.
///
/// ## Responses:
/// - `200 OK`: `{isSuccess, message, board}`.
/// - `400 Bad Request`: Blank or oversized title.
/// - `403 Forbidden`: The board belongs to another user.
/// - `404 Not Found`: No such board.
#[put("/{board_id}")]
pub async fn update_board(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
    board_data: web::Json<BoardInput>,
) -> Result<impl Responder, AppError> {
    let board =
        boards::update_board(store.get_ref(), user.id(), path.into_inner(), &board_data).await?;

    Ok(HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "Board updated successfully",
        "board": board,
    })))
}

/// Deletes a board along with its lists and cards.
#[delete("/{board_id}")]
pub async fn delete_board(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    boards::delete_board(store.get_ref(), user.id(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "Board deleted successfully",
    })))
}
