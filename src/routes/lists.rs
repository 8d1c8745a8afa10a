use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::ListInput,
    services::lists,
    store::KanbanStore,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;

// Mounted under `/boards`, so every path starts with the owning board's id.

/// Retrieves the lists of a board in creation order.
///
/// ## Responses:
/// - `200 OK`: `{isSuccess, message, lists}`.
/// - `403 Forbidden`: The board belongs to another user.
/// - `404 Not Found`: No such board.
#[get("/{board_id}/lists")]
pub async fn get_lists(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let lists = lists::list_lists(store.get_ref(), user.id(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "Lists fetched successfully",
        "lists": lists,
    })))
}

#[post("/{board_id}/lists")]
pub async fn create_list(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
    list_data: web::Json<ListInput>,
) -> Result<impl Responder, AppError> {
    let list =
        lists::create_list(store.get_ref(), user.id(), path.into_inner(), &list_data).await?;

    Ok(HttpResponse::Created().json(json!({
        "isSuccess": true,
        "message": "List created successfully",
        "list": list,
    })))
}

/// Retrieves one list. A list id that belongs to a different board is a 404.
#[get("/{board_id}/lists/{list_id}")]
pub async fn get_list(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    path: web::Path<(i32, i32)>,
) -> Result<impl Responder, AppError> {
    let (board_id, list_id) = path.into_inner();
    let list = lists::get_list(store.get_ref(), user.id(), board_id, list_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "List fetched successfully",
        "list": list,
    })))
}

#[put("/{board_id}/lists/{list_id}")]
pub async fn update_list(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    path: web::Path<(i32, i32)>,
    list_data: web::Json<ListInput>,
) -> Result<impl Responder, AppError> {
    let (board_id, list_id) = path.into_inner();
    let list =
        lists::update_list(store.get_ref(), user.id(), board_id, list_id, &list_data).await?;

    Ok(HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "List updated successfully",
        "list": list,
    })))
}

/// Deletes a list and its cards.
#[delete("/{board_id}/lists/{list_id}")]
pub async fn delete_list(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    path: web::Path<(i32, i32)>,
) -> Result<impl Responder, AppError> {
    let (board_id, list_id) = path.into_inner();
    lists::delete_list(store.get_ref(), user.id(), board_id, list_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "List deleted successfully",
    })))
}
