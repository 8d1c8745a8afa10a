use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CardInput, CardUpdate, ToggleInput},
    services::cards,
    store::KanbanStore,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde_json::json;

/// Creates a card in the list named by `listId`.
///
/// ## Request Body:
/// - `title`: Non-blank, at most 255 characters.
/// - `description` (optional): At most 1000 characters.
/// - `listId`: The target list. It must sit on one of the caller's boards.
///
/// ## Responses:
/// - `201 Created`: `{isSuccess, message, card}`.
/// - `400 Bad Request`: Invalid title or description.
/// - `403 Forbidden`: The list belongs to another user's board.
/// - `404 Not Found`: No such list.
#[post("")]
pub async fn create_card(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    card_data: web::Json<CardInput>,
) -> Result<impl Responder, AppError> {
    let card = cards::create_card(store.get_ref(), user.id(), &card_data).await?;

    Ok(HttpResponse::Created().json(json!({
        "isSuccess": true,
        "message": "Card created successfully",
        "card": card,
    })))
}

/// Retrieves the cards of a list in creation order.
#[get("/lists/{list_id}/cards")]
pub async fn get_cards(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let cards = cards::list_cards(store.get_ref(), user.id(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "Cards fetched successfully",
        "cards": cards,
    })))
}

#[get("/{card_id}")]
pub async fn get_card(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let card = cards::get_card(store.get_ref(), user.id(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "Card fetched successfully",
        "card": card,
    })))
}

/// Replaces a card's title, and its description when one is sent.
#[put("/{card_id}")]
pub async fn update_card(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
    card_data: web::Json<CardUpdate>,
) -> Result<impl Responder, AppError> {
    let card =
        cards::update_card(store.get_ref(), user.id(), path.into_inner(), &card_data).await?;

    Ok(HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "Card updated successfully",
        "card": card,
    })))
}

#[delete("/{card_id}")]
pub async fn delete_card(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    cards::delete_card(store.get_ref(), user.id(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "Card deleted successfully",
    })))
}

/// Flips the `done` flag of the card in the body.
///
/// ## Request Body:
/// - `id`: The card to toggle.
///
/// ## Responses:
/// - `200 OK`: `{isSuccess, message, card}` with the new `done` value.
/// - `403 Forbidden`: The card belongs to another user.
/// - `404 Not Found`: No such card.
#[patch("/toggle")]
pub async fn toggle_card(
    store: web::Data<dyn KanbanStore>,
    user: AuthenticatedUser,
    toggle: web::Json<ToggleInput>,
) -> Result<impl Responder, AppError> {
    let card = cards::toggle_card(store.get_ref(), user.id(), toggle.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "Card updated successfully",
        "card": card,
    })))
}
