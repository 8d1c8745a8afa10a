use validator::Validate;

use super::boards::owned_board;
use crate::error::AppError;
use crate::models::{List, ListInput};
use crate::store::KanbanStore;

/// Loads a list that sits on `board_id`, which the caller must own.
/// A list that exists on some other board is reported as missing.
async fn owned_list(
    store: &dyn KanbanStore,
    user_id: i32,
    board_id: i32,
    list_id: i32,
) -> Result<List, AppError> {
    owned_board(store, user_id, board_id).await?;

    match store.find_list(list_id).await? {
        Some(list) if list.board_id == board_id => Ok(list),
        _ => Err(AppError::NotFound("List not found".into())),
    }
}

pub async fn list_lists(
    store: &dyn KanbanStore,
    user_id: i32,
    board_id: i32,
) -> Result<Vec<List>, AppError> {
    owned_board(store, user_id, board_id).await?;
    store.lists_for_board(board_id).await
}

pub async fn create_list(
    store: &dyn KanbanStore,
    user_id: i32,
    board_id: i32,
    input: &ListInput,
) -> Result<List, AppError> {
    input.validate()?;
    owned_board(store, user_id, board_id).await?;

    let list = store.insert_list(board_id, input.title.trim()).await?;
    log::debug!("user {} created list {} on board {}", user_id, list.id, board_id);
    Ok(list)
}

pub async fn get_list(
    store: &dyn KanbanStore,
    user_id: i32,
    board_id: i32,
    list_id: i32,
) -> Result<List, AppError> {
    owned_list(store, user_id, board_id, list_id).await
}

pub async fn update_list(
    store: &dyn KanbanStore,
    user_id: i32,
    board_id: i32,
    list_id: i32,
    input: &ListInput,
) -> Result<List, AppError> {
    input.validate()?;
    owned_list(store, user_id, board_id, list_id).await?;

    store
        .update_list(list_id, input.title.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("List not found".into()))
}

/// Deletes a list and its cards.
pub async fn delete_list(
    store: &dyn KanbanStore,
    user_id: i32,
    board_id: i32,
    list_id: i32,
) -> Result<(), AppError> {
    owned_list(store, user_id, board_id, list_id).await?;

    if !store.delete_list(list_id).await? {
        return Err(AppError::NotFound("List not found".into()));
    }
    Ok(())
}
