use validator::Validate;

use super::ensure_owner;
use crate::error::AppError;
use crate::models::{Board, BoardDetail, BoardInput, ListWithCards};
use crate::store::KanbanStore;

/// Boards owned by `user_id`, newest first.
pub async fn list_boards(store: &dyn KanbanStore, user_id: i32) -> Result<Vec<Board>, AppError> {
    store.boards_for_user(user_id).await
}

pub async fn create_board(
    store: &dyn KanbanStore,
    user_id: i32,
    input: &BoardInput,
) -> Result<Board, AppError> {
    input.validate()?;
    let board = store.insert_board(user_id, input.title.trim()).await?;
    log::debug!("user {} created board {}", user_id, board.id);
    Ok(board)
}

/// Loads a board the caller owns.
pub async fn owned_board(
    store: &dyn KanbanStore,
    user_id: i32,
    board_id: i32,
) -> Result<Board, AppError> {
    let board = store.find_board(board_id).await?;
    ensure_owner(board.as_ref().map(|b| b.user_id), user_id, "Board")?;
    board.ok_or_else(|| AppError::NotFound("Board not found".into()))
}

/// A board with its lists and their cards.
pub async fn get_board(
    store: &dyn KanbanStore,
    user_id: i32,
    board_id: i32,
) -> Result<BoardDetail, AppError> {
    let board = owned_board(store, user_id, board_id).await?;

    let mut lists = Vec::new();
    for list in store.lists_for_board(board.id).await? {
        let cards = store.cards_for_list(list.id).await?;
        lists.push(ListWithCards { list, cards });
    }

    Ok(BoardDetail { board, lists })
}

pub async fn update_board(
    store: &dyn KanbanStore,
    user_id: i32,
    board_id: i32,
    input: &BoardInput,
) -> Result<Board, AppError> {
    input.validate()?;
    owned_board(store, user_id, board_id).await?;

    store
        .update_board(board_id, input.title.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Board not found".into()))
}

/// Deletes a board together with its lists and cards.
pub async fn delete_board(
    store: &dyn KanbanStore,
    user_id: i32,
    board_id: i32,
) -> Result<(), AppError> {
    owned_board(store, user_id, board_id).await?;

    if !store.delete_board(board_id).await? {
        return Err(AppError::NotFound("Board not found".into()));
    }
    log::debug!("user {} deleted board {}", user_id, board_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKanbanStore;

    fn input(title: &str) -> BoardInput {
        BoardInput {
            title: title.to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_board_crud_for_owner() {
        let store = MemoryKanbanStore::new();
        let board = create_board(&store, 1, &input("  Roadmap ")).await.unwrap();
        assert_eq!(board.title, "Roadmap");
        assert_eq!(board.user_id, 1);

        let renamed = update_board(&store, 1, board.id, &input("Plan"))
            .await
            .unwrap();
        assert_eq!(renamed.title, "Plan");

        assert_eq!(list_boards(&store, 1).await.unwrap().len(), 1);
        assert!(list_boards(&store, 2).await.unwrap().is_empty());

        delete_board(&store, 1, board.id).await.unwrap();
        assert!(matches!(
            get_board(&store, 1, board.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_rt::test]
    async fn test_foreign_board_is_access_denied_not_not_found() {
        let store = MemoryKanbanStore::new();
        let board = create_board(&store, 1, &input("Mine")).await.unwrap();

        assert!(matches!(
            update_board(&store, 2, board.id, &input("Theirs")).await,
            Err(AppError::AccessDenied(_))
        ));
        assert!(matches!(
            delete_board(&store, 2, board.id).await,
            Err(AppError::AccessDenied(_))
        ));
        assert!(matches!(
            get_board(&store, 2, board.id).await,
            Err(AppError::AccessDenied(_))
        ));
        assert_eq!(
            store.find_board(board.id).await.unwrap().unwrap().title,
            "Mine"
        );
    }

    #[actix_rt::test]
    async fn test_blank_title_is_rejected() {
        let store = MemoryKanbanStore::new();
        assert!(matches!(
            create_board(&store, 1, &input("   ")).await,
            Err(AppError::ValidationError(_))
        ));

        let board = create_board(&store, 1, &input("Ok")).await.unwrap();
        assert!(matches!(
            update_board(&store, 1, board.id, &input("")).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[actix_rt::test]
    async fn test_get_board_nests_lists_and_cards() {
        let store = MemoryKanbanStore::new();
        let board = create_board(&store, 1, &input("Roadmap")).await.unwrap();
        let todo = store.insert_list(board.id, "Todo").await.unwrap();
        store.insert_list(board.id, "Done").await.unwrap();
        store.insert_card(todo.id, "First", None).await.unwrap();
        store.insert_card(todo.id, "Second", None).await.unwrap();

        let detail = get_board(&store, 1, board.id).await.unwrap();
        assert_eq!(detail.lists.len(), 2);
        assert_eq!(detail.lists[0].list.title, "Todo");
        let titles: Vec<&str> = detail.lists[0]
            .cards
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert!(detail.lists[1].cards.is_empty());
    }
}
