use async_trait::async_trait;
use sqlx::PgPool;

use super::KanbanStore;
use crate::error::AppError;
use crate::models::{Board, Card, List};

const BOARD_COLUMNS: &str = "id, title, user_id, created_at, updated_at";
const LIST_COLUMNS: &str = "id, title, board_id, created_at, updated_at";
const CARD_COLUMNS: &str = "id, title, description, done, list_id, created_at, updated_at";

/// PostgreSQL-backed store. Cascading deletes come from the
/// `ON DELETE CASCADE` foreign keys in `migrations/`.
#[derive(Clone)]
pub struct PgKanbanStore {
    pool: PgPool,
}

impl PgKanbanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KanbanStore for PgKanbanStore {
    async fn boards_for_user(&self, user_id: i32) -> Result<Vec<Board>, AppError> {
        let boards = sqlx::query_as::<_, Board>(&format!(
            "SELECT {} FROM boards WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            BOARD_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(boards)
    }

    async fn find_board(&self, id: i32) -> Result<Option<Board>, AppError> {
        let board = sqlx::query_as::<_, Board>(&format!(
            "SELECT {} FROM boards WHERE id = $1",
            BOARD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(board)
    }

    async fn insert_board(&self, user_id: i32, title: &str) -> Result<Board, AppError> {
        let board = sqlx::query_as::<_, Board>(&format!(
            "INSERT INTO boards (title, user_id) VALUES ($1, $2) RETURNING {}",
            BOARD_COLUMNS
        ))
        .bind(title)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(board)
    }

    async fn update_board(&self, id: i32, title: &str) -> Result<Option<Board>, AppError> {
        let board = sqlx::query_as::<_, Board>(&format!(
            "UPDATE boards SET title = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            BOARD_COLUMNS
        ))
        .bind(title)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(board)
    }

    async fn delete_board(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn lists_for_board(&self, board_id: i32) -> Result<Vec<List>, AppError> {
        let lists = sqlx::query_as::<_, List>(&format!(
            "SELECT {} FROM lists WHERE board_id = $1 ORDER BY created_at ASC, id ASC",
            LIST_COLUMNS
        ))
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lists)
    }

    async fn find_list(&self, id: i32) -> Result<Option<List>, AppError> {
        let list = sqlx::query_as::<_, List>(&format!(
            "SELECT {} FROM lists WHERE id = $1",
            LIST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(list)
    }

    async fn insert_list(&self, board_id: i32, title: &str) -> Result<List, AppError> {
        let list = sqlx::query_as::<_, List>(&format!(
            "INSERT INTO lists (title, board_id) VALUES ($1, $2) RETURNING {}",
            LIST_COLUMNS
        ))
        .bind(title)
        .bind(board_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(list)
    }

    async fn update_list(&self, id: i32, title: &str) -> Result<Option<List>, AppError> {
        let list = sqlx::query_as::<_, List>(&format!(
            "UPDATE lists SET title = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            LIST_COLUMNS
        ))
        .bind(title)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(list)
    }

    async fn delete_list(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn cards_for_list(&self, list_id: i32) -> Result<Vec<Card>, AppError> {
        let cards = sqlx::query_as::<_, Card>(&format!(
            "SELECT {} FROM cards WHERE list_id = $1 ORDER BY created_at ASC, id ASC",
            CARD_COLUMNS
        ))
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(cards)
    }

    async fn find_card(&self, id: i32) -> Result<Option<Card>, AppError> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "SELECT {} FROM cards WHERE id = $1",
            CARD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(card)
    }

    async fn insert_card(
        &self,
        list_id: i32,
        title: &str,
        description: Option<&str>,
    ) -> Result<Card, AppError> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "INSERT INTO cards (title, description, list_id) VALUES ($1, $2, $3) RETURNING {}",
            CARD_COLUMNS
        ))
        .bind(title)
        .bind(description)
        .bind(list_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(card)
    }

    async fn update_card(
        &self,
        id: i32,
        title: &str,
        description: Option<&str>,
    ) -> Result<Option<Card>, AppError> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "UPDATE cards SET title = $1, description = COALESCE($2, description), updated_at = NOW()
             WHERE id = $3 RETURNING {}",
            CARD_COLUMNS
        ))
        .bind(title)
        .bind(description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(card)
    }

    async fn toggle_card(&self, id: i32) -> Result<Option<Card>, AppError> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "UPDATE cards SET done = NOT done, updated_at = NOW() WHERE id = $1 RETURNING {}",
            CARD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(card)
    }

    async fn delete_card(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn owner_of_list(&self, list_id: i32) -> Result<Option<i32>, AppError> {
        let owner = sqlx::query_as::<_, (i32,)>(
            "SELECT b.user_id FROM lists l JOIN boards b ON b.id = l.board_id WHERE l.id = $1",
        )
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(owner.map(|(user_id,)| user_id))
    }

    async fn owner_of_card(&self, card_id: i32) -> Result<Option<i32>, AppError> {
        let owner = sqlx::query_as::<_, (i32,)>(
            "SELECT b.user_id FROM cards c
             JOIN lists l ON l.id = c.list_id
             JOIN boards b ON b.id = l.board_id
             WHERE c.id = $1",
        )
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(owner.map(|(user_id,)| user_id))
    }
}
