//! Persistence for boards, lists and cards.
//!
//! The store is a plain CRUD surface with no notion of who is asking.
//! Ownership checks live in [`crate::services`]. Deleting a board removes its
//! lists and their cards; deleting a list removes its cards.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Board, Card, List};

pub use memory::MemoryKanbanStore;
pub use postgres::PgKanbanStore;

#[async_trait]
pub trait KanbanStore: Send + Sync {
    /// Boards of `user_id`, newest first.
    async fn boards_for_user(&self, user_id: i32) -> Result<Vec<Board>, AppError>;
    async fn find_board(&self, id: i32) -> Result<Option<Board>, AppError>;
    async fn insert_board(&self, user_id: i32, title: &str) -> Result<Board, AppError>;
    async fn update_board(&self, id: i32, title: &str) -> Result<Option<Board>, AppError>;
    /// Returns whether a row was deleted.
    async fn delete_board(&self, id: i32) -> Result<bool, AppError>;

    /// Lists of `board_id` in creation order.
    async fn lists_for_board(&self, board_id: i32) -> Result<Vec<List>, AppError>;
    async fn find_list(&self, id: i32) -> Result<Option<List>, AppError>;
    async fn insert_list(&self, board_id: i32, title: &str) -> Result<List, AppError>;
    async fn update_list(&self, id: i32, title: &str) -> Result<Option<List>, AppError>;
    async fn delete_list(&self, id: i32) -> Result<bool, AppError>;

    /// Cards of `list_id` in creation order.
    async fn cards_for_list(&self, list_id: i32) -> Result<Vec<Card>, AppError>;
    async fn find_card(&self, id: i32) -> Result<Option<Card>, AppError>;
    async fn insert_card(
        &self,
        list_id: i32,
        title: &str,
        description: Option<&str>,
    ) -> Result<Card, AppError>;
    /// A `None` description leaves the stored one unchanged.
    async fn update_card(
        &self,
        id: i32,
        title: &str,
        description: Option<&str>,
    ) -> Result<Option<Card>, AppError>;
    /// Flips `done` in a single write.
    async fn toggle_card(&self, id: i32) -> Result<Option<Card>, AppError>;
    async fn delete_card(&self, id: i32) -> Result<bool, AppError>;

    /// Owner of the board that contains list `list_id`.
    async fn owner_of_list(&self, list_id: i32) -> Result<Option<i32>, AppError>;
    /// Owner of the board that transitively contains card `card_id`.
    async fn owner_of_card(&self, card_id: i32) -> Result<Option<i32>, AppError>;
}
