use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::KanbanStore;
use crate::error::AppError;
use crate::models::{Board, Card, List};

#[derive(Default)]
struct Tables {
    boards: BTreeMap<i32, Board>,
    lists: BTreeMap<i32, List>,
    cards: BTreeMap<i32, Card>,
    last_board_id: i32,
    last_list_id: i32,
    last_card_id: i32,
}

impl Tables {
    // Ids grow monotonically, so id order is creation order.
    fn remove_list_cascade(&mut self, list_id: i32) -> bool {
        let removed = self.lists.remove(&list_id).is_some();
        self.cards.retain(|_, card| card.list_id != list_id);
        removed
    }

    fn remove_board_cascade(&mut self, board_id: i32) -> bool {
        let removed = self.boards.remove(&board_id).is_some();
        let list_ids: Vec<i32> = self
            .lists
            .values()
            .filter(|list| list.board_id == board_id)
            .map(|list| list.id)
            .collect();
        for list_id in list_ids {
            self.remove_list_cascade(list_id);
        }
        removed
    }

    fn owner_of_board(&self, board_id: i32) -> Option<i32> {
        self.boards.get(&board_id).map(|board| board.user_id)
    }

    fn owner_of_list(&self, list_id: i32) -> Option<i32> {
        self.lists
            .get(&list_id)
            .and_then(|list| self.owner_of_board(list.board_id))
    }
}

/// In-process store. There are no foreign keys here, so deletes cascade by hand.
#[derive(Default)]
pub struct MemoryKanbanStore {
    tables: RwLock<Tables>,
}

impl MemoryKanbanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KanbanStore for MemoryKanbanStore {
    async fn boards_for_user(&self, user_id: i32) -> Result<Vec<Board>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .boards
            .values()
            .rev()
            .filter(|board| board.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_board(&self, id: i32) -> Result<Option<Board>, AppError> {
        Ok(self.tables.read().await.boards.get(&id).cloned())
    }

    async fn insert_board(&self, user_id: i32, title: &str) -> Result<Board, AppError> {
        let mut tables = self.tables.write().await;
        tables.last_board_id += 1;
        let now = Utc::now();
        let board = Board {
            id: tables.last_board_id,
            title: title.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.boards.insert(board.id, board.clone());
        Ok(board)
    }

    async fn update_board(&self, id: i32, title: &str) -> Result<Option<Board>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.boards.get_mut(&id).map(|board| {
            board.title = title.to_string();
            board.updated_at = Utc::now();
            board.clone()
        }))
    }

    async fn delete_board(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tables.write().await.remove_board_cascade(id))
    }

    async fn lists_for_board(&self, board_id: i32) -> Result<Vec<List>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .lists
            .values()
            .filter(|list| list.board_id == board_id)
            .cloned()
            .collect())
    }

    async fn find_list(&self, id: i32) -> Result<Option<List>, AppError> {
        Ok(self.tables.read().await.lists.get(&id).cloned())
    }

    async fn insert_list(&self, board_id: i32, title: &str) -> Result<List, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.boards.contains_key(&board_id) {
            return Err(AppError::NotFound("Board not found".into()));
        }
        tables.last_list_id += 1;
        let now = Utc::now();
        let list = List {
            id: tables.last_list_id,
            title: title.to_string(),
            board_id,
            created_at: now,
            updated_at: now,
        };
        tables.lists.insert(list.id, list.clone());
        Ok(list)
    }

    async fn update_list(&self, id: i32, title: &str) -> Result<Option<List>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.lists.get_mut(&id).map(|list| {
            list.title = title.to_string();
            list.updated_at = Utc::now();
            list.clone()
        }))
    }

    async fn delete_list(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tables.write().await.remove_list_cascade(id))
    }

    async fn cards_for_list(&self, list_id: i32) -> Result<Vec<Card>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .cards
            .values()
            .filter(|card| card.list_id == list_id)
            .cloned()
            .collect())
    }

    async fn find_card(&self, id: i32) -> Result<Option<Card>, AppError> {
        Ok(self.tables.read().await.cards.get(&id).cloned())
    }

    async fn insert_card(
        &self,
        list_id: i32,
        title: &str,
        description: Option<&str>,
    ) -> Result<Card, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.lists.contains_key(&list_id) {
            return Err(AppError::NotFound("List not found".into()));
        }
        tables.last_card_id += 1;
        let now = Utc::now();
        let card = Card {
            id: tables.last_card_id,
            title: title.to_string(),
            description: description.map(str::to_string),
            done: false,
            list_id,
            created_at: now,
            updated_at: now,
        };
        tables.cards.insert(card.id, card.clone());
        Ok(card)
    }

    async fn update_card(
        &self,
        id: i32,
        title: &str,
        description: Option<&str>,
    ) -> Result<Option<Card>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.cards.get_mut(&id).map(|card| {
            card.title = title.to_string();
            if let Some(description) = description {
                card.description = Some(description.to_string());
            }
            card.updated_at = Utc::now();
            card.clone()
        }))
    }

    async fn toggle_card(&self, id: i32) -> Result<Option<Card>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.cards.get_mut(&id).map(|card| {
            card.done = !card.done;
            card.updated_at = Utc::now();
            card.clone()
        }))
    }

    async fn delete_card(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tables.write().await.cards.remove(&id).is_some())
    }

    async fn owner_of_list(&self, list_id: i32) -> Result<Option<i32>, AppError> {
        Ok(self.tables.read().await.owner_of_list(list_id))
    }

    async fn owner_of_card(&self, card_id: i32) -> Result<Option<i32>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .cards
            .get(&card_id)
            .and_then(|card| tables.owner_of_list(card.list_id)))
    }
}
