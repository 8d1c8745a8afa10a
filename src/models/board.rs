use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::list::ListWithCards;

/// A board row. Boards are the root of the ownership chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: i32,
    pub title: String,
    /// Owner of the board and, transitively, of its lists and cards.
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or renaming a board.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BoardInput {
    #[validate(
        length(max = 255, message = "Title is too long."),
        custom = "super::validate_not_blank"
    )]
    pub title: String,
}

/// A board with its lists, each carrying its cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardDetail {
    #[serde(flatten)]
    pub board: Board,
    pub lists: Vec<ListWithCards>,
}
