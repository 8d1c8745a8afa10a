use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::card::Card;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: i32,
    pub title: String,
    pub board_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListInput {
    #[validate(
        length(max = 255, message = "Title is too long."),
        custom = "super::validate_not_blank"
    )]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListWithCards {
    #[serde(flatten)]
    pub list: List,
    pub cards: Vec<Card>,
}
