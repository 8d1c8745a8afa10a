use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A card row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    /// Completion flag flipped by the toggle endpoint.
    pub done: bool,
    pub list_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a card inside a list.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CardInput {
    #[validate(
        length(max = 255, message = "Title is too long."),
        custom = "super::validate_not_blank"
    )]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub list_id: i32,
}

/// Payload for editing a card's text.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CardUpdate {
    #[validate(
        length(max = 255, message = "Title is too long."),
        custom = "super::validate_not_blank"
    )]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Body of `PATCH /toggle`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToggleInput {
    pub id: i32,
}
