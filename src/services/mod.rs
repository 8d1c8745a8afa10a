//! Ownership-scoped operations on boards, lists and cards.
//!
//! Every function takes the authenticated user's id and walks the parent chain up
//! to `Board.user_id` before reading or writing. A missing target is `NotFound`;
//! a target owned by someone else is `AccessDenied`. Concurrent updates to the
//! same row are last-write-wins.

pub mod boards;
pub mod cards;
pub mod lists;

use crate::error::AppError;

fn ensure_owner(owner: Option<i32>, user_id: i32, resource: &str) -> Result<(), AppError> {
    match owner {
        None => Err(AppError::NotFound(format!("{} not found", resource))),
        Some(owner) if owner != user_id => {
            log::info!("user {} denied access to a {} owned by user {}", user_id, resource, owner);
            Err(AppError::AccessDenied("Not authorized".into()))
        }
        Some(_) => Ok(()),
    }
}
