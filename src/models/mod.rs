pub mod board;
pub mod card;
pub mod list;
pub mod user;

pub use board::{Board, BoardDetail, BoardInput};
pub use card::{Card, CardInput, CardUpdate, ToggleInput};
pub use list::{List, ListInput, ListWithCards};
pub use user::{User, UserProfile};

use validator::ValidationError;

/// Rejects empty and whitespace-only strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Title cannot be empty.".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Sprint 1").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   \t\n").is_err());
    }
}
