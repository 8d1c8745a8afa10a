use validator::Validate;

use super::ensure_owner;
use crate::error::AppError;
use crate::models::{Card, CardInput, CardUpdate};
use crate::store::KanbanStore;

fn trimmed(description: &Option<String>) -> Option<&str> {
    description.as_deref().map(str::trim)
}

/// Creates a card in `input.list_id`. The list must belong to one of the
/// caller's boards.
pub async fn create_card(
    store: &dyn KanbanStore,
    user_id: i32,
    input: &CardInput,
) -> Result<Card, AppError> {
    input.validate()?;
    ensure_owner(store.owner_of_list(input.list_id).await?, user_id, "List")?;

    let card = store
        .insert_card(input.list_id, input.title.trim(), trimmed(&input.description))
        .await?;
    log::debug!("user {} created card {} in list {}", user_id, card.id, input.list_id);
    Ok(card)
}

pub async fn list_cards(
    store: &dyn KanbanStore,
    user_id: i32,
    list_id: i32,
) -> Result<Vec<Card>, AppError> {
    ensure_owner(store.owner_of_list(list_id).await?, user_id, "List")?;
    store.cards_for_list(list_id).await
}

pub async fn get_card(
    store: &dyn KanbanStore,
    user_id: i32,
    card_id: i32,
) -> Result<Card, AppError> {
    ensure_owner(store.owner_of_card(card_id).await?, user_id, "Card")?;
    store
        .find_card(card_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Card not found".into()))
}

pub async fn update_card(
    store: &dyn KanbanStore,
    user_id: i32,
    card_id: i32,
    input: &CardUpdate,
) -> Result<Card, AppError> {
    input.validate()?;
    ensure_owner(store.owner_of_card(card_id).await?, user_id, "Card")?;

    store
        .update_card(card_id, input.title.trim(), trimmed(&input.description))
        .await?
        .ok_or_else(|| AppError::NotFound("Card not found".into()))
}

/// Flips the card's `done` flag and returns the updated card.
pub async fn toggle_card(
    store: &dyn KanbanStore,
    user_id: i32,
    card_id: i32,
) -> Result<Card, AppError> {
    ensure_owner(store.owner_of_card(card_id).await?, user_id, "Card")?;
    store
        .toggle_card(card_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Card not found".into()))
}

pub async fn delete_card(
    store: &dyn KanbanStore,
    user_id: i32,
    card_id: i32,
) -> Result<(), AppError> {
    ensure_owner(store.owner_of_card(card_id).await?, user_id, "Card")?;

    if !store.delete_card(card_id).await? {
        return Err(AppError::NotFound("Card not found".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKanbanStore;

    async fn seeded(owner: i32) -> (MemoryKanbanStore, i32) {
        let store = MemoryKanbanStore::new();
        let board = store.insert_board(owner, "Roadmap").await.unwrap();
        let list = store.insert_list(board.id, "Todo").await.unwrap();
        (store, list.id)
    }

    fn input(list_id: i32, title: &str) -> CardInput {
        CardInput {
            title: title.to_string(),
            description: None,
            list_id,
        }
    }

    #[actix_rt::test]
    async fn test_card_lifecycle() {
        let (store, list_id) = seeded(1).await;

        let card = create_card(&store, 1, &input(list_id, "Write docs"))
            .await
            .unwrap();
        assert!(!card.done);
        assert_eq!(card.list_id, list_id);

        let updated = update_card(
            &store,
            1,
            card.id,
            &CardUpdate {
                title: "Write more docs".into(),
                description: Some(" README ".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Write more docs");
        assert_eq!(updated.description.as_deref(), Some("README"));

        assert!(toggle_card(&store, 1, card.id).await.unwrap().done);
        assert!(get_card(&store, 1, card.id).await.unwrap().done);
        assert!(!toggle_card(&store, 1, card.id).await.unwrap().done);

        assert_eq!(list_cards(&store, 1, list_id).await.unwrap().len(), 1);
        delete_card(&store, 1, card.id).await.unwrap();
        assert!(matches!(
            get_card(&store, 1, card.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_rt::test]
    async fn test_title_only_update_keeps_description() {
        let (store, list_id) = seeded(1).await;
        let card = create_card(
            &store,
            1,
            &CardInput {
                title: "Write docs".into(),
                description: Some("keep me".into()),
                list_id,
            },
        )
        .await
        .unwrap();

        let updated = update_card(
            &store,
            1,
            card.id,
            &CardUpdate {
                title: "Write more docs".into(),
                description: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Write more docs");
        assert_eq!(updated.description.as_deref(), Some("keep me"));
    }

    #[actix_rt::test]
    async fn test_create_card_checks_the_list() {
        let (store, list_id) = seeded(1).await;

        match create_card(&store, 1, &input(list_id + 100, "Orphan")).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "List not found"),
            other => panic!("expected not found, got {:?}", other),
        }
        assert!(matches!(
            create_card(&store, 2, &input(list_id, "Intruder")).await,
            Err(AppError::AccessDenied(_))
        ));
        assert!(store.cards_for_list(list_id).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_foreign_card_is_left_untouched() {
        let (store, list_id) = seeded(1).await;
        let card = store.insert_card(list_id, "Mine", None).await.unwrap();

        assert!(matches!(
            toggle_card(&store, 2, card.id).await,
            Err(AppError::AccessDenied(_))
        ));
        assert!(matches!(
            delete_card(&store, 2, card.id).await,
            Err(AppError::AccessDenied(_))
        ));
        assert!(matches!(
            list_cards(&store, 2, list_id).await,
            Err(AppError::AccessDenied(_))
        ));

        let stored = store.find_card(card.id).await.unwrap().unwrap();
        assert!(!stored.done);
        assert_eq!(stored.title, "Mine");
    }

    #[actix_rt::test]
    async fn test_toggle_missing_card() {
        let (store, _) = seeded(1).await;
        assert!(matches!(
            toggle_card(&store, 1, 404).await,
            Err(AppError::NotFound(_))
        ));
    }
}
