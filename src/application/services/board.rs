//! Board service
//!
//! Dispatches card intents to the ordering engine and publishes every
//! resulting board to the owner store.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::drag;
use crate::domain::kanban::{self, Board};
use crate::infrastructure::traits::{InputSource, SnapshotStore};

pub const ADD_CARD_PROMPT: &str = "Enter card title:";
pub const DELETE_CARD_CONFIRM: &str = "Are you sure you want to delete this card?";

/// Service binding the ordering engine to an owner store.
pub struct BoardService {
    store: Arc<dyn SnapshotStore<Board>>,
}

impl BoardService {
    /// Create a new board service.
    pub fn new(store: Arc<dyn SnapshotStore<Board>>) -> Self {
        Self { store }
    }

    /// Current columns as held by the owner.
    pub fn board(&self) -> Board {
        self.store.current()
    }

    fn publish(&self, operation: impl FnOnce(Board) -> Board) {
        let next = operation(self.store.current());
        self.store.replace(next);
    }

    /// Ask for a title and append a card to `column_id`.
    #[instrument(level = "debug", skip(self, input))]
    pub fn add_card(&self, column_id: &str, input: &dyn InputSource) {
        let Some(title) = input.prompt(ADD_CARD_PROMPT) else {
            debug!("add_card: cancelled");
            return;
        };
        self.publish(|board| kanban::add_card(board, column_id, &title));
    }

    /// Delete a card after confirmation.
    #[instrument(level = "debug", skip(self, input))]
    pub fn delete_card(&self, card_id: &str, input: &dyn InputSource) {
        if !input.confirm(DELETE_CARD_CONFIRM) {
            debug!("delete_card: declined");
            return;
        }
        self.publish(|board| kanban::delete_card(board, card_id));
    }

    /// Inline title edit: applied only when the trimmed title is non-empty
    /// and differs from the current one.
    #[instrument(level = "debug", skip(self))]
    pub fn edit_card(&self, card_id: &str, new_title: &str) {
        let new_title = new_title.trim();
        let board = self.store.current();
        let changed = kanban::find_card(&board, card_id)
            .is_some_and(|(_, card)| !new_title.is_empty() && card.title != new_title);
        if !changed {
            debug!("edit_card: nothing to apply for {}", card_id);
            return;
        }
        self.store.replace(kanban::edit_card(board, card_id, new_title));
    }

    #[instrument(level = "debug", skip(self))]
    pub fn move_card(&self, card_id: &str, source_column_id: &str, target_column_id: &str, new_order: u32) {
        self.publish(|board| {
            kanban::move_card(board, card_id, source_column_id, target_column_id, new_order)
        });
    }

    /// Drag end: `over_id` is the column or card under the pointer.
    ///
    /// Each resolved move is published on its own, the way a drop handler
    /// issues one move callback per card.
    #[instrument(level = "debug", skip(self))]
    pub fn drop_card(&self, card_id: &str, over_id: Option<&str>) {
        let moves = drag::resolve_card_drop(&self.store.current(), card_id, over_id);
        for m in &moves {
            self.move_card(&m.card_id, &m.source_column_id, &m.target_column_id, m.new_order);
        }
    }
}
