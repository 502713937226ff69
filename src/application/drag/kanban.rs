//! Resolves a kanban drop into the `move_card` calls that realise it.

use tracing::debug;

use crate::domain::kanban::{self, find_card, find_column, Board, KanbanCard};

/// One `move_card` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardMove {
    pub card_id: String,
    pub source_column_id: String,
    pub target_column_id: String,
    pub new_order: u32,
}

impl CardMove {
    fn new(card_id: &str, source_column_id: &str, target_column_id: &str, new_order: u32) -> Self {
        Self {
            card_id: card_id.to_string(),
            source_column_id: source_column_id.to_string(),
            target_column_id: target_column_id.to_string(),
            new_order,
        }
    }
}

/// Translate "card `card_id` dropped on `over_id`" into move commands.
///
/// `over_id` may name a column (drop on its empty area) or a card. Dropping
/// on a column appends to it unless it is the card's own column. Dropping on
/// a card places the dragged card immediately before it, renumbering the
/// receiving column through same-column moves first. Unknown ids resolve to
/// no moves.
pub fn resolve_card_drop(columns: &Board, card_id: &str, over_id: Option<&str>) -> Vec<CardMove> {
    let Some(over_id) = over_id else {
        return Vec::new();
    };
    let Some((source, card)) = find_card(columns, card_id) else {
        debug!("resolve_card_drop: unknown card {}", card_id);
        return Vec::new();
    };

    if let Some(target) = find_column(columns, over_id) {
        if target.id == source.id {
            return Vec::new();
        }
        return vec![CardMove::new(card_id, &source.id, &target.id, target.max_order() + 1)];
    }

    let Some((target_column, target_card)) = find_card(columns, over_id) else {
        debug!("resolve_card_drop: unknown drop target {}", over_id);
        return Vec::new();
    };
    if target_card.id == card.id {
        return Vec::new();
    }

    // receiving column without the dragged card, then the card reinserted before the target
    let mut sequence: Vec<&KanbanCard> = target_column
        .cards
        .iter()
        .filter(|c| c.id != card_id)
        .collect();
    let target_index = sequence
        .iter()
        .position(|c| c.id == target_card.id)
        .unwrap_or(sequence.len());
    sequence.insert(target_index, card);

    let mut moves: Vec<CardMove> = sequence
        .iter()
        .zip(1u32..)
        .filter(|(c, _)| c.id != card_id)
        .map(|(c, order)| CardMove::new(&c.id, &target_column.id, &target_column.id, order))
        .collect();
    moves.push(CardMove::new(
        card_id,
        &source.id,
        &target_column.id,
        target_index as u32 + 1,
    ));
    moves
}

/// Fold the moves through [`kanban::move_card`] in order.
pub fn apply_moves(columns: Board, moves: &[CardMove]) -> Board {
    moves.iter().fold(columns, |board, m| {
        kanban::move_card(
            board,
            &m.card_id,
            &m.source_column_id,
            &m.target_column_id,
            m.new_order,
        )
    })
}

/// Resolve and apply a drop in one step.
pub fn drop_card(columns: Board, card_id: &str, over_id: Option<&str>) -> Board {
    let moves = resolve_card_drop(&columns, card_id, over_id);
    debug!("drop_card: card_id={}, over={:?}, moves={}", card_id, over_id, moves.len());
    apply_moves(columns, &moves)
}
