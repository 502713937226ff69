//! Ordering engine for kanban columns.
//!
//! Columns are static; cards are added, deleted, edited and moved. After
//! every operation each touched column carries dense `1..=count` orders in
//! display order.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// All columns of a board, in display order.
pub type Board = Vec<KanbanColumn>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanCard {
    pub id: String,
    pub title: String,
    /// Id of the column currently holding the card
    pub column_id: String,
    /// Position within the column, starting at 1
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanColumn {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<KanbanCard>,
}

impl KanbanColumn {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cards: Vec::new(),
        }
    }

    /// Populate from `(card_id, title)` pairs, numbering them `1..=n`.
    pub fn with_cards<I, S, T>(mut self, cards: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        self.cards = cards
            .into_iter()
            .zip(1u32..)
            .map(|((id, title), order)| KanbanCard {
                id: id.into(),
                title: title.into(),
                column_id: self.id.clone(),
                order,
            })
            .collect();
        self
    }

    /// Highest order in the column, 0 when empty.
    pub fn max_order(&self) -> u32 {
        self.cards.iter().map(|card| card.order).max().unwrap_or(0)
    }

    pub fn card(&self, card_id: &str) -> Option<&KanbanCard> {
        self.cards.iter().find(|card| card.id == card_id)
    }

    /// Orders form exactly `1..=count` and every card points back at this column.
    pub fn is_densely_ordered(&self) -> bool {
        let count = self.cards.len() as u32;
        self.cards.iter().all(|card| card.column_id == self.id)
            && self.cards.iter().map(|card| card.order).sorted().eq(1..=count)
    }
}

pub fn find_column<'a>(columns: &'a [KanbanColumn], column_id: &str) -> Option<&'a KanbanColumn> {
    columns.iter().find(|column| column.id == column_id)
}

/// The card with `card_id` together with the column holding it.
pub fn find_card<'a>(
    columns: &'a [KanbanColumn],
    card_id: &str,
) -> Option<(&'a KanbanColumn, &'a KanbanCard)> {
    columns
        .iter()
        .find_map(|column| column.card(card_id).map(|card| (column, card)))
}

fn renumber(cards: &mut [KanbanCard]) {
    for (card, order) in cards.iter_mut().zip(1u32..) {
        card.order = order;
    }
}

/// Append a card titled `title` (trimmed) with a fresh `card-<uuid>` id.
pub fn add_card(columns: Board, column_id: &str, title: &str) -> Board {
    let card_id = format!("card-{}", Uuid::new_v4().simple());
    add_card_with_id(columns, column_id, &card_id, title)
}

/// Like [`add_card`] with a caller-chosen id.
pub fn add_card_with_id(mut columns: Board, column_id: &str, card_id: &str, title: &str) -> Board {
    let title = title.trim();
    if title.is_empty() {
        debug!("add_card: empty title, ignored");
        return columns;
    }
    let Some(column) = columns.iter_mut().find(|column| column.id == column_id) else {
        debug!("add_card: unknown column {}", column_id);
        return columns;
    };
    let order = column.max_order() + 1;
    debug!("add_card: column_id={}, card_id={}, order={}", column_id, card_id, order);
    column.cards.push(KanbanCard {
        id: card_id.to_string(),
        title: title.to_string(),
        column_id: column_id.to_string(),
        order,
    });
    columns
}

/// Remove the card from whichever column holds it.
///
/// The remaining cards of that column are renumbered so no gap is left.
pub fn delete_card(mut columns: Board, card_id: &str) -> Board {
    for column in columns.iter_mut() {
        if let Some(index) = column.cards.iter().position(|card| card.id == card_id) {
            debug!("delete_card: card_id={}, column_id={}", card_id, column.id);
            column.cards.remove(index);
            renumber(&mut column.cards);
            break;
        }
    }
    columns
}

/// Replace the title of the card; unknown ids are ignored.
pub fn edit_card(mut columns: Board, card_id: &str, new_title: &str) -> Board {
    if let Some(card) = columns
        .iter_mut()
        .flat_map(|column| column.cards.iter_mut())
        .find(|card| card.id == card_id)
    {
        debug!("edit_card: card_id={}", card_id);
        card.title = new_title.to_string();
    }
    columns
}

/// Move a card from `source_column_id` into `target_column_id` at `new_order`.
///
/// The card is inserted before the first card whose order is `>= new_order`
/// (appended if none) and the target column is renumbered `1..=count`. The
/// source column is renumbered too when it differs. Unknown columns, or a
/// card that is not in the source column, leave the board unchanged.
pub fn move_card(
    mut columns: Board,
    card_id: &str,
    source_column_id: &str,
    target_column_id: &str,
    new_order: u32,
) -> Board {
    let Some(source_idx) = columns.iter().position(|c| c.id == source_column_id) else {
        debug!("move_card: unknown source column {}", source_column_id);
        return columns;
    };
    let Some(target_idx) = columns.iter().position(|c| c.id == target_column_id) else {
        debug!("move_card: unknown target column {}", target_column_id);
        return columns;
    };
    let Some(card_idx) = columns[source_idx].cards.iter().position(|c| c.id == card_id) else {
        debug!("move_card: card {} not in column {}", card_id, source_column_id);
        return columns;
    };

    debug!(
        "move_card: card_id={}, {} -> {}, new_order={}",
        card_id, source_column_id, target_column_id, new_order
    );
    let mut card = columns[source_idx].cards.remove(card_idx);
    card.column_id = target_column_id.to_string();
    card.order = new_order;

    if source_idx != target_idx {
        renumber(&mut columns[source_idx].cards);
    }

    let target = &mut columns[target_idx].cards;
    let insert_at = target
        .iter()
        .position(|c| c.order >= new_order)
        .unwrap_or(target.len());
    target.insert(insert_at, card);
    renumber(target);
    columns
}
