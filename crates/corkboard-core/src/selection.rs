//! Single-item selection and the topmost-on-select z-order policy.
//!
//! Paint order is the order of a board's `items`; the only reordering rule
//! is that selecting an item moves it to the tail (topmost).

use crate::board::{Board, BoardId};
use crate::error::{BoardError, BoardResult};
use crate::item::{CanvasItem, ItemId};

/// Move an item to the tail of `items`, keeping the relative order of the rest.
/// Returns true if the order changed, false if it was already topmost.
pub fn bring_to_front(items: &mut Vec<CanvasItem>, id: &str) -> bool {
    match items.iter().position(|item| item.id == id) {
        Some(pos) if pos + 1 < items.len() => {
            let item = items.remove(pos);
            items.push(item);
            true
        }
        _ => false,
    }
}

/// Result of a [`Selection::select`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectOutcome {
    /// The selected id changed.
    pub selection_changed: bool,
    /// The board's paint order changed and needs persisting.
    pub reordered: bool,
}

/// Tracks at most one selected item on the active board.
///
/// Selection is UI state only; it is never persisted.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    board_id: Option<BoardId>,
    item_id: Option<ItemId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected item id.
    pub fn selected(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    /// Board the selection belongs to.
    pub fn board_id(&self) -> Option<&str> {
        self.board_id.as_deref()
    }

    pub fn is_selected(&self, board_id: &str, item_id: &str) -> bool {
        self.board_id.as_deref() == Some(board_id) && self.item_id.as_deref() == Some(item_id)
    }

    /// Select an item on `board`, or clear the selection with `None`.
    ///
    /// Selecting an item promotes it to topmost. Clearing never reorders.
    pub fn select(&mut self, board: &mut Board, item_id: Option<&str>) -> BoardResult<SelectOutcome> {
        let Some(item_id) = item_id else {
            return Ok(SelectOutcome {
                selection_changed: self.clear(),
                reordered: false,
            });
        };

        if board.item(item_id).is_none() {
            return Err(BoardError::item_not_found(item_id));
        }

        let reordered = bring_to_front(&mut board.items, item_id);
        let selection_changed = !self.is_selected(&board.id, item_id);
        self.board_id = Some(board.id.clone());
        self.item_id = Some(item_id.to_string());

        Ok(SelectOutcome {
            selection_changed,
            reordered,
        })
    }

    /// Clear the selection. Returns true if something was selected.
    pub fn clear(&mut self) -> bool {
        self.board_id = None;
        self.item_id.take().is_some()
    }

    /// Drop the selection if it points at a removed item.
    pub fn forget_item(&mut self, board_id: &str, item_id: &str) -> bool {
        if self.is_selected(board_id, item_id) {
            self.clear()
        } else {
            false
        }
    }

    /// Drop the selection unless it belongs to `board_id`.
    pub fn retain_board(&mut self, board_id: Option<&str>) -> bool {
        if self.board_id.is_some() && self.board_id.as_deref() != board_id {
            self.clear()
        } else {
            false
        }
    }

    /// Drop the selection if its item is no longer present on `board`.
    pub fn retain_items(&mut self, board: &Board) -> bool {
        match self.item_id.as_deref() {
            Some(id)
                if self.board_id.as_deref() == Some(board.id.as_str())
                    && board.item(id).is_none() =>
            {
                self.clear()
            }
            _ => false,
        }
    }
}
