//! Per-item drag state machine.
//!
//! ```text
//! Idle --pointer-down--> Dragging --pointer-move--> Dragging
//!                          |
//!                          +--pointer-up--> Idle
//! ```

use crate::board::BoardId;
use crate::input::{DocumentListeners, ListenerGuard};
use crate::item::ItemId;
use kurbo::{Point, Vec2};

/// Drag state of a single item.
#[derive(Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Pointer position when the drag started.
        origin: Point,
        /// Last pointer position seen; deltas are measured from here.
        last: Point,
        /// Document listeners held for the duration of the drag.
        listeners: ListenerGuard,
    },
}

/// Response to a pointer-down on the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerDown {
    /// The event must not reach the canvas (which would clear the selection).
    pub stop_propagation: bool,
}

/// Drag controller owned by one item.
#[derive(Debug)]
pub struct DragController {
    board_id: BoardId,
    item_id: ItemId,
    state: DragState,
}

impl DragController {
    pub fn new(board_id: impl Into<BoardId>, item_id: impl Into<ItemId>) -> Self {
        Self {
            board_id: board_id.into(),
            item_id: item_id.into(),
            state: DragState::Idle,
        }
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Total pointer travel of the current drag.
    pub fn travel(&self) -> Option<Vec2> {
        match &self.state {
            DragState::Dragging { origin, last, .. } => Some(*last - *origin),
            DragState::Idle => None,
        }
    }

    /// Pointer pressed on the item: start dragging.
    pub fn pointer_down(&mut self, position: Point, document: &DocumentListeners) -> PointerDown {
        if !self.is_dragging() {
            self.state = DragState::Dragging {
                origin: position,
                last: position,
                listeners: document.register_drag(&self.item_id),
            };
        }
        PointerDown {
            stop_propagation: true,
        }
    }

    /// Pointer moved anywhere in the document.
    ///
    /// Returns the movement since the previous event (not since the drag
    /// started), or `None` when idle.
    pub fn pointer_move(&mut self, position: Point) -> Option<Vec2> {
        match &mut self.state {
            DragState::Dragging { last, .. } => {
                let delta = position - *last;
                *last = position;
                Some(delta)
            }
            DragState::Idle => None,
        }
    }

    /// Pointer released: stop dragging and release the document listeners.
    /// Returns true if a drag was in progress.
    pub fn pointer_up(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }
}
