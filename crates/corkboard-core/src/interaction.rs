//! Routes pointer events on the canvas to item drag controllers and the selection.

use crate::drag::DragController;
use crate::error::{BoardError, BoardResult};
use crate::input::{DocumentListeners, ListenerKind, MouseButton, PointerEvent};
use crate::item::{ItemId, topmost_at};
use crate::store::BoardStore;
use kurbo::Vec2;
use std::collections::HashMap;

/// What a pointer event did.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// Nothing reacted to the event.
    Ignored,
    /// Empty canvas was clicked; the selection was cleared.
    Deselected,
    /// An item was selected and started dragging.
    DragStarted(ItemId),
    /// The dragged item moved by `delta`.
    Moved { item_id: ItemId, delta: Vec2 },
    /// The drag ended.
    DragEnded(ItemId),
}

/// Canvas-level pointer dispatcher.
///
/// Each item on the active board gets its own [`DragController`]. Pointer-down
/// is hit-tested against the active board front to back; move and up events
/// go to whichever item holds the document listeners.
#[derive(Debug, Default)]
pub struct CanvasController {
    document: DocumentListeners,
    controllers: HashMap<ItemId, DragController>,
}

impl CanvasController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document listeners currently registered by drags.
    pub fn document(&self) -> &DocumentListeners {
        &self.document
    }

    /// Item currently being dragged.
    pub fn dragging(&self) -> Option<ItemId> {
        self.document.target(ListenerKind::PointerMove)
    }

    /// Handle a pointer event, applying its effects to `store`.
    pub fn handle(&mut self, store: &mut BoardStore, event: PointerEvent) -> BoardResult<PointerOutcome> {
        self.unmount_stale(store);
        match event {
            PointerEvent::Down { position, button } => {
                if button != MouseButton::Left {
                    return Ok(PointerOutcome::Ignored);
                }
                // A press always starts over; a drag that never saw its release ends here
                self.end_drag();
                let Some(board) = store.active_board() else {
                    return Ok(PointerOutcome::Ignored);
                };
                let hit = topmost_at(&board.items, position).map(|i| board.items[i].id.clone());
                let board_id = board.id.clone();

                match hit {
                    Some(item_id) => {
                        let controller = self
                            .controllers
                            .entry(item_id.clone())
                            .or_insert_with(|| DragController::new(board_id, item_id.clone()));
                        controller.pointer_down(position, &self.document);
                        store.select(Some(item_id.as_str()))?;
                        Ok(PointerOutcome::DragStarted(item_id))
                    }
                    None => {
                        store.select(None)?;
                        Ok(PointerOutcome::Deselected)
                    }
                }
            }
            PointerEvent::Move { position } => {
                let Some(item_id) = self.document.target(ListenerKind::PointerMove) else {
                    return Ok(PointerOutcome::Ignored);
                };
                let Some(controller) = self.controllers.get_mut(&item_id) else {
                    return Ok(PointerOutcome::Ignored);
                };
                let Some(delta) = controller.pointer_move(position) else {
                    return Ok(PointerOutcome::Ignored);
                };
                let board_id = controller.board_id().to_string();
                match store.translate_item(&board_id, &item_id, delta) {
                    Ok(_) => Ok(PointerOutcome::Moved { item_id, delta }),
                    Err(e @ BoardError::NotFound { .. }) => {
                        // The item vanished mid-drag; unmount its controller
                        self.controllers.remove(&item_id);
                        Err(e)
                    }
                    Err(e) => Err(e),
                }
            }
            PointerEvent::Up { .. } => {
                let Some(item_id) = self.document.target(ListenerKind::PointerUp) else {
                    return Ok(PointerOutcome::Ignored);
                };
                let ended = self
                    .controllers
                    .get_mut(&item_id)
                    .is_some_and(|controller| controller.pointer_up());
                if ended {
                    Ok(PointerOutcome::DragEnded(item_id))
                } else {
                    Ok(PointerOutcome::Ignored)
                }
            }
        }
    }

    /// Stop the drag holding the document listeners, if any.
    fn end_drag(&mut self) {
        if let Some(item_id) = self.document.target(ListenerKind::PointerMove) {
            if let Some(controller) = self.controllers.get_mut(&item_id) {
                controller.pointer_up();
                log::debug!("Ended stale drag of {}", item_id);
            }
        }
    }

    /// Drop controllers whose item is no longer on the active board.
    fn unmount_stale(&mut self, store: &BoardStore) {
        let Some(board) = store.active_board() else {
            self.controllers.clear();
            return;
        };
        self.controllers.retain(|item_id, controller| {
            controller.board_id() == board.id && board.item(item_id).is_some()
        });
    }
}
