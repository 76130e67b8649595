//! Pointer events and document-scoped listener registration.

use crate::item::ItemId;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position } => position,
        }
    }
}

/// Document-level event a listener can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    PointerUp,
}

#[derive(Debug, Default)]
struct ListenerTable {
    next_id: u64,
    entries: Vec<(u64, ListenerKind, ItemId)>,
}

/// Listeners attached to the whole document rather than a single item.
///
/// A drag keeps receiving moves after the pointer leaves the item, so the
/// dragged item registers here for the duration of the drag. Registration
/// hands back a [`ListenerGuard`]; dropping it removes the listeners, which
/// covers pointer-up as well as an item disappearing mid-drag.
#[derive(Debug, Clone, Default)]
pub struct DocumentListeners {
    table: Rc<RefCell<ListenerTable>>,
}

impl DocumentListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register pointer-move and pointer-up listeners for a dragged item.
    pub fn register_drag(&self, item_id: &str) -> ListenerGuard {
        let mut table = self.table.borrow_mut();
        let mut ids = Vec::with_capacity(2);
        for kind in [ListenerKind::PointerMove, ListenerKind::PointerUp] {
            table.next_id += 1;
            let id = table.next_id;
            table.entries.push((id, kind, item_id.to_string()));
            ids.push(id);
        }
        log::trace!("Registered document listeners for {}", item_id);
        ListenerGuard {
            table: Rc::downgrade(&self.table),
            ids,
        }
    }

    /// Item that should receive a document-level event of `kind`, if any.
    ///
    /// With a single pointer device at most one item is registered.
    pub fn target(&self, kind: ListenerKind) -> Option<ItemId> {
        self.table
            .borrow()
            .entries
            .iter()
            .find(|(_, k, _)| *k == kind)
            .map(|(_, _, item)| item.clone())
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.table.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps document listeners registered while alive.
#[derive(Debug)]
pub struct ListenerGuard {
    table: Weak<RefCell<ListenerTable>>,
    ids: Vec<u64>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table
                .borrow_mut()
                .entries
                .retain(|(id, _, _)| !self.ids.contains(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_registers_both_listeners() {
        let listeners = DocumentListeners::new();
        let guard = listeners.register_drag("a");

        assert_eq!(listeners.len(), 2);
        assert_eq!(listeners.target(ListenerKind::PointerMove).as_deref(), Some("a"));
        assert_eq!(listeners.target(ListenerKind::PointerUp).as_deref(), Some("a"));

        drop(guard);
        assert!(listeners.is_empty());
        assert_eq!(listeners.target(ListenerKind::PointerMove), None);
    }

    #[test]
    fn test_guard_only_removes_its_own() {
        let listeners = DocumentListeners::new();
        let a = listeners.register_drag("a");
        let b = listeners.register_drag("b");

        drop(a);
        assert_eq!(listeners.len(), 2);
        assert_eq!(listeners.target(ListenerKind::PointerUp).as_deref(), Some("b"));
        drop(b);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_guard_outliving_document() {
        let listeners = DocumentListeners::new();
        let guard = listeners.register_drag("a");
        drop(listeners);
        drop(guard);
    }

    #[test]
    fn test_event_position() {
        let event = PointerEvent::Down {
            position: Point::new(3.0, 4.0),
            button: MouseButton::Left,
        };
        assert_eq!(event.position(), Point::new(3.0, 4.0));
    }
}
