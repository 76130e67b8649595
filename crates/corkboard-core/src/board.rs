//! Board definitions.

use crate::factory::ItemFactory;
use crate::item::{CanvasItem, ItemKind, ShapeKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Unique identifier for boards.
pub type BoardId = String;

/// Name prefix used for auto-numbered boards.
pub const NEW_BOARD_PREFIX: &str = "New Board";

/// A named collection of items plus publishing metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flairs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Items in paint order (last is topmost).
    #[serde(default)]
    pub items: Vec<CanvasItem>,
}

impl Board {
    /// Create a new empty board with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            tags: None,
            flairs: None,
            published: None,
            thumbnail_url: None,
            items: Vec::new(),
        }
    }

    /// Get an item by id.
    pub fn item(&self, id: &str) -> Option<&CanvasItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Get a mutable reference to an item by id.
    pub fn item_mut(&mut self, id: &str) -> Option<&mut CanvasItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Position of an item in paint order.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Id of the topmost item, if any.
    pub fn topmost(&self) -> Option<&str> {
        self.items.last().map(|item| item.id.as_str())
    }

    /// Apply descriptive field changes.
    pub fn apply(&mut self, patch: BoardPatch) {
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(tags) = patch.tags {
            self.tags = Some(dedup_preserving_order(tags));
        }
        if let Some(flairs) = patch.flairs {
            self.flairs = Some(flairs);
        }
        if let Some(published) = patch.published {
            self.published = Some(published);
        }
        if let Some(thumbnail_url) = patch.thumbnail_url {
            self.thumbnail_url = Some(thumbnail_url);
        }
    }

    /// Serialize the board to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a board from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Descriptive fields that can be merged into a board. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPatch {
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub flairs: Option<Vec<String>>,
    pub published: Option<bool>,
    pub thumbnail_url: Option<String>,
}

/// Check that no two items share an id. Returns the first duplicate.
pub fn find_duplicate_id(items: &[CanvasItem]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .find(|item| !seen.insert(item.id.as_str()))
        .map(|item| item.id.as_str())
}

/// Drop boards whose id repeats an earlier board, and items whose id repeats
/// an earlier item on the same board. Returns how many entries were dropped.
pub fn dedup_collection(boards: &mut Vec<Board>) -> usize {
    let before: usize = boards.iter().map(|b| 1 + b.items.len()).sum();
    let mut board_ids = HashSet::new();
    boards.retain(|board| board_ids.insert(board.id.clone()));
    for board in boards.iter_mut() {
        let mut item_ids = HashSet::new();
        board.items.retain(|item| item_ids.insert(item.id.clone()));
    }
    let after: usize = boards.iter().map(|b| 1 + b.items.len()).sum();
    before - after
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Board seeded into an empty store so first-time users see something.
pub fn welcome_board() -> Board {
    let mut board = Board::new("Welcome");
    board.description = Some("A first board to play with".to_string());
    board.tags = Some(vec!["welcome".to_string()]);

    let mut title = ItemFactory::create(ItemKind::Text, Some("Welcome to your board"), None);
    title.x = 80.0;
    title.y = 60.0;
    title.width = 360.0;

    let mut note = ItemFactory::create(
        ItemKind::PostIt,
        Some("Drag me around, click to select, double-click to edit."),
        None,
    );
    note.x = 120.0;
    note.y = 160.0;

    let mut shape = ItemFactory::create(ItemKind::Shape, None, Some(ShapeKind::Circle));
    shape.x = 320.0;
    shape.y = 180.0;

    board.items = vec![title, note, shape];
    board
}
