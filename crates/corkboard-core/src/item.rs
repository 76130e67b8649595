//! Canvas item definitions.

use crate::error::BoardError;
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unique identifier for items (unique within the owning board).
pub type ItemId = String;

/// The variant of a canvas item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "shape")]
    Shape,
    #[serde(rename = "post-it")]
    PostIt,
}

impl ItemKind {
    /// Name used in the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Text => "text",
            ItemKind::Image => "image",
            ItemKind::Shape => "shape",
            ItemKind::PostIt => "post-it",
        }
    }

    /// Get all item kinds.
    pub fn all() -> &'static [ItemKind] {
        &[ItemKind::Text, ItemKind::Image, ItemKind::Shape, ItemKind::PostIt]
    }
}

impl FromStr for ItemKind {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| BoardError::InvalidArgument(format!("unknown item type: {s}")))
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Outline drawn by shape items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Star,
}

/// Style properties for items. Colors are CSS color strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    pub background_color: String,
    pub color: String,
    pub font_family: String,
    pub font_size: f64,
    pub border_color: String,
    pub border_width: f64,
    #[serde(default)]
    pub text_align: TextAlign,
    /// Only meaningful for [`ItemKind::Shape`].
    #[serde(default)]
    pub shape: ShapeKind,
}

impl Default for ItemStyle {
    fn default() -> Self {
        Self {
            background_color: "transparent".to_string(),
            color: "#000000".to_string(),
            font_family: "Inter, sans-serif".to_string(),
            font_size: 16.0,
            border_color: "transparent".to_string(),
            border_width: 0.0,
            text_align: TextAlign::default(),
            shape: ShapeKind::default(),
        }
    }
}

/// A positioned, styled element on a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasItem {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees (around the center).
    #[serde(default)]
    pub rotation: f64,
    /// Image URL for images, raw text otherwise.
    #[serde(default)]
    pub content: String,
    pub style: ItemStyle,
}

impl CanvasItem {
    /// Top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Unrotated bounding rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Move the item by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Check if a point (in canvas coordinates) lies on the item,
    /// taking rotation into account.
    pub fn contains(&self, point: Point) -> bool {
        let bounds = self.bounds();
        if self.rotation == 0.0 {
            return bounds.contains(point);
        }
        // Undo the rotation around the center, then test the plain rect
        let center = bounds.center();
        let unrotate = Affine::rotate_about(-self.rotation.to_radians(), center);
        bounds.contains(unrotate * point)
    }

    /// Apply a patch, leaving unset fields untouched.
    pub fn apply(&mut self, patch: &ItemPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(style) = &patch.style {
            self.style = style.clone();
        }
    }
}

/// Field-level edit for an item (property panel, text editing).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub content: Option<String>,
    pub style: Option<ItemStyle>,
}

impl ItemPatch {
    /// Patch that only replaces the content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

/// Index of the topmost item containing `point` (front to back search).
pub fn topmost_at(items: &[CanvasItem], point: Point) -> Option<usize> {
    items.iter().rposition(|item| item.contains(point))
}
