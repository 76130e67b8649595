//! Construction of new items with type-specific defaults.

use crate::error::BoardResult;
use crate::item::{CanvasItem, ItemKind, ItemStyle, ShapeKind, TextAlign};
use kurbo::Point;
use uuid::Uuid;

/// Where new items are placed.
pub const DEFAULT_POSITION: Point = Point::new(150.0, 150.0);

/// Default tilt of a fresh post-it, in degrees.
pub const POST_IT_ROTATION: f64 = -3.0;

/// Builds new canvas items.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemFactory;

impl ItemFactory {
    /// Create an item of the given kind.
    ///
    /// `content` is the image URL for images and the initial text otherwise.
    /// `shape` only applies to [`ItemKind::Shape`] and defaults to a rectangle.
    pub fn create(kind: ItemKind, content: Option<&str>, shape: Option<ShapeKind>) -> CanvasItem {
        let (width, height, rotation, style, fallback_content) = match kind {
            ItemKind::Text => (
                200.0,
                50.0,
                0.0,
                ItemStyle {
                    background_color: "transparent".to_string(),
                    color: "#ffffff".to_string(),
                    font_size: 24.0,
                    text_align: TextAlign::Center,
                    ..ItemStyle::default()
                },
                "Double-click to edit",
            ),
            ItemKind::Image => (200.0, 200.0, 0.0, ItemStyle::default(), ""),
            ItemKind::PostIt => (
                150.0,
                150.0,
                POST_IT_ROTATION,
                ItemStyle {
                    background_color: "#fef3a0".to_string(),
                    color: "#1f2937".to_string(),
                    font_family: "'Caveat', cursive".to_string(),
                    font_size: 18.0,
                    text_align: TextAlign::Left,
                    ..ItemStyle::default()
                },
                "New note",
            ),
            ItemKind::Shape => (
                150.0,
                150.0,
                0.0,
                ItemStyle {
                    background_color: "#e2e8f0".to_string(),
                    border_color: "#94a3b8".to_string(),
                    border_width: 2.0,
                    shape: shape.unwrap_or_default(),
                    ..ItemStyle::default()
                },
                "",
            ),
        };

        CanvasItem {
            id: Uuid::new_v4().to_string(),
            kind,
            x: DEFAULT_POSITION.x,
            y: DEFAULT_POSITION.y,
            width,
            height,
            rotation,
            content: content.unwrap_or(fallback_content).to_string(),
            style,
        }
    }

    /// Create an item from its serialized type name (`"text"`, `"post-it"`, ...).
    ///
    /// Fails with [`BoardError::InvalidArgument`](crate::BoardError::InvalidArgument)
    /// for unknown names.
    pub fn create_named(
        type_name: &str,
        content: Option<&str>,
        shape: Option<ShapeKind>,
    ) -> BoardResult<CanvasItem> {
        let kind = type_name.parse::<ItemKind>()?;
        Ok(Self::create(kind, content, shape))
    }
}
