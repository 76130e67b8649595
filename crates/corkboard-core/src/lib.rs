//! Corkboard Core Library
//!
//! Boards of free-positioned canvas items: the item model and factory, the
//! board store with its selection and z-order policy, pointer-driven dragging,
//! and whole-collection persistence over pluggable storage.

pub mod board;
pub mod config;
pub mod drag;
pub mod error;
pub mod factory;
pub mod input;
pub mod interaction;
pub mod item;
pub mod proposal;
pub mod selection;
pub mod services;
pub mod storage;
pub mod store;

pub use board::{Board, BoardId, BoardPatch, welcome_board};
pub use config::StoreConfig;
pub use drag::{DragController, DragState};
pub use error::{BoardError, BoardResult, EntityKind};
pub use factory::ItemFactory;
pub use input::{DocumentListeners, ListenerGuard, MouseButton, PointerEvent};
pub use interaction::{CanvasController, PointerOutcome};
pub use item::{CanvasItem, ItemId, ItemKind, ItemPatch, ItemStyle, ShapeKind, TextAlign};
pub use proposal::{Proposal, ProposalStatus};
pub use selection::Selection;
pub use services::{BoardRanker, BoardSummary, ImageGenerator, TextGenerator};
pub use storage::{MemoryStorage, PersistenceGateway, Storage, StorageError, StorageResult};
pub use store::{BoardStore, StoreEvent};
