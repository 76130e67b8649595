//! The board store: sole owner and mutator of the board collection.
//!
//! Mutations are applied to the in-memory collection synchronously and are
//! visible to the next read. Each one then issues a whole-collection save
//! through the [`PersistenceGateway`]. Saves are not queued: they run
//! concurrently and may complete in any order. A failed save is logged and
//! published as [`StoreEvent::PersistenceFailed`]; the in-memory state is
//! never rolled back.

use crate::board::{Board, BoardId, BoardPatch, NEW_BOARD_PREFIX, find_duplicate_id, welcome_board};
use crate::config::StoreConfig;
use crate::error::{BoardError, BoardResult};
use crate::item::{CanvasItem, ItemId, ItemPatch};
use crate::selection::{SelectOutcome, Selection};
use crate::storage::{BoxFuture, PersistenceGateway, StorageError, StorageResult};
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use kurbo::Vec2;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::task::{Context, Poll};
use uuid::Uuid;

/// Change notifications published to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The board collection or a board's contents changed.
    BoardsChanged,
    /// The active board changed.
    ActiveBoardChanged(Option<BoardId>),
    /// The selected item changed.
    SelectionChanged(Option<ItemId>),
    /// A save issued by mutation number `seq` failed. The in-memory state was kept.
    PersistenceFailed { seq: u64, error: StorageError },
}

type PendingSave = BoxFuture<'static, (u64, StorageResult<()>)>;

/// Owns the boards, the active board pointer and the selection.
pub struct BoardStore {
    gateway: PersistenceGateway,
    seed_welcome_board: bool,
    boards: Vec<Board>,
    active: Option<BoardId>,
    selection: Selection,
    loaded: bool,
    in_flight: FuturesUnordered<PendingSave>,
    next_seq: u64,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl BoardStore {
    /// Create a store over a gateway. Nothing is loaded until the first [`list`](Self::list).
    pub fn new(gateway: PersistenceGateway, config: &StoreConfig) -> Self {
        Self {
            gateway,
            seed_welcome_board: config.seed_welcome_board,
            boards: Vec::new(),
            active: None,
            selection: Selection::new(),
            loaded: false,
            in_flight: FuturesUnordered::new(),
            next_seq: 0,
            subscribers: Vec::new(),
        }
    }

    /// Store over fresh in-memory storage without latency.
    pub fn in_memory() -> Self {
        Self::new(PersistenceGateway::in_memory(), &StoreConfig::immediate())
    }

    /// The gateway this store persists through.
    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    // --- Reads ---

    /// Boards in store order, loading them on first use.
    ///
    /// If durable storage holds no boards, a single welcome board is seeded.
    pub async fn list(&mut self) -> &[Board] {
        self.ensure_loaded().await;
        &self.boards
    }

    /// Load from the gateway if that has not happened yet.
    pub async fn ensure_loaded(&mut self) {
        if self.loaded {
            return;
        }
        let mut boards = self.gateway.load().await;
        let seeded = boards.is_empty() && self.seed_welcome_board;
        if seeded {
            log::info!("No stored boards, seeding welcome board");
            boards.push(welcome_board());
        } else {
            log::info!("Loaded {} boards", boards.len());
        }

        self.boards = boards;
        self.active = self.boards.first().map(|b| b.id.clone());
        self.loaded = true;

        if seeded {
            self.persist();
        }
        self.emit(StoreEvent::BoardsChanged);
        self.emit(StoreEvent::ActiveBoardChanged(self.active.clone()));
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Cached boards without triggering a load.
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// Get a board by id.
    pub fn board(&self, id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    pub fn active_board_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_board(&self) -> Option<&Board> {
        self.active.as_deref().and_then(|id| self.board(id))
    }

    /// The selected item on the active board.
    pub fn selected_item_id(&self) -> Option<&str> {
        self.selection.selected()
    }

    pub fn selected_item(&self) -> Option<&CanvasItem> {
        let id = self.selection.selected()?;
        self.active_board()?.item(id)
    }

    // --- Board operations ---

    /// Append a new, empty board named "New Board N" and make it active.
    pub fn create(&mut self) -> BoardResult<Board> {
        self.ensure_ready()?;
        let numbered = self
            .boards
            .iter()
            .filter(|b| b.name.starts_with(NEW_BOARD_PREFIX))
            .count();
        let mut board = Board::new(format!("{} {}", NEW_BOARD_PREFIX, numbered + 1));
        while self.board(&board.id).is_some() {
            board.id = Uuid::new_v4().to_string();
        }

        self.boards.push(board.clone());
        log::debug!("Created board {} ({})", board.name, board.id);
        self.set_active_unchecked(Some(board.id.clone()));
        self.persist();
        self.emit(StoreEvent::BoardsChanged);
        Ok(board)
    }

    /// Rename a board. Names that trim to empty are rejected.
    pub fn rename(&mut self, board_id: &str, new_name: &str) -> BoardResult<Board> {
        self.ensure_ready()?;
        if new_name.trim().is_empty() {
            return Err(BoardError::Validation("board name cannot be empty".to_string()));
        }
        let board = self.board_mut(board_id)?;
        board.name = new_name.to_string();
        let board = board.clone();
        self.persist();
        self.emit(StoreEvent::BoardsChanged);
        Ok(board)
    }

    /// Remove a board and all of its items.
    ///
    /// If it was active, the first remaining board becomes active (or none).
    /// Removing the last board clears the durable record.
    pub fn remove(&mut self, board_id: &str) -> BoardResult<()> {
        self.ensure_ready()?;
        let pos = self
            .boards
            .iter()
            .position(|b| b.id == board_id)
            .ok_or_else(|| BoardError::board_not_found(board_id))?;
        let removed = self.boards.remove(pos);
        log::debug!("Removed board {} ({} items)", removed.id, removed.items.len());

        if self.active.as_deref() == Some(board_id) {
            let next = self.boards.first().map(|b| b.id.clone());
            self.set_active_unchecked(next);
        }
        self.persist();
        self.emit(StoreEvent::BoardsChanged);
        Ok(())
    }

    /// Replace a board's entire item sequence.
    pub fn replace_items(&mut self, board_id: &str, items: Vec<CanvasItem>) -> BoardResult<Board> {
        self.ensure_ready()?;
        if let Some(dup) = find_duplicate_id(&items) {
            return Err(BoardError::Validation(format!("duplicate item id: {}", dup)));
        }
        let board = self.board_mut(board_id)?;
        board.items = items;
        let board = board.clone();
        if self.selection.retain_items(&board) {
            self.emit(StoreEvent::SelectionChanged(None));
        }
        self.persist();
        self.emit(StoreEvent::BoardsChanged);
        Ok(board)
    }

    /// Merge descriptive fields into a board.
    pub fn update(&mut self, board_id: &str, patch: BoardPatch) -> BoardResult<Board> {
        self.ensure_ready()?;
        let board = self.board_mut(board_id)?;
        board.apply(patch);
        let board = board.clone();
        self.persist();
        self.emit(StoreEvent::BoardsChanged);
        Ok(board)
    }

    /// Make another board active. Clears the selection.
    pub fn set_active(&mut self, board_id: &str) -> BoardResult<()> {
        self.ensure_ready()?;
        if self.board(board_id).is_none() {
            return Err(BoardError::board_not_found(board_id));
        }
        self.set_active_unchecked(Some(board_id.to_string()));
        Ok(())
    }

    // --- Item operations ---

    /// Append an item on top of a board.
    pub fn add_item(&mut self, board_id: &str, item: CanvasItem) -> BoardResult<CanvasItem> {
        self.ensure_ready()?;
        let board = self.board_mut(board_id)?;
        if board.item(&item.id).is_some() {
            return Err(BoardError::Validation(format!("duplicate item id: {}", item.id)));
        }
        board.items.push(item.clone());
        self.persist();
        self.emit(StoreEvent::BoardsChanged);
        Ok(item)
    }

    /// Edit an item's geometry, content or style in place.
    pub fn update_item(
        &mut self,
        board_id: &str,
        item_id: &str,
        patch: &ItemPatch,
    ) -> BoardResult<CanvasItem> {
        self.mutate_item(board_id, item_id, |item| item.apply(patch))
    }

    /// Move an item by a delta.
    pub fn translate_item(
        &mut self,
        board_id: &str,
        item_id: &str,
        delta: Vec2,
    ) -> BoardResult<CanvasItem> {
        self.mutate_item(board_id, item_id, |item| item.translate(delta))
    }

    /// Delete an item. Clears the selection if it was selected.
    pub fn remove_item(&mut self, board_id: &str, item_id: &str) -> BoardResult<CanvasItem> {
        self.ensure_ready()?;
        let board = self.board_mut(board_id)?;
        let pos = board
            .position_of(item_id)
            .ok_or_else(|| BoardError::item_not_found(item_id))?;
        let removed = board.items.remove(pos);
        if self.selection.forget_item(board_id, item_id) {
            self.emit(StoreEvent::SelectionChanged(None));
        }
        self.persist();
        self.emit(StoreEvent::BoardsChanged);
        Ok(removed)
    }

    // --- Selection ---

    /// Select an item on the active board (promoting it to topmost), or clear with `None`.
    pub fn select(&mut self, item_id: Option<&str>) -> BoardResult<()> {
        self.ensure_ready()?;
        let outcome = match (self.active.clone(), item_id) {
            (_, None) => SelectOutcome {
                selection_changed: self.selection.clear(),
                reordered: false,
            },
            (None, Some(id)) => return Err(BoardError::item_not_found(id)),
            (Some(active), Some(id)) => {
                let pos = self
                    .boards
                    .iter()
                    .position(|b| b.id == active)
                    .ok_or_else(|| BoardError::board_not_found(&active))?;
                self.selection.select(&mut self.boards[pos], Some(id))?
            }
        };

        if outcome.reordered {
            self.persist();
            self.emit(StoreEvent::BoardsChanged);
        }
        if outcome.selection_changed {
            self.emit(StoreEvent::SelectionChanged(item_id.map(str::to_string)));
        }
        Ok(())
    }

    /// Delete the selected item.
    pub fn delete_selected(&mut self) -> BoardResult<CanvasItem> {
        let (board_id, item_id) = self.require_selection()?;
        self.remove_item(&board_id, &item_id)
    }

    /// Replace the text content of the selected item.
    pub fn edit_selected_content(&mut self, content: &str) -> BoardResult<CanvasItem> {
        let (board_id, item_id) = self.require_selection()?;
        self.update_item(&board_id, &item_id, &ItemPatch::content(content))
    }

    // --- Persistence ---

    /// Number of saves issued but not yet completed.
    pub fn pending_saves(&self) -> usize {
        self.in_flight.len()
    }

    /// Make progress on in-flight saves without blocking. Returns how many completed.
    pub fn pump(&mut self) -> usize {
        let mut cx = Context::from_waker(futures_util::task::noop_waker_ref());
        let mut completed = 0;
        while let Poll::Ready(Some((seq, result))) = self.in_flight.poll_next_unpin(&mut cx) {
            self.complete_save(seq, result);
            completed += 1;
        }
        completed
    }

    /// Drive every in-flight save to completion.
    pub async fn flush(&mut self) {
        while let Some((seq, result)) = self.in_flight.next().await {
            self.complete_save(seq, result);
        }
    }

    // --- Internals ---

    fn ensure_ready(&self) -> BoardResult<()> {
        if self.loaded {
            Ok(())
        } else {
            Err(BoardError::NotLoaded)
        }
    }

    fn board_mut(&mut self, board_id: &str) -> BoardResult<&mut Board> {
        self.boards
            .iter_mut()
            .find(|b| b.id == board_id)
            .ok_or_else(|| BoardError::board_not_found(board_id))
    }

    fn mutate_item(
        &mut self,
        board_id: &str,
        item_id: &str,
        f: impl FnOnce(&mut CanvasItem),
    ) -> BoardResult<CanvasItem> {
        self.ensure_ready()?;
        let item = self
            .board_mut(board_id)?
            .item_mut(item_id)
            .ok_or_else(|| BoardError::item_not_found(item_id))?;
        f(item);
        let item = item.clone();
        self.persist();
        self.emit(StoreEvent::BoardsChanged);
        Ok(item)
    }

    fn require_selection(&self) -> BoardResult<(BoardId, ItemId)> {
        match (self.selection.board_id(), self.selection.selected()) {
            (Some(board_id), Some(item_id)) => Ok((board_id.to_string(), item_id.to_string())),
            _ => Err(BoardError::Validation("no item is selected".to_string())),
        }
    }

    fn set_active_unchecked(&mut self, board_id: Option<BoardId>) {
        if self.active == board_id {
            return;
        }
        self.active = board_id;
        if self.selection.retain_board(self.active.as_deref()) {
            self.emit(StoreEvent::SelectionChanged(None));
        }
        self.emit(StoreEvent::ActiveBoardChanged(self.active.clone()));
    }

    /// Issue a save of the whole collection, or clear the record when it is empty.
    fn persist(&mut self) {
        self.next_seq += 1;
        let seq = self.next_seq;
        let save = if self.boards.is_empty() {
            log::debug!("Save #{}: collection empty, clearing record", seq);
            self.gateway.clear()
        } else {
            log::debug!("Save #{}: {} boards", seq, self.boards.len());
            self.gateway.save_all(&self.boards)
        };
        self.in_flight.push(Box::pin(async move { (seq, save.await) }));
    }

    fn complete_save(&mut self, seq: u64, result: StorageResult<()>) {
        match result {
            Ok(()) => log::debug!("Save #{} completed", seq),
            Err(error) => {
                log::error!("Save #{} failed, keeping in-memory state: {}", seq, error);
                self.emit(StoreEvent::PersistenceFailed { seq, error });
            }
        }
    }

    fn emit(&mut self, event: StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
