//! End-to-end board scenarios through the public API.

use corkboard_core::{
    Board, BoardError, BoardStore, CanvasController, ItemFactory, ItemKind, MemoryStorage, MouseButton,
    PersistenceGateway, PointerEvent, StoreConfig, StoreEvent,
};
use kurbo::Point;
use pollster::block_on;
use std::collections::HashSet;
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn no_seed() -> StoreConfig {
    StoreConfig {
        seed_welcome_board: false,
        ..StoreConfig::immediate()
    }
}

fn order(store: &BoardStore) -> Vec<String> {
    store
        .active_board()
        .map(|b| b.items.iter().map(|i| i.id.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn select_then_delete_scenario() {
    init_logging();
    let mut x = ItemFactory::create(ItemKind::Text, Some("x"), None);
    x.id = "x".to_string();
    let mut y = ItemFactory::create(ItemKind::PostIt, Some("y"), None);
    y.id = "y".to_string();
    let mut board = Board::new("A");
    board.id = "a".to_string();
    board.items = vec![x, y];

    let gateway = PersistenceGateway::in_memory();
    block_on(gateway.save_all(&[board])).unwrap();
    let mut store = BoardStore::new(gateway.clone(), &StoreConfig::immediate());
    block_on(store.list());

    store.select(Some("x")).unwrap();
    assert_eq!(order(&store), vec!["y", "x"]);

    store.delete_selected().unwrap();
    assert_eq!(order(&store), vec!["y"]);
    assert_eq!(store.selected_item_id(), None);

    block_on(store.flush());
    let persisted = block_on(gateway.load());
    assert_eq!(persisted[0].items.len(), 1);
    assert_eq!(persisted[0].items[0].id, "y");
}

#[test]
fn empty_store_seeds_welcome_board() {
    init_logging();
    let mut store = BoardStore::in_memory();
    let boards = block_on(store.list());

    assert_eq!(boards.len(), 1);
    assert!(!boards[0].items.is_empty());
}

#[test]
fn created_ids_are_fresh() {
    init_logging();
    let mut store = BoardStore::new(PersistenceGateway::in_memory(), &no_seed());
    block_on(store.ensure_loaded());

    for _ in 0..20 {
        let before: HashSet<String> = store.boards().iter().map(|b| b.id.clone()).collect();
        let board = store.create().unwrap();
        assert!(!before.contains(&board.id));
    }
}

#[test]
fn deleting_boards_moves_active_pointer() {
    init_logging();
    let mut store = BoardStore::new(PersistenceGateway::in_memory(), &no_seed());
    block_on(store.ensure_loaded());
    let rx = store.subscribe();
    let first = store.create().unwrap();
    let second = store.create().unwrap();

    store.remove(&first.id).unwrap();
    assert_eq!(store.active_board_id(), Some(second.id.as_str()));

    store.remove(&second.id).unwrap();
    assert_eq!(store.active_board_id(), None);

    let events: Vec<_> = rx.try_iter().collect();
    assert!(events.contains(&StoreEvent::ActiveBoardChanged(None)));
    assert!(matches!(store.remove(&second.id), Err(BoardError::NotFound { .. })));
}

#[test]
fn drag_lands_at_start_plus_deltas() {
    init_logging();
    let mut store = BoardStore::new(PersistenceGateway::in_memory(), &no_seed());
    block_on(store.ensure_loaded());
    let board = store.create().unwrap();
    let note = store
        .add_item(&board.id, ItemFactory::create(ItemKind::PostIt, None, None))
        .unwrap();

    let mut canvas = CanvasController::new();
    let grab = Point::new(note.x + 20.0, note.y + 20.0);
    let path = [(4.0, 0.0), (6.0, 3.0), (-2.0, 7.0), (30.0, -15.0)];

    canvas
        .handle(
            &mut store,
            PointerEvent::Down {
                position: grab,
                button: MouseButton::Left,
            },
        )
        .unwrap();
    let mut pos = grab;
    for (dx, dy) in path {
        pos = Point::new(pos.x + dx, pos.y + dy);
        canvas.handle(&mut store, PointerEvent::Move { position: pos }).unwrap();
    }
    canvas
        .handle(
            &mut store,
            PointerEvent::Up {
                position: pos,
                button: MouseButton::Left,
            },
        )
        .unwrap();

    let moved = store.board(&board.id).unwrap().item(&note.id).unwrap().clone();
    assert_eq!((moved.x, moved.y), (note.x + 38.0, note.y - 5.0));
    assert_eq!(store.selected_item_id(), Some(note.id.as_str()));

    block_on(store.flush());
    let persisted = block_on(store.gateway().load());
    let stored = persisted[0].item(&note.id).unwrap();
    assert_eq!((stored.x, stored.y), (moved.x, moved.y));
}

#[test]
fn saved_collection_loads_back_equal() {
    init_logging();
    let storage = Arc::new(MemoryStorage::new());
    let gateway = PersistenceGateway::new(storage.clone(), &StoreConfig::immediate());

    let mut board = corkboard_core::welcome_board();
    board.items.push(ItemFactory::create(ItemKind::Image, Some("data:image/png;base64,AA=="), None));
    let boards = vec![board, Board::new("Empty")];

    block_on(gateway.save_all(&boards)).unwrap();
    assert_eq!(block_on(gateway.load()), boards);

    // A second gateway over the same storage sees the same collection
    let other = PersistenceGateway::new(storage, &StoreConfig::immediate());
    assert_eq!(block_on(other.load()), boards);
}

#[test]
fn blank_rename_is_rejected() {
    init_logging();
    let mut store = BoardStore::in_memory();
    let id = block_on(store.list())[0].id.clone();

    let result = store.rename(&id, "  ");
    assert!(matches!(result, Err(BoardError::Validation(_))));
    assert_eq!(store.board(&id).unwrap().name, "Welcome");
}

#[test]
fn slow_saves_complete_on_flush() {
    init_logging();
    let config = StoreConfig {
        latency_ms: 5,
        seed_welcome_board: false,
        ..StoreConfig::default()
    };
    let mut store = BoardStore::new(PersistenceGateway::new(Arc::new(MemoryStorage::new()), &config), &config);
    block_on(store.ensure_loaded());

    let board = store.create().unwrap();
    assert_eq!(store.pending_saves(), 1);
    assert_eq!(store.pump(), 0);

    block_on(store.flush());
    assert_eq!(store.pending_saves(), 0);
    assert_eq!(block_on(store.gateway().load())[0].id, board.id);
}
