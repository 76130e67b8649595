//! Collaborator services: text and image generation, board ranking.
//!
//! These are thin seams over external providers. Their failures never reach
//! the store; each helper logs the error and applies a fallback.

use crate::board::{Board, BoardId};
use crate::error::BoardResult;
use crate::factory::ItemFactory;
use crate::item::{CanvasItem, ItemKind};
use crate::storage::BoxFuture;
use serde::{Deserialize, Serialize};

/// Produces text for a note from a prompt context.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, context: &str) -> BoxFuture<'_, BoardResult<String>>;
}

/// Produces an image for a prompt, as a data URI.
///
/// `Ok(None)` means the provider returned no image.
pub trait ImageGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> BoxFuture<'_, BoardResult<Option<String>>>;
}

/// Orders boards by relevance to a query.
pub trait BoardRanker: Send + Sync {
    fn rank<'a>(&'a self, query: &'a str, boards: &'a [BoardSummary]) -> BoxFuture<'a, BoardResult<Vec<BoardId>>>;
}

/// What a ranker gets to see of a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub id: BoardId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl From<&Board> for BoardSummary {
    fn from(board: &Board) -> Self {
        Self {
            id: board.id.clone(),
            name: board.name.clone(),
            description: board.description.clone(),
            tags: board.tags.clone(),
        }
    }
}

/// Case-insensitive substring match over name, description and tags.
fn matches_naively(board: &Board, needle: &str) -> bool {
    let hit = |s: &str| s.to_lowercase().contains(needle);
    hit(&board.name)
        || board.description.as_deref().is_some_and(hit)
        || board.tags.iter().flatten().any(|t| hit(t))
}

/// Search boards, ranked by `ranker` when it succeeds.
///
/// Ranked ids that don't match a board are skipped. On ranker failure the
/// result is the naive match in store order. A blank query returns every board.
pub async fn search_boards<'a>(
    ranker: &dyn BoardRanker,
    boards: &'a [Board],
    query: &str,
) -> Vec<&'a Board> {
    let query = query.trim();
    if query.is_empty() {
        return boards.iter().collect();
    }

    let summaries: Vec<BoardSummary> = boards.iter().map(BoardSummary::from).collect();
    match ranker.rank(query, &summaries).await {
        Ok(ids) => ids
            .iter()
            .filter_map(|id| boards.iter().find(|b| &b.id == id))
            .collect(),
        Err(e) => {
            log::warn!("Board ranking failed, using substring search: {}", e);
            let needle = query.to_lowercase();
            boards.iter().filter(|b| matches_naively(b, &needle)).collect()
        }
    }
}

/// Generate note text. `None` means the caller should fall back to manual input.
pub async fn generate_text(generator: &dyn TextGenerator, context: &str) -> Option<String> {
    match generator.generate(context).await {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => {
            log::warn!("Text generation returned nothing");
            None
        }
        Err(e) => {
            log::warn!("Text generation failed: {}", e);
            None
        }
    }
}

/// Generate an image and wrap it in a new image item.
///
/// Returns `None` when the provider fails or has nothing; the call can be retried.
pub async fn generate_image_item(generator: &dyn ImageGenerator, prompt: &str) -> Option<CanvasItem> {
    match generator.generate(prompt).await {
        Ok(Some(uri)) => Some(ItemFactory::create(ItemKind::Image, Some(&uri), None)),
        Ok(None) => {
            log::warn!("Image generation returned no image for {:?}", prompt);
            None
        }
        Err(e) => {
            log::warn!("Image generation failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardPatch;
    use crate::error::BoardError;
    use pollster::block_on;

    struct Fixed(Vec<&'static str>);

    impl BoardRanker for Fixed {
        fn rank<'a>(&'a self, _query: &'a str, _boards: &'a [BoardSummary]) -> BoxFuture<'a, BoardResult<Vec<BoardId>>> {
            let ids = self.0.iter().map(|s| s.to_string()).collect();
            Box::pin(async move { Ok(ids) })
        }
    }

    struct Down;

    impl BoardRanker for Down {
        fn rank<'a>(&'a self, _query: &'a str, _boards: &'a [BoardSummary]) -> BoxFuture<'a, BoardResult<Vec<BoardId>>> {
            Box::pin(async { Err(BoardError::Upstream("503".to_string())) })
        }
    }

    impl TextGenerator for Down {
        fn generate(&self, _context: &str) -> BoxFuture<'_, BoardResult<String>> {
            Box::pin(async { Err(BoardError::Upstream("timeout".to_string())) })
        }
    }

    impl ImageGenerator for Down {
        fn generate(&self, _prompt: &str) -> BoxFuture<'_, BoardResult<Option<String>>> {
            Box::pin(async { Err(BoardError::Upstream("timeout".to_string())) })
        }
    }

    struct Echo;

    impl TextGenerator for Echo {
        fn generate(&self, context: &str) -> BoxFuture<'_, BoardResult<String>> {
            let text = format!("Idea: {}", context);
            Box::pin(async move { Ok(text) })
        }
    }

    impl ImageGenerator for Echo {
        fn generate(&self, _prompt: &str) -> BoxFuture<'_, BoardResult<Option<String>>> {
            Box::pin(async { Ok(Some("data:image/png;base64,AAAA".to_string())) })
        }
    }

    fn boards() -> Vec<Board> {
        let mut a = Board::new("Kitchen remodel");
        a.id = "a".to_string();
        let mut b = Board::new("Trip");
        b.id = "b".to_string();
        b.apply(BoardPatch {
            description: Some("Lisbon in May".to_string()),
            ..BoardPatch::default()
        });
        let mut c = Board::new("Misc");
        c.id = "c".to_string();
        c.apply(BoardPatch {
            tags: Some(vec!["Travel".to_string()]),
            ..BoardPatch::default()
        });
        vec![a, b, c]
    }

    fn ids(found: &[&Board]) -> Vec<String> {
        found.iter().map(|b| b.id.clone()).collect()
    }

    #[test]
    fn test_search_uses_ranker_order() {
        let boards = boards();
        let found = block_on(search_boards(&Fixed(vec!["c", "ghost", "a"]), &boards, "anything"));
        assert_eq!(ids(&found), vec!["c", "a"]);
    }

    #[test]
    fn test_search_falls_back_to_substring() {
        let boards = boards();

        let found = block_on(search_boards(&Down, &boards, "LISBON"));
        assert_eq!(ids(&found), vec!["b"]);

        let found = block_on(search_boards(&Down, &boards, "trav"));
        assert_eq!(ids(&found), vec!["c"]);

        let found = block_on(search_boards(&Down, &boards, "i"));
        assert_eq!(ids(&found), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_blank_query_returns_all() {
        let boards = boards();
        let found = block_on(search_boards(&Down, &boards, "  "));
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_generate_text() {
        assert_eq!(
            block_on(generate_text(&Echo, "groceries")).as_deref(),
            Some("Idea: groceries")
        );
        assert_eq!(block_on(generate_text(&Down, "groceries")), None);
    }

    #[test]
    fn test_generate_image_item() {
        let item = block_on(generate_image_item(&Echo, "a cat")).unwrap();
        assert_eq!(item.kind, ItemKind::Image);
        assert_eq!(item.content, "data:image/png;base64,AAAA");

        assert!(block_on(generate_image_item(&Down, "a cat")).is_none());
    }
}
