//! Proposals submitted against a board by other users.

use crate::board::Board;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

/// Review state of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// A message proposing a change to a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: String,
    pub board_id: String,
    pub board_name: String,
    pub message: String,
    /// Author. Older records call this `userName`.
    #[serde(alias = "userName")]
    pub from: String,
    #[serde(default)]
    pub status: ProposalStatus,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl Proposal {
    /// Create a pending proposal for a board.
    pub fn new(board: &Board, from: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            board_id: board.id.clone(),
            board_name: board.name.clone(),
            message: message.into(),
            from: from.into(),
            status: ProposalStatus::Pending,
            timestamp: now_millis(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ProposalStatus::Pending
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_proposal_is_pending() {
        let board = Board::new("Ideas");
        let proposal = Proposal::new(&board, "sam", "Add a roadmap section");
        assert!(proposal.is_pending());
        assert_eq!(proposal.board_id, board.id);
        assert_eq!(proposal.board_name, "Ideas");
        assert!(proposal.timestamp > 0);
    }

    #[test]
    fn test_user_name_alias() {
        let json = r#"{
            "id": "p1", "boardId": "b1", "boardName": "B", "message": "hi",
            "userName": "alex", "status": "accepted", "timestamp": 5
        }"#;
        let proposal: Proposal = serde_json::from_str(json).unwrap();
        assert_eq!(proposal.from, "alex");
        assert_eq!(proposal.status, ProposalStatus::Accepted);

        let out = serde_json::to_value(&proposal).unwrap();
        assert_eq!(out["from"], "alex");
        assert_eq!(out["status"], "accepted");
    }
}
