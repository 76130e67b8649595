//! Persistence gateway: whole-collection load/save over a key-value backend.

use super::{BoxFuture, Latency, MemoryStorage, Storage, StorageError, StorageResult};
use crate::board::{Board, dedup_collection};
use crate::config::StoreConfig;
use crate::error::{BoardError, BoardResult, EntityKind};
use crate::proposal::{Proposal, ProposalStatus};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Record key for the proposals of one namespace (usually a board id).
pub fn proposals_key(prefix: &str, namespace: &str) -> String {
    format!("{}.{}", prefix, namespace)
}

/// Asynchronous boundary between the in-memory board collection and durable storage.
///
/// The unit of durability is the whole collection: every save replaces the
/// single board record. Concurrent writers are not detected; the last write
/// to complete wins.
#[derive(Clone)]
pub struct PersistenceGateway {
    storage: Arc<dyn Storage>,
    boards_key: String,
    proposals_prefix: String,
    latency: Duration,
}

impl PersistenceGateway {
    /// Create a gateway over a storage backend.
    pub fn new(storage: Arc<dyn Storage>, config: &StoreConfig) -> Self {
        Self {
            storage,
            boards_key: config.boards_key.clone(),
            proposals_prefix: config.proposals_key_prefix.clone(),
            latency: config.latency(),
        }
    }

    /// Gateway over fresh in-memory storage without latency.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), &StoreConfig::immediate())
    }

    /// The underlying storage backend.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Load the board collection.
    ///
    /// Missing or corrupt data degrades to an empty collection; this never fails.
    /// Boards and items repeating an earlier id are dropped.
    pub fn load(&self) -> BoxFuture<'static, Vec<Board>> {
        let storage = self.storage.clone();
        let key = self.boards_key.clone();
        let latency = self.latency;
        Box::pin(async move {
            Latency::new(latency).await;
            let mut boards: Vec<Board> = read_collection(storage.as_ref(), &key).await;
            let dropped = dedup_collection(&mut boards);
            if dropped > 0 {
                log::warn!("Dropped {} entries with duplicate ids from '{}'", dropped, key);
            }
            boards
        })
    }

    /// Replace the stored collection with `boards`.
    ///
    /// The collection is serialized when this is called, so the returned
    /// future persists the state as of the call even if it is polled later.
    pub fn save_all(&self, boards: &[Board]) -> BoxFuture<'static, StorageResult<()>> {
        let encoded = encode(boards);
        let storage = self.storage.clone();
        let key = self.boards_key.clone();
        let latency = self.latency;
        Box::pin(async move {
            let json = encoded?;
            Latency::new(latency).await;
            storage.save(&key, json).await
        })
    }

    /// Remove the stored collection entirely.
    pub fn clear(&self) -> BoxFuture<'static, StorageResult<()>> {
        let storage = self.storage.clone();
        let key = self.boards_key.clone();
        let latency = self.latency;
        Box::pin(async move {
            Latency::new(latency).await;
            storage.delete(&key).await
        })
    }

    /// Load the proposals stored for a namespace. Missing or corrupt records load as empty.
    pub fn load_proposals(&self, namespace: &str) -> BoxFuture<'static, Vec<Proposal>> {
        let storage = self.storage.clone();
        let key = proposals_key(&self.proposals_prefix, namespace);
        let latency = self.latency;
        Box::pin(async move {
            Latency::new(latency).await;
            read_collection(storage.as_ref(), &key).await
        })
    }

    /// Replace the proposals stored for a namespace.
    pub fn save_proposals(
        &self,
        namespace: &str,
        proposals: &[Proposal],
    ) -> BoxFuture<'static, StorageResult<()>> {
        let encoded = encode(proposals);
        let storage = self.storage.clone();
        let key = proposals_key(&self.proposals_prefix, namespace);
        let latency = self.latency;
        Box::pin(async move {
            let json = encoded?;
            Latency::new(latency).await;
            storage.save(&key, json).await
        })
    }

    /// Append a proposal to its board's namespace.
    pub async fn submit_proposal(&self, proposal: Proposal) -> StorageResult<()> {
        let namespace = proposal.board_id.clone();
        let mut proposals = self.load_proposals(&namespace).await;
        proposals.push(proposal);
        self.save_proposals(&namespace, &proposals).await
    }

    /// Set the status of a stored proposal and return the updated record.
    pub async fn resolve_proposal(
        &self,
        namespace: &str,
        proposal_id: &str,
        status: ProposalStatus,
    ) -> BoardResult<Proposal> {
        let mut proposals = self.load_proposals(namespace).await;
        let proposal = proposals
            .iter_mut()
            .find(|p| p.id == proposal_id)
            .ok_or_else(|| BoardError::NotFound {
                kind: EntityKind::Proposal,
                id: proposal_id.to_string(),
            })?;
        proposal.status = status;
        let updated = proposal.clone();
        self.save_proposals(namespace, &proposals).await?;
        Ok(updated)
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> StorageResult<String> {
    serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))
}

async fn read_collection<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Vec<T> {
    let json = match storage.load(key).await {
        Ok(json) => json,
        Err(StorageError::NotFound(_)) => {
            log::info!("No stored record under '{}'", key);
            return Vec::new();
        }
        Err(e) => {
            log::warn!("Failed to read '{}', starting empty: {}", key, e);
            return Vec::new();
        }
    };
    match serde_json::from_str(&json) {
        Ok(values) => values,
        Err(e) => {
            log::warn!("Discarding corrupt record '{}': {}", key, e);
            Vec::new()
        }
    }
}
