//! Player persistence: the store interface and its document-store implementation.

mod document;

pub use document::DocumentStore;

use crate::models::{Player, PlayerFields, PlayerId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("player {0} not found")]
    NotFound(PlayerId),
    #[error("a player named {0:?} already exists")]
    DuplicateName(String),
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed store document: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Operations the application needs from player storage.
///
/// Name uniqueness is exact and case-sensitive: "ana" and "Ana" may coexist.
pub trait PlayerStore: Send + Sync {
    /// All players, sorted by name ascending.
    fn list(&self) -> Result<Vec<Player>, StoreError>;

    /// Players whose id is in `ids`, each at most once. Unknown ids are skipped,
    /// so a short result means some ids were not found.
    fn find_many(&self, ids: &[PlayerId]) -> Result<Vec<Player>, StoreError>;

    /// Player with exactly this name, if any.
    fn find_by_name(&self, name: &str) -> Result<Option<Player>, StoreError>;

    /// Up to `limit` players whose name contains `fragment` (case-insensitive), sorted by name.
    fn search(&self, fragment: &str, limit: usize) -> Result<Vec<Player>, StoreError>;

    /// Fails with `DuplicateName` if the name is taken.
    fn insert(&self, fields: PlayerFields) -> Result<Player, StoreError>;

    /// Replace every editable field. Fails with `NotFound` if `id` is unknown, or
    /// `DuplicateName` if another player already has the new name.
    fn update(&self, id: PlayerId, fields: PlayerFields) -> Result<Player, StoreError>;

    /// Returns the removed player, or `NotFound`.
    fn delete(&self, id: PlayerId) -> Result<Player, StoreError>;

    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}
