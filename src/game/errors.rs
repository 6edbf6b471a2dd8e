use thiserror::Error;

/// Errors that can arise while driving the game state engine.
///
/// None of these are fatal to a session: the engine records the message in the
/// snapshot's `error` field and keeps the previously committed state.
#[derive(Debug, Error)]
pub enum GameError {
    /// A world, location, character, dialogue, quest, objective or item id did not resolve.
    #[error("not found: {0}")]
    NotFound(String),

    /// Travel target is not the current location or one of its connections.
    #[error("location {to} is not reachable from {from}")]
    Unreachable { from: String, to: String },

    /// The request is not allowed in the current state (e.g. tutorial lock).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Malformed world definitions in a content pack.
    #[error("invalid content: {0}")]
    InvalidContent(String),

    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, content files).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },
}

impl GameError {
    /// True for the save/load family, which must never block gameplay.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            GameError::Sled(_)
                | GameError::Bincode(_)
                | GameError::Io(_)
                | GameError::SchemaMismatch { .. }
        )
    }

    pub(crate) fn not_found(kind: &str, id: &str) -> Self {
        GameError::NotFound(format!("{}: {}", kind, id))
    }
}
