//! Error types for deck loading and external collaborators

use thiserror::Error;

/// Errors raised while building a deck (sections + settings)
#[derive(Error, Debug)]
pub enum DeckError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deck parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Deck contains no sections")]
    EmptyDeck,

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

/// Failures reported by the scene or audio collaborators.
///
/// These never abort navigation; the sync dispatcher logs them and moves on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    #[error("Scene not loaded")]
    SceneUnavailable,

    #[error("Scene object '{0}' not found")]
    ObjectNotFound(String),

    #[error("Audio asset missing: {0}")]
    AssetMissing(String),

    #[error("Playback blocked: {0}")]
    PlaybackBlocked(String),

    #[error("Collaborator error: {0}")]
    Other(String),
}
