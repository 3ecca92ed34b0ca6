use crate::model::EntryKey;
use crate::tags::TagValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Deck already contains {0}")]
    DuplicateEntry(EntryKey),

    #[error("Deck entry not found: {0}")]
    NotFound(EntryKey),

    #[error("Face index {index} out of range (card has {faces} face(s))")]
    FaceOutOfRange { index: usize, faces: usize },

    #[error("Invalid tag: {0}")]
    InvalidTag(#[from] TagValidationError),

    #[error("Amount must be at least 1")]
    InvalidAmount,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, DeckError>;
