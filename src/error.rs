use thiserror::Error;

use crate::entity::ValidationError;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A patch that would leave the stored entry invalid. Unlike a failed
    /// create this is answered as a server error.
    #[error("{0}")]
    RejectedUpdate(#[source] ValidationError),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Background task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, JournalError>;
