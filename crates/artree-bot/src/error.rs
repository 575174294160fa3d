//! Error types for the bot system.

use thiserror::Error;

/// Errors from the durable submission store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error while reading or writing store state.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Store state failed to serialize or deserialize.
    #[error("state serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that can occur while polling, processing, or publishing.
#[derive(Debug, Error)]
pub enum BotError {
    /// The durable store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error in a message source or publisher.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A message or payload failed to serialize or deserialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Encoding or writing an image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
