use thiserror::Error;

use crate::contact::DecodeError;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed connection already active")]
    AlreadyActive,
    #[error("invalid feed endpoint {url}: {message}")]
    InvalidEndpoint { url: String, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("discarded feed message: {0}")]
    Decode(#[from] DecodeError),
}
