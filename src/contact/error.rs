use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate contact {0} in snapshot")]
    DuplicateIcao(String),
}
