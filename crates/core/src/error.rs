use thiserror::Error;

pub type BidForgeResult<T> = Result<T, BidForgeError>;

#[derive(Error, Debug)]
pub enum BidForgeError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
