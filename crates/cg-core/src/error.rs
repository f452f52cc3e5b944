use crate::types::Identity;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CgError {
    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),
    #[error("Snippet index {index} out of range (registry holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("No snippet with identity {0}")]
    UnknownIdentity(Identity),
    #[error("Invalid filename: {0:?}")]
    InvalidName(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CgError>;
