use roster_common::FieldError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    InvalidInput(#[from] FieldError),
    #[error("person {0} not found")]
    NotFound(i64),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    UnexpectedStatus(u16),
    #[error("server did not return JSON (content type {0:?})")]
    NotJson(String),
}
