use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("invalid id: {0:?}")]
    InvalidId(String),
    #[error("record {0} not found")]
    NotFound(i64),
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }

    pub fn persistence(err: impl std::fmt::Display) -> Self { Self::Persistence(err.to_string()) }
}
