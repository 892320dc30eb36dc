use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("grant error: {0}")]
    Grant(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}
