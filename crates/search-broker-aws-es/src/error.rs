//! AWS Elasticsearch control plane error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControlPlaneError {
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ControlPlaneError>;
