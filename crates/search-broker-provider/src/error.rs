//! Provider error types

use crate::instance::Instance;
use thiserror::Error;

/// Provider errors
///
/// Every failure is returned to the immediate caller. Nothing in this layer
/// retries or rolls back.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Instance not found: {0}")]
    NotFound(String),

    #[error("Control plane unavailable: {0}")]
    Transient(String),

    #[error("Provision failed: {0}")]
    Provision(String),

    /// The resource was created but the ownership tag could not be applied.
    ///
    /// Retrying provision would create a second, differently named resource.
    /// Verify the carried instance before retrying.
    #[error("Instance {} was created but could not be tagged: {message}", instance.name)]
    ProvisionedUntagged {
        instance: Box<Instance>,
        message: String,
    },

    #[error("Modify failed: {0}")]
    Modify(String),

    #[error("Deprovision failed: {0}")]
    Deprovision(String),

    #[error("Tag update failed: {0}")]
    Tag(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),
}

impl ProviderError {
    /// The instance left behind by a partially failed provision, if any.
    pub fn orphaned_instance(&self) -> Option<&Instance> {
        match self {
            ProviderError::ProvisionedUntagged { instance, .. } => Some(instance),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
