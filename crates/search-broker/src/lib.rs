//! Search Broker provider registry
//!
//! Resolves the provider declared by a plan into a ready-to-use
//! [`Provider`]. Each provider is built once and shared, so every provider
//! runs exactly one cache reaper.
//!
//! # Example
//!
//! ```ignore
//! use search_broker::ProviderRegistry;
//! use search_broker_provider::InstanceProvider;
//!
//! let registry = ProviderRegistry::new("broker");
//! let provider = registry.resolve(&plan).await?;
//! let instance = provider.get_instance("broker-u1a2b3c4d", &plan).await?;
//! ```

pub mod registry;

pub use registry::{Provider, ProviderRegistry};
pub use search_broker_provider::{Instance, InstanceProvider, ProviderError, ProviderPlan, Result};
