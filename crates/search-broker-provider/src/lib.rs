//! Search Broker provider abstraction
//!
//! This crate defines the provider-neutral contract a service broker uses to
//! manage search-cluster instances, independent of the control plane that
//! actually hosts them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  Service Broker                  │
//! │          (provision / bind / deprovision)        │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │             search-broker-provider               │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │          Provider Abstraction             │   │
//! │  │  trait InstanceProvider { ... }           │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │ Status Rules │  │ InstanceCache│            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────┐
//! │    aws-es     │
//! │   provider    │
//! └───────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod instance;
pub mod plan;
pub mod provider;
pub mod status;

// Re-exports
pub use cache::{CacheReaper, DEFAULT_CACHE_INTERVAL, InstanceCache};
pub use error::{ProviderError, Result};
pub use instance::{Credentials, Instance};
pub use plan::{PrivateDetails, ProviderKind, ProviderPlan};
pub use provider::InstanceProvider;
pub use status::{InstanceStatus, LifecycleSnapshot, ResolvedStatus};
