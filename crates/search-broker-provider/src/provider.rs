//! Instance provider trait definition

use crate::error::Result;
use crate::instance::Instance;
use crate::plan::ProviderPlan;
use async_trait::async_trait;
use std::collections::HashMap;

/// Uniform lifecycle contract for search-cluster providers
///
/// Every provider (AWS Elasticsearch Service today) implements this trait so
/// the broker can manage instances without knowing which control plane hosts
/// them. Calls await a full control-plane round trip and carry no timeout of
/// their own; wrap them in `tokio::time::timeout` where latency matters.
#[async_trait]
pub trait InstanceProvider: Send + Sync {
    /// Returns the provider tag (e.g., "aws-es")
    fn name(&self) -> &str;

    /// Look up an instance by its provider-assigned name
    async fn get_instance(&self, name: &str, plan: &ProviderPlan) -> Result<Instance>;

    /// Create a new instance and tag it with the owner's billing code
    async fn provision(&self, id: &str, plan: &ProviderPlan, owner: &str) -> Result<Instance>;

    /// Apply a (possibly different) plan to an existing instance
    async fn modify(&self, instance: &Instance, plan: &ProviderPlan) -> Result<Instance>;

    /// Delete an instance
    async fn deprovision(&self, instance: &Instance, take_snapshot: bool) -> Result<()>;

    /// Attach a single metadata key-value pair
    async fn tag(&self, instance: &Instance, key: &str, value: &str) -> Result<()>;

    /// Remove a single metadata key
    async fn untag(&self, instance: &Instance, key: &str) -> Result<()>;

    /// Hook for providers that need side effects after provisioning
    async fn perform_post_provision(&self, instance: Instance) -> Result<Instance> {
        Ok(instance)
    }

    /// Connection URLs for an instance, keyed by name
    fn get_url(&self, instance: &Instance) -> HashMap<String, String>;
}
