//! AWS Elasticsearch Service provider implementation

use crate::config::{AwsEnvConfig, AwsEsSettings};
use crate::control_plane::{DomainStatus, DomainTag, SearchControlPlane};
use crate::error::ControlPlaneError;
use crate::resolver::{PlanResolver, ResolveMode};
use crate::sdk::AwsEsControlPlane;
use async_trait::async_trait;
use search_broker_provider::{
    CacheReaper, Instance, InstanceCache, InstanceProvider, ProviderError, ProviderPlan, Result,
};
use std::collections::HashMap;
use std::sync::Arc;

const ENGINE: &str = "elasticsearch";
/// Used for every instance, whatever scheme the plan advertises
const SCHEME: &str = "https";
const BILLING_TAG: &str = "billingcode";

/// AWS Elasticsearch Service provider
pub struct AwsEsProvider {
    control_plane: Arc<dyn SearchControlPlane>,
    env: AwsEnvConfig,
    settings: AwsEsSettings,
    cache: Arc<InstanceCache>,
    reaper: CacheReaper,
}

impl AwsEsProvider {
    /// Create a provider on top of an arbitrary control plane.
    ///
    /// Starts the cache reaper, so this must run inside a Tokio runtime.
    pub fn new(
        control_plane: Arc<dyn SearchControlPlane>,
        env: AwsEnvConfig,
        settings: AwsEsSettings,
    ) -> Self {
        let cache = Arc::new(InstanceCache::new());
        let reaper = cache.spawn_reaper(settings.cache_interval);
        Self {
            control_plane,
            env,
            settings,
            cache,
            reaper,
        }
    }

    /// Create a provider backed by the AWS SDK
    pub async fn connect(env: AwsEnvConfig, settings: AwsEsSettings) -> Self {
        let control_plane = AwsEsControlPlane::connect(&env).await;
        tracing::info!(
            "AWS Elasticsearch provider ready (region: {}, prefix: {})",
            env.region,
            settings.name_prefix
        );
        Self::new(Arc::new(control_plane), env, settings)
    }

    /// Stop the cache reaper. The cache keeps its current entries.
    pub fn shutdown(&self) {
        self.reaper.stop();
    }

    pub fn cache(&self) -> &InstanceCache {
        &self.cache
    }

    fn resolver(&self) -> PlanResolver<'_> {
        PlanResolver::new(&self.env, &self.settings.name_prefix)
    }

    fn to_instance(&self, id: &str, plan: &ProviderPlan, status: &DomainStatus) -> Instance {
        let resolved = status.snapshot().resolve();
        let version = status.elasticsearch_version.clone().unwrap_or_default();

        Instance::new(status.domain_name.clone(), plan.clone(), resolved)
            .with_id(id)
            .with_provider_id(status.arn.clone())
            .with_endpoint(status.connection_endpoint())
            .with_scheme(SCHEME)
            .with_engine(ENGINE, version)
    }

    async fn describe(&self, id: &str, name: &str, plan: &ProviderPlan) -> Result<Instance> {
        let status = self
            .control_plane
            .describe_domain(name)
            .await
            .map_err(|e| match e {
                ControlPlaneError::DomainNotFound(_) => ProviderError::NotFound(name.to_string()),
                other => ProviderError::Transient(other.to_string()),
            })?;

        let instance = self.to_instance(id, plan, &status);
        self.cache.put(&instance);
        Ok(instance)
    }
}

#[async_trait]
impl InstanceProvider for AwsEsProvider {
    fn name(&self) -> &str {
        "aws-es"
    }

    async fn get_instance(&self, name: &str, plan: &ProviderPlan) -> Result<Instance> {
        if let Some(instance) = self.cache.get(name, &plan.id) {
            tracing::debug!("Cache hit for {} ({})", name, plan.id);
            return Ok(instance);
        }
        // The broker owns the caller-assigned id, so reads leave it empty.
        self.describe("", name, plan).await
    }

    async fn provision(&self, id: &str, plan: &ProviderPlan, owner: &str) -> Result<Instance> {
        let request = self
            .resolver()
            .resolve(plan.private_details(), ResolveMode::Provision)?;

        tracing::info!(
            "Creating Elasticsearch domain {} for {} (plan: {})",
            request.domain_name,
            id,
            plan.id
        );

        let status = self
            .control_plane
            .create_domain(&request)
            .await
            .map_err(|e| ProviderError::Provision(e.to_string()))?;

        let instance = self.to_instance(id, plan, &status);
        self.cache.put(&instance);

        // The new domain is not always visible to the tagging API right away.
        tokio::time::sleep(self.settings.settle_delay).await;

        if let Err(e) = self.tag(&instance, BILLING_TAG, owner).await {
            tracing::warn!(
                "Domain {} was created but tagging failed: {}",
                instance.name,
                e
            );
            return Err(ProviderError::ProvisionedUntagged {
                instance: Box::new(instance),
                message: e.to_string(),
            });
        }

        Ok(instance)
    }

    async fn modify(&self, instance: &Instance, plan: &ProviderPlan) -> Result<Instance> {
        let mode = ResolveMode::Update {
            name: &instance.name,
        };
        let request = self.resolver().resolve(plan.private_details(), mode)?;

        tracing::info!(
            "Updating Elasticsearch domain {} (plan: {})",
            instance.name,
            plan.id
        );

        self.control_plane
            .update_domain_config(&request)
            .await
            .map_err(|e| ProviderError::Modify(e.to_string()))?;

        self.describe(&instance.id, &instance.name, plan).await
    }

    async fn deprovision(&self, instance: &Instance, take_snapshot: bool) -> Result<()> {
        if take_snapshot {
            tracing::warn!(
                "Snapshot before deprovision is not supported; deleting {} without one",
                instance.name
            );
        }

        tracing::info!("Deleting Elasticsearch domain {}", instance.name);

        self.control_plane
            .delete_domain(&instance.name)
            .await
            .map_err(|e| ProviderError::Deprovision(e.to_string()))
    }

    async fn tag(&self, instance: &Instance, key: &str, value: &str) -> Result<()> {
        self.control_plane
            .add_tags(&instance.provider_id, &[DomainTag::new(key, value)])
            .await
            .map_err(|e| ProviderError::Tag(e.to_string()))
    }

    async fn untag(&self, instance: &Instance, key: &str) -> Result<()> {
        self.control_plane
            .remove_tags(&instance.provider_id, &[key.to_string()])
            .await
            .map_err(|e| ProviderError::Tag(e.to_string()))
    }

    fn get_url(&self, instance: &Instance) -> HashMap<String, String> {
        instance.urls([("ES_URL", ""), ("KIBANA_URL", "/_plugin/kibana")])
    }
}
