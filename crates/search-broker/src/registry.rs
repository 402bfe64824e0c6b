//! Provider registry

use async_trait::async_trait;
use search_broker_aws_es::{AwsEnvConfig, AwsEsProvider, AwsEsSettings};
use search_broker_provider::{
    Instance, InstanceProvider, ProviderError, ProviderKind, ProviderPlan, Result,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Every provider this build can resolve
#[derive(Clone)]
pub enum Provider {
    AwsEs(Arc<AwsEsProvider>),
}

impl Provider {
    fn inner(&self) -> &dyn InstanceProvider {
        match self {
            Provider::AwsEs(p) => p.as_ref(),
        }
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Provider")
            .field(&self.inner().name())
            .finish()
    }
}

#[async_trait]
impl InstanceProvider for Provider {
    fn name(&self) -> &str {
        self.inner().name()
    }

    async fn get_instance(&self, name: &str, plan: &ProviderPlan) -> Result<Instance> {
        self.inner().get_instance(name, plan).await
    }

    async fn provision(&self, id: &str, plan: &ProviderPlan, owner: &str) -> Result<Instance> {
        self.inner().provision(id, plan, owner).await
    }

    async fn modify(&self, instance: &Instance, plan: &ProviderPlan) -> Result<Instance> {
        self.inner().modify(instance, plan).await
    }

    async fn deprovision(&self, instance: &Instance, take_snapshot: bool) -> Result<()> {
        self.inner().deprovision(instance, take_snapshot).await
    }

    async fn tag(&self, instance: &Instance, key: &str, value: &str) -> Result<()> {
        self.inner().tag(instance, key, value).await
    }

    async fn untag(&self, instance: &Instance, key: &str) -> Result<()> {
        self.inner().untag(instance, key).await
    }

    async fn perform_post_provision(&self, instance: Instance) -> Result<Instance> {
        self.inner().perform_post_provision(instance).await
    }

    fn get_url(&self, instance: &Instance) -> HashMap<String, String> {
        self.inner().get_url(instance)
    }
}

/// Resolves a plan's provider tag to a shared provider instance
pub struct ProviderRegistry {
    aws_es_settings: AwsEsSettings,
    aws_es: OnceCell<Arc<AwsEsProvider>>,
}

impl ProviderRegistry {
    pub fn new(name_prefix: impl Into<String>) -> Self {
        Self::with_settings(AwsEsSettings::new(name_prefix))
    }

    pub fn with_settings(aws_es_settings: AwsEsSettings) -> Self {
        Self {
            aws_es_settings,
            aws_es: OnceCell::new(),
        }
    }

    /// Use an already built AWS provider instead of connecting on first use
    pub fn with_aws_es(mut self, provider: Arc<AwsEsProvider>) -> Self {
        self.aws_es = OnceCell::new_with(Some(provider));
        self
    }

    pub async fn resolve(&self, plan: &ProviderPlan) -> Result<Provider> {
        match &plan.provider {
            ProviderKind::AwsEs => {
                let provider = self
                    .aws_es
                    .get_or_try_init(|| async {
                        let env = AwsEnvConfig::from_env()?;
                        let settings = self.aws_es_settings.clone();
                        let provider = AwsEsProvider::connect(env, settings).await;
                        Ok::<_, ProviderError>(Arc::new(provider))
                    })
                    .await?;
                Ok(Provider::AwsEs(Arc::clone(provider)))
            }
            ProviderKind::Unknown(tag) => {
                tracing::warn!("No provider registered for plan {} ({})", plan.id, tag);
                Err(ProviderError::UnsupportedProvider(tag.clone()))
            }
        }
    }

    /// Stop the background tasks of every provider built so far
    pub fn shutdown(&self) {
        if let Some(provider) = self.aws_es.get() {
            provider.shutdown();
        }
    }
}
