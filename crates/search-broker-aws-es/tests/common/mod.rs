use async_trait::async_trait;
use search_broker_aws_es::{
    AwsEnvConfig, AwsEsProvider, AwsEsSettings, ControlPlaneError, DomainRequest, DomainStatus,
    DomainTag, SearchControlPlane,
};
use search_broker_provider::{PrivateDetails, ProviderPlan};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory stand-in for Elasticsearch Service
#[derive(Default)]
pub struct FakeControlPlane {
    pub domains: Mutex<HashMap<String, DomainStatus>>,
    pub tags: Mutex<HashMap<String, HashMap<String, String>>>,
    pub created: Mutex<Vec<DomainRequest>>,
    pub updated: Mutex<Vec<DomainRequest>>,
    pub describe_calls: AtomicUsize,
    pub fail_tagging: AtomicBool,
    pub fail_create: AtomicBool,
    pub unreachable: AtomicBool,
}

impl FakeControlPlane {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    /// Flip a domain's lifecycle flags as the real service would over time
    #[allow(dead_code)]
    pub fn set_flags(&self, name: &str, created: bool, processing: bool, upgrading: bool) {
        let mut domains = self.domains.lock().unwrap();
        let domain = domains.get_mut(name).unwrap();
        domain.created = created;
        domain.processing = processing;
        domain.upgrade_processing = upgrading;
        if created {
            domain
                .endpoints
                .insert("vpc".to_string(), format!("vpc-{}.es.amazonaws.com", name));
        }
    }

    pub fn tags_for(&self, arn: &str) -> HashMap<String, String> {
        self.tags
            .lock()
            .unwrap()
            .get(arn)
            .cloned()
            .unwrap_or_default()
    }

    fn arn(name: &str) -> String {
        format!("arn:aws:es:us-east-1:123456789012:domain/{}", name)
    }
}

#[async_trait]
impl SearchControlPlane for FakeControlPlane {
    async fn describe_domain(&self, name: &str) -> Result<DomainStatus, ControlPlaneError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("connection refused").into());
        }
        let message = format!("Domain not found: {}", name);
        self.domains
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or(ControlPlaneError::DomainNotFound(message))
    }

    async fn create_domain(
        &self,
        request: &DomainRequest,
    ) -> Result<DomainStatus, ControlPlaneError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(ControlPlaneError::Rejected(
                "ValidationException: invalid instance type".to_string(),
            ));
        }
        let status = DomainStatus {
            domain_name: request.domain_name.clone(),
            arn: Self::arn(&request.domain_name),
            created: false,
            elasticsearch_version: request.elasticsearch_version.clone(),
            ..Default::default()
        };
        self.domains
            .lock()
            .unwrap()
            .insert(request.domain_name.clone(), status.clone());
        self.created.lock().unwrap().push(request.clone());
        Ok(status)
    }

    async fn update_domain_config(&self, request: &DomainRequest) -> Result<(), ControlPlaneError> {
        let name = &request.domain_name;
        let mut domains = self.domains.lock().unwrap();
        let domain = domains
            .get_mut(name)
            .ok_or_else(|| ControlPlaneError::DomainNotFound(name.clone()))?;
        domain.processing = true;
        self.updated.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn delete_domain(&self, name: &str) -> Result<(), ControlPlaneError> {
        let mut domains = self.domains.lock().unwrap();
        let domain = domains
            .get_mut(name)
            .ok_or_else(|| ControlPlaneError::DomainNotFound(name.to_string()))?;
        domain.deleted = true;
        Ok(())
    }

    async fn add_tags(&self, arn: &str, tags: &[DomainTag]) -> Result<(), ControlPlaneError> {
        if self.fail_tagging.load(Ordering::SeqCst) {
            return Err(ControlPlaneError::DomainNotFound(arn.to_string()));
        }
        let mut all = self.tags.lock().unwrap();
        let entry = all.entry(arn.to_string()).or_default();
        for tag in tags {
            entry.insert(tag.key.clone(), tag.value.clone());
        }
        Ok(())
    }

    async fn remove_tags(&self, arn: &str, keys: &[String]) -> Result<(), ControlPlaneError> {
        if self.fail_tagging.load(Ordering::SeqCst) {
            return Err(ControlPlaneError::Rejected(
                "AccessDeniedException: not authorized".to_string(),
            ));
        }
        let mut all = self.tags.lock().unwrap();
        if let Some(entry) = all.get_mut(arn) {
            for key in keys {
                entry.remove(key);
            }
        }
        Ok(())
    }
}

pub fn env() -> AwsEnvConfig {
    AwsEnvConfig::new("us-east-1", "123456789012")
        .with_network("sg-1", ["a", "b", "c"])
}

pub fn settings() -> AwsEsSettings {
    AwsEsSettings::new("broker")
}

pub fn plan(instance_count: i32) -> ProviderPlan {
    let cluster = format!(
        r#"{{"InstanceType": "t3.small.elasticsearch", "InstanceCount": {}}}"#,
        instance_count
    );
    plan_with(
        format!("es-{}-node", instance_count),
        format!(
            r#"{{
                "ElasticsearchVersion": "7.10",
                "ElasticsearchClusterConfig": {},
                "EBSOptions": {{"EBSEnabled": true, "VolumeSize": 10}}
            }}"#,
            cluster
        ),
    )
}

/// An `https` plan with the given private settings blob
pub fn plan_with(id: impl Into<String>, details: impl Into<String>) -> ProviderPlan {
    ProviderPlan::new(id, "aws-es", "https", PrivateDetails::new(details))
}

pub fn provider(fake: &Arc<FakeControlPlane>) -> AwsEsProvider {
    AwsEsProvider::new(fake.clone(), env(), settings())
}

#[allow(dead_code)]
pub fn provider_with_settle(fake: &Arc<FakeControlPlane>, delay: Duration) -> AwsEsProvider {
    AwsEsProvider::new(fake.clone(), env(), settings().with_settle_delay(delay))
}
