//! Control plane port
//!
//! The provider talks to Elasticsearch Service only through
//! [`SearchControlPlane`]. The production adapter lives in [`crate::sdk`].

use crate::error::Result;
use crate::settings::{
    AdvancedSecurityOptions, ClusterConfig, CognitoOptions, DomainEndpointOptions, EbsOptions,
    EncryptionAtRestOptions, LogPublishingOption, NodeToNodeEncryptionOptions, SnapshotOptions,
};
use async_trait::async_trait;
use search_broker_provider::LifecycleSnapshot;
use std::collections::HashMap;

#[async_trait]
pub trait SearchControlPlane: Send + Sync {
    async fn describe_domain(&self, name: &str) -> Result<DomainStatus>;

    async fn create_domain(&self, request: &DomainRequest) -> Result<DomainStatus>;

    /// Domain version cannot change through an update and is ignored here
    async fn update_domain_config(&self, request: &DomainRequest) -> Result<()>;

    async fn delete_domain(&self, name: &str) -> Result<()>;

    async fn add_tags(&self, arn: &str, tags: &[DomainTag]) -> Result<()>;

    async fn remove_tags(&self, arn: &str, keys: &[String]) -> Result<()>;
}

/// Fully resolved create/update request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainRequest {
    pub domain_name: String,
    pub elasticsearch_version: Option<String>,
    pub cluster_config: Option<ClusterConfig>,
    pub ebs_options: Option<EbsOptions>,
    pub snapshot_options: Option<SnapshotOptions>,
    pub advanced_options: Option<HashMap<String, String>>,
    pub encryption_at_rest_options: Option<EncryptionAtRestOptions>,
    pub node_to_node_encryption_options: Option<NodeToNodeEncryptionOptions>,
    pub log_publishing_options: Option<HashMap<String, LogPublishingOption>>,
    pub cognito_options: Option<CognitoOptions>,
    pub domain_endpoint_options: Option<DomainEndpointOptions>,
    pub advanced_security_options: Option<AdvancedSecurityOptions>,
    pub access_policies: String,
    pub vpc: Option<VpcPlacement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VpcPlacement {
    pub subnet_ids: Vec<String>,
    pub security_group_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainTag {
    pub key: String,
    pub value: String,
}

impl DomainTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Domain state as reported by the control plane
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainStatus {
    pub domain_name: String,
    pub arn: String,
    pub created: bool,
    pub deleted: bool,
    pub processing: bool,
    pub upgrade_processing: bool,
    /// Public endpoint
    pub endpoint: Option<String>,
    /// Endpoints keyed by network type (e.g. "vpc")
    pub endpoints: HashMap<String, String>,
    pub elasticsearch_version: Option<String>,
}

impl DomainStatus {
    pub fn snapshot(&self) -> LifecycleSnapshot {
        LifecycleSnapshot {
            created: self.created,
            deleted: self.deleted,
            processing: self.processing,
            upgrading: self.upgrade_processing,
        }
    }

    /// VPC endpoint first, then the public one. Empty while the domain is
    /// still being created.
    pub fn connection_endpoint(&self) -> &str {
        self.endpoints
            .get("vpc")
            .map(String::as_str)
            .or(self.endpoint.as_deref())
            .unwrap_or_default()
    }
}
