//! Plan resolution
//!
//! Merges a plan's private settings with the environment's network context
//! into a concrete [`DomainRequest`].

use crate::config::AwsEnvConfig;
use crate::control_plane::{DomainRequest, VpcPlacement};
use crate::settings::{ClusterConfig, DomainSettings};
use search_broker_provider::{PrivateDetails, Result};

/// Whether the request creates a new domain or updates an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode<'a> {
    /// Generate a fresh domain name
    Provision,
    /// Keep the existing domain name
    Update { name: &'a str },
}

pub struct PlanResolver<'a> {
    env: &'a AwsEnvConfig,
    name_prefix: &'a str,
}

impl<'a> PlanResolver<'a> {
    pub fn new(env: &'a AwsEnvConfig, name_prefix: &'a str) -> Self {
        Self { env, name_prefix }
    }

    pub fn resolve(
        &self,
        details: &PrivateDetails,
        mode: ResolveMode<'_>,
    ) -> Result<DomainRequest> {
        let settings = DomainSettings::parse(details)?;

        let domain_name = match mode {
            ResolveMode::Provision => generate_name(self.name_prefix),
            ResolveMode::Update { name } => name.to_string(),
        };

        let access_policies = access_policy(&self.env.region, &self.env.account_id, &domain_name);

        let cluster = settings.elasticsearch_cluster_config.as_ref();
        let placement = self.env.network_placement();
        let vpc = placement.map(|(sg, subnets)| VpcPlacement {
            subnet_ids: select_subnets(cluster, subnets),
            security_group_ids: vec![sg.to_string()],
        });

        Ok(DomainRequest {
            domain_name,
            elasticsearch_version: settings.elasticsearch_version,
            cluster_config: settings.elasticsearch_cluster_config,
            ebs_options: settings.ebs_options,
            snapshot_options: settings.snapshot_options,
            advanced_options: settings.advanced_options,
            encryption_at_rest_options: settings.encryption_at_rest_options,
            node_to_node_encryption_options: settings.node_to_node_encryption_options,
            log_publishing_options: settings.log_publishing_options,
            cognito_options: settings.cognito_options,
            domain_endpoint_options: settings.domain_endpoint_options,
            advanced_security_options: settings.advanced_security_options,
            access_policies,
            vpc,
        })
    }
}

/// `{prefix}-u{token}` where the token is the first segment of a v4 UUID
pub fn generate_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-u{}", prefix, &id[..8])
}

/// Allow-all policy scoped to a single domain
///
/// Tenant isolation comes from VPC placement and the credential layer, not
/// from this policy.
pub fn access_policy(region: &str, account_id: &str, domain_name: &str) -> String {
    let resource = format!(
        "arn:aws:es:{}:{}:domain/{}/*",
        region, account_id, domain_name
    );
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": {"AWS": "*"},
            "Action": "es:*",
            "Resource": resource,
        }]
    })
    .to_string()
}

/// A single-node domain without dedicated masters lives in one AZ and the
/// control plane rejects more than one subnet for it.
pub fn select_subnets(cluster: Option<&ClusterConfig>, subnets: &[String]) -> Vec<String> {
    match cluster {
        Some(c) if c.is_single_node() => subnets.iter().take(1).cloned().collect(),
        _ => subnets.to_vec(),
    }
}
