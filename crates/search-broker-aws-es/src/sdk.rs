//! AWS SDK adapter for the control plane port

use crate::config::AwsEnvConfig;
use crate::control_plane::{
    DomainRequest, DomainStatus, DomainTag, SearchControlPlane, VpcPlacement,
};
use crate::error::{ControlPlaneError, Result};
use crate::settings;
use async_trait::async_trait;
use aws_sdk_elasticsearch::Client;
use aws_sdk_elasticsearch::config::Region;
use aws_sdk_elasticsearch::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_elasticsearch::types;
use std::collections::HashMap;

/// Elasticsearch Service client
pub struct AwsEsControlPlane {
    client: Client,
}

impl AwsEsControlPlane {
    /// Build a client for the configured region using the default
    /// credential chain
    pub async fn connect(env: &AwsEnvConfig) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(env.region.clone()))
            .load()
            .await;
        Self::from_client(Client::new(&sdk_config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

/// Request parts shared by create and update, in SDK shape
struct DomainConfig {
    cluster: Option<types::ElasticsearchClusterConfig>,
    ebs: Option<types::EbsOptions>,
    snapshot: Option<types::SnapshotOptions>,
    encryption_at_rest: Option<types::EncryptionAtRestOptions>,
    node_to_node: Option<types::NodeToNodeEncryptionOptions>,
    log_publishing: Option<HashMap<types::LogType, types::LogPublishingOption>>,
    cognito: Option<types::CognitoOptions>,
    endpoint: Option<types::DomainEndpointOptions>,
    security: Option<types::AdvancedSecurityOptionsInput>,
    vpc: Option<types::VpcOptions>,
}

impl DomainConfig {
    fn from_request(request: &DomainRequest) -> Self {
        let encryption_at_rest = request.encryption_at_rest_options.as_ref();
        let node_to_node = request.node_to_node_encryption_options.as_ref();
        let log_publishing = request.log_publishing_options.as_ref();
        let endpoint = request.domain_endpoint_options.as_ref();
        let security = request.advanced_security_options.as_ref();

        Self {
            cluster: request.cluster_config.as_ref().map(cluster_config),
            ebs: request.ebs_options.as_ref().map(ebs_options),
            snapshot: request.snapshot_options.as_ref().map(snapshot_options),
            encryption_at_rest: encryption_at_rest.map(encryption_at_rest_options),
            node_to_node: node_to_node.map(node_to_node_encryption_options),
            log_publishing: log_publishing.map(log_publishing_options),
            cognito: request.cognito_options.as_ref().map(cognito_options),
            endpoint: endpoint.map(domain_endpoint_options),
            security: security.map(advanced_security_options),
            vpc: request.vpc.as_ref().map(vpc_options),
        }
    }
}

#[async_trait]
impl SearchControlPlane for AwsEsControlPlane {
    async fn describe_domain(&self, name: &str) -> Result<DomainStatus> {
        tracing::debug!("DescribeElasticsearchDomain {}", name);

        let output = self
            .client
            .describe_elasticsearch_domain()
            .domain_name(name)
            .send()
            .await
            .map_err(classify)?;

        output
            .domain_status()
            .map(domain_status)
            .ok_or_else(|| missing_status(name))
    }

    async fn create_domain(&self, request: &DomainRequest) -> Result<DomainStatus> {
        tracing::debug!("CreateElasticsearchDomain {}", request.domain_name);

        let config = DomainConfig::from_request(request);
        let output = self
            .client
            .create_elasticsearch_domain()
            .domain_name(&request.domain_name)
            .set_elasticsearch_version(request.elasticsearch_version.clone())
            .set_elasticsearch_cluster_config(config.cluster)
            .set_ebs_options(config.ebs)
            .set_snapshot_options(config.snapshot)
            .set_advanced_options(request.advanced_options.clone())
            .set_encryption_at_rest_options(config.encryption_at_rest)
            .set_node_to_node_encryption_options(config.node_to_node)
            .set_log_publishing_options(config.log_publishing)
            .set_cognito_options(config.cognito)
            .set_domain_endpoint_options(config.endpoint)
            .set_advanced_security_options(config.security)
            .access_policies(&request.access_policies)
            .set_vpc_options(config.vpc)
            .send()
            .await
            .map_err(classify)?;

        output
            .domain_status()
            .map(domain_status)
            .ok_or_else(|| missing_status(&request.domain_name))
    }

    async fn update_domain_config(&self, request: &DomainRequest) -> Result<()> {
        tracing::debug!("UpdateElasticsearchDomainConfig {}", request.domain_name);

        let config = DomainConfig::from_request(request);
        self.client
            .update_elasticsearch_domain_config()
            .domain_name(&request.domain_name)
            .set_elasticsearch_cluster_config(config.cluster)
            .set_ebs_options(config.ebs)
            .set_snapshot_options(config.snapshot)
            .set_advanced_options(request.advanced_options.clone())
            .set_encryption_at_rest_options(config.encryption_at_rest)
            .set_node_to_node_encryption_options(config.node_to_node)
            .set_log_publishing_options(config.log_publishing)
            .set_cognito_options(config.cognito)
            .set_domain_endpoint_options(config.endpoint)
            .set_advanced_security_options(config.security)
            .access_policies(&request.access_policies)
            .set_vpc_options(config.vpc)
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn delete_domain(&self, name: &str) -> Result<()> {
        tracing::debug!("DeleteElasticsearchDomain {}", name);

        self.client
            .delete_elasticsearch_domain()
            .domain_name(name)
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn add_tags(&self, arn: &str, tags: &[DomainTag]) -> Result<()> {
        let tag_list = tags
            .iter()
            .map(|t| {
                types::Tag::builder()
                    .key(&t.key)
                    .value(&t.value)
                    .build()
                    .map_err(|e| ControlPlaneError::Rejected(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        self.client
            .add_tags()
            .arn(arn)
            .set_tag_list(Some(tag_list))
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn remove_tags(&self, arn: &str, keys: &[String]) -> Result<()> {
        self.client
            .remove_tags()
            .arn(arn)
            .set_tag_keys(Some(keys.to_vec()))
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }
}

/// Service errors become `DomainNotFound` or `Rejected`. Anything that never
/// reached the service (dispatch, timeout, bad response) is `Transport`.
fn classify<E, R>(err: SdkError<E, R>) -> ControlPlaneError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    if let Some(service) = err.as_service_error() {
        let code = service.code().unwrap_or("Unknown");
        let message = service.message().unwrap_or_default().to_string();
        if code == "ResourceNotFoundException" {
            return ControlPlaneError::DomainNotFound(message);
        }
        return ControlPlaneError::Rejected(format!("{}: {}", code, message));
    }
    let context = DisplayErrorContext(&err).to_string();
    ControlPlaneError::Transport(anyhow::Error::new(err).context(context))
}

fn missing_status(name: &str) -> ControlPlaneError {
    ControlPlaneError::MalformedResponse(format!("no status for {}", name))
}

fn domain_status(status: &types::ElasticsearchDomainStatus) -> DomainStatus {
    DomainStatus {
        domain_name: status.domain_name().to_string(),
        arn: status.arn().to_string(),
        created: status.created().unwrap_or(false),
        deleted: status.deleted().unwrap_or(false),
        processing: status.processing().unwrap_or(false),
        upgrade_processing: status.upgrade_processing().unwrap_or(false),
        endpoint: status.endpoint().map(str::to_string),
        endpoints: status.endpoints().cloned().unwrap_or_default(),
        elasticsearch_version: status.elasticsearch_version().map(str::to_string),
    }
}

fn cluster_config(config: &settings::ClusterConfig) -> types::ElasticsearchClusterConfig {
    let instance_type = config.instance_type.as_deref();
    let master_type = config.dedicated_master_type.as_deref();
    let zone_awareness = config.zone_awareness_config.as_ref();

    types::ElasticsearchClusterConfig::builder()
        .set_instance_type(instance_type.map(types::EsPartitionInstanceType::from))
        .set_instance_count(config.instance_count)
        .set_dedicated_master_enabled(config.dedicated_master_enabled)
        .set_dedicated_master_type(master_type.map(types::EsPartitionInstanceType::from))
        .set_dedicated_master_count(config.dedicated_master_count)
        .set_zone_awareness_enabled(config.zone_awareness_enabled)
        .set_zone_awareness_config(zone_awareness.map(zone_awareness_config))
        .build()
}

fn zone_awareness_config(config: &settings::ZoneAwarenessConfig) -> types::ZoneAwarenessConfig {
    types::ZoneAwarenessConfig::builder()
        .set_availability_zone_count(config.availability_zone_count)
        .build()
}

fn ebs_options(options: &settings::EbsOptions) -> types::EbsOptions {
    let volume_type = options.volume_type.as_deref();

    types::EbsOptions::builder()
        .set_ebs_enabled(options.ebs_enabled)
        .set_volume_type(volume_type.map(types::VolumeType::from))
        .set_volume_size(options.volume_size)
        .set_iops(options.iops)
        .build()
}

fn snapshot_options(options: &settings::SnapshotOptions) -> types::SnapshotOptions {
    types::SnapshotOptions::builder()
        .set_automated_snapshot_start_hour(options.automated_snapshot_start_hour)
        .build()
}

fn encryption_at_rest_options(
    options: &settings::EncryptionAtRestOptions,
) -> types::EncryptionAtRestOptions {
    types::EncryptionAtRestOptions::builder()
        .set_enabled(options.enabled)
        .set_kms_key_id(options.kms_key_id.clone())
        .build()
}

fn node_to_node_encryption_options(
    options: &settings::NodeToNodeEncryptionOptions,
) -> types::NodeToNodeEncryptionOptions {
    types::NodeToNodeEncryptionOptions::builder()
        .set_enabled(options.enabled)
        .build()
}

/// Unrecognized log type names are passed through for the service to judge
fn log_publishing_options(
    options: &HashMap<String, settings::LogPublishingOption>,
) -> HashMap<types::LogType, types::LogPublishingOption> {
    options
        .iter()
        .map(|(log_type, option)| {
            let option = types::LogPublishingOption::builder()
                .set_cloud_watch_logs_log_group_arn(option.cloud_watch_logs_log_group_arn.clone())
                .set_enabled(option.enabled)
                .build();
            (types::LogType::from(log_type.as_str()), option)
        })
        .collect()
}

fn cognito_options(options: &settings::CognitoOptions) -> types::CognitoOptions {
    types::CognitoOptions::builder()
        .set_enabled(options.enabled)
        .set_user_pool_id(options.user_pool_id.clone())
        .set_identity_pool_id(options.identity_pool_id.clone())
        .set_role_arn(options.role_arn.clone())
        .build()
}

fn domain_endpoint_options(
    options: &settings::DomainEndpointOptions,
) -> types::DomainEndpointOptions {
    let tls_policy = options.tls_security_policy.as_deref();

    types::DomainEndpointOptions::builder()
        .set_enforce_https(options.enforce_https)
        .set_tls_security_policy(tls_policy.map(types::TlsSecurityPolicy::from))
        .set_custom_endpoint_enabled(options.custom_endpoint_enabled)
        .set_custom_endpoint(options.custom_endpoint.clone())
        .set_custom_endpoint_certificate_arn(options.custom_endpoint_certificate_arn.clone())
        .build()
}

fn advanced_security_options(
    options: &settings::AdvancedSecurityOptions,
) -> types::AdvancedSecurityOptionsInput {
    let master = options.master_user_options.as_ref();

    types::AdvancedSecurityOptionsInput::builder()
        .set_enabled(options.enabled)
        .set_internal_user_database_enabled(options.internal_user_database_enabled)
        .set_master_user_options(master.map(master_user_options))
        .set_anonymous_auth_enabled(options.anonymous_auth_enabled)
        .build()
}

fn master_user_options(options: &settings::MasterUserOptions) -> types::MasterUserOptions {
    types::MasterUserOptions::builder()
        .set_master_user_arn(options.master_user_arn.clone())
        .set_master_user_name(options.master_user_name.clone())
        .set_master_user_password(options.master_user_password.clone())
        .build()
}

fn vpc_options(vpc: &VpcPlacement) -> types::VpcOptions {
    types::VpcOptions::builder()
        .set_subnet_ids(Some(vpc.subnet_ids.clone()))
        .set_security_group_ids(Some(vpc.security_group_ids.clone()))
        .build()
}
