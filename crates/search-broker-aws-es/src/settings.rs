//! Plan blob model
//!
//! The private part of an `aws-es` plan is a JSON document using the field
//! names of the `CreateElasticsearchDomain` API. Fields this provider derives
//! itself (domain name, access policy, VPC options) are ignored if present.
//! Any other field this model does not know is logged and skipped.

use search_broker_provider::{PrivateDetails, ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level fields replaced by values the provider resolves itself
const DERIVED_FIELDS: [&str; 3] = ["DomainName", "AccessPolicies", "VPCOptions"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainSettings {
    pub elasticsearch_version: Option<String>,

    pub elasticsearch_cluster_config: Option<ClusterConfig>,

    #[serde(rename = "EBSOptions")]
    pub ebs_options: Option<EbsOptions>,

    pub snapshot_options: Option<SnapshotOptions>,

    pub advanced_options: Option<HashMap<String, String>>,

    pub encryption_at_rest_options: Option<EncryptionAtRestOptions>,

    pub node_to_node_encryption_options: Option<NodeToNodeEncryptionOptions>,

    /// Keyed by log type, e.g. `AUDIT_LOGS` or `INDEX_SLOW_LOGS`
    pub log_publishing_options: Option<HashMap<String, LogPublishingOption>>,

    pub cognito_options: Option<CognitoOptions>,

    pub domain_endpoint_options: Option<DomainEndpointOptions>,

    pub advanced_security_options: Option<AdvancedSecurityOptions>,

    #[serde(flatten)]
    unrecognized: HashMap<String, serde_json::Value>,
}

impl DomainSettings {
    /// Parse a plan's private details
    pub fn parse(details: &PrivateDetails) -> Result<Self> {
        let parsed = serde_json::from_str::<Self>(details.expose());
        let mut settings = parsed.map_err(|e| {
            ProviderError::Configuration(format!("Unable to parse plan settings: {}", e))
        })?;

        for field in std::mem::take(&mut settings.unrecognized).keys() {
            if DERIVED_FIELDS.contains(&field.as_str()) {
                tracing::debug!("Plan field {} is derived by the provider", field);
            } else {
                tracing::warn!("Plan field {} is not supported and was ignored", field);
            }
        }

        Ok(settings)
    }
}

/// Cluster topology
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterConfig {
    pub instance_type: Option<String>,
    pub instance_count: Option<i32>,
    pub dedicated_master_enabled: Option<bool>,
    pub dedicated_master_type: Option<String>,
    pub dedicated_master_count: Option<i32>,
    pub zone_awareness_enabled: Option<bool>,
    pub zone_awareness_config: Option<ZoneAwarenessConfig>,
}

impl ClusterConfig {
    /// One data node and no dedicated masters
    pub fn is_single_node(&self) -> bool {
        self.instance_count == Some(1) && self.dedicated_master_count.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneAwarenessConfig {
    pub availability_zone_count: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EbsOptions {
    #[serde(rename = "EBSEnabled")]
    pub ebs_enabled: Option<bool>,
    pub volume_type: Option<String>,
    pub volume_size: Option<i32>,
    pub iops: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotOptions {
    pub automated_snapshot_start_hour: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EncryptionAtRestOptions {
    pub enabled: Option<bool>,
    pub kms_key_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeToNodeEncryptionOptions {
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogPublishingOption {
    pub cloud_watch_logs_log_group_arn: Option<String>,
    pub enabled: Option<bool>,
}

/// Kibana authentication through Amazon Cognito
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CognitoOptions {
    pub enabled: Option<bool>,
    pub user_pool_id: Option<String>,
    pub identity_pool_id: Option<String>,
    pub role_arn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainEndpointOptions {
    #[serde(rename = "EnforceHTTPS")]
    pub enforce_https: Option<bool>,
    #[serde(rename = "TLSSecurityPolicy")]
    pub tls_security_policy: Option<String>,
    pub custom_endpoint_enabled: Option<bool>,
    pub custom_endpoint: Option<String>,
    pub custom_endpoint_certificate_arn: Option<String>,
}

/// Fine-grained access control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdvancedSecurityOptions {
    pub enabled: Option<bool>,
    pub internal_user_database_enabled: Option<bool>,
    pub master_user_options: Option<MasterUserOptions>,
    pub anonymous_auth_enabled: Option<bool>,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MasterUserOptions {
    #[serde(rename = "MasterUserARN")]
    pub master_user_arn: Option<String>,
    pub master_user_name: Option<String>,
    pub master_user_password: Option<String>,
}

impl std::fmt::Debug for MasterUserOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterUserOptions")
            .field("master_user_arn", &self.master_user_arn)
            .field("master_user_name", &self.master_user_name)
            .field("master_user_password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_plan() {
        let details = PrivateDetails::new(
            r#"{
                "ElasticsearchVersion": "7.10",
                "ElasticsearchClusterConfig": {
                    "InstanceType": "m5.large.elasticsearch",
                    "InstanceCount": 3,
                    "DedicatedMasterEnabled": true,
                    "DedicatedMasterType": "m5.large.elasticsearch",
                    "DedicatedMasterCount": 3,
                    "ZoneAwarenessEnabled": true,
                    "ZoneAwarenessConfig": {"AvailabilityZoneCount": 3}
                },
                "EBSOptions": {"EBSEnabled": true, "VolumeType": "gp2", "VolumeSize": 20},
                "SnapshotOptions": {"AutomatedSnapshotStartHour": 2},
                "AdvancedOptions": {"rest.action.multi.allow_explicit_index": "true"},
                "EncryptionAtRestOptions": {"Enabled": true},
                "NodeToNodeEncryptionOptions": {"Enabled": true}
            }"#,
        );

        let settings = DomainSettings::parse(&details).unwrap();
        assert_eq!(settings.elasticsearch_version.as_deref(), Some("7.10"));

        let cluster = settings.elasticsearch_cluster_config.unwrap();
        assert_eq!(cluster.instance_count, Some(3));
        assert_eq!(cluster.dedicated_master_count, Some(3));
        assert!(!cluster.is_single_node());
        let zones = cluster.zone_awareness_config.unwrap();
        assert_eq!(zones.availability_zone_count, Some(3));

        let ebs = settings.ebs_options.unwrap();
        assert_eq!(ebs.ebs_enabled, Some(true));
        assert_eq!(ebs.volume_size, Some(20));

        let snapshot = settings.snapshot_options.unwrap();
        assert_eq!(snapshot.automated_snapshot_start_hour, Some(2));

        let encryption = settings.encryption_at_rest_options.unwrap();
        assert_eq!(encryption.enabled, Some(true));
    }

    #[test]
    fn test_parse_access_and_logging_options() {
        let details = PrivateDetails::new(
            r#"{
                "LogPublishingOptions": {
                    "AUDIT_LOGS": {
                        "CloudWatchLogsLogGroupArn": "arn:aws:logs:us-east-1:1234:log-group:audit",
                        "Enabled": true
                    }
                },
                "CognitoOptions": {
                    "Enabled": true,
                    "UserPoolId": "us-east-1_pool",
                    "IdentityPoolId": "us-east-1:identity",
                    "RoleArn": "arn:aws:iam::123456789012:role/CognitoAccessForAmazonES"
                },
                "DomainEndpointOptions": {
                    "EnforceHTTPS": true,
                    "TLSSecurityPolicy": "Policy-Min-TLS-1-2-2019-07"
                },
                "AdvancedSecurityOptions": {
                    "Enabled": true,
                    "InternalUserDatabaseEnabled": true,
                    "MasterUserOptions": {
                        "MasterUserName": "admin",
                        "MasterUserPassword": "s3cret!"
                    }
                }
            }"#,
        );

        let settings = DomainSettings::parse(&details).unwrap();

        let logs = settings.log_publishing_options.unwrap();
        let audit = &logs["AUDIT_LOGS"];
        assert_eq!(audit.enabled, Some(true));
        let group = audit.cloud_watch_logs_log_group_arn.as_deref().unwrap();
        assert!(group.ends_with("log-group:audit"));

        let cognito = settings.cognito_options.unwrap();
        assert_eq!(cognito.enabled, Some(true));
        assert_eq!(cognito.user_pool_id.as_deref(), Some("us-east-1_pool"));

        let endpoint = settings.domain_endpoint_options.unwrap();
        assert_eq!(endpoint.enforce_https, Some(true));
        assert_eq!(
            endpoint.tls_security_policy.as_deref(),
            Some("Policy-Min-TLS-1-2-2019-07")
        );

        let security = settings.advanced_security_options.unwrap();
        assert_eq!(security.internal_user_database_enabled, Some(true));
        let master = security.master_user_options.unwrap();
        assert_eq!(master.master_user_name.as_deref(), Some("admin"));
        assert!(!format!("{:?}", master).contains("s3cret!"));
    }

    #[test]
    fn test_parse_skips_derived_and_unknown_fields() {
        let details = PrivateDetails::new(
            r#"{
                "DomainName": "tenant-chosen",
                "AccessPolicies": "{}",
                "VPCOptions": {"SubnetIds": ["x"]},
                "AutoTuneOptions": {}
            }"#,
        );
        let settings = DomainSettings::parse(&details).unwrap();
        assert_eq!(settings, DomainSettings::default());
    }

    #[test]
    fn test_parse_invalid_blob() {
        for raw in [
            "",
            "not json",
            r#"{"ElasticsearchClusterConfig": {"InstanceCount": "three"}}"#,
            r#"{"CognitoOptions": {"Enabled": "yes"}}"#,
        ] {
            let err = DomainSettings::parse(&PrivateDetails::new(raw)).unwrap_err();
            assert!(matches!(err, ProviderError::Configuration(_)), "{}", raw);
        }
    }

    #[test]
    fn test_single_node_topology() {
        let single = ClusterConfig {
            instance_count: Some(1),
            ..Default::default()
        };
        assert!(single.is_single_node());

        let with_masters = ClusterConfig {
            instance_count: Some(1),
            dedicated_master_count: Some(3),
            ..Default::default()
        };
        assert!(!with_masters.is_single_node());

        assert!(!ClusterConfig::default().is_single_node());
    }
}
