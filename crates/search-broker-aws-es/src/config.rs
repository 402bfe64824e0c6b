//! Environment-scoped configuration

use search_broker_provider::{DEFAULT_CACHE_INTERVAL, ProviderError, Result};
use std::time::Duration;

/// Wait between creating a domain and tagging it
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(10);

/// AWS account and network settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsEnvConfig {
    pub region: String,
    pub account_id: String,
    pub security_group_id: Option<String>,
    pub subnet_ids: Vec<String>,
}

impl AwsEnvConfig {
    /// Create AwsEnvConfig from environment variables
    ///
    /// `AWS_REGION` and `AWS_ACCOUNT_ID` are required. `AWS_SECURITY_GROUP_ID`
    /// and `AWS_SUBNET_ID` are optional.
    pub fn from_env() -> Result<Self> {
        let region = required_var("AWS_REGION")?;
        let account_id = required_var("AWS_ACCOUNT_ID")?;
        let security_group_id = optional_var("AWS_SECURITY_GROUP_ID");
        let subnet_ids = optional_var("AWS_SUBNET_ID")
            .map(|raw| parse_subnet_ids(&raw))
            .unwrap_or_default();

        Ok(Self {
            region,
            account_id,
            security_group_id,
            subnet_ids,
        })
    }

    pub fn new(region: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            account_id: account_id.into(),
            security_group_id: None,
            subnet_ids: Vec::new(),
        }
    }

    pub fn with_network<I, S>(mut self, security_group_id: impl Into<String>, subnet_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.security_group_id = Some(security_group_id.into());
        self.subnet_ids = subnet_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Network placement needs both a security group and at least one subnet
    pub fn network_placement(&self) -> Option<(&str, &[String])> {
        match &self.security_group_id {
            Some(sg) if !self.subnet_ids.is_empty() => Some((sg.as_str(), &self.subnet_ids)),
            _ => None,
        }
    }
}

fn required_var(name: &str) -> Result<String> {
    optional_var(name).ok_or_else(|| {
        ProviderError::Configuration(format!("Unable to find {} environment variable", name))
    })
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_subnet_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Provider tuning knobs
#[derive(Debug, Clone)]
pub struct AwsEsSettings {
    /// Prefix for generated domain names
    pub name_prefix: String,

    /// Blind wait before tagging a freshly created domain
    pub settle_delay: Duration,

    /// Interval between wholesale cache clears
    pub cache_interval: Duration,
}

impl AwsEsSettings {
    pub fn new(name_prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            cache_interval: DEFAULT_CACHE_INTERVAL,
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_cache_interval(mut self, interval: Duration) -> Self {
        self.cache_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_all_values() {
        temp_env::with_vars(
            [
                ("AWS_REGION", Some("us-west-2")),
                ("AWS_ACCOUNT_ID", Some("123456789012")),
                ("AWS_SECURITY_GROUP_ID", Some("sg-1")),
                ("AWS_SUBNET_ID", Some("subnet-a, subnet-b,,subnet-c")),
            ],
            || {
                let config = AwsEnvConfig::from_env().unwrap();
                assert_eq!(config.region, "us-west-2");
                assert_eq!(config.account_id, "123456789012");
                assert_eq!(config.security_group_id.as_deref(), Some("sg-1"));
                assert_eq!(config.subnet_ids, vec!["subnet-a", "subnet-b", "subnet-c"]);
                assert!(config.network_placement().is_some());
            },
        );
    }

    #[test]
    fn test_from_env_missing_region() {
        temp_env::with_vars(
            [
                ("AWS_REGION", None::<&str>),
                ("AWS_ACCOUNT_ID", Some("123456789012")),
            ],
            || {
                let err = AwsEnvConfig::from_env().unwrap_err();
                assert!(matches!(err, ProviderError::Configuration(_)));
                assert!(err.to_string().contains("AWS_REGION"));
            },
        );
    }

    #[test]
    fn test_from_env_missing_account_id() {
        temp_env::with_vars(
            [
                ("AWS_REGION", Some("us-west-2")),
                ("AWS_ACCOUNT_ID", Some("")),
            ],
            || {
                let err = AwsEnvConfig::from_env().unwrap_err();
                assert!(matches!(err, ProviderError::Configuration(_)));
                assert!(err.to_string().contains("AWS_ACCOUNT_ID"));
            },
        );
    }

    #[test]
    fn test_placement_requires_both_values() {
        temp_env::with_vars(
            [
                ("AWS_REGION", Some("us-west-2")),
                ("AWS_ACCOUNT_ID", Some("123456789012")),
                ("AWS_SECURITY_GROUP_ID", Some("sg-1")),
                ("AWS_SUBNET_ID", None),
            ],
            || {
                let config = AwsEnvConfig::from_env().unwrap();
                assert!(config.network_placement().is_none());
            },
        );

        let config = AwsEnvConfig {
            security_group_id: None,
            subnet_ids: vec!["subnet-a".to_string()],
            ..AwsEnvConfig::new("us-west-2", "123456789012")
        };
        assert!(config.network_placement().is_none());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = AwsEsSettings::new("broker");
        assert_eq!(settings.settle_delay, Duration::from_secs(10));
        assert_eq!(settings.cache_interval, Duration::from_secs(5));
    }
}
