//! AWS Elasticsearch Service provider for Search Broker
//!
//! This crate implements the InstanceProvider trait for AWS Elasticsearch
//! Service, turning broker plans into Elasticsearch domains.
//!
//! # Features
//!
//! - Domain lifecycle (create, describe, update, delete)
//! - VPC placement driven by environment network settings
//! - Billing tags on the domain ARN
//!
//! # Requirements
//!
//! - `AWS_REGION` and `AWS_ACCOUNT_ID` must be set
//! - `AWS_SECURITY_GROUP_ID` and `AWS_SUBNET_ID` (comma-separated) enable VPC placement
//! - Credentials are resolved through the default AWS provider chain
//!
//! # Example
//!
//! ```ignore
//! use search_broker_aws_es::{AwsEnvConfig, AwsEsProvider, AwsEsSettings};
//! use search_broker_provider::InstanceProvider;
//!
//! let env = AwsEnvConfig::from_env()?;
//! let provider = AwsEsProvider::connect(env, AwsEsSettings::new("broker")).await;
//!
//! let instance = provider.provision("instance-1", &plan, "team-x").await?;
//! println!("{} is {}", instance.name, instance.status);
//! ```

pub mod config;
pub mod control_plane;
pub mod error;
pub mod provider;
pub mod resolver;
pub mod sdk;
pub mod settings;

pub use config::{AwsEnvConfig, AwsEsSettings, DEFAULT_SETTLE_DELAY};
pub use control_plane::{DomainRequest, DomainStatus, DomainTag, SearchControlPlane, VpcPlacement};
pub use error::{ControlPlaneError, Result};
pub use provider::AwsEsProvider;
pub use resolver::{PlanResolver, ResolveMode};
pub use sdk::AwsEsControlPlane;
pub use settings::DomainSettings;
