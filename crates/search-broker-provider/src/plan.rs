//! Provider plans
//!
//! A plan selects a provider and carries that provider's private
//! configuration. Only the public projection is ever serialized.

use serde::{Deserialize, Serialize};

/// Provider identifier declared by a plan
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// AWS Elasticsearch Service
    AwsEs,
    /// Any tag this build does not know about
    Unknown(String),
}

impl ProviderKind {
    pub fn as_str(&self) -> &str {
        match self {
            ProviderKind::AwsEs => "aws-es",
            ProviderKind::Unknown(tag) => tag,
        }
    }
}

impl From<&str> for ProviderKind {
    fn from(tag: &str) -> Self {
        match tag {
            "aws-es" => ProviderKind::AwsEs,
            other => ProviderKind::Unknown(other.to_string()),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProviderKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProviderKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ProviderKind::from(tag.as_str()))
    }
}

/// Provider-private plan configuration
///
/// Implements neither `Serialize` nor a revealing `Debug`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PrivateDetails(String);

impl PrivateDetails {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for PrivateDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateDetails(<redacted>)")
    }
}

/// An immutable plan template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderPlan {
    pub id: String,
    pub provider: ProviderKind,
    pub scheme: String,
    #[serde(skip)]
    details: PrivateDetails,
}

impl ProviderPlan {
    pub fn new(
        id: impl Into<String>,
        provider: impl Into<ProviderKind>,
        scheme: impl Into<String>,
        details: PrivateDetails,
    ) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            scheme: scheme.into(),
            details,
        }
    }

    /// Provider-private configuration. Only the matching provider reads this.
    pub fn private_details(&self) -> &PrivateDetails {
        &self.details
    }
}
