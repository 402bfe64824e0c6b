//! Domain representation of a provisioned search cluster

use crate::plan::ProviderPlan;
use crate::status::{InstanceStatus, ResolvedStatus};
use serde::Serialize;
use std::collections::HashMap;

/// Connection credentials for an instance
///
/// Owned by the credential layer. Providers never fill this in.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A provisioned search cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instance {
    /// Caller-assigned identifier, empty when the provider does not own it
    pub id: String,

    /// Provider-assigned name, unique within the provider namespace
    pub name: String,

    /// Provider-native identifier (e.g. a resource ARN)
    pub provider_id: String,

    pub plan: ProviderPlan,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,

    pub endpoint: String,

    /// Connection scheme chosen by the provider, empty until it sets one
    pub scheme: String,

    pub status: InstanceStatus,

    pub ready: bool,

    pub engine: String,

    pub engine_version: String,
}

impl Instance {
    pub fn new(name: impl Into<String>, plan: ProviderPlan, resolved: ResolvedStatus) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            provider_id: String::new(),
            plan,
            credentials: None,
            endpoint: String::new(),
            scheme: String::new(),
            status: resolved.status,
            ready: resolved.ready,
            engine: String::new(),
            engine_version: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_provider_id(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = provider_id.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_engine(mut self, engine: impl Into<String>, version: impl Into<String>) -> Self {
        self.engine = engine.into();
        self.engine_version = version.into();
        self
    }

    /// Base URL built from scheme and endpoint
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.endpoint)
    }

    /// Connection URLs keyed by name, each path appended to the base URL
    pub fn urls<'a>(
        &self,
        paths: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> HashMap<String, String> {
        let base = self.base_url();
        paths
            .into_iter()
            .map(|(key, path)| (key.to_string(), format!("{}{}", base, path)))
            .collect()
    }
}
