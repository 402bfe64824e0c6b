//! Lifecycle status resolution
//!
//! Maps the raw flags a control plane reports for a cluster onto the fixed
//! set of states the broker understands.

use serde::{Deserialize, Serialize};

/// Semantic status of an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    /// Accepted by the control plane but not yet created
    Creating,
    /// Created and serving
    Available,
    /// Applying a configuration change
    Processing,
    /// Running a version upgrade
    Upgrading,
    /// Deleted or being deleted
    Deleted,
}

impl InstanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Creating => "creating",
            InstanceStatus::Available => "available",
            InstanceStatus::Processing => "processing",
            InstanceStatus::Upgrading => "upgrading",
            InstanceStatus::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw lifecycle flags reported by the control plane for one resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleSnapshot {
    pub created: bool,
    pub deleted: bool,
    pub processing: bool,
    pub upgrading: bool,
}

/// Status and readiness derived from a [`LifecycleSnapshot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedStatus {
    pub status: InstanceStatus,
    pub ready: bool,
}

impl LifecycleSnapshot {
    /// Semantic status. The first matching rule wins.
    pub fn status(&self) -> InstanceStatus {
        let live = self.created && !self.deleted;
        if live && self.upgrading {
            InstanceStatus::Upgrading
        } else if live && self.processing {
            InstanceStatus::Processing
        } else if self.deleted {
            InstanceStatus::Deleted
        } else if !self.created {
            InstanceStatus::Creating
        } else {
            InstanceStatus::Available
        }
    }

    /// Whether the instance accepts traffic.
    ///
    /// A cluster in `processing` is still ready; only upgrades take it out.
    pub fn is_ready(&self) -> bool {
        self.created && !self.deleted && !self.upgrading
    }

    pub fn resolve(&self) -> ResolvedStatus {
        ResolvedStatus {
            status: self.status(),
            ready: self.is_ready(),
        }
    }
}
