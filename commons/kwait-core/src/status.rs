use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::ResourceId;

/// Computed status of a single resource, using the kstatus vocabulary.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum ResourceStatus {
    Current,
    InProgress,
    Failed,
    Terminating,
    NotFound,
    #[default]
    Unknown,
}

impl ResourceStatus {
    pub const ALL: [ResourceStatus; 6] = [
        ResourceStatus::Current,
        ResourceStatus::InProgress,
        ResourceStatus::Failed,
        ResourceStatus::Terminating,
        ResourceStatus::NotFound,
        ResourceStatus::Unknown,
    ];

    /// Rank used when surfacing the worst status of a set:
    /// Failed > Terminating > Unknown > NotFound > InProgress > Current.
    pub fn severity(self) -> u8 {
        match self {
            ResourceStatus::Current => 0,
            ResourceStatus::InProgress => 1,
            ResourceStatus::NotFound => 2,
            ResourceStatus::Unknown => 3,
            ResourceStatus::Terminating => 4,
            ResourceStatus::Failed => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceStatus::Current => "Current",
            ResourceStatus::InProgress => "InProgress",
            ResourceStatus::Failed => "Failed",
            ResourceStatus::Terminating => "Terminating",
            ResourceStatus::NotFound => "NotFound",
            ResourceStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown resource status '{0}'")]
pub struct ResourceStatusParseError(pub String);

impl FromStr for ResourceStatus {
    type Err = ResourceStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceStatus::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ResourceStatusParseError(s.to_string()))
    }
}

/// Last known status of one tracked resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceStatusRecord {
    pub id: ResourceId,
    pub status: ResourceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResourceStatusRecord {
    /// Record for a resource that has not reported yet.
    pub fn unknown(id: ResourceId) -> Self {
        Self {
            id,
            status: ResourceStatus::Unknown,
            message: None,
        }
    }
}
