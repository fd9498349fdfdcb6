use std::fmt;

use thiserror::Error;

use crate::id::ResourceId;
use crate::status::ResourceStatus;

/// Why a [`WaitContext`](crate::context::WaitContext) is no longer live.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context deadline exceeded")]
    DeadlineExceeded,
    #[error("context canceled")]
    Canceled,
}

/// The event source itself failed and cannot continue.
#[derive(Error, Debug)]
pub enum EventSourceError {
    #[error("failed to read status of {id}: {message}")]
    Read { id: ResourceId, message: String },

    #[error("malformed status event: {0}")]
    Decode(String),

    #[error("event source I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("event source unavailable: {0}")]
    Unavailable(String),
}

impl EventSourceError {
    pub fn read(id: &ResourceId, message: impl Into<String>) -> Self {
        Self::Read {
            id: id.clone(),
            message: message.into(),
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Diagnostic for one resource that did not reach the target status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("{}: {} not found", .0.name, .0.group_kind.kind)]
    NotFound(ResourceId),

    #[error("{}: {} unknown status", .0.name, .0.group_kind.kind)]
    UnknownStatus(ResourceId),

    #[error("{}: {} not ready", .id.name, .id.group_kind.kind)]
    NotReady {
        id: ResourceId,
        status: ResourceStatus,
    },
}

impl ResourceError {
    pub fn id(&self) -> &ResourceId {
        match self {
            ResourceError::NotFound(id) | ResourceError::UnknownStatus(id) => {
                id
            }
            ResourceError::NotReady { id, .. } => id,
        }
    }
}

/// What ended an unsuccessful wait.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The stream closed while the caller's context was still live.
    #[error("status event stream closed before resources became ready")]
    StreamClosed,
}

/// Per-resource diagnostics joined with the cause that ended the wait.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct CombinedError {
    pub resources: Vec<ResourceError>,
    pub cause: Interruption,
}

impl fmt::Display for CombinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.resources {
            writeln!(f, "{e}")?;
        }
        write!(f, "{}", self.cause)
    }
}

#[derive(Error, Debug)]
pub enum WaitError {
    #[error(transparent)]
    Source(#[from] EventSourceError),

    #[error(transparent)]
    NotReady(#[from] CombinedError),
}

impl WaitError {
    pub fn combined(&self) -> Option<&CombinedError> {
        match self {
            WaitError::NotReady(c) => Some(c),
            WaitError::Source(_) => None,
        }
    }
}
