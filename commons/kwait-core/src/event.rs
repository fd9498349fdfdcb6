use serde::{Deserialize, Serialize};

use crate::error::EventSourceError;
use crate::id::ResourceId;
use crate::status::{ResourceStatus, ResourceStatusRecord};

/// Status change reported for one resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUpdate {
    #[serde(flatten)]
    pub id: ResourceId,
    pub status: ResourceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResourceUpdate {
    pub fn new(id: ResourceId, status: ResourceStatus) -> Self {
        Self {
            id,
            status,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl From<ResourceUpdate> for ResourceStatusRecord {
    fn from(u: ResourceUpdate) -> Self {
        ResourceStatusRecord {
            id: u.id,
            status: u.status,
            message: u.message,
        }
    }
}

#[derive(Debug)]
pub enum StatusEvent {
    Update(ResourceUpdate),
    /// The source cannot continue; it closes the stream after this.
    Error(EventSourceError),
}

impl StatusEvent {
    pub fn update(id: ResourceId, status: ResourceStatus) -> Self {
        StatusEvent::Update(ResourceUpdate::new(id, status))
    }
}

impl From<ResourceUpdate> for StatusEvent {
    fn from(u: ResourceUpdate) -> Self {
        StatusEvent::Update(u)
    }
}

impl From<EventSourceError> for StatusEvent {
    fn from(e: EventSourceError) -> Self {
        StatusEvent::Error(e)
    }
}
