use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::EventSourceError;
use crate::event::StatusEvent;
use crate::id::ResourceId;
use crate::status::{ResourceStatus, ResourceStatusRecord};

/// Latest known status of a fixed set of resources.
///
/// The tracked set is fixed at construction (duplicates collapse). Updates
/// for untracked resources are ignored. The first source error is kept and
/// freezes the collector. Not synchronised: intended for a single
/// consuming loop.
#[derive(Debug)]
pub struct ResourceStatusCollector {
    order: Vec<ResourceId>,
    records: HashMap<ResourceId, Option<ResourceStatusRecord>>,
    error: Option<EventSourceError>,
}

impl ResourceStatusCollector {
    pub fn new<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ResourceId>,
    {
        let mut order = Vec::new();
        let mut records = HashMap::new();
        for id in ids {
            if !records.contains_key(&id) {
                records.insert(id.clone(), None);
                order.push(id);
            }
        }
        Self {
            order,
            records,
            error: None,
        }
    }

    /// Tracked ids in first-seen order.
    pub fn ids(&self) -> &[ResourceId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns true when the event changed the collector's state.
    pub fn apply(&mut self, event: StatusEvent) -> bool {
        if self.error.is_some() {
            trace!("collector frozen by source error, dropping event");
            return false;
        }
        match event {
            StatusEvent::Update(update) => {
                match self.records.get_mut(&update.id) {
                    Some(slot) => {
                        debug!(
                            id = %update.id,
                            status = %update.status,
                            "status update"
                        );
                        *slot = Some(update.into());
                        true
                    }
                    None => {
                        debug!(
                            id = %update.id,
                            "ignoring update for untracked resource"
                        );
                        false
                    }
                }
            }
            StatusEvent::Error(err) => {
                debug!(error = %err, "event source failed");
                self.error = Some(err);
                true
            }
        }
    }

    pub fn error(&self) -> Option<&EventSourceError> {
        self.error.as_ref()
    }

    /// Consume the collector, yielding the terminal source error if any.
    pub fn into_error(self) -> Option<EventSourceError> {
        self.error
    }

    /// Status of a tracked resource; resources with no update yet are
    /// `Unknown`. `None` for untracked ids.
    pub fn status_of(&self, id: &ResourceId) -> Option<ResourceStatus> {
        self.records
            .get(id)
            .map(|r| r.as_ref().map_or(ResourceStatus::Unknown, |r| r.status))
    }

    /// Current status of every tracked resource, in tracking order.
    pub fn statuses(&self) -> impl Iterator<Item = ResourceStatus> + '_ {
        self.order
            .iter()
            .map(|id| self.status_of(id).unwrap_or(ResourceStatus::Unknown))
    }

    /// Records in tracking order. Resources that never reported appear as
    /// `Unknown`.
    pub fn snapshot(&self) -> Vec<ResourceStatusRecord> {
        self.order
            .iter()
            .map(|id| match self.records.get(id) {
                Some(Some(record)) => record.clone(),
                _ => ResourceStatusRecord::unknown(id.clone()),
            })
            .collect()
    }
}
