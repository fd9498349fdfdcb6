use futures_util::StreamExt;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregator::aggregate;
use crate::collector::ResourceStatusCollector;
use crate::context::WaitContext;
use crate::error::{CombinedError, Interruption, ResourceError, WaitError};
use crate::id::ResourceId;
use crate::source::{EventSource, WatchOptions};
use crate::status::{ResourceStatus, ResourceStatusRecord};

/// The status every tracked resource has to reach.
pub const TARGET_STATUS: ResourceStatus = ResourceStatus::Current;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum WaitPhase {
    Running,
    Succeeded,
    TimedOut,
    SourceFailed,
}

#[derive(Debug)]
pub struct WaitReport {
    pub phase: WaitPhase,
    /// Final record of every tracked resource, in tracking order.
    pub records: Vec<ResourceStatusRecord>,
    pub events_processed: usize,
    pub result: Result<(), WaitError>,
}

impl WaitReport {
    pub fn is_ready(&self) -> bool {
        self.phase == WaitPhase::Succeeded
    }

    pub fn into_result(self) -> Result<(), WaitError> {
        self.result
    }
}

/// Waits until every resource of a set reports [`TARGET_STATUS`].
pub struct ReadinessWaiter<'a, S: EventSource + ?Sized> {
    source: &'a S,
    options: WatchOptions,
}

impl<'a, S: EventSource + ?Sized> ReadinessWaiter<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            options: WatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: WatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Consume status events until all resources are ready, the stream
    /// ends, or the source fails.
    ///
    /// On success the subscription is cancelled through a child of `ctx`;
    /// only `ctx` itself is consulted afterwards to tell a deadline from
    /// that self-inflicted cancellation.
    #[tracing::instrument(skip_all, fields(resources = ids.len()))]
    pub async fn run(
        &self,
        ctx: &WaitContext,
        ids: &[ResourceId],
    ) -> WaitReport {
        let mut collector = ResourceStatusCollector::new(ids.iter().cloned());
        if collector.is_empty() {
            debug!("nothing to wait for");
            return WaitReport {
                phase: WaitPhase::Succeeded,
                records: vec![],
                events_processed: 0,
                result: Ok(()),
            };
        }

        let child = ctx.child();
        let mut stream = self.source.subscribe(
            child.clone(),
            collector.ids(),
            &self.options,
        );
        let mut phase = WaitPhase::Running;
        let mut events_processed = 0;

        while let Some(event) = stream.next().await {
            events_processed += 1;
            collector.apply(event);
            if collector.error().is_some() {
                break;
            }
            if aggregate(collector.statuses(), TARGET_STATUS) == TARGET_STATUS {
                phase = WaitPhase::Succeeded;
                break;
            }
        }
        child.cancel();
        drop(stream);

        let records = collector.snapshot();
        let result = if let Some(err) = collector.into_error() {
            warn!(error = %err, "event source failed");
            phase = WaitPhase::SourceFailed;
            Err(WaitError::Source(err))
        } else if phase == WaitPhase::Succeeded {
            info!(events_processed, "all resources are ready");
            Ok(())
        } else {
            phase = WaitPhase::TimedOut;
            let cause = match ctx.err() {
                Some(err) => Interruption::Context(err),
                None => Interruption::StreamClosed,
            };
            let err = diagnose(&records, cause);
            warn!(
                not_ready = err.resources.len(),
                cause = %err.cause,
                "resources did not become ready"
            );
            Err(WaitError::NotReady(err))
        };

        WaitReport {
            phase,
            records,
            events_processed,
            result,
        }
    }
}

/// Wait for all `ids` to become current, using default watch options.
pub async fn wait_for_ready<S: EventSource + ?Sized>(
    ctx: &WaitContext,
    source: &S,
    ids: &[ResourceId],
) -> Result<(), WaitError> {
    ReadinessWaiter::new(source).run(ctx, ids).await.into_result()
}

/// One diagnostic per record that is not at the target, then the cause.
pub fn diagnose(
    records: &[ResourceStatusRecord],
    cause: Interruption,
) -> CombinedError {
    let resources = records
        .iter()
        .filter_map(|r| match r.status {
            ResourceStatus::Current => None,
            ResourceStatus::NotFound => {
                Some(ResourceError::NotFound(r.id.clone()))
            }
            ResourceStatus::Unknown => {
                Some(ResourceError::UnknownStatus(r.id.clone()))
            }
            status => Some(ResourceError::NotReady {
                id: r.id.clone(),
                status,
            }),
        })
        .collect();
    CombinedError { resources, cause }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContextError;
    use crate::id::GroupKind;
    use crate::status::ResourceStatus::*;

    fn record(name: &str, status: ResourceStatus) -> ResourceStatusRecord {
        ResourceStatusRecord {
            id: ResourceId::new(
                "ns",
                name,
                GroupKind::new("apps", "Deployment"),
            ),
            status,
            message: None,
        }
    }

    #[test]
    fn diagnose_maps_each_status_to_its_error() {
        let records = [
            record("a", Current),
            record("b", NotFound),
            record("c", Unknown),
            record("d", InProgress),
            record("e", Failed),
            record("f", Terminating),
        ];
        let err = diagnose(&records, ContextError::DeadlineExceeded.into());
        assert_eq!(err.resources.len(), 5);
        assert!(matches!(
            &err.resources[0],
            ResourceError::NotFound(id) if id.name == "b"
        ));
        assert!(matches!(
            &err.resources[1],
            ResourceError::UnknownStatus(id) if id.name == "c"
        ));
        assert!(matches!(
            &err.resources[2],
            ResourceError::NotReady { status: InProgress, .. }
        ));
        assert!(matches!(
            &err.resources[3],
            ResourceError::NotReady { status: Failed, .. }
        ));
        assert!(matches!(
            &err.resources[4],
            ResourceError::NotReady { status: Terminating, .. }
        ));
        assert_eq!(
            err.cause,
            Interruption::Context(ContextError::DeadlineExceeded)
        );
    }

    #[test]
    fn diagnose_with_everything_current_has_only_the_cause() {
        let err = diagnose(&[record("a", Current)], Interruption::StreamClosed);
        assert!(err.resources.is_empty());
        assert_eq!(
            err.to_string(),
            "status event stream closed before resources became ready"
        );
    }
}
