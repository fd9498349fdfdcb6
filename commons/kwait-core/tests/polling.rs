use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use kwait_core::{
    ContextError, EventSourceError, Interruption, ObservedStatus,
    PollingEventSource, ReadinessWaiter, ResourceError, ResourceId,
    ResourceStatus::{self, *},
    StatusReader, WaitContext, WaitError, WaitPhase, WatchOptions,
};

mod common;
use common::dep;

/// Resource becomes current after a number of reads; counts every read.
struct RolloutReader {
    reads_until_current: HashMap<ResourceId, usize>,
    reads: Mutex<HashMap<ResourceId, usize>>,
}

impl RolloutReader {
    fn new(plan: &[(&ResourceId, usize)]) -> Self {
        Self {
            reads_until_current: plan
                .iter()
                .map(|(id, n)| ((*id).clone(), *n))
                .collect(),
            reads: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl StatusReader for RolloutReader {
    async fn read_status(
        &self,
        id: &ResourceId,
    ) -> Result<ObservedStatus, EventSourceError> {
        let Some(needed) = self.reads_until_current.get(id) else {
            return Ok(ObservedStatus::new(NotFound));
        };
        let mut reads = self.reads.lock().unwrap();
        let n = reads.entry(id.clone()).or_default();
        *n += 1;
        let status: ResourceStatus =
            if *n >= *needed { Current } else { InProgress };
        Ok(ObservedStatus::new(status)
            .with_message(format!("{n} of {needed} replicas updated")))
    }
}

struct BrokenReader;

#[async_trait::async_trait]
impl StatusReader for BrokenReader {
    async fn read_status(
        &self,
        id: &ResourceId,
    ) -> Result<ObservedStatus, EventSourceError> {
        Err(EventSourceError::read(id, "forbidden"))
    }
}

fn every_100ms() -> WatchOptions {
    WatchOptions {
        poll_interval: Duration::from_millis(100),
        channel_capacity: 4,
    }
}

#[tokio::test(start_paused = true)]
async fn polling_until_every_rollout_completes() {
    let (a, b) = (dep("a"), dep("b"));
    let source = PollingEventSource::new(RolloutReader::new(&[(&a, 3), (&b, 5)]));
    let ctx = WaitContext::with_timeout(Duration::from_secs(10));

    let report = ReadinessWaiter::new(&source)
        .with_options(every_100ms())
        .run(&ctx, &[a, b])
        .await;

    assert_eq!(report.phase, WaitPhase::Succeeded);
    assert!(report.result.is_ok());
    assert_eq!(
        report.records[1].message.as_deref(),
        Some("5 of 5 replicas updated")
    );
    assert_eq!(ctx.err(), None);
}

#[tokio::test(start_paused = true)]
async fn polling_times_out_with_missing_resource() {
    let (a, missing) = (dep("a"), dep("missing"));
    let source = PollingEventSource::new(RolloutReader::new(&[(&a, 1)]));
    let ctx = WaitContext::with_timeout(Duration::from_secs(1));

    let err = ReadinessWaiter::new(&source)
        .with_options(every_100ms())
        .run(&ctx, &[a, missing.clone()])
        .await
        .into_result()
        .unwrap_err();

    let combined = err.combined().unwrap();
    assert_eq!(combined.resources, vec![ResourceError::NotFound(missing)]);
    assert_eq!(
        combined.cause,
        Interruption::Context(ContextError::DeadlineExceeded)
    );
}

#[tokio::test(start_paused = true)]
async fn reader_failure_surfaces_as_source_error() {
    let source = PollingEventSource::new(BrokenReader);
    let ctx = WaitContext::with_timeout(Duration::from_secs(1));

    let report = ReadinessWaiter::new(&source)
        .with_options(every_100ms())
        .run(&ctx, &[dep("a")])
        .await;

    assert_eq!(report.phase, WaitPhase::SourceFailed);
    assert!(matches!(
        report.result,
        Err(WaitError::Source(EventSourceError::Read { .. }))
    ));
}
