use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::context::WaitContext;
use crate::error::EventSourceError;
use crate::event::{ResourceUpdate, StatusEvent};
use crate::id::ResourceId;
use crate::status::ResourceStatus;

pub type StatusEventStream = BoxStream<'static, StatusEvent>;

/// Shortest interval a polling source will tick at.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Clone, Debug)]
pub struct WatchOptions {
    /// Interval between polling rounds, for sources that poll.
    pub poll_interval: Duration,
    /// Buffered events between producer and consumer; 0 means unbounded.
    pub channel_capacity: usize,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            channel_capacity: 64,
        }
    }
}

impl WatchOptions {
    pub fn channel<T>(&self) -> (flume::Sender<T>, flume::Receiver<T>) {
        if self.channel_capacity == 0 {
            flume::unbounded()
        } else {
            flume::bounded(self.channel_capacity)
        }
    }
}

/// Producer of status events for a set of resources.
///
/// The returned stream must end once `ctx` is done. A source that cannot
/// continue emits one [`StatusEvent::Error`] and then ends the stream.
pub trait EventSource: Send + Sync {
    fn subscribe(
        &self,
        ctx: WaitContext,
        ids: &[ResourceId],
        options: &WatchOptions,
    ) -> StatusEventStream;
}

/// Status of one resource as computed from its live state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservedStatus {
    pub status: ResourceStatus,
    pub message: Option<String>,
}

impl ObservedStatus {
    pub fn new(status: ResourceStatus) -> Self {
        Self {
            status,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn into_update(self, id: ResourceId) -> ResourceUpdate {
        ResourceUpdate {
            id,
            status: self.status,
            message: self.message,
        }
    }
}

/// Computes the status of a resource from wherever it lives.
#[async_trait::async_trait]
pub trait StatusReader: Send + Sync + 'static {
    async fn read_status(
        &self,
        id: &ResourceId,
    ) -> Result<ObservedStatus, EventSourceError>;
}

/// Event source that reads every resource once per poll interval and
/// emits an update whenever a resource's observed status changes.
pub struct PollingEventSource<R: StatusReader> {
    reader: Arc<R>,
}

impl<R: StatusReader> PollingEventSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Arc::new(reader),
        }
    }

    pub fn from_arc(reader: Arc<R>) -> Self {
        Self { reader }
    }
}

impl<R: StatusReader> EventSource for PollingEventSource<R> {
    fn subscribe(
        &self,
        ctx: WaitContext,
        ids: &[ResourceId],
        options: &WatchOptions,
    ) -> StatusEventStream {
        let (tx, rx) = options.channel();
        let reader = self.reader.clone();
        let ids = ids.to_vec();
        let interval = options.poll_interval.max(MIN_POLL_INTERVAL);
        tokio::spawn(async move {
            poll_loop(reader, ctx, ids, interval, tx).await;
        });
        rx.into_stream().boxed()
    }
}

async fn poll_loop<R: StatusReader>(
    reader: Arc<R>,
    ctx: WaitContext,
    ids: Vec<ResourceId>,
    interval: Duration,
    tx: flume::Sender<StatusEvent>,
) {
    let mut last: HashMap<ResourceId, ObservedStatus> = HashMap::new();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    debug!(resources = ids.len(), ?interval, "poller started");
    'poll: loop {
        tokio::select! {
            _ = ctx.done() => break 'poll,
            _ = ticker.tick() => {}
        }
        for id in &ids {
            let read = tokio::select! {
                _ = ctx.done() => break 'poll,
                r = reader.read_status(id) => r,
            };
            let event = match read {
                Ok(observed) => {
                    if last.get(id) == Some(&observed) {
                        continue;
                    }
                    last.insert(id.clone(), observed.clone());
                    StatusEvent::Update(observed.into_update(id.clone()))
                }
                Err(err) => {
                    warn!(
                        %id,
                        error = %err,
                        "status read failed, stopping poller"
                    );
                    let _ = tx.send_async(StatusEvent::Error(err)).await;
                    break 'poll;
                }
            };
            if tx.send_async(event).await.is_err() {
                debug!("subscriber dropped the stream");
                break 'poll;
            }
        }
    }
    debug!("poller stopped");
}
