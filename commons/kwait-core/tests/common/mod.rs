#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use kwait_core::{
    EventSource, EventSourceError, GroupKind, ResourceId, ResourceStatus,
    StatusEvent, StatusEventStream, WaitContext, WatchOptions,
};

pub fn dep(name: &str) -> ResourceId {
    ResourceId::new("default", name, GroupKind::new("apps", "Deployment"))
}

pub enum Step {
    Emit(StatusEvent),
    Sleep(Duration),
}

pub fn emit(id: &ResourceId, status: ResourceStatus) -> Step {
    Step::Emit(StatusEvent::update(id.clone(), status))
}

pub fn fail(msg: &str) -> Step {
    Step::Emit(StatusEvent::Error(EventSourceError::unavailable(msg)))
}

pub fn sleep_ms(ms: u64) -> Step {
    Step::Sleep(Duration::from_millis(ms))
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Close the stream once the script is exhausted.
    Close,
    /// Keep the stream open until the subscription context is done.
    HoldOpen,
}

/// Event source that plays a fixed script once.
pub struct ScriptedSource {
    script: Mutex<Option<Vec<Step>>>,
    ending: Ending,
    pub subscriptions: AtomicUsize,
    /// Set when the producer observed its context being done.
    pub cancelled: Arc<AtomicBool>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Step>, ending: Ending) -> Self {
        Self {
            script: Mutex::new(Some(script)),
            ending,
            subscriptions: AtomicUsize::new(0),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl EventSource for ScriptedSource {
    fn subscribe(
        &self,
        ctx: WaitContext,
        _ids: &[ResourceId],
        options: &WatchOptions,
    ) -> StatusEventStream {
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().unwrap().take().unwrap_or_default();
        let ending = self.ending;
        let cancelled = self.cancelled.clone();
        let (tx, rx) = options.channel();
        tokio::spawn(async move {
            for step in script {
                match step {
                    Step::Emit(event) => {
                        if tx.send_async(event).await.is_err() {
                            return;
                        }
                    }
                    Step::Sleep(d) => {
                        tokio::select! {
                            _ = ctx.done() => {
                                cancelled.store(true, Ordering::SeqCst);
                                return;
                            }
                            _ = tokio::time::sleep(d) => {}
                        }
                    }
                }
            }
            if ending == Ending::HoldOpen {
                ctx.done().await;
                cancelled.store(true, Ordering::SeqCst);
            }
        });
        rx.into_stream().boxed()
    }
}
