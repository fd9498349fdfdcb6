use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use futures_util::StreamExt;
use kwait_core::{
    EventSource, EventSourceError, ResourceId, ResourceUpdate, StatusEvent,
    StatusEventStream, WaitContext, WatchOptions,
};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;
use tracing::{debug, warn};

type BoxedReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// One line of the event feed.
#[derive(Deserialize)]
#[serde(untagged)]
enum FeedLine {
    Error { error: String },
    Update(ResourceUpdate),
}

/// Watch-style event source fed by JSON lines pushed from another process
/// (or a file). The feed can be subscribed once.
pub struct ReplayEventSource {
    reader: Mutex<Option<BoxedReader>>,
}

impl ReplayEventSource {
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        Self {
            reader: Mutex::new(Some(Box::new(reader))),
        }
    }

    /// Open `path`, or stdin when `path` is `-`.
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        if path == Path::new("-") {
            return Ok(Self::new(BufReader::new(tokio::io::stdin())));
        }
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("failed to open {}", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }

    fn take_reader(&self) -> Result<BoxedReader, EventSourceError> {
        let mut slot = self.reader.lock().map_err(|_| {
            EventSourceError::unavailable("event feed lock poisoned")
        })?;
        slot.take().ok_or_else(|| {
            EventSourceError::unavailable("event feed already consumed")
        })
    }
}

impl EventSource for ReplayEventSource {
    fn subscribe(
        &self,
        ctx: WaitContext,
        _ids: &[ResourceId],
        options: &WatchOptions,
    ) -> StatusEventStream {
        let (tx, rx) = options.channel();
        let reader = self.take_reader();
        tokio::spawn(async move {
            let reader = match reader {
                Ok(reader) => reader,
                Err(err) => {
                    let _ = tx.send_async(StatusEvent::Error(err)).await;
                    return;
                }
            };
            let mut lines = LinesStream::new(reader.lines());
            let mut line_no = 0usize;
            loop {
                let next = tokio::select! {
                    _ = ctx.done() => break,
                    next = lines.next() => next,
                };
                let Some(line) = next else {
                    debug!(lines = line_no, "event feed exhausted");
                    break;
                };
                line_no += 1;
                let event = match line.map_err(EventSourceError::from) {
                    Ok(line) => match decode_line(&line) {
                        Ok(Some(event)) => event,
                        Ok(None) => continue,
                        Err(e) => {
                            warn!(
                                line = line_no,
                                error = %e,
                                "malformed event"
                            );
                            StatusEvent::Error(EventSourceError::Decode(format!(
                                "line {line_no}: {e}"
                            )))
                        }
                    },
                    Err(e) => StatusEvent::Error(e),
                };
                let terminal = matches!(event, StatusEvent::Error(_));
                if tx.send_async(event).await.is_err() || terminal {
                    break;
                }
            }
        });
        rx.into_stream().boxed()
    }
}

/// Blank lines decode to `None`.
pub fn decode_line(
    line: &str,
) -> Result<Option<StatusEvent>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let event = match serde_json::from_str::<FeedLine>(line)? {
        FeedLine::Error { error } => {
            StatusEvent::Error(EventSourceError::Unavailable(error))
        }
        FeedLine::Update(update) => StatusEvent::Update(update),
    };
    Ok(Some(event))
}
