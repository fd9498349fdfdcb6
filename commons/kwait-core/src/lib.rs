pub mod aggregator;
pub mod collector;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod id;
pub mod source;
pub mod status;
pub mod waiter;

pub use aggregator::aggregate;
pub use collector::ResourceStatusCollector;
pub use config::WaitConfig;
pub use context::WaitContext;
pub use error::{
    CombinedError, ContextError, EventSourceError, Interruption,
    ResourceError, WaitError,
};
pub use event::{ResourceUpdate, StatusEvent};
pub use id::{GroupKind, ResourceId};
pub use source::{
    EventSource, MIN_POLL_INTERVAL, ObservedStatus, PollingEventSource,
    StatusEventStream, StatusReader, WatchOptions,
};
pub use status::{ResourceStatus, ResourceStatusRecord};
pub use waiter::{
    ReadinessWaiter, TARGET_STATUS, WaitPhase, WaitReport, wait_for_ready,
};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Install a stderr fmt subscriber filtered by `env_var`, falling back to
/// `default_level` for targets the variable does not mention.
pub fn init_tracing(env_var: &str, default_level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(env_var)
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
