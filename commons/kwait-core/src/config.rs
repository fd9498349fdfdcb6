use std::time::Duration;

use envconfig::Envconfig;

use crate::source::{MIN_POLL_INTERVAL, WatchOptions};

#[derive(Envconfig, Clone, Debug)]
pub struct WaitConfig {
    /// Overall deadline for a wait in seconds; 0 waits without deadline.
    /// Env: KWAIT_TIMEOUT_SECS
    #[envconfig(from = "KWAIT_TIMEOUT_SECS", default = "60")]
    pub timeout_secs: u64,

    /// Env: KWAIT_POLL_INTERVAL_MS
    #[envconfig(from = "KWAIT_POLL_INTERVAL_MS", default = "2000")]
    pub poll_interval_ms: u64,

    /// Buffered status events; 0 means unbounded.
    /// Env: KWAIT_CHANNEL_CAPACITY
    #[envconfig(from = "KWAIT_CHANNEL_CAPACITY", default = "64")]
    pub channel_capacity: usize,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            poll_interval_ms: 2000,
            channel_capacity: 64,
        }
    }
}

impl WaitConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            poll_interval: Duration::from_millis(self.poll_interval_ms)
                .max(MIN_POLL_INTERVAL),
            channel_capacity: self.channel_capacity,
        }
    }
}
