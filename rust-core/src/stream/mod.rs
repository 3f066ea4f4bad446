//! Streaming orchestration: rolling windows, per-channel filter state and update delivery

pub mod buffer;
pub mod beat;
pub mod config;
pub mod channel;
pub mod sink;
pub mod processor;

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One timestamped amplitude reading from the sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Stamp `value` with the current wall-clock time
    pub fn now(value: f64) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Self { timestamp, value }
    }
}

pub use buffer::{MAX_RETENTION_SAMPLES, PendingQueue, RetentionPolicy, SampleWindow};
pub use beat::{BeatConfig, estimate_bpm};
pub use config::{ConfigUpdate, StreamConfig};
pub use channel::{Channel, StreamUpdate};
pub use sink::{EventSink, LatestUpdate};
pub use processor::{DEFAULT_QUEUE_CAPACITY, StreamProcessor};
