//! Threaded stream processor - keeps the hot loop off the sensor thread
//!
//! Samples are queued by the sensor side and processed in arrival order by a
//! worker thread that owns the channel state for the duration of each cycle.

use super::buffer::PendingQueue;
use super::channel::Channel;
use super::config::{ConfigUpdate, StreamConfig};
use super::sink::EventSink;
use super::Sample;
use crate::error::{DspError, Result};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Default number of samples that may wait for the worker
pub const DEFAULT_QUEUE_CAPACITY: usize = 4096;

/// Background processor for one sensor channel
pub struct StreamProcessor {
    /// Channel state; locked by the worker for one cycle at a time
    channel: Arc<Mutex<Channel>>,

    /// Samples waiting for the worker
    pending: Arc<Mutex<PendingQueue>>,

    /// Running flag
    running: Arc<AtomicBool>,

    /// Processing thread handle
    process_thread: Option<std::thread::JoinHandle<()>>,
}

impl StreamProcessor {
    /// Create a processor
    ///
    /// # Arguments
    /// * `config` - Initial stream configuration
    /// * `queue_capacity` - Bound on samples awaiting processing
    pub fn new(config: StreamConfig, queue_capacity: usize) -> Result<Self> {
        Ok(Self {
            channel: Arc::new(Mutex::new(Channel::new(config)?)),
            pending: Arc::new(Mutex::new(PendingQueue::new(queue_capacity)?)),
            running: Arc::new(AtomicBool::new(false)),
            process_thread: None,
        })
    }

    /// Create a processor with [`DEFAULT_QUEUE_CAPACITY`]
    pub fn with_default_queue(config: StreamConfig) -> Result<Self> {
        Self::new(config, DEFAULT_QUEUE_CAPACITY)
    }

    /// Start the worker thread, publishing every update to `sink`
    pub fn start<S>(&mut self, sink: S)
    where
        S: EventSink + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Stream processor already running");
            return;
        }

        let channel = Arc::clone(&self.channel);
        let pending = Arc::clone(&self.pending);
        let running = Arc::clone(&self.running);
        let mut sink = sink;

        let handle = std::thread::spawn(move || {
            let mut batch: Vec<Sample> = Vec::with_capacity(256);

            while running.load(Ordering::SeqCst) {
                if let Ok(mut queue) = pending.lock() {
                    queue.drain_into(&mut batch);
                }

                if batch.is_empty() {
                    // Idle: short sleep instead of spinning
                    std::thread::sleep(Duration::from_micros(100));
                    continue;
                }

                for sample in batch.drain(..) {
                    let update = match channel.lock() {
                        Ok(mut channel) => channel.on_sample(sample),
                        Err(_) => {
                            warn!("Channel state poisoned; stopping stream processor");
                            running.store(false, Ordering::SeqCst);
                            break;
                        }
                    };
                    // Publish outside the channel lock
                    sink.publish(update);
                }
            }
        });

        self.process_thread = Some(handle);
        info!("Stream processor started");
    }

    /// Stop the worker; samples still pending stay queued for a later start
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.process_thread.take() {
            let _ = handle.join();
            info!("Stream processor stopped");
        }
    }

    /// Queue a sample from the sensor side
    ///
    /// # Returns
    /// `false` if the queue was full and its oldest sample was dropped
    pub fn push_sample(&self, sample: Sample) -> bool {
        match self.pending.lock() {
            Ok(mut queue) => {
                let clean = queue.push(sample);
                if !clean {
                    warn!(
                        "Pending queue full; dropped oldest sample ({} dropped so far)",
                        queue.dropped()
                    );
                }
                clean
            }
            Err(_) => false,
        }
    }

    /// Validate and apply a client update.
    ///
    /// Takes the channel lock, so the change lands between two cycles.
    pub fn configure(&self, update: &ConfigUpdate) -> Result<StreamConfig> {
        let mut channel = self.lock_channel()?;
        let applied = channel.apply_update(update)?.clone();
        Ok(applied)
    }

    /// Parse a JSON update from the transport and apply it
    pub fn configure_json(&self, payload: &str) -> Result<StreamConfig> {
        let update = ConfigUpdate::from_json(payload).map_err(|e| {
            warn!("Rejected configuration payload: {}", e);
            e
        })?;
        self.configure(&update)
    }

    /// Snapshot of the active configuration
    pub fn config(&self) -> Result<StreamConfig> {
        Ok(self.lock_channel()?.config().clone())
    }

    /// Total samples dropped by backpressure
    pub fn dropped_samples(&self) -> u64 {
        self.pending.lock().map(|queue| queue.dropped()).unwrap_or(0)
    }

    /// Samples waiting for the worker
    pub fn pending_samples(&self) -> usize {
        self.pending.lock().map(|queue| queue.len()).unwrap_or(0)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn lock_channel(&self) -> Result<std::sync::MutexGuard<'_, Channel>> {
        self.channel
            .lock()
            .map_err(|_| DspError::StatePoisoned)
    }
}

impl Drop for StreamProcessor {
    fn drop(&mut self) {
        self.stop();
    }
}
