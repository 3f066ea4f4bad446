//! Bounded sample buffers backed by `ringbuf`
//!
//! `SampleWindow` is the rolling analysis window; `PendingQueue` sits between
//! the sensor feed and the processing thread and drops its oldest entry when full.

use super::Sample;
use crate::error::{DspError, Result};
use ringbuf::{HeapRb, Rb};

/// Largest window a client may request
pub const MAX_RETENTION_SAMPLES: usize = 1 << 20;

/// Retention bound for a sample window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetentionPolicy {
    /// Keep at most this many samples
    pub max_samples: usize,

    /// Also drop samples older than this, relative to the newest timestamp
    pub max_age_ms: Option<i64>,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_samples: 2048,
            max_age_ms: None,
        }
    }
}

impl RetentionPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.max_samples == 0
            || self.max_samples > MAX_RETENTION_SAMPLES
            || self.max_age_ms.map_or(false, |age| age < 0)
        {
            return Err(DspError::InvalidRetention);
        }
        Ok(())
    }
}

/// Rolling window of the most recent samples
pub struct SampleWindow {
    ring: HeapRb<Sample>,
    policy: RetentionPolicy,
}

impl SampleWindow {
    pub fn new(policy: RetentionPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            ring: HeapRb::new(policy.max_samples),
            policy,
        })
    }

    /// Append a sample and evict whatever the policy no longer retains
    ///
    /// # Returns
    /// Number of samples evicted
    pub fn push(&mut self, sample: Sample) -> usize {
        let mut evicted = 0;
        if self.ring.len() >= self.policy.max_samples {
            self.ring.pop();
            evicted += 1;
        }
        // Cannot fail: a slot was freed above
        let _ = self.ring.push(sample);

        if let Some(max_age_ms) = self.policy.max_age_ms {
            let cutoff = sample.timestamp.saturating_sub(max_age_ms);
            loop {
                let oldest = match self.ring.iter().next() {
                    Some(oldest) => oldest.timestamp,
                    None => break,
                };
                if oldest >= cutoff {
                    break;
                }
                self.ring.pop();
                evicted += 1;
            }
        }

        evicted
    }

    /// Copy sample values oldest-first into `out` (cleared first)
    pub fn values_into(&self, out: &mut Vec<f64>) {
        out.clear();
        out.extend(self.ring.iter().map(|s| s.value));
    }

    pub fn values(&self) -> Vec<f64> {
        self.ring.iter().map(|s| s.value).collect()
    }

    pub fn samples(&self) -> Vec<Sample> {
        self.ring.iter().copied().collect()
    }

    pub fn latest(&self) -> Option<Sample> {
        self.ring.iter().last().copied()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.len() == 0
    }

    pub fn clear(&mut self) {
        while self.ring.pop().is_some() {}
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    /// Switch retention policy, keeping the newest samples that still fit
    pub fn set_policy(&mut self, policy: RetentionPolicy) -> Result<()> {
        policy.validate()?;
        if policy == self.policy {
            return Ok(());
        }

        let retained = self.samples();
        self.ring = HeapRb::new(policy.max_samples);
        self.policy = policy;
        for sample in retained {
            self.push(sample);
        }
        Ok(())
    }
}

/// Bounded hand-off queue between sample arrival and processing
pub struct PendingQueue {
    ring: HeapRb<Sample>,
    capacity: usize,
    dropped: u64,
}

impl PendingQueue {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(DspError::InvalidQueueCapacity);
        }
        Ok(Self {
            ring: HeapRb::new(capacity),
            capacity,
            dropped: 0,
        })
    }

    /// Enqueue a sample, discarding the oldest pending one if full
    ///
    /// # Returns
    /// `false` when an older sample had to be dropped
    pub fn push(&mut self, sample: Sample) -> bool {
        let mut accepted_cleanly = true;
        if self.ring.len() >= self.capacity {
            self.ring.pop();
            self.dropped += 1;
            accepted_cleanly = false;
        }
        let _ = self.ring.push(sample);
        accepted_cleanly
    }

    /// Move every pending sample, oldest first, into `out`
    pub fn drain_into(&mut self, out: &mut Vec<Sample>) -> usize {
        let before = out.len();
        out.extend(self.ring.pop_iter());
        out.len() - before
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.len() == 0
    }

    /// Total samples dropped since creation
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
