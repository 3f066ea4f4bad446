//! Outbound delivery of stream updates to the transport layer

use super::channel::StreamUpdate;
use log::debug;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

/// Receives one update per completed processing cycle, in arrival order
pub trait EventSink: Send {
    fn publish(&mut self, update: StreamUpdate);
}

impl EventSink for Sender<StreamUpdate> {
    fn publish(&mut self, update: StreamUpdate) {
        if self.send(update).is_err() {
            debug!("Update receiver dropped; discarding update");
        }
    }
}

/// Keeps only the newest update for a reader polling at display rate
#[derive(Clone, Default)]
pub struct LatestUpdate {
    slot: Arc<Mutex<Option<StreamUpdate>>>,
}

impl LatestUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the newest update, if one arrived since the last call
    pub fn take(&self) -> Option<StreamUpdate> {
        if let Ok(mut slot) = self.slot.lock() {
            slot.take()
        } else {
            None
        }
    }
}

impl EventSink for LatestUpdate {
    fn publish(&mut self, update: StreamUpdate) {
        if let Ok(mut slot) = self.slot.lock() {
            // An update carrying spectra is not replaced by a later one without
            let keep_previous = slot
                .as_ref()
                .map_or(false, |prev| prev.has_spectra() && !update.has_spectra());
            if keep_previous {
                if let Some(prev) = slot.as_mut() {
                    prev.filtered = update.filtered;
                    prev.sequence = update.sequence;
                }
            } else {
                *slot = Some(update);
            }
        }
    }
}
