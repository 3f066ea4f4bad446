//! Per-channel streaming orchestrator
//!
//! Owns the raw and filtered windows plus the filter state for one sensor
//! channel, and turns each incoming sample into a [`StreamUpdate`].

use super::beat::estimate_bpm;
use super::buffer::SampleWindow;
use super::config::{ConfigUpdate, StreamConfig};
use super::Sample;
use crate::error::Result;
use crate::filters::{build_stage, IirStage};
use crate::spectrum::{SpectrumAnalyzer, SpectrumResult};
use log::{debug, info, warn};
use serde::Serialize;

/// Result of one processing cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamUpdate {
    /// Position of the triggering sample in arrival order (1-based)
    pub sequence: u64,

    /// Newest filtered sample, stamped with the raw sample's timestamp
    pub filtered: Sample,

    /// Spectrum of the raw window, on spectrum cycles only
    pub raw_spectrum: Option<SpectrumResult>,

    /// Spectrum of the filtered window, on spectrum cycles only
    pub filtered_spectrum: Option<SpectrumResult>,

    /// Beat-rate estimate of the raw window when enabled
    pub bpm: Option<f64>,
}

impl StreamUpdate {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn has_spectra(&self) -> bool {
        self.raw_spectrum.is_some() && self.filtered_spectrum.is_some()
    }
}

/// Streaming orchestrator for a single channel
pub struct Channel {
    config: StreamConfig,
    stage: Box<dyn IirStage + Send>,
    analyzer: SpectrumAnalyzer,
    raw_window: SampleWindow,
    filtered_window: SampleWindow,

    /// Reused between cycles to avoid per-sample allocation of the value copy
    scratch: Vec<f64>,

    samples_seen: u64,
}

impl Channel {
    pub fn new(config: StreamConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            stage: build_stage(config.mode, &config.filter)?,
            analyzer: SpectrumAnalyzer::new(config.analyzer_config())?,
            raw_window: SampleWindow::new(config.retention)?,
            filtered_window: SampleWindow::new(config.retention)?,
            scratch: Vec::with_capacity(config.retention.max_samples),
            samples_seen: 0,
            config,
        })
    }

    /// Process one raw sample
    pub fn on_sample(&mut self, raw: Sample) -> StreamUpdate {
        self.samples_seen += 1;

        self.raw_window.push(raw);
        let filtered = Sample {
            timestamp: raw.timestamp,
            value: self.stage.process_sample(raw.value - self.config.signal_center),
        };
        self.filtered_window.push(filtered);

        let mut update = StreamUpdate {
            sequence: self.samples_seen,
            filtered,
            raw_spectrum: None,
            filtered_spectrum: None,
            bpm: None,
        };

        if self.samples_seen % self.config.spectrum_interval as u64 == 0 {
            self.raw_window.values_into(&mut self.scratch);
            update.raw_spectrum = Some(self.analyzer.analyze(&self.scratch));

            if let Some(beat) = &self.config.beat {
                match estimate_bpm(&self.scratch, self.config.filter.sample_rate_hz, beat) {
                    Ok(bpm) => update.bpm = Some(bpm),
                    Err(e) => warn!("Beat estimate skipped: {}", e),
                }
            }

            self.filtered_window.values_into(&mut self.scratch);
            update.filtered_spectrum = Some(self.analyzer.analyze(&self.scratch));

            debug!(
                "Cycle {}: {} raw / {} filtered samples analysed",
                self.samples_seen,
                self.raw_window.len(),
                self.filtered_window.len()
            );
        }

        update
    }

    /// Process samples in arrival order
    pub fn on_samples<I>(&mut self, samples: I) -> Vec<StreamUpdate>
    where
        I: IntoIterator<Item = Sample>,
    {
        samples.into_iter().map(|s| self.on_sample(s)).collect()
    }

    /// Replace the whole configuration
    ///
    /// Validation happens before anything is touched; on success the filter
    /// state is cold-started and the windows adopt the new retention bound.
    pub fn configure(&mut self, config: StreamConfig) -> Result<()> {
        if let Err(e) = config.validate() {
            warn!("Rejected stream configuration: {}", e);
            return Err(e);
        }

        let stage = build_stage(config.mode, &config.filter)?;
        self.analyzer.update_config(config.analyzer_config())?;
        self.raw_window.set_policy(config.retention)?;
        self.filtered_window.set_policy(config.retention)?;
        self.stage = stage;

        info!(
            "Stream configured: {:?} {}-{} Hz at {} Hz, range {:?}",
            config.mode,
            config.filter.low_cutoff_hz,
            config.filter.high_cutoff_hz,
            config.filter.sample_rate_hz,
            config.range
        );
        self.config = config;
        Ok(())
    }

    /// Merge a client update into the current configuration and apply it
    pub fn apply_update(&mut self, update: &ConfigUpdate) -> Result<&StreamConfig> {
        let next = match self.config.merged(update) {
            Ok(next) => next,
            Err(e) => {
                warn!("Rejected configuration update: {}", e);
                return Err(e);
            }
        };
        self.configure(next)?;
        Ok(&self.config)
    }

    /// Cold-start the filter without changing configuration
    pub fn reset_filter(&mut self) {
        self.stage.reset();
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn raw_window(&self) -> &SampleWindow {
        &self.raw_window
    }

    pub fn filtered_window(&self) -> &SampleWindow {
        &self.filtered_window
    }

    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }
}
