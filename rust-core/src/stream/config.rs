//! Stream configuration and the partial updates sent by clients

use super::beat::BeatConfig;
use super::buffer::RetentionPolicy;
use crate::error::{DspError, Result};
use crate::filters::{FilterConfig, FilterMode};
use crate::spectrum::{AnalyzerConfig, FrequencyRange};
use serde::Deserialize;

/// Everything a channel needs to process samples
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    pub filter: FilterConfig,

    pub mode: FilterMode,

    /// Restrict published spectra to this band when set
    pub range: Option<FrequencyRange>,

    /// Round published spectra to this many decimals when set
    pub precision: Option<u32>,

    /// Bound applied to both the raw and the filtered window
    pub retention: RetentionPolicy,

    /// Compute spectra every `spectrum_interval` samples
    pub spectrum_interval: usize,

    /// Subtracted from each raw value before filtering
    pub signal_center: f64,

    /// Publish a beat-rate estimate alongside the spectra when set
    pub beat: Option<BeatConfig>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            mode: FilterMode::default(),
            range: None,
            precision: None,
            retention: RetentionPolicy::default(),
            spectrum_interval: 1,
            signal_center: 0.0,
            beat: None,
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> Result<()> {
        self.filter.validate()?;
        self.analyzer_config().validate()?;
        self.retention.validate()?;
        if self.spectrum_interval == 0 {
            return Err(DspError::InvalidInterval);
        }
        if !self.signal_center.is_finite() {
            return Err(DspError::MalformedConfig(format!(
                "signal centre must be finite (found: {})",
                self.signal_center
            )));
        }
        Ok(())
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            sample_rate_hz: self.filter.sample_rate_hz,
            range: self.range,
            precision: self.precision,
        }
    }

    /// Apply `update` on top of this config; absent fields keep their value.
    ///
    /// The merged config is validated as a whole, so a rejected update never
    /// yields a half-applied result.
    pub fn merged(&self, update: &ConfigUpdate) -> Result<Self> {
        let mut next = self.clone();

        if let Some(low) = update.low_cutoff_hz {
            next.filter.low_cutoff_hz = low;
        }
        if let Some(high) = update.high_cutoff_hz {
            next.filter.high_cutoff_hz = high;
        }
        if let Some(rate) = update.sample_rate_hz {
            next.filter.sample_rate_hz = rate;
        }
        if let Some(order) = update.order {
            next.filter.order = order;
        }
        if let Some(mode) = update.mode {
            next.mode = mode;
        }

        if update.min_freq_hz.is_some() || update.max_freq_hz.is_some() {
            let base = next.range.unwrap_or_default();
            next.range = Some(FrequencyRange {
                min_hz: update.min_freq_hz.unwrap_or(base.min_hz),
                max_hz: update.max_freq_hz.unwrap_or(base.max_hz),
            });
        }
        match update.range_enabled {
            Some(false) => next.range = None,
            Some(true) if next.range.is_none() => next.range = Some(FrequencyRange::default()),
            _ => {}
        }

        if let Some(places) = update.precision {
            next.precision = Some(places);
        }
        if let Some(max_samples) = update.max_samples {
            next.retention.max_samples = max_samples;
        }
        if let Some(max_age_ms) = update.max_age_ms {
            next.retention.max_age_ms = Some(max_age_ms);
        }
        if let Some(interval) = update.spectrum_interval {
            next.spectrum_interval = interval;
        }
        if let Some(center) = update.signal_center {
            next.signal_center = center;
        }
        match update.bpm_enabled {
            Some(false) => next.beat = None,
            Some(true) if next.beat.is_none() => next.beat = Some(BeatConfig::default()),
            _ => {}
        }

        next.validate()?;
        Ok(next)
    }
}

/// Partial configuration as sent by a client; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigUpdate {
    pub low_cutoff_hz: Option<f64>,
    pub high_cutoff_hz: Option<f64>,
    pub sample_rate_hz: Option<f64>,
    pub order: Option<u32>,
    pub mode: Option<FilterMode>,
    pub min_freq_hz: Option<f64>,
    pub max_freq_hz: Option<f64>,
    pub range_enabled: Option<bool>,
    pub precision: Option<u32>,
    pub max_samples: Option<usize>,
    pub max_age_ms: Option<i64>,
    pub spectrum_interval: Option<usize>,
    pub signal_center: Option<f64>,
    pub bpm_enabled: Option<bool>,
}

impl ConfigUpdate {
    /// Parse a JSON payload such as `{"lowCutoffHz": 5, "highCutoffHz": 40}`
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|e| DspError::MalformedConfig(e.to_string()))
    }

    /// Update that only moves the band edges
    pub fn cutoffs(low_cutoff_hz: f64, high_cutoff_hz: f64) -> Self {
        Self {
            low_cutoff_hz: Some(low_cutoff_hz),
            high_cutoff_hz: Some(high_cutoff_hz),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(StreamConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_camel_case_payload() {
        let update = ConfigUpdate::from_json(
            r#"{"lowCutoffHz": 5.0, "highCutoffHz": 40, "sampleRateHz": 200, "order": 4, "minFreqHz": 1, "maxFreqHz": 50}"#,
        )
        .unwrap();

        assert_eq!(update.low_cutoff_hz, Some(5.0));
        assert_eq!(update.high_cutoff_hz, Some(40.0));
        assert_eq!(update.sample_rate_hz, Some(200.0));
        assert_eq!(update.order, Some(4));
        assert_eq!(update.min_freq_hz, Some(1.0));
        assert_eq!(update.max_freq_hz, Some(50.0));
        assert_eq!(update.mode, None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            ConfigUpdate::from_json("{\"lowCutoffHz\": \"fast\"}"),
            Err(DspError::MalformedConfig(_))
        ));
        assert!(ConfigUpdate::from_json("not json").is_err());
    }

    #[test]
    fn test_missing_fields_keep_previous() {
        let base = StreamConfig::default();
        let merged = base.merged(&ConfigUpdate::from_json("{\"highCutoffHz\": 1000}").unwrap()).unwrap();

        assert_eq!(merged.filter.high_cutoff_hz, 1000.0);
        assert_eq!(merged.filter.low_cutoff_hz, base.filter.low_cutoff_hz);
        assert_eq!(merged.filter.sample_rate_hz, base.filter.sample_rate_hz);
        assert_eq!(merged.range, None);
    }

    #[test]
    fn test_range_fields_enable_restriction() {
        let base = StreamConfig::default();
        let merged = base.merged(&ConfigUpdate::from_json("{\"maxFreqHz\": 500}").unwrap()).unwrap();
        assert_eq!(merged.range, Some(FrequencyRange { min_hz: 20.0, max_hz: 500.0 }));

        let disabled = merged
            .merged(&ConfigUpdate {
                range_enabled: Some(false),
                ..ConfigUpdate::default()
            })
            .unwrap();
        assert_eq!(disabled.range, None);
    }

    #[test]
    fn test_rejected_update_reports_error() {
        let base = StreamConfig::default();

        let above_nyquist = ConfigUpdate::cutoffs(10.0, 30000.0);
        assert!(matches!(
            base.merged(&above_nyquist),
            Err(DspError::CutoffOutOfRange { .. })
        ));

        let zero_interval = ConfigUpdate {
            spectrum_interval: Some(0),
            ..ConfigUpdate::default()
        };
        assert_eq!(base.merged(&zero_interval), Err(DspError::InvalidInterval));

        let negative_rate = ConfigUpdate {
            sample_rate_hz: Some(-10.0),
            ..ConfigUpdate::default()
        };
        assert!(matches!(
            base.merged(&negative_rate),
            Err(DspError::InvalidSampleRate(_))
        ));

        let precision = ConfigUpdate::from_json("{\"precision\": 400}").unwrap();
        assert_eq!(base.merged(&precision), Err(DspError::InvalidPrecision(400)));

        let retention = ConfigUpdate::from_json("{\"maxSamples\": 1152921504606846976}").unwrap();
        assert_eq!(base.merged(&retention), Err(DspError::InvalidRetention));
    }

    #[test]
    fn test_bpm_toggle() {
        let base = StreamConfig::default();
        let on = base
            .merged(&ConfigUpdate::from_json("{\"bpmEnabled\": true, \"signalCenter\": 2.5}").unwrap())
            .unwrap();
        assert_eq!(on.beat, Some(BeatConfig::default()));
        assert_eq!(on.signal_center, 2.5);

        let off = on
            .merged(&ConfigUpdate::from_json("{\"bpmEnabled\": false}").unwrap())
            .unwrap();
        assert_eq!(off.beat, None);
    }
}
