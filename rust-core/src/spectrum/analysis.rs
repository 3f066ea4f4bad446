//! High-level spectrum analyzer
//!
//! Wraps the FFT engine with sample-rate scaling, optional frequency-range
//! restriction and optional rounding for display.

use super::fft::{padded_len, FftEngine};
use crate::error::{check_sample_rate, DspError, Result};
use serde::{Deserialize, Serialize};

/// Inclusive frequency band in Hz used to restrict a spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyRange {
    pub min_hz: f64,
    pub max_hz: f64,
}

impl FrequencyRange {
    pub fn new(min_hz: f64, max_hz: f64) -> Result<Self> {
        let range = Self { min_hz, max_hz };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_hz.is_finite() && self.max_hz.is_finite() && self.min_hz >= 0.0 && self.min_hz <= self.max_hz {
            Ok(())
        } else {
            Err(DspError::InvalidRange {
                min_hz: self.min_hz,
                max_hz: self.max_hz,
            })
        }
    }

    pub fn contains(&self, frequency_hz: f64) -> bool {
        frequency_hz >= self.min_hz && frequency_hz <= self.max_hz
    }
}

impl Default for FrequencyRange {
    fn default() -> Self {
        Self {
            min_hz: 20.0,
            max_hz: 20000.0,
        }
    }
}

/// Magnitude spectrum with its frequency axis; `frequencies[i]` pairs with `magnitudes[i]`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpectrumResult {
    pub frequencies: Vec<f64>,
    pub magnitudes: Vec<f64>,
}

impl SpectrumResult {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Drop every bin outside `range`, keeping the pairs aligned
    pub fn restrict(self, range: &FrequencyRange) -> Self {
        let (frequencies, magnitudes) = self
            .frequencies
            .into_iter()
            .zip(self.magnitudes)
            .filter(|(freq, _)| range.contains(*freq))
            .unzip();

        Self {
            frequencies,
            magnitudes,
        }
    }

    /// Round both axes to `places` decimal places
    pub fn rounded(mut self, places: u32) -> Self {
        for f in self.frequencies.iter_mut() {
            *f = round_to(*f, places);
        }
        for m in self.magnitudes.iter_mut() {
            *m = round_to(*m, places);
        }
        self
    }

    /// (frequency, magnitude) of the strongest bin
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.frequencies
            .iter()
            .zip(self.magnitudes.iter())
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(&f, &m)| (f, m))
    }
}

/// Most decimal places an f64 magnitude can meaningfully carry
pub const MAX_PRECISION: u32 = 15;

/// Round `value` to `places` decimal places
///
/// Values are returned unchanged beyond [`MAX_PRECISION`] places.
pub fn round_to(value: f64, places: u32) -> f64 {
    if places > MAX_PRECISION {
        return value;
    }
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}

/// Transform a real signal into its full N-bin magnitude spectrum
///
/// # Arguments
/// * `signal` - Input samples (zero-padded to the next power of two)
/// * `sample_rate_hz` - Sample rate used to label the bins
pub fn transform(signal: &[f64], sample_rate_hz: f64) -> Result<SpectrumResult> {
    check_sample_rate(sample_rate_hz)?;

    let engine = FftEngine::new(padded_len(signal.len()));
    Ok(SpectrumResult {
        frequencies: engine.frequency_axis(sample_rate_hz),
        magnitudes: engine.compute_magnitude(signal),
    })
}

/// Same as [`transform`], keeping only bins inside `range`
pub fn transform_in_range(
    signal: &[f64],
    sample_rate_hz: f64,
    range: &FrequencyRange,
) -> Result<SpectrumResult> {
    range.validate()?;
    Ok(transform(signal, sample_rate_hz)?.restrict(range))
}

/// Spectrum analyzer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Sample rate in Hz
    pub sample_rate_hz: f64,

    /// Restrict output bins to this band when set
    pub range: Option<FrequencyRange>,

    /// Round output to this many decimal places when set
    pub precision: Option<u32>,
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<()> {
        check_sample_rate(self.sample_rate_hz)?;
        if let Some(range) = &self.range {
            range.validate()?;
        }
        match self.precision {
            Some(places) if places > MAX_PRECISION => Err(DspError::InvalidPrecision(places)),
            _ => Ok(()),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100.0,
            range: None,
            precision: None,
        }
    }
}

/// Streaming spectrum analyzer; reuses its FFT engine while the padded size is stable
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    fft_engine: FftEngine,
}

impl SpectrumAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fft_engine: FftEngine::new(1),
        })
    }

    /// Analyze a window of samples
    pub fn analyze(&mut self, signal: &[f64]) -> SpectrumResult {
        let fft_size = padded_len(signal.len());
        if fft_size != self.fft_engine.fft_size() {
            self.fft_engine = FftEngine::new(fft_size);
        }

        let mut spectrum = SpectrumResult {
            frequencies: self.fft_engine.frequency_axis(self.config.sample_rate_hz),
            magnitudes: self.fft_engine.compute_magnitude(signal),
        };

        if let Some(range) = &self.config.range {
            spectrum = spectrum.restrict(range);
        }
        if let Some(places) = self.config.precision {
            spectrum = spectrum.rounded(places);
        }

        spectrum
    }

    /// Update configuration; rejected configs leave the analyzer unchanged
    pub fn update_config(&mut self, config: AnalyzerConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}
