//! First-order IIR coefficient design
//!
//! Single-pole bilinear design: one `alpha` per cutoff.

use crate::error::{check_sample_rate, DspError, Result};
use std::f64::consts::FRAC_PI_2;

/// Filter specification supplied by the client
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Lower band edge in Hz (high-pass stage cutoff)
    pub low_cutoff_hz: f64,

    /// Upper band edge in Hz (low-pass stage cutoff)
    pub high_cutoff_hz: f64,

    /// Sample rate in Hz
    pub sample_rate_hz: f64,

    /// Accepted for compatibility; every stage is single-pole
    pub order: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            low_cutoff_hz: 1.0,
            high_cutoff_hz: 4000.0,
            sample_rate_hz: 44100.0,
            order: 2,
        }
    }
}

impl FilterConfig {
    pub fn nyquist(&self) -> f64 {
        self.sample_rate_hz / 2.0
    }

    /// Check rate, order, both cutoffs against Nyquist and band ordering
    pub fn validate(&self) -> Result<()> {
        check_sample_rate(self.sample_rate_hz)?;
        if self.order == 0 {
            return Err(DspError::InvalidOrder);
        }
        check_cutoff(self.low_cutoff_hz, self.sample_rate_hz)?;
        check_cutoff(self.high_cutoff_hz, self.sample_rate_hz)?;
        if self.low_cutoff_hz >= self.high_cutoff_hz {
            return Err(DspError::InvertedBand {
                low_hz: self.low_cutoff_hz,
                high_hz: self.high_cutoff_hz,
            });
        }
        Ok(())
    }

    /// Coerce both cutoffs into `[1, nyquist - 1]` Hz.
    ///
    /// Falls back to the widest band when the edges end up inverted. The
    /// sample rate is left untouched and must still be valid.
    pub fn clamped(&self) -> Self {
        let upper = (self.nyquist() - 1.0).max(1.0);
        let low = self.low_cutoff_hz.clamp(1.0, upper);
        let high = self.high_cutoff_hz.clamp(1.0, upper);

        let (low_cutoff_hz, high_cutoff_hz) = if low < high { (low, high) } else { (1.0, upper) };

        Self {
            low_cutoff_hz,
            high_cutoff_hz,
            order: self.order.max(1),
            ..*self
        }
    }

    /// Coefficient of the high-pass stage (low band edge)
    pub fn low_alpha(&self) -> Result<f64> {
        compute_alpha(self.low_cutoff_hz, self.sample_rate_hz)
    }

    /// Coefficient of the low-pass stage (high band edge)
    pub fn high_alpha(&self) -> Result<f64> {
        compute_alpha(self.high_cutoff_hz, self.sample_rate_hz)
    }
}

fn check_cutoff(cutoff_hz: f64, sample_rate_hz: f64) -> Result<()> {
    let nyquist_hz = sample_rate_hz / 2.0;
    if cutoff_hz.is_finite() && cutoff_hz > 0.0 && cutoff_hz < nyquist_hz {
        Ok(())
    } else {
        Err(DspError::CutoffOutOfRange {
            cutoff_hz,
            nyquist_hz,
        })
    }
}

/// Derive the single-pole coefficient for a cutoff
///
/// # Algorithm
/// 1. normalized = cutoff / nyquist (0..1)
/// 2. wc = tan(π/2 · normalized), the bilinear pre-warp of the cutoff
/// 3. alpha = wc / (1 + wc), in (0, 1) and tending to 1 at Nyquist
///
/// # Note
/// The pre-warp uses π/2 rather than π. With tan(π · normalized) the warped
/// cutoff turns negative above fs/4 and falls back to 0 at Nyquist.
///
/// # Arguments
/// * `cutoff_hz` - Cutoff frequency, strictly between 0 and Nyquist
/// * `sample_rate_hz` - Sample rate in Hz
pub fn compute_alpha(cutoff_hz: f64, sample_rate_hz: f64) -> Result<f64> {
    check_sample_rate(sample_rate_hz)?;
    check_cutoff(cutoff_hz, sample_rate_hz)?;

    let nyquist = sample_rate_hz / 2.0;
    let normalized_cutoff = cutoff_hz / nyquist;
    let wc = (FRAC_PI_2 * normalized_cutoff).tan();

    Ok(wc / (1.0 + wc))
}
