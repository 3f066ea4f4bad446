//! Beat-rate estimate from threshold crossings of the centred signal

use crate::error::{check_sample_rate, Result};
use crate::spectrum::analysis::round_to;

/// Beat detector settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatConfig {
    /// Rest level subtracted before thresholding (2.5 V for a 0–5 V sensor)
    pub center: f64,

    /// Level above which a chunk counts as a beat
    pub threshold: f64,

    /// Analyse at most the last `duration_secs` of the window
    pub duration_secs: f64,
}

impl Default for BeatConfig {
    fn default() -> Self {
        Self {
            center: 2.5,
            threshold: 0.1,
            duration_secs: 5.0,
        }
    }
}

/// Estimate beats per minute over the tail of `values`
///
/// The signal is cut into 10 ms chunks; a beat is a chunk whose peak rises
/// above the threshold after one that did not.
///
/// # Returns
/// Beats per minute rounded to two decimals, 0.0 for an empty window
pub fn estimate_bpm(values: &[f64], sample_rate_hz: f64, config: &BeatConfig) -> Result<f64> {
    check_sample_rate(sample_rate_hz)?;

    let step = ((sample_rate_hz / 100.0).round() as usize).max(1);
    let span_secs = config.duration_secs.min(values.len() as f64 / sample_rate_hz);
    let span = (span_secs * sample_rate_hz) as usize;
    if span < step {
        return Ok(0.0);
    }

    let tail = &values[values.len() - span..];
    let mut count = 0usize;
    let mut above = false;

    for chunk in tail.chunks(step).take(span / step) {
        let peak = chunk
            .iter()
            .map(|&x| x - config.center)
            .fold(0.0_f64, f64::max);

        if !above && peak > config.threshold {
            count += 1;
            above = true;
        } else if above && peak <= config.threshold {
            above = false;
        }
    }

    Ok(round_to(60.0 * count as f64 / span_secs, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Square pulses around 2.5 V: `beats` pulses in `secs` seconds
    fn pulse_train(sample_rate: f64, secs: f64, beats: usize) -> Vec<f64> {
        let len = (sample_rate * secs) as usize;
        let period = len / beats;
        (0..len)
            .map(|n| if n % period < period / 4 { 3.0 } else { 2.5 })
            .collect()
    }

    #[test]
    fn test_counts_pulses() {
        let signal = pulse_train(1000.0, 5.0, 5);
        let bpm = estimate_bpm(&signal, 1000.0, &BeatConfig::default()).unwrap();

        // 5 beats in 5 s
        assert!((bpm - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_uses_only_recent_tail() {
        let mut signal = pulse_train(1000.0, 5.0, 20);
        signal.extend(pulse_train(1000.0, 5.0, 10));
        let bpm = estimate_bpm(&signal, 1000.0, &BeatConfig::default()).unwrap();

        assert!((bpm - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_and_empty() {
        let config = BeatConfig::default();
        assert_eq!(estimate_bpm(&[2.5; 3000], 1000.0, &config).unwrap(), 0.0);
        assert_eq!(estimate_bpm(&[], 1000.0, &config).unwrap(), 0.0);
        assert!(estimate_bpm(&[1.0], -1.0, &config).is_err());
    }
}
