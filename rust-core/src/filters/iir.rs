//! Streaming single-pole filters with explicit state
//!
//! One sample in, one sample out. The caller owns the [`FilterState`] and
//! carries it across calls; nothing is recomputed from history.

use super::design::compute_alpha;
use crate::error::Result;

/// Delay-line state and coefficient of one filter stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterState {
    /// x[n-1]
    pub prev_input: f64,

    /// y[n-1]
    pub prev_output: f64,

    pub alpha: f64,
}

impl FilterState {
    /// Cold state with a fixed coefficient
    pub fn new(alpha: f64) -> Self {
        Self {
            prev_input: 0.0,
            prev_output: 0.0,
            alpha,
        }
    }

    /// Cold state designed for `cutoff_hz`
    pub fn for_cutoff(cutoff_hz: f64, sample_rate_hz: f64) -> Result<Self> {
        Ok(Self::new(compute_alpha(cutoff_hz, sample_rate_hz)?))
    }

    /// Clear the delay line
    pub fn reset(&mut self) {
        self.prev_input = 0.0;
        self.prev_output = 0.0;
    }

    /// Swap in a new coefficient and cold-start
    pub fn reconfigure(&mut self, alpha: f64) {
        self.alpha = alpha;
        self.reset();
    }

    #[inline]
    fn advance(&mut self, input: f64, output: f64) -> f64 {
        self.prev_input = input;
        self.prev_output = output;
        output
    }
}

/// y[n] = α(x[n] + x[n-1]) − α·y[n-1]
#[inline]
pub fn low_pass(input: f64, state: &mut FilterState) -> f64 {
    let output = state.alpha * (input + state.prev_input) - state.alpha * state.prev_output;
    state.advance(input, output)
}

/// y[n] = α(x[n] − x[n-1]) + α·y[n-1]
#[inline]
pub fn high_pass(input: f64, state: &mut FilterState) -> f64 {
    let output = state.alpha * (input - state.prev_input) + state.alpha * state.prev_output;
    state.advance(input, output)
}

/// Low-pass a whole signal from a cold start
pub fn low_pass_filter(signal: &[f64], cutoff_hz: f64, sample_rate_hz: f64) -> Result<Vec<f64>> {
    let mut state = FilterState::for_cutoff(cutoff_hz, sample_rate_hz)?;
    Ok(signal.iter().map(|&x| low_pass(x, &mut state)).collect())
}

/// High-pass a whole signal from a cold start
pub fn high_pass_filter(signal: &[f64], cutoff_hz: f64, sample_rate_hz: f64) -> Result<Vec<f64>> {
    let mut state = FilterState::for_cutoff(cutoff_hz, sample_rate_hz)?;
    Ok(signal.iter().map(|&x| high_pass(x, &mut state)).collect())
}
