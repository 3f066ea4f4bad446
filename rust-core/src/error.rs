//! Validation errors shared by the filter, spectrum and streaming layers

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    #[error("Sample rate must be positive and finite (found: {0} Hz)")]
    InvalidSampleRate(f64),

    #[error("Cutoff {cutoff_hz} Hz must lie strictly between 0 and the Nyquist frequency {nyquist_hz} Hz")]
    CutoffOutOfRange { cutoff_hz: f64, nyquist_hz: f64 },

    #[error("Low cutoff {low_hz} Hz must be below high cutoff {high_hz} Hz")]
    InvertedBand { low_hz: f64, high_hz: f64 },

    #[error("Filter order must be at least 1")]
    InvalidOrder,

    #[error("Frequency range [{min_hz}, {max_hz}] Hz is empty or negative")]
    InvalidRange { min_hz: f64, max_hz: f64 },

    #[error("Retention policy must keep between 1 and 1048576 samples with a non-negative age bound")]
    InvalidRetention,

    #[error("Precision of {0} decimal places exceeds the 15 an f64 can hold")]
    InvalidPrecision(u32),

    #[error("Pending sample queue must hold at least one sample")]
    InvalidQueueCapacity,

    #[error("Spectrum interval must be at least 1 sample")]
    InvalidInterval,

    #[error("Malformed configuration payload: {0}")]
    MalformedConfig(String),

    #[error("Stream state is unavailable after a worker panic")]
    StatePoisoned,
}

pub type Result<T> = std::result::Result<T, DspError>;

/// Rejects zero, negative and non-finite sample rates
pub(crate) fn check_sample_rate(sample_rate_hz: f64) -> Result<()> {
    if sample_rate_hz.is_finite() && sample_rate_hz > 0.0 {
        Ok(())
    } else {
        Err(DspError::InvalidSampleRate(sample_rate_hz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rate_check() {
        assert!(check_sample_rate(100.0).is_ok());
        assert_eq!(check_sample_rate(-1.0), Err(DspError::InvalidSampleRate(-1.0)));
        assert!(check_sample_rate(0.0).is_err());
        assert!(check_sample_rate(f64::NAN).is_err());
    }
}
