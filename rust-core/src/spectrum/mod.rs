//! Spectral analysis with a radix-2 FFT

pub mod fft;
pub mod analysis;

pub use fft::{FftEngine, padded_len};
pub use analysis::{
    AnalyzerConfig, FrequencyRange, MAX_PRECISION, SpectrumAnalyzer, SpectrumResult, transform,
    transform_in_range,
};
