//! Sensor Spectrum - streaming DSP core for live sensor dashboards
//!
//! Turns a stream of timestamped amplitude samples into a band-limited signal
//! and raw/filtered magnitude spectra, one update per sample.

pub mod error;
pub mod filters;
pub mod spectrum;
pub mod stream;

pub use error::{DspError, Result};
pub use filters::{FilterConfig, FilterMode, FilterState};
pub use spectrum::{SpectrumResult, transform};
pub use stream::{Channel, Sample, StreamConfig, StreamProcessor, StreamUpdate};
