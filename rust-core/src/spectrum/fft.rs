//! Radix-2 decimation-in-time FFT for real-valued sample windows
//!
//! Recursive even/odd split with a precomputed twiddle table, O(N log N).

use num_complex::Complex64;
use std::f64::consts::PI;

/// Smallest power of two that can hold `len` samples (1 for an empty signal)
pub fn padded_len(len: usize) -> usize {
    len.max(1).next_power_of_two()
}

/// FFT engine for one transform size
pub struct FftEngine {
    /// Transform size N (power of two)
    fft_size: usize,

    /// Twiddle factors e^{-2πik/N} for k = 0..N/2
    twiddles: Vec<Complex64>,
}

impl FftEngine {
    /// Create an engine for the given size
    ///
    /// # Arguments
    /// * `fft_size` - Requested size, rounded up to the next power of two
    pub fn new(fft_size: usize) -> Self {
        let fft_size = padded_len(fft_size);
        let twiddles = (0..fft_size / 2)
            .map(|k| Complex64::from_polar(1.0, -2.0 * PI * k as f64 / fft_size as f64))
            .collect();

        Self { fft_size, twiddles }
    }

    /// Complex spectrum X[k] for k = 0..N
    ///
    /// # Arguments
    /// * `signal` - Input samples; zero-padded up to N, truncated if longer
    pub fn compute(&self, signal: &[f64]) -> Vec<Complex64> {
        let mut output = vec![Complex64::new(0.0, 0.0); self.fft_size];
        self.radix2(signal, 0, 1, &mut output);
        output
    }

    /// Magnitude spectrum |X[k]| for all N bins
    pub fn compute_magnitude(&self, signal: &[f64]) -> Vec<f64> {
        self.compute(signal).iter().map(|c| c.norm()).collect()
    }

    /// Transform the sub-sequence `signal[offset + j*stride]` into `out`.
    ///
    /// Even-indexed half lands in `out[..n/2]`, odd half in `out[n/2..]`,
    /// then the butterfly combines them in place.
    fn radix2(&self, signal: &[f64], offset: usize, stride: usize, out: &mut [Complex64]) {
        let n = out.len();
        if n == 1 {
            let value = signal.get(offset).copied().unwrap_or(0.0);
            out[0] = Complex64::new(value, 0.0);
            return;
        }

        let half = n / 2;
        {
            let (even, odd) = out.split_at_mut(half);
            self.radix2(signal, offset, stride * 2, even);
            self.radix2(signal, offset + stride, stride * 2, odd);
        }

        // Twiddle for sub-size n at index k is the top-level factor at k * N/n
        let step = self.fft_size / n;
        for k in 0..half {
            let t = self.twiddles[k * step] * out[k + half];
            let e = out[k];
            out[k] = e + t;
            out[k + half] = e - t;
        }
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Frequency of bin `bin` in Hz
    pub fn bin_to_frequency(&self, bin: usize, sample_rate: f64) -> f64 {
        bin as f64 * sample_rate / self.fft_size as f64
    }

    /// Frequency axis in Hz, one entry per bin
    pub fn frequency_axis(&self, sample_rate: f64) -> Vec<f64> {
        (0..self.fft_size)
            .map(|bin| self.bin_to_frequency(bin, sample_rate))
            .collect()
    }
}
