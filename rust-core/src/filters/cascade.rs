//! Filter stages and band cascades used by the streaming orchestrator

use super::design::FilterConfig;
use super::iir::{high_pass, low_pass, FilterState};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Response selected by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterMode {
    /// Low-pass at the high cutoff
    Lowpass,
    /// High-pass at the low cutoff
    Highpass,
    /// High-pass at the low cutoff, then low-pass at the high cutoff
    #[default]
    Bandpass,
    /// Low-pass at the low cutoff, then high-pass at the high cutoff
    Bandstop,
}

/// Per-sample filter stage with persistent state
pub trait IirStage {
    fn process_sample(&mut self, input: f64) -> f64;

    /// Process a block in-place, carrying state across the block boundary
    fn process_block_inplace(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    fn reset(&mut self);

    /// Re-derive coefficients from `config` and cold-start
    fn reconfigure(&mut self, config: &FilterConfig) -> Result<()>;
}

/// Single low-pass or high-pass stage
#[derive(Debug, Clone)]
pub struct OnePole {
    mode: FilterMode,
    state: FilterState,
}

impl OnePole {
    pub fn low_pass(config: &FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mode: FilterMode::Lowpass,
            state: FilterState::new(config.high_alpha()?),
        })
    }

    pub fn high_pass(config: &FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mode: FilterMode::Highpass,
            state: FilterState::new(config.low_alpha()?),
        })
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }
}

impl IirStage for OnePole {
    #[inline]
    fn process_sample(&mut self, input: f64) -> f64 {
        match self.mode {
            FilterMode::Highpass => high_pass(input, &mut self.state),
            _ => low_pass(input, &mut self.state),
        }
    }

    fn reset(&mut self) {
        self.state.reset();
    }

    fn reconfigure(&mut self, config: &FilterConfig) -> Result<()> {
        config.validate()?;
        let alpha = match self.mode {
            FilterMode::Highpass => config.low_alpha()?,
            _ => config.high_alpha()?,
        };
        self.state.reconfigure(alpha);
        Ok(())
    }
}

/// Two single-pole stages in series
#[derive(Debug, Clone)]
pub struct Cascade {
    mode: FilterMode,
    first: FilterState,
    second: FilterState,
}

impl Cascade {
    /// High-pass at the low cutoff feeding low-pass at the high cutoff
    pub fn band_pass(config: &FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mode: FilterMode::Bandpass,
            first: FilterState::new(config.low_alpha()?),
            second: FilterState::new(config.high_alpha()?),
        })
    }

    /// Low-pass at the low cutoff feeding high-pass at the high cutoff
    pub fn band_stop(config: &FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mode: FilterMode::Bandstop,
            first: FilterState::new(config.low_alpha()?),
            second: FilterState::new(config.high_alpha()?),
        })
    }

    pub fn states(&self) -> (&FilterState, &FilterState) {
        (&self.first, &self.second)
    }
}

impl IirStage for Cascade {
    #[inline]
    fn process_sample(&mut self, input: f64) -> f64 {
        match self.mode {
            FilterMode::Bandstop => {
                let low = low_pass(input, &mut self.first);
                high_pass(low, &mut self.second)
            }
            _ => {
                let high = high_pass(input, &mut self.first);
                low_pass(high, &mut self.second)
            }
        }
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }

    fn reconfigure(&mut self, config: &FilterConfig) -> Result<()> {
        config.validate()?;
        let (first, second) = (config.low_alpha()?, config.high_alpha()?);
        self.first.reconfigure(first);
        self.second.reconfigure(second);
        Ok(())
    }
}

/// Build the stage for `mode`
pub fn build_stage(mode: FilterMode, config: &FilterConfig) -> Result<Box<dyn IirStage + Send>> {
    let stage: Box<dyn IirStage + Send> = match mode {
        FilterMode::Lowpass => Box::new(OnePole::low_pass(config)?),
        FilterMode::Highpass => Box::new(OnePole::high_pass(config)?),
        FilterMode::Bandpass => Box::new(Cascade::band_pass(config)?),
        FilterMode::Bandstop => Box::new(Cascade::band_stop(config)?),
    };
    Ok(stage)
}

/// Band-pass a single sample through caller-owned cascade state
#[inline]
pub fn band_pass(input: f64, high_pass_state: &mut FilterState, low_pass_state: &mut FilterState) -> f64 {
    low_pass(high_pass(input, high_pass_state), low_pass_state)
}

/// Band-stop a single sample through caller-owned cascade state
#[inline]
pub fn band_stop(input: f64, low_pass_state: &mut FilterState, high_pass_state: &mut FilterState) -> f64 {
    high_pass(low_pass(input, low_pass_state), high_pass_state)
}
