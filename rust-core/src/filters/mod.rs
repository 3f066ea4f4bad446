//! First-order recursive filters and their band cascades

pub mod design;
pub mod iir;
pub mod cascade;

pub use design::{FilterConfig, compute_alpha};
pub use iir::{FilterState, low_pass, high_pass, low_pass_filter, high_pass_filter};
pub use cascade::{Cascade, FilterMode, IirStage, OnePole, band_pass, band_stop, build_stage};
