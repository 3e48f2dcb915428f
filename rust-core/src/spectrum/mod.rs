//! Frequency-domain analysis of designed filters

pub mod fft;
pub mod analysis;

pub use fft::FftEngine;
pub use analysis::{
    FreqzOptions, FrequencyGrid, FrequencyResponse, OutputForm, ResponseValues,
    freqz, phasez, grpdelay, impz, tf2zpk, isstable, isminphase,
};
