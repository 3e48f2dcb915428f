//! Validation errors shared by every design and analysis function

use thiserror::Error;

/// Rejected input. Every public function validates eagerly and returns one of
/// these before doing any numerical work.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("the length of 'f' must be 2*len(a)-2 = {expected} (found: {found})")]
    BandLengthMismatch { expected: usize, found: usize },

    #[error("at least two bands are required (found: {0})")]
    TooFewBands(usize),

    #[error("pass and stop bands in 'a' must be strictly alternating")]
    NonAlternatingAmplitudes,

    #[error("'dev' must have 1 or {bands} elements (found: {found})")]
    DeviationLengthMismatch { bands: usize, found: usize },

    #[error("'dev' must be larger than 0 (found: {0})")]
    NonPositiveDeviation(f64),

    #[error("{name} must satisfy {range} (found: {value})")]
    OutOfRange {
        name: &'static str,
        range: &'static str,
        value: f64,
    },

    #[error("{0} must be strictly increasing")]
    NotIncreasing(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{name} must have {expected} elements (found: {found})")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unknown filter type '{0}'; expected 'default', 'low', 'high', 'bandpass', 'stop', 'DC-0' or 'DC-1'")]
    UnknownFilterType(String),

    #[error("filter type '{ftype}' cannot be used with {len} frequency value(s)")]
    IncompatibleFilterType { ftype: String, len: usize },

    #[error("unknown domain flag '{0}'; expected 'z' or 's'")]
    UnknownDomain(String),

    #[error("unknown window '{0}'")]
    UnknownWindow(String),

    #[error("unknown output form '{0}'; expected 'complex', 'abs' or 'dB'")]
    UnknownOutputForm(String),

    #[error("the leading coefficient of the polynomial must be nonzero")]
    ZeroLeadingCoefficient,

    #[error("invalid {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    #[error("an even number of taps ({0}) cannot have a passband at the Nyquist frequency")]
    NyquistPassband(usize),

    #[error("the least-squares design system is singular")]
    SingularSystem,

    #[error("{0} did not converge")]
    NoConvergence(&'static str),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
