//! MATLAB-style argument handling
//!
//! Frequency arguments arrive either as a single cutoff or as a list of band
//! edges. They are resolved once into [`Frequency`] and the `ftype` / domain
//! strings into [`FilterType`] and [`Domain`] before any design code runs.

use crate::error::{Result, ValidationError};
use std::fmt;
use std::str::FromStr;

/// Cutoff frequency or band edges
#[derive(Debug, Clone, PartialEq)]
pub enum Frequency {
    Scalar(f64),
    Sequence(Vec<f64>),
}

impl Frequency {
    /// Build from a list of values. A single value becomes [`Frequency::Scalar`].
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match values {
            [] => Err(ValidationError::Empty("Wn")),
            [w] => Ok(Frequency::Scalar(*w)),
            _ => Ok(Frequency::Sequence(values.to_vec())),
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        match self {
            Frequency::Scalar(w) => std::slice::from_ref(w),
            Frequency::Sequence(v) => v,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<f64> for Frequency {
    fn from(w: f64) -> Self {
        Frequency::Scalar(w)
    }
}

impl TryFrom<Vec<f64>> for Frequency {
    type Error = ValidationError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        match values.len() {
            0 => Err(ValidationError::Empty("Wn")),
            1 => Ok(Frequency::Scalar(values[0])),
            _ => Ok(Frequency::Sequence(values)),
        }
    }
}

/// Band layout of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterType {
    Low,
    High,
    Bandpass,
    Stop,
    /// Multiband, first band is a stopband
    Dc0,
    /// Multiband, first band is a passband
    Dc1,
}

impl FilterType {
    /// MATLAB spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Low => "low",
            FilterType::High => "high",
            FilterType::Bandpass => "bandpass",
            FilterType::Stop => "stop",
            FilterType::Dc0 => "DC-0",
            FilterType::Dc1 => "DC-1",
        }
    }

    /// Whether the response passes DC (the first band is a passband)
    pub fn pass_zero(&self) -> bool {
        matches!(self, FilterType::Low | FilterType::Stop | FilterType::Dc1)
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" | "lowpass" => Ok(FilterType::Low),
            "high" | "highpass" => Ok(FilterType::High),
            "bandpass" => Ok(FilterType::Bandpass),
            "stop" | "bandstop" => Ok(FilterType::Stop),
            "DC-0" => Ok(FilterType::Dc0),
            "DC-1" => Ok(FilterType::Dc1),
            other => Err(ValidationError::UnknownFilterType(other.to_string())),
        }
    }
}

/// Parse an `ftype` argument. `'default'` yields `None`, leaving the choice
/// to [`resolve_fir_type`] / [`resolve_iir_type`].
pub fn parse_ftype(s: &str) -> Result<Option<FilterType>> {
    if s == "default" {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

fn incompatible(ftype: FilterType, wn: &Frequency) -> ValidationError {
    ValidationError::IncompatibleFilterType {
        ftype: ftype.to_string(),
        len: wn.len(),
    }
}

/// Resolve the band layout of an FIR design from the shape of `Wn`.
///
/// * scalar: `low` (default) or `high`
/// * two edges: `bandpass` (default), `stop`, `DC-0` or `DC-1`
/// * three or more: `DC-0` (default) or `DC-1`
pub fn resolve_fir_type(wn: &Frequency, ftype: Option<FilterType>) -> Result<FilterType> {
    use FilterType::*;

    match (wn.len(), ftype) {
        (0, _) => Err(ValidationError::Empty("Wn")),
        (1, None) => Ok(Low),
        (2, None) => Ok(Bandpass),
        (_, None) => Ok(Dc0),
        (1, Some(t @ (Low | High))) => Ok(t),
        (2, Some(t @ (Bandpass | Stop | Dc0 | Dc1))) => Ok(t),
        (n, Some(t @ (Dc0 | Dc1))) if n >= 3 => Ok(t),
        (_, Some(t)) => Err(incompatible(t, wn)),
    }
}

/// Resolve the band layout of an IIR design: `low`/`high` for a scalar,
/// `bandpass`/`stop` for a pair of edges.
pub fn resolve_iir_type(wn: &Frequency, ftype: Option<FilterType>) -> Result<FilterType> {
    use FilterType::*;

    match (wn.len(), ftype) {
        (0, _) => Err(ValidationError::Empty("Wn")),
        (1, None) => Ok(Low),
        (1, Some(t @ (Low | High))) => Ok(t),
        (2, None) => Ok(Bandpass),
        (2, Some(t @ (Bandpass | Stop))) => Ok(t),
        (_, Some(t)) => Err(incompatible(t, wn)),
        (n, None) => Err(ValidationError::LengthMismatch {
            name: "Wn",
            expected: 2,
            found: n,
        }),
    }
}

/// Digital (`'z'`) or analog (`'s'`) design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Domain {
    #[default]
    Digital,
    Analog,
}

impl Domain {
    pub fn is_analog(&self) -> bool {
        matches!(self, Domain::Analog)
    }

    /// Sample rate used to normalize frequencies: 2 (so that 1 is Nyquist)
    /// for digital designs, none for analog ones (rad/s).
    pub fn sample_rate(&self) -> Option<f64> {
        match self {
            Domain::Digital => Some(2.0),
            Domain::Analog => None,
        }
    }
}

impl FromStr for Domain {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "z" => Ok(Domain::Digital),
            "s" => Ok(Domain::Analog),
            other => Err(ValidationError::UnknownDomain(other.to_string())),
        }
    }
}

/// Check `0 <= w < 1` for every normalized digital frequency.
pub fn validate_digital(wn: &Frequency) -> Result<()> {
    for &w in wn.as_slice() {
        if !(w >= 0.0 && w < 1.0) {
            return Err(ValidationError::OutOfRange {
                name: "Wn",
                range: "0 <= Wn < 1",
                value: w,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_element_sequence_is_scalar() {
        assert_eq!(Frequency::from_slice(&[0.3]).unwrap(), Frequency::Scalar(0.3));
        assert_eq!(
            Frequency::try_from(vec![0.2, 0.4]).unwrap(),
            Frequency::Sequence(vec![0.2, 0.4])
        );
        assert!(Frequency::from_slice(&[]).is_err());
    }

    #[test]
    fn test_fir_defaults_follow_shape() {
        let scalar = Frequency::Scalar(0.3);
        let pair = Frequency::Sequence(vec![0.2, 0.4]);
        let multi = Frequency::Sequence(vec![0.1, 0.2, 0.3, 0.4]);

        assert_eq!(resolve_fir_type(&scalar, None).unwrap(), FilterType::Low);
        assert_eq!(resolve_fir_type(&pair, None).unwrap(), FilterType::Bandpass);
        assert_eq!(resolve_fir_type(&multi, None).unwrap(), FilterType::Dc0);

        assert_eq!(
            resolve_fir_type(&scalar, Some(FilterType::High)).unwrap(),
            FilterType::High
        );
        assert_eq!(
            resolve_fir_type(&pair, Some(FilterType::Dc1)).unwrap(),
            FilterType::Dc1
        );
    }

    #[test]
    fn test_incompatible_types_rejected() {
        let scalar = Frequency::Scalar(0.3);
        let multi = Frequency::Sequence(vec![0.1, 0.2, 0.3]);

        assert!(resolve_fir_type(&scalar, Some(FilterType::Stop)).is_err());
        assert!(resolve_fir_type(&multi, Some(FilterType::Bandpass)).is_err());
        assert!(resolve_iir_type(&multi, None).is_err());
        assert!(resolve_iir_type(&Frequency::Sequence(vec![0.1, 0.2]), Some(FilterType::Dc0)).is_err());
    }

    #[test]
    fn test_parse_strings() {
        assert_eq!(parse_ftype("default").unwrap(), None);
        assert_eq!(parse_ftype("DC-1").unwrap(), Some(FilterType::Dc1));
        assert_eq!(parse_ftype("stop").unwrap(), Some(FilterType::Stop));
        assert!(parse_ftype("band").is_err());

        assert_eq!("z".parse::<Domain>().unwrap(), Domain::Digital);
        assert_eq!("s".parse::<Domain>().unwrap().sample_rate(), None);
        assert!("d".parse::<Domain>().is_err());
    }

    #[test]
    fn test_pass_zero_mapping() {
        assert!(FilterType::Low.pass_zero());
        assert!(FilterType::Stop.pass_zero());
        assert!(FilterType::Dc1.pass_zero());
        assert!(!FilterType::High.pass_zero());
        assert!(!FilterType::Bandpass.pass_zero());
        assert!(!FilterType::Dc0.pass_zero());
    }

    #[test]
    fn test_digital_range() {
        assert!(validate_digital(&Frequency::Scalar(0.0)).is_ok());
        assert!(validate_digital(&Frequency::Scalar(0.5)).is_ok());
        assert!(validate_digital(&Frequency::Sequence(vec![0.2, 0.99])).is_ok());
        assert!(validate_digital(&Frequency::Scalar(1.0)).is_err());
        assert!(validate_digital(&Frequency::Sequence(vec![-0.1, 0.5])).is_err());
    }
}
