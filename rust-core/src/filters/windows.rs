//! Symmetric window functions for windowed-sinc FIR design

use crate::error::{Result, ValidationError};
use std::f64::consts::PI;
use std::str::FromStr;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowType {
    /// Rectangular window (no windowing)
    Rectangular,

    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    Blackman,

    /// Kaiser window with shape parameter β
    Kaiser(f64),
}

impl Default for WindowType {
    fn default() -> Self {
        WindowType::Hamming
    }
}

impl FromStr for WindowType {
    type Err = ValidationError;

    /// Parse a window name. Kaiser needs a β and cannot be named alone.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "boxcar" | "rect" | "rectangular" | "ones" => Ok(WindowType::Rectangular),
            "hann" | "hanning" => Ok(WindowType::Hann),
            "hamming" => Ok(WindowType::Hamming),
            "blackman" => Ok(WindowType::Blackman),
            _ => Err(ValidationError::UnknownWindow(s.to_string())),
        }
    }
}

/// Zeroth-order modified Bessel function of the first kind
///
/// Power series `Σ ((x/2)^k / k!)²`, summed until the terms stop contributing.
pub fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;

    loop {
        term *= (half / k) * (half / k);
        sum += term;
        if term < sum * 1e-17 {
            break;
        }
        k += 1.0;
    }

    sum
}

/// Generate symmetric window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    if length == 0 {
        return Vec::new();
    }
    if length == 1 {
        return vec![1.0];
    }

    let m = (length - 1) as f64;

    match window_type {
        WindowType::Rectangular => vec![1.0; length],

        WindowType::Hann => (0..length)
            .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f64 / m).cos())
            .collect(),

        WindowType::Hamming => (0..length)
            .map(|n| 0.54 - 0.46 * (2.0 * PI * n as f64 / m).cos())
            .collect(),

        WindowType::Blackman => (0..length)
            .map(|n| {
                let angle = 2.0 * PI * n as f64 / m;
                0.42 - 0.5 * angle.cos() + 0.08 * (2.0 * angle).cos()
            })
            .collect(),

        WindowType::Kaiser(beta) => {
            let denom = bessel_i0(beta);
            (0..length)
                .map(|n| {
                    let r = 2.0 * n as f64 / m - 1.0;
                    bessel_i0(beta * (1.0 - r * r).max(0.0).sqrt()) / denom
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_generation() {
        let length = 161;

        for window_type in [
            WindowType::Hann,
            WindowType::Hamming,
            WindowType::Blackman,
            WindowType::Kaiser(5.0),
        ] {
            let w = generate_window(window_type, length);
            assert_eq!(w.len(), length);

            // Symmetric, peak of 1 at the centre
            for n in 0..length {
                assert!((w[n] - w[length - 1 - n]).abs() < 1e-12);
            }
            assert!((w[length / 2] - 1.0).abs() < 1e-10);
        }

        let hamming = generate_window(WindowType::Hamming, length);
        assert!((hamming[0] - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_short_lengths() {
        assert!(generate_window(WindowType::Hann, 0).is_empty());
        assert_eq!(generate_window(WindowType::Blackman, 1), vec![1.0]);

        let hamming = generate_window(WindowType::Hamming, 3);
        assert!((hamming[0] - 0.08).abs() < 1e-12);
        assert!((hamming[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rectangular_window() {
        let window = generate_window(WindowType::Rectangular, 100);
        assert_eq!(window.len(), 100);
        assert!(window.iter().all(|&w| w == 1.0));
    }

    #[test]
    fn test_kaiser_zero_beta_is_rectangular() {
        let w = generate_window(WindowType::Kaiser(0.0), 11);
        assert!(w.iter().all(|&v| (v - 1.0).abs() < 1e-15));
    }

    #[test]
    fn test_bessel_i0() {
        assert_eq!(bessel_i0(0.0), 1.0);
        // Reference values of I0
        assert!((bessel_i0(1.0) - 1.2660658777520082).abs() < 1e-14);
        assert!((bessel_i0(5.0) - 27.239871823604442).abs() < 1e-11);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("hanning".parse::<WindowType>().unwrap(), WindowType::Hann);
        assert_eq!("Hamming".parse::<WindowType>().unwrap(), WindowType::Hamming);
        assert_eq!("boxcar".parse::<WindowType>().unwrap(), WindowType::Rectangular);
        assert!("kaiser".parse::<WindowType>().is_err());
        assert_eq!(WindowType::default(), WindowType::Hamming);
    }
}
