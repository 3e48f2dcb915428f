//! Filter analysis: frequency, phase and impulse response, group delay,
//! pole/zero factorization and stability checks

use super::fft::FftEngine;
use crate::error::{Result, ValidationError};
use crate::filters::iir::Zpk;
use crate::filters::lfilter::lfilter;
use crate::polynomial::{conv, roots};
use num_complex::Complex64;
use std::f64::consts::PI;
use std::str::FromStr;

/// Default tolerance for stability and minimum-phase checks: `eps^(2/3)`
pub fn default_tolerance() -> f64 {
    f64::EPSILON.powf(2.0 / 3.0)
}

/// Where to evaluate a response
#[derive(Debug, Clone, PartialEq)]
pub enum FrequencyGrid {
    /// Evenly spaced points over the upper half (or the whole) unit circle
    Points(usize),

    /// Explicit frequencies, in the units of `fs`
    Frequencies(Vec<f64>),
}

/// Frequency grid configuration shared by `freqz`, `phasez` and `grpdelay`
#[derive(Debug, Clone, PartialEq)]
pub struct FreqzOptions {
    pub grid: FrequencyGrid,

    /// Sample rate; returned frequencies run from 0 to `fs/2` (or `fs`)
    pub fs: f64,

    /// Cover the whole unit circle instead of the upper half
    pub whole: bool,
}

impl Default for FreqzOptions {
    fn default() -> Self {
        Self {
            grid: FrequencyGrid::Points(512),
            fs: 2.0 * PI,
            whole: false,
        }
    }
}

impl FreqzOptions {
    pub fn points(n: usize) -> Self {
        Self {
            grid: FrequencyGrid::Points(n),
            ..Self::default()
        }
    }

    pub fn with_fs(mut self, fs: f64) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_whole(mut self, whole: bool) -> Self {
        self.whole = whole;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.fs > 0.0) {
            return Err(ValidationError::OutOfRange {
                name: "fs",
                range: "fs > 0",
                value: self.fs,
            });
        }
        match &self.grid {
            FrequencyGrid::Points(0) => Err(ValidationError::InvalidParameter {
                name: "worN",
                reason: "at least one frequency point is required".into(),
            }),
            FrequencyGrid::Frequencies(w) if w.is_empty() => Err(ValidationError::Empty("w")),
            _ => Ok(()),
        }
    }

    /// Angular frequencies (rad/sample) and the same points in `fs` units
    fn grid(&self) -> (Vec<f64>, Vec<f64>) {
        let to_fs = self.fs / (2.0 * PI);
        match &self.grid {
            FrequencyGrid::Points(n) => {
                let span = if self.whole { 2.0 * PI } else { PI };
                let rad: Vec<f64> = (0..*n).map(|k| span * k as f64 / *n as f64).collect();
                let w = rad.iter().map(|&x| x * to_fs).collect();
                (rad, w)
            }
            FrequencyGrid::Frequencies(w) => {
                let rad = w.iter().map(|&x| x / to_fs).collect();
                (rad, w.clone())
            }
        }
    }
}

/// MATLAB `outform` for `freqz`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputForm {
    #[default]
    Complex,
    Abs,
    Db,
}

impl FromStr for OutputForm {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "complex" => Ok(OutputForm::Complex),
            "abs" => Ok(OutputForm::Abs),
            "dB" => Ok(OutputForm::Db),
            other => Err(ValidationError::UnknownOutputForm(other.to_string())),
        }
    }
}

/// Response values in the requested form
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValues {
    Complex(Vec<Complex64>),
    Real(Vec<f64>),
}

/// Sampled frequency response
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyResponse {
    /// Frequencies in the units of `fs`
    pub w: Vec<f64>,

    /// Complex response H(e^jω)
    pub h: Vec<Complex64>,
}

impl FrequencyResponse {
    pub fn magnitude(&self) -> Vec<f64> {
        self.h.iter().map(|c| c.norm()).collect()
    }

    /// 20·log10|H|; zeros of the response map to -inf
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.h.iter().map(|c| 20.0 * c.norm().log10()).collect()
    }

    /// Unwrapped phase in radians
    pub fn phase(&self) -> Vec<f64> {
        let wrapped: Vec<f64> = self.h.iter().map(|c| c.arg()).collect();
        unwrap_phase(&wrapped)
    }

    pub fn values(&self, form: OutputForm) -> ResponseValues {
        match form {
            OutputForm::Complex => ResponseValues::Complex(self.h.clone()),
            OutputForm::Abs => ResponseValues::Real(self.magnitude()),
            OutputForm::Db => ResponseValues::Real(self.magnitude_db()),
        }
    }
}

/// Remove 2π jumps between consecutive phase samples
pub fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(phase.len());
    let mut offset = 0.0;

    for (i, &p) in phase.iter().enumerate() {
        if i > 0 {
            let d = p - phase[i - 1];
            let mut wrapped = (d + PI).rem_euclid(2.0 * PI) - PI;
            if wrapped == -PI && d > 0.0 {
                wrapped = PI;
            }
            if d.abs() >= PI {
                offset += wrapped - d;
            }
        }
        out.push(p + offset);
    }

    out
}

/// Evaluate `B(e^jω) / A(e^jω)` directly at angular frequencies (rad/sample)
pub fn response_at(b: &[f64], a: &[f64], omegas: &[f64]) -> Vec<Complex64> {
    let eval = |coeffs: &[f64], omega: f64| {
        coeffs
            .iter()
            .enumerate()
            .map(|(n, &c)| c * Complex64::from_polar(1.0, -omega * n as f64))
            .sum::<Complex64>()
    };

    omegas
        .iter()
        .map(|&omega| eval(b, omega) / eval(a, omega))
        .collect()
}

fn check_coefficients(b: &[f64], a: &[f64]) -> Result<()> {
    if b.is_empty() {
        return Err(ValidationError::Empty("b"));
    }
    if a.is_empty() {
        return Err(ValidationError::Empty("a"));
    }
    Ok(())
}

/// Frequency response of a digital filter
///
/// Point grids are evaluated with one FFT per polynomial (length `2n` for the
/// half circle, `n` for the whole one). Explicit frequencies, and coefficient
/// vectors longer than the FFT, are evaluated directly.
pub fn freqz(b: &[f64], a: &[f64], options: &FreqzOptions) -> Result<FrequencyResponse> {
    check_coefficients(b, a)?;
    options.validate()?;

    let (rad, w) = options.grid();

    let h = match options.grid {
        FrequencyGrid::Points(n) => {
            let fft_size = if options.whole { n } else { 2 * n };
            let mut engine = FftEngine::new(fft_size);
            if engine.fits(b) && engine.fits(a) {
                let num = engine.evaluate(b);
                let den = engine.evaluate(a);
                num.iter().zip(den.iter()).take(n).map(|(&x, &y)| x / y).collect()
            } else {
                log::debug!(
                    "freqz: {} coefficients exceed the {}-point FFT, evaluating directly",
                    b.len().max(a.len()),
                    engine.fft_size()
                );
                response_at(b, a, &rad)
            }
        }
        FrequencyGrid::Frequencies(_) => response_at(b, a, &rad),
    };

    Ok(FrequencyResponse { w, h })
}

/// Unwrapped phase response, in radians or degrees
pub fn phasez(b: &[f64], a: &[f64], options: &FreqzOptions, degrees: bool) -> Result<(Vec<f64>, Vec<f64>)> {
    let response = freqz(b, a, options)?;
    let mut phase = response.phase();
    if degrees {
        for p in phase.iter_mut() {
            *p = p.to_degrees();
        }
    }
    Ok((response.w, phase))
}

/// Group delay in samples
///
/// Points where the delay is undefined (a zero on the unit circle) report 0.
/// FIR results (`a` of length 1) are rounded to whole samples.
pub fn grpdelay(b: &[f64], a: &[f64], options: &FreqzOptions) -> Result<(Vec<f64>, Vec<f64>)> {
    check_coefficients(b, a)?;
    options.validate()?;

    let (rad, w) = options.grid();

    let reversed: Vec<f64> = a.iter().rev().copied().collect();
    let c = conv(b, &reversed);
    let cr: Vec<f64> = c.iter().enumerate().map(|(n, &v)| v * n as f64).collect();

    let ones = [1.0];
    let num = response_at(&cr, &ones, &rad);
    let den = response_at(&c, &ones, &rad);

    let mut singular = 0;
    let offset = (a.len() - 1) as f64;
    let fir = a.len() == 1;
    let gd: Vec<f64> = num
        .iter()
        .zip(den.iter())
        .map(|(&n, &d)| {
            if d.norm() < 10.0 * f64::EPSILON {
                singular += 1;
                0.0
            } else {
                let delay = (n / d).re - offset;
                if fir {
                    delay.round_ties_even()
                } else {
                    delay
                }
            }
        })
        .collect();

    if singular > 0 {
        log::warn!("grpdelay: the group delay is singular at {} frequencies, setting to 0", singular);
    }

    Ok((w, gd))
}

/// Impulse response
///
/// # Arguments
/// * `n` - Number of samples; defaults to `len(b)` for FIR filters and 100
///   otherwise
/// * `fs` - Sample rate for the time axis
///
/// # Returns
/// Time points `k / fs` and the response
pub fn impz(b: &[f64], a: &[f64], n: Option<usize>, fs: f64) -> Result<(Vec<f64>, Vec<f64>)> {
    check_coefficients(b, a)?;
    if !(fs > 0.0) {
        return Err(ValidationError::OutOfRange {
            name: "fs",
            range: "fs > 0",
            value: fs,
        });
    }

    let len = n.unwrap_or(if a.len() == 1 { b.len() } else { 100 });
    let mut impulse = vec![0.0; len];
    if let Some(first) = impulse.first_mut() {
        *first = 1.0;
    }

    let y = lfilter(b, a, &impulse)?;
    let t = (0..len).map(|k| k as f64 / fs).collect();
    Ok((t, y))
}

fn trim_leading_zeros(p: &[f64]) -> &[f64] {
    let start = p.iter().position(|&c| c != 0.0).unwrap_or(p.len());
    &p[start..]
}

/// Zeros, poles and gain of a transfer function
pub fn tf2zpk(b: &[f64], a: &[f64]) -> Result<Zpk> {
    let a = trim_leading_zeros(a);
    let a0 = match a.first() {
        Some(&v) => v,
        None => return Err(ValidationError::ZeroLeadingCoefficient),
    };
    let b = trim_leading_zeros(b);
    if b.is_empty() {
        return Err(ValidationError::Empty("b"));
    }

    let gain = b[0] / a0;
    let zeros = roots(b);
    let poles = roots(a);

    Ok(Zpk { zeros, poles, gain })
}

/// Whether every pole lies inside the unit circle (within `eps^(2/3)`).
/// FIR filters are always stable.
pub fn isstable(b: &[f64], a: &[f64]) -> Result<bool> {
    let zpk = tf2zpk(b, a)?;
    let radius = zpk.poles.iter().map(|p| p.norm()).fold(0.0, f64::max);
    Ok(zpk.poles.is_empty() || radius - 1.0 <= default_tolerance())
}

/// Whether every zero lies strictly inside the unit circle, by at least `tol`.
/// A filter without zeros is minimum phase.
pub fn isminphase(b: &[f64], a: &[f64], tol: f64) -> Result<bool> {
    let zpk = tf2zpk(b, a)?;
    let radius = zpk.zeros.iter().map(|z| z.norm()).fold(0.0, f64::max);
    Ok(zpk.zeros.is_empty() || radius <= 1.0 - tol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{Domain, Frequency};
    use crate::filters::design::fir1;
    use crate::filters::iir::butter;
    use crate::filters::windows::WindowType;

    #[test]
    fn test_freqz_grid_and_fft_agree_with_direct() {
        let b = [0.2, 0.5, 0.2];
        let a = [1.0, -0.3, 0.1];
        let options = FreqzOptions::points(64);

        let fast = freqz(&b, &a, &options).unwrap();
        assert_eq!(fast.w.len(), 64);
        assert_eq!(fast.w[0], 0.0);
        assert!((fast.w[1] - PI / 64.0).abs() < 1e-15);

        let rad: Vec<f64> = (0..64).map(|k| PI * k as f64 / 64.0).collect();
        let direct = response_at(&b, &a, &rad);
        for (x, y) in fast.h.iter().zip(direct.iter()) {
            assert!((x - y).norm() < 1e-12);
        }
    }

    #[test]
    fn test_freqz_whole_and_fs() {
        let options = FreqzOptions::points(8).with_whole(true).with_fs(1000.0);
        let response = freqz(&[1.0, 1.0], &[1.0], &options).unwrap();

        assert_eq!(response.w.len(), 8);
        assert!((response.w[4] - 500.0).abs() < 1e-9);
        assert!((response.w[7] - 875.0).abs() < 1e-9);
        // Zero of 1 + z⁻¹ at Nyquist
        assert!(response.h[4].norm() < 1e-12);
        assert!((response.h[0].re - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_freqz_long_filter_falls_back() {
        let b = vec![0.01; 100];
        let response = freqz(&b, &[1.0], &FreqzOptions::points(16)).unwrap();
        assert_eq!(response.h.len(), 16);
        assert!((response.h[0].re - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_freqz_explicit_frequencies() {
        let options = FreqzOptions {
            grid: FrequencyGrid::Frequencies(vec![0.0, 250.0, 500.0]),
            fs: 1000.0,
            whole: false,
        };
        let response = freqz(&[0.5, 0.5], &[1.0], &options).unwrap();

        assert_eq!(response.w, vec![0.0, 250.0, 500.0]);
        assert!((response.h[0].norm() - 1.0).abs() < 1e-12);
        assert!((response.h[1].norm() - 0.5f64.sqrt()).abs() < 1e-12);
        assert!(response.h[2].norm() < 1e-12);
    }

    #[test]
    fn test_freqz_output_forms() {
        let response = freqz(&[0.5], &[1.0], &FreqzOptions::points(4)).unwrap();

        match response.values("dB".parse().unwrap()) {
            ResponseValues::Real(db) => assert!(db.iter().all(|v| (v + 6.020599913279624).abs() < 1e-9)),
            other => panic!("expected real values, got {:?}", other),
        }
        match response.values(OutputForm::Abs) {
            ResponseValues::Real(mag) => assert!(mag.iter().all(|v| (v - 0.5).abs() < 1e-12)),
            other => panic!("expected real values, got {:?}", other),
        }
        assert!(matches!(response.values(OutputForm::default()), ResponseValues::Complex(_)));
        assert!("db".parse::<OutputForm>().is_err());
    }

    #[test]
    fn test_freqz_validation() {
        assert!(freqz(&[], &[1.0], &FreqzOptions::default()).is_err());
        assert!(freqz(&[1.0], &[1.0], &FreqzOptions::points(0)).is_err());
        assert!(freqz(&[1.0], &[1.0], &FreqzOptions::default().with_fs(0.0)).is_err());
    }

    #[test]
    fn test_unwrap_phase() {
        let wrapped = [3.0, -3.0, 3.0];
        let unwrapped = unwrap_phase(&wrapped);
        assert!((unwrapped[1] - (2.0 * PI - 3.0)).abs() < 1e-12);
        assert!((unwrapped[2] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_phasez_linear_phase() {
        // Pure delay of 3 samples: phase = -3ω
        let b = [0.0, 0.0, 0.0, 1.0];
        let (w, phase) = phasez(&b, &[1.0], &FreqzOptions::points(32), false).unwrap();
        for (&wk, &p) in w.iter().zip(phase.iter()) {
            assert!((p + 3.0 * wk).abs() < 1e-9, "w = {}", wk);
        }

        let (_, degrees) = phasez(&b, &[1.0], &FreqzOptions::points(32), true).unwrap();
        assert!((degrees[16] + 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_grpdelay_linear_phase_fir() {
        let tf = fir1(20, &Frequency::Scalar(0.4), None, WindowType::Hamming, true).unwrap();
        let (_, gd) = grpdelay(&tf.b, &tf.a, &FreqzOptions::points(64)).unwrap();
        // Symmetric 21-tap filter: constant delay of 10 in the passband
        for &d in &gd[..16] {
            assert_eq!(d, 10.0);
        }
    }

    #[test]
    fn test_grpdelay_singular_point() {
        // 1 + z⁻² has zeros at ±π/2 and a delay of one sample elsewhere
        let options = FreqzOptions {
            grid: FrequencyGrid::Frequencies(vec![0.0, PI / 2.0]),
            ..FreqzOptions::default()
        };
        let (_, gd) = grpdelay(&[1.0, 0.0, 1.0], &[1.0], &options).unwrap();
        assert_eq!(gd, vec![1.0, 0.0]);
    }

    #[test]
    fn test_grpdelay_one_pole() {
        // H = 1 / (1 - r z⁻¹): delay at DC is r / (1 - r)
        let r = 0.5;
        let options = FreqzOptions {
            grid: FrequencyGrid::Frequencies(vec![0.0]),
            ..FreqzOptions::default()
        };
        let (_, gd) = grpdelay(&[1.0], &[1.0, -r], &options).unwrap();
        assert!((gd[0] - r / (1.0 - r)).abs() < 1e-12);
    }

    #[test]
    fn test_impz_fir_and_iir() {
        let (t, y) = impz(&[1.0, 2.0, 3.0], &[1.0], None, 1.0).unwrap();
        assert_eq!(t, vec![0.0, 1.0, 2.0]);
        assert_eq!(y, vec![1.0, 2.0, 3.0]);

        let (t, y) = impz(&[1.0], &[1.0, -0.5], None, 10.0).unwrap();
        assert_eq!(y.len(), 100);
        assert!((t[1] - 0.1).abs() < 1e-15);
        assert!((y[3] - 0.125).abs() < 1e-15);

        let (_, y) = impz(&[1.0], &[1.0, -0.5], Some(5), 1.0).unwrap();
        assert_eq!(y.len(), 5);

        assert!(impz(&[1.0], &[1.0], None, 0.0).is_err());
    }

    #[test]
    fn test_tf2zpk() {
        let zpk = tf2zpk(&[2.0, -2.0], &[2.0, -1.0]).unwrap();
        assert!((zpk.gain - 1.0).abs() < 1e-15);
        assert!((zpk.zeros[0] - Complex64::new(1.0, 0.0)).norm() < 1e-15);
        assert!((zpk.poles[0] - Complex64::new(0.5, 0.0)).norm() < 1e-15);

        assert!(tf2zpk(&[1.0], &[0.0, 0.0]).is_err());
        // Leading zeros in the denominator are dropped
        let zpk = tf2zpk(&[1.0], &[0.0, 4.0]).unwrap();
        assert!(zpk.poles.is_empty());
        assert!((zpk.gain - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_isstable() {
        assert!(isstable(&[1.0, 2.0, 1.0], &[1.0]).unwrap());
        assert!(isstable(&[1.0], &[1.0, -0.9]).unwrap());
        assert!(!isstable(&[1.0], &[1.0, -1.1]).unwrap());

        let tf = butter(6, &Frequency::Scalar(0.3), None, Domain::Digital).unwrap();
        assert!(isstable(&tf.b, &tf.a).unwrap());
    }

    #[test]
    fn test_isminphase() {
        let tol = default_tolerance();
        assert!(isminphase(&[1.0, -0.5], &[1.0], tol).unwrap());
        assert!(!isminphase(&[1.0, -2.0], &[1.0], tol).unwrap());
        // A zero on the unit circle is not minimum phase
        assert!(!isminphase(&[1.0, 1.0], &[1.0], tol).unwrap());
        assert!(isminphase(&[3.0], &[1.0, -0.5], tol).unwrap());
    }
}
