//! FIR filter design
//!
//! Windowed-sinc (`firwin`/`fir1`), frequency sampling (`fir2`), least
//! squares (`firls`) and Savitzky-Golay smoothing (`sgolay`). Frequencies are
//! normalized so that 1 is the Nyquist frequency.

use super::windows::{generate_window, WindowType};
use crate::args::{resolve_fir_type, FilterType, Frequency};
use crate::error::{Result, ValidationError};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use realfft::RealFftPlanner;
use std::f64::consts::PI;

/// Rational transfer function `B(z) / A(z)`, coefficients in descending
/// powers of `z` (ascending powers of `z⁻¹`)
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    /// Numerator coefficients
    pub b: Vec<f64>,

    /// Denominator coefficients
    pub a: Vec<f64>,
}

impl TransferFunction {
    pub fn new(b: Vec<f64>, a: Vec<f64>) -> Self {
        Self { b, a }
    }

    /// FIR filter: denominator is `[1]`
    pub fn fir(b: Vec<f64>) -> Self {
        Self { b, a: vec![1.0] }
    }
}

/// Normalized sinc: sin(πx) / (πx)
pub(crate) fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let y = PI * x;
        y.sin() / y
    }
}

/// Windowed-sinc FIR design with an arbitrary number of bands
///
/// # Arguments
/// * `numtaps` - Number of coefficients
/// * `cutoffs` - Band edges, strictly increasing within (0, 1)
/// * `pass_zero` - Whether the first band (starting at DC) is a passband
/// * `window` - Window applied to the ideal impulse response
/// * `scale` - Normalize so the gain is 1 at the centre of the first passband
///   (at DC or Nyquist when the band touches them)
///
/// # Returns
/// Filter coefficients h[n] for n = 0..numtaps-1
pub fn firwin(
    numtaps: usize,
    cutoffs: &[f64],
    pass_zero: bool,
    window: WindowType,
    scale: bool,
) -> Result<Vec<f64>> {
    if numtaps == 0 {
        return Err(ValidationError::InvalidParameter {
            name: "numtaps",
            reason: "at least one tap is required".into(),
        });
    }
    if cutoffs.is_empty() {
        return Err(ValidationError::Empty("cutoff"));
    }
    for &c in cutoffs {
        if !(c > 0.0 && c < 1.0) {
            return Err(ValidationError::OutOfRange {
                name: "cutoff",
                range: "0 < cutoff < 1",
                value: c,
            });
        }
    }
    if cutoffs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ValidationError::NotIncreasing("cutoff"));
    }

    let pass_nyquist = (cutoffs.len() % 2 == 1) ^ pass_zero;
    if pass_nyquist && numtaps % 2 == 0 {
        return Err(ValidationError::NyquistPassband(numtaps));
    }

    // Band edges including DC and Nyquist where passbands touch them
    let mut edges = Vec::with_capacity(cutoffs.len() + 2);
    if pass_zero {
        edges.push(0.0);
    }
    edges.extend_from_slice(cutoffs);
    if pass_nyquist {
        edges.push(1.0);
    }
    let bands: Vec<(f64, f64)> = edges.chunks_exact(2).map(|p| (p[0], p[1])).collect();

    let alpha = 0.5 * (numtaps - 1) as f64;
    let window = generate_window(window, numtaps);

    let mut h: Vec<f64> = (0..numtaps)
        .map(|k| {
            let m = k as f64 - alpha;
            bands
                .iter()
                .map(|&(left, right)| right * sinc(right * m) - left * sinc(left * m))
                .sum::<f64>()
                * window[k]
        })
        .collect();

    if scale {
        let (left, right) = bands[0];
        let scale_frequency = if left == 0.0 {
            0.0
        } else if right == 1.0 {
            1.0
        } else {
            0.5 * (left + right)
        };

        let s: f64 = h
            .iter()
            .enumerate()
            .map(|(k, &v)| v * (PI * (k as f64 - alpha) * scale_frequency).cos())
            .sum();
        for v in h.iter_mut() {
            *v /= s;
        }
    }

    Ok(h)
}

/// Window-based FIR design with MATLAB `fir1` conventions
///
/// # Arguments
/// * `n` - Filter order; the filter has `n + 1` taps
/// * `wn` - Cutoff frequency or band edges
/// * `ftype` - Band layout, or `None` for the default implied by `wn`
/// * `window` - Window function
/// * `scale` - Normalize the passband gain to 1
pub fn fir1(
    n: usize,
    wn: &Frequency,
    ftype: Option<FilterType>,
    window: WindowType,
    scale: bool,
) -> Result<TransferFunction> {
    let ftype = resolve_fir_type(wn, ftype)?;
    let b = firwin(n + 1, wn.as_slice(), ftype.pass_zero(), window, scale)?;
    Ok(TransferFunction::fir(b))
}

/// Options for [`fir2`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fir2Options {
    /// Size of the interpolation grid over [0, 1]; the gain is sampled on
    /// `2 * npt` points
    pub npt: usize,

    /// Window applied to the sampled impulse response (`None` for none)
    pub window: Option<WindowType>,
}

impl Default for Fir2Options {
    fn default() -> Self {
        Self {
            npt: 512,
            window: Some(WindowType::Hamming),
        }
    }
}

/// Frequency-sampling FIR design
///
/// The piecewise-linear gain `m` at frequencies `f` is sampled on a uniform
/// grid, given linear phase and inverse transformed.
///
/// # Arguments
/// * `n` - Filter order. Odd orders are incremented when the gain at
///   Nyquist is nonzero
/// * `f` - Frequency points from 0 to 1, nondecreasing. A value may be
///   repeated once to mark a step
/// * `m` - Gain at each frequency point
pub fn fir2(n: usize, f: &[f64], m: &[f64], options: &Fir2Options) -> Result<TransferFunction> {
    if f.len() != m.len() {
        return Err(ValidationError::LengthMismatch {
            name: "m",
            expected: f.len(),
            found: m.len(),
        });
    }
    if f.len() < 2 {
        return Err(ValidationError::InvalidParameter {
            name: "f",
            reason: "at least two frequency points are required".into(),
        });
    }
    if 2 * options.npt <= n {
        return Err(ValidationError::InvalidParameter {
            name: "npt",
            reason: format!("npt ({}) must be larger than n/2 ({})", options.npt, n as f64 / 2.0),
        });
    }

    let last = f.len() - 1;
    if f[0] != 0.0 || f[last] != 1.0 {
        return Err(ValidationError::InvalidParameter {
            name: "f",
            reason: "frequency points must start with 0 and end with 1".into(),
        });
    }
    if f.windows(2).any(|w| w[1] < w[0]) {
        return Err(ValidationError::NotIncreasing("f"));
    }
    if f.windows(3).any(|w| w[0] == w[2]) {
        return Err(ValidationError::InvalidParameter {
            name: "f",
            reason: "a value must not occur more than twice".into(),
        });
    }
    if f[1] == 0.0 || f[last - 1] == 1.0 {
        return Err(ValidationError::InvalidParameter {
            name: "f",
            reason: "0 and 1 must not be repeated".into(),
        });
    }

    let mut order = n;
    if m[last] != 0.0 && order % 2 == 1 {
        order += 1;
        log::warn!(
            "fir2: odd order {} with nonzero gain at Nyquist, using order {}",
            n,
            order
        );
    }
    let numtaps = order + 1;
    let nfreqs = 2 * options.npt;

    // Nudge repeated points apart so interpolation sees a step
    let mut freq = f.to_vec();
    for k in 0..last {
        if freq[k] == freq[k + 1] {
            freq[k] -= f64::EPSILON;
            freq[k + 1] += f64::EPSILON;
        }
    }
    if freq.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ValidationError::NotIncreasing("f"));
    }

    let step = 1.0 / (nfreqs - 1) as f64;
    let delay = 0.5 * (numtaps - 1) as f64;
    let mut segment = 0;
    let mut spectrum: Vec<Complex64> = (0..nfreqs)
        .map(|i| {
            let x = if i == nfreqs - 1 { 1.0 } else { i as f64 * step };
            while segment + 1 < last && x > freq[segment + 1] {
                segment += 1;
            }
            let (x0, x1) = (freq[segment], freq[segment + 1]);
            let t = ((x - x0) / (x1 - x0)).clamp(0.0, 1.0);
            let gain = m[segment] + t * (m[segment + 1] - m[segment]);
            gain * Complex64::from_polar(1.0, -delay * PI * x)
        })
        .collect();

    // The inverse real transform needs purely real DC and Nyquist bins
    spectrum[0].im = 0.0;
    spectrum[nfreqs - 1].im = 0.0;

    let fft_len = 2 * (nfreqs - 1);
    let mut planner = RealFftPlanner::<f64>::new();
    let c2r = planner.plan_fft_inverse(fft_len);
    let mut impulse = c2r.make_output_vec();
    c2r.process(&mut spectrum, &mut impulse)
        .map_err(|e| ValidationError::InvalidParameter {
            name: "npt",
            reason: e.to_string(),
        })?;

    let window = match options.window {
        Some(w) => generate_window(w, numtaps),
        None => vec![1.0; numtaps],
    };
    let b = impulse
        .iter()
        .zip(window.iter())
        .map(|(&v, &w)| v / fft_len as f64 * w)
        .collect();

    Ok(TransferFunction::fir(b))
}

/// Linear-phase least-squares FIR design
///
/// Minimizes the weighted integral squared error between the response and a
/// piecewise-linear target over the given bands.
///
/// # Arguments
/// * `n` - Filter order; odd orders are incremented to keep a type I filter
/// * `f` - Band edge pairs in [0, 1], nondecreasing
/// * `a` - Desired gain at each band edge
/// * `w` - Weight per band (defaults to 1)
pub fn firls(n: usize, f: &[f64], a: &[f64], w: Option<&[f64]>) -> Result<TransferFunction> {
    if f.is_empty() || f.len() % 2 != 0 {
        return Err(ValidationError::InvalidParameter {
            name: "f",
            reason: "band edges must come in pairs".into(),
        });
    }
    if a.len() != f.len() {
        return Err(ValidationError::LengthMismatch {
            name: "a",
            expected: f.len(),
            found: a.len(),
        });
    }
    for &edge in f {
        if !(0.0..=1.0).contains(&edge) {
            return Err(ValidationError::OutOfRange {
                name: "f",
                range: "0 <= f <= 1",
                value: edge,
            });
        }
    }
    if f.windows(2).any(|p| p[1] < p[0]) || f.chunks_exact(2).any(|p| p[1] <= p[0]) {
        return Err(ValidationError::NotIncreasing("f"));
    }

    let nbands = f.len() / 2;
    let weight = match w {
        Some(w) if w.len() != nbands => {
            return Err(ValidationError::LengthMismatch {
                name: "w",
                expected: nbands,
                found: w.len(),
            })
        }
        Some(w) => {
            if let Some(&bad) = w.iter().find(|&&x| x < 0.0) {
                return Err(ValidationError::OutOfRange {
                    name: "w",
                    range: "w >= 0",
                    value: bad,
                });
            }
            w.to_vec()
        }
        None => vec![1.0; nbands],
    };

    let mut order = n;
    if order % 2 == 1 {
        order += 1;
        log::warn!("firls: odd order {} changed to {}", n, order);
    }
    let half = order / 2;

    let bands: Vec<(f64, f64)> = f.chunks_exact(2).map(|p| (p[0], p[1])).collect();
    let gains: Vec<(f64, f64)> = a.chunks_exact(2).map(|p| (p[0], p[1])).collect();

    // q[k] = Σ w·[f·sinc(f·k)] over each band, k = 0..=order
    let q: Vec<f64> = (0..=order)
        .map(|k| {
            let k = k as f64;
            bands
                .iter()
                .zip(weight.iter())
                .map(|(&(f1, f2), &wb)| wb * (f2 * sinc(f2 * k) - f1 * sinc(f1 * k)))
                .sum()
        })
        .collect();

    // Toeplitz plus Hankel normal equations
    let size = half + 1;
    let qmat = DMatrix::from_fn(size, size, |i, j| q[i.abs_diff(j)] + q[i + j]);

    let rhs = DVector::from_fn(size, |k, _| {
        let kf = k as f64;
        bands
            .iter()
            .zip(gains.iter())
            .zip(weight.iter())
            .map(|((&(f1, f2), &(a1, a2)), &wb)| {
                let slope = (a2 - a1) / (f2 - f1);
                let intercept = a1 - f1 * slope;
                let term = |fe: f64| {
                    let base = fe * (slope * fe + intercept) * sinc(fe * kf);
                    if k == 0 {
                        base - slope * fe * fe / 2.0
                    } else {
                        base + slope * (kf * PI * fe).cos() / (PI * kf).powi(2)
                    }
                };
                wb * (term(f2) - term(f1))
            })
            .sum()
    });

    let coeffs = qmat
        .lu()
        .solve(&rhs)
        .ok_or(ValidationError::SingularSystem)?;

    let mut b = Vec::with_capacity(order + 1);
    b.extend((1..size).rev().map(|i| coeffs[i]));
    b.push(2.0 * coeffs[0]);
    b.extend((1..size).map(|i| coeffs[i]));

    Ok(TransferFunction::fir(b))
}

/// Savitzky-Golay smoothing filter
///
/// Coefficients of the least-squares polynomial fit of degree `order`
/// evaluated at the centre of a `framelen`-sample window.
pub fn sgolay(order: usize, framelen: usize) -> Result<TransferFunction> {
    if framelen % 2 == 0 {
        return Err(ValidationError::InvalidParameter {
            name: "framelen",
            reason: format!("must be odd (found: {})", framelen),
        });
    }
    if order >= framelen {
        return Err(ValidationError::InvalidParameter {
            name: "order",
            reason: format!("must be less than framelen ({}, found: {})", framelen, order),
        });
    }

    let half = (framelen / 2) as f64;
    // Sample positions, reversed so the result is a convolution kernel
    let x: Vec<f64> = (0..framelen).map(|j| half - j as f64).collect();

    let vander = DMatrix::from_fn(order + 1, framelen, |i, j| x[j].powi(i as i32));
    let gram = &vander * vander.transpose();

    let mut e0 = DVector::zeros(order + 1);
    e0[0] = 1.0;

    // Minimum-norm solution of vander · c = e0
    let y = gram.lu().solve(&e0).ok_or(ValidationError::SingularSystem)?;
    let c = vander.transpose() * y;

    Ok(TransferFunction::fir(c.iter().copied().collect()))
}
