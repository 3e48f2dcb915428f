//! Parks-McClellan equiripple FIR design
//!
//! Remez exchange on a dense frequency grid, after Janovetz's C
//! implementation. Frequencies inside this module run from 0 to 0.5
//! (cycles per sample); `firpm` takes MATLAB's 0..1 band edges and halves
//! them.

use super::design::TransferFunction;
use crate::error::{Result, ValidationError};
use std::f64::consts::PI;
use std::str::FromStr;

const GRID_DENSITY: usize = 16;
const MAX_ITERATIONS: usize = 40;

/// Response type of an equiripple design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemezType {
    /// Multiband with even symmetry (types I and II)
    #[default]
    Bandpass,
    /// Odd symmetry, error weighted relative to frequency
    Differentiator,
    /// Odd symmetry (types III and IV)
    Hilbert,
}

impl RemezType {
    fn symmetric(self) -> bool {
        self == RemezType::Bandpass
    }
}

impl FromStr for RemezType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bandpass" => Ok(RemezType::Bandpass),
            "differentiator" => Ok(RemezType::Differentiator),
            "hilbert" => Ok(RemezType::Hilbert),
            other => Err(ValidationError::InvalidParameter {
                name: "ftype",
                reason: format!("unknown type '{}'; expected 'bandpass', 'hilbert' or 'differentiator'", other),
            }),
        }
    }
}

/// Desired response and weight sampled on the dense grid
struct DenseGrid {
    freq: Vec<f64>,
    desired: Vec<f64>,
    weight: Vec<f64>,
}

impl DenseGrid {
    fn new(r: usize, numtaps: usize, bands: &[f64], des: &[f64], weight: &[f64], symmetric: bool, density: usize) -> Self {
        let delf = 0.5 / (density * r) as f64;

        // Odd-symmetric responses vanish at DC
        let grid0 = if !symmetric && delf > bands[0] { delf } else { bands[0] };

        let mut grid = DenseGrid {
            freq: Vec::new(),
            desired: Vec::new(),
            weight: Vec::new(),
        };

        for (band, edges) in bands.chunks_exact(2).enumerate() {
            let mut lowf = if band == 0 { grid0 } else { edges[0] };
            let highf = edges[1];
            let (d0, d1) = (des[2 * band], des[2 * band + 1]);

            let k = ((highf - lowf) / delf).round() as usize;
            let slope = if k > 1 { (d1 - d0) / (k - 1) as f64 } else { 0.0 };
            for i in 0..k {
                grid.desired.push(d0 + i as f64 * slope);
                grid.weight.push(weight[band]);
                grid.freq.push(lowf);
                lowf += delf;
            }
            if k > 0 {
                if let Some(last) = grid.freq.last_mut() {
                    *last = highf;
                }
            }
        }

        // Odd symmetry with an odd tap count also vanishes at Nyquist
        if !symmetric && numtaps % 2 == 1 {
            if let Some(last) = grid.freq.last_mut() {
                if *last > 0.5 - delf {
                    *last = 0.5 - delf;
                }
            }
        }

        grid
    }

    fn len(&self) -> usize {
        self.freq.len()
    }
}

/// Barycentric form of the best approximation through the current
/// extremal set (Oppenheim & Schafer eq. 7.131 - 7.133)
struct Interpolant {
    ad: Vec<f64>,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Interpolant {
    fn new(grid: &DenseGrid, ext: &[usize]) -> Self {
        let r = ext.len() - 1;
        let x: Vec<f64> = ext.iter().map(|&i| (2.0 * PI * grid.freq[i]).cos()).collect();

        // Strided product keeps the partial products in range
        let ld = (r - 1) / 15 + 1;
        let ad: Vec<f64> = (0..=r)
            .map(|i| {
                let mut denom = 1.0;
                for j in 0..ld {
                    for k in (j..=r).step_by(ld) {
                        if k != i {
                            denom *= 2.0 * (x[i] - x[k]);
                        }
                    }
                }
                if denom.abs() < 0.00001 {
                    denom = 0.00001;
                }
                1.0 / denom
            })
            .collect();

        let mut numer = 0.0;
        let mut denom = 0.0;
        let mut sign = 1.0;
        for (i, &e) in ext.iter().enumerate() {
            numer += ad[i] * grid.desired[e];
            denom += sign * ad[i] / grid.weight[e];
            sign = -sign;
        }
        let delta = numer / denom;

        let y = ext
            .iter()
            .enumerate()
            .map(|(i, &e)| {
                let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                grid.desired[e] - sign * delta / grid.weight[e]
            })
            .collect();

        Interpolant { ad, x, y }
    }

    /// Amplitude response at `freq` (0 to 0.5)
    fn eval(&self, freq: f64) -> f64 {
        let xc = (2.0 * PI * freq).cos();
        let mut numer = 0.0;
        let mut denom = 0.0;
        for ((&ad, &x), &y) in self.ad.iter().zip(self.x.iter()).zip(self.y.iter()) {
            let c = xc - x;
            if c.abs() < 1.0e-7 {
                return y;
            }
            let c = ad / c;
            denom += c;
            numer += c * y;
        }
        numer / denom
    }
}

/// Locate the `r + 1` alternating extrema of the weighted error.
///
/// Surplus extrema are dropped in this order: the smaller of two adjacent
/// non-alternating ones, then the smallest overall, and for a single
/// surplus the smaller of the first and last.
fn search(r: usize, e: &[f64]) -> Result<Vec<usize>> {
    let n = e.len();
    let mut found: Vec<usize> = Vec::with_capacity(2 * r);

    if (e[0] > 0.0 && e[0] > e[1]) || (e[0] < 0.0 && e[0] < e[1]) {
        found.push(0);
    }
    for i in 1..n - 1 {
        if (e[i] >= e[i - 1] && e[i] > e[i + 1] && e[i] > 0.0)
            || (e[i] <= e[i - 1] && e[i] < e[i + 1] && e[i] < 0.0)
        {
            if found.len() >= 2 * r {
                return Err(ValidationError::NoConvergence("Remez exchange (too many extremal frequencies)"));
            }
            found.push(i);
        }
    }
    let j = n - 1;
    if (e[j] > 0.0 && e[j] > e[j - 1]) || (e[j] < 0.0 && e[j] < e[j - 1]) {
        if found.len() >= 2 * r {
            return Err(ValidationError::NoConvergence("Remez exchange (too many extremal frequencies)"));
        }
        found.push(j);
    }

    if found.len() < r + 1 {
        return Err(ValidationError::NoConvergence("Remez exchange (too few extremal frequencies)"));
    }

    while found.len() > r + 1 {
        let extra = found.len() - (r + 1);
        let mut up = e[found[0]] > 0.0;
        let mut smallest = 0;
        let mut alternating = true;

        for j in 1..found.len() {
            if e[found[j]].abs() < e[found[smallest]].abs() {
                smallest = j;
            }
            if up && e[found[j]] < 0.0 {
                up = false;
            } else if !up && e[found[j]] > 0.0 {
                up = true;
            } else {
                alternating = false;
                break;
            }
        }

        if alternating && extra == 1 {
            let last = found.len() - 1;
            smallest = if e[found[last]].abs() < e[found[0]].abs() { last } else { 0 };
        }

        found.remove(smallest);
    }

    Ok(found)
}

/// Extremal errors agree to within 0.01%
fn is_done(ext: &[usize], e: &[f64]) -> bool {
    let (min, max) = ext
        .iter()
        .map(|&i| e[i].abs())
        .fold((f64::INFINITY, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    max == 0.0 || (max - min) / max < 0.0001
}

/// Impulse response from amplitude samples `a[k]` at `k / n`
fn freq_sample(n: usize, a: &[f64], symmetric: bool) -> Vec<f64> {
    let m = (n as f64 - 1.0) / 2.0;
    let kmax = if n % 2 == 1 { (n - 1) / 2 } else { n / 2 - 1 };

    (0..n)
        .map(|i| {
            let x = 2.0 * PI * (i as f64 - m) / n as f64;
            let harmonics = (1..=kmax).map(|k| {
                if symmetric {
                    2.0 * a[k] * (x * k as f64).cos()
                } else {
                    2.0 * a[k] * (x * k as f64).sin()
                }
            });

            let base = match (symmetric, n % 2) {
                (true, _) => a[0],
                (false, 1) => 0.0,
                (false, _) => a[n / 2] * (PI * (i as f64 - m)).sin(),
            };
            (base + harmonics.sum::<f64>()) / n as f64
        })
        .collect()
}

/// Remez exchange proper. `bands` are in cycles per sample.
fn remez(numtaps: usize, bands: &[f64], des: &[f64], weight: &[f64], ftype: RemezType, density: usize) -> Result<Vec<f64>> {
    let symmetric = ftype.symmetric();
    let mut r = numtaps / 2;
    if numtaps % 2 == 1 && symmetric {
        r += 1;
    }

    let mut grid = DenseGrid::new(r, numtaps, bands, des, weight, symmetric, density);
    if grid.len() < r + 2 {
        return Err(ValidationError::InvalidParameter {
            name: "f",
            reason: "bands are too narrow for the requested order".into(),
        });
    }

    if ftype == RemezType::Differentiator {
        for i in 0..grid.len() {
            if grid.desired[i] > 0.0001 {
                grid.weight[i] /= grid.freq[i];
            }
        }
    }

    // Fold the fixed factor of types II-IV out of the approximation
    let factor = |f: f64| -> Option<f64> {
        match (symmetric, numtaps % 2) {
            (true, 1) => None,
            (true, _) => Some((PI * f).cos()),
            (false, 1) => Some((2.0 * PI * f).sin()),
            (false, _) => Some((PI * f).sin()),
        }
    };
    for i in 0..grid.len() {
        if let Some(c) = factor(grid.freq[i]) {
            grid.desired[i] /= c;
            grid.weight[i] *= c;
        }
    }

    let mut ext: Vec<usize> = (0..=r).map(|i| i * (grid.len() - 1) / r).collect();
    let mut converged = false;
    for iteration in 0..MAX_ITERATIONS {
        let interp = Interpolant::new(&grid, &ext);
        let error: Vec<f64> = (0..grid.len())
            .map(|i| grid.weight[i] * (grid.desired[i] - interp.eval(grid.freq[i])))
            .collect();

        ext = search(r, &error)?;
        if is_done(&ext, &error) {
            log::debug!("firpm: converged after {} iterations", iteration + 1);
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(ValidationError::NoConvergence("Remez exchange"));
    }

    let interp = Interpolant::new(&grid, &ext);
    let taps: Vec<f64> = (0..=numtaps / 2)
        .map(|i| {
            let f = i as f64 / numtaps as f64;
            interp.eval(f) * factor(f).unwrap_or(1.0)
        })
        .collect();

    Ok(freq_sample(numtaps, &taps, symmetric))
}

/// Parks-McClellan optimal equiripple FIR design
///
/// # Arguments
/// * `n` - Filter order (at least 3)
/// * `f` - Band edge pairs in [0, 1], 1 being Nyquist
/// * `a` - Desired amplitude at each band edge
/// * `w` - Positive weight per band (defaults to 1)
/// * `ftype` - Bandpass, Hilbert transformer or differentiator
/// * `grid_density` - Dense grid points per extremum (at least 16)
pub fn firpm(
    n: usize,
    f: &[f64],
    a: &[f64],
    w: Option<&[f64]>,
    ftype: RemezType,
    grid_density: Option<usize>,
) -> Result<TransferFunction> {
    if n < 3 {
        return Err(ValidationError::InvalidParameter {
            name: "n",
            reason: "filter order must be at least 3".into(),
        });
    }
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
            if let Some(&bad) = w.iter().find(|&&x| !(x > 0.0)) {
                return Err(ValidationError::OutOfRange {
                    name: "w",
                    range: "w > 0",
                    value: bad,
                });
            }
            w.to_vec()
        }
        None => vec![1.0; nbands],
    };

    let density = grid_density.unwrap_or(GRID_DENSITY);
    if density < GRID_DENSITY {
        return Err(ValidationError::InvalidParameter {
            name: "grid_density",
            reason: format!("must be at least {} (found: {})", GRID_DENSITY, density),
        });
    }

    let bands: Vec<f64> = f.iter().map(|&x| x / 2.0).collect();
    let b = remez(n + 1, &bands, a, &weight, ftype, density)?;

    Ok(TransferFunction::fir(b))
}
