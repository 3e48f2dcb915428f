//! Polynomial utilities: roots, expansion and stabilization
//!
//! Coefficients are ordered from the highest power down, so `[1, -2, -3]` is
//! `z² - 2z - 3` (equivalently `1 - 2z⁻¹ - 3z⁻²` for a filter denominator).

use crate::error::{Result, ValidationError};
use nalgebra::DMatrix;
use num_complex::Complex64;

/// Roots of a real polynomial
///
/// Leading zeros are ignored and trailing zeros become roots at the origin.
/// The remaining roots are the eigenvalues of the companion matrix.
/// An all-zero (or empty) polynomial has no roots.
pub fn roots(p: &[f64]) -> Vec<Complex64> {
    let first = match p.iter().position(|&c| c != 0.0) {
        Some(i) => i,
        None => return Vec::new(),
    };
    let last = p.iter().rposition(|&c| c != 0.0).unwrap_or(first);

    let core = &p[first..=last];
    let trailing = p.len() - 1 - last;
    let degree = core.len() - 1;

    let mut out = Vec::with_capacity(degree + trailing);
    match degree {
        0 => {}
        1 => out.push(Complex64::new(-core[1] / core[0], 0.0)),
        _ => {
            let mut companion = DMatrix::<f64>::zeros(degree, degree);
            for j in 0..degree {
                companion[(0, j)] = -core[j + 1] / core[0];
            }
            for i in 1..degree {
                companion[(i, i - 1)] = 1.0;
            }
            out.extend(companion.complex_eigenvalues().iter().copied());
        }
    }
    out.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(trailing));
    out
}

/// Monic polynomial with the given roots
pub fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &r in roots {
        coeffs.push(Complex64::new(0.0, 0.0));
        for i in (1..coeffs.len()).rev() {
            let prev = coeffs[i - 1];
            coeffs[i] -= r * prev;
        }
    }
    coeffs
}

/// Full linear convolution of two coefficient sequences
pub fn conv(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Stabilize a polynomial
///
/// Roots outside the unit circle are reflected to `1/conj(r)`; roots on or
/// inside it are kept. The result has the same length and leading
/// coefficient as `a`, and `|B(e^jω)|` differs from `|A(e^jω)|` only by a
/// constant factor.
///
/// # Errors
/// Empty input or a zero leading coefficient.
pub fn polystab(a: &[f64]) -> Result<Vec<f64>> {
    let lead = match a.first() {
        Some(&c) => c,
        None => return Err(ValidationError::Empty("a")),
    };
    if lead == 0.0 {
        return Err(ValidationError::ZeroLeadingCoefficient);
    }
    if a.len() == 1 {
        return Ok(a.to_vec());
    }

    let reflected: Vec<Complex64> = roots(a)
        .into_iter()
        .map(|r| if r.norm() > 1.0 { 1.0 / r.conj() } else { r })
        .collect();

    let b: Vec<f64> = poly(&reflected).iter().map(|c| lead * c.re).collect();
    debug_assert_eq!(b.len(), a.len());
    Ok(b)
}

/// Roots of `a` scaled by `alpha`
///
/// Scaling every root by `alpha` is the z-plane substitution `z -> z/alpha`.
pub fn polyscale(a: &[f64], alpha: Complex64) -> Vec<Complex64> {
    roots(a).into_iter().map(|r| r * alpha).collect()
}
