//! Jacobian elliptic functions and complete elliptic integrals
//!
//! Everything here uses the parameter convention `m = k²`.

use crate::error::{Result, ValidationError};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Arithmetic-geometric mean of `a` and `b`
fn agm(mut a: f64, mut b: f64) -> f64 {
    while (a - b).abs() > 1e-15 * a.abs() {
        let next = 0.5 * (a + b);
        b = (a * b).sqrt();
        a = next;
    }
    a
}

/// Complete elliptic integral of the first kind `K(m)`
pub fn ellipk(m: f64) -> f64 {
    ellipkm1(1.0 - m)
}

/// `K(1 - p)`, accurate when `p` is tiny
pub fn ellipkm1(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::INFINITY;
    }
    PI / (2.0 * agm(1.0, p.sqrt()))
}

/// Jacobian elliptic functions `(sn, cn, dn)` of `u` with parameter `m`
/// (descending Landen / AGM scheme)
pub fn ellipj(u: f64, m: f64) -> (f64, f64, f64) {
    if m == 0.0 {
        return (u.sin(), u.cos(), 1.0);
    }
    if m == 1.0 {
        let sech = 1.0 / u.cosh();
        return (u.tanh(), sech, sech);
    }

    let mut a = vec![1.0];
    let mut c = vec![m.sqrt()];
    let mut b = (1.0 - m).sqrt();
    while a.len() < 16 {
        let (ai, ci) = (a[a.len() - 1], c[c.len() - 1]);
        if (ci / ai).abs() <= f64::EPSILON {
            break;
        }
        c.push(0.5 * (ai - b));
        let next_b = (ai * b).sqrt();
        a.push(0.5 * (ai + b));
        b = next_b;
    }

    let n = a.len() - 1;
    let mut phi = 2f64.powi(n as i32) * a[n] * u;
    let mut prev = phi;
    for i in (1..=n).rev() {
        let t = c[i] * phi.sin() / a[i];
        prev = phi;
        phi = 0.5 * (t.asin() + phi);
    }

    let cn = phi.cos();
    (phi.sin(), cn, cn / (prev - phi).cos())
}

/// Solve the degree equation: the modulus `m` for which an order-`n`
/// elliptic filter has selectivity matching the discrimination `m1`
pub fn ellipdeg(n: usize, m1: f64) -> f64 {
    let q1 = (-PI * ellipkm1(m1) / ellipk(m1)).exp();
    let q = q1.powf(1.0 / n as f64);

    let num: f64 = (0..8).map(|k| q.powi(k * (k + 1))).sum();
    let den: f64 = 1.0 + 2.0 * (1..9).map(|k| q.powi(k * k)).sum::<f64>();

    16.0 * q * (num / den).powi(4)
}

/// Inverse Jacobian `sn` for complex `w`
fn arc_jac_sn(w: Complex64, m: f64) -> Result<Complex64> {
    let complement = |k: f64| ((1.0 - k) * (1.0 + k)).sqrt();

    let k = m.sqrt();
    if k >= 1.0 {
        return Ok(w.atanh());
    }

    // Descending Landen sequence down to k = 0
    let mut ks = vec![k];
    while ks[ks.len() - 1] != 0.0 {
        let kp = complement(ks[ks.len() - 1]);
        ks.push((1.0 - kp) / (1.0 + kp));
        if ks.len() > 10 {
            return Err(ValidationError::NoConvergence("Landen transformation"));
        }
    }

    let capk = PI / 2.0 * ks[1..].iter().map(|k| 1.0 + k).product::<f64>();

    let one = Complex64::new(1.0, 0.0);
    let mut wn = w;
    for pair in ks.windows(2) {
        let (kn, knext) = (pair[0], pair[1]);
        let root = ((one - kn * wn) * (one + kn * wn)).sqrt();
        wn = 2.0 * wn / ((1.0 + knext) * (one + root));
    }

    Ok(capk * 2.0 / PI * wn.asin())
}

/// Real inverse Jacobian `sc` with complementary parameter: solves
/// `w = sc(z, 1 - m)` for real `z`
pub fn arc_jac_sc1(w: f64, m: f64) -> Result<f64> {
    let z = arc_jac_sn(Complex64::new(0.0, w), m)?;
    if z.re.abs() > 1e-14 {
        return Err(ValidationError::NoConvergence("inverse elliptic sc"));
    }
    Ok(z.im)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ellipk_values() {
        assert!((ellipk(0.0) - PI / 2.0).abs() < 1e-15);
        assert!((ellipk(0.5) - 1.8540746773013719).abs() < 1e-14);
        assert!(ellipk(1.0).is_infinite());
        assert!((ellipkm1(0.5) - ellipk(0.5)).abs() < 1e-15);
    }

    #[test]
    fn test_ellipj_values() {
        let (sn, cn, dn) = ellipj(0.5, 0.3);
        assert!((sn - 0.47421562271182066).abs() < 1e-12);
        assert!((cn - 0.8804087364264624).abs() < 1e-12);
        assert!((dn - 0.9656789647459512).abs() < 1e-12);
    }

    #[test]
    fn test_ellipj_identities() {
        for &m in &[0.0, 0.1, 0.5, 0.9, 0.999] {
            for &u in &[0.0, 0.3, 1.0, 2.5] {
                let (sn, cn, dn) = ellipj(u, m);
                assert!((sn * sn + cn * cn - 1.0).abs() < 1e-12);
                assert!((dn * dn + m * sn * sn - 1.0).abs() < 1e-12);
            }
        }

        // sn reaches 1 at the quarter period
        let m = 0.7;
        let (sn, cn, _) = ellipj(ellipk(m), m);
        assert!((sn - 1.0).abs() < 1e-12);
        assert!(cn.abs() < 1e-7);

        let (sn, cn, dn) = ellipj(0.8, 1.0);
        assert!((sn - 0.8f64.tanh()).abs() < 1e-15);
        assert!((cn - dn).abs() < 1e-15);
    }

    #[test]
    fn test_arc_jac_sc1_inverts_sc() {
        for &m in &[0.01, 0.3, 0.8] {
            for &w in &[0.1, 1.0, 5.0] {
                let z = arc_jac_sc1(w, m).unwrap();
                let (sn, cn, _) = ellipj(z, 1.0 - m);
                assert!((sn / cn - w).abs() < 1e-9 * w.max(1.0));
            }
        }
    }

    #[test]
    fn test_ellipdeg_identity_for_first_order() {
        // An order-1 design has selectivity equal to its discrimination
        for &m in &[1e-4, 0.01, 0.2] {
            assert!((ellipdeg(1, m) - m).abs() < 1e-10 * m.max(1e-3));
        }
        // Higher orders widen the transition band ratio towards 1
        assert!(ellipdeg(4, 1e-4) > ellipdeg(2, 1e-4));
    }
}
