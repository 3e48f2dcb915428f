//! Minimum-order estimates for IIR designs
//!
//! Given passband / stopband edges with `rp` dB of allowed passband loss and
//! `rs` dB of required stopband attenuation, each estimator returns the
//! lowest order meeting the requirements plus the natural frequency to pass
//! to the matching designer (`butter`, `cheby1`, `cheby2`, `ellip`).
//!
//! The band layout follows from the edges:
//!
//! | `Wp` vs `Ws` | layout |
//! |---|---|
//! | `Wp < Ws` | low |
//! | `Wp > Ws` | high |
//! | `Ws[0] < Wp[0] < Wp[1] < Ws[1]` | bandpass |
//! | `Wp[0] < Ws[0] < Ws[1] < Wp[1]` | stop |

use crate::args::{Domain, FilterType, Frequency};
use crate::error::{Result, ValidationError};
use crate::special::{ellipk, ellipkm1};
use std::f64::consts::PI;

/// Estimated order and natural frequency
#[derive(Debug, Clone, PartialEq)]
pub struct IirOrder {
    /// Lowest order meeting the requirements
    pub order: usize,
    /// Natural (cutoff) frequency or band edges for the designer
    pub wn: Frequency,
    /// Band layout implied by the edges, passed to the designer as `ftype`
    pub filter_type: FilterType,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Family {
    Butterworth,
    Chebyshev,
    Elliptic,
}

impl Family {
    /// Fractional order needed for a lowpass prototype with stopband at
    /// `nat` (passband edge at 1)
    fn order(self, nat: f64, rp: f64, rs: f64) -> f64 {
        let ratio = (10f64.powf(0.1 * rs) - 1.0) / (10f64.powf(0.1 * rp) - 1.0);
        match self {
            Family::Butterworth => ratio.log10() / (2.0 * nat.log10()),
            Family::Chebyshev => ratio.sqrt().acosh() / nat.acosh(),
            Family::Elliptic => {
                let sel = (1.0 / nat).powi(2);
                let disc = 1.0 / ratio;
                ellipk(sel) * ellipkm1(disc) / (ellipkm1(sel) * ellipk(disc))
            }
        }
    }
}

/// Validated requirements with edges on the prototype frequency axis
struct Requirements {
    passb: Vec<f64>,
    stopb: Vec<f64>,
    ftype: FilterType,
    rp: f64,
    rs: f64,
    domain: Domain,
}

fn check_edges(name: &'static str, edges: &[f64], domain: Domain) -> Result<()> {
    for &w in edges {
        let ok = match domain {
            Domain::Digital => w > 0.0 && w < 1.0,
            Domain::Analog => w > 0.0 && w.is_finite(),
        };
        if !ok {
            return Err(ValidationError::OutOfRange {
                name,
                range: if domain.is_analog() { "> 0" } else { "0 < W < 1" },
                value: w,
            });
        }
    }
    if edges.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ValidationError::NotIncreasing(name));
    }
    Ok(())
}

impl Requirements {
    fn new(wp: &Frequency, ws: &Frequency, rp: f64, rs: f64, domain: Domain) -> Result<Self> {
        let (wp, ws) = (wp.as_slice(), ws.as_slice());

        if wp.is_empty() || wp.len() > 2 {
            return Err(ValidationError::LengthMismatch {
                name: "Wp",
                expected: 2,
                found: wp.len(),
            });
        }
        if ws.len() != wp.len() {
            return Err(ValidationError::LengthMismatch {
                name: "Ws",
                expected: wp.len(),
                found: ws.len(),
            });
        }
        check_edges("Wp", wp, domain)?;
        check_edges("Ws", ws, domain)?;

        if !(rp > 0.0) {
            return Err(ValidationError::OutOfRange {
                name: "Rp",
                range: "> 0",
                value: rp,
            });
        }
        if !(rs > rp) {
            return Err(ValidationError::OutOfRange {
                name: "Rs",
                range: "Rs > Rp",
                value: rs,
            });
        }

        let ftype = match (wp, ws) {
            (&[p], &[s]) if p < s => FilterType::Low,
            (&[p], &[s]) if p > s => FilterType::High,
            (&[p0, p1], &[s0, s1]) if s0 < p0 && p1 < s1 => FilterType::Bandpass,
            (&[p0, p1], &[s0, s1]) if p0 < s0 && s1 < p1 => FilterType::Stop,
            _ => {
                return Err(ValidationError::InvalidParameter {
                    name: "Ws",
                    reason: "the passband must lie strictly inside the stopband, or the stopband strictly inside the passband".into(),
                })
            }
        };

        // Pre-warp digital edges onto the analog axis
        let warp = |edges: &[f64]| -> Vec<f64> {
            match domain {
                Domain::Digital => edges.iter().map(|&w| (PI * w / 2.0).tan()).collect(),
                Domain::Analog => edges.to_vec(),
            }
        };

        Ok(Requirements {
            passb: warp(wp),
            stopb: warp(ws),
            ftype,
            rp,
            rs,
            domain,
        })
    }

    /// Stopband edge of the equivalent lowpass prototype. For stop designs
    /// the passband edges are first moved inward as far as possible without
    /// raising the order.
    fn natural_frequency(&mut self, family: Family) -> Result<f64> {
        let (p, s) = (&self.passb, &self.stopb);
        let nat = match self.ftype {
            FilterType::Low => s[0] / p[0],
            FilterType::High => p[0] / s[0],
            FilterType::Bandpass => s
                .iter()
                .map(|&w| ((w * w - p[0] * p[1]) / (w * (p[0] - p[1]))).abs())
                .fold(f64::INFINITY, f64::min),
            _ => {
                let (rp, rs) = (self.rp, self.rs);
                let stopb = self.stopb.clone();
                let cost = |p0: f64, p1: f64| family.order(bandstop_nat(&[p0, p1], &stopb), rp, rs);

                let upper = self.passb[1];
                let lo = minimize_bounded(|w| cost(w, upper), self.passb[0], stopb[0] - 1e-12)?;
                self.passb[0] = lo;
                let hi = minimize_bounded(|w| cost(lo, w), stopb[1] + 1e-12, upper)?;
                self.passb[1] = hi;

                bandstop_nat(&self.passb, &stopb)
            }
        };
        Ok(nat.abs())
    }

    /// Map prototype-axis edges back to the caller's frequency axis
    fn unwarp(&self, mut edges: Vec<f64>) -> Result<Frequency> {
        if self.domain == Domain::Digital {
            for w in edges.iter_mut() {
                *w = w.atan() * 2.0 / PI;
            }
        }
        Frequency::from_slice(&edges)
    }

    fn estimate(&self, order: usize, wn: Vec<f64>) -> Result<IirOrder> {
        Ok(IirOrder {
            order,
            wn: self.unwarp(wn)?,
            filter_type: self.ftype,
        })
    }
}

fn bandstop_nat(passb: &[f64], stopb: &[f64]) -> f64 {
    stopb
        .iter()
        .map(|&w| (w * (passb[0] - passb[1]) / (w * w - passb[0] * passb[1])).abs())
        .fold(f64::INFINITY, f64::min)
}

/// Golden-section search for the minimizer of `f` on `[lo, hi]`
fn minimize_bounded(f: impl Fn(f64) -> f64, lo: f64, hi: f64) -> Result<f64> {
    const TOL: f64 = 1e-5;
    const MAX_ITER: usize = 500;

    let inv_phi = (5f64.sqrt() - 1.0) / 2.0;
    let inv_phi2 = 1.0 - inv_phi;

    let (mut a, mut b) = (lo, hi);
    let mut x1 = a + inv_phi2 * (b - a);
    let mut x2 = a + inv_phi * (b - a);
    let mut f1 = f(x1);
    let mut f2 = f(x2);

    for _ in 0..MAX_ITER {
        if b - a < TOL {
            return Ok(0.5 * (a + b));
        }
        if f1 < f2 {
            b = x2;
            x2 = x1;
            f2 = f1;
            x1 = a + inv_phi2 * (b - a);
            f1 = f(x1);
        } else {
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = a + inv_phi * (b - a);
            f2 = f(x2);
        }
    }

    Err(ValidationError::NoConvergence("passband edge search"))
}

fn ceil_order(order: f64) -> usize {
    order.ceil().max(1.0) as usize
}

/// Butterworth order and the -3 dB frequency that meets the passband edge
/// exactly
pub fn buttord(wp: &Frequency, ws: &Frequency, rp: f64, rs: f64, domain: Domain) -> Result<IirOrder> {
    let mut req = Requirements::new(wp, ws, rp, rs, domain)?;
    let nat = req.natural_frequency(Family::Butterworth)?;
    let order = ceil_order(Family::Butterworth.order(nat, rp, rs));

    // Passband edge of the prototype relative to its -3 dB point
    let w0 = (10f64.powf(0.1 * rp) - 1.0).powf(-1.0 / (2.0 * order as f64));
    let p = &req.passb;

    let wn = match req.ftype {
        FilterType::Low => vec![w0 * p[0]],
        FilterType::High => vec![p[0] / w0],
        FilterType::Stop => {
            let d = ((p[1] - p[0]).powi(2) + 4.0 * w0 * w0 * p[0] * p[1]).sqrt();
            let mut wn = vec![
                ((p[1] - p[0] + d) / (2.0 * w0)).abs(),
                ((p[1] - p[0] - d) / (2.0 * w0)).abs(),
            ];
            wn.sort_by(f64::total_cmp);
            wn
        }
        _ => {
            let edge = |w: f64| {
                (-w * (p[1] - p[0]) / 2.0 + (w * w / 4.0 * (p[1] - p[0]).powi(2) + p[0] * p[1]).sqrt()).abs()
            };
            let mut wn = vec![edge(-w0), edge(w0)];
            wn.sort_by(f64::total_cmp);
            wn
        }
    };

    log::debug!("buttord: {} order {}", req.ftype, order);
    req.estimate(order, wn)
}

/// Chebyshev type I order. The natural frequency is the passband edge.
pub fn cheb1ord(wp: &Frequency, ws: &Frequency, rp: f64, rs: f64, domain: Domain) -> Result<IirOrder> {
    let mut req = Requirements::new(wp, ws, rp, rs, domain)?;
    let nat = req.natural_frequency(Family::Chebyshev)?;
    let order = ceil_order(Family::Chebyshev.order(nat, rp, rs));

    log::debug!("cheb1ord: {} order {}", req.ftype, order);
    req.estimate(order, req.passb.clone())
}

/// Chebyshev type II order and the stopband edge frequency for `cheby2`
pub fn cheb2ord(wp: &Frequency, ws: &Frequency, rp: f64, rs: f64, domain: Domain) -> Result<IirOrder> {
    let mut req = Requirements::new(wp, ws, rp, rs, domain)?;
    let nat = req.natural_frequency(Family::Chebyshev)?;

    let v = ((10f64.powf(0.1 * rs) - 1.0) / (10f64.powf(0.1 * rp) - 1.0)).sqrt().acosh();
    let order = ceil_order(v / nat.acosh());

    // Where the order-`order` design reaches `rs`, relative to the passband edge
    let nf = 1.0 / (v / order as f64).cosh();
    let p = &req.passb;

    let wn = match req.ftype {
        FilterType::Low => vec![p[0] / nf],
        FilterType::High => vec![p[0] * nf],
        FilterType::Stop => {
            let n0 = nf / 2.0 * (p[0] - p[1]) + (nf * nf * (p[1] - p[0]).powi(2) / 4.0 + p[1] * p[0]).sqrt();
            vec![n0, p[1] * p[0] / n0]
        }
        _ => {
            let n0 = (p[0] - p[1]) / (2.0 * nf) + ((p[1] - p[0]).powi(2) / (4.0 * nf * nf) + p[1] * p[0]).sqrt();
            vec![n0, p[0] * p[1] / n0]
        }
    };

    log::debug!("cheb2ord: {} order {}", req.ftype, order);
    req.estimate(order, wn)
}

/// Elliptic order. The natural frequency is the passband edge.
pub fn ellipord(wp: &Frequency, ws: &Frequency, rp: f64, rs: f64, domain: Domain) -> Result<IirOrder> {
    let mut req = Requirements::new(wp, ws, rp, rs, domain)?;
    let nat = req.natural_frequency(Family::Elliptic)?;
    let order = ceil_order(Family::Elliptic.order(nat, rp, rs));

    log::debug!("ellipord: {} order {}", req.ftype, order);
    req.estimate(order, req.passb.clone())
}
