//! IIR filter design
//!
//! Butterworth, Chebyshev and elliptic designs go through the classic pipeline:
//!
//! 1. Normalized analog lowpass prototype (zeros, poles, gain)
//! 2. Frequency transform to the requested band layout
//! 3. Bilinear transform (digital designs only, with pre-warping)
//! 4. Expansion into numerator / denominator polynomials

use super::design::TransferFunction;
use crate::args::{resolve_iir_type, validate_digital, Domain, FilterType, Frequency};
use crate::error::{Result, ValidationError};
use crate::polynomial::poly;
use crate::special;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Zero-pole-gain representation
#[derive(Debug, Clone, PartialEq)]
pub struct Zpk {
    pub zeros: Vec<Complex64>,
    pub poles: Vec<Complex64>,
    pub gain: f64,
}

impl Zpk {
    /// Relative degree (poles minus zeros)
    fn degree(&self) -> usize {
        self.poles.len().saturating_sub(self.zeros.len())
    }

    /// Expand into transfer function coefficients
    pub fn to_tf(&self) -> TransferFunction {
        let b = poly(&self.zeros).iter().map(|c| self.gain * c.re).collect();
        let a = poly(&self.poles).iter().map(|c| c.re).collect();
        TransferFunction::new(b, a)
    }
}

fn product(values: &[Complex64], f: impl Fn(Complex64) -> Complex64) -> Complex64 {
    values
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &v| acc * f(v))
}

/// Butterworth analog lowpass prototype with cutoff 1 rad/s
pub fn buttap(n: usize) -> Zpk {
    let poles = (0..n)
        .map(|i| {
            let m = 2.0 * i as f64 - n as f64 + 1.0;
            -Complex64::from_polar(1.0, PI * m / (2.0 * n as f64))
        })
        .collect();

    Zpk {
        zeros: Vec::new(),
        poles,
        gain: 1.0,
    }
}

/// Chebyshev type I analog lowpass prototype with `rp` dB of passband ripple
pub fn cheb1ap(n: usize, rp: f64) -> Zpk {
    if n == 0 {
        // Only DC gain remains
        return Zpk {
            zeros: Vec::new(),
            poles: Vec::new(),
            gain: 10f64.powf(-rp / 20.0),
        };
    }

    let eps = (10f64.powf(0.1 * rp) - 1.0).sqrt();
    let mu = (1.0 / eps).asinh() / n as f64;

    let poles: Vec<Complex64> = (0..n)
        .map(|i| {
            let m = 2.0 * i as f64 - n as f64 + 1.0;
            let theta = PI * m / (2.0 * n as f64);
            -(Complex64::new(mu, theta)).sinh()
        })
        .collect();

    let mut gain = product(&poles, |p| -p).re;
    if n % 2 == 0 {
        gain /= (1.0 + eps * eps).sqrt();
    }

    Zpk {
        zeros: Vec::new(),
        poles,
        gain,
    }
}

/// Chebyshev type II analog lowpass prototype with the stopband `rs` dB down
pub fn cheb2ap(n: usize, rs: f64) -> Zpk {
    if n == 0 {
        return Zpk {
            zeros: Vec::new(),
            poles: Vec::new(),
            gain: 1.0,
        };
    }

    let de = 1.0 / (10f64.powf(0.1 * rs) - 1.0).sqrt();
    let mu = (1.0 / de).asinh() / n as f64;

    // Zeros on the imaginary axis; the middle one is at infinity for odd n
    let zeros: Vec<Complex64> = (0..n)
        .map(|i| 2.0 * i as f64 - n as f64 + 1.0)
        .filter(|&m| n % 2 == 0 || m != 0.0)
        .map(|m| {
            let z = Complex64::new(0.0, 1.0 / (PI * m / (2.0 * n as f64)).sin());
            -z.conj()
        })
        .collect();

    let poles: Vec<Complex64> = buttap(n)
        .poles
        .into_iter()
        .map(|p| {
            let warped = Complex64::new(mu.sinh() * p.re, mu.cosh() * p.im);
            1.0 / warped
        })
        .collect();

    let gain = (product(&poles, |p| -p) / product(&zeros, |z| -z)).re;

    Zpk { zeros, poles, gain }
}

/// Elliptic (Cauer) analog lowpass prototype with `rp` dB of passband ripple
/// and the stopband `rs` dB down. The passband edge is at 1 rad/s.
pub fn ellipap(n: usize, rp: f64, rs: f64) -> Result<Zpk> {
    if n == 0 {
        return Ok(Zpk {
            zeros: Vec::new(),
            poles: Vec::new(),
            gain: 10f64.powf(-rp / 20.0),
        });
    }

    let eps_sq = 10f64.powf(0.1 * rp) - 1.0;
    if n == 1 {
        let p = -(1.0 / eps_sq).sqrt();
        return Ok(Zpk {
            zeros: Vec::new(),
            poles: vec![Complex64::new(p, 0.0)],
            gain: -p,
        });
    }

    // Discrimination and the matching selectivity
    let ck1_sq = eps_sq / (10f64.powf(0.1 * rs) - 1.0);
    let m = special::ellipdeg(n, ck1_sq);
    let capk = special::ellipk(m);

    let points: Vec<(f64, f64, f64)> = (1 - n % 2..n)
        .step_by(2)
        .map(|j| special::ellipj(j as f64 * capk / n as f64, m))
        .collect();

    let mut zeros: Vec<Complex64> = points
        .iter()
        .filter(|(s, _, _)| s.abs() > f64::EPSILON)
        .map(|(s, _, _)| Complex64::new(0.0, 1.0 / (m.sqrt() * s)))
        .collect();
    let conjugates: Vec<Complex64> = zeros.iter().map(|z| z.conj()).collect();
    zeros.extend(conjugates);

    let r = special::arc_jac_sc1(1.0 / eps_sq.sqrt(), ck1_sq)?;
    let v0 = capk * r / (n as f64 * special::ellipk(ck1_sq));
    let (sv, cv, dv) = special::ellipj(v0, 1.0 - m);

    let mut poles: Vec<Complex64> = points
        .iter()
        .map(|&(s, c, d)| -Complex64::new(c * d * sv * cv, s * dv) / (1.0 - (d * sv).powi(2)))
        .collect();

    // Odd orders keep their single real pole unmirrored
    let norm = poles.iter().map(|p| p.norm_sqr()).sum::<f64>().sqrt();
    let mirrored: Vec<Complex64> = poles
        .iter()
        .filter(|p| n % 2 == 0 || p.im.abs() > f64::EPSILON * norm)
        .map(|p| p.conj())
        .collect();
    poles.extend(mirrored);

    let mut gain = (product(&poles, |p| -p) / product(&zeros, |z| -z)).re;
    if n % 2 == 0 {
        gain /= (1.0 + eps_sq).sqrt();
    }

    Ok(Zpk { zeros, poles, gain })
}

/// Lowpass to lowpass with cutoff `wo`
pub fn lp2lp_zpk(proto: &Zpk, wo: f64) -> Zpk {
    let degree = proto.degree();
    Zpk {
        zeros: proto.zeros.iter().map(|&z| z * wo).collect(),
        poles: proto.poles.iter().map(|&p| p * wo).collect(),
        gain: proto.gain * wo.powi(degree as i32),
    }
}

/// Lowpass to highpass with cutoff `wo`
pub fn lp2hp_zpk(proto: &Zpk, wo: f64) -> Zpk {
    let degree = proto.degree();

    let mut zeros: Vec<Complex64> = proto.zeros.iter().map(|&z| wo / z).collect();
    let poles: Vec<Complex64> = proto.poles.iter().map(|&p| wo / p).collect();
    zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));

    let gain = proto.gain * (product(&proto.zeros, |z| -z) / product(&proto.poles, |p| -p)).re;

    Zpk { zeros, poles, gain }
}

fn split_band(points: &[Complex64], scale: impl Fn(Complex64) -> Complex64, wo: f64) -> Vec<Complex64> {
    let scaled: Vec<Complex64> = points.iter().map(|&x| scale(x)).collect();
    let offsets: Vec<Complex64> = scaled.iter().map(|&x| (x * x - wo * wo).sqrt()).collect();

    scaled
        .iter()
        .zip(offsets.iter())
        .map(|(&x, &d)| x + d)
        .chain(scaled.iter().zip(offsets.iter()).map(|(&x, &d)| x - d))
        .collect()
}

/// Lowpass to bandpass centred at `wo` with bandwidth `bw`
pub fn lp2bp_zpk(proto: &Zpk, wo: f64, bw: f64) -> Zpk {
    let degree = proto.degree();

    let mut zeros = split_band(&proto.zeros, |z| z * bw / 2.0, wo);
    let poles = split_band(&proto.poles, |p| p * bw / 2.0, wo);
    zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));

    Zpk {
        zeros,
        poles,
        gain: proto.gain * bw.powi(degree as i32),
    }
}

/// Lowpass to bandstop centred at `wo` with bandwidth `bw`
pub fn lp2bs_zpk(proto: &Zpk, wo: f64, bw: f64) -> Zpk {
    let degree = proto.degree();

    let mut zeros = split_band(&proto.zeros, |z| (bw / 2.0) / z, wo);
    let poles = split_band(&proto.poles, |p| (bw / 2.0) / p, wo);
    zeros.extend(std::iter::repeat(Complex64::new(0.0, wo)).take(degree));
    zeros.extend(std::iter::repeat(Complex64::new(0.0, -wo)).take(degree));

    let gain = proto.gain * (product(&proto.zeros, |z| -z) / product(&proto.poles, |p| -p)).re;

    Zpk { zeros, poles, gain }
}

/// Bilinear transform `s = 2·fs·(z - 1)/(z + 1)`
///
/// Zeros at infinity map to z = -1.
pub fn bilinear_zpk(analog: &Zpk, fs: f64) -> Zpk {
    let degree = analog.degree();
    let fs2 = 2.0 * fs;

    let mut zeros: Vec<Complex64> = analog.zeros.iter().map(|&z| (fs2 + z) / (fs2 - z)).collect();
    let poles: Vec<Complex64> = analog.poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();
    zeros.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(degree));

    let gain = analog.gain
        * (product(&analog.zeros, |z| fs2 - z) / product(&analog.poles, |p| fs2 - p)).re;

    Zpk { zeros, poles, gain }
}

fn check_order(n: usize) -> Result<()> {
    if n == 0 {
        return Err(ValidationError::InvalidParameter {
            name: "n",
            reason: "filter order must be at least 1".into(),
        });
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if !(value > 0.0) {
        return Err(ValidationError::OutOfRange {
            name,
            range: "> 0",
            value,
        });
    }
    Ok(())
}

/// Transform a lowpass prototype to the requested band layout and domain
fn iir_filter(proto: Zpk, wn: &Frequency, ftype: Option<FilterType>, domain: Domain) -> Result<Zpk> {
    let ftype = resolve_iir_type(wn, ftype)?;

    if domain.sample_rate().is_some() {
        validate_digital(wn)?;
    }
    // A zero edge collapses the frequency transform
    for &w in wn.as_slice() {
        check_positive("Wn", w)?;
    }
    if wn.as_slice().windows(2).any(|w| w[1] <= w[0]) {
        return Err(ValidationError::NotIncreasing("Wn"));
    }

    // Pre-warp so the digital cutoffs land where requested
    let warped: Vec<f64> = match domain.sample_rate() {
        Some(fs) => wn
            .as_slice()
            .iter()
            .map(|&w| 2.0 * fs * (PI * w / fs).tan())
            .collect(),
        None => wn.as_slice().to_vec(),
    };

    let analog = match (ftype, warped.as_slice()) {
        (FilterType::Low, &[wo]) => lp2lp_zpk(&proto, wo),
        (FilterType::High, &[wo]) => lp2hp_zpk(&proto, wo),
        (FilterType::Bandpass, &[lo, hi]) => lp2bp_zpk(&proto, (lo * hi).sqrt(), hi - lo),
        (FilterType::Stop, &[lo, hi]) => lp2bs_zpk(&proto, (lo * hi).sqrt(), hi - lo),
        (t, _) => {
            return Err(ValidationError::IncompatibleFilterType {
                ftype: t.to_string(),
                len: wn.len(),
            })
        }
    };

    log::debug!(
        "iir design: {} {} with {} poles",
        ftype,
        if domain.is_analog() { "analog" } else { "digital" },
        analog.poles.len()
    );

    Ok(match domain.sample_rate() {
        Some(fs) => bilinear_zpk(&analog, fs),
        None => analog,
    })
}

/// Butterworth filter
///
/// # Arguments
/// * `n` - Filter order (band designs have order `2n`)
/// * `wn` - Cutoff frequency or band edges; normalized to (0, 1) for digital
///   designs, rad/s for analog ones
/// * `ftype` - `low`, `high`, `bandpass` or `stop` (`None` picks low or
///   bandpass from the shape of `wn`)
/// * `domain` - Digital or analog design
pub fn butter(n: usize, wn: &Frequency, ftype: Option<FilterType>, domain: Domain) -> Result<TransferFunction> {
    check_order(n)?;
    Ok(iir_filter(buttap(n), wn, ftype, domain)?.to_tf())
}

/// Chebyshev type I filter with `rp` dB of peak-to-peak passband ripple
pub fn cheby1(
    n: usize,
    rp: f64,
    wp: &Frequency,
    ftype: Option<FilterType>,
    domain: Domain,
) -> Result<TransferFunction> {
    check_order(n)?;
    check_positive("Rp", rp)?;
    Ok(iir_filter(cheb1ap(n, rp), wp, ftype, domain)?.to_tf())
}

/// Chebyshev type II filter with the stopband `rs` dB below the passband
pub fn cheby2(
    n: usize,
    rs: f64,
    ws: &Frequency,
    ftype: Option<FilterType>,
    domain: Domain,
) -> Result<TransferFunction> {
    check_order(n)?;
    check_positive("Rs", rs)?;
    Ok(iir_filter(cheb2ap(n, rs), ws, ftype, domain)?.to_tf())
}

/// Elliptic filter with `rp` dB of passband ripple and at least `rs` dB of
/// stopband attenuation. `wp` gives the passband edge(s).
pub fn ellip(
    n: usize,
    rp: f64,
    rs: f64,
    wp: &Frequency,
    ftype: Option<FilterType>,
    domain: Domain,
) -> Result<TransferFunction> {
    check_order(n)?;
    check_positive("Rp", rp)?;
    if !(rs > rp) {
        return Err(ValidationError::OutOfRange {
            name: "Rs",
            range: "Rs > Rp",
            value: rs,
        });
    }
    Ok(iir_filter(ellipap(n, rp, rs)?, wp, ftype, domain)?.to_tf())
}

/// Shared notch / peak design. Returns `(gain, a)`.
fn second_order_section(w0: f64, bw: f64) -> Result<(f64, Vec<f64>)> {
    if !(w0 > 0.0 && w0 < 1.0) {
        return Err(ValidationError::OutOfRange {
            name: "w0",
            range: "0 < w0 < 1",
            value: w0,
        });
    }
    check_positive("bw", bw)?;

    // -3 dB bandwidth
    let beta = (bw * PI / 2.0).tan();
    let gain = 1.0 / (1.0 + beta);
    let a = vec![1.0, -2.0 * gain * (w0 * PI).cos(), 2.0 * gain - 1.0];
    Ok((gain, a))
}

/// Second-order notch at `w0` with -3 dB bandwidth `bw` (quality factor
/// `Q = w0 / bw`)
pub fn iirnotch(w0: f64, bw: f64) -> Result<TransferFunction> {
    let (gain, a) = second_order_section(w0, bw)?;
    let b = vec![gain, -2.0 * gain * (w0 * PI).cos(), gain];
    Ok(TransferFunction::new(b, a))
}

/// Second-order resonator peaking at `w0` with -3 dB bandwidth `bw`
pub fn iirpeak(w0: f64, bw: f64) -> Result<TransferFunction> {
    let (gain, a) = second_order_section(w0, bw)?;
    let b = vec![1.0 - gain, 0.0, gain - 1.0];
    Ok(TransferFunction::new(b, a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::roots;
    use crate::spectrum::analysis::response_at;

    fn gain(tf: &TransferFunction, w: f64) -> f64 {
        response_at(&tf.b, &tf.a, &[w * PI])[0].norm()
    }

    fn analog_gain(tf: &TransferFunction, w: f64) -> f64 {
        let s = Complex64::new(0.0, w);
        let eval = |p: &[f64]| p.iter().fold(Complex64::new(0.0, 0.0), |acc, &c| acc * s + c);
        (eval(&tf.b) / eval(&tf.a)).norm()
    }

    fn stable(tf: &TransferFunction) -> bool {
        roots(&tf.a).iter().all(|p| p.norm() < 1.0)
    }

    #[test]
    fn test_butter_second_order_lowpass() {
        // Known coefficients for a 2nd-order lowpass at half Nyquist
        let tf = butter(2, &Frequency::Scalar(0.5), None, Domain::Digital).unwrap();
        let b = [0.29289321881345254, 0.5857864376269051, 0.29289321881345254];
        let a = [1.0, 0.0, 0.17157287525380996];

        for (x, y) in tf.b.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-12);
        }
        for (x, y) in tf.a.iter().zip(a.iter()) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_butter_half_power_at_cutoff() {
        for n in 1..=8 {
            let tf = butter(n, &Frequency::Scalar(0.3), None, Domain::Digital).unwrap();
            assert_eq!(tf.a.len(), n + 1);
            assert!((gain(&tf, 0.0) - 1.0).abs() < 1e-9);
            assert!((gain(&tf, 0.3) - 0.5f64.sqrt()).abs() < 1e-9);
            assert!(stable(&tf));
        }
    }

    #[test]
    fn test_butter_highpass() {
        let tf = butter(4, &Frequency::Scalar(0.4), Some(FilterType::High), Domain::Digital).unwrap();
        assert!(gain(&tf, 0.0) < 1e-9);
        assert!((gain(&tf, 1.0) - 1.0).abs() < 1e-9);
        assert!((gain(&tf, 0.4) - 0.5f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_butter_bandpass_and_stop() {
        let band = Frequency::Sequence(vec![0.2, 0.4]);

        let bp = butter(3, &band, None, Domain::Digital).unwrap();
        assert_eq!(bp.a.len(), 7);
        assert!(gain(&bp, 0.0) < 1e-9);
        assert!(gain(&bp, 1.0) < 1e-9);
        assert!((gain(&bp, 0.2) - 0.5f64.sqrt()).abs() < 1e-9);
        assert!((gain(&bp, 0.4) - 0.5f64.sqrt()).abs() < 1e-9);
        assert!(stable(&bp));

        let bs = butter(3, &band, Some(FilterType::Stop), Domain::Digital).unwrap();
        assert!((gain(&bs, 0.0) - 1.0).abs() < 1e-9);
        assert!((gain(&bs, 1.0) - 1.0).abs() < 1e-9);
        assert!((gain(&bs, 0.2) - 0.5f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_butter_analog() {
        let tf = butter(3, &Frequency::Scalar(10.0), None, Domain::Analog).unwrap();
        // 1 / (s³ + 2ωs² + 2ω²s + ω³)
        assert!((tf.b[0] - 1000.0).abs() < 1e-9);
        let a = [1.0, 20.0, 200.0, 1000.0];
        for (x, y) in tf.a.iter().zip(a.iter()) {
            assert!((x - y).abs() < 1e-9);
        }
        assert!((analog_gain(&tf, 10.0) - 0.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_cheby1_ripple_at_passband_edge() {
        let rp = 1.0;
        let edge = 10f64.powf(-rp / 20.0);

        for n in [3, 4] {
            let tf = cheby1(n, rp, &Frequency::Scalar(0.4), None, Domain::Digital).unwrap();
            assert!((gain(&tf, 0.4) - edge).abs() < 1e-9);
            assert!(stable(&tf));
        }

        // Odd order passes DC at unity, even order at the ripple floor
        let odd = cheby1(3, rp, &Frequency::Scalar(0.4), None, Domain::Digital).unwrap();
        let even = cheby1(4, rp, &Frequency::Scalar(0.4), None, Domain::Digital).unwrap();
        assert!((gain(&odd, 0.0) - 1.0).abs() < 1e-9);
        assert!((gain(&even, 0.0) - edge).abs() < 1e-9);
    }

    #[test]
    fn test_cheby2_attenuation_at_stopband_edge() {
        let rs = 40.0;
        let edge = 10f64.powf(-rs / 20.0);

        for n in [3, 4, 5] {
            let tf = cheby2(n, rs, &Frequency::Scalar(0.3), None, Domain::Digital).unwrap();
            assert!((gain(&tf, 0.0) - 1.0).abs() < 1e-9);
            assert!((gain(&tf, 0.3) - edge).abs() < 1e-9);
            assert!(stable(&tf));
        }

        let hp = cheby2(4, rs, &Frequency::Scalar(0.3), Some(FilterType::High), Domain::Digital).unwrap();
        assert!((gain(&hp, 1.0) - 1.0).abs() < 1e-9);
        assert!((gain(&hp, 0.3) - edge).abs() < 1e-9);
    }

    #[test]
    fn test_iir_validation() {
        let wn = Frequency::Scalar(0.3);
        assert!(butter(0, &wn, None, Domain::Digital).is_err());
        assert!(butter(2, &Frequency::Scalar(1.0), None, Domain::Digital).is_err());
        assert!(butter(2, &Frequency::Scalar(0.0), None, Domain::Digital).is_err());
        assert!(butter(2, &Frequency::Sequence(vec![0.4, 0.2]), None, Domain::Digital).is_err());
        assert!(butter(2, &wn, Some(FilterType::Stop), Domain::Digital).is_err());
        assert!(butter(2, &Frequency::Sequence(vec![0.1, 0.2, 0.3]), None, Domain::Digital).is_err());
        assert!(butter(2, &Frequency::Scalar(-1.0), None, Domain::Analog).is_err());
        assert!(cheby1(2, 0.0, &wn, None, Domain::Digital).is_err());
        assert!(cheby2(2, -3.0, &wn, None, Domain::Digital).is_err());
    }

    #[test]
    fn test_iirnotch() {
        let tf = iirnotch(0.5, 0.1).unwrap();
        assert_eq!(tf.b.len(), 3);
        assert!(gain(&tf, 0.5) < 1e-12);
        assert!((gain(&tf, 0.0) - 1.0).abs() < 1e-12);
        assert!((gain(&tf, 1.0) - 1.0).abs() < 1e-12);
        assert!(stable(&tf));
    }

    #[test]
    fn test_iirpeak() {
        let tf = iirpeak(0.3, 0.05).unwrap();
        assert!((gain(&tf, 0.3) - 1.0).abs() < 1e-12);
        assert!(gain(&tf, 0.0) < 1e-12);
        assert!(gain(&tf, 1.0) < 1e-12);

        assert!(iirpeak(1.0, 0.1).is_err());
        assert!(iirnotch(0.5, 0.0).is_err());
    }

    #[test]
    fn test_ellipap_edges() {
        let (rp, rs) = (1.0, 40.0);
        let ck1_sq = (10f64.powf(0.1 * rp) - 1.0) / (10f64.powf(0.1 * rs) - 1.0);

        for n in 1..=6 {
            let tf = ellipap(n, rp, rs).unwrap().to_tf();
            let dc = if n % 2 == 1 { 1.0 } else { 10f64.powf(-rp / 20.0) };
            assert!((analog_gain(&tf, 0.0) - dc).abs() < 1e-9);
            assert!((analog_gain(&tf, 1.0) - 10f64.powf(-rp / 20.0)).abs() < 1e-9);

            if n > 1 {
                // Equiripple stopband starts at 1/sqrt(m)
                let ws = 1.0 / special::ellipdeg(n, ck1_sq).sqrt();
                let floor = 10f64.powf(-rs / 20.0) * (1.0 + 1e-6);
                for i in 0..200 {
                    assert!(analog_gain(&tf, ws * (1.0 + 0.05 * i as f64)) <= floor);
                }
            }
        }

        let z = ellipap(5, rp, rs).unwrap();
        assert_eq!(z.zeros.len(), 4);
        assert_eq!(z.poles.len(), 5);
        assert!(z.poles.iter().all(|p| p.re < 0.0));
    }

    #[test]
    fn test_ellip_digital() {
        let (rp, rs) = (3.0, 60.0);
        let tf = ellip(4, rp, rs, &Frequency::Scalar(0.08), None, Domain::Digital).unwrap();
        assert!((gain(&tf, 0.08) - 10f64.powf(-rp / 20.0)).abs() < 1e-9);
        for i in 0..=70 {
            assert!(gain(&tf, 0.3 + 0.01 * i as f64) <= 10f64.powf(-rs / 20.0) * (1.0 + 1e-6));
        }
        assert!(stable(&tf));

        let band = Frequency::Sequence(vec![0.2, 0.4]);
        let bp = ellip(3, 1.0, 40.0, &band, None, Domain::Digital).unwrap();
        assert_eq!(bp.a.len(), 7);
        assert!((gain(&bp, 0.2) - 10f64.powf(-1.0 / 20.0)).abs() < 1e-9);
        assert!((gain(&bp, 0.4) - 10f64.powf(-1.0 / 20.0)).abs() < 1e-9);
        assert!((gain(&bp, 0.3) - 1.0).abs() < 0.12);
        assert!(stable(&bp));

        let hp = ellip(5, 0.5, 50.0, &Frequency::Scalar(0.6), Some(FilterType::High), Domain::Digital).unwrap();
        assert!((gain(&hp, 1.0) - 1.0).abs() < 1e-9);
        assert!(gain(&hp, 0.0) < 10f64.powf(-50.0 / 20.0));
    }

    #[test]
    fn test_ellip_validation() {
        let wp = Frequency::Scalar(0.3);
        assert!(ellip(0, 1.0, 40.0, &wp, None, Domain::Digital).is_err());
        assert!(ellip(3, 0.0, 40.0, &wp, None, Domain::Digital).is_err());
        assert!(ellip(3, 3.0, 3.0, &wp, None, Domain::Digital).is_err());
        assert!(ellip(3, 1.0, 40.0, &Frequency::Scalar(1.2), None, Domain::Digital).is_err());
    }

    #[test]
    fn test_prototype_orders() {
        assert_eq!(buttap(5).poles.len(), 5);
        assert_eq!(cheb2ap(5, 30.0).zeros.len(), 4);
        assert_eq!(cheb2ap(4, 30.0).zeros.len(), 4);
        assert!(buttap(6).poles.iter().all(|p| (p.norm() - 1.0).abs() < 1e-12 && p.re < 0.0));
    }
}
