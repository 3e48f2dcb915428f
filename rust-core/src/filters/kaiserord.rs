//! Kaiser-window FIR order estimation
//!
//! Given a piecewise-constant amplitude specification, picks the filter type,
//! normalized cutoffs, Kaiser β and filter order for a windowed-sinc design
//! using Kaiser's empirical formulas:
//!
//! ```text
//! A    = -20·log10(δ)
//! β    = 0.1102·(A - 8.7)                          A > 50
//!        0.5842·(A - 21)^0.4 + 0.07886·(A - 21)     21 < A <= 50
//!        0                                        otherwise
//! n    = ceil((A - 8) / (2.285·Δω))
//! ```

use super::design::{fir1, TransferFunction};
use super::windows::WindowType;
use crate::args::{FilterType, Frequency};
use crate::error::{Result, ValidationError};
use std::f64::consts::PI;

/// Sample rate at which band edges are normalized to [0, 1]
pub const DEFAULT_FS: f64 = 2.0;

/// Parameters for a Kaiser-window FIR design
#[derive(Debug, Clone, PartialEq)]
pub struct KaiserResult {
    /// Filter order (number of taps minus one)
    pub order: usize,

    /// Cutoff frequencies, normalized so that 1 is Nyquist
    pub band_edges: Frequency,

    /// Kaiser window shape parameter
    pub beta: f64,

    /// Band layout implied by the amplitudes, passed to `fir1` as `ftype`
    pub filter_type: FilterType,
}

impl KaiserResult {
    /// Kaiser window with this result's β
    pub fn window(&self) -> WindowType {
        WindowType::Kaiser(self.beta)
    }

    /// Synthesize the filter these parameters describe (`fir1` with a Kaiser
    /// window and unity gain scaling).
    pub fn design(&self) -> Result<TransferFunction> {
        fir1(
            self.order,
            &self.band_edges,
            Some(self.filter_type),
            self.window(),
            true,
        )
    }
}

/// Kaiser β for a stopband attenuation of `attenuation_db` (positive dB).
pub fn kaiser_beta(attenuation_db: f64) -> f64 {
    if attenuation_db > 50.0 {
        0.1102 * (attenuation_db - 8.7)
    } else if attenuation_db > 21.0 {
        0.5842 * (attenuation_db - 21.0).powf(0.4) + 0.07886 * (attenuation_db - 21.0)
    } else {
        0.0
    }
}

/// Estimate Kaiser-window FIR parameters.
///
/// # Arguments
/// * `f` - Band edges, `2*len(a) - 2` values in `[0, fs/2]`
/// * `a` - Desired amplitude of each band; pass and stop bands alternate
/// * `dev` - Maximum deviation, one value or one per band; the smallest
///   governs the design
/// * `fs` - Sample rate of `f` ([`DEFAULT_FS`] for normalized edges)
///
/// # Returns
/// Order, normalized band edges, β and filter type. The order is even whenever
/// the last band is a passband, so the `order + 1` taps stay odd.
pub fn kaiserord(f: &[f64], a: &[f64], dev: &[f64], fs: f64) -> Result<KaiserResult> {
    if a.len() < 2 {
        return Err(ValidationError::TooFewBands(a.len()));
    }
    let expected = 2 * a.len() - 2;
    if f.len() != expected {
        return Err(ValidationError::BandLengthMismatch {
            expected,
            found: f.len(),
        });
    }
    if a.windows(3).any(|w| w[0] != w[2]) || a[0] == a[1] {
        return Err(ValidationError::NonAlternatingAmplitudes);
    }
    if dev.len() != 1 && dev.len() != a.len() {
        return Err(ValidationError::DeviationLengthMismatch {
            bands: a.len(),
            found: dev.len(),
        });
    }
    if !(fs > 0.0 && fs.is_finite()) {
        return Err(ValidationError::OutOfRange {
            name: "fs",
            range: "0 < fs < inf",
            value: fs,
        });
    }
    if let Some(&edge) = f.iter().find(|&&edge| !(edge >= 0.0 && edge <= fs / 2.0)) {
        return Err(ValidationError::OutOfRange {
            name: "f",
            range: "0 <= f <= fs/2",
            value: edge,
        });
    }
    // Zero-width or reversed transitions have no finite order
    if f.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ValidationError::NotIncreasing("f"));
    }
    if let Some(&d) = dev.iter().find(|d| !d.is_finite()) {
        return Err(ValidationError::OutOfRange {
            name: "dev",
            range: "finite",
            value: d,
        });
    }

    let delta = dev.iter().copied().fold(f64::INFINITY, f64::min);
    if !(delta > 0.0) {
        return Err(ValidationError::NonPositiveDeviation(delta));
    }

    let edges: Vec<f64> = f.chunks_exact(2).map(|pair| (pair[0] + pair[1]) / fs).collect();

    let falling = a[0] > a[1];
    let filter_type = match (edges.len(), falling) {
        (1, true) => FilterType::Low,
        (1, false) => FilterType::High,
        (2, true) => FilterType::Stop,
        (2, false) => FilterType::Bandpass,
        (_, true) => FilterType::Dc1,
        (_, false) => FilterType::Dc0,
    };

    let attenuation = -20.0 * delta.log10();
    let beta = kaiser_beta(attenuation);

    let min_gap = f
        .chunks_exact(2)
        .map(|pair| pair[1] - pair[0])
        .fold(f64::INFINITY, f64::min);
    let width = 2.0 * PI * min_gap / fs;

    // Below 8 dB the estimate is not positive; a single tap pair suffices
    let mut order = ((attenuation - 8.0) / (2.285 * width)).ceil().max(1.0) as usize;

    // Last band is a passband: keep the order even so the taps are odd
    if falling == (edges.len() % 2 == 0) && order % 2 == 1 {
        order += 1;
    }

    log::debug!(
        "kaiserord: A = {:.3} dB, beta = {:.6}, order = {}, type = {}",
        attenuation,
        beta,
        order,
        filter_type
    );

    let band_edges = match edges.as_slice() {
        [w] => Frequency::Scalar(*w),
        _ => Frequency::Sequence(edges),
    };

    Ok(KaiserResult {
        order,
        band_edges,
        beta,
        filter_type,
    })
}
