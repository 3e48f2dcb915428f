//! FFT engine for evaluating coefficient polynomials on the unit circle
//!
//! The zero-padded DFT of `c[n]` at bin `k` equals `C(e^{jω_k})` with
//! `ω_k = 2πk/N`, which is what `freqz` samples.

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Forward complex FFT with reusable buffers
pub struct FftEngine {
    /// FFT size (number of bins around the full circle)
    fft_size: usize,

    fft: Arc<dyn Fft<f64>>,

    /// Reusable in-place buffer
    buffer: Vec<Complex64>,

    scratch: Vec<Complex64>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of bins)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex64::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            fft_size,
            fft,
            buffer: vec![Complex64::new(0.0, 0.0); fft_size],
            scratch,
        }
    }

    /// Whether a coefficient vector fits without wrapping around
    pub fn fits(&self, coeffs: &[f64]) -> bool {
        coeffs.len() <= self.fft_size
    }

    /// Evaluate `Σ c[n]·e^{-jω_k n}` at every bin
    ///
    /// # Arguments
    /// * `coeffs` - Polynomial coefficients, zero-padded to the FFT size.
    ///   Must not be longer than the FFT (see [`FftEngine::fits`])
    ///
    /// # Returns
    /// One value per bin, `k = 0..fft_size`
    pub fn evaluate(&mut self, coeffs: &[f64]) -> Vec<Complex64> {
        debug_assert!(self.fits(coeffs));

        self.buffer.fill(Complex64::new(0.0, 0.0));
        for (slot, &c) in self.buffer.iter_mut().zip(coeffs.iter()) {
            *slot = Complex64::new(c, 0.0);
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);
        self.buffer.clone()
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_moving_sum_dc() {
        let mut fft = FftEngine::new(1024);

        let spectrum = fft.evaluate(&vec![1.0; 100]);
        assert_eq!(spectrum.len(), 1024);

        // DC bin is the coefficient sum
        assert!((spectrum[0].re - 100.0).abs() < 1e-9);
        assert!(spectrum[0].im.abs() < 1e-9);
    }

    #[test]
    fn test_unit_delay_is_phase_ramp() {
        let mut fft = FftEngine::new(64);
        let spectrum = fft.evaluate(&[0.0, 1.0]);

        for (k, value) in spectrum.iter().enumerate() {
            let w = 2.0 * PI * k as f64 / 64.0;
            let expected = Complex64::from_polar(1.0, -w);
            assert!((value - expected).norm() < 1e-12);
        }
    }

    #[test]
    fn test_buffers_are_reused() {
        let mut fft = FftEngine::new(8);
        let _ = fft.evaluate(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let second = fft.evaluate(&[1.0]);
        assert!(second.iter().all(|v| (v - Complex64::new(1.0, 0.0)).norm() < 1e-12));

        assert!(fft.fits(&[0.0; 8]));
        assert!(!fft.fits(&[0.0; 9]));
    }
}
