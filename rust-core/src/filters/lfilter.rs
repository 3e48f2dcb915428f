//! Rational filter with state management
//!
//! Direct form II transposed: one delay line of `max(len(a), len(b)) - 1`
//! values, updated in place for every sample.

use super::design::TransferFunction;
use crate::error::{Result, ValidationError};

/// Stateful `B(z)/A(z)` filter for sample-by-sample or block processing
#[derive(Debug, Clone)]
pub struct TransferFilter {
    /// Numerator, normalized by `a[0]` and padded to the filter length
    b: Vec<f64>,

    /// Denominator, normalized so `a[0] == 1`
    a: Vec<f64>,

    /// Delay line (length - 1 values)
    state: Vec<f64>,
}

impl TransferFilter {
    /// Create a filter from coefficients
    ///
    /// # Errors
    /// Empty coefficient vectors or `a[0] == 0`.
    pub fn new(b: &[f64], a: &[f64]) -> Result<Self> {
        let (b, a) = normalize(b, a)?;
        let state = vec![0.0; b.len() - 1];
        Ok(Self { b, a, state })
    }

    pub fn from_tf(tf: &TransferFunction) -> Result<Self> {
        Self::new(&tf.b, &tf.a)
    }

    /// Replace the coefficients. The delay line is kept when the filter
    /// length is unchanged and cleared otherwise.
    pub fn update_coefficients(&mut self, b: &[f64], a: &[f64]) -> Result<()> {
        let (b, a) = normalize(b, a)?;
        if b.len() != self.b.len() {
            self.state = vec![0.0; b.len() - 1];
        }
        self.b = b;
        self.a = a;
        Ok(())
    }

    /// Process single sample
    ///
    /// # Arguments
    /// * `input` - Input sample x[n]
    ///
    /// # Returns
    /// Filtered output sample y[n]
    #[inline]
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let order = self.state.len();
        if order == 0 {
            return self.b[0] * input;
        }

        let output = self.b[0] * input + self.state[0];
        for i in 0..order - 1 {
            self.state[i] = self.b[i + 1] * input + self.state[i + 1] - self.a[i + 1] * output;
        }
        self.state[order - 1] = self.b[order] * input - self.a[order] * output;

        output
    }

    /// Process a block of samples
    pub fn process_block(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Process a block in-place
    pub fn process_block_inplace(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Reset filter state (clear delay line)
    pub fn reset(&mut self) {
        self.state.fill(0.0);
    }

    pub fn numerator(&self) -> &[f64] {
        &self.b
    }

    pub fn denominator(&self) -> &[f64] {
        &self.a
    }
}

/// Normalize by `a[0]` and pad both vectors to the same length
fn normalize(b: &[f64], a: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    if b.is_empty() {
        return Err(ValidationError::Empty("b"));
    }
    let a0 = match a.first() {
        Some(&v) => v,
        None => return Err(ValidationError::Empty("a")),
    };
    if a0 == 0.0 {
        return Err(ValidationError::ZeroLeadingCoefficient);
    }

    let len = b.len().max(a.len());
    let mut bn: Vec<f64> = b.iter().map(|&v| v / a0).collect();
    let mut an: Vec<f64> = a.iter().map(|&v| v / a0).collect();
    bn.resize(len, 0.0);
    an.resize(len, 0.0);
    Ok((bn, an))
}

/// Filter a whole signal from rest
pub fn lfilter(b: &[f64], a: &[f64], x: &[f64]) -> Result<Vec<f64>> {
    let mut filter = TransferFilter::new(b, a)?;
    Ok(filter.process_block(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fir_moving_average() {
        let mut filter = TransferFilter::new(&[1.0 / 3.0; 3], &[1.0]).unwrap();

        let output: Vec<f64> = [3.0, 0.0, 0.0, 0.0]
            .iter()
            .map(|&x| filter.process_sample(x))
            .collect();

        for (y, expected) in output.iter().zip([1.0, 1.0, 1.0, 0.0]) {
            assert!((y - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn test_block_processing() {
        let y = lfilter(&[0.5, 0.5], &[1.0], &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let expected = [0.5, 1.5, 2.5, 3.5];
        for (a, b) in y.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn test_one_pole_recursion() {
        // y[n] = x[n] + 0.5 y[n-1]
        let y = lfilter(&[1.0], &[1.0, -0.5], &[1.0, 0.0, 0.0, 0.0]).unwrap();
        let expected = [1.0, 0.5, 0.25, 0.125];
        for (a, b) in y.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_normalizes_by_leading_denominator() {
        let y = lfilter(&[2.0], &[2.0, -1.0], &[1.0, 0.0, 0.0]).unwrap();
        let expected = [1.0, 0.5, 0.25];
        for (a, b) in y.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_reset_and_inplace() {
        let mut filter = TransferFilter::new(&[1.0, 1.0], &[1.0]).unwrap();
        filter.process_sample(1.0);
        filter.process_sample(2.0);

        filter.reset();

        let mut buffer = [1.0, 0.0];
        filter.process_block_inplace(&mut buffer);
        assert_eq!(buffer, [1.0, 1.0]);
    }

    #[test]
    fn test_update_coefficients_keeps_state() {
        let mut filter = TransferFilter::new(&[1.0, 0.0], &[1.0]).unwrap();
        assert!((filter.process_sample(1.0) - 1.0).abs() < 1e-10);

        filter.update_coefficients(&[0.0, 1.0], &[1.0]).unwrap();
        // The transposed delay line holds b-weighted inputs; old b[1] was 0
        let y = filter.process_sample(2.0);
        assert!((y - 0.0).abs() < 1e-10);
        assert!((filter.process_sample(0.0) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_static_gain() {
        let mut filter = TransferFilter::new(&[3.0], &[1.0]).unwrap();
        assert_eq!(filter.process_block(&[1.0, -2.0]), vec![3.0, -6.0]);
    }

    #[test]
    fn test_rejects_bad_coefficients() {
        assert!(TransferFilter::new(&[], &[1.0]).is_err());
        assert!(TransferFilter::new(&[1.0], &[]).is_err());
        assert_eq!(
            TransferFilter::new(&[1.0], &[0.0, 1.0]).unwrap_err(),
            ValidationError::ZeroLeadingCoefficient
        );
    }
}
