//! Memoryless nonlinear transform (MNLT).
//!
//! Pointwise probability-integral-transform from standard-normal samples to
//! Gamma-distributed samples of a chosen shape parameter and unit scale:
//!
//! ```text
//! x  ──Phi──▶  p = Phi(x)  ──inverse Gamma CDF──▶  y = P^{-1}(v, p)
//! ```
//!
//! The map is monotone per cell, so it never reorders samples; the output
//! marginal is exactly Gamma(v, 1) regardless of the input field's
//! correlation structure. Probabilities deep in the Gaussian tails can drive
//! the quantile evaluation to NaN/infinity; callers must check the output
//! with [`Mnlt::transform_field_checked`] or [`Field::is_finite`] and treat
//! non-finite cells as a retry case, never propagate them.
//!
//! ## Example
//!
//! ```rust
//! use sea_clutter::mnlt::Mnlt;
//!
//! let mnlt = Mnlt::new(5.0).unwrap();
//! let y = mnlt.transform_value(0.0);
//! // Phi(0) = 0.5 maps to the Gamma(5, 1) median, near 4.67
//! assert!(y > 4.0 && y < 5.0);
//! ```

use crate::error::ClutterError;
use crate::field::Field;
use crate::special::{inv_gammp, normal_cdf};

/// Memoryless nonlinear transform with a fixed Gamma shape parameter.
#[derive(Debug, Clone, Copy)]
pub struct Mnlt {
    shape: f64,
}

impl Mnlt {
    /// Create a transform for Gamma shape parameter `shape` (> 0).
    pub fn new(shape: f64) -> Result<Self, ClutterError> {
        if !(shape > 0.0) || !shape.is_finite() {
            return Err(ClutterError::InvalidConfig(format!(
                "gamma shape parameter must be a positive finite number, got {shape}"
            )));
        }
        Ok(Self { shape })
    }

    /// The Gamma shape parameter.
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Transform a single standard-normal value to a Gamma(shape, 1) value.
    pub fn transform_value(&self, x: f64) -> f64 {
        let p = normal_cdf(x);
        // shape validated at construction, so the quantile cannot error
        inv_gammp(self.shape, p).unwrap_or(f64::NAN)
    }

    /// Transform a whole field elementwise.
    pub fn transform_field(&self, field: &Field) -> Field {
        field.map(|x| self.transform_value(x))
    }

    /// Transform a whole field and fail if any output cell is non-finite.
    ///
    /// `attempt` is reported in the error so the engine's bounded retry can
    /// surface how many draws were consumed.
    pub fn transform_field_checked(
        &self,
        field: &Field,
        attempt: usize,
    ) -> Result<Field, ClutterError> {
        let out = self.transform_field(field);
        if out.is_finite() {
            Ok(out)
        } else {
            Err(ClutterError::NonFiniteField { attempts: attempt })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::GaussianSource;
    use crate::special::gammp;

    #[test]
    fn test_rejects_bad_shape() {
        assert!(Mnlt::new(0.0).is_err());
        assert!(Mnlt::new(-2.0).is_err());
        assert!(Mnlt::new(f64::NAN).is_err());
        assert!(Mnlt::new(1.99).is_ok());
    }

    #[test]
    fn test_monotone_ordering_preserved() {
        let mnlt = Mnlt::new(2.0).unwrap();
        let mut prev = mnlt.transform_value(-6.0);
        let mut x = -6.0;
        while x <= 6.0 {
            let y = mnlt.transform_value(x);
            assert!(
                y >= prev - 1e-9,
                "transform reordered samples at x={x}: {y} < {prev}"
            );
            prev = y;
            x += 0.05;
        }
    }

    #[test]
    fn test_finite_within_six_sigma() {
        // Finiteness guarantee for v >= 2 over +/- 6 standard deviations
        for &v in &[2.0, 3.0, 5.0] {
            let mnlt = Mnlt::new(v).unwrap();
            let mut x = -6.0;
            while x <= 6.0 {
                let y = mnlt.transform_value(x);
                assert!(y.is_finite(), "non-finite output at v={v}, x={x}");
                assert!(y >= 0.0, "negative gamma sample at v={v}, x={x}: {y}");
                x += 0.01;
            }
        }
    }

    #[test]
    fn test_marginal_moments() {
        // Gamma(v, 1) has mean v and variance v
        let v = 5.0;
        let mnlt = Mnlt::new(v).unwrap();
        let mut rng = GaussianSource::new(42);
        let n = 40_000;
        let samples: Vec<f64> = (0..n).map(|_| mnlt.transform_value(rng.standard_normal())).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|&s| (s - mean) * (s - mean)).sum::<f64>() / n as f64;
        assert!((mean - v).abs() < 0.1, "sample mean {mean:.3}, want ~{v}");
        assert!((var - v).abs() < 0.4, "sample variance {var:.3}, want ~{v}");
    }

    #[test]
    fn test_marginal_distribution_fit() {
        // Empirical CDF should track the Gamma(v, 1) CDF
        let v = 3.0;
        let mnlt = Mnlt::new(v).unwrap();
        let mut rng = GaussianSource::new(7);
        let n = 20_000;
        let mut samples: Vec<f64> =
            (0..n).map(|_| mnlt.transform_value(rng.standard_normal())).collect();
        samples.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for &q in &[0.1, 0.25, 0.5, 0.75, 0.9] {
            let x = samples[(q * n as f64) as usize];
            let p = gammp(v, x).unwrap();
            assert!(
                (p - q).abs() < 0.02,
                "CDF mismatch at quantile {q}: P(v, {x:.3}) = {p:.4}"
            );
        }
    }

    #[test]
    fn test_field_transform_checked() {
        let mnlt = Mnlt::new(5.0).unwrap();
        let mut rng = GaussianSource::new(3);
        let field = rng.fill(16, 16);
        let out = mnlt.transform_field_checked(&field, 1).unwrap();
        assert_eq!(out.height(), 16);
        assert!(out.min() >= 0.0);
    }

    #[test]
    fn test_checked_detects_nonfinite() {
        let mnlt = Mnlt::new(5.0).unwrap();
        let field = Field::from_vec(1, 2, vec![0.0, f64::NAN]);
        let err = mnlt.transform_field_checked(&field, 2).unwrap_err();
        assert_eq!(err, ClutterError::NonFiniteField { attempts: 2 });
    }
}
