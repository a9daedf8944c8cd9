//! Hermite-series relation between Gaussian and Gamma ACFs.
//!
//! The memoryless nonlinear transform acts pointwise, so (Price/Mehler
//! expansion) its effect on the autocorrelation is a power series in the
//! Gaussian-field ACF value:
//!
//! ```text
//! t = alpha_2 * g^2 + alpha_1 * g + alpha_0
//! alpha_n = (1 / (pi * n! * 2^n)) * E[ exp(-x^2) H_n(x) T(x) ]^2
//! ```
//!
//! where `g` is a Gaussian-ACF value, `t` the corresponding texture-ACF
//! value, `H_n` the physicists' Hermite polynomial and `T` the transform
//! output. The expectation is estimated by a sample average over one whole
//! field realization (ergodic estimate); its accuracy depends on the grid
//! being large enough. The series is truncated at degree 2, an explicit
//! accuracy/cost trade-off.
//!
//! The coefficient vector is normalized so that `g = 1` maps to `t = 1`,
//! matching the zero-lag boundary of correlation fields with unit variance.

use crate::error::ClutterError;
use crate::field::Field;
use crate::hermite::HermiteOrder;

/// Truncation degree of the ACF relation polynomial.
pub const POLY_DEGREE: usize = 2;

/// Normalized degree-2 polynomial relating Gaussian ACF to texture ACF.
/// Coefficients are stored highest-degree first and sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcfPolynomial {
    coeffs: [f64; POLY_DEGREE + 1],
}

impl AcfPolynomial {
    /// Build directly from raw (non-negative) Hermite-moment coefficients,
    /// highest-degree first; normalizes so `eval(1) == 1`.
    pub fn from_raw(raw: [f64; POLY_DEGREE + 1]) -> Result<Self, ClutterError> {
        let sum: f64 = raw.iter().sum();
        if !(sum > 0.0) || !sum.is_finite() {
            return Err(ClutterError::InvalidConfig(format!(
                "ACF polynomial coefficients must have a positive finite sum, got {sum}"
            )));
        }
        let mut coeffs = raw;
        for c in coeffs.iter_mut() {
            *c /= sum;
        }
        Ok(Self { coeffs })
    }

    /// Estimate the coefficients from one realization: `gaussian` holds the
    /// standard-normal samples `x`, `gamma` the transform output `T(x)`.
    /// Both fields must share dimensions.
    pub fn estimate(gaussian: &Field, gamma: &Field) -> Result<Self, ClutterError> {
        if gaussian.height() != gamma.height() || gaussian.width() != gamma.width() {
            return Err(ClutterError::InvalidConfig(format!(
                "sample fields disagree on dimensions: {}x{} vs {}x{}",
                gaussian.height(),
                gaussian.width(),
                gamma.height(),
                gamma.width()
            )));
        }
        if gaussian.is_empty() {
            return Err(ClutterError::InvalidConfig(
                "cannot estimate ACF polynomial from an empty field".into(),
            ));
        }

        let n_cells = gaussian.len() as f64;
        let mut raw = [0.0; POLY_DEGREE + 1];
        for degree in (0..=POLY_DEGREE).rev() {
            // degree bound is POLY_DEGREE <= MAX_ORDER, so this cannot fail
            let hermite = HermiteOrder::new(degree)?;
            let mut moment = 0.0;
            for (&x, &t) in gaussian.as_slice().iter().zip(gamma.as_slice().iter()) {
                moment += (-x * x).exp() * hermite.eval(x) * t;
            }
            moment /= n_cells;
            let factor = 1.0
                / (std::f64::consts::PI * factorial(degree) * (1u64 << degree) as f64);
            raw[POLY_DEGREE - degree] = factor * moment * moment;
        }
        Self::from_raw(raw)
    }

    /// Evaluate the polynomial at a Gaussian-ACF value.
    pub fn eval(&self, g: f64) -> f64 {
        self.coeffs.iter().fold(0.0, |acc, &c| acc * g + c)
    }

    /// Coefficients, highest-degree first.
    pub fn coefficients(&self) -> [f64; POLY_DEGREE + 1] {
        self.coeffs
    }
}

fn factorial(n: usize) -> f64 {
    (1..=n).map(|i| i as f64).product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnlt::Mnlt;
    use crate::rng::GaussianSource;

    #[test]
    fn test_from_raw_normalizes() {
        let p = AcfPolynomial::from_raw([0.177, 0.816, 1.0]).unwrap();
        let c = p.coefficients();
        let sum: f64 = c.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        // relative proportions preserved
        assert!((c[0] / c[2] - 0.177).abs() < 1e-12);
    }

    #[test]
    fn test_from_raw_rejects_degenerate() {
        assert!(AcfPolynomial::from_raw([0.0, 0.0, 0.0]).is_err());
        assert!(AcfPolynomial::from_raw([f64::NAN, 0.0, 1.0]).is_err());
    }

    #[test]
    fn test_eval_horner() {
        let p = AcfPolynomial::from_raw([2.0, 3.0, 5.0]).unwrap();
        // (2 g^2 + 3 g + 5) / 10
        assert!((p.eval(0.0) - 0.5).abs() < 1e-12);
        assert!((p.eval(1.0) - 1.0).abs() < 1e-12);
        assert!((p.eval(-1.0) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_zero_lag_boundary() {
        // Any estimated vector satisfies eval(1) == 1 within tolerance
        let mut rng = GaussianSource::new(42);
        let mnlt = Mnlt::new(5.0).unwrap();
        let gaussian = rng.fill(64, 64);
        let gamma = mnlt.transform_field(&gaussian);
        let p = AcfPolynomial::estimate(&gaussian, &gamma).unwrap();
        assert!(
            (p.eval(1.0) - 1.0).abs() < 1e-6,
            "zero-lag boundary violated: p(1) = {}",
            p.eval(1.0)
        );
    }

    #[test]
    fn test_estimated_coefficients_nonnegative() {
        // Each alpha is a squared moment times a positive factor
        let mut rng = GaussianSource::new(9);
        let mnlt = Mnlt::new(1.99).unwrap();
        let gaussian = rng.fill(48, 48);
        let gamma = mnlt.transform_field(&gaussian);
        let p = AcfPolynomial::estimate(&gaussian, &gamma).unwrap();
        for (i, c) in p.coefficients().iter().enumerate() {
            assert!(*c >= 0.0, "coefficient {i} negative: {c}");
        }
    }

    #[test]
    fn test_estimate_stability_across_realizations() {
        // Two large independent realizations give close coefficients
        let mnlt = Mnlt::new(5.0).unwrap();
        let mut rng_a = GaussianSource::new(1);
        let mut rng_b = GaussianSource::new(2);
        let ga = rng_a.fill(96, 96);
        let gb = rng_b.fill(96, 96);
        let pa = AcfPolynomial::estimate(&ga, &mnlt.transform_field(&ga)).unwrap();
        let pb = AcfPolynomial::estimate(&gb, &mnlt.transform_field(&gb)).unwrap();
        for (a, b) in pa.coefficients().iter().zip(pb.coefficients().iter()) {
            assert!(
                (a - b).abs() < 0.08,
                "coefficients unstable across realizations: {a:.4} vs {b:.4}"
            );
        }
    }

    #[test]
    fn test_estimate_rejects_dimension_mismatch() {
        let a = Field::zeros(4, 4);
        let b = Field::zeros(4, 5);
        assert!(AcfPolynomial::estimate(&a, &b).is_err());
    }

    #[test]
    fn test_dominant_linear_term() {
        // For a smooth transform the linear Hermite term dominates the
        // quadratic one
        let mut rng = GaussianSource::new(5);
        let mnlt = Mnlt::new(5.0).unwrap();
        let gaussian = rng.fill(64, 64);
        let gamma = mnlt.transform_field(&gaussian);
        let c = AcfPolynomial::estimate(&gaussian, &gamma).unwrap().coefficients();
        assert!(c[1] > c[0], "expected alpha_1 > alpha_2: {c:?}");
    }
}
