//! Closed-form autocorrelation and spectral models.
//!
//! Two model families feed the synthesis pipeline:
//!
//! - **Texture ACF**: the target autocorrelation of the Gamma-distributed
//!   texture, specified in the lag domain. Reference model (Tough 1999,
//!   eq. 69): `1 + exp(-(x+y)/decay) * cos(pi*y/period) / shape`.
//! - **Speckle model**: the correlation of the fast complex-Gaussian
//!   speckle, either a separable sinc/Gaussian point-spread ACF in the lag
//!   domain (Brekke 2010, eq. 28) or an isotropic power-law power spectral
//!   density given directly in the frequency domain.
//!
//! Lag lattices start at a configurable origin away from zero (the reference
//! construction uses 10) so the oscillatory model is sampled off its
//! singular start cell.

use serde::{Deserialize, Serialize};

use crate::error::ClutterError;
use crate::field::Field;

/// Inclusive linspace, `n` points from `start` to `end`.
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Target autocorrelation model for the Gamma texture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TextureAcf {
    /// `1 + exp(-(x+y)/decay) * cos(pi*y/period) / shape`.
    ExponentialCosine {
        /// Exponential decay scale of the correlation (lag units).
        decay: f64,
        /// Cosine modulation period along y (lag units).
        period: f64,
    },
}

impl Default for TextureAcf {
    fn default() -> Self {
        TextureAcf::ExponentialCosine {
            decay: 10.0,
            period: 8.0,
        }
    }
}

impl TextureAcf {
    /// Reject parameters that would make [`TextureAcf::eval`] non-finite.
    pub fn validate(&self) -> Result<(), ClutterError> {
        match *self {
            TextureAcf::ExponentialCosine { decay, period } => {
                if !(decay > 0.0) || !decay.is_finite() {
                    return Err(ClutterError::InvalidConfig(format!(
                        "texture ACF decay must be a positive finite number, got {decay}"
                    )));
                }
                if !(period > 0.0) || !period.is_finite() {
                    return Err(ClutterError::InvalidConfig(format!(
                        "texture ACF period must be a positive finite number, got {period}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Evaluate the model at lag `(x, y)` for Gamma shape `shape`.
    pub fn eval(&self, x: f64, y: f64, shape: f64) -> f64 {
        match *self {
            TextureAcf::ExponentialCosine { decay, period } => {
                1.0 + (-(x + y) / decay).exp() * (std::f64::consts::PI * y / period).cos() / shape
            }
        }
    }

    /// Sample the model on a `height x width` lag lattice. The x lattice
    /// spans `[lag_origin, width]`, the y lattice `[lag_origin, height]`.
    pub fn field(&self, height: usize, width: usize, shape: f64, lag_origin: f64) -> Field {
        let xs = linspace(lag_origin, width as f64, width);
        let ys = linspace(lag_origin, height as f64, height);
        Field::from_fn(height, width, |r, c| self.eval(xs[c], ys[r], shape))
    }
}

/// Correlation model for the complex speckle component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpeckleAcf {
    /// Separable point-spread ACF `sinc(x/A) * exp(-y^2 / (4 B^2))` with
    /// range bandwidth A and bearing sigma B, in the lag domain.
    SincGaussianPsf {
        /// Range bandwidth A of the sinc factor.
        range_bandwidth: f64,
        /// Bearing spread B of the Gaussian factor.
        bearing_sigma: f64,
    },
    /// Isotropic power-law PSD `(fx^2 + fy^2)^(exponent/2)` given directly
    /// in the frequency domain.
    PowerLawSpectrum {
        /// Spectral exponent (reference: -0.6).
        exponent: f64,
        /// Lowest sampled frequency, keeps the power law off its pole.
        min_frequency: f64,
        /// Physical extent of the grid, sets the sampling frequency
        /// `fs = n / physical_extent`.
        physical_extent: f64,
    },
}

impl Default for SpeckleAcf {
    fn default() -> Self {
        SpeckleAcf::PowerLawSpectrum {
            exponent: -0.6,
            min_frequency: 0.1,
            physical_extent: 10.0,
        }
    }
}

impl SpeckleAcf {
    /// Reject parameters that would make [`SpeckleAcf::field`] non-finite.
    pub fn validate(&self) -> Result<(), ClutterError> {
        let check = |name: &str, v: f64| {
            if !(v > 0.0) || !v.is_finite() {
                Err(ClutterError::InvalidConfig(format!(
                    "speckle {name} must be a positive finite number, got {v}"
                )))
            } else {
                Ok(())
            }
        };
        match *self {
            SpeckleAcf::SincGaussianPsf {
                range_bandwidth,
                bearing_sigma,
            } => {
                check("range bandwidth", range_bandwidth)?;
                check("bearing sigma", bearing_sigma)?;
            }
            SpeckleAcf::PowerLawSpectrum {
                exponent,
                min_frequency,
                physical_extent,
            } => {
                if !exponent.is_finite() {
                    return Err(ClutterError::InvalidConfig(format!(
                        "speckle spectral exponent must be finite, got {exponent}"
                    )));
                }
                check("minimum frequency", min_frequency)?;
                check("physical extent", physical_extent)?;
            }
        }
        Ok(())
    }

    /// True when the model is specified in the lag (ACF) domain rather than
    /// directly as a PSD.
    pub fn is_lag_domain(&self) -> bool {
        matches!(self, SpeckleAcf::SincGaussianPsf { .. })
    }

    /// Sample the model on a `height x width` lattice: an ACF field for
    /// lag-domain models, a PSD field for frequency-domain models.
    pub fn field(&self, height: usize, width: usize) -> Field {
        match *self {
            SpeckleAcf::SincGaussianPsf {
                range_bandwidth,
                bearing_sigma,
            } => {
                let half_w = width as f64 / 2.0;
                let half_h = height as f64 / 2.0;
                let xs = linspace(-half_w, half_w, width);
                let ys = linspace(-half_h, half_h, height);
                Field::from_fn(height, width, |r, c| {
                    sinc(xs[c] / range_bandwidth)
                        * (-ys[r] * ys[r] / (4.0 * bearing_sigma * bearing_sigma)).exp()
                })
            }
            SpeckleAcf::PowerLawSpectrum {
                exponent,
                min_frequency,
                physical_extent,
            } => {
                let fs_x = width as f64 / physical_extent;
                let fs_y = height as f64 / physical_extent;
                let fx = linspace(min_frequency, fs_x, width);
                let fy = linspace(min_frequency, fs_y, height);
                Field::from_fn(height, width, |r, c| {
                    let f = (fx[c] * fx[c] + fy[r] * fy[r]).sqrt();
                    f.powf(exponent)
                })
            }
        }
    }
}

/// Normalized sinc, `sin(pi x) / (pi x)`.
fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        let px = std::f64::consts::PI * x;
        px.sin() / px
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_inclusive() {
        let v = linspace(10.0, 64.0, 4);
        assert_eq!(v.len(), 4);
        assert!((v[0] - 10.0).abs() < 1e-12);
        assert!((v[3] - 64.0).abs() < 1e-12);
        assert!((v[1] - 28.0).abs() < 1e-12);
    }

    #[test]
    fn test_texture_acf_limits() {
        let model = TextureAcf::default();
        // Large lags decorrelate toward 1
        let far = model.eval(500.0, 500.0, 5.0);
        assert!((far - 1.0).abs() < 1e-10);
        // At the origin with y=0 the cosine is 1, giving 1 + 1/shape
        let near = model.eval(0.0, 0.0, 5.0);
        assert!((near - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_texture_field_dimensions_and_range() {
        let model = TextureAcf::default();
        let f = model.field(32, 48, 5.0, 10.0);
        assert_eq!(f.height(), 32);
        assert_eq!(f.width(), 48);
        assert!(f.is_finite());
        // Bounded by 1 +/- exp(-2*origin/decay)/shape
        assert!(f.max() <= 1.0 + 0.2);
        assert!(f.min() >= 1.0 - 0.2);
    }

    #[test]
    fn test_texture_model_validation() {
        assert!(TextureAcf::default().validate().is_ok());
        // decay 0 makes the zero-lag cell 0/0
        let m = TextureAcf::ExponentialCosine {
            decay: 0.0,
            period: 8.0,
        };
        assert!(m.validate().is_err());
        let m = TextureAcf::ExponentialCosine {
            decay: f64::NAN,
            period: 8.0,
        };
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_speckle_model_validation() {
        assert!(SpeckleAcf::default().validate().is_ok());
        let m = SpeckleAcf::SincGaussianPsf {
            range_bandwidth: 0.0,
            bearing_sigma: 16.0,
        };
        assert!(m.validate().is_err());
        let m = SpeckleAcf::PowerLawSpectrum {
            exponent: -0.6,
            min_frequency: -0.1,
            physical_extent: 10.0,
        };
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_sinc_values() {
        assert!((sinc(0.0) - 1.0).abs() < 1e-12);
        assert!(sinc(1.0).abs() < 1e-12);
        assert!((sinc(0.5) - 2.0 / std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_psf_model_peak_at_center() {
        let model = SpeckleAcf::SincGaussianPsf {
            range_bandwidth: 5.0,
            bearing_sigma: 16.0,
        };
        assert!(model.is_lag_domain());
        let f = model.field(33, 33);
        // Center of an odd lattice is the zero lag, where the ACF is 1
        assert!((f.get(16, 16) - 1.0).abs() < 1e-9);
        assert!(f.max() <= 1.0 + 1e-9);
    }

    #[test]
    fn test_power_law_monotone_decay() {
        let model = SpeckleAcf::default();
        assert!(!model.is_lag_domain());
        let f = model.field(16, 16);
        assert!(f.is_finite());
        assert!(f.min() > 0.0, "PSD must stay positive");
        // Higher frequency, lower power
        assert!(f.get(0, 0) > f.get(15, 15));
    }
}
