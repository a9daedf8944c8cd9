//! K-distributed clutter field engine.
//!
//! Two lifetimes, modeled explicitly:
//!
//! - The long-lived **engine** owns the expensive one-time setup for a
//!   (grid, shape parameter, texture-ACF model) triple: one noise
//!   realization through the MNLT, the Hermite-moment coefficient estimate,
//!   and the per-cell polynomial inversion producing the Gaussian ACF field.
//!   The square-root spectral filters derived from it are cached too.
//! - Each short-lived **frame** owns one fresh realization: a texture field
//!   (spectral synthesis + MNLT, with bounded retry on non-finite output)
//!   and an independent complex speckle field, composed into the
//!   K-distributed amplitude.
//!
//! ```text
//! setup (once):  noise ──MNLT──▶ gamma ──▶ alpha coefficients ──▶ invert
//!                                               per cell          │
//!                                                                 ▼
//! frame (each):  noise ──×sqrt(FFT2(gaussian ACF))──▶ colored ──MNLT──▶ texture
//!                noise ──×sqrt(speckle PSD)─────────▶ speckle
//!                amplitude = |speckle| * sqrt(texture)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sea_clutter::engine::{EngineConfig, KFieldEngine};
//!
//! let config = EngineConfig {
//!     height: 32,
//!     width: 32,
//!     gamma_shape: 5.0,
//!     ..Default::default()
//! };
//! let mut engine = KFieldEngine::new(config).unwrap();
//! let frame = engine.next_frame().unwrap();
//! assert_eq!(frame.amplitude.height(), 32);
//! assert!(frame.texture.min() >= 0.0);
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::acf::{SpeckleAcf, TextureAcf};
use crate::acf_inversion::{invert_acf, InversionReport};
use crate::acf_relation::AcfPolynomial;
use crate::error::ClutterError;
use crate::field::{ComplexField, Field};
use crate::mnlt::Mnlt;
use crate::rng::GaussianSource;
use crate::spectral::{validate_psd, SpectralSynthesizer};

/// Capacity bound on grid cells; larger grids are rejected before any
/// computation starts.
pub const MAX_CELLS: usize = 1 << 22;

/// Engine configuration. Parameters only; no files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid height (rows), positive.
    pub height: usize,
    /// Grid width (columns), positive.
    pub width: usize,
    /// Gamma shape parameter `v` of the texture, positive. Values of 2 and
    /// above keep the Gamma quantile well-conditioned in the Gaussian tails.
    pub gamma_shape: f64,
    /// Target autocorrelation model of the texture.
    pub texture_acf: TextureAcf,
    /// Correlation model of the complex speckle.
    pub speckle_acf: SpeckleAcf,
    /// Start of the lag lattice, kept away from the zero-lag cell.
    pub lag_origin: f64,
    /// Seed for all randomness drawn by this engine.
    pub seed: u64,
    /// Fresh-noise attempts when the MNLT yields non-finite cells.
    pub max_retries: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            height: 300,
            width: 300,
            gamma_shape: 5.0,
            texture_acf: TextureAcf::default(),
            speckle_acf: SpeckleAcf::default(),
            lag_origin: 10.0,
            seed: 42,
            max_retries: 4,
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<(), ClutterError> {
        if self.height == 0 || self.width == 0 {
            return Err(ClutterError::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                self.height, self.width
            )));
        }
        let cells = self.height.saturating_mul(self.width);
        if cells > MAX_CELLS {
            return Err(ClutterError::CapacityExceeded {
                cells,
                max: MAX_CELLS,
            });
        }
        if !(self.gamma_shape > 0.0) || !self.gamma_shape.is_finite() {
            return Err(ClutterError::InvalidConfig(format!(
                "gamma shape parameter must be a positive finite number, got {}",
                self.gamma_shape
            )));
        }
        if !self.lag_origin.is_finite() || self.lag_origin < 0.0 {
            return Err(ClutterError::InvalidConfig(format!(
                "lag origin must be finite and non-negative, got {}",
                self.lag_origin
            )));
        }
        if self.max_retries == 0 {
            return Err(ClutterError::InvalidConfig(
                "max_retries must be at least 1".into(),
            ));
        }
        self.texture_acf.validate()?;
        self.speckle_acf.validate()?;
        Ok(())
    }
}

/// One-time setup shared across all frames of a configuration: the result
/// of the Hermite-moment estimation and per-cell ACF inversion.
#[derive(Debug, Clone)]
pub struct EngineSetup {
    /// Target texture ACF sampled on the lag lattice.
    pub texture_acf: Field,
    /// Inverted Gaussian ACF field (the expensive part).
    pub gaussian_acf: Field,
    /// Estimated relation polynomial.
    pub coefficients: AcfPolynomial,
    /// Clamp/complex-root counts from the inversion.
    pub report: InversionReport,
}

impl EngineSetup {
    /// Run the one-time setup for a validated configuration. Deterministic
    /// given the configuration (the seed fixes the noise realization used
    /// for the moment estimate).
    pub fn compute(config: &EngineConfig) -> Result<Self, ClutterError> {
        config.validate()?;

        let texture_acf =
            config
                .texture_acf
                .field(config.height, config.width, config.gamma_shape, config.lag_origin);
        validate_psd(&texture_acf)?;

        let mnlt = Mnlt::new(config.gamma_shape)?;
        let mut rng = GaussianSource::new(config.seed);

        // One realization through the transform, retried on deep-tail
        // non-finite output
        let mut last_err = ClutterError::NonFiniteField { attempts: 0 };
        let mut samples = None;
        for attempt in 1..=config.max_retries {
            let noise = rng.fill(config.height, config.width);
            match mnlt.transform_field_checked(&noise, attempt) {
                Ok(gamma) => {
                    samples = Some((noise, gamma));
                    break;
                }
                Err(e) => last_err = e,
            }
        }
        let (noise, gamma) = match samples {
            Some(pair) => pair,
            None => return Err(last_err),
        };

        let coefficients = AcfPolynomial::estimate(&noise, &gamma)?;
        let (gaussian_acf, report) = invert_acf(&texture_acf, &coefficients);

        Ok(Self {
            texture_acf,
            gaussian_acf,
            coefficients,
            report,
        })
    }
}

/// One rendered realization. Caller-owned; the engine keeps no reference.
#[derive(Debug, Clone)]
pub struct Frame {
    /// K-distributed amplitude field, non-negative.
    pub amplitude: Field,
    /// Gamma-distributed texture field, non-negative.
    pub texture: Field,
}

/// Compose the K-distributed amplitude from independent speckle and texture:
/// `amplitude = |speckle| * sqrt(texture)` elementwise. Both fields must
/// share dimensions; the texture must be non-negative (guaranteed by the
/// MNLT's Gamma range together with the engine's finiteness check).
pub fn compose_k_field(speckle: &ComplexField, texture: &Field) -> Field {
    assert_eq!(speckle.height(), texture.height());
    assert_eq!(speckle.width(), texture.width());
    let data = speckle
        .as_slice()
        .iter()
        .zip(texture.as_slice().iter())
        .map(|(s, &t)| s.norm() * t.sqrt())
        .collect();
    Field::from_vec(texture.height(), texture.width(), data)
}

/// Long-lived K-field generator holding the cached one-time setup.
pub struct KFieldEngine {
    config: EngineConfig,
    setup: Arc<EngineSetup>,
    mnlt: Mnlt,
    texture_synth: SpectralSynthesizer,
    speckle_synth: SpectralSynthesizer,
    rng: GaussianSource,
}

impl std::fmt::Debug for KFieldEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KFieldEngine")
            .field("config", &self.config)
            .field("report", &self.setup.report)
            .finish()
    }
}

impl KFieldEngine {
    /// Build an engine, performing the one-time ACF inversion setup.
    pub fn new(config: EngineConfig) -> Result<Self, ClutterError> {
        let setup = Arc::new(EngineSetup::compute(&config)?);
        Self::from_setup(config, setup)
    }

    /// Build an engine around an already-computed (possibly shared) setup.
    pub fn from_setup(
        config: EngineConfig,
        setup: Arc<EngineSetup>,
    ) -> Result<Self, ClutterError> {
        config.validate()?;
        if setup.gaussian_acf.height() != config.height
            || setup.gaussian_acf.width() != config.width
        {
            return Err(ClutterError::InvalidConfig(format!(
                "setup grid {}x{} does not match configured {}x{}",
                setup.gaussian_acf.height(),
                setup.gaussian_acf.width(),
                config.height,
                config.width
            )));
        }

        let mnlt = Mnlt::new(config.gamma_shape)?;
        let texture_synth = SpectralSynthesizer::from_acf(&setup.gaussian_acf);
        let speckle_field = config.speckle_acf.field(config.height, config.width);
        let speckle_synth = if config.speckle_acf.is_lag_domain() {
            SpectralSynthesizer::from_acf(&speckle_field)
        } else {
            SpectralSynthesizer::from_psd(&speckle_field)
        };

        // The frame stream is seeded independently of the setup stream so
        // cached and freshly-computed setups yield identical frames.
        let rng = GaussianSource::new(config.seed.wrapping_add(0x9E3779B97F4A7C15));

        Ok(Self {
            config,
            setup,
            mnlt,
            texture_synth,
            speckle_synth,
            rng,
        })
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cached Gaussian ACF field produced by the one-time inversion.
    pub fn gaussian_acf(&self) -> &Field {
        &self.setup.gaussian_acf
    }

    /// Target texture ACF sampled on the lag lattice.
    pub fn texture_acf(&self) -> &Field {
        &self.setup.texture_acf
    }

    /// Estimated ACF relation polynomial.
    pub fn coefficients(&self) -> AcfPolynomial {
        self.setup.coefficients
    }

    /// Clamp/complex-root counts from the one-time inversion.
    pub fn inversion_report(&self) -> InversionReport {
        self.setup.report
    }

    /// Produce one new realization: a fresh texture field, an independent
    /// speckle field, and their composition. Non-finite transform output is
    /// retried with fresh noise up to `max_retries` times; exhausting the
    /// retries fails this frame request without returning partial data.
    pub fn next_frame(&mut self) -> Result<Frame, ClutterError> {
        let mut last_err = ClutterError::NonFiniteField { attempts: 0 };
        let mut texture = None;
        for attempt in 1..=self.config.max_retries {
            let colored = self.texture_synth.synthesize_real(&mut self.rng);
            match self.mnlt.transform_field_checked(&colored, attempt) {
                Ok(t) => {
                    texture = Some(t);
                    break;
                }
                Err(e) => last_err = e,
            }
        }
        let texture = match texture {
            Some(t) => t,
            None => return Err(last_err),
        };

        let speckle = self.speckle_synth.synthesize_complex(&mut self.rng);
        let amplitude = compose_k_field(&speckle, &texture);
        Ok(Frame { amplitude, texture })
    }
}
