//! # Sea Clutter Synthesis Library
//!
//! This crate generates two-dimensional K-distributed random fields of the
//! kind used to model radar sea clutter: fast complex-Gaussian speckle
//! modulated by a slowly varying, spatially correlated Gamma texture.
//!
//! ## Overview
//!
//! The compound-Gaussian construction separates the two time scales of sea
//! clutter and this library implements both halves plus their coupling:
//!
//! - **Texture synthesis**: a correlated standard-Gaussian field is pushed
//!   through a memoryless nonlinear transform (MNLT) so every cell is
//!   exactly Gamma(v, 1) distributed while spatial correlation survives
//! - **ACF pre-distortion**: the Gaussian field's autocorrelation is chosen
//!   so that the *transformed* field matches a prescribed texture ACF, via a
//!   truncated Hermite-series relation inverted cell by cell
//! - **Speckle synthesis**: an independent complex-Gaussian field with its
//!   own correlation model (point-spread ACF or power-law spectrum)
//! - **Composition**: `amplitude = |speckle| * sqrt(texture)`, a
//!   K-distributed amplitude field
//!
//! ## Signal Flow
//!
//! ```text
//! setup:  noise ──MNLT──▶ Gamma ──Hermite moments──▶ t = a2 g² + a1 g + a0
//!         texture ACF ──solve per cell──▶ Gaussian ACF  (cached)
//!
//! frame:  noise ──FFT²──▶ × sqrt(PSD) ──IFFT²──▶ colored ──MNLT──▶ texture
//!         noise ──FFT²──▶ × sqrt(PSD) ──IFFT²──▶ speckle
//!         amplitude = |speckle| * sqrt(texture)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sea_clutter::{EngineConfig, KFieldEngine};
//!
//! let config = EngineConfig {
//!     height: 32,
//!     width: 32,
//!     gamma_shape: 5.0,
//!     seed: 42,
//!     ..Default::default()
//! };
//!
//! let mut engine = KFieldEngine::new(config).unwrap();
//! let frame = engine.next_frame().unwrap();
//!
//! assert_eq!(frame.amplitude.height(), 32);
//! assert!(frame.amplitude.min() >= 0.0);
//! // Texture cells are Gamma(5, 1); its mean over many frames approaches 5
//! assert!(frame.texture.is_finite());
//! ```

pub mod acf;
pub mod acf_inversion;
pub mod acf_relation;
pub mod cache;
pub mod engine;
pub mod error;
pub mod fft2;
pub mod field;
pub mod hermite;
pub mod mnlt;
pub mod rng;
pub mod special;
pub mod spectral;

// Re-export main types
pub use acf::{SpeckleAcf, TextureAcf};
pub use acf_inversion::{invert_acf, InversionReport};
pub use acf_relation::AcfPolynomial;
pub use cache::SetupCache;
pub use engine::{compose_k_field, EngineConfig, EngineSetup, Frame, KFieldEngine};
pub use error::ClutterError;
pub use field::{ComplexField, Field};
pub use mnlt::Mnlt;
pub use rng::GaussianSource;
pub use spectral::{validate_psd, SpectralSynthesizer};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::acf::{SpeckleAcf, TextureAcf};
    pub use crate::engine::{EngineConfig, Frame, KFieldEngine};
    pub use crate::error::ClutterError;
    pub use crate::field::{ComplexField, Field};
}
