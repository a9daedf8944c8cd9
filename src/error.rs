//! Error type for clutter synthesis.
//!
//! Setup-time errors (bad configuration, unrealizable spectra, capacity) are
//! fatal and surfaced synchronously from engine construction. Per-frame
//! transient errors (non-finite transform output) are retried a bounded
//! number of times inside the engine and only surfaced once retries are
//! exhausted; no partial frame is ever returned.

/// Error type for clutter field synthesis.
#[derive(Debug, Clone, PartialEq)]
pub enum ClutterError {
    /// Invalid configuration value (dimensions, shape parameter, model).
    InvalidConfig(String),
    /// An ACF whose Fourier transform has a negative real part beyond
    /// floating-point noise cannot be realized as a power spectral density.
    SpectrumNotRealizable {
        /// Most negative real spectral value found.
        min_value: f64,
        /// Peak spectral magnitude, for scale.
        peak_value: f64,
    },
    /// The nonlinear transform produced NaN/infinity and retries were
    /// exhausted.
    NonFiniteField {
        /// Number of fresh-noise attempts made.
        attempts: usize,
    },
    /// Hermite order above the supported bound.
    UnsupportedOrder {
        /// Requested polynomial order.
        order: usize,
        /// Largest supported order.
        max: usize,
    },
    /// Grid too large for the per-cell solve / FFT budget.
    CapacityExceeded {
        /// Requested number of grid cells.
        cells: usize,
        /// Supported maximum.
        max: usize,
    },
}

impl std::fmt::Display for ClutterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClutterError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            ClutterError::SpectrumNotRealizable { min_value, peak_value } => write!(
                f,
                "ACF spectrum has negative real part {:.3e} (peak {:.3e}); not a valid PSD",
                min_value, peak_value
            ),
            ClutterError::NonFiniteField { attempts } => write!(
                f,
                "nonlinear transform produced non-finite values in {} attempts",
                attempts
            ),
            ClutterError::UnsupportedOrder { order, max } => {
                write!(f, "Hermite order {} not supported (max {})", order, max)
            }
            ClutterError::CapacityExceeded { cells, max } => {
                write!(f, "grid of {} cells exceeds capacity of {}", cells, max)
            }
        }
    }
}

impl std::error::Error for ClutterError {}
