//! Spectral field synthesizer.
//!
//! Realizes a stationary random field with a prescribed autocorrelation by
//! filtering white noise in the frequency domain:
//!
//! ```text
//! white noise w ──FFT2──▶ W ──× sqrt(S)──▶ colored ──IFFT2──▶ field
//!                              S = FFT2(target ACF)  (the PSD)
//! ```
//!
//! A single realization's empirical ACF differs from the target by sampling
//! noise; the *expected* ACF equals the target. When the target ACF's
//! spectrum has negative real bins, the complex square root injects an
//! imaginary component that [`SpectralSynthesizer::synthesize_real`]
//! discards; this is an accepted approximation for spectra that are
//! non-negative up to truncation ripple. [`validate_psd`] rejects spectra
//! whose negative part is beyond that ripple.
//!
//! ## Example
//!
//! ```rust
//! use sea_clutter::field::Field;
//! use sea_clutter::rng::GaussianSource;
//! use sea_clutter::spectral::SpectralSynthesizer;
//!
//! // A delta-correlated target reproduces white noise
//! let mut acf = Field::zeros(8, 8);
//! acf.set(0, 0, 1.0);
//! let mut synth = SpectralSynthesizer::from_acf(&acf);
//! let mut rng = GaussianSource::new(1);
//! let field = synth.synthesize_real(&mut rng);
//! assert!(field.is_finite());
//! ```

use num_complex::Complex64;

use crate::error::ClutterError;
use crate::fft2::Fft2dProcessor;
use crate::field::{ComplexField, Field};
use crate::rng::GaussianSource;

/// Relative tolerance for negative spectral real parts: anything below
/// `-NEGATIVE_PSD_TOLERANCE * peak` is a configuration error rather than
/// truncation ripple.
pub const NEGATIVE_PSD_TOLERANCE: f64 = 1e-2;

/// Stationary-field synthesizer with a cached square-root spectral filter.
#[derive(Debug)]
pub struct SpectralSynthesizer {
    height: usize,
    width: usize,
    fft: Fft2dProcessor,
    /// Per-bin filter `sqrt(S)`, cached across realizations.
    filter: Vec<Complex64>,
}

impl SpectralSynthesizer {
    /// Build from a target ACF given in the lag domain; the filter is the
    /// complex square root of the ACF's 2-D Fourier transform.
    pub fn from_acf(acf: &Field) -> Self {
        let mut fft = Fft2dProcessor::new(acf.height(), acf.width());
        let spectrum = fft.fft2_real(acf.as_slice());
        let filter = spectrum.iter().map(|s| s.sqrt()).collect();
        Self {
            height: acf.height(),
            width: acf.width(),
            fft,
            filter,
        }
    }

    /// Build from a power spectral density given directly in the frequency
    /// domain.
    pub fn from_psd(psd: &Field) -> Self {
        let fft = Fft2dProcessor::new(psd.height(), psd.width());
        let filter = psd
            .as_slice()
            .iter()
            .map(|&s| Complex64::new(s, 0.0).sqrt())
            .collect();
        Self {
            height: psd.height(),
            width: psd.width(),
            fft,
            filter,
        }
    }

    /// Grid height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Grid width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Draw one realization and keep only the real part.
    pub fn synthesize_real(&mut self, rng: &mut GaussianSource) -> Field {
        self.synthesize(rng).re()
    }

    /// Draw one realization as a complex field (speckle use).
    pub fn synthesize_complex(&mut self, rng: &mut GaussianSource) -> ComplexField {
        self.synthesize(rng)
    }

    fn synthesize(&mut self, rng: &mut GaussianSource) -> ComplexField {
        let noise = rng.fill(self.height, self.width);
        let mut buffer = self.fft.fft2_real(noise.as_slice());
        for (bin, h) in buffer.iter_mut().zip(self.filter.iter()) {
            *bin *= h;
        }
        self.fft.ifft2_inplace(&mut buffer);
        ComplexField::from_vec(self.height, self.width, buffer)
    }
}

/// Check that a lag-domain ACF has a realizable (non-negative up to
/// truncation ripple) power spectral density.
pub fn validate_psd(acf: &Field) -> Result<(), ClutterError> {
    // NaN slips through min/max comparisons, so finiteness is checked first
    if !acf.is_finite() {
        return Err(ClutterError::InvalidConfig(
            "ACF field contains non-finite values".into(),
        ));
    }
    let mut fft = Fft2dProcessor::new(acf.height(), acf.width());
    let spectrum = fft.fft2_real(acf.as_slice());
    let peak = spectrum.iter().map(|z| z.norm()).fold(0.0f64, f64::max);
    let min_re = spectrum.iter().map(|z| z.re).fold(f64::INFINITY, f64::min);
    if min_re < -NEGATIVE_PSD_TOLERANCE * peak {
        return Err(ClutterError::SpectrumNotRealizable {
            min_value: min_re,
            peak_value: peak,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Circularly wrapped Gaussian ACF; positive-definite on the periodic
    /// lattice.
    fn periodic_gaussian_acf(n: usize, scale: f64) -> Field {
        Field::from_fn(n, n, |r, c| {
            let dr = r.min(n - r) as f64;
            let dc = c.min(n - c) as f64;
            (-(dr * dr + dc * dc) / (2.0 * scale * scale)).exp()
        })
    }

    #[test]
    fn test_validate_accepts_gaussian_bump() {
        let acf = periodic_gaussian_acf(32, 2.0);
        assert!(validate_psd(&acf).is_ok());
    }

    #[test]
    fn test_validate_rejects_indefinite_acf() {
        // Strong negative correlation at lag 1 pushes the spectrum negative
        let mut acf = Field::zeros(8, 8);
        acf.set(0, 0, 1.0);
        acf.set(0, 1, -0.9);
        acf.set(0, 7, -0.9);
        let err = validate_psd(&acf).unwrap_err();
        match err {
            ClutterError::SpectrumNotRealizable { min_value, .. } => {
                assert!(min_value < -0.5, "expected strongly negative bin: {min_value}")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_nonfinite_acf() {
        let mut acf = periodic_gaussian_acf(8, 2.0);
        acf.set(3, 3, f64::NAN);
        assert!(matches!(
            validate_psd(&acf),
            Err(ClutterError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_white_target_gives_unit_variance() {
        let mut acf = Field::zeros(32, 32);
        acf.set(0, 0, 1.0);
        let mut synth = SpectralSynthesizer::from_acf(&acf);
        let mut rng = GaussianSource::new(42);
        // Average variance over several realizations
        let mut var = 0.0;
        let trials = 20;
        for _ in 0..trials {
            var += synth.synthesize_real(&mut rng).variance();
        }
        var /= trials as f64;
        assert!((var - 1.0).abs() < 0.1, "variance should be ~1: got {var:.3}");
    }

    #[test]
    fn test_roundtrip_acf_recovery() {
        // The ensemble-averaged empirical (circular) ACF converges to the
        // target when the target's spectrum is strictly positive.
        let n = 32;
        let target = periodic_gaussian_acf(n, 2.0);
        let mut synth = SpectralSynthesizer::from_acf(&target);
        let mut rng = GaussianSource::new(7);
        let mut fft = Fft2dProcessor::new(n, n);

        let trials = 400;
        let mut avg_power = vec![0.0f64; n * n];
        for _ in 0..trials {
            let field = synth.synthesize_real(&mut rng);
            let spectrum = fft.fft2_real(field.as_slice());
            for (acc, z) in avg_power.iter_mut().zip(spectrum.iter()) {
                *acc += z.norm_sqr();
            }
        }
        // E|FFT(field)|^2 = N^2 * PSD for unit white noise, so the inverse
        // transform of the averaged power recovers the ACF.
        let mut buffer: Vec<Complex64> = avg_power
            .iter()
            .map(|&p| Complex64::new(p / (trials as f64 * (n * n) as f64), 0.0))
            .collect();
        fft.ifft2_inplace(&mut buffer);

        for &(r, c) in &[(0usize, 0usize), (0, 1), (1, 0), (1, 1), (2, 0)] {
            let want = target.get(r, c);
            let got = buffer[r * n + c].re;
            assert!(
                (got - want).abs() < 0.10 * want.abs().max(0.1),
                "ACF mismatch at lag ({r},{c}): got {got:.4}, want {want:.4}"
            );
        }
    }

    #[test]
    fn test_complex_synthesis_dimensions() {
        let acf = periodic_gaussian_acf(16, 1.5);
        let mut synth = SpectralSynthesizer::from_acf(&acf);
        let mut rng = GaussianSource::new(3);
        let speckle = synth.synthesize_complex(&mut rng);
        assert_eq!(speckle.height(), 16);
        assert_eq!(speckle.width(), 16);
        assert!(speckle.is_finite());
    }
}
