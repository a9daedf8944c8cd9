//! Seedable Gaussian sample source.
//!
//! Every synthesis call draws fresh randomness from an explicitly passed
//! generator, so any run can be made deterministic by fixing the seed.
//! Uniform variates come from xoshiro256**; standard-normal variates from the
//! Box-Muller transform.
//!
//! ## Example
//!
//! ```rust
//! use sea_clutter::rng::GaussianSource;
//!
//! let mut rng = GaussianSource::new(42);
//! let field = rng.fill(16, 16);
//! assert!(field.mean().abs() < 0.5);
//! ```

use crate::field::Field;

/// Seedable standard-normal sample source (xoshiro256** + Box-Muller).
#[derive(Debug, Clone)]
pub struct GaussianSource {
    state: [u64; 4],
}

impl GaussianSource {
    /// Create a generator from a seed. Equal seeds yield equal streams.
    pub fn new(seed: u64) -> Self {
        // SplitMix-style expansion of the seed into the xoshiro state
        let mut state = [0u64; 4];
        state[0] = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        state[1] = state[0].wrapping_mul(6364136223846793005).wrapping_add(1);
        state[2] = state[1].wrapping_mul(6364136223846793005).wrapping_add(1);
        state[3] = state[2].wrapping_mul(6364136223846793005).wrapping_add(1);
        Self { state }
    }

    /// Uniform random value in [0, 1) using xoshiro256**.
    pub fn uniform(&mut self) -> f64 {
        let s = &mut self.state;
        let result = s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = s[1] << 17;
        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];
        s[2] ^= t;
        s[3] = s[3].rotate_left(45);
        (result >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Standard-normal sample via the Box-Muller transform.
    pub fn standard_normal(&mut self) -> f64 {
        let u1 = self.uniform();
        let u2 = self.uniform();
        let r = (-2.0 * u1.max(1e-30).ln()).sqrt();
        r * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Fill a `height x width` field with i.i.d. standard-normal samples.
    pub fn fill(&mut self, height: usize, width: usize) -> Field {
        let data = (0..height * width).map(|_| self.standard_normal()).collect();
        Field::from_vec(height, width, data)
    }
}
