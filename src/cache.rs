//! Memoization of engine setups.
//!
//! The one-time setup (noise realization, coefficient estimate, per-cell
//! inversion) depends only on the grid, the Gamma shape parameter, the
//! texture-ACF model, the lag origin and the seed; the speckle model only
//! affects per-frame synthesis. [`SetupCache`] keys on exactly those inputs,
//! so engines that differ only in their speckle model share one setup.
//! At most one computation proceeds at a time; concurrent requests for the
//! same key block on the in-flight computation and share its result.
//!
//! Float parameters are keyed by bit pattern; two configurations hash equal
//! only when their parameters are bitwise identical.
//!
//! ## Example
//!
//! ```rust
//! use sea_clutter::cache::SetupCache;
//! use sea_clutter::engine::{EngineConfig, KFieldEngine};
//!
//! let cache = SetupCache::new();
//! let config = EngineConfig { height: 16, width: 16, ..Default::default() };
//! let a = KFieldEngine::with_cache(config, &cache).unwrap();
//! let b = KFieldEngine::with_cache(config, &cache).unwrap();
//! assert_eq!(a.gaussian_acf(), b.gaussian_acf());
//! assert_eq!(cache.len(), 1);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::acf::TextureAcf;
use crate::engine::{EngineConfig, EngineSetup, KFieldEngine};
use crate::error::ClutterError;

/// Cache key: every input the setup computation reads, floats by bit
/// pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SetupKey {
    height: usize,
    width: usize,
    shape_bits: u64,
    texture: TextureKey,
    lag_origin_bits: u64,
    seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TextureKey {
    ExponentialCosine { decay_bits: u64, period_bits: u64 },
}

impl SetupKey {
    fn of(config: &EngineConfig) -> Self {
        let texture = match config.texture_acf {
            TextureAcf::ExponentialCosine { decay, period } => TextureKey::ExponentialCosine {
                decay_bits: decay.to_bits(),
                period_bits: period.to_bits(),
            },
        };
        Self {
            height: config.height,
            width: config.width,
            shape_bits: config.gamma_shape.to_bits(),
            texture,
            lag_origin_bits: config.lag_origin.to_bits(),
            seed: config.seed,
        }
    }
}

/// Shared memo of computed [`EngineSetup`]s.
#[derive(Debug, Default)]
pub struct SetupCache {
    setups: Mutex<HashMap<SetupKey, Arc<EngineSetup>>>,
}

impl SetupCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct setups held.
    pub fn len(&self) -> usize {
        self.setups.lock().expect("setup cache poisoned").len()
    }

    /// True when no setup has been computed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached setups.
    pub fn clear(&self) {
        self.setups.lock().expect("setup cache poisoned").clear();
    }

    /// Fetch the setup for `config`, computing and storing it on first use.
    ///
    /// The lock is held across the computation, so at most one setup runs at
    /// a time and concurrent callers for the same key block and then share
    /// the first caller's result.
    pub fn get_or_compute(&self, config: &EngineConfig) -> Result<Arc<EngineSetup>, ClutterError> {
        let key = SetupKey::of(config);
        let mut setups = self.setups.lock().expect("setup cache poisoned");
        if let Some(setup) = setups.get(&key) {
            return Ok(Arc::clone(setup));
        }
        let setup = Arc::new(EngineSetup::compute(config)?);
        setups.insert(key, Arc::clone(&setup));
        Ok(setup)
    }
}

impl KFieldEngine {
    /// Build an engine whose one-time setup is fetched from (or stored
    /// into) `cache`.
    pub fn with_cache(config: EngineConfig, cache: &SetupCache) -> Result<Self, ClutterError> {
        let setup = cache.get_or_compute(&config)?;
        KFieldEngine::from_setup(config, setup)
    }
}
