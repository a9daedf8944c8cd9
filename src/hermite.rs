//! Bounded-order Hermite polynomial evaluator.
//!
//! Physicists' Hermite polynomials `H_n(x) = (-1)^n exp(x^2) d^n/dx^n
//! exp(-x^2)` in closed form for orders 0 through 5. The ACF relation
//! estimator only requests orders 0..=2; higher orders up to 5 are defined,
//! anything above is rejected at construction rather than silently
//! miscomputed.
//!
//! ## Example
//!
//! ```rust
//! use sea_clutter::hermite::HermiteOrder;
//!
//! let h2 = HermiteOrder::new(2).unwrap();
//! assert_eq!(h2.eval(1.0), 2.0); // 4x^2 - 2
//! assert!(HermiteOrder::new(6).is_err());
//! ```

use crate::error::ClutterError;

/// Largest supported polynomial order.
pub const MAX_ORDER: usize = 5;

/// A validated Hermite polynomial order in 0..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HermiteOrder(usize);

impl HermiteOrder {
    /// Validate an order. Orders above [`MAX_ORDER`] are rejected.
    pub fn new(order: usize) -> Result<Self, ClutterError> {
        if order > MAX_ORDER {
            return Err(ClutterError::UnsupportedOrder {
                order,
                max: MAX_ORDER,
            });
        }
        Ok(Self(order))
    }

    /// The wrapped order.
    pub fn order(&self) -> usize {
        self.0
    }

    /// Evaluate H_n(x).
    pub fn eval(&self, x: f64) -> f64 {
        match self.0 {
            0 => 1.0,
            1 => 2.0 * x,
            2 => 4.0 * x * x - 2.0,
            3 => 8.0 * x.powi(3) - 12.0 * x,
            4 => 16.0 * x.powi(4) - 48.0 * x * x + 12.0,
            5 => 32.0 * x.powi(5) - 160.0 * x.powi(3) + 120.0 * x,
            _ => unreachable!("order validated at construction"),
        }
    }
}
