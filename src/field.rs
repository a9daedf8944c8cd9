//! Two-dimensional sample fields.
//!
//! All synthesis stages operate on rectangular lattices stored row-major in
//! flat buffers, the same layout the FFT stage consumes. Every field taking
//! part in one synthesis shares identical `(height, width)` dimensions.
//!
//! ## Example
//!
//! ```rust
//! use sea_clutter::field::Field;
//!
//! let mut f = Field::zeros(4, 8);
//! f.set(1, 2, 3.5);
//! assert_eq!(f.get(1, 2), 3.5);
//! assert_eq!(f.len(), 32);
//! assert!(f.is_finite());
//! ```

use num_complex::Complex64;

/// Real-valued field on a rectangular lattice, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    height: usize,
    width: usize,
    data: Vec<f64>,
}

impl Field {
    /// Create a zero-filled field.
    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            data: vec![0.0; height * width],
        }
    }

    /// Build from a flat row-major buffer. The buffer length must equal
    /// `height * width`.
    pub fn from_vec(height: usize, width: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), height * width);
        Self { height, width, data }
    }

    /// Build by evaluating `f(row, col)` at every cell.
    pub fn from_fn(height: usize, width: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(height * width);
        for r in 0..height {
            for c in 0..width {
                data.push(f(r, c));
            }
        }
        Self { height, width, data }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the field has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.width + col]
    }

    /// Set value at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.width + col] = value;
    }

    /// Flat row-major view.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable flat row-major view.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Sample mean over all cells.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Sample variance over all cells (population form).
    pub fn variance(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        self.data.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / self.data.len() as f64
    }

    /// Minimum cell value.
    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Maximum cell value.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// True when every cell is finite (no NaN, no infinity).
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Map every cell through `f`, producing a new field.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Field {
        Field {
            height: self.height,
            width: self.width,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Copy into a complex buffer with zero imaginary parts.
    pub fn to_complex(&self) -> Vec<Complex64> {
        self.data.iter().map(|&v| Complex64::new(v, 0.0)).collect()
    }
}

/// Complex-valued field on a rectangular lattice, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexField {
    height: usize,
    width: usize,
    data: Vec<Complex64>,
}

impl ComplexField {
    /// Build from a flat row-major buffer. The buffer length must equal
    /// `height * width`.
    pub fn from_vec(height: usize, width: usize, data: Vec<Complex64>) -> Self {
        assert_eq!(data.len(), height * width);
        Self { height, width, data }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Value at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.width + col]
    }

    /// Flat row-major view.
    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    /// Real parts as a real field.
    pub fn re(&self) -> Field {
        Field {
            height: self.height,
            width: self.width,
            data: self.data.iter().map(|z| z.re).collect(),
        }
    }

    /// Per-cell magnitude as a real field.
    pub fn magnitude(&self) -> Field {
        Field {
            height: self.height,
            width: self.width,
            data: self.data.iter().map(|z| z.norm()).collect(),
        }
    }

    /// True when every cell is finite in both components.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|z| z.re.is_finite() && z.im.is_finite())
    }
}
