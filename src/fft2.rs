//! Two-dimensional FFT processor.
//!
//! Row/column decomposition of the 2-D discrete Fourier transform over
//! planned `rustfft` instances with reusable scratch. The forward transform
//! is unnormalized; the inverse divides by `height * width`, so
//! `ifft2(fft2(x)) == x`.
//!
//! The transform treats the lattice as periodic; long-range correlations
//! wrap around grid boundaries, an accepted approximation for lags small
//! relative to grid size.
//!
//! ## Example
//!
//! ```rust
//! use sea_clutter::fft2::Fft2dProcessor;
//! use num_complex::Complex64;
//!
//! let mut fft = Fft2dProcessor::new(4, 4);
//! let mut data = vec![Complex64::new(1.0, 0.0); 16];
//! fft.fft2_inplace(&mut data);
//! // DC bin holds the sum, every other bin is zero
//! assert!((data[0].re - 16.0).abs() < 1e-9);
//! assert!(data[1].norm() < 1e-9);
//! ```

use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

use num_complex::Complex64;

/// 2-D FFT processor for a fixed `(height, width)` grid.
pub struct Fft2dProcessor {
    height: usize,
    width: usize,
    row_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
    scratch: Vec<Complex64>,
    col_buf: Vec<Complex64>,
}

impl fmt::Debug for Fft2dProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fft2dProcessor")
            .field("height", &self.height)
            .field("width", &self.width)
            .finish()
    }
}

impl Fft2dProcessor {
    /// Plan transforms for a `height x width` grid.
    pub fn new(height: usize, width: usize) -> Self {
        let mut planner = FftPlanner::new();
        let row_forward = planner.plan_fft_forward(width);
        let row_inverse = planner.plan_fft_inverse(width);
        let col_forward = planner.plan_fft_forward(height);
        let col_inverse = planner.plan_fft_inverse(height);

        let scratch_len = row_forward
            .get_inplace_scratch_len()
            .max(row_inverse.get_inplace_scratch_len())
            .max(col_forward.get_inplace_scratch_len())
            .max(col_inverse.get_inplace_scratch_len());

        Self {
            height,
            width,
            row_forward,
            row_inverse,
            col_forward,
            col_inverse,
            scratch: vec![Complex64::new(0.0, 0.0); scratch_len],
            col_buf: vec![Complex64::new(0.0, 0.0); height],
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

    /// Forward 2-D FFT in place over a row-major buffer (unnormalized).
    pub fn fft2_inplace(&mut self, data: &mut [Complex64]) {
        assert_eq!(data.len(), self.height * self.width);
        let row_fft = Arc::clone(&self.row_forward);
        let col_fft = Arc::clone(&self.col_forward);
        self.transform_rows(&row_fft, data);
        self.transform_cols(&col_fft, data);
    }

    /// Inverse 2-D FFT in place, normalized by `1 / (height * width)`.
    pub fn ifft2_inplace(&mut self, data: &mut [Complex64]) {
        assert_eq!(data.len(), self.height * self.width);
        let row_fft = Arc::clone(&self.row_inverse);
        let col_fft = Arc::clone(&self.col_inverse);
        self.transform_rows(&row_fft, data);
        self.transform_cols(&col_fft, data);

        let scale = 1.0 / (self.height * self.width) as f64;
        for v in data.iter_mut() {
            *v *= scale;
        }
    }

    /// Forward 2-D FFT of a real row-major buffer, returning the spectrum.
    pub fn fft2_real(&mut self, data: &[f64]) -> Vec<Complex64> {
        assert_eq!(data.len(), self.height * self.width);
        let mut buffer: Vec<Complex64> = data.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        self.fft2_inplace(&mut buffer);
        buffer
    }

    fn transform_rows(&mut self, fft: &Arc<dyn Fft<f64>>, data: &mut [Complex64]) {
        for row in data.chunks_exact_mut(self.width) {
            fft.process_with_scratch(row, &mut self.scratch);
        }
    }

    fn transform_cols(&mut self, fft: &Arc<dyn Fft<f64>>, data: &mut [Complex64]) {
        for col in 0..self.width {
            for row in 0..self.height {
                self.col_buf[row] = data[row * self.width + col];
            }
            fft.process_with_scratch(&mut self.col_buf, &mut self.scratch);
            for row in 0..self.height {
                data[row * self.width + col] = self.col_buf[row];
            }
        }
    }
}
