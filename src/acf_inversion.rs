//! Per-cell inversion of the ACF relation polynomial.
//!
//! Given the target texture ACF field and the estimated relation
//! `t = a2 g^2 + a1 g + a0`, solve for the Gaussian ACF value `g`
//! independently at every spatial-lag cell:
//!
//! ```text
//! a2 g^2 + a1 g + (a0 - t) = 0
//! ```
//!
//! Root policy: the coefficients are non-negative, so the polynomial is
//! increasing for `g` right of its vertex; the root on that increasing
//! branch is the one connected to the boundary point `p(1) = 1` and is taken
//! as the inverse. A negative discriminant has no real solution; the vertex
//! (the real part of the conjugate pair) is used. Results are clamped to the
//! physically valid correlation range `[-1, 1]`; clamped and
//! complex-discriminant cells are counted in [`InversionReport`] so the
//! caller can see how far the target ACF sits from what the truncated
//! relation can realize.
//!
//! The per-cell solve has no cross-cell dependency; with the `parallel`
//! feature rows are mapped with rayon.

use crate::acf_relation::AcfPolynomial;
use crate::field::Field;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Diagnostic counts from one inversion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InversionReport {
    /// Cells whose root fell outside [-1, 1] and were clamped.
    pub clamped_cells: usize,
    /// Cells with a negative discriminant (no real root).
    pub complex_root_cells: usize,
}

/// Outcome of a single-cell solve.
#[derive(Debug, Clone, Copy)]
struct CellSolve {
    g: f64,
    clamped: bool,
    complex_root: bool,
}

/// Solve the relation for one texture-ACF value.
fn solve_cell(poly: &AcfPolynomial, t: f64) -> CellSolve {
    let [a2, a1, a0] = poly.coefficients();
    let c = a0 - t;

    let root = if a2.abs() < 1e-14 {
        // Degenerate quadratic term: linear relation
        if a1.abs() < 1e-14 {
            0.0
        } else {
            -c / a1
        }
    } else {
        let disc = a1 * a1 - 4.0 * a2 * c;
        if disc < 0.0 {
            // Vertex: nearest real point to the conjugate pair
            let g = -a1 / (2.0 * a2);
            let clamped = !(-1.0..=1.0).contains(&g);
            return CellSolve {
                g: g.clamp(-1.0, 1.0),
                clamped,
                complex_root: true,
            };
        }
        // Increasing-branch root
        (-a1 + disc.sqrt()) / (2.0 * a2)
    };

    let clamped = !(-1.0..=1.0).contains(&root);
    CellSolve {
        g: root.clamp(-1.0, 1.0),
        clamped,
        complex_root: false,
    }
}

/// Invert the texture ACF field into the Gaussian ACF field, cell by cell.
pub fn invert_acf(texture_acf: &Field, poly: &AcfPolynomial) -> (Field, InversionReport) {
    let solves = run_cells(texture_acf.as_slice(), poly);

    let mut report = InversionReport::default();
    let mut data = Vec::with_capacity(solves.len());
    for s in solves {
        if s.clamped {
            report.clamped_cells += 1;
        }
        if s.complex_root {
            report.complex_root_cells += 1;
        }
        data.push(s.g);
    }
    (
        Field::from_vec(texture_acf.height(), texture_acf.width(), data),
        report,
    )
}

#[cfg(feature = "parallel")]
fn run_cells(cells: &[f64], poly: &AcfPolynomial) -> Vec<CellSolve> {
    cells.par_iter().map(|&t| solve_cell(poly, t)).collect()
}

#[cfg(not(feature = "parallel"))]
fn run_cells(cells: &[f64], poly: &AcfPolynomial) -> Vec<CellSolve> {
    cells.iter().map(|&t| solve_cell(poly, t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(raw: [f64; 3]) -> AcfPolynomial {
        AcfPolynomial::from_raw(raw).unwrap()
    }

    #[test]
    fn test_recovers_known_roots() {
        let p = poly([0.2, 0.6, 0.2]);
        for &g0 in &[-0.9, -0.5, 0.0, 0.3, 0.7, 1.0] {
            let t = p.eval(g0);
            let (field, report) = invert_acf(&Field::from_vec(1, 1, vec![t]), &p);
            // g0 on the increasing branch is recovered exactly
            if g0 >= -0.6 / (2.0 * 0.2) {
                assert!(
                    (field.get(0, 0) - g0).abs() < 1e-10,
                    "failed to recover g0={g0}: got {}",
                    field.get(0, 0)
                );
            }
            assert_eq!(report.complex_root_cells, 0);
        }
    }

    #[test]
    fn test_boundary_point_maps_to_one() {
        let p = poly([0.09, 0.41, 0.50]);
        let (field, report) = invert_acf(&Field::from_vec(1, 1, vec![1.0]), &p);
        assert!((field.get(0, 0) - 1.0).abs() < 1e-10);
        assert_eq!(report.clamped_cells, 0);
    }

    #[test]
    fn test_clamps_out_of_range_targets() {
        let p = poly([0.2, 0.6, 0.2]);
        // t > p(1) = 1 forces the root above 1
        let (field, report) = invert_acf(&Field::from_vec(1, 2, vec![1.5, 0.9]), &p);
        assert_eq!(field.get(0, 0), 1.0);
        assert_eq!(report.clamped_cells, 1);
        assert!(field.get(0, 1) < 1.0);
    }

    #[test]
    fn test_complex_discriminant_counted() {
        // Vertex value of (0.5 g^2 + 0.1 g + 0.4)/1.0 is a0 - a1^2/(4 a2) = 0.395;
        // targets below it have no real root
        let p = poly([0.5, 0.1, 0.4]);
        let (field, report) = invert_acf(&Field::from_vec(1, 1, vec![0.1]), &p);
        assert_eq!(report.complex_root_cells, 1);
        // Vertex is -a1/(2 a2) = -0.1
        assert!((field.get(0, 0) + 0.1).abs() < 1e-10);
    }

    #[test]
    fn test_field_shape_and_counts() {
        let p = poly([0.1, 0.5, 0.4]);
        let texture = Field::from_fn(8, 16, |r, c| 0.9 + 0.002 * (r + c) as f64);
        let (gaussian, report) = invert_acf(&texture, &p);
        assert_eq!(gaussian.height(), 8);
        assert_eq!(gaussian.width(), 16);
        assert!(gaussian.is_finite());
        assert!(gaussian.max() <= 1.0 && gaussian.min() >= -1.0);
        assert_eq!(report.complex_root_cells, 0);
    }

    #[test]
    fn test_inverse_is_monotone_in_target() {
        let p = poly([0.2, 0.6, 0.2]);
        let targets: Vec<f64> = (0..50).map(|i| 0.5 + 0.01 * i as f64).collect();
        let (field, _) = invert_acf(&Field::from_vec(1, 50, targets), &p);
        for c in 1..50 {
            assert!(
                field.get(0, c) >= field.get(0, c - 1),
                "inverse not monotone at column {c}"
            );
        }
    }
}
