//! Eta update matrices.
//!
//! An eta matrix E(c, v) is the m×m identity with column `c` replaced by a
//! dense vector `v` with v[c] ≠ 0. One eta records one basis change: the
//! entering column expressed in the current basis. The same shape, with a
//! unit-triangular column, encodes one Gaussian elimination step of the LU
//! factorization.

use crate::linalg::dense;
use crate::util::numerics;

/// An m×m identity matrix with one column replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct EtaMatrix {
    /// Index of the replaced column
    column_index: usize,
    /// Dense replacement column, length m
    column: Vec<f64>,
}

impl EtaMatrix {
    /// Create an eta matrix from its replaced column.
    ///
    /// The diagonal entry `column[column_index]` must be nonzero, otherwise
    /// the matrix would be singular and the solves below would divide by
    /// zero.
    pub fn new(column_index: usize, column: Vec<f64>) -> Self {
        debug_assert!(column_index < column.len());
        debug_assert!(
            column[column_index] != 0.0,
            "eta diagonal entry must be nonzero"
        );
        Self {
            column_index,
            column,
        }
    }

    /// Dimension m of the (logical) square matrix.
    pub fn dim(&self) -> usize {
        self.column.len()
    }

    /// Index of the replaced column.
    pub fn column_index(&self) -> usize {
        self.column_index
    }

    /// The replacement column.
    pub fn column(&self) -> &[f64] {
        &self.column
    }

    /// The diagonal entry of the replaced column.
    pub fn diagonal(&self) -> f64 {
        self.column[self.column_index]
    }

    /// In-place left multiplication `x := E · x`.
    ///
    /// Only the original value of x[c] feeds the update: the pivot entry is
    /// scaled by the diagonal, every other entry picks up x[c] times its row
    /// of the replacement column.
    pub fn multiply_left(&self, x: &mut [f64], tolerance: f64) {
        debug_assert_eq!(x.len(), self.dim());

        let c = self.column_index;
        let x_c = x[c];
        for i in 0..x.len() {
            if i == c {
                x[i] *= self.column[c];
            } else {
                x[i] += x_c * self.column[i];
            }
            x[i] = numerics::snap(x[i], tolerance);
        }
    }

    /// In-place right multiplication `x := x · E` for a row vector.
    ///
    /// Only the entry at the replaced column changes: it becomes the inner
    /// product of `x` with the replacement column.
    pub fn multiply_right(&self, x: &mut [f64], tolerance: f64) {
        debug_assert_eq!(x.len(), self.dim());

        let mut sum = 0.0;
        for i in 0..x.len() {
            sum += self.column[i] * x[i];
        }
        x[self.column_index] = numerics::snap(sum, tolerance);
    }

    /// Materialize the full dense m×m matrix.
    ///
    /// Intended for inspection and residual checks; the solve kernels never
    /// build this.
    pub fn to_dense(&self) -> Vec<f64> {
        let m = self.dim();
        let mut matrix = dense::identity(m);
        for i in 0..m {
            matrix[i * m + self.column_index] = self.column[i];
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::numerics::DEFAULT_ZERO_TOLERANCE;

    #[test]
    fn test_multiply_left() {
        // E(1, [1, 2, 3]) · [4, 5, 6]^T = [4 + 5·1, 5·2, 6 + 5·3]
        let eta = EtaMatrix::new(1, vec![1.0, 2.0, 3.0]);
        let mut x = vec![4.0, 5.0, 6.0];
        eta.multiply_left(&mut x, DEFAULT_ZERO_TOLERANCE);
        assert_eq!(x, vec![9.0, 10.0, 21.0]);
    }

    #[test]
    fn test_multiply_right() {
        // [4, 5, 6] · E(1, [1, 2, 3]) changes only entry 1:
        // 4·1 + 5·2 + 6·3 = 32
        let eta = EtaMatrix::new(1, vec![1.0, 2.0, 3.0]);
        let mut x = vec![4.0, 5.0, 6.0];
        eta.multiply_right(&mut x, DEFAULT_ZERO_TOLERANCE);
        assert_eq!(x, vec![4.0, 32.0, 6.0]);
    }

    #[test]
    fn test_multiply_snaps_residue() {
        // The pivot update cancels exactly up to roundoff; the snap turns
        // the leftover into a clean zero.
        let eta = EtaMatrix::new(0, vec![1.0, -1.0]);
        let mut x = vec![1.0, 1.0 + 1e-12];
        eta.multiply_left(&mut x, DEFAULT_ZERO_TOLERANCE);
        assert_eq!(x[1], 0.0);
    }

    #[test]
    fn test_to_dense() {
        let eta = EtaMatrix::new(0, vec![2.0, -1.0]);
        assert_eq!(eta.to_dense(), vec![2.0, 0.0, -1.0, 1.0]);
    }
}
