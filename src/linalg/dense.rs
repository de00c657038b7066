//! Dense row-major matrix helpers.
//!
//! An m×m matrix is a `Vec<f64>`/`&[f64]` of length m·m with entry (i, j)
//! stored at `i * m + j`. This is the storage the factorization engine works
//! on; no sparse format is involved anywhere in the crate.

/// Build the m×m identity matrix.
pub fn identity(m: usize) -> Vec<f64> {
    let mut matrix = vec![0.0; m * m];
    for i in 0..m {
        matrix[i * m + i] = 1.0;
    }
    matrix
}

/// Swap rows `r1` and `r2` of an m×m matrix in place.
pub fn row_swap(matrix: &mut [f64], m: usize, r1: usize, r2: usize) {
    debug_assert_eq!(matrix.len(), m * m);
    for k in 0..m {
        matrix.swap(r1 * m + k, r2 * m + k);
    }
}

/// Multiply two m×m matrices: `result = left · right`.
pub fn matrix_multiply(m: usize, left: &[f64], right: &[f64], result: &mut [f64]) {
    assert_eq!(left.len(), m * m);
    assert_eq!(right.len(), m * m);
    assert_eq!(result.len(), m * m);

    for row in 0..m {
        for col in 0..m {
            let mut sum = 0.0;
            for k in 0..m {
                sum += left[row * m + k] * right[k * m + col];
            }
            result[row * m + col] = sum;
        }
    }
}

/// Multiply an m×m matrix by a column vector: `result = matrix · x`.
pub fn matrix_vector_multiply(m: usize, matrix: &[f64], x: &[f64], result: &mut [f64]) {
    assert_eq!(matrix.len(), m * m);
    assert_eq!(x.len(), m);
    assert_eq!(result.len(), m);

    for row in 0..m {
        let mut sum = 0.0;
        for k in 0..m {
            sum += matrix[row * m + k] * x[k];
        }
        result[row] = sum;
    }
}

/// Multiply a row vector by an m×m matrix: `result = x · matrix`.
pub fn vector_matrix_multiply(m: usize, x: &[f64], matrix: &[f64], result: &mut [f64]) {
    assert_eq!(matrix.len(), m * m);
    assert_eq!(x.len(), m);
    assert_eq!(result.len(), m);

    for col in 0..m {
        let mut sum = 0.0;
        for k in 0..m {
            sum += x[k] * matrix[k * m + col];
        }
        result[col] = sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let eye = identity(3);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_eq!(eye[i * 3 + j], expected);
            }
        }
    }

    #[test]
    fn test_row_swap() {
        let mut matrix = vec![
            1.0, 2.0, //
            3.0, 4.0,
        ];
        row_swap(&mut matrix, 2, 0, 1);
        assert_eq!(matrix, vec![3.0, 4.0, 1.0, 2.0]);
    }

    #[test]
    fn test_matrix_multiply() {
        // [1 2; 3 4] · [5 6; 7 8] = [19 22; 43 50]
        let left = vec![1.0, 2.0, 3.0, 4.0];
        let right = vec![5.0, 6.0, 7.0, 8.0];
        let mut result = vec![0.0; 4];
        matrix_multiply(2, &left, &right, &mut result);
        assert_eq!(result, vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_vector_products() {
        // [1 2; 3 4] · [1, 1]^T = [3, 7]; [1, 1] · [1 2; 3 4] = [4, 6]
        let matrix = vec![1.0, 2.0, 3.0, 4.0];
        let x = vec![1.0, 1.0];
        let mut result = vec![0.0; 2];

        matrix_vector_multiply(2, &matrix, &x, &mut result);
        assert_eq!(result, vec![3.0, 7.0]);

        vector_matrix_multiply(2, &x, &matrix, &mut result);
        assert_eq!(result, vec![4.0, 6.0]);
    }
}
