use num_traits::Zero;

use crate::traits::{LinalgScalar, Scalar};

use super::vector::DynVector;
use super::DynMatrix;

impl<T: Scalar> DynMatrix<T> {
    /// Sum of diagonal elements.
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(m.trace(), 5.0);
    /// ```
    pub fn trace(&self) -> T {
        let n = self.nrows.min(self.ncols);
        let mut sum = T::zero();
        for i in 0..n {
            sum = sum + self[(i, i)];
        }
        sum
    }

    /// Create a square diagonal matrix from a vector.
    pub fn from_diag(v: &DynVector<T>) -> Self {
        let n = v.len();
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = v[i];
        }
        m
    }

    /// Check if the matrix is exactly symmetric (`A == A^T`).
    pub fn is_symmetric(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows;
        for i in 0..n {
            for j in (i + 1)..n {
                if self[(i, j)] != self[(j, i)] {
                    return false;
                }
            }
        }
        true
    }
}

impl<T: LinalgScalar> DynMatrix<T> {
    /// Check `|a_ij - conj(a_ji)| <= tol` for every pair (diagonal included).
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// let h = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 3.0]);
    /// assert!(h.is_hermitian(0.0));
    /// ```
    pub fn is_hermitian(&self, tol: T::Real) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows;
        for j in 0..n {
            for i in j..n {
                if (self[(i, j)] - self[(j, i)].conj()).modulus() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Largest modulus of `self - other`.
    pub fn max_abs_diff(&self, other: &DynMatrix<T>) -> T::Real {
        assert_eq!(
            (self.nrows, self.ncols),
            (other.nrows, other.ncols),
            "dimension mismatch",
        );
        let mut max = <T::Real as Zero>::zero();
        for (&a, &b) in self.data.iter().zip(other.data.iter()) {
            let d = (a - b).modulus();
            if d > max {
                max = d;
            }
        }
        max
    }
}
