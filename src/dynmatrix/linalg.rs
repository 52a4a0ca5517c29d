use alloc::vec::Vec;

use crate::linalg::least_squares::{LeastSquares, QrLeastSquares};
use crate::linalg::{
    CholeskyDecomposition, EigenDecomposition, EigenSolver, LinalgError, QrDecomposition,
    SvdDecomposition, TridiagonalDecomposition,
};
use crate::traits::LinalgScalar;

use super::vector::DynVector;
use super::DynMatrix;

// ── Convenience methods on DynMatrix ────────────────────────────────

impl<T: LinalgScalar> DynMatrix<T> {
    /// Cholesky decomposition (`A = L * L^H`).
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// use tridiag::linalg::LinalgError;
    /// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 1.0]);
    /// assert_eq!(a.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
    /// ```
    pub fn cholesky(&self) -> Result<CholeskyDecomposition<T>, LinalgError> {
        CholeskyDecomposition::new(self)
    }

    /// QR decomposition using Householder reflections.
    pub fn qr(&self) -> Result<QrDecomposition<T>, LinalgError> {
        QrDecomposition::new(self)
    }

    /// QR decomposition with column pivoting, `A P = Q R`.
    pub fn qr_pivoted(&self) -> Result<QrDecomposition<T>, LinalgError> {
        QrDecomposition::with_pivoting(self)
    }

    /// Singular value decomposition.
    ///
    /// Works for any M×N matrix (tall or wide).
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// let a = DynMatrix::from_rows(3, 2, &[
    ///     1.0_f64, 0.0,
    ///     0.0, 1.0,
    ///     0.0, 0.0,
    /// ]);
    /// let svd = a.svd().unwrap();
    /// assert!((svd.singular_values()[0] - 1.0).abs() < 1e-10);
    /// ```
    pub fn svd(&self) -> Result<SvdDecomposition<T>, LinalgError> {
        SvdDecomposition::new(self)
    }

    /// Reduction to real symmetric tridiagonal form, keeping `Q`.
    pub fn tridiagonal(&self) -> Result<TridiagonalDecomposition<T>, LinalgError> {
        TridiagonalDecomposition::new(self, true)
    }

    /// Least-squares solution of `A x ≈ b` via pivoted QR.
    ///
    /// ```
    /// use tridiag::{DynMatrix, DynVector};
    /// let a = DynMatrix::from_rows(3, 1, &[1.0_f64, 1.0, 1.0]);
    /// let b = DynVector::from_slice(&[1.0, 2.0, 6.0]);
    /// let x = a.least_squares(&b).unwrap();
    /// assert!((x[0] - 3.0).abs() < 1e-12);
    /// ```
    pub fn least_squares(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        QrLeastSquares::new(self)?.solve(b)
    }

    /// Hermitian eigen-decomposition with eigenvectors.
    ///
    /// Non-convergence is not an error; check `good()` on the result.
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 2, &[5.0_f64, 2.0, 2.0, 2.0]);
    /// let eig = a.eig_hermitian().unwrap();
    /// assert!((eig.eigenvalues()[0] - 1.0).abs() < 1e-10);
    /// assert!((eig.eigenvalues()[1] - 6.0).abs() < 1e-10);
    /// ```
    pub fn eig_hermitian(&self) -> Result<EigenDecomposition<T>, LinalgError>
    where
        EigenSolver<T::Real>: Default,
    {
        EigenDecomposition::new(self, true)
    }

    /// Eigenvalues of a Hermitian matrix (no eigenvectors), ascending.
    pub fn eigenvalues_hermitian(&self) -> Result<Vec<T::Real>, LinalgError>
    where
        EigenSolver<T::Real>: Default,
    {
        Ok(EigenDecomposition::new(self, false)?.eigenvalues().to_vec())
    }
}
