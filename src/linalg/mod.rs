pub mod cholesky;
pub mod eigen;
pub mod eigensolver;
pub mod least_squares;
pub mod qr;
pub mod svd;
pub mod tridiagonal;

pub use cholesky::CholeskyDecomposition;
pub use eigen::EigenDecomposition;
pub use eigensolver::{EigenSettings, EigenSolver, EigenSolverStrategy, TridiagonalEigen};
pub use least_squares::{
    CholeskyLeastSquares, LeastSquares, LeastSquaresSettings, QrLeastSquares, SvdLeastSquares,
};
pub use qr::QrDecomposition;
pub use svd::SvdDecomposition;
pub use tridiagonal::TridiagonalDecomposition;

use num_traits::Float;

use crate::dynmatrix::DynMatrix;
use crate::traits::LinalgScalar;

/// Errors from linear algebra operations.
///
/// Returned by decomposition constructors, solves and the accessors that
/// take an index or an operand. Eigensolver non-convergence is never an
/// error; it is reported through [`EigenDecomposition::fail`].
///
/// ```
/// use tridiag::DynMatrix;
/// use tridiag::linalg::LinalgError;
///
/// let not_pd = DynMatrix::from_rows(2, 2, &[1.0_f64, 5.0, 5.0, 1.0]);
/// assert_eq!(not_pd.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// Operand shape does not match the decomposition (`(rows, cols)`).
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// Eigenvalue or eigenvector index outside `[0, len)`.
    IndexOutOfBounds { index: usize, len: usize },
    /// The orthogonal/unitary transform was not retained.
    MissingTransform,
    /// Matrix is not positive definite (required for Cholesky).
    NotPositiveDefinite,
    /// Triangular solve hit an exactly zero pivot.
    Singular,
    /// Iterative algorithm did not converge within the iteration budget.
    ConvergenceFailure,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::DimensionMismatch { expected, got } => write!(
                f,
                "dimension mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, got.0, got.1
            ),
            LinalgError::IndexOutOfBounds { index, len } => {
                write!(f, "index {} out of bounds for length {}", index, len)
            }
            LinalgError::MissingTransform => write!(f, "transform was not retained"),
            LinalgError::NotPositiveDefinite => write!(f, "matrix is not positive definite"),
            LinalgError::Singular => write!(f, "matrix is singular"),
            LinalgError::ConvergenceFailure => write!(f, "iterative algorithm did not converge"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}

/// Givens rotation: compute `(c, s)` such that `[c, s; -s, c] * [a; b] = [r; 0]`.
#[inline]
pub(crate) fn givens<R: Float>(a: R, b: R) -> (R, R) {
    if b == R::zero() {
        (R::one(), R::zero())
    } else if b.abs() > a.abs() {
        let t = a / b;
        let s = R::one() / (R::one() + t * t).sqrt();
        (s * t, s)
    } else {
        let t = b / a;
        let c = R::one() / (R::one() + t * t).sqrt();
        (c, c * t)
    }
}

/// Apply the plane rotation `[c, s; -s, c]` to columns `p` and `q` of `m`
/// from the right: `col_p <- c*col_p + s*col_q`, `col_q <- c*col_q - s*col_p`.
#[inline]
pub(crate) fn rotate_cols<T: LinalgScalar>(
    m: &mut DynMatrix<T>,
    p: usize,
    q: usize,
    c: T::Real,
    s: T::Real,
) {
    let (cp, cq) = m.two_cols_mut(p, q);
    let (c, s) = (T::from_real(c), T::from_real(s));
    for (x, y) in cp.iter_mut().zip(cq.iter_mut()) {
        let (a, b) = (*x, *y);
        *x = c * a + s * b;
        *y = c * b - s * a;
    }
}

/// Sort `values` ascending and permute the matching columns of `vecs`.
pub(crate) fn sort_ascending<T: LinalgScalar>(
    values: &mut [T::Real],
    vecs: Option<&mut DynMatrix<T>>,
) {
    let n = values.len();
    let mut vecs = vecs;
    for i in 0..n {
        let mut min_idx = i;
        for j in (i + 1)..n {
            if values[j] < values[min_idx] {
                min_idx = j;
            }
        }
        if min_idx != i {
            values.swap(i, min_idx);
            if let Some(v) = vecs.as_deref_mut() {
                v.swap_cols(i, min_idx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn givens_zeroes_second_component() {
        for &(a, b) in &[(3.0_f64, 4.0), (-1.0, 2.0), (5.0, -0.5), (0.0, 1.0), (2.0, 0.0)] {
            let (c, s) = givens(a, b);
            assert!((c * c + s * s - 1.0).abs() < 1e-14);
            assert!((-s * a + c * b).abs() < 1e-14, "({}, {})", a, b);
        }
    }

    #[test]
    fn sort_permutes_columns() {
        let mut vals = [3.0_f64, 1.0, 2.0];
        let mut v = DynMatrix::from_rows(1, 3, &[30.0_f64, 10.0, 20.0]);
        sort_ascending(&mut vals, Some(&mut v));
        assert_eq!(vals, [1.0, 2.0, 3.0]);
        assert_eq!(v.as_slice(), &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn error_display() {
        let e = LinalgError::DimensionMismatch { expected: (3, 1), got: (2, 1) };
        assert_eq!(format!("{}", e), "dimension mismatch: expected 3x1, got 2x1");
        let e = LinalgError::IndexOutOfBounds { index: 4, len: 2 };
        assert_eq!(format!("{}", e), "index 4 out of bounds for length 2");
    }
}
