use alloc::vec;

use num_traits::{Float, Zero};

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::LinalgError;
use crate::traits::{LinalgScalar, MatrixMut, MatrixRef};

/// Cholesky decomposition in place: A = L * L^H.
///
/// For real matrices, L^H = L^T (standard Cholesky).
/// For complex matrices, this is the Hermitian Cholesky decomposition and
/// only the real part of each diagonal entry is used.
///
/// On return, the lower triangle of `a` (including diagonal) contains L.
/// The upper triangle is left unchanged.
///
/// Returns an error if the matrix is not (Hermitian) positive definite.
pub fn cholesky_in_place<T: LinalgScalar>(a: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "Cholesky decomposition requires a square matrix");

    for j in 0..n {
        // a[j.., j] -= conj(l_jk) * l[j.., k]
        for k in 0..j {
            let ljk_conj = (*a.get(j, k)).conj();
            for i in j..n {
                let lik = *a.get(i, k);
                let aij = *a.get(i, j);
                *a.get_mut(i, j) = aij - ljk_conj * lik;
            }
        }

        let diag = (*a.get(j, j)).re();
        if diag.is_nan() || diag <= <T::Real as Zero>::zero() {
            return Err(LinalgError::NotPositiveDefinite);
        }
        let ljj = T::from_real(diag.lsqrt());
        *a.get_mut(j, j) = ljj;

        let inv_ljj = T::one() / ljj;
        for x in a.col_as_mut_slice(j, j + 1).iter_mut() {
            *x = *x * inv_ljj;
        }
    }

    Ok(())
}

/// Solve L*x = b by forward substitution, where L is lower triangular.
pub fn forward_substitute<T: LinalgScalar>(l: &impl MatrixRef<T>, b: &[T], x: &mut [T]) {
    let n = l.nrows();
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum = sum - *l.get(i, j) * x[j];
        }
        x[i] = sum / *l.get(i, i);
    }
}

/// Solve L^H * x = b by back substitution, where L is lower triangular.
pub fn back_substitute_lt<T: LinalgScalar>(l: &impl MatrixRef<T>, b: &[T], x: &mut [T]) {
    let n = l.nrows();
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum = sum - (*l.get(j, i)).conj() * x[j];
        }
        x[i] = sum / (*l.get(i, i)).conj();
    }
}

/// Cholesky decomposition of a (Hermitian) positive-definite matrix.
///
/// # Example
///
/// ```
/// use tridiag::{DynMatrix, DynVector};
///
/// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 3.0]);
/// let chol = a.cholesky().unwrap();
///
/// let b = DynVector::from_slice(&[8.0, 7.0]);
/// let x = chol.solve(&b).unwrap();
/// assert!((x[0] - 1.25).abs() < 1e-12);
/// assert!((chol.det() - 8.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition<T> {
    /// Lower triangular factor with zeros above the diagonal.
    l: DynMatrix<T>,
}

impl<T: LinalgScalar> CholeskyDecomposition<T> {
    /// Decompose a (Hermitian) positive-definite matrix.
    pub fn new(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        assert!(a.is_square(), "Cholesky decomposition requires a square matrix");
        let mut l = a.clone();
        cholesky_in_place(&mut l)?;
        let n = l.nrows();
        for j in 0..n {
            for i in 0..j {
                l[(i, j)] = T::zero();
            }
        }
        Ok(Self { l })
    }

    /// The lower triangular factor L (`A = L * L^H`).
    pub fn l(&self) -> &DynMatrix<T> {
        &self.l
    }

    /// Solve `A * x = b`.
    pub fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        let n = self.l.nrows();
        if b.len() != n {
            return Err(LinalgError::DimensionMismatch {
                expected: (n, 1),
                got: (b.len(), 1),
            });
        }
        let mut y = vec![T::zero(); n];
        let mut x = vec![T::zero(); n];
        forward_substitute(&self.l, b.as_slice(), &mut y);
        back_substitute_lt(&self.l, &y, &mut x);
        Ok(DynVector::from_vec(x))
    }

    /// Determinant: det(A) = (Π L[i,i])².
    pub fn det(&self) -> T {
        let mut prod = T::one();
        for i in 0..self.l.nrows() {
            prod = prod * self.l[(i, i)];
        }
        prod * prod
    }
}
