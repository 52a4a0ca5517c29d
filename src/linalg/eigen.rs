use alloc::vec::Vec;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::eigensolver::{EigenSolver, TridiagonalEigen};
use crate::linalg::tridiagonal::TridiagonalDecomposition;
use crate::linalg::LinalgError;
use crate::packed::{BandMatrix, PackedMatrix};
use crate::traits::LinalgScalar;

/// Eigen-decomposition of a symmetric/Hermitian matrix: `A v_i = λ_i v_i`.
///
/// The matrix is reduced to real tridiagonal form, the tridiagonal problem
/// is solved by an [`EigenSolver`], and its eigenvectors are mapped back
/// through the reduction's `Q`.
///
/// A result may be partial. Check [`good`](Self::good) before relying on
/// all `n` pairs being present.
///
/// # Example
///
/// ```
/// use tridiag::DynMatrix;
/// use tridiag::linalg::EigenDecomposition;
///
/// let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 2.0]);
/// let eig = EigenDecomposition::new(&a, true).unwrap();
/// assert!(eig.good());
/// assert!((eig.eigen_value(0).unwrap() - 1.0).abs() < 1e-12);
/// assert!((eig.eigen_value(1).unwrap() - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct EigenDecomposition<T: LinalgScalar> {
    n: usize,
    eigenvalues: Vec<T::Real>,
    eigenvectors: DynMatrix<T>,
    computed_all: bool,
    accurate: bool,
}

impl<T: LinalgScalar> EigenDecomposition<T>
where
    EigenSolver<T::Real>: Default,
{
    /// Decompose a dense Hermitian matrix with the full QR strategy.
    /// Only the lower triangle is referenced.
    pub fn new(a: &DynMatrix<T>, compute_vectors: bool) -> Result<Self, LinalgError> {
        let tri = TridiagonalDecomposition::new(a, compute_vectors)?;
        Self::with_solver(&tri, &default_solver(compute_vectors))
    }

    /// Decompose packed symmetric or Hermitian storage.
    pub fn from_packed(a: &PackedMatrix<T>, compute_vectors: bool) -> Result<Self, LinalgError> {
        let tri = TridiagonalDecomposition::from_packed(a, compute_vectors);
        Self::with_solver(&tri, &default_solver(compute_vectors))
    }

    /// Decompose a symmetric or Hermitian band matrix.
    pub fn banded(a: &BandMatrix<T>, compute_vectors: bool) -> Result<Self, LinalgError> {
        let tri = TridiagonalDecomposition::banded(a, compute_vectors);
        Self::with_solver(&tri, &default_solver(compute_vectors))
    }
}

fn default_solver<R>(compute_vectors: bool) -> EigenSolver<R>
where
    EigenSolver<R>: Default,
    R: crate::traits::FloatScalar,
{
    let mut solver = EigenSolver::default();
    solver.set_compute_eigenvectors(compute_vectors);
    solver
}

impl<T: LinalgScalar> EigenDecomposition<T> {
    /// Solve an existing reduction with a specific solver.
    ///
    /// Fails with `MissingTransform` when the solver computes eigenvectors
    /// but the reduction did not retain `Q`.
    pub fn with_solver(
        tri: &TridiagonalDecomposition<T>,
        solver: &EigenSolver<T::Real>,
    ) -> Result<Self, LinalgError> {
        Self::from_tridiagonal(tri, solver.decompose(tri))
    }

    /// Assemble from a reduction and an already-computed tridiagonal
    /// eigen-result, back-transforming eigenvectors through `Q`.
    ///
    /// Fails with `DimensionMismatch` when `eig` was computed for a problem
    /// of a different size, and with `MissingTransform` when `eig` carries
    /// eigenvectors but `Q` was not retained.
    pub fn from_tridiagonal(
        tri: &TridiagonalDecomposition<T>,
        eig: TridiagonalEigen<T::Real>,
    ) -> Result<Self, LinalgError> {
        let n = tri.n();
        if eig.n() != n {
            return Err(LinalgError::DimensionMismatch {
                expected: (n, 1),
                got: (eig.n(), 1),
            });
        }
        let TridiagonalEigen {
            eigenvalues,
            eigenvectors,
            computed_all,
            accurate,
            ..
        } = eig;

        let eigenvectors = match eigenvectors {
            Some(z) => tri.transform(&z)?,
            None => DynMatrix::zeros(n, 0),
        };

        Ok(Self {
            n,
            eigenvalues,
            eigenvectors,
            computed_all,
            accurate,
        })
    }

    /// Order of the decomposed matrix.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Converged eigenvalues, ascending. Fewer than `n` when the solver
    /// stalled.
    pub fn eigenvalues(&self) -> &[T::Real] {
        &self.eigenvalues
    }

    /// Eigenvectors as columns (n × k), paired with `eigenvalues()`; n × 0
    /// when none were computed.
    pub fn eigenvectors(&self) -> &DynMatrix<T> {
        &self.eigenvectors
    }

    /// The `i`-th eigenvalue.
    pub fn eigen_value(&self, i: usize) -> Result<T::Real, LinalgError> {
        self.eigenvalues
            .get(i)
            .copied()
            .ok_or(LinalgError::IndexOutOfBounds {
                index: i,
                len: self.eigenvalues.len(),
            })
    }

    /// The `i`-th eigenvector.
    pub fn eigen_vector(&self, i: usize) -> Result<DynVector<T>, LinalgError> {
        let len = self.eigenvectors.ncols();
        if i >= len {
            return Err(LinalgError::IndexOutOfBounds { index: i, len });
        }
        Ok(self.eigenvectors.col(i))
    }

    /// All eigenvalues converged and the requested vectors were produced.
    pub fn good(&self) -> bool {
        self.computed_all && self.accurate
    }

    /// All eigenvalues converged but the requested vectors were not produced.
    pub fn inaccurate(&self) -> bool {
        self.computed_all && !self.accurate
    }

    /// The solver stalled.
    pub fn fail(&self) -> bool {
        !self.computed_all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{EigenSettings, EigenSolverStrategy};
    use crate::packed::{to_band_symmetric, to_symmetric};

    const TOL: f64 = 1e-10;

    fn sym_5x5() -> DynMatrix<f64> {
        DynMatrix::from_fn(5, 5, |i, j| {
            let (i, j) = (i as f64, j as f64);
            if i == j {
                4.0 + i
            } else {
                1.0 / (1.0 + (i - j).abs()) * if (i + j) % 3.0 == 0.0 { -1.0 } else { 1.0 }
            }
        })
    }

    fn check_good(a: &DynMatrix<f64>, eig: &EigenDecomposition<f64>) {
        assert!(eig.good());
        assert_eq!(eig.eigenvalues().len(), eig.n());
        assert!(eig.eigenvalues().windows(2).all(|w| w[0] <= w[1]));
        let v = eig.eigenvectors();
        for i in 0..eig.n() {
            let vi = eig.eigen_vector(i).unwrap();
            let lhs = a * &vi;
            let lambda = eig.eigen_value(i).unwrap();
            for r in 0..eig.n() {
                assert!((lhs[r] - lambda * vi[r]).abs() < TOL);
            }
        }
        assert!(v.adjoint_mul(v).max_abs_diff(&DynMatrix::eye(eig.n())) < TOL);
    }

    #[test]
    fn two_by_two_scenario() {
        let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 2.0]);
        let eig = EigenDecomposition::new(&a, true).unwrap();
        check_good(&a, &eig);
        let s = core::f64::consts::FRAC_1_SQRT_2;
        let v0 = eig.eigen_vector(0).unwrap();
        let v1 = eig.eigen_vector(1).unwrap();
        assert!((v0[0].abs() - s).abs() < TOL && (v0[0] + v0[1]).abs() < TOL);
        assert!((v1[0].abs() - s).abs() < TOL && (v1[0] - v1[1]).abs() < TOL);
    }

    #[test]
    fn dense_packed_banded_agree() {
        let a = sym_5x5();
        let dense = EigenDecomposition::new(&a, true).unwrap();
        check_good(&a, &dense);

        let packed = EigenDecomposition::from_packed(&to_symmetric(&a), true).unwrap();
        check_good(&a, &packed);

        let banded = EigenDecomposition::banded(&to_band_symmetric(&a, 4), true).unwrap();
        check_good(&a, &banded);

        for i in 0..5 {
            assert!((dense.eigenvalues()[i] - packed.eigenvalues()[i]).abs() < TOL);
            assert!((dense.eigenvalues()[i] - banded.eigenvalues()[i]).abs() < TOL);
        }
    }

    #[test]
    fn values_only() {
        let a = sym_5x5();
        let eig = EigenDecomposition::new(&a, false).unwrap();
        assert!(eig.good());
        assert_eq!(eig.eigenvectors().ncols(), 0);
        assert_eq!(
            eig.eigen_vector(0).unwrap_err(),
            LinalgError::IndexOutOfBounds { index: 0, len: 0 }
        );
    }

    #[test]
    fn index_out_of_bounds() {
        let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 2.0]);
        let eig = EigenDecomposition::new(&a, true).unwrap();
        assert_eq!(
            eig.eigen_value(2).unwrap_err(),
            LinalgError::IndexOutOfBounds { index: 2, len: 2 }
        );
        assert!(eig.eigen_vector(5).is_err());
    }

    #[test]
    fn root_free_with_vectors_flags_inaccurate() {
        let a = sym_5x5();
        let tri = TridiagonalDecomposition::new(&a, true).unwrap();
        let solver = EigenSolver::<f64>::new(EigenSolverStrategy::RootFree, true);
        let eig = EigenDecomposition::with_solver(&tri, &solver).unwrap();
        assert!(eig.inaccurate());
        assert!(!eig.good() && !eig.fail());
        assert_eq!(eig.eigenvalues().len(), 5);
        assert_eq!(eig.eigenvectors().ncols(), 0);
    }

    #[test]
    fn positive_definite_strategy() {
        let a = sym_5x5();
        let tri = TridiagonalDecomposition::new(&a, true).unwrap();
        let solver = EigenSolver::<f64>::new(EigenSolverStrategy::PositiveDefinite, true);
        let eig = EigenDecomposition::with_solver(&tri, &solver).unwrap();
        check_good(&a, &eig);

        let indefinite = DynMatrix::from_rows(2, 2, &[1.0_f64, 3.0, 3.0, 1.0]);
        let tri = TridiagonalDecomposition::new(&indefinite, true).unwrap();
        let eig = EigenDecomposition::with_solver(&tri, &solver).unwrap();
        assert!(eig.fail());
        assert!(eig.eigenvalues().is_empty());
    }

    #[test]
    fn stalled_budget_fails() {
        let a = sym_5x5();
        let tri = TridiagonalDecomposition::new(&a, true).unwrap();
        let solver = EigenSolver::<f64>::new(EigenSolverStrategy::FullQr, true)
            .with_settings(EigenSettings { max_iter_factor: 0, ..EigenSettings::default() });
        let eig = EigenDecomposition::with_solver(&tri, &solver).unwrap();
        assert!(eig.fail());
        assert!(eig.eigenvalues().len() < 5);
        assert_eq!(eig.eigenvectors().ncols(), eig.eigenvalues().len());
    }

    #[test]
    fn vectors_without_q_rejected() {
        let a = sym_5x5();
        let tri = TridiagonalDecomposition::new(&a, false).unwrap();
        let eig = EigenSolver::<f64>::default().decompose(&tri);
        assert_eq!(
            EigenDecomposition::from_tridiagonal(&tri, eig).unwrap_err(),
            LinalgError::MissingTransform
        );
        assert_eq!(
            EigenDecomposition::with_solver(&tri, &EigenSolver::default()).unwrap_err(),
            LinalgError::MissingTransform
        );

        // values only needs no Q
        let solver = EigenSolver::<f64>::new(EigenSolverStrategy::FullQr, false);
        let eig = EigenDecomposition::with_solver(&tri, &solver).unwrap();
        assert!(eig.good());
        assert_eq!(eig.eigenvalues().len(), 5);
    }

    #[test]
    fn result_of_other_size_rejected() {
        let small = TridiagonalDecomposition::<f64>::from_parts(
            vec![1.0, 2.0, 3.0],
            vec![0.5, 0.5],
            Some(DynMatrix::eye(3)),
        )
        .unwrap();
        let big = TridiagonalDecomposition::new(&sym_5x5(), true).unwrap();

        for vectors in [false, true] {
            let solver = EigenSolver::<f64>::new(EigenSolverStrategy::FullQr, vectors);
            let eig = solver.decompose(&big);
            assert_eq!(
                EigenDecomposition::from_tridiagonal(&small, eig).unwrap_err(),
                LinalgError::DimensionMismatch { expected: (3, 1), got: (5, 1) }
            );
        }
    }
}
