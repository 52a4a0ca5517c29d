use alloc::vec::Vec;

use num_traits::{Float, One, Zero};

use crate::dynmatrix::norm::norm2;
use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::cholesky::CholeskyDecomposition;
use crate::linalg::qr::QrDecomposition;
use crate::linalg::svd::SvdDecomposition;
use crate::linalg::LinalgError;
use crate::traits::LinalgScalar;

/// Settings shared by the rank-revealing least-squares solvers.
#[derive(Debug, Clone, Copy)]
pub struct LeastSquaresSettings<R> {
    /// Relative threshold below which a diagonal entry of `R` (QR) or a
    /// singular value (SVD) counts as zero. `None` uses
    /// `max(rows, cols) * epsilon`.
    pub rcond: Option<R>,
}

impl<R> Default for LeastSquaresSettings<R> {
    fn default() -> Self {
        Self { rcond: None }
    }
}

impl<R: Float> LeastSquaresSettings<R> {
    /// Absolute rank threshold for an `m × n` problem whose largest
    /// diagonal / singular value is `largest`.
    fn threshold(&self, m: usize, n: usize, largest: R) -> R {
        let rcond = self.rcond.unwrap_or_else(|| {
            R::from(m.max(n)).unwrap_or_else(R::one) * R::epsilon()
        });
        rcond * largest
    }
}

/// Minimize `‖b - A x‖₂` for a fixed `A`.
///
/// Every solver shares the residual helpers; `residual_norm` may be
/// overridden when it can be computed without forming the residual.
pub trait LeastSquares<T: LinalgScalar> {
    /// The (copied) system matrix.
    fn matrix(&self) -> &DynMatrix<T>;

    /// Least-squares solution `x`.
    fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError>;

    /// `b - A x` for the solution `x`.
    fn residual(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        let x = self.solve(b)?;
        Ok(b - &(self.matrix() * &x))
    }

    /// `‖b - A x‖₂`.
    fn residual_norm(&self, b: &DynVector<T>) -> Result<T::Real, LinalgError> {
        Ok(self.residual(b)?.norm())
    }
}

fn check_rhs<T: LinalgScalar>(a: &DynMatrix<T>, b: &DynVector<T>) -> Result<(), LinalgError> {
    if b.len() != a.nrows() {
        return Err(LinalgError::DimensionMismatch {
            expected: (a.nrows(), 1),
            got: (b.len(), 1),
        });
    }
    Ok(())
}

// ── Normal equations ────────────────────────────────────────────────

/// Least squares through the normal equations `AᴴA x = Aᴴb`.
///
/// Fast but squares the condition number. Requires `A` to have full column
/// rank; otherwise the factorization fails and `solve` reports
/// `NotPositiveDefinite`.
#[derive(Debug, Clone)]
pub struct CholeskyLeastSquares<T: LinalgScalar> {
    a: DynMatrix<T>,
    factor: Result<CholeskyDecomposition<T>, LinalgError>,
}

impl<T: LinalgScalar> CholeskyLeastSquares<T> {
    pub fn new(a: &DynMatrix<T>) -> Self {
        let mut ata = a.adjoint_mul(a);
        for i in 0..ata.nrows() {
            ata[(i, i)] = T::from_real(ata[(i, i)].re());
        }
        let factor = CholeskyDecomposition::new(&ata);
        if let Err(e) = &factor {
            log::warn!("normal equations could not be factored: {}", e);
        }
        Self {
            a: a.clone(),
            factor,
        }
    }

    /// Whether `AᴴA` was successfully factored.
    pub fn is_factored(&self) -> bool {
        self.factor.is_ok()
    }
}

impl<T: LinalgScalar> LeastSquares<T> for CholeskyLeastSquares<T> {
    fn matrix(&self) -> &DynMatrix<T> {
        &self.a
    }

    fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        check_rhs(&self.a, b)?;
        let chol = self.factor.as_ref().map_err(|e| *e)?;
        chol.solve(&self.a.adjoint_mul_vec(b))
    }
}

// ── QR ──────────────────────────────────────────────────────────────

/// Least squares through column-pivoted QR, `A P = Q R`.
///
/// Rank-deficient systems get the basic solution: the free variables
/// beyond the numerical rank are set to zero.
///
/// ```
/// use tridiag::{DynMatrix, DynVector};
/// use tridiag::linalg::{LeastSquares, QrLeastSquares};
///
/// // fit y = c0 + c1 t through (0, 1), (1, 3), (2, 5)
/// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 0.0, 1.0, 1.0, 1.0, 2.0]);
/// let b = DynVector::from_slice(&[1.0, 3.0, 5.0]);
/// let ls = QrLeastSquares::new(&a).unwrap();
/// let x = ls.solve(&b).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-12 && (x[1] - 2.0).abs() < 1e-12);
/// assert!(ls.residual_norm(&b).unwrap() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct QrLeastSquares<T: LinalgScalar> {
    a: DynMatrix<T>,
    qr: QrDecomposition<T>,
    rank: usize,
}

impl<T: LinalgScalar> QrLeastSquares<T> {
    pub fn new(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        Self::with_settings(a, LeastSquaresSettings::default())
    }

    pub fn with_settings(
        a: &DynMatrix<T>,
        settings: LeastSquaresSettings<T::Real>,
    ) -> Result<Self, LinalgError> {
        let qr = QrDecomposition::with_pivoting(a)?;
        let (m, n) = (a.nrows(), a.ncols());
        let k = m.min(n);
        // pivoting puts the largest |R_ii| first
        let largest = if k > 0 {
            qr.r()[(0, 0)].modulus()
        } else {
            <T::Real as Zero>::zero()
        };
        let rank = qr.rank(settings.threshold(m, n, largest));
        if rank < k {
            log::debug!("qr least squares: rank {} of {}x{} system", rank, m, n);
        }
        Ok(Self {
            a: a.clone(),
            qr,
            rank,
        })
    }

    /// Numerical rank.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn decomposition(&self) -> &QrDecomposition<T> {
        &self.qr
    }
}

impl<T: LinalgScalar> LeastSquares<T> for QrLeastSquares<T> {
    fn matrix(&self) -> &DynMatrix<T> {
        &self.a
    }

    fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        check_rhs(&self.a, b)?;
        let qhb = self.qr.apply_qh(b)?;
        let z = self.qr.back_substitute(&qhb.as_slice()[..self.rank], self.rank)?;
        Ok(DynVector::from_vec(self.qr.unpermute(&z)))
    }

    /// Norm of the trailing `m - rank` entries of `Qᴴb`.
    fn residual_norm(&self, b: &DynVector<T>) -> Result<T::Real, LinalgError> {
        check_rhs(&self.a, b)?;
        let qhb = self.qr.apply_qh(b)?;
        Ok(norm2(&qhb.as_slice()[self.rank..]))
    }
}

// ── SVD ─────────────────────────────────────────────────────────────

/// Minimum-norm least squares through the thin SVD, `x = V Σ⁺ Uᴴ b`.
///
/// Singular values below the `rcond` threshold are dropped. A failed SVD
/// is kept and reported by `solve`.
#[derive(Debug, Clone)]
pub struct SvdLeastSquares<T: LinalgScalar> {
    a: DynMatrix<T>,
    svd: Result<SvdDecomposition<T>, LinalgError>,
    rank: usize,
}

impl<T: LinalgScalar> SvdLeastSquares<T> {
    pub fn new(a: &DynMatrix<T>) -> Self {
        Self::with_settings(a, LeastSquaresSettings::default())
    }

    pub fn with_settings(a: &DynMatrix<T>, settings: LeastSquaresSettings<T::Real>) -> Self {
        let (m, n) = (a.nrows(), a.ncols());
        let svd = SvdDecomposition::new(a);
        let rank = match &svd {
            Ok(svd) => {
                let sv = svd.singular_values();
                let largest = sv.first().copied().unwrap_or_else(<T::Real as Zero>::zero);
                let rank = svd.rank(settings.threshold(m, n, largest));
                if rank < m.min(n) {
                    log::debug!("svd least squares: rank {} of {}x{} system", rank, m, n);
                }
                rank
            }
            Err(e) => {
                log::debug!("svd least squares: {}", e);
                0
            }
        };
        Self {
            a: a.clone(),
            svd,
            rank,
        }
    }

    /// Numerical rank (0 if the SVD failed).
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Singular values, descending, or `None` if the SVD failed.
    pub fn singular_values(&self) -> Option<&[T::Real]> {
        self.svd.as_ref().ok().map(|s| s.singular_values())
    }
}

impl<T: LinalgScalar> LeastSquares<T> for SvdLeastSquares<T> {
    fn matrix(&self) -> &DynMatrix<T> {
        &self.a
    }

    fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        check_rhs(&self.a, b)?;
        let svd = self.svd.as_ref().map_err(|e| *e)?;
        let uhb = svd.u().adjoint_mul_vec(b);
        let y: Vec<T> = svd.singular_values()[..self.rank]
            .iter()
            .zip(uhb.as_slice())
            .map(|(&s, &c)| c * T::from_real(<T::Real as One>::one() / s))
            .collect();

        // x = V y = vtᴴ y
        let vt = svd.vt();
        let n = self.a.ncols();
        let mut x = DynVector::zeros(n);
        for (i, &yi) in y.iter().enumerate() {
            for j in 0..n {
                x[j] = x[j] + vt[(i, j)].conj() * yi;
            }
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    fn overdetermined() -> (DynMatrix<f64>, DynVector<f64>) {
        let a = DynMatrix::from_rows(5, 3, &[
            1.0, 0.0, 2.0,
            1.0, 1.0, 0.5,
            1.0, 2.0, -1.0,
            1.0, 3.0, 0.0,
            1.0, 4.0, 1.5,
        ]);
        let b = DynVector::from_slice(&[1.0, 2.5, 2.0, 4.5, 6.0]);
        (a, b)
    }

    #[test]
    fn strategies_agree() {
        let (a, b) = overdetermined();
        let chol = CholeskyLeastSquares::new(&a);
        let qr = QrLeastSquares::new(&a).unwrap();
        let svd = SvdLeastSquares::new(&a);
        assert!(chol.is_factored());
        assert_eq!(qr.rank(), 3);
        assert_eq!(svd.rank(), 3);

        let x1 = chol.solve(&b).unwrap();
        let x2 = qr.solve(&b).unwrap();
        let x3 = svd.solve(&b).unwrap();
        for i in 0..3 {
            assert_near(x1[i], x2[i], 1e-9, "cholesky vs qr");
            assert_near(x2[i], x3[i], TOL, "qr vs svd");
        }

        // residual is orthogonal to the column space
        let r = qr.residual(&b).unwrap();
        let atr = a.adjoint_mul_vec(&r);
        assert!(atr.norm() < 1e-10);
    }

    #[test]
    fn residual_norm_matches_residual() {
        let (a, b) = overdetermined();
        let qr = QrLeastSquares::new(&a).unwrap();
        let svd = SvdLeastSquares::new(&a);
        let chol = CholeskyLeastSquares::new(&a);
        for (name, fast, slow) in [
            ("qr", qr.residual_norm(&b).unwrap(), qr.residual(&b).unwrap().norm()),
            ("svd", svd.residual_norm(&b).unwrap(), svd.residual(&b).unwrap().norm()),
            ("chol", chol.residual_norm(&b).unwrap(), chol.residual(&b).unwrap().norm()),
        ] {
            assert_near(fast, slow, 1e-10, name);
        }
        assert!(qr.residual_norm(&b).unwrap() > 0.1);
    }

    #[test]
    fn wrong_rhs_length() {
        let (a, _) = overdetermined();
        let b = DynVector::from_slice(&[1.0, 2.0]);
        let expected = LinalgError::DimensionMismatch { expected: (5, 1), got: (2, 1) };
        assert_eq!(CholeskyLeastSquares::new(&a).solve(&b).unwrap_err(), expected);
        assert_eq!(QrLeastSquares::new(&a).unwrap().solve(&b).unwrap_err(), expected);
        assert_eq!(SvdLeastSquares::new(&a).solve(&b).unwrap_err(), expected);
        assert!(QrLeastSquares::new(&a).unwrap().residual_norm(&b).is_err());
    }

    #[test]
    fn rank_deficient() {
        // third column = first + second
        let a = DynMatrix::from_rows(4, 3, &[
            1.0, 0.0, 1.0,
            0.0, 1.0, 1.0,
            1.0, 1.0, 2.0,
            2.0, -1.0, 1.0,
        ]);
        let b = DynVector::from_slice(&[1.0, 2.0, 3.0, 0.0]);

        let chol = CholeskyLeastSquares::new(&a);
        if !chol.is_factored() {
            assert_eq!(chol.solve(&b).unwrap_err(), LinalgError::NotPositiveDefinite);
        }

        let qr = QrLeastSquares::new(&a).unwrap();
        let svd = SvdLeastSquares::new(&a);
        assert_eq!(qr.rank(), 2);
        assert_eq!(svd.rank(), 2);

        // both minimize the residual; SVD also minimizes ‖x‖
        let xq = qr.solve(&b).unwrap();
        let xs = svd.solve(&b).unwrap();
        let (rq, rs) = (qr.residual_norm(&b).unwrap(), svd.residual_norm(&b).unwrap());
        assert_near(rq, rs, 1e-9, "residual");
        assert!(xs.norm() <= xq.norm() + 1e-12);
        assert_eq!(xq.as_slice().iter().filter(|&&x| x == 0.0).count(), 1);
    }

    #[test]
    fn explicit_rcond() {
        let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 0.0, 0.0, 1e-6, 0.0, 0.0]);
        let loose = LeastSquaresSettings { rcond: Some(1e-3) };
        assert_eq!(SvdLeastSquares::with_settings(&a, loose).rank(), 1);
        assert_eq!(QrLeastSquares::with_settings(&a, loose).unwrap().rank(), 1);
        assert_eq!(SvdLeastSquares::new(&a).rank(), 2);
        assert_eq!(SvdLeastSquares::new(&a).singular_values().unwrap().len(), 2);
    }

    #[test]
    fn underdetermined_minimum_norm() {
        // x0 + x1 = 2 has minimum-norm solution (1, 1)
        let a = DynMatrix::from_rows(1, 2, &[1.0_f64, 1.0]);
        let b = DynVector::from_slice(&[2.0]);
        let x = SvdLeastSquares::new(&a).solve(&b).unwrap();
        assert_near(x[0], 1.0, TOL, "x0");
        assert_near(x[1], 1.0, TOL, "x1");
        let xq = QrLeastSquares::new(&a).unwrap().solve(&b).unwrap();
        assert_near(xq[0] + xq[1], 2.0, TOL, "basic solution");
    }
}
