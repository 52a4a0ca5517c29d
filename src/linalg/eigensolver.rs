use alloc::vec;
use alloc::vec::Vec;

use crate::dynmatrix::DynMatrix;
use crate::linalg::svd::bidiagonal_qr;
use crate::linalg::tridiagonal::TridiagonalDecomposition;
use crate::linalg::{givens, rotate_cols, sort_ascending};
use crate::traits::{FloatScalar, LinalgScalar};

/// Algorithm used to diagonalize the real symmetric tridiagonal matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EigenSolverStrategy {
    /// Implicit symmetric QR with Wilkinson shift. Eigenvalues and,
    /// optionally, eigenvectors.
    #[default]
    FullQr,
    /// Square-root-free rational QL iteration. Eigenvalues only.
    RootFree,
    /// `T = L D L^T` followed by Golub-Kahan QR of `D^{1/2} L^T`.
    /// Only valid for positive-definite `T`.
    PositiveDefinite,
}

/// Settings for the tridiagonal eigensolvers.
#[derive(Debug, Clone, Copy)]
pub struct EigenSettings<R> {
    /// Iterations allowed per eigenvalue; the total budget is
    /// `max_iter_factor * n`.
    pub max_iter_factor: usize,
    /// Relative tolerance for treating an off-diagonal entry as zero.
    pub deflation_tol: R,
}

impl Default for EigenSettings<f64> {
    fn default() -> Self {
        Self {
            max_iter_factor: 30,
            deflation_tol: f64::EPSILON,
        }
    }
}

impl Default for EigenSettings<f32> {
    fn default() -> Self {
        Self {
            max_iter_factor: 30,
            deflation_tol: f32::EPSILON,
        }
    }
}

/// Eigenpairs of a real symmetric tridiagonal matrix.
///
/// Eigenvalues are ascending. When `computed_all()` is false only the
/// pairs that converged are present, which may be none.
#[derive(Debug, Clone)]
pub struct TridiagonalEigen<R> {
    pub(crate) n: usize,
    pub(crate) eigenvalues: Vec<R>,
    pub(crate) eigenvectors: Option<DynMatrix<R>>,
    pub(crate) computed_all: bool,
    pub(crate) accurate: bool,
}

impl<R: FloatScalar> TridiagonalEigen<R> {
    /// Order of the tridiagonal problem.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Converged eigenvalues, ascending.
    pub fn eigenvalues(&self) -> &[R] {
        &self.eigenvalues
    }

    /// n × k eigenvectors of `T`, column `i` pairing with eigenvalue `i`.
    pub fn eigenvectors(&self) -> Option<&DynMatrix<R>> {
        self.eigenvectors.as_ref()
    }

    /// Whether every eigenvalue converged.
    pub fn computed_all(&self) -> bool {
        self.computed_all
    }

    /// False when eigenvectors were requested from a strategy that cannot
    /// produce them.
    pub fn accurate(&self) -> bool {
        self.accurate
    }
}

/// A configured tridiagonal eigensolver.
///
/// # Example
///
/// ```
/// use tridiag::linalg::{EigenSolver, EigenSolverStrategy};
///
/// let solver = EigenSolver::<f64>::new(EigenSolverStrategy::RootFree, false);
/// let eig = solver.decompose_parts(&[2.0, 2.0], &[1.0]);
/// assert!(eig.computed_all());
/// assert!((eig.eigenvalues()[0] - 1.0).abs() < 1e-12);
/// assert!((eig.eigenvalues()[1] - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EigenSolver<R> {
    strategy: EigenSolverStrategy,
    compute_eigenvectors: bool,
    settings: EigenSettings<R>,
}

impl<R: FloatScalar> Default for EigenSolver<R>
where
    EigenSettings<R>: Default,
{
    fn default() -> Self {
        Self::new(EigenSolverStrategy::FullQr, true)
    }
}

impl<R: FloatScalar> EigenSolver<R>
where
    EigenSettings<R>: Default,
{
    /// Solver for `strategy` with default settings for the precision.
    pub fn new(strategy: EigenSolverStrategy, compute_eigenvectors: bool) -> Self {
        Self {
            strategy,
            compute_eigenvectors,
            settings: EigenSettings::default(),
        }
    }
}

impl<R: FloatScalar> EigenSolver<R> {
    /// Replace the iteration settings.
    pub fn with_settings(mut self, settings: EigenSettings<R>) -> Self {
        self.settings = settings;
        self
    }

    /// Request or drop eigenvectors.
    pub fn set_compute_eigenvectors(&mut self, compute: bool) {
        self.compute_eigenvectors = compute;
    }

    /// Selected algorithm.
    pub fn strategy(&self) -> EigenSolverStrategy {
        self.strategy
    }

    /// Iteration settings in use.
    pub fn settings(&self) -> &EigenSettings<R> {
        &self.settings
    }

    /// Whether `decompose` will return eigenvectors. Always false for
    /// [`EigenSolverStrategy::RootFree`].
    pub fn computes_eigenvectors(&self) -> bool {
        self.compute_eigenvectors && self.strategy != EigenSolverStrategy::RootFree
    }

    /// Diagonalize the tridiagonal part of a reduction.
    pub fn decompose<T>(&self, tri: &TridiagonalDecomposition<T>) -> TridiagonalEigen<R>
    where
        T: LinalgScalar<Real = R>,
    {
        self.decompose_parts(tri.diagonal(), tri.off_diagonal())
    }

    /// Diagonalize the tridiagonal matrix with the given diagonal and
    /// sub-diagonal. `off_diagonal` must be one shorter than `diagonal`.
    pub fn decompose_parts(&self, diagonal: &[R], off_diagonal: &[R]) -> TridiagonalEigen<R> {
        let n = diagonal.len();
        assert_eq!(
            off_diagonal.len(),
            n.saturating_sub(1),
            "off-diagonal length must be one less than the diagonal"
        );
        let budget = self.settings.max_iter_factor * n;
        let mut d = diagonal.to_vec();
        let mut e = off_diagonal.to_vec();

        let mut result = match self.strategy {
            EigenSolverStrategy::FullQr => full_qr(
                &mut d,
                &mut e,
                self.compute_eigenvectors,
                budget,
                self.settings.deflation_tol,
            ),
            EigenSolverStrategy::RootFree => {
                root_free(&mut d, &e, budget, self.settings.deflation_tol)
            }
            EigenSolverStrategy::PositiveDefinite => {
                positive_definite(&d, &e, self.compute_eigenvectors, budget)
            }
        };
        result.accurate =
            !(self.compute_eigenvectors && self.strategy == EigenSolverStrategy::RootFree);
        if !result.computed_all {
            log::debug!(
                "eigensolver {:?} stalled: {} of {} eigenvalues converged",
                self.strategy,
                result.eigenvalues.len(),
                n
            );
        }
        result
    }
}

fn finish<R>(
    n: usize,
    eigenvalues: Vec<R>,
    eigenvectors: Option<DynMatrix<R>>,
    computed_all: bool,
) -> TridiagonalEigen<R> {
    TridiagonalEigen {
        n,
        eigenvalues,
        eigenvectors,
        computed_all,
        accurate: true,
    }
}

// ── Implicit symmetric QR ───────────────────────────────────────────

/// Implicit QR iteration with Wilkinson shift on `(d, e)`, accumulating
/// rotations into `z` when given.
///
/// On success `d` holds the (unsorted) eigenvalues. On stall returns
/// `Err(first)`: positions `first..n` have converged, the rest have not.
fn symmetric_qr<R: FloatScalar>(
    d: &mut [R],
    e: &mut [R],
    mut z: Option<&mut DynMatrix<R>>,
    max_iter: usize,
    tol: R,
) -> Result<(), usize> {
    let n = d.len();
    if n <= 1 {
        return Ok(());
    }

    let zero = R::zero();
    let two = R::one() + R::one();
    let mut iter = 0usize;
    let mut hi = n - 1;

    while hi > 0 {
        let mut lo = hi;
        while lo > 0 {
            let threshold = tol * (d[lo - 1].abs() + d[lo].abs());
            if e[lo - 1].abs() <= threshold {
                e[lo - 1] = zero;
                break;
            }
            lo -= 1;
        }

        if lo == hi {
            hi -= 1;
            continue;
        }

        iter += 1;
        if iter > max_iter {
            return Err(hi + 1);
        }

        // Wilkinson shift from the trailing 2x2
        let g = (d[hi - 1] - d[hi]) / two;
        let eh = e[hi - 1];
        let r = g.hypot(eh);
        let shift = d[hi] - eh * eh / (g + if g >= zero { r } else { -r });

        let mut x = d[lo] - shift;
        let mut y = e[lo];

        for k in lo..hi {
            let (c, s) = givens(x, y);
            if k > lo {
                e[k - 1] = c * x + s * y;
            }

            let (dk, dk1, ek) = (d[k], d[k + 1], e[k]);
            d[k] = c * c * dk + two * c * s * ek + s * s * dk1;
            d[k + 1] = s * s * dk - two * c * s * ek + c * c * dk1;
            e[k] = c * s * (dk1 - dk) + (c * c - s * s) * ek;

            if k + 1 < hi {
                // bulge at (k, k+2)
                let e_next = e[k + 1];
                x = e[k];
                y = s * e_next;
                e[k + 1] = c * e_next;
            }

            if let Some(z) = z.as_deref_mut() {
                rotate_cols(z, k, k + 1, c, s);
            }
        }
    }
    Ok(())
}

fn full_qr<R: FloatScalar>(
    d: &mut [R],
    e: &mut [R],
    vectors: bool,
    max_iter: usize,
    tol: R,
) -> TridiagonalEigen<R> {
    let n = d.len();
    let mut z = if vectors { Some(DynMatrix::<R>::eye(n)) } else { None };

    match symmetric_qr(d, e, z.as_mut(), max_iter, tol) {
        Ok(()) => {
            sort_ascending::<R>(d, z.as_mut());
            finish(n, d.to_vec(), z, true)
        }
        Err(first) => {
            let mut values = d[first..].to_vec();
            let mut kept = z.map(|z| {
                let cols: Vec<usize> = (first..n).collect();
                z.select_columns(&cols)
            });
            sort_ascending::<R>(&mut values, kept.as_mut());
            finish(n, values, kept, false)
        }
    }
}

// ── Root-free QL ────────────────────────────────────────────────────

/// Rational QL iteration on the squared off-diagonals.
///
/// Eigenvalues are inserted in ascending order as they converge, so on
/// stall `d[..l]` is a sorted, converged prefix.
fn root_free<R: FloatScalar>(d: &mut [R], e: &[R], max_iter: usize, tol: R) -> TridiagonalEigen<R> {
    let n = d.len();
    let zero = R::zero();
    let two = R::one() + R::one();

    // e2[i] couples i and i+1; e2[n-1] is a zero sentinel.
    let mut e2: Vec<R> = e.iter().map(|&x| x * x).collect();
    e2.push(zero);

    let mut f = zero;
    let mut t = zero;
    let mut b = zero;
    let mut c = zero;
    let mut iter = 0usize;

    for l in 0..n {
        let h = d[l].abs() + e2[l].sqrt();
        if t <= h {
            t = h;
            b = tol * t;
            c = b * b;
        }

        let mut m = l;
        while e2[m] > c {
            m += 1;
        }

        if m != l {
            loop {
                iter += 1;
                if iter > max_iter {
                    return finish(n, d[..l].to_vec(), None, false);
                }

                // shift
                let l1 = l + 1;
                let s = e2[l].sqrt();
                let g = d[l];
                let p = (d[l1] - g) / (two * s);
                let r = p.hypot(R::one());
                d[l] = s / (p + if p >= zero { r } else { -r });
                let h = g - d[l];
                for di in d[l1..].iter_mut() {
                    *di = *di - h;
                }
                f = f + h;

                // rational QL sweep
                let mut g = d[m];
                if g == zero {
                    g = b;
                }
                let mut h = g;
                let mut s = zero;
                for i in (l..m).rev() {
                    let p = g * h;
                    let r = p + e2[i];
                    e2[i + 1] = s * r;
                    s = e2[i] / r;
                    d[i + 1] = h + s * (h + d[i]);
                    g = d[i] - e2[i] / g;
                    if g == zero {
                        g = b;
                    }
                    h = g * p / r;
                }
                e2[l] = s * g;
                d[l] = h;

                if h == zero || e2[l].abs() <= (c / h).abs() {
                    break;
                }
                e2[l] = h * e2[l];
                if e2[l] == zero {
                    break;
                }
            }
        }

        // insert into the sorted prefix
        let p = d[l] + f;
        let mut i = l;
        while i > 0 && p < d[i - 1] {
            d[i] = d[i - 1];
            i -= 1;
        }
        d[i] = p;
    }

    finish(n, d.to_vec(), None, true)
}

// ── Positive definite ───────────────────────────────────────────────

/// Factor `T = L D L^T`; returns the pivots `D` and multipliers `L`, or
/// `None` if a pivot is not strictly positive.
fn ldl<R: FloatScalar>(d: &[R], e: &[R]) -> Option<(Vec<R>, Vec<R>)> {
    let n = d.len();
    let mut piv = vec![R::zero(); n];
    let mut mult = vec![R::zero(); n.saturating_sub(1)];
    for i in 0..n {
        piv[i] = if i == 0 { d[0] } else { d[i] - mult[i - 1] * e[i - 1] };
        if piv[i].is_nan() || piv[i] <= R::zero() {
            return None;
        }
        if i + 1 < n {
            mult[i] = e[i] / piv[i];
        }
    }
    Some((piv, mult))
}

fn positive_definite<R: FloatScalar>(
    d: &[R],
    e: &[R],
    vectors: bool,
    max_iter: usize,
) -> TridiagonalEigen<R> {
    let n = d.len();
    let Some((piv, mult)) = ldl(d, e) else {
        log::debug!("tridiagonal matrix is not positive definite");
        return finish(n, Vec::new(), None, false);
    };

    // B = D^{1/2} L^T, upper bidiagonal with B^T B = T
    let mut bd: Vec<R> = piv.iter().map(|&p| p.sqrt()).collect();
    let mut be: Vec<R> = mult.iter().zip(bd.iter()).map(|(&l, &s)| l * s).collect();
    let mut v = if vectors { Some(DynMatrix::<R>::eye(n)) } else { None };

    if bidiagonal_qr::<R>(&mut bd, &mut be, None, v.as_mut(), max_iter).is_err() {
        return finish(n, Vec::new(), None, false);
    }

    // singular values come back descending
    let eigenvalues: Vec<R> = bd.iter().rev().map(|&s| s * s).collect();
    let eigenvectors = v.map(|v| {
        let cols: Vec<usize> = (0..n).rev().collect();
        v.select_columns(&cols)
    });
    finish(n, eigenvalues, eigenvectors, true)
}
