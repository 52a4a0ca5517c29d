use alloc::vec;
use alloc::vec::Vec;

use num_traits::{Float, Zero};

use crate::dynmatrix::norm::norm2;
use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::LinalgError;
use crate::traits::{phase, LinalgScalar, MatrixMut, MatrixRef};

/// QR decomposition in place using Householder reflections, for any shape.
///
/// On return, `a` contains the packed QR factorization:
/// - Upper trapezoid (including diagonal): R
/// - Strictly below the diagonal: Householder vectors (scaled so `v[0] = 1`)
///
/// `tau` is filled with the Householder scalar factors (length `min(M, N)`),
/// `H_j = I - tau_j * v_j * v_j^H`. A column whose sub-diagonal part is
/// already zero (including an all-zero column) gets `tau = 0`, the identity
/// reflector, so rank-deficient input is never an error.
///
/// With `pivots`, column pivoting is performed. On entry a nonzero
/// `pivots[j]` marks column `j` as frozen: frozen columns are moved to the
/// front in their original order and are never pivoted. The remaining
/// columns are chosen greedily by largest remaining column norm. On return
/// `pivots[j]` is the original index of the column now in position `j`.
///
/// For complex matrices, uses `H = I - tau * v * v^H` (conjugate transpose).
pub fn qr_in_place<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
    tau: &mut [T],
    pivots: Option<&mut [usize]>,
) -> Result<(), LinalgError> {
    let m = a.nrows();
    let n = a.ncols();
    let k = m.min(n);
    if tau.len() != k {
        return Err(LinalgError::DimensionMismatch {
            expected: (k, 1),
            got: (tau.len(), 1),
        });
    }

    let mut perm: Option<(Vec<usize>, usize)> = None;
    if let Some(p) = pivots.as_deref() {
        if p.len() != n {
            return Err(LinalgError::DimensionMismatch {
                expected: (n, 1),
                got: (p.len(), 1),
            });
        }
        let mut order: Vec<usize> = (0..n).collect();
        let mut nfixed = 0;
        for j in 0..n {
            if p[j] != 0 {
                if j != nfixed {
                    swap_columns(a, j, nfixed);
                    order.swap(j, nfixed);
                }
                nfixed += 1;
            }
        }
        perm = Some((order, nfixed));
    }

    for col in 0..k {
        if let Some((order, nfixed)) = perm.as_mut() {
            if col >= *nfixed {
                let mut best = col;
                let mut best_norm = norm2(a.col_as_slice(col, col));
                for j in (col + 1)..n {
                    let nrm = norm2(a.col_as_slice(j, col));
                    if nrm > best_norm {
                        best = j;
                        best_norm = nrm;
                    }
                }
                if best != col {
                    log::debug!("qr: pivot column {} into position {}", order[best], col);
                    swap_columns(a, best, col);
                    order.swap(best, col);
                }
            }
        }

        let tau_val = householder(a.col_as_mut_slice(col, col));
        tau[col] = tau_val;
        if tau_val == T::zero() {
            continue;
        }

        // A[col:m, col+1:n] -= tau * v * (v^H * A)
        for j in (col + 1)..n {
            let mut dot = *a.get(col, j);
            for i in (col + 1)..m {
                dot = dot + (*a.get(i, col)).conj() * *a.get(i, j);
            }
            dot = dot * tau_val;

            *a.get_mut(col, j) = *a.get(col, j) - dot;
            for i in (col + 1)..m {
                let vi = *a.get(i, col);
                let old = *a.get(i, j);
                *a.get_mut(i, j) = old - dot * vi;
            }
        }
    }

    if let (Some(p), Some((order, _))) = (pivots, perm) {
        p.copy_from_slice(&order);
    }

    Ok(())
}

fn swap_columns<T: Copy>(a: &mut impl MatrixMut<T>, p: usize, q: usize) {
    for i in 0..a.nrows() {
        let tmp = *a.get(i, p);
        *a.get_mut(i, p) = *a.get(i, q);
        *a.get_mut(i, q) = tmp;
    }
}

/// Generate a Householder reflector for `x` in place.
///
/// Returns `tau` such that `H = I - tau * v * v^H` with `v = [1, x[1..]]`
/// maps the original `x` to `beta * e_0`. On return `x[0] = beta` and
/// `x[1..]` holds the tail of `v`. If the tail of `x` is already zero the
/// reflector is the identity and `tau = 0`.
pub(crate) fn householder<T: LinalgScalar>(x: &mut [T]) -> T {
    let Some((head, tail)) = x.split_first_mut() else {
        return T::zero();
    };
    let tail_norm = norm2(tail);
    if tail_norm == <T::Real as Zero>::zero() {
        return T::zero();
    }
    let alpha = *head;
    let norm = alpha.modulus().hypot(tail_norm);

    // sigma = phase(alpha) * ||x|| so that v0 = alpha + sigma avoids cancellation.
    let sigma = T::from_real(norm) * phase(alpha);
    let v0 = alpha + sigma;
    for t in tail.iter_mut() {
        *t = *t / v0;
    }
    *head = T::zero() - sigma;

    // v0 / sigma, which is real: (|alpha| + ||x||) / ||x||
    T::from_real((alpha.modulus() + norm) / norm)
}

/// `x <- (I - tau * v * v^H) * x` with `v = [1, v_tail]`.
pub(crate) fn reflect<T: LinalgScalar>(v_tail: &[T], tau: T, x: &mut [T]) {
    if tau == T::zero() {
        return;
    }
    let (head, rest) = x.split_at_mut(1);
    let mut dot = head[0];
    for (&vi, &xi) in v_tail.iter().zip(rest.iter()) {
        dot = dot + vi.conj() * xi;
    }
    dot = dot * tau;
    head[0] = head[0] - dot;
    for (&vi, xi) in v_tail.iter().zip(rest.iter_mut()) {
        *xi = *xi - dot * vi;
    }
}

/// `row <- row * (I - tau * v * v^H)` with `v = [1, v_tail]`, for a row
/// stored as strided entries of a matrix.
pub(crate) fn reflect_row<T: LinalgScalar>(
    m: &mut DynMatrix<T>,
    row: usize,
    col0: usize,
    v_tail: &[T],
    tau: T,
) {
    if tau == T::zero() {
        return;
    }
    let mut dot = m[(row, col0)];
    for (l, &vl) in v_tail.iter().enumerate() {
        dot = dot + m[(row, col0 + 1 + l)] * vl;
    }
    dot = dot * tau;
    m[(row, col0)] = m[(row, col0)] - dot;
    for (l, &vl) in v_tail.iter().enumerate() {
        let idx = (row, col0 + 1 + l);
        m[idx] = m[idx] - dot * vl.conj();
    }
}

/// Apply the reflector stored in column `col` of a packed QR to `x[col..]`.
fn apply_reflector<T: LinalgScalar>(qr: &DynMatrix<T>, col: usize, tau: T, x: &mut [T]) {
    reflect(qr.col_as_slice(col, col + 1), tau, &mut x[col..]);
}

/// Householder QR decomposition of an M×N matrix of any shape, with
/// optional column pivoting.
///
/// Stores the packed Householder vectors, R, the tau scalars and, when
/// pivoted, the column order. Without pivoting `Q·R = A`; with pivoting
/// `Q·R = A·P` where `P` is [`permutation_matrix`](Self::permutation_matrix).
///
/// # Example
///
/// ```
/// use tridiag::{DynMatrix, DynVector};
///
/// // Least-squares fit: y = c0 + c1*x to points (0,1), (1,2), (2,4)
/// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 0.0, 1.0, 1.0, 1.0, 2.0]);
/// let b = DynVector::from_slice(&[1.0, 2.0, 4.0]);
/// let x = a.qr().unwrap().solve(&b).unwrap();
/// assert!((x[0] - 5.0 / 6.0).abs() < 1e-10);
/// assert!((x[1] - 3.0 / 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct QrDecomposition<T> {
    qr: DynMatrix<T>,
    tau: Vec<T>,
    pivots: Option<Vec<usize>>,
}

impl<T: LinalgScalar> QrDecomposition<T> {
    /// Decompose without pivoting.
    pub fn new(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        let mut qr = a.clone();
        let mut tau = vec![T::zero(); a.nrows().min(a.ncols())];
        qr_in_place(&mut qr, &mut tau, None)?;
        Ok(Self { qr, tau, pivots: None })
    }

    /// Decompose with greedy column pivoting over all columns.
    pub fn with_pivoting(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        let mut qr = a.clone();
        let mut tau = vec![T::zero(); a.nrows().min(a.ncols())];
        let mut pivots = vec![0usize; a.ncols()];
        qr_in_place(&mut qr, &mut tau, Some(&mut pivots))?;
        Ok(Self { qr, tau, pivots: Some(pivots) })
    }

    /// Decompose with pivoting, keeping the columns flagged in `frozen` at
    /// the front in their original order.
    pub fn with_frozen(a: &DynMatrix<T>, frozen: &[bool]) -> Result<Self, LinalgError> {
        if frozen.len() != a.ncols() {
            return Err(LinalgError::DimensionMismatch {
                expected: (a.ncols(), 1),
                got: (frozen.len(), 1),
            });
        }
        let mut qr = a.clone();
        let mut tau = vec![T::zero(); a.nrows().min(a.ncols())];
        let mut pivots: Vec<usize> = frozen.iter().map(|&f| usize::from(f)).collect();
        qr_in_place(&mut qr, &mut tau, Some(&mut pivots))?;
        Ok(Self { qr, tau, pivots: Some(pivots) })
    }

    /// Number of rows of the factored matrix.
    pub fn nrows(&self) -> usize {
        self.qr.nrows()
    }

    /// Number of columns of the factored matrix.
    pub fn ncols(&self) -> usize {
        self.qr.ncols()
    }

    /// The upper-trapezoidal R factor (`min(M, N) × N`).
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// let a = DynMatrix::from_rows(3, 3, &[
    ///     12.0_f64, -51.0, 4.0,
    ///     6.0, 167.0, -68.0,
    ///     -4.0, 24.0, -41.0,
    /// ]);
    /// let r = a.qr().unwrap().r();
    /// assert!(r[(1, 0)].abs() < 1e-12);
    /// assert!(r[(2, 1)].abs() < 1e-12);
    /// ```
    pub fn r(&self) -> DynMatrix<T> {
        let k = self.tau.len();
        DynMatrix::from_fn(k, self.qr.ncols(), |i, j| {
            if j >= i {
                self.qr[(i, j)]
            } else {
                T::zero()
            }
        })
    }

    /// The thin Q factor (`M × min(M, N)`, orthonormal columns).
    pub fn q(&self) -> DynMatrix<T> {
        self.q_cols(self.tau.len())
    }

    /// The full square Q factor (`M × M`, unitary).
    pub fn q_full(&self) -> DynMatrix<T> {
        self.q_cols(self.qr.nrows())
    }

    fn q_cols(&self, ncols: usize) -> DynMatrix<T> {
        let m = self.qr.nrows();
        let mut q = DynMatrix::zeros(m, ncols);
        for i in 0..ncols.min(m) {
            q[(i, i)] = T::one();
        }
        for j in 0..ncols {
            let col = q.col_view_mut(j);
            for c in (0..self.tau.len()).rev() {
                apply_reflector(&self.qr, c, self.tau[c], col);
            }
        }
        q
    }

    /// Householder scalars.
    pub fn tau(&self) -> &[T] {
        &self.tau
    }

    /// Column order, if pivoting was used: `pivots()[j]` is the original
    /// index of column `j` of `A·P`.
    pub fn pivots(&self) -> Option<&[usize]> {
        self.pivots.as_deref()
    }

    /// `N × N` permutation `P` with `A·P` the pivoted matrix (identity
    /// without pivoting).
    pub fn permutation_matrix(&self) -> DynMatrix<T> {
        let n = self.qr.ncols();
        match &self.pivots {
            Some(p) => {
                let mut m = DynMatrix::zeros(n, n);
                for (j, &src) in p.iter().enumerate() {
                    m[(src, j)] = T::one();
                }
                m
            }
            None => DynMatrix::eye(n),
        }
    }

    fn check_rows(&self, b: &DynVector<T>) -> Result<(), LinalgError> {
        let m = self.qr.nrows();
        if b.len() != m {
            return Err(LinalgError::DimensionMismatch {
                expected: (m, 1),
                got: (b.len(), 1),
            });
        }
        Ok(())
    }

    /// Compute `Q^H * b`.
    pub fn apply_qh(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        self.check_rows(b)?;
        let mut x = b.clone();
        for c in 0..self.tau.len() {
            apply_reflector(&self.qr, c, self.tau[c].conj(), x.as_mut_slice());
        }
        Ok(x)
    }

    /// Compute `Q * b`.
    pub fn apply_q(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        self.check_rows(b)?;
        let mut x = b.clone();
        for c in (0..self.tau.len()).rev() {
            apply_reflector(&self.qr, c, self.tau[c], x.as_mut_slice());
        }
        Ok(x)
    }

    /// Number of diagonal entries of R with modulus above `tol`.
    pub fn rank(&self, tol: T::Real) -> usize {
        (0..self.tau.len())
            .filter(|&i| self.qr[(i, i)].modulus() > tol)
            .count()
    }

    /// Solve `min ||A x - b||` for a full-column-rank `A` (`M >= N`).
    ///
    /// Returns [`LinalgError::Singular`] if a diagonal entry of R is zero.
    pub fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>, LinalgError> {
        let n = self.qr.ncols();
        if self.qr.nrows() < n {
            return Err(LinalgError::DimensionMismatch {
                expected: (n, n),
                got: (self.qr.nrows(), n),
            });
        }
        let qhb = self.apply_qh(b)?;
        let z = self.back_substitute(qhb.as_slice(), n)?;
        Ok(DynVector::from_vec(self.unpermute(&z)))
    }

    /// Back substitution on the leading `r × r` block of R.
    pub(crate) fn back_substitute(&self, rhs: &[T], r: usize) -> Result<Vec<T>, LinalgError> {
        let mut x = vec![T::zero(); r];
        for i in (0..r).rev() {
            let mut sum = rhs[i];
            for j in (i + 1)..r {
                sum = sum - self.qr[(i, j)] * x[j];
            }
            let d = self.qr[(i, i)];
            if d == T::zero() {
                return Err(LinalgError::Singular);
            }
            x[i] = sum / d;
        }
        Ok(x)
    }

    /// Scatter the leading entries of a solution in pivoted order back to
    /// the original column order (missing trailing entries are zero).
    pub(crate) fn unpermute(&self, z: &[T]) -> Vec<T> {
        let n = self.qr.ncols();
        let mut x = vec![T::zero(); n];
        for (j, &zj) in z.iter().enumerate() {
            let dst = match &self.pivots {
                Some(p) => p[j],
                None => j,
            };
            x[dst] = zj;
        }
        x
    }

    /// Determinant of the original matrix (square only).
    ///
    /// Panics if the matrix is not square.
    pub fn det(&self) -> T {
        assert!(self.qr.is_square(), "determinant requires a square matrix");
        let mut d = T::one();
        for i in 0..self.tau.len() {
            d = d * self.qr[(i, i)];
            // Each non-trivial reflector has determinant -1.
            if self.tau[i] != T::zero() {
                d = T::zero() - d;
            }
        }
        if let Some(p) = &self.pivots {
            if permutation_is_odd(p) {
                d = T::zero() - d;
            }
        }
        d
    }
}

fn permutation_is_odd(p: &[usize]) -> bool {
    let mut seen = vec![false; p.len()];
    let mut odd = false;
    for start in 0..p.len() {
        if seen[start] {
            continue;
        }
        let mut len = 0;
        let mut i = start;
        while !seen[i] {
            seen[i] = true;
            i = p[i];
            len += 1;
        }
        if len % 2 == 0 {
            odd = !odd;
        }
    }
    odd
}
