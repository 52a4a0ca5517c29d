use alloc::vec;
use alloc::vec::Vec;

use num_traits::{Float, Zero};

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::qr::{householder, reflect_row};
use crate::linalg::LinalgError;
use crate::packed::{BandMatrix, GuardedStorage, PackedMatrix, Structure};
use crate::traits::{phase, LinalgScalar};

/// Reduction of a symmetric/Hermitian matrix to real symmetric tridiagonal
/// form, `A = Q · T · Q^H`.
///
/// `T` is always real, even for complex input: the complex sub-diagonal
/// left by the reduction is rotated onto the non-negative real axis by a
/// diagonal unitary scaling that is folded into `Q`. `Q` is kept only when
/// requested, and is required by [`transform`](Self::transform).
///
/// # Example
///
/// ```
/// use tridiag::DynMatrix;
/// use tridiag::linalg::TridiagonalDecomposition;
///
/// let a = DynMatrix::from_rows(3, 3, &[4.0_f64, 1.0, 2.0, 1.0, 3.0, 0.0, 2.0, 0.0, 1.0]);
/// let tri = TridiagonalDecomposition::new(&a, true).unwrap();
/// assert_eq!(tri.diagonal().len(), 3);
/// assert_eq!(tri.off_diagonal().len(), 2);
///
/// // Q T Q^H reconstructs A
/// let q = tri.q().unwrap();
/// let t = DynMatrix::from_real(&tri.to_matrix());
/// let back = &(q * &t) * &q.adjoint();
/// assert!(back.max_abs_diff(&a) < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct TridiagonalDecomposition<T: LinalgScalar> {
    diagonal: Vec<T::Real>,
    off_diagonal: Vec<T::Real>,
    q: Option<DynMatrix<T>>,
}

impl<T: LinalgScalar> TridiagonalDecomposition<T> {
    /// Householder reduction of a dense Hermitian matrix.
    ///
    /// Only the lower triangle of `a` is referenced; the upper triangle is
    /// taken to be its conjugate transpose and the imaginary part of the
    /// diagonal is ignored.
    pub fn new(a: &DynMatrix<T>, keep_transform: bool) -> Result<Self, LinalgError> {
        let n = a.nrows();
        if !a.is_square() {
            return Err(LinalgError::DimensionMismatch {
                expected: (n, n),
                got: (n, a.ncols()),
            });
        }
        let w = DynMatrix::from_fn(n, n, |i, j| {
            if i > j {
                a[(i, j)]
            } else if i < j {
                a[(j, i)].conj()
            } else {
                T::from_real(a[(i, i)].re())
            }
        });
        Ok(householder_tridiagonal(w, keep_transform))
    }

    /// Reduction of packed symmetric (real fields) or Hermitian storage.
    ///
    /// Panics for skew storage, and for symmetric storage over a complex
    /// field, neither of which is Hermitian.
    pub fn from_packed(a: &PackedMatrix<T>, keep_transform: bool) -> Self {
        let hermitian = match a.structure() {
            Structure::Hermitian => true,
            Structure::Symmetric => !T::is_complex(),
            Structure::Skew => false,
        };
        assert!(hermitian, "tridiagonal reduction requires a Hermitian matrix");
        householder_tridiagonal(a.to_dense(), keep_transform)
    }

    /// Givens-rotation reduction of a symmetric/Hermitian band matrix.
    ///
    /// Works on the lower band plus one extra sub-diagonal, `O(kd · n)`
    /// storage. Each entry below the sub-diagonal is annihilated with a
    /// rotation of two adjacent rows and columns; the bulge that rotation
    /// leaves `kd + 1` below the diagonal is chased off the end of the band
    /// before the next entry is touched. Bandwidth 0 is already diagonal
    /// (`Q = I`); bandwidth 1 only needs the phase scaling.
    ///
    /// Panics for symmetric storage over a complex field.
    pub fn banded(a: &BandMatrix<T>, keep_transform: bool) -> Self {
        let hermitian = match a.structure() {
            Structure::Hermitian => true,
            Structure::Symmetric => !T::is_complex(),
            Structure::Skew => false,
        };
        assert!(hermitian, "tridiagonal reduction requires a Hermitian matrix");

        let n = a.n();
        let kd = a.kd();
        let mut w = BulgeBand::from_band(a);
        let mut q = if keep_transform {
            Some(DynMatrix::<T>::eye(n))
        } else {
            None
        };

        if kd > 1 {
            for k in 0..n.saturating_sub(2) {
                for i in ((k + 2)..n.min(k + kd + 1)).rev() {
                    // zero (i, k), then push each bulge down by kd rows
                    let (mut row, mut col) = (i, k);
                    while row < n {
                        let b = w.get(row, col);
                        if b == T::zero() {
                            break;
                        }
                        let (c, s) = complex_givens(w.get(row - 1, col), b);
                        w.rotate(row - 1, c, s);
                        w.set(row, col, T::zero());
                        if let Some(q) = q.as_mut() {
                            rotate_cols_adjoint(q, row - 1, row, c, s);
                        }
                        col = row - 1;
                        row += kd;
                    }
                }
            }
        }

        let d: Vec<T> = (0..n).map(|i| w.get(i, i)).collect();
        let e: Vec<T> = (1..n).map(|i| w.get(i, i - 1)).collect();
        realify(&d, &e, q)
    }

    /// Build from raw parts.
    ///
    /// Fails with `DimensionMismatch` unless `off_diagonal.len() + 1 ==
    /// diagonal.len()` (both empty is allowed) and `q`, if given, is n×n.
    ///
    /// ```
    /// use tridiag::linalg::{LinalgError, TridiagonalDecomposition};
    ///
    /// let ok = TridiagonalDecomposition::<f64>::from_parts(vec![2.0, 2.0], vec![1.0], None);
    /// assert!(ok.is_ok());
    /// let bad = TridiagonalDecomposition::<f64>::from_parts(vec![2.0, 2.0], vec![], None);
    /// assert!(matches!(bad, Err(LinalgError::DimensionMismatch { .. })));
    /// ```
    pub fn from_parts(
        diagonal: Vec<T::Real>,
        off_diagonal: Vec<T::Real>,
        q: Option<DynMatrix<T>>,
    ) -> Result<Self, LinalgError> {
        let n = diagonal.len();
        let expected_off = n.saturating_sub(1);
        if off_diagonal.len() != expected_off {
            return Err(LinalgError::DimensionMismatch {
                expected: (expected_off, 1),
                got: (off_diagonal.len(), 1),
            });
        }
        if let Some(q) = &q {
            if q.nrows() != n || q.ncols() != n {
                return Err(LinalgError::DimensionMismatch {
                    expected: (n, n),
                    got: (q.nrows(), q.ncols()),
                });
            }
        }
        Ok(Self {
            diagonal,
            off_diagonal,
            q,
        })
    }

    /// Problem size.
    pub fn n(&self) -> usize {
        self.diagonal.len()
    }

    /// Diagonal of `T` (length n).
    pub fn diagonal(&self) -> &[T::Real] {
        &self.diagonal
    }

    /// Sub-diagonal of `T` (length n-1).
    pub fn off_diagonal(&self) -> &[T::Real] {
        &self.off_diagonal
    }

    /// The accumulated transform, if retained.
    pub fn q(&self) -> Option<&DynMatrix<T>> {
        self.q.as_ref()
    }

    /// Whether `Q` was retained.
    pub fn has_transform(&self) -> bool {
        self.q.is_some()
    }

    /// Dense real tridiagonal matrix `T`.
    pub fn to_matrix(&self) -> DynMatrix<T::Real> {
        let n = self.n();
        let mut t = DynMatrix::zeros(n, n);
        for i in 0..n {
            t[(i, i)] = self.diagonal[i];
        }
        for (i, &e) in self.off_diagonal.iter().enumerate() {
            t[(i + 1, i)] = e;
            t[(i, i + 1)] = e;
        }
        t
    }

    /// `Q · x` for a vector of the real tridiagonal problem.
    pub fn transform_vector(&self, x: &DynVector<T::Real>) -> Result<DynVector<T>, LinalgError> {
        let q = self.q.as_ref().ok_or(LinalgError::MissingTransform)?;
        let n = self.n();
        if x.len() != n {
            return Err(LinalgError::DimensionMismatch {
                expected: (n, 1),
                got: (x.len(), 1),
            });
        }
        Ok(q * &DynVector::from_real(x))
    }

    /// `Q · Z` for a matrix of vectors of the real tridiagonal problem.
    pub fn transform(&self, z: &DynMatrix<T::Real>) -> Result<DynMatrix<T>, LinalgError> {
        let q = self.q.as_ref().ok_or(LinalgError::MissingTransform)?;
        let n = self.n();
        if z.nrows() != n {
            return Err(LinalgError::DimensionMismatch {
                expected: (n, z.ncols()),
                got: (z.nrows(), z.ncols()),
            });
        }
        Ok(q * &DynMatrix::from_real(z))
    }
}

/// Householder reduction of a full Hermitian working matrix.
fn householder_tridiagonal<T: LinalgScalar>(
    mut w: DynMatrix<T>,
    keep_transform: bool,
) -> TridiagonalDecomposition<T> {
    let n = w.nrows();
    let mut q = if keep_transform {
        Some(DynMatrix::<T>::eye(n))
    } else {
        None
    };
    let mut e = vec![T::zero(); n.saturating_sub(1)];
    let two = <T::Real as num_traits::One>::one() + <T::Real as num_traits::One>::one();

    for k in 0..n.saturating_sub(2) {
        // Reflector from w[k+1:n, k]; w[k+1, k] becomes beta.
        let tau = householder(&mut w.col_view_mut(k)[k + 1..]);
        e[k] = w[(k + 1, k)];
        if tau == T::zero() {
            continue;
        }
        let v: Vec<T> = {
            let col = w.col_view(k);
            let mut v = Vec::with_capacity(n - k - 1);
            v.push(T::one());
            v.extend_from_slice(&col[k + 2..]);
            v
        };
        let sub_n = n - k - 1;

        // p = tau * W_sub * v
        let mut p = vec![T::zero(); sub_n];
        for (jj, &vj) in v.iter().enumerate() {
            let col = &w.col_view(k + 1 + jj)[k + 1..];
            for (pi, &wij) in p.iter_mut().zip(col.iter()) {
                *pi = *pi + wij * vj;
            }
        }
        for pi in p.iter_mut() {
            *pi = tau * *pi;
        }

        // q_vec = p - (tau/2)(v^H p) v
        let mut vhp = T::zero();
        for (&vi, &pi) in v.iter().zip(p.iter()) {
            vhp = vhp + vi.conj() * pi;
        }
        let half_tau_vhp = tau * vhp / T::from_real(two);
        let qv: Vec<T> = p
            .iter()
            .zip(v.iter())
            .map(|(&pi, &vi)| pi - half_tau_vhp * vi)
            .collect();

        // Rank-2 update: W_sub -= v * q_vec^H + q_vec * v^H
        for j in 0..sub_n {
            let (vj_c, qj_c) = (v[j].conj(), qv[j].conj());
            let col = &mut w.col_view_mut(k + 1 + j)[k + 1..];
            for (i, wij) in col.iter_mut().enumerate() {
                *wij = *wij - v[i] * qj_c - qv[i] * vj_c;
            }
        }

        // Q = Q * H
        if let Some(q) = q.as_mut() {
            for row in 0..n {
                reflect_row(q, row, k + 1, &v[1..], tau);
            }
        }
    }

    if n >= 2 {
        e[n - 2] = w[(n - 1, n - 2)];
    }
    let d: Vec<T> = (0..n).map(|i| w[(i, i)]).collect();
    realify(&d, &e, q)
}

/// Turn a Hermitian tridiagonal (`d`, complex sub-diagonal `e`) into a real
/// one via `D^H T D` with `D = diag(delta)`, folding `D` into `Q`.
fn realify<T: LinalgScalar>(
    d: &[T],
    e: &[T],
    mut q: Option<DynMatrix<T>>,
) -> TridiagonalDecomposition<T> {
    let n = d.len();
    let diagonal: Vec<T::Real> = d.iter().map(|&x| x.re()).collect();
    let mut off_diagonal = vec![<T::Real as Zero>::zero(); n.saturating_sub(1)];
    let mut delta = T::one();
    for k in 0..n {
        if k > 0 {
            let ek = e[k - 1];
            off_diagonal[k - 1] = ek.modulus();
            delta = delta * phase(ek);
            if let Some(q) = q.as_mut() {
                if delta != T::one() {
                    for x in q.col_view_mut(k).iter_mut() {
                        *x = *x * delta;
                    }
                }
            }
        }
    }
    TridiagonalDecomposition {
        diagonal,
        off_diagonal,
        q,
    }
}

/// Unitary `G = [c, s; -conj(s), c]` with real `c` such that
/// `G · [a; b] = [r; 0]`.
fn complex_givens<T: LinalgScalar>(a: T, b: T) -> (T::Real, T) {
    let nrm = a.modulus().hypot(b.modulus());
    let c = a.modulus() / nrm;
    let s = phase(a) * b.conj() / T::from_real(nrm);
    (c, s)
}

/// Lower band of a Hermitian working matrix with room for one bulge.
///
/// Element `(i, j)`, `0 <= i - j <= width`, lives at
/// `j * (width + 1) + i - j`; `width` is `kd + 1`.
struct BulgeBand<T> {
    n: usize,
    width: usize,
    data: Vec<T>,
}

impl<T: LinalgScalar> BulgeBand<T> {
    fn from_band(a: &BandMatrix<T>) -> Self {
        let n = a.n();
        let kd = a.kd();
        let width = kd + 1;
        let mut data = vec![T::zero(); (width + 1) * n];
        for j in 0..n {
            for i in j..n.min(j + kd + 1) {
                data[j * (width + 1) + i - j] = a.get(i, j);
            }
        }
        Self { n, width, data }
    }

    fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i >= j && i - j <= self.width, "({}, {}) outside the band", i, j);
        j * (self.width + 1) + i - j
    }

    fn get(&self, i: usize, j: usize) -> T {
        self.data[self.index(i, j)]
    }

    fn set(&mut self, i: usize, j: usize, v: T) {
        let k = self.index(i, j);
        self.data[k] = v;
    }

    /// `W <- G · W · G^H` for `G` acting on rows/columns `p`, `p + 1`,
    /// touching only cells inside the band.
    fn rotate(&mut self, p: usize, c: T::Real, s: T) {
        let q = p + 1;
        let cc = T::from_real(c);
        let sc = s.conj();

        // rows p, q left of the pair
        for j in q.saturating_sub(self.width)..p {
            let (x, y) = (self.get(p, j), self.get(q, j));
            self.set(p, j, cc * x + s * y);
            self.set(q, j, cc * y - sc * x);
        }

        // diagonal block [a, conj(b); b, d]
        let (a, b, d) = (self.get(p, p), self.get(q, p), self.get(q, q));
        let m00 = cc * a + s * b;
        let m01 = cc * b.conj() + s * d;
        let m10 = cc * b - sc * a;
        let m11 = cc * d - sc * b.conj();
        self.set(p, p, m00 * cc + m01 * sc);
        self.set(q, p, m10 * cc + m11 * sc);
        self.set(q, q, m11 * cc - m10 * s);

        // columns p, q below the pair
        for r in (q + 1)..self.n.min(p + self.width + 1) {
            let (x, y) = (self.get(r, p), self.get(r, q));
            self.set(r, p, cc * x + sc * y);
            self.set(r, q, cc * y - s * x);
        }
    }
}

/// Columns `p`, `q` of `m` <- columns `· G^H`.
fn rotate_cols_adjoint<T: LinalgScalar>(
    m: &mut DynMatrix<T>,
    p: usize,
    q: usize,
    c: T::Real,
    s: T,
) {
    let c = T::from_real(c);
    let sc = s.conj();
    let (cp, cq) = m.two_cols_mut(p, q);
    for (x, y) in cp.iter_mut().zip(cq.iter_mut()) {
        let (a, b) = (*x, *y);
        *x = c * a + sc * b;
        *y = c * b - s * a;
    }
}
