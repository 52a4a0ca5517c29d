use alloc::vec;
use alloc::vec::Vec;

use num_traits::{Float, One, Zero};

use crate::dynmatrix::DynMatrix;
use crate::linalg::qr::{householder, reflect, reflect_row};
use crate::linalg::{givens, rotate_cols, LinalgError};
use crate::traits::{phase, LinalgScalar};

// ── Householder bidiagonalization ───────────────────────────────────

/// Real upper bidiagonal form `A = U · B · V^H` of an M×N matrix (M ≥ N).
pub(crate) struct Bidiagonal<T: LinalgScalar> {
    pub diag: Vec<T::Real>,
    pub off_diag: Vec<T::Real>,
    /// M×M unitary.
    pub u: DynMatrix<T>,
    /// N×N unitary.
    pub v: DynMatrix<T>,
}

/// Householder bidiagonalization: reduce an M×N matrix (M ≥ N) to real
/// upper bidiagonal form via unitary transforms.
///
/// Left reflectors zero `a[k+1:m, k]`; right reflectors are built from the
/// conjugated row so that `a[k, k+2:n]` is zeroed for complex input too.
/// The remaining complex diagonal and superdiagonal are then rotated to
/// real non-negative values by diagonal unitary scalings folded into `U`
/// and `V`.
pub(crate) fn bidiagonalize<T: LinalgScalar>(mut a: DynMatrix<T>) -> Bidiagonal<T> {
    let m = a.nrows();
    let n = a.ncols();
    assert!(m >= n, "bidiagonalize requires M >= N");

    let mut u = DynMatrix::<T>::eye(m);
    let mut v = DynMatrix::<T>::eye(n);
    let mut d = vec![T::zero(); n];
    let mut e = vec![T::zero(); n.saturating_sub(1)];

    for k in 0..n {
        // ── Left reflector on a[k:m, k] ──
        let tau = householder(&mut a.col_view_mut(k)[k..]);
        d[k] = a[(k, k)];
        if tau != T::zero() {
            let v_tail: Vec<T> = a.col_view(k)[k + 1..].to_vec();
            for j in (k + 1)..n {
                reflect(&v_tail, tau, &mut a.col_view_mut(j)[k..]);
            }
            // U = U * H
            for row in 0..m {
                reflect_row(&mut u, row, k, &v_tail, tau);
            }
        }

        // ── Right reflector on conj(a[k, k+1:n]) ──
        if k + 1 < n {
            let mut x: Vec<T> = ((k + 1)..n).map(|j| a[(k, j)].conj()).collect();
            let tau = householder(&mut x);
            e[k] = x[0].conj();
            if tau != T::zero() {
                let v_tail = &x[1..];
                for row in (k + 1)..m {
                    reflect_row(&mut a, row, k + 1, v_tail, tau);
                }
                // V = V * H
                for row in 0..n {
                    reflect_row(&mut v, row, k + 1, v_tail, tau);
                }
            }
        }
    }

    // Realify: B = P · B' · R^H with P, R diagonal unitary.
    let mut diag = vec![<T::Real as Zero>::zero(); n];
    let mut off_diag = vec![<T::Real as Zero>::zero(); n.saturating_sub(1)];
    let mut r = T::one();
    for k in 0..n {
        let p = phase(d[k] * r);
        diag[k] = d[k].modulus();
        scale_col(&mut u, k, p);
        scale_col(&mut v, k, r);
        if k + 1 < n {
            off_diag[k] = e[k].modulus();
            r = phase(p * e[k].conj());
        }
    }

    Bidiagonal { diag, off_diag, u, v }
}

fn scale_col<T: LinalgScalar>(m: &mut DynMatrix<T>, j: usize, s: T) {
    if s != T::one() {
        for x in m.col_view_mut(j).iter_mut() {
            *x = *x * s;
        }
    }
}

// ── Golub-Kahan bidiagonal QR ───────────────────────────────────────

/// Golub-Kahan implicit-shift QR iteration on a real upper bidiagonal matrix.
///
/// On entry:
/// - `diag[0..n]`: bidiagonal diagonal entries
/// - `off_diag[0..n-1]`: bidiagonal superdiagonal entries
/// - `u`, `v`: matrices whose columns `0..n` accumulate the left and right
///   rotations (skipped when `None`)
///
/// On return:
/// - `diag` contains non-negative singular values sorted descending
/// - `off_diag` is zeroed
pub(crate) fn bidiagonal_qr<T: LinalgScalar>(
    diag: &mut [T::Real],
    off_diag: &mut [T::Real],
    mut u: Option<&mut DynMatrix<T>>,
    mut v: Option<&mut DynMatrix<T>>,
    max_iter: usize,
) -> Result<(), LinalgError> {
    let n = diag.len();
    let zero = <T::Real as Zero>::zero();
    let eps = T::lepsilon();

    let mut anorm = zero;
    for &x in diag.iter().chain(off_diag.iter()) {
        anorm = anorm.max(x.abs());
    }
    let tiny = eps * anorm;

    let mut iter = 0usize;
    let mut hi = n.saturating_sub(1);

    while hi > 0 {
        // Deflation: trailing off_diag negligible
        {
            let threshold = eps * (diag[hi - 1].abs() + diag[hi].abs());
            if off_diag[hi - 1].abs() <= threshold {
                off_diag[hi - 1] = zero;
                hi -= 1;
                continue;
            }
        }

        // Find lo: start of unreduced block
        let mut lo = hi - 1;
        while lo > 0 {
            let threshold = eps * (diag[lo - 1].abs() + diag[lo].abs());
            if off_diag[lo - 1].abs() <= threshold {
                off_diag[lo - 1] = zero;
                break;
            }
            lo -= 1;
        }

        iter += 1;
        if iter > max_iter {
            return Err(LinalgError::ConvergenceFailure);
        }

        // A zero at the bottom of the block: chase off_diag[hi-1] upward
        // with right rotations on columns (j, hi).
        if diag[hi].abs() <= tiny {
            diag[hi] = zero;
            let mut z = off_diag[hi - 1];
            off_diag[hi - 1] = zero;
            for j in (lo..hi).rev() {
                let (c, s) = givens(diag[j], z);
                diag[j] = c * diag[j] + s * z;
                if j > lo {
                    z = zero - s * off_diag[j - 1];
                    off_diag[j - 1] = c * off_diag[j - 1];
                }
                if let Some(v) = v.as_deref_mut() {
                    rotate_cols(v, j, hi, c, s);
                }
            }
            continue;
        }

        // A zero inside the block: chase off_diag[idx] off the bottom with
        // left rotations on rows (j, idx), which decouples the problem.
        if let Some(idx) = (lo..hi).find(|&i| diag[i].abs() <= tiny) {
            diag[idx] = zero;
            let mut z = off_diag[idx];
            off_diag[idx] = zero;
            for j in (idx + 1)..=hi {
                let (c, s) = givens(diag[j], z);
                diag[j] = c * diag[j] + s * z;
                if j < hi {
                    z = zero - s * off_diag[j];
                    off_diag[j] = c * off_diag[j];
                }
                if let Some(u) = u.as_deref_mut() {
                    rotate_cols(u, j, idx, c, s);
                }
            }
            continue;
        }

        // Wilkinson shift from trailing 2×2 of B^T B
        let d_hi = diag[hi];
        let d_hi1 = diag[hi - 1];
        let e_hi1 = off_diag[hi - 1];
        let e_hi2 = if hi >= lo + 2 { off_diag[hi - 2] } else { zero };

        let t11 = d_hi1 * d_hi1 + e_hi2 * e_hi2;
        let t12 = d_hi1 * e_hi1;
        let t22 = d_hi * d_hi + e_hi1 * e_hi1;

        let two = <T::Real as One>::one() + <T::Real as One>::one();
        let dd = (t11 - t22) / two;
        let sign_d = if dd >= zero {
            <T::Real as One>::one()
        } else {
            zero - <T::Real as One>::one()
        };
        let denom = dd + sign_d * (dd * dd + t12 * t12).sqrt();
        let mu = if denom == zero { t22 } else { t22 - t12 * t12 / denom };

        // Implicit QR chase
        let mut x = diag[lo] * diag[lo] - mu;
        let mut z = diag[lo] * off_diag[lo];

        for k in lo..hi {
            // Right rotation on columns k, k+1 zeroes z
            let (c, s) = givens(x, z);
            if k > lo {
                off_diag[k - 1] = c * x + s * z;
            }

            let dk = diag[k];
            let ek = off_diag[k];
            let dk1 = diag[k + 1];

            diag[k] = c * dk + s * ek;
            off_diag[k] = c * ek - s * dk;
            let bulge = s * dk1;
            diag[k + 1] = c * dk1;

            if let Some(v) = v.as_deref_mut() {
                rotate_cols(v, k, k + 1, c, s);
            }

            // Left rotation on rows k, k+1 zeroes the bulge at B[k+1, k]
            let (c2, s2) = givens(diag[k], bulge);
            diag[k] = c2 * diag[k] + s2 * bulge;
            let old_ek = off_diag[k];
            let old_dk1 = diag[k + 1];
            off_diag[k] = c2 * old_ek + s2 * old_dk1;
            diag[k + 1] = c2 * old_dk1 - s2 * old_ek;

            if k + 1 < hi {
                // Fill-in at B[k, k+2] drives the next right rotation
                let old_ek1 = off_diag[k + 1];
                x = off_diag[k];
                z = s2 * old_ek1;
                off_diag[k + 1] = c2 * old_ek1;
            }

            if let Some(u) = u.as_deref_mut() {
                rotate_cols(u, k, k + 1, c2, s2);
            }
        }
    }

    // Make all singular values non-negative
    for i in 0..n {
        if diag[i] < zero {
            diag[i] = zero - diag[i];
            if let Some(u) = u.as_deref_mut() {
                scale_col(u, i, T::zero() - T::one());
            }
        }
    }

    // Sort singular values descending, permute U and V columns
    for i in 0..n {
        let mut max_idx = i;
        for j in (i + 1)..n {
            if diag[j] > diag[max_idx] {
                max_idx = j;
            }
        }
        if max_idx != i {
            diag.swap(i, max_idx);
            if let Some(u) = u.as_deref_mut() {
                u.swap_cols(i, max_idx);
            }
            if let Some(v) = v.as_deref_mut() {
                v.swap_cols(i, max_idx);
            }
        }
    }

    Ok(())
}

// ── SvdDecomposition ────────────────────────────────────────────────

/// Thin singular value decomposition of an M×N matrix of any shape.
///
/// Computes `U` (M×K, orthonormal columns), singular values σ (length
/// `K = min(M, N)`, sorted descending) and `V^H` (K×N) such that
/// `A = U · diag(σ) · V^H`. Singular values are always real, whatever the
/// field of `A`. Wide matrices are decomposed through their adjoint.
///
/// # Example
///
/// ```
/// use tridiag::DynMatrix;
/// use tridiag::linalg::SvdDecomposition;
///
/// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 0.0, 0.0, 2.0, 0.0, 0.0]);
/// let svd = SvdDecomposition::new(&a).unwrap();
/// assert!((svd.singular_values()[0] - 2.0).abs() < 1e-10);
/// assert!((svd.singular_values()[1] - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct SvdDecomposition<T: LinalgScalar> {
    u: DynMatrix<T>,
    singular_values: Vec<T::Real>,
    vt: DynMatrix<T>,
}

impl<T: LinalgScalar> SvdDecomposition<T> {
    /// Compute the SVD of a matrix.
    ///
    /// Returns `Err(ConvergenceFailure)` if the iterative bidiagonal QR
    /// does not converge within the iteration budget.
    pub fn new(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        let (m, n) = (a.nrows(), a.ncols());
        if m < n {
            let t = Self::new(&a.adjoint())?;
            return Ok(Self {
                u: t.vt.adjoint(),
                singular_values: t.singular_values,
                vt: t.u.adjoint(),
            });
        }

        let Bidiagonal {
            mut diag,
            mut off_diag,
            mut u,
            mut v,
        } = bidiagonalize(a.clone());
        bidiagonal_qr(
            &mut diag,
            &mut off_diag,
            Some(&mut u),
            Some(&mut v),
            30 * m.max(n),
        )?;
        u.truncate_columns(n);

        Ok(Self {
            u,
            singular_values: diag,
            vt: v.adjoint(),
        })
    }

    /// Left singular vectors as columns (M×K).
    pub fn u(&self) -> &DynMatrix<T> {
        &self.u
    }

    /// Singular values, sorted descending.
    pub fn singular_values(&self) -> &[T::Real] {
        &self.singular_values
    }

    /// Conjugate-transposed right singular vectors (K×N).
    pub fn vt(&self) -> &DynMatrix<T> {
        &self.vt
    }

    /// Number of singular values strictly greater than `tol`.
    pub fn rank(&self, tol: T::Real) -> usize {
        self.singular_values.iter().filter(|&&s| s > tol).count()
    }
}
