//! Conversions from dense matrices to packed storage.
//!
//! Each function reads a square `DynMatrix` and allocates a new packed
//! result. Symmetric, Hermitian and skew parts are formed by averaging an
//! element with its transposed counterpart, so a matrix that already has
//! the structure converts exactly.

use super::{BandMatrix, GuardedStorage, PackedMatrix, Structure, Triangle, TriangularMatrix};
use crate::dynmatrix::DynMatrix;
use crate::traits::LinalgScalar;

fn half<T: LinalgScalar>(x: T) -> T {
    x / (T::one() + T::one())
}

fn require_square<T>(a: &DynMatrix<T>) -> usize {
    assert_eq!(
        a.nrows(),
        a.ncols(),
        "packed storage requires a square matrix"
    );
    a.nrows()
}

fn fill<T: LinalgScalar, S: GuardedStorage<T>>(
    dst: &mut S,
    keep: impl Fn(usize, usize) -> bool,
    value: impl Fn(usize, usize) -> T,
) {
    let n = dst.n();
    for j in 0..n {
        for i in 0..=j {
            if keep(i, j) {
                let written = dst.set(i, j, value(i, j));
                debug_assert!(written.is_ok(), "stored cell ({}, {}) rejected a write", i, j);
            }
        }
    }
}

/// Symmetric part `(A + Aᵀ) / 2`.
pub fn to_symmetric<T: LinalgScalar>(a: &DynMatrix<T>) -> PackedMatrix<T> {
    let n = require_square(a);
    let mut p = PackedMatrix::new(n, Structure::Symmetric);
    fill(&mut p, |_, _| true, |i, j| half(a[(i, j)] + a[(j, i)]));
    p
}

/// Hermitian part `(A + Aᴴ) / 2`; the diagonal becomes real.
///
/// ```
/// use tridiag::{Complex, DynMatrix};
/// use tridiag::packed::{to_hermitian, GuardedStorage};
///
/// let a = DynMatrix::from_rows(2, 2, &[
///     Complex::new(1.0_f64, 2.0), Complex::new(0.0, 1.0),
///     Complex::new(0.0, 3.0), Complex::new(4.0, 0.0),
/// ]);
/// let h = to_hermitian(&a);
/// assert_eq!(h.get(0, 0), Complex::new(1.0, 0.0));
/// assert_eq!(h.get(0, 1), Complex::new(0.0, -1.0));
/// assert_eq!(h.get(1, 0), Complex::new(0.0, 1.0));
/// ```
pub fn to_hermitian<T: LinalgScalar>(a: &DynMatrix<T>) -> PackedMatrix<T> {
    let n = require_square(a);
    let mut p = PackedMatrix::new(n, Structure::Hermitian);
    fill(&mut p, |_, _| true, |i, j| half(a[(i, j)] + a[(j, i)].conj()));
    p
}

/// Skew part `(A - Aᵀ) / 2`.
pub fn to_skew<T: LinalgScalar>(a: &DynMatrix<T>) -> PackedMatrix<T> {
    let n = require_square(a);
    let mut p = PackedMatrix::new(n, Structure::Skew);
    fill(&mut p, |i, j| i < j, |i, j| half(a[(i, j)] - a[(j, i)]));
    p
}

/// Upper triangle of `A`, including the diagonal.
pub fn to_upper_triangular<T: LinalgScalar>(a: &DynMatrix<T>) -> TriangularMatrix<T> {
    let n = require_square(a);
    let mut t = TriangularMatrix::new(n, Triangle::Upper, false);
    fill(&mut t, |_, _| true, |i, j| a[(i, j)]);
    t
}

/// Lower triangle of `A`, including the diagonal.
pub fn to_lower_triangular<T: LinalgScalar>(a: &DynMatrix<T>) -> TriangularMatrix<T> {
    let n = require_square(a);
    let mut t = TriangularMatrix::new(n, Triangle::Lower, false);
    for j in 0..n {
        for i in j..n {
            let written = t.set(i, j, a[(i, j)]);
            debug_assert!(written.is_ok(), "stored cell ({}, {}) rejected a write", i, j);
        }
    }
    t
}

/// Symmetric band of width `kd` of `(A + Aᵀ) / 2`. Entries outside the
/// band are dropped.
pub fn to_band_symmetric<T: LinalgScalar>(a: &DynMatrix<T>, kd: usize) -> BandMatrix<T> {
    let n = require_square(a);
    let mut b = BandMatrix::new(n, kd, Structure::Symmetric);
    let kd = b.kd();
    fill(&mut b, |i, j| j - i <= kd, |i, j| half(a[(i, j)] + a[(j, i)]));
    b
}

/// Hermitian band of width `kd` of `(A + Aᴴ) / 2`.
pub fn to_band_hermitian<T: LinalgScalar>(a: &DynMatrix<T>, kd: usize) -> BandMatrix<T> {
    let n = require_square(a);
    let mut b = BandMatrix::new(n, kd, Structure::Hermitian);
    let kd = b.kd();
    fill(&mut b, |i, j| j - i <= kd, |i, j| half(a[(i, j)] + a[(j, i)].conj()));
    b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn general() -> DynMatrix<f64> {
        DynMatrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0])
    }

    #[test]
    fn symmetric_and_skew_parts_sum_to_input() {
        let a = general();
        let s = to_symmetric(&a).to_dense();
        let k = to_skew(&a).to_dense();
        assert!((&s + &k).max_abs_diff(&a) < 1e-15);
        assert_eq!(s[(0, 1)], 3.0);
        assert_eq!(k[(1, 0)], 1.0);
    }

    #[test]
    fn symmetric_input_converts_exactly() {
        let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 2.0]);
        assert_eq!(to_symmetric(&a).to_dense(), a);
        assert_eq!(to_hermitian(&a).to_dense(), a);
    }

    #[test]
    fn triangular_parts() {
        let a = general();
        let u = to_upper_triangular(&a).to_dense();
        let l = to_lower_triangular(&a).to_dense();
        assert_eq!(u[(0, 2)], 3.0);
        assert_eq!(u[(2, 0)], 0.0);
        assert_eq!(l[(2, 0)], 7.0);
        assert_eq!(l[(0, 2)], 0.0);
        assert_eq!(u.trace(), l.trace());
    }

    #[test]
    fn band_drops_outside_entries() {
        let a = general();
        let b = to_band_symmetric(&a, 1);
        assert_eq!(b.kd(), 1);
        let d = b.to_dense();
        assert_eq!(d[(0, 2)], 0.0);
        assert_eq!(d[(1, 2)], 7.0);
        assert_eq!(d[(2, 1)], 7.0);
    }

    #[test]
    #[should_panic(expected = "square")]
    fn non_square_panics() {
        let _ = to_symmetric(&DynMatrix::<f64>::zeros(2, 3));
    }
}
