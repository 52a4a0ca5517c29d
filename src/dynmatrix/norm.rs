use num_traits::{Float, Zero};

use crate::traits::LinalgScalar;

use super::vector::DynVector;
use super::DynMatrix;

/// Scaled sum of squares: returns `sqrt(sum |x_i|^2)` without overflow for
/// large entries.
pub(crate) fn norm2<T: LinalgScalar>(x: &[T]) -> T::Real {
    let zero = <T::Real as Zero>::zero();
    let mut scale = zero;
    for &v in x {
        let m = v.modulus();
        if m > scale {
            scale = m;
        }
    }
    if scale == zero || !scale.is_finite() {
        return scale;
    }
    let mut ssq = zero;
    for &v in x {
        let r = v.modulus() / scale;
        ssq = ssq + r * r;
    }
    scale * ssq.sqrt()
}

// ── Vector norms ────────────────────────────────────────────────────

impl<T: LinalgScalar> DynVector<T> {
    /// L2 (Euclidean) norm.
    ///
    /// ```
    /// use tridiag::DynVector;
    /// let v = DynVector::from_slice(&[3.0_f64, 4.0]);
    /// assert!((v.norm() - 5.0).abs() < 1e-12);
    /// ```
    pub fn norm(&self) -> T::Real {
        norm2(self.as_slice())
    }

    /// Squared L2 norm `sum |x_i|^2`.
    pub fn norm_squared(&self) -> T::Real {
        let mut sum = <T::Real as Zero>::zero();
        for &x in self.as_slice() {
            sum = sum + x.abs_sq();
        }
        sum
    }

    /// Infinity norm (largest modulus).
    pub fn norm_inf(&self) -> T::Real {
        let mut max = <T::Real as Zero>::zero();
        for &x in self.as_slice() {
            let m = x.modulus();
            if m > max {
                max = m;
            }
        }
        max
    }
}

// ── Matrix norms ────────────────────────────────────────────────────

impl<T: LinalgScalar> DynMatrix<T> {
    /// Frobenius norm: `sqrt(sum |a_ij|^2)`.
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[3.0_f64, 0.0, 0.0, 4.0]);
    /// assert!((m.frobenius_norm() - 5.0).abs() < 1e-12);
    /// ```
    pub fn frobenius_norm(&self) -> T::Real {
        norm2(self.as_slice())
    }

    /// Largest element modulus.
    pub fn max_abs(&self) -> T::Real {
        let mut max = <T::Real as Zero>::zero();
        for &x in self.as_slice() {
            let m = x.modulus();
            if m > max {
                max = m;
            }
        }
        max
    }
}
