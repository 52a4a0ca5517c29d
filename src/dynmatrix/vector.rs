use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::traits::{LinalgScalar, MatrixMut, MatrixRef, Scalar};

use super::DynMatrix;

/// Dynamically-sized column vector.
///
/// Provides single-index access `v[i]` and behaves as an `n x 1` matrix
/// through [`MatrixRef`] / [`MatrixMut`].
///
/// # Examples
///
/// ```
/// use tridiag::DynVector;
///
/// let v = DynVector::from_slice(&[1.0_f64, 2.0, 3.0]);
/// assert_eq!(v[0], 1.0);
/// assert_eq!(v.len(), 3);
/// assert!((v.dot(&v) - 14.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynVector<T> {
    data: Vec<T>,
}

impl<T: Scalar> DynVector<T> {
    /// Create a vector from a flat slice.
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Create a vector from an owned `Vec`.
    ///
    /// ```
    /// use tridiag::DynVector;
    /// let v = DynVector::from_vec(vec![1.0, 2.0, 3.0]);
    /// assert_eq!(v[2], 3.0);
    /// ```
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Create a zero vector of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self {
            data: vec![T::zero(); n],
        }
    }

    /// Create a vector filled with a value.
    pub fn fill(n: usize, value: T) -> Self {
        Self {
            data: vec![value; n],
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bilinear dot product `sum(a_i * b_i)` (no conjugation).
    ///
    /// ```
    /// use tridiag::DynVector;
    /// let a = DynVector::from_slice(&[1.0, 2.0, 3.0]);
    /// let b = DynVector::from_slice(&[4.0, 5.0, 6.0]);
    /// assert_eq!(a.dot(&b), 32.0);
    /// ```
    pub fn dot(&self, rhs: &Self) -> T {
        assert_eq!(self.len(), rhs.len(), "vector length mismatch");
        let mut sum = T::zero();
        for (&a, &b) in self.data.iter().zip(rhs.data.iter()) {
            sum = sum + a * b;
        }
        sum
    }

    /// View the vector data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// View the vector data as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the vector, returning its storage.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: LinalgScalar> DynVector<T> {
    /// Sesquilinear inner product `sum(conj(a_i) * b_i)`.
    pub fn dotc(&self, rhs: &Self) -> T {
        assert_eq!(self.len(), rhs.len(), "vector length mismatch");
        let mut sum = T::zero();
        for (&a, &b) in self.data.iter().zip(rhs.data.iter()) {
            sum = sum + a.conj() * b;
        }
        sum
    }

    /// Promote a vector of norm-type values into the field.
    pub fn from_real(v: &DynVector<T::Real>) -> Self {
        Self {
            data: v.as_slice().iter().map(|&x| T::from_real(x)).collect(),
        }
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<usize> for DynVector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for DynVector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

// ── MatrixRef / MatrixMut (n x 1) ───────────────────────────────────

impl<T> MatrixRef<T> for DynVector<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn ncols(&self) -> usize {
        1
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        debug_assert_eq!(col, 0);
        &self.data[row]
    }

    #[inline]
    fn col_as_slice(&self, col: usize, row_start: usize) -> &[T] {
        debug_assert_eq!(col, 0);
        &self.data[row_start..]
    }
}

impl<T> MatrixMut<T> for DynVector<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        debug_assert_eq!(col, 0);
        &mut self.data[row]
    }

    #[inline]
    fn col_as_mut_slice(&mut self, col: usize, row_start: usize) -> &mut [T] {
        debug_assert_eq!(col, 0);
        &mut self.data[row_start..]
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl<T: Scalar> From<DynVector<T>> for DynMatrix<T> {
    /// Column matrix `n x 1`.
    fn from(v: DynVector<T>) -> Self {
        let n = v.len();
        DynMatrix::from_vec(n, 1, v.data)
    }
}

impl<T: Scalar> From<Vec<T>> for DynVector<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice() {
        let v = DynVector::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(v.len(), 3);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[2], 3.0);
    }

    #[test]
    fn zeros_and_index_mut() {
        let mut v = DynVector::<f64>::zeros(3);
        v[1] = 42.0;
        assert_eq!(v.as_slice(), &[0.0, 42.0, 0.0]);
    }

    #[test]
    fn dot_product() {
        let a = DynVector::from_slice(&[1.0, 2.0, 3.0]);
        let b = DynVector::from_slice(&[4.0, 5.0, 6.0]);
        assert_eq!(a.dot(&b), 32.0);
        assert_eq!(a.dotc(&b), 32.0);
    }

    #[test]
    fn column_matrix_view() {
        let v = DynVector::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(v.nrows(), 3);
        assert_eq!(v.ncols(), 1);
        assert_eq!(*v.get(1, 0), 2.0);
        let m: DynMatrix<f64> = v.into();
        assert_eq!(m.nrows(), 3);
        assert_eq!(m[(2, 0)], 3.0);
    }

    #[cfg(feature = "complex")]
    #[test]
    fn dotc_conjugates_left() {
        use num_complex::Complex;
        let a = DynVector::from_slice(&[Complex::new(0.0_f64, 1.0)]);
        assert_eq!(a.dotc(&a), Complex::new(1.0, 0.0));
        assert_eq!(a.dot(&a), Complex::new(-1.0, 0.0));
    }
}
