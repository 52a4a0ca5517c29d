use alloc::vec::Vec;

use crate::traits::{LinalgScalar, Scalar};

use super::vector::DynVector;
use super::DynMatrix;

// ── Map ─────────────────────────────────────────────────────────────

impl<T> DynMatrix<T> {
    /// Apply a function to every element, producing a new matrix.
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, 4.0, 9.0, 16.0]);
    /// let r = m.map(|x: f64| x.sqrt());
    /// assert_eq!(r[(0, 1)], 2.0);
    /// assert_eq!(r[(1, 1)], 4.0);
    /// ```
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> DynMatrix<U>
    where
        T: Copy,
    {
        let data: Vec<U> = self.data.iter().map(|&x| f(x)).collect();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T: LinalgScalar> DynMatrix<T> {
    /// Promote a matrix of norm-type values into the field.
    pub fn from_real(m: &DynMatrix<T::Real>) -> Self {
        m.map(T::from_real)
    }
}

// ── Column manipulation ─────────────────────────────────────────────

impl<T: Copy> DynMatrix<T> {
    /// Swap two columns in place.
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// let mut m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// m.swap_cols(0, 1);
    /// assert_eq!(m[(0, 0)], 2.0);
    /// assert_eq!(m[(0, 1)], 1.0);
    /// ```
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        if a != b {
            let m = self.nrows;
            for i in 0..m {
                self.data.swap(a * m + i, b * m + i);
            }
        }
    }

    /// New matrix made of the listed columns, in order.
    pub fn select_columns(&self, cols: &[usize]) -> Self {
        let m = self.nrows;
        let mut data = Vec::with_capacity(m * cols.len());
        for &j in cols {
            data.extend_from_slice(&self.data[j * m..(j + 1) * m]);
        }
        DynMatrix {
            data,
            nrows: m,
            ncols: cols.len(),
        }
    }

    /// Drop every column from `ncols` on.
    pub fn truncate_columns(&mut self, ncols: usize) {
        if ncols < self.ncols {
            self.data.truncate(ncols * self.nrows);
            self.ncols = ncols;
        }
    }
}

// ── Column access ───────────────────────────────────────────────────

impl<T: Scalar> DynMatrix<T> {
    /// Extract column `j` as a `DynVector`.
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// let c = m.col(1);
    /// assert_eq!(c[0], 2.0);
    /// assert_eq!(c[1], 4.0);
    /// ```
    pub fn col(&self, j: usize) -> DynVector<T> {
        DynVector::from_slice(self.col_view(j))
    }

    /// Set column `j` from a `DynVector`.
    pub fn set_col(&mut self, j: usize, v: &DynVector<T>) {
        assert_eq!(v.len(), self.nrows, "vector length mismatch");
        let m = self.nrows;
        self.data[j * m..(j + 1) * m].copy_from_slice(v.as_slice());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_type_change() {
        let m = DynMatrix::from_rows(1, 2, &[1.5_f64, -2.0]);
        let r: DynMatrix<f32> = m.map(|x| x as f32);
        assert_eq!(r[(0, 1)], -2.0_f32);
    }

    #[test]
    fn select_and_truncate() {
        let m = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let s = m.select_columns(&[2, 0]);
        assert_eq!(s, DynMatrix::from_rows(2, 2, &[3.0, 1.0, 6.0, 4.0]));

        let mut t = m.clone();
        t.truncate_columns(1);
        assert_eq!(t, DynMatrix::from_rows(2, 1, &[1.0, 4.0]));
    }

    #[test]
    fn set_col_roundtrip() {
        let mut m = DynMatrix::<f64>::zeros(2, 2);
        m.set_col(1, &DynVector::from_slice(&[7.0, 8.0]));
        assert_eq!(m.col(1).as_slice(), &[7.0, 8.0]);
        assert_eq!(m.col(0).as_slice(), &[0.0, 0.0]);
    }
}
