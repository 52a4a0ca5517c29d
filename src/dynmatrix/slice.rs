use crate::traits::MatrixRef;

use super::DynMatrix;

impl<T> DynMatrix<T> {
    /// View the entire matrix as a flat slice in column-major order.
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// let m = DynMatrix::from_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    /// ```
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// View the entire matrix as a mutable flat slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Borrow column `j` as a contiguous slice.
    ///
    /// The view lives as long as the borrow of `self`; no data is copied.
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(m.col_view(1), &[2.0, 4.0]);
    /// ```
    #[inline]
    pub fn col_view(&self, j: usize) -> &[T] {
        assert!(j < self.ncols, "column {} out of range for {} columns", j, self.ncols);
        self.col_as_slice(j, 0)
    }

    /// Mutable column `j` as a contiguous slice.
    #[inline]
    pub fn col_view_mut(&mut self, j: usize) -> &mut [T] {
        assert!(j < self.ncols, "column {} out of range for {} columns", j, self.ncols);
        let m = self.nrows;
        &mut self.data[j * m..(j + 1) * m]
    }

    /// Two distinct mutable columns at once, returned in `(a, b)` order.
    pub(crate) fn two_cols_mut(&mut self, a: usize, b: usize) -> (&mut [T], &mut [T]) {
        assert_ne!(a, b, "columns must differ");
        let m = self.nrows;
        if a < b {
            let (lo, hi) = self.data.split_at_mut(b * m);
            (&mut lo[a * m..(a + 1) * m], &mut hi[..m])
        } else {
            let (lo, hi) = self.data.split_at_mut(a * m);
            (&mut hi[..m], &mut lo[b * m..(b + 1) * m])
        }
    }

    /// Iterate over all elements in column-major order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterate mutably over all elements in column-major order.
    #[inline]
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }
}

impl<'a, T> IntoIterator for &'a DynMatrix<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn col_view_borrows_storage() {
        let m = DynMatrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let c = m.col_view(0);
        assert_eq!(c, &[1.0, 3.0, 5.0]);
        assert_eq!(c.as_ptr(), m.as_slice().as_ptr());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn col_view_out_of_range() {
        let m = DynMatrix::from_rows(1, 1, &[1.0]);
        let _ = m.col_view(1);
    }

    #[test]
    fn two_cols_mut_either_order() {
        let mut m = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let (a, b) = m.two_cols_mut(2, 0);
        assert_eq!(a, &[3.0, 6.0]);
        assert_eq!(b, &[1.0, 4.0]);
        a[0] = 9.0;
        assert_eq!(m[(0, 2)], 9.0);
    }

    #[test]
    fn iter_column_major() {
        let m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let v: alloc::vec::Vec<f64> = m.iter().copied().collect();
        assert_eq!(v, alloc::vec![1.0, 3.0, 2.0, 4.0]);
    }
}
