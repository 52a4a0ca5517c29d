use alloc::vec;
use alloc::vec::Vec;

use super::{upper_index, GuardedStorage, Slot, Triangle};
use crate::traits::LinalgScalar;

/// Upper or lower triangular matrix in packed storage.
///
/// The opposite triangle is a structural zero. With a unit diagonal the
/// diagonal is a structural one and its storage is unused.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangularMatrix<T> {
    n: usize,
    triangle: Triangle,
    unit_diagonal: bool,
    data: Vec<T>,
}

impl<T: LinalgScalar> TriangularMatrix<T> {
    /// Zero triangular matrix. With `unit_diagonal` the diagonal is a
    /// structural one.
    pub fn new(n: usize, triangle: Triangle, unit_diagonal: bool) -> Self {
        Self {
            n,
            triangle,
            unit_diagonal,
            data: vec![T::zero(); n * (n + 1) / 2],
        }
    }

    /// Zero upper triangular matrix.
    pub fn upper(n: usize) -> Self {
        Self::new(n, Triangle::Upper, false)
    }

    /// Zero lower triangular matrix.
    pub fn lower(n: usize) -> Self {
        Self::new(n, Triangle::Lower, false)
    }

    /// Which triangle is stored.
    pub fn triangle(&self) -> Triangle {
        self.triangle
    }

    /// Whether the diagonal is a structural one.
    pub fn is_unit_diagonal(&self) -> bool {
        self.unit_diagonal
    }

    fn offset(&self, i: usize, j: usize) -> usize {
        match self.triangle {
            Triangle::Upper => upper_index(i, j),
            // column j holds rows j..n
            Triangle::Lower => j * self.n - j * j.saturating_sub(1) / 2 + (i - j),
        }
    }
}

impl<T: LinalgScalar> GuardedStorage<T> for TriangularMatrix<T> {
    fn n(&self) -> usize {
        self.n
    }

    fn slot(&self, row: usize, col: usize) -> Slot<T> {
        let stored = match self.triangle {
            Triangle::Upper => row <= col,
            Triangle::Lower => row >= col,
        };
        if !stored {
            Slot::Fixed(T::zero())
        } else if row == col && self.unit_diagonal {
            Slot::Fixed(T::one())
        } else {
            Slot::Direct(self.offset(row, col))
        }
    }

    fn mirror(&self, v: T) -> T {
        v
    }

    fn storage(&self) -> &[T] {
        &self.data
    }

    fn storage_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packed::StorageError;

    #[test]
    fn lower_offsets_cover_storage() {
        let n = 4;
        let t = TriangularMatrix::<f64>::lower(n);
        let mut seen = Vec::new();
        for j in 0..n {
            for i in j..n {
                seen.push(t.offset(i, j));
            }
        }
        let expected: Vec<usize> = (0..n * (n + 1) / 2).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn opposite_triangle_is_read_only() {
        let mut t = TriangularMatrix::<f64>::upper(3);
        t.set(0, 2, 7.0).unwrap();
        assert_eq!(t.get(0, 2), 7.0);
        assert_eq!(t.get(2, 0), 0.0);
        assert!(matches!(t.set(2, 0, 1.0), Err(StorageError::FixedConstant { .. })));
        t.set(2, 0, 0.0).unwrap();
        assert_eq!(t.to_dense()[(2, 0)], 0.0);
    }

    #[test]
    fn unit_diagonal() {
        let mut t = TriangularMatrix::<f64>::new(3, Triangle::Lower, true);
        assert_eq!(t.get(1, 1), 1.0);
        assert_eq!(
            t.set(1, 1, 2.0).unwrap_err(),
            StorageError::FixedConstant { row: 1, col: 1, attempted: 2.0, fixed: 1.0 }
        );
        t.set(1, 1, 1.0).unwrap();
        t.set(2, 0, 3.0).unwrap();
        let d = t.to_dense();
        assert_eq!(d.trace(), 3.0);
        assert_eq!(d[(2, 0)], 3.0);
        assert_eq!(d[(0, 2)], 0.0);
    }
}
