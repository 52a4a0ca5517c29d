use alloc::vec;
use alloc::vec::Vec;

use super::{upper_index, GuardedStorage, Slot, Structure};
use crate::traits::LinalgScalar;

/// Symmetric, Hermitian or skew matrix stored as its upper triangle.
///
/// Symmetric and Hermitian storage holds `n(n+1)/2` entries including the
/// diagonal. Skew storage holds the `n(n-1)/2` strictly-upper entries; its
/// diagonal is a structural zero.
///
/// Hermitian storage does not force the diagonal to be real on writes.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedMatrix<T> {
    n: usize,
    structure: Structure,
    data: Vec<T>,
}

impl<T: LinalgScalar> PackedMatrix<T> {
    /// Zero matrix of the given structure.
    pub fn new(n: usize, structure: Structure) -> Self {
        let len = match structure {
            Structure::Skew => n * n.saturating_sub(1) / 2,
            _ => n * (n + 1) / 2,
        };
        Self {
            n,
            structure,
            data: vec![T::zero(); len],
        }
    }

    /// Zero symmetric matrix, `a_ji = a_ij`.
    pub fn symmetric(n: usize) -> Self {
        Self::new(n, Structure::Symmetric)
    }

    /// Zero Hermitian matrix, `a_ji = conj(a_ij)`.
    pub fn hermitian(n: usize) -> Self {
        Self::new(n, Structure::Hermitian)
    }

    /// Zero skew-symmetric matrix, `a_ji = -a_ij`, diagonal fixed at zero.
    pub fn skew(n: usize) -> Self {
        Self::new(n, Structure::Skew)
    }

    /// Symmetry of the stored matrix.
    pub fn structure(&self) -> Structure {
        self.structure
    }

    /// Packed entries, column-major upper triangle.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn offset(&self, i: usize, j: usize) -> usize {
        match self.structure {
            // strictly upper: column j holds rows 0..j
            Structure::Skew => j * (j - 1) / 2 + i,
            _ => upper_index(i, j),
        }
    }
}

impl<T: LinalgScalar> GuardedStorage<T> for PackedMatrix<T> {
    fn n(&self) -> usize {
        self.n
    }

    fn slot(&self, row: usize, col: usize) -> Slot<T> {
        if row == col && self.structure == Structure::Skew {
            Slot::Fixed(T::zero())
        } else if row <= col {
            Slot::Direct(self.offset(row, col))
        } else {
            Slot::Mirrored(self.offset(col, row))
        }
    }

    fn mirror(&self, v: T) -> T {
        match self.structure {
            Structure::Symmetric => v,
            Structure::Hermitian => v.conj(),
            Structure::Skew => T::zero() - v,
        }
    }

    fn storage(&self) -> &[T] {
        &self.data
    }

    fn storage_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}
