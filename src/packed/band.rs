use alloc::vec;
use alloc::vec::Vec;

use super::{GuardedStorage, Slot, Structure};
use crate::traits::LinalgScalar;

/// Symmetric or Hermitian band matrix, upper band storage.
///
/// Column `j` stores rows `j - kd ..= j` (clipped at 0) in a
/// `(kd + 1) × n` column-major array, element `(i, j)` at row `kd + i - j`.
/// Elements more than `kd` off the diagonal are structural zeros.
///
/// A bandwidth of `n` or more is clamped to `n - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct BandMatrix<T> {
    n: usize,
    kd: usize,
    structure: Structure,
    data: Vec<T>,
}

impl<T: LinalgScalar> BandMatrix<T> {
    /// Zero band matrix. Panics for [`Structure::Skew`].
    pub fn new(n: usize, kd: usize, structure: Structure) -> Self {
        assert!(
            structure != Structure::Skew,
            "band storage is symmetric or Hermitian"
        );
        let kd = kd.min(n.saturating_sub(1));
        Self {
            n,
            kd,
            structure,
            data: vec![T::zero(); (kd + 1) * n],
        }
    }

    /// Zero symmetric band matrix.
    pub fn symmetric(n: usize, kd: usize) -> Self {
        Self::new(n, kd, Structure::Symmetric)
    }

    /// Zero Hermitian band matrix.
    pub fn hermitian(n: usize, kd: usize) -> Self {
        Self::new(n, kd, Structure::Hermitian)
    }

    /// Number of super-diagonals.
    pub fn kd(&self) -> usize {
        self.kd
    }

    /// Symmetric or Hermitian.
    pub fn structure(&self) -> Structure {
        self.structure
    }

    fn offset(&self, i: usize, j: usize) -> usize {
        j * (self.kd + 1) + self.kd + i - j
    }
}

impl<T: LinalgScalar> GuardedStorage<T> for BandMatrix<T> {
    fn n(&self) -> usize {
        self.n
    }

    fn slot(&self, row: usize, col: usize) -> Slot<T> {
        if row.abs_diff(col) > self.kd {
            Slot::Fixed(T::zero())
        } else if row <= col {
            Slot::Direct(self.offset(row, col))
        } else {
            Slot::Mirrored(self.offset(col, row))
        }
    }

    fn mirror(&self, v: T) -> T {
        match self.structure {
            Structure::Hermitian => v.conj(),
            _ => v,
        }
    }

    fn storage(&self) -> &[T] {
        &self.data
    }

    fn storage_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}
