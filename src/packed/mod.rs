//! Packed storage for structured square matrices.
//!
//! Only the independent entries are stored. Every element of the logical
//! n × n matrix still has an address, resolved through a [`Slot`]: it is
//! either a stored cell, a mirror of a stored cell, or a structural
//! constant. Reads through [`GuardedStorage::get`] apply the mirror rule;
//! writes through [`GuardedStorage::set`] store the mirrored value in the
//! canonical cell and reject attempts to change a constant.
//!
//! ```
//! use tridiag::packed::{GuardedStorage, PackedMatrix, StorageError};
//!
//! let mut s = PackedMatrix::<f64>::skew(3);
//! s.set(2, 0, 1.5).unwrap();
//! assert_eq!(s.get(0, 2), -1.5);
//! assert_eq!(s.get(1, 1), 0.0);
//! assert!(matches!(s.set(1, 1, 2.0), Err(StorageError::FixedConstant { .. })));
//! ```

mod band;
mod convert;
mod square;
mod triangular;

pub use band::BandMatrix;
pub use convert::{
    to_band_hermitian, to_band_symmetric, to_hermitian, to_lower_triangular, to_skew, to_symmetric,
    to_upper_triangular,
};
pub use square::PackedMatrix;
pub use triangular::TriangularMatrix;

use core::fmt;

use crate::dynmatrix::DynMatrix;
use crate::traits::LinalgScalar;

/// Symmetry class of a packed square matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    /// `A[j, i] = A[i, j]`.
    Symmetric,
    /// `A[j, i] = conj(A[i, j])`.
    Hermitian,
    /// `A[j, i] = -A[i, j]`, zero diagonal.
    Skew,
}

/// Which triangle of a triangular matrix is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Triangle {
    Upper,
    Lower,
}

/// Rejected element write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StorageError<T> {
    /// Attempted change of a structural constant.
    FixedConstant {
        row: usize,
        col: usize,
        attempted: T,
        fixed: T,
    },
    /// Index outside the matrix.
    OutOfRange {
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },
}

impl<T: fmt::Debug> fmt::Display for StorageError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::FixedConstant {
                row,
                col,
                attempted,
                fixed,
            } => write!(
                f,
                "attempted change of a fixed constant at ({}, {}): {:?} -> {:?}",
                row, col, fixed, attempted
            ),
            StorageError::OutOfRange {
                row,
                col,
                nrows,
                ncols,
            } => write!(
                f,
                "index ({}, {}) out of range for {}x{} matrix",
                row, col, nrows, ncols
            ),
        }
    }
}

#[cfg(feature = "std")]
impl<T: fmt::Debug> std::error::Error for StorageError<T> {}

/// Where a logical element lives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<T> {
    /// Stored as-is at this offset.
    Direct(usize),
    /// Stored at this offset through the mirror rule.
    Mirrored(usize),
    /// Structural constant; not stored.
    Fixed(T),
}

/// Element access for packed storage.
///
/// Implementors describe their layout with [`slot`](Self::slot) and their
/// mirror rule with [`mirror`](Self::mirror); reads, guarded writes and
/// expansion to a dense matrix are provided.
pub trait GuardedStorage<T: LinalgScalar> {
    /// Order of the logical square matrix.
    fn n(&self) -> usize;

    /// Address of element `(row, col)`. Only called with in-range indices.
    fn slot(&self, row: usize, col: usize) -> Slot<T>;

    /// Value seen in a mirrored cell for canonical value `v`. Must be an
    /// involution.
    fn mirror(&self, v: T) -> T;

    fn storage(&self) -> &[T];

    fn storage_mut(&mut self) -> &mut [T];

    /// Element `(row, col)`.
    ///
    /// Panics if the index is out of range.
    fn get(&self, row: usize, col: usize) -> T {
        let n = self.n();
        assert!(
            row < n && col < n,
            "index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            n,
            n
        );
        match self.slot(row, col) {
            Slot::Direct(k) => self.storage()[k],
            Slot::Mirrored(k) => self.mirror(self.storage()[k]),
            Slot::Fixed(v) => v,
        }
    }

    /// Write element `(row, col)`.
    ///
    /// Writing a structural constant's own value is a no-op; any other
    /// value is rejected and storage is left unchanged.
    fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), StorageError<T>> {
        let n = self.n();
        if row >= n || col >= n {
            return Err(StorageError::OutOfRange {
                row,
                col,
                nrows: n,
                ncols: n,
            });
        }
        match self.slot(row, col) {
            Slot::Direct(k) => self.storage_mut()[k] = value,
            Slot::Mirrored(k) => {
                let v = self.mirror(value);
                self.storage_mut()[k] = v;
            }
            Slot::Fixed(fixed) => {
                if value != fixed {
                    return Err(StorageError::FixedConstant {
                        row,
                        col,
                        attempted: value,
                        fixed,
                    });
                }
            }
        }
        Ok(())
    }

    /// Expand to a dense n × n matrix.
    fn to_dense(&self) -> DynMatrix<T> {
        let n = self.n();
        DynMatrix::from_fn(n, n, |i, j| self.get(i, j))
    }
}

/// Offset of `(i, j)`, `i <= j`, in column-major upper packed storage.
#[inline]
pub(crate) fn upper_index(i: usize, j: usize) -> usize {
    j * (j + 1) / 2 + i
}
