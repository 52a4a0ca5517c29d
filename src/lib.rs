//! # tridiag
//!
//! Pure-Rust eigen-decomposition of symmetric and Hermitian matrices, with
//! the QR, SVD and least-squares machinery around it. no-std compatible
//! (heap allocation through `alloc`).
//!
//! ## Quick start
//!
//! ```
//! use tridiag::DynMatrix;
//! use tridiag::linalg::{
//!     EigenDecomposition, EigenSolver, EigenSolverStrategy, TridiagonalDecomposition,
//! };
//!
//! let a = DynMatrix::from_rows(3, 3, &[
//!     2.0_f64, -1.0, 0.0,
//!     -1.0, 2.0, -1.0,
//!     0.0, -1.0, 2.0,
//! ]);
//!
//! // default: full QR iteration with eigenvectors
//! let eig = EigenDecomposition::new(&a, true).unwrap();
//! assert!(eig.good());
//!
//! // or pick a strategy for the tridiagonal problem
//! let tri = TridiagonalDecomposition::new(&a, true).unwrap();
//! let solver = EigenSolver::new(EigenSolverStrategy::PositiveDefinite, true);
//! let pd = EigenDecomposition::with_solver(&tri, &solver).unwrap();
//! assert!((pd.eigenvalues()[1] - eig.eigenvalues()[1]).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`dynmatrix`]: Heap-allocated `DynMatrix<T>` with runtime dimensions,
//!   column-major `Vec<T>` storage. Implements [`MatrixRef`] / [`MatrixMut`],
//!   so all linalg free functions work on it. [`DynVector<T>`] newtype for
//!   single-index vector access.
//!
//! - [`linalg`]: Tridiagonal reduction (dense Householder, banded Givens),
//!   tridiagonal eigensolvers (full QR, root-free QL, positive-definite via
//!   bidiagonal SVD), the [`linalg::EigenDecomposition`] orchestrator,
//!   Householder QR with optional column pivoting, SVD, Cholesky, and three
//!   least-squares solvers behind the [`linalg::LeastSquares`] trait.
//!
//! - [`packed`]: Packed symmetric / Hermitian / skew, triangular and band
//!   storage with guarded `get` / `set` and conversions from dense matrices.
//!
//! - [`traits`]: Element trait hierarchy:
//!   - [`Scalar`]: all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`]: real floats; eigenvalues and norms live here
//!   - [`LinalgScalar`]: real floats and complex numbers, used by decompositions and norms
//!   - [`MatrixRef`] / [`MatrixMut`]: generic read/write access for algorithms
//!
//! ## Convergence
//!
//! Eigensolvers never return an error for non-convergence. Results carry
//! `computed_all` / `accurate` flags, surfaced as `good()`, `inaccurate()`
//! and `fail()`, and keep whatever eigenpairs did converge.
//!
//! ## Logging
//!
//! Diagnostics (solver stalls, rank deficiency, pivoting) go through the
//! [`log`](https://docs.rs/log) facade. No logger is installed.
//!
//! ## Complex matrices
//!
//! Enable the `complex` feature to use `Complex<f32>` / `Complex<f64>`.
//! Hermitian input reduces to a *real* tridiagonal matrix; the phases are
//! folded into `Q`, so eigenvalues are always real.
//!
//! ## Cargo features
//!
//! | Feature   | Default  | Description |
//! |-----------|----------|-------------|
//! | `std`     | yes      | Hardware FPU via system libm, `std::error::Error` impls |
//! | `libm`    | no       | Pure-Rust software float fallback for no-std |
//! | `complex` | yes      | `Complex<f32>` / `Complex<f64>` support via `num-complex` |
//! | `all`     | no       | All features: `std` + `complex` |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod dynmatrix;
pub mod linalg;
pub mod packed;
pub mod traits;

pub use dynmatrix::{DynMatrix, DynMatrixf32, DynMatrixf64, DynVector, DynVectorf32, DynVectorf64};
#[cfg(feature = "complex")]
pub use dynmatrix::{DynMatrixz32, DynMatrixz64, DynVectorz32, DynVectorz64};
pub use linalg::LinalgError;
pub use packed::{BandMatrix, GuardedStorage, PackedMatrix, StorageError, TriangularMatrix};
pub use traits::{FloatScalar, LinalgScalar, MatrixMut, MatrixRef, Scalar};

#[cfg(feature = "complex")]
pub use num_complex::Complex;
