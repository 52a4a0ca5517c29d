//! Pre-defined type aliases for the supported `DynMatrix` and `DynVector` fields.

use super::{DynMatrix, DynVector};

/// Dynamic matrix with `f32` elements.
pub type DynMatrixf32 = DynMatrix<f32>;
/// Dynamic matrix with `f64` elements.
pub type DynMatrixf64 = DynMatrix<f64>;

/// Dynamic vector with `f32` elements.
pub type DynVectorf32 = DynVector<f32>;
/// Dynamic vector with `f64` elements.
pub type DynVectorf64 = DynVector<f64>;

// ── Complex aliases (behind `complex` feature) ──────────────────────

/// Dynamic matrix with `Complex<f32>` elements.
#[cfg(feature = "complex")]
pub type DynMatrixz32 = DynMatrix<num_complex::Complex<f32>>;
/// Dynamic matrix with `Complex<f64>` elements.
#[cfg(feature = "complex")]
pub type DynMatrixz64 = DynMatrix<num_complex::Complex<f64>>;

/// Dynamic vector with `Complex<f32>` elements.
#[cfg(feature = "complex")]
pub type DynVectorz32 = DynVector<num_complex::Complex<f32>>;
/// Dynamic vector with `Complex<f64>` elements.
#[cfg(feature = "complex")]
pub type DynVectorz64 = DynVector<num_complex::Complex<f64>>;
