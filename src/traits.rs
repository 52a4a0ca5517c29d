use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

#[cfg(feature = "complex")]
use num_complex::Complex;

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for real floating-point elements.
///
/// This is the "norm type" of every field: eigenvalues, singular values,
/// norms and tolerances are always expressed in a `FloatScalar`.
/// Implies `LinalgScalar<Real = Self>` since real floats are their own real type.
pub trait FloatScalar: Scalar + Float + LinalgScalar<Real = Self> {}

impl<T: Scalar + Float + LinalgScalar<Real = T>> FloatScalar for T {}

/// Field capabilities shared by every decomposition.
///
/// Covers real floats (`f32`, `f64`) and complex numbers (`Complex<f32>`,
/// `Complex<f64>`). Algorithms are written once against this trait; the
/// handful of operations that differ between real and complex fields
/// (conjugation, real part, the associated norm type) dispatch here.
pub trait LinalgScalar: Scalar {
    /// The norm type (`Self` for reals, `T` for `Complex<T>`).
    type Real: FloatScalar;

    /// Absolute value / modulus: `|z|` for complex, `.abs()` for real.
    fn modulus(self) -> Self::Real;

    /// Squared modulus `z * conj(z)`, without a square root.
    fn abs_sq(self) -> Self::Real;

    /// Complex conjugate (identity for reals).
    fn conj(self) -> Self;

    /// Real part.
    fn re(self) -> Self::Real;

    /// Square root.
    fn lsqrt(self) -> Self;

    /// Machine epsilon of the underlying real type.
    fn lepsilon() -> Self::Real;

    /// Promote a real value into `Self`.
    fn from_real(r: Self::Real) -> Self;

    /// Whether the field carries an imaginary part.
    fn is_complex() -> bool;
}

/// Concrete impls for real floats: trivial delegation.
macro_rules! impl_linalg_scalar_real {
    ($($t:ty),*) => {
        $(
            impl LinalgScalar for $t {
                type Real = $t;

                #[inline] fn modulus(self) -> $t { Float::abs(self) }
                #[inline] fn abs_sq(self) -> $t { self * self }
                #[inline] fn conj(self) -> $t { self }
                #[inline] fn re(self) -> $t { self }
                #[inline] fn lsqrt(self) -> $t { Float::sqrt(self) }
                #[inline] fn lepsilon() -> $t { <$t as Float>::epsilon() }
                #[inline] fn from_real(r: $t) -> $t { r }
                #[inline] fn is_complex() -> bool { false }
            }
        )*
    };
}

impl_linalg_scalar_real!(f32, f64);

#[cfg(feature = "complex")]
impl<T: FloatScalar> LinalgScalar for Complex<T> {
    type Real = T;

    #[inline]
    fn modulus(self) -> T {
        self.norm()
    }

    #[inline]
    fn abs_sq(self) -> T {
        self.norm_sqr()
    }

    #[inline]
    fn conj(self) -> Self {
        Complex::conj(&self)
    }

    #[inline]
    fn re(self) -> T {
        self.re
    }

    #[inline]
    fn lsqrt(self) -> Self {
        self.sqrt()
    }

    #[inline]
    fn lepsilon() -> T {
        T::epsilon()
    }

    #[inline]
    fn from_real(r: T) -> Self {
        Complex::new(r, T::zero())
    }

    #[inline]
    fn is_complex() -> bool {
        true
    }
}

/// Unit-modulus phase `z / |z|`, or one when `z` is zero.
#[inline]
pub(crate) fn phase<T: LinalgScalar>(z: T) -> T {
    let m = z.modulus();
    if m == <T::Real as Zero>::zero() {
        T::one()
    } else {
        z / T::from_real(m)
    }
}

/// Read-only access to a matrix-like type.
///
/// Storage is column-major, so a column tail is always a contiguous slice.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;

    /// Column `col` from `row_start` to the last row.
    fn col_as_slice(&self, col: usize, row_start: usize) -> &[T];
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling
/// in-place algorithms (Cholesky, QR, etc.) to work generically.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// Mutable column `col` from `row_start` to the last row.
    fn col_as_mut_slice(&mut self, col: usize, row_start: usize) -> &mut [T];
}
