use alloc::vec;
use core::ops::{Add, Mul, Neg, Sub};

use crate::traits::{LinalgScalar, Scalar};

use super::vector::DynVector;
use super::DynMatrix;

// ── Element-wise addition / subtraction ─────────────────────────────

impl<T: Scalar> Add<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn add(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(
            (self.nrows, self.ncols),
            (rhs.nrows, rhs.ncols),
            "dimension mismatch: {}x{} + {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(&a, &b)| a + b)
            .collect();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T: Scalar> Sub<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn sub(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(
            (self.nrows, self.ncols),
            (rhs.nrows, rhs.ncols),
            "dimension mismatch: {}x{} - {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(&a, &b)| a - b)
            .collect();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T: Scalar> Neg for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn neg(self) -> DynMatrix<T> {
        let data = self.data.iter().map(|&x| T::zero() - x).collect();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T: Scalar> Sub<&DynVector<T>> for &DynVector<T> {
    type Output = DynVector<T>;

    fn sub(self, rhs: &DynVector<T>) -> DynVector<T> {
        assert_eq!(
            self.len(),
            rhs.len(),
            "dimension mismatch: {} - {}",
            self.len(),
            rhs.len()
        );
        let data = self
            .as_slice()
            .iter()
            .zip(rhs.as_slice().iter())
            .map(|(&a, &b)| a - b)
            .collect();
        DynVector::from_vec(data)
    }
}

// ── Matrix multiplication: (M×N) * (N×P) → (M×P) ──────────────────

impl<T: Scalar> Mul<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(
            self.ncols, rhs.nrows,
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let m = self.nrows;
        let n = self.ncols;
        let p = rhs.ncols;
        let mut data = vec![T::zero(); m * p];
        // Column-major axpy form: C[:, j] += A[:, k] * B[k, j]
        for j in 0..p {
            for k in 0..n {
                let b_kj = rhs.data[j * n + k];
                if b_kj == T::zero() {
                    continue;
                }
                let a_col = &self.data[k * m..(k + 1) * m];
                let c_col = &mut data[j * m..(j + 1) * m];
                for (c, &a) in c_col.iter_mut().zip(a_col.iter()) {
                    *c = *c + a * b_kj;
                }
            }
        }
        DynMatrix {
            data,
            nrows: m,
            ncols: p,
        }
    }
}

impl<T: Scalar> Mul for DynMatrix<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

// ── Matrix * vector ─────────────────────────────────────────────────

impl<T: Scalar> Mul<&DynVector<T>> for &DynMatrix<T> {
    type Output = DynVector<T>;

    fn mul(self, rhs: &DynVector<T>) -> DynVector<T> {
        assert_eq!(
            self.ncols,
            rhs.len(),
            "dimension mismatch: {}x{} * {}",
            self.nrows, self.ncols, rhs.len(),
        );
        let m = self.nrows;
        let mut out = vec![T::zero(); m];
        for k in 0..self.ncols {
            let x = rhs[k];
            let a_col = &self.data[k * m..(k + 1) * m];
            for (o, &a) in out.iter_mut().zip(a_col.iter()) {
                *o = *o + a * x;
            }
        }
        DynVector::from_vec(out)
    }
}

// ── Scalar multiplication: matrix * scalar ──────────────────────────

impl<T: Scalar> Mul<T> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: T) -> DynMatrix<T> {
        let data = self.data.iter().map(|&x| x * rhs).collect();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

// ── Transpose / adjoint ─────────────────────────────────────────────

impl<T: Copy> DynMatrix<T> {
    /// Transpose: (M×N) → (N×M).
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let t = a.transpose();
    /// assert_eq!(t.nrows(), 3);
    /// assert_eq!(t[(1, 0)], 2.0);
    /// ```
    pub fn transpose(&self) -> Self {
        DynMatrix::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)])
    }
}

impl<T: LinalgScalar> DynMatrix<T> {
    /// Conjugate transpose `A^H` (plain transpose for real fields).
    pub fn adjoint(&self) -> Self {
        DynMatrix::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)].conj())
    }

    /// `A^H * B` without materializing the adjoint.
    pub fn adjoint_mul(&self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(
            self.nrows, rhs.nrows,
            "dimension mismatch: ({}x{})^H * {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let m = self.nrows;
        DynMatrix::from_fn(self.ncols, rhs.ncols, |i, j| {
            let a = &self.data[i * m..(i + 1) * m];
            let b = &rhs.data[j * m..(j + 1) * m];
            let mut sum = T::zero();
            for (&x, &y) in a.iter().zip(b.iter()) {
                sum = sum + x.conj() * y;
            }
            sum
        })
    }

    /// `A^H * x` without materializing the adjoint.
    pub fn adjoint_mul_vec(&self, x: &DynVector<T>) -> DynVector<T> {
        assert_eq!(
            self.nrows,
            x.len(),
            "dimension mismatch: ({}x{})^H * {}",
            self.nrows, self.ncols, x.len(),
        );
        let m = self.nrows;
        let data = (0..self.ncols)
            .map(|j| {
                let a = &self.data[j * m..(j + 1) * m];
                let mut sum = T::zero();
                for (&aij, &xi) in a.iter().zip(x.as_slice().iter()) {
                    sum = sum + aij.conj() * xi;
                }
                sum
            })
            .collect();
        DynVector::from_vec(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub() {
        let a = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = DynMatrix::from_rows(2, 2, &[5.0, 6.0, 7.0, 8.0]);

        let c = &a + &b;
        assert_eq!(c[(0, 0)], 6.0);
        assert_eq!(c[(1, 1)], 12.0);

        let d = &b - &a;
        assert_eq!(d[(0, 1)], 4.0);
        assert_eq!((-&d)[(1, 0)], -4.0);
    }

    #[test]
    fn matrix_multiply() {
        let a = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = DynMatrix::from_rows(2, 2, &[5.0, 6.0, 7.0, 8.0]);
        let c = &a * &b;
        assert_eq!(c[(0, 0)], 19.0);
        assert_eq!(c[(0, 1)], 22.0);
        assert_eq!(c[(1, 0)], 43.0);
        assert_eq!(c[(1, 1)], 50.0);
    }

    #[test]
    fn matrix_multiply_non_square() {
        let a = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = DynMatrix::from_rows(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let c = &a * &b;
        assert_eq!((c.nrows(), c.ncols()), (2, 2));
        assert_eq!(c[(0, 0)], 58.0);
        assert_eq!(c[(0, 1)], 64.0);
        assert_eq!(c[(1, 1)], 154.0);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn multiply_dim_mismatch() {
        let a = DynMatrix::<f64>::zeros(2, 3);
        let b = DynMatrix::<f64>::zeros(2, 2);
        let _ = &a * &b;
    }

    #[test]
    fn matrix_vector() {
        let a = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let x = DynVector::from_slice(&[1.0, 0.0, -1.0]);
        let y = &a * &x;
        assert_eq!(y.as_slice(), &[-2.0, -2.0]);
        let z = a.adjoint_mul_vec(&y);
        assert_eq!(z.as_slice(), &[-10.0, -14.0, -18.0]);
    }

    #[test]
    fn adjoint_mul_matches_explicit() {
        let a = DynMatrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let ata = a.adjoint_mul(&a);
        let explicit = &a.transpose() * &a;
        assert_eq!(ata, explicit);
    }

    #[test]
    fn vector_sub() {
        let a = DynVector::from_slice(&[3.0, 2.0]);
        let b = DynVector::from_slice(&[1.0, 5.0]);
        assert_eq!((&a - &b).as_slice(), &[2.0, -3.0]);
    }

    #[test]
    fn identity_multiply() {
        let a = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let id = DynMatrix::<f64>::eye(2);
        assert_eq!(&a * &id, a);
        assert_eq!(&id * &a, a);
    }
}
