#![cfg(feature = "complex")]

use num_complex::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tridiag::linalg::{
    CholeskyLeastSquares, EigenDecomposition, EigenSolver, EigenSolverStrategy, LeastSquares,
    QrDecomposition, QrLeastSquares, SvdLeastSquares, TridiagonalDecomposition,
};
use tridiag::packed::{to_band_hermitian, to_hermitian};
use tridiag::{DynMatrix, DynVector, GuardedStorage, PackedMatrix};

type C = Complex<f64>;

fn c(re: f64, im: f64) -> C {
    Complex::new(re, im)
}

const TOL: f64 = 1e-10;

fn assert_complex_near(a: C, b: C, tol: f64, msg: &str) {
    assert!(
        (a.re - b.re).abs() < tol && (a.im - b.im).abs() < tol,
        "{}: {:?} vs {:?}",
        msg,
        a,
        b
    );
}

fn random_hermitian(rng: &mut StdRng, n: usize) -> DynMatrix<C> {
    let data: Vec<C> = (0..n * n)
        .map(|_| c(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();
    let a = DynMatrix::from_vec(n, n, data);
    DynMatrix::from_fn(n, n, |i, j| a[(i, j)] + a[(j, i)].conj())
}

fn check_reduction(a: &DynMatrix<C>, tri: &TridiagonalDecomposition<C>) {
    let q = tri.q().unwrap();
    let t = DynMatrix::from_real(&tri.to_matrix());
    let back = &(q * &t) * &q.adjoint();
    assert!(back.max_abs_diff(a) < TOL, "Q T Q^H != A");
    let n = a.nrows();
    assert!(q.adjoint_mul(q).max_abs_diff(&DynMatrix::eye(n)) < TOL, "Q not unitary");
    assert!(tri.off_diagonal().iter().all(|&e| e >= 0.0));
}

// ── Tridiagonal reduction ────────────────────────────────────────────

#[test]
fn hermitian_2x2_phase_is_folded_into_q() {
    let a = DynMatrix::from_rows(2, 2, &[c(2.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(2.0, 0.0)]);
    let tri = TridiagonalDecomposition::new(&a, true).unwrap();
    assert_eq!(tri.diagonal(), &[2.0, 2.0]);
    assert!((tri.off_diagonal()[0] - 1.0).abs() < TOL);
    // phase of the sub-diagonal lands in Q's second column
    assert_complex_near(tri.q().unwrap()[(1, 1)], c(0.0, 1.0), TOL, "Q[1,1]");
    check_reduction(&a, &tri);
}

#[test]
fn dense_hermitian_reduction() {
    let mut rng = StdRng::seed_from_u64(21);
    for n in [3, 5, 8] {
        let a = random_hermitian(&mut rng, n);
        let tri = TridiagonalDecomposition::new(&a, true).unwrap();
        check_reduction(&a, &tri);
    }
}

#[test]
fn packed_hermitian_reduction() {
    let mut rng = StdRng::seed_from_u64(22);
    let a = random_hermitian(&mut rng, 6);
    let tri = TridiagonalDecomposition::from_packed(&to_hermitian(&a), true);
    check_reduction(&a, &tri);
}

#[test]
fn banded_hermitian_reduction() {
    let mut rng = StdRng::seed_from_u64(23);
    for kd in [1, 2, 3] {
        let full = random_hermitian(&mut rng, 7);
        let a = DynMatrix::from_fn(7, 7, |i, j| {
            if i.abs_diff(j) <= kd { full[(i, j)] } else { C::default() }
        });
        let tri = TridiagonalDecomposition::banded(&to_band_hermitian(&a, kd), true);
        check_reduction(&a, &tri);
    }
}

#[test]
#[should_panic(expected = "Hermitian")]
fn complex_symmetric_storage_rejected() {
    let p = PackedMatrix::<C>::symmetric(3);
    let _ = TridiagonalDecomposition::from_packed(&p, false);
}

// ── Eigen-decomposition ─────────────────────────────────────────────

#[test]
fn hermitian_eigenpairs() {
    let mut rng = StdRng::seed_from_u64(31);
    let a = random_hermitian(&mut rng, 6);
    let eig = EigenDecomposition::new(&a, true).unwrap();
    assert!(eig.good());
    assert!(eig.eigenvalues().windows(2).all(|w| w[0] <= w[1]));

    let v = eig.eigenvectors();
    let av = &a * v;
    for j in 0..6 {
        let lambda = c(eig.eigenvalues()[j], 0.0);
        for i in 0..6 {
            assert_complex_near(av[(i, j)], lambda * v[(i, j)], 1e-9, "A v = lambda v");
        }
    }
    assert!(v.adjoint_mul(v).max_abs_diff(&DynMatrix::eye(6)) < 1e-9);

    // trace is the eigenvalue sum
    let sum: f64 = eig.eigenvalues().iter().sum();
    assert!((sum - a.trace().re).abs() < 1e-9);
}

#[test]
fn pauli_y_eigenvalues() {
    let a = DynMatrix::from_rows(2, 2, &[c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0)]);
    let vals = a.eigenvalues_hermitian().unwrap();
    assert!((vals[0] + 1.0).abs() < TOL);
    assert!((vals[1] - 1.0).abs() < TOL);
}

#[test]
fn packed_and_banded_agree_with_dense() {
    let mut rng = StdRng::seed_from_u64(32);
    let a = random_hermitian(&mut rng, 5);
    let dense = EigenDecomposition::new(&a, false).unwrap();
    let packed = EigenDecomposition::from_packed(&to_hermitian(&a), false).unwrap();
    let banded = EigenDecomposition::banded(&to_band_hermitian(&a, 4), false).unwrap();
    for i in 0..5 {
        assert!((dense.eigenvalues()[i] - packed.eigenvalues()[i]).abs() < 1e-9);
        assert!((dense.eigenvalues()[i] - banded.eigenvalues()[i]).abs() < 1e-9);
    }
}

#[test]
fn strategies_agree_on_hermitian_positive_definite() {
    let mut rng = StdRng::seed_from_u64(33);
    let n = 6;
    let data: Vec<C> = (0..n * n)
        .map(|_| c(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();
    let b = DynMatrix::from_vec(n, n, data);
    // B^H B + I is Hermitian positive definite
    let a = &b.adjoint_mul(&b) + &DynMatrix::eye(n);
    let tri = TridiagonalDecomposition::new(&a, true).unwrap();

    let solve = |strategy, vectors| {
        EigenDecomposition::with_solver(&tri, &EigenSolver::new(strategy, vectors)).unwrap()
    };
    let full = solve(EigenSolverStrategy::FullQr, true);
    let pd = solve(EigenSolverStrategy::PositiveDefinite, true);
    let rf = solve(EigenSolverStrategy::RootFree, false);
    assert!(full.good() && pd.good() && rf.good());

    for i in 0..n {
        let r = full.eigenvalues()[i];
        assert!((pd.eigenvalues()[i] - r).abs() < 1e-9 * r.max(1.0));
        assert!((rf.eigenvalues()[i] - r).abs() < 1e-9 * r.max(1.0));
    }

    // positive-definite vectors map back through the complex Q
    let v = pd.eigenvectors();
    let av = &a * v;
    for j in 0..n {
        let lambda = c(pd.eigenvalues()[j], 0.0);
        for i in 0..n {
            assert_complex_near(av[(i, j)], lambda * v[(i, j)], 1e-9, "A v = lambda v");
        }
    }
    assert!(v.adjoint_mul(v).max_abs_diff(&DynMatrix::eye(n)) < 1e-9);
}

#[test]
fn single_precision_hermitian() {
    type C32 = Complex<f32>;
    let a = DynMatrix::from_rows(2, 2, &[
        C32::new(2.0, 0.0), C32::new(0.0, -1.0),
        C32::new(0.0, 1.0), C32::new(2.0, 0.0),
    ]);
    let eig = EigenDecomposition::new(&a, true).unwrap();
    assert!(eig.good());
    assert!((eig.eigenvalues()[0] - 1.0).abs() < 1e-5);
    assert!((eig.eigenvalues()[1] - 3.0).abs() < 1e-5);

    let qr = QrDecomposition::new(&a).unwrap();
    assert!((&qr.q() * &qr.r()).max_abs_diff(&a) < 1e-5);
}

// ── Guarded Hermitian storage ───────────────────────────────────────

#[test]
fn hermitian_mirror_conjugates() {
    let mut h = PackedMatrix::<C>::hermitian(3);
    h.set(2, 0, c(1.0, 2.0)).unwrap();
    assert_eq!(h.get(0, 2), c(1.0, -2.0));
    assert_eq!(h.get(2, 0), c(1.0, 2.0));
    // diagonal is stored as written
    h.set(1, 1, c(3.0, 0.5)).unwrap();
    assert_eq!(h.get(1, 1), c(3.0, 0.5));
}

#[test]
fn hermitian_conversion_averages() {
    let a = DynMatrix::from_rows(2, 2, &[c(1.0, 1.0), c(2.0, 2.0), c(4.0, 0.0), c(3.0, -1.0)]);
    let h = to_hermitian(&a);
    assert_eq!(h.get(0, 0), c(1.0, 0.0));
    // (a01 + conj(a10)) / 2
    assert_eq!(h.get(0, 1), c(3.0, 1.0));
    assert_eq!(h.get(1, 0), c(3.0, -1.0));
    assert!(h.to_dense().is_hermitian(0.0));
}

// ── QR and least squares ────────────────────────────────────────────

#[test]
fn complex_qr_round_trip() {
    let a = DynMatrix::from_rows(3, 2, &[
        c(1.0, 1.0), c(2.0, -1.0),
        c(0.0, 2.0), c(1.0, 0.0),
        c(3.0, 0.0), c(0.0, -1.0),
    ]);
    let qr = QrDecomposition::new(&a).unwrap();
    assert!((&qr.q() * &qr.r()).max_abs_diff(&a) < TOL);

    let pqr = QrDecomposition::with_pivoting(&a).unwrap();
    let ap = &a * &pqr.permutation_matrix();
    assert!((&pqr.q() * &pqr.r()).max_abs_diff(&ap) < TOL);
}

#[test]
fn complex_least_squares_agree() {
    let a = DynMatrix::from_rows(4, 2, &[
        c(1.0, 0.0), c(0.0, 1.0),
        c(1.0, 1.0), c(2.0, 0.0),
        c(0.0, -1.0), c(1.0, -1.0),
        c(2.0, 0.5), c(0.5, 0.0),
    ]);
    let b = DynVector::from_slice(&[c(1.0, 0.0), c(0.0, 2.0), c(-1.0, 1.0), c(3.0, 0.0)]);

    let chol = CholeskyLeastSquares::new(&a);
    let qr = QrLeastSquares::new(&a).unwrap();
    let svd = SvdLeastSquares::new(&a);
    let x1 = chol.solve(&b).unwrap();
    let x2 = qr.solve(&b).unwrap();
    let x3 = svd.solve(&b).unwrap();
    for i in 0..2 {
        assert_complex_near(x1[i], x2[i], 1e-9, "cholesky vs qr");
        assert_complex_near(x2[i], x3[i], 1e-9, "qr vs svd");
    }

    // normal equations hold: A^H r = 0
    let r = qr.residual(&b).unwrap();
    assert!(a.adjoint_mul_vec(&r).norm() < 1e-9);
    assert!((qr.residual_norm(&b).unwrap() - r.norm()).abs() < 1e-9);
}
