//! Matrix/vector products of real operators with real or complex data
use super::SolverScalar;
use ndarray::prelude::*;
use ndarray::Data;

/// Multiply real matrix with a vector, y = M x
pub fn matvec<A, S>(mat: &Array2<f64>, x: &ArrayBase<S, Ix1>) -> Array1<A>
where
    A: SolverScalar,
    S: Data<Elem = A>,
{
    assert!(
        mat.shape()[1] == x.len(),
        "Size mismatch in matvec, got {} expected {}",
        x.len(),
        mat.shape()[1]
    );
    let mut y = Array1::<A>::zeros(mat.shape()[0]);
    for (yi, row) in y.iter_mut().zip(mat.outer_iter()) {
        let mut acc = A::zero();
        for (m, xj) in row.iter().zip(x.iter()) {
            if *m != 0. {
                acc = acc + *xj * *m;
            }
        }
        *yi = acc;
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;

    #[test]
    fn test_matvec_complex() {
        let mat = array![[1., 2.], [0., -1.], [3., 0.5]];
        let x = array![Complex::new(1., 1.), Complex::new(2., -1.)];
        let y = matvec(&mat, &x);
        assert_eq!(y.len(), 3);
        assert!((y[0] - Complex::new(5., -1.)).norm() < 1e-14);
        assert!((y[1] - Complex::new(-2., 1.)).norm() < 1e-14);
        assert!((y[2] - Complex::new(4., 2.5)).norm() < 1e-14);
    }
}
