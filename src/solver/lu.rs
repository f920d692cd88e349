//! Dense LU factorization with partial pivoting
use super::{Solve, SolverScalar};
use crate::error::{Error, Result};
use ndarray::prelude::*;
use ndarray::{Data, DataMut, RemoveAxis, Zip};

/// LU decomposition P A = L U of a square real matrix.
///
/// L (unit lower) and U are stored in one array.
#[derive(Debug, Clone)]
pub struct Lu {
    /// Size of matrix
    pub n: usize,
    lu: Array2<f64>,
    piv: Vec<usize>,
}

impl Lu {
    /// Factorize matrix
    ///
    /// # Errors
    /// Returns [`Error::SingularMatrix`] if a pivot vanishes.
    ///
    /// # Panics
    /// Panics if the matrix is not square.
    pub fn from_matrix(a: &Array2<f64>) -> Result<Self> {
        assert!(
            a.is_square(),
            "Array for LU must be square, but has shape {:?}",
            a.shape()
        );
        let n = a.shape()[0];
        let mut lu = a.to_owned();
        let mut piv: Vec<usize> = (0..n).collect();
        let scale = lu.iter().fold(0_f64, |m, v| m.max(v.abs()));
        for k in 0..n {
            // Pivot row
            let mut p = k;
            let mut max = lu[[k, k]].abs();
            for i in k + 1..n {
                if lu[[i, k]].abs() > max {
                    max = lu[[i, k]].abs();
                    p = i;
                }
            }
            if max <= f64::EPSILON * scale || !max.is_finite() {
                return Err(Error::SingularMatrix { row: k });
            }
            if p != k {
                piv.swap(p, k);
                for j in 0..n {
                    lu.swap([p, j], [k, j]);
                }
            }
            // Eliminate below
            let pivot = lu[[k, k]];
            for i in k + 1..n {
                let l = lu[[i, k]] / pivot;
                lu[[i, k]] = l;
                if l != 0. {
                    for j in k + 1..n {
                        lu[[i, j]] -= l * lu[[k, j]];
                    }
                }
            }
        }
        Ok(Lu { n, lu, piv })
    }

    /// Solve A x = b for a single lane, in place
    fn solve_lane<A: SolverScalar>(&self, b: &mut ArrayViewMut1<A>) {
        let n = self.n;
        let mut x: Vec<A> = self.piv.iter().map(|&p| b[p]).collect();
        // Forward substitution (unit lower)
        for i in 0..n {
            for j in 0..i {
                let l = self.lu[[i, j]];
                if l != 0. {
                    let xj = x[j];
                    x[i] -= xj * l;
                }
            }
        }
        // Back substitution
        for i in (0..n).rev() {
            for j in i + 1..n {
                let xj = x[j];
                x[i] -= xj * self.lu[[i, j]];
            }
            x[i] = x[i] / self.lu[[i, i]];
        }
        for (bi, xi) in b.iter_mut().zip(x.into_iter()) {
            *bi = xi;
        }
    }
}

impl<A, D> Solve<A, D> for Lu
where
    A: SolverScalar,
    D: Dimension + RemoveAxis,
{
    fn solve<S1, S2>(&self, input: &ArrayBase<S1, D>, output: &mut ArrayBase<S2, D>, axis: usize)
    where
        S1: Data<Elem = A>,
        S2: Data<Elem = A> + DataMut,
    {
        output.assign(input);
        Zip::from(output.lanes_mut(Axis(axis))).for_each(|mut out| {
            self.solve_lane(&mut out);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;

    fn approx_eq<S, D>(result: &ArrayBase<S, D>, expected: &ArrayBase<S, D>)
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let dif = 1e-10;
        for (a, b) in expected.iter().zip(result.iter()) {
            if (a - b).abs() > dif {
                panic!("Large difference of values, got {} expected {}.", b, a)
            }
        }
    }

    fn test_matrix(n: usize) -> Array2<f64> {
        let mut matrix = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in 0..n {
                matrix[[i, j]] = 1. / (1. + (i as f64 - j as f64).abs()) + (i * j) as f64 * 0.01;
            }
        }
        // zero leading pivot forces a row swap
        matrix[[0, 0]] = 0.;
        matrix
    }

    #[test]
    fn test_lu_dim1() {
        let nx = 7;
        let matrix = test_matrix(nx);
        let data = Array1::from_iter((0..nx).map(|i| i as f64 - 2.));
        let mut result = Array1::<f64>::zeros(nx);
        let solver = Lu::from_matrix(&matrix).unwrap();
        solver.solve(&data, &mut result, 0);
        let recover: Array1<f64> = matrix.dot(&result);
        approx_eq(&recover, &data);
    }

    #[test]
    fn test_lu_dim2_complex_axis1() {
        let (nx, ny) = (3, 6);
        let matrix = test_matrix(ny);
        let mut data = Array2::<Complex<f64>>::zeros((nx, ny));
        for (i, v) in data.iter_mut().enumerate() {
            v.re = i as f64;
            v.im = 1. - i as f64 * 0.5;
        }
        let mut result = Array2::<Complex<f64>>::zeros((nx, ny));
        let solver = Lu::from_matrix(&matrix).unwrap();
        solver.solve(&data, &mut result, 1);
        for (row_in, row_out) in data.outer_iter().zip(result.outer_iter()) {
            let re = matrix.dot(&row_out.mapv(|v| v.re));
            let im = matrix.dot(&row_out.mapv(|v| v.im));
            approx_eq(&re, &row_in.mapv(|v| v.re));
            approx_eq(&im, &row_in.mapv(|v| v.im));
        }
    }

    #[test]
    fn test_lu_singular() {
        let mut matrix = Array2::<f64>::eye(4);
        matrix[[2, 2]] = 0.;
        assert!(matches!(
            Lu::from_matrix(&matrix),
            Err(Error::SingularMatrix { row: 2 })
        ));
    }
}
