//! # Chebyshev
//! Collocation on the Chebyshev-Gauss-Lobatto points of an interval [a, b].
//!
//! Data lives on the grid points, derivatives are applied with the spectral
//! differentiation matrix. Chebyshev coefficients are obtained by a
//! discrete cosine transform of type 1, they are needed when data is moved
//! between resolutions.
//!
//! In the context of fluid simulations, chebyshev polynomials are especially
//! usefull for wall bounded flows.
use super::BaseBasics;
use ndarray::prelude::*;
use ndarray::Data;
use ndrustfft::{nddct1_par as nddct1, DctHandler};
use num_complex::Complex;
use std::f64::consts::PI;

/// # Chebyshev collocation basis
pub struct Chebyshev {
    /// Number of grid points
    pub n: usize,
    /// Grid points in physical space, ascending from a to b
    pub x: Array1<f64>,
    interval: (f64, f64),
    /// First derivative matrix, acts on grid values
    dmat: Array2<f64>,
    /// Transposed derivative matrix for complex data along axis 1
    dmat_t: Array2<Complex<f64>>,
    /// Clenshaw-Curtis quadrature weights
    weights: Array1<f64>,
    dct_handler: DctHandler<f64>,
    /// (-1)^i, the nodes ascend while the dct assumes descending order
    correct_dct: Array1<f64>,
}

impl Clone for Chebyshev {
    fn clone(&self) -> Self {
        Chebyshev::new(self.n, self.interval)
    }
}

impl Chebyshev {
    /// Creates a new Basis.
    ///
    /// # Arguments
    /// * `n` - Number of grid points (at least 2), see
    /// [`crate::problem::Boussinesq2D::from_config`] for validated sizes
    /// * `interval` - (a, b)
    ///
    /// # Examples
    /// ```
    /// use rbc_quickstart::bases::Chebyshev;
    /// let cheby = Chebyshev::new(10, (-0.5, 0.5));
    /// assert!((cheby.x[0] + 0.5).abs() < 1e-12);
    /// ```
    pub fn new(n: usize, interval: (f64, f64)) -> Self {
        let (a, b) = interval;
        let scale = (b - a) / 2.;
        let nodes = Self::nodes_2nd_kind(n);
        let x = nodes.mapv(|xi| a + (xi + 1.) * scale);
        let dmat = Self::differentiation_matrix(&nodes) / scale;
        let dmat_t = dmat.t().mapv(|v| Complex::new(v, 0.));
        let weights = Self::clenshaw_curtis(n) * scale;
        let correct_dct = Array1::from_iter((0..n).map(|i| if i % 2 == 0 { 1. } else { -1. }));
        Chebyshev {
            n,
            x,
            interval,
            dmat,
            dmat_t,
            weights,
            dct_handler: DctHandler::new(n),
            correct_dct,
        }
    }

    /// Chebyshev nodes of the second kind, includes -1 and 1
    fn nodes_2nd_kind(n: usize) -> Array1<f64> {
        let m = (n - 1) as f64;
        let mut grid = Array1::zeros(n);
        for (k, x) in grid.iter_mut().enumerate() {
            let arg = PI * (m - 2. * k as f64) / (2. * m);
            *x = -arg.sin();
        }
        grid
    }

    /// Spectral differentiation matrix on the nodes of [-1, 1].
    ///
    /// Off-diagonals from the closed form, the diagonal from the negative
    /// row sum, which keeps derivatives of constants exactly zero.
    fn differentiation_matrix(nodes: &Array1<f64>) -> Array2<f64> {
        let n = nodes.len();
        let c = |i: usize| if i == 0 || i == n - 1 { 2. } else { 1. };
        let mut dmat = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let sign = if (i + j) % 2 == 0 { 1. } else { -1. };
                    dmat[[i, j]] = c(i) / c(j) * sign / (nodes[i] - nodes[j]);
                }
            }
            let row_sum: f64 = dmat.row(i).sum();
            dmat[[i, i]] = -row_sum;
        }
        dmat
    }

    /// Clenshaw-Curtis weights on [-1, 1]
    fn clenshaw_curtis(n: usize) -> Array1<f64> {
        let m = n - 1;
        let mut weights = Array1::<f64>::zeros(n);
        if m == 1 {
            weights.fill(1.);
            return weights;
        }
        let mf = m as f64;
        let edge = if m % 2 == 0 {
            1. / (mf * mf - 1.)
        } else {
            1. / (mf * mf)
        };
        weights[0] = edge;
        weights[m] = edge;
        for i in 1..m {
            let theta = PI * i as f64 / mf;
            let mut v = 1.;
            if m % 2 == 0 {
                for k in 1..m / 2 {
                    let kf = k as f64;
                    v -= 2. * (2. * kf * theta).cos() / (4. * kf * kf - 1.);
                }
                v -= (mf * theta).cos() / (mf * mf - 1.);
            } else {
                for k in 1..=(m - 1) / 2 {
                    let kf = k as f64;
                    v -= 2. * (2. * kf * theta).cos() / (4. * kf * kf - 1.);
                }
            }
            weights[i] = 2. * v / mf;
        }
        weights
    }

    /// First derivative matrix on the physical interval
    pub fn dmat(&self) -> &Array2<f64> {
        &self.dmat
    }

    /// Quadrature weights on the physical interval
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Transform: grid values --> chebyshev coefficients along axis
    pub fn forward<S>(&mut self, input: &ArrayBase<S, Ix2>, axis: usize) -> Array2<f64>
    where
        S: Data<Elem = f64>,
    {
        let mut buffer = input.to_owned();
        let mut output = Array2::<f64>::zeros(input.raw_dim());
        nddct1(&mut buffer, &mut output, &mut self.dct_handler, axis);
        let corrector = 1. / ((self.n - 1) as f64 * &self.correct_dct);
        for mut v in output.lanes_mut(Axis(axis)) {
            v *= &corrector;
            v[0] /= 2.;
            v[self.n - 1] /= 2.;
        }
        output
    }

    /// Transform: chebyshev coefficients --> grid values along axis
    pub fn backward<S>(&mut self, input: &ArrayBase<S, Ix2>, axis: usize) -> Array2<f64>
    where
        S: Data<Elem = f64>,
    {
        let mut buffer = input.to_owned();
        let half = &self.correct_dct / 2.;
        for mut v in buffer.lanes_mut(Axis(axis)) {
            v *= &half;
            v[0] *= 2.;
            v[self.n - 1] *= 2.;
        }
        let mut output = Array2::<f64>::zeros(input.raw_dim());
        nddct1(&mut buffer, &mut output, &mut self.dct_handler, axis);
        output
    }

    /// Interpolate grid values along axis 1 onto the grid of `target`.
    ///
    /// Coefficients are padded with zeros or truncated, a finer target
    /// holds the same polynomial.
    pub fn resample<S>(&mut self, target: &mut Chebyshev, input: &ArrayBase<S, Ix2>) -> Array2<f64>
    where
        S: Data<Elem = f64>,
    {
        let coeff = self.forward(input, 1);
        let k = self.n.min(target.n);
        let mut coeff_target = Array2::<f64>::zeros((input.shape()[0], target.n));
        coeff_target
            .slice_mut(s![.., ..k])
            .assign(&coeff.slice(s![.., ..k]));
        target.backward(&coeff_target, 1)
    }

    /// Differentiate n_times along axis 1
    pub fn differentiate<S>(&self, input: &ArrayBase<S, Ix2>, n_times: usize) -> Array2<Complex<f64>>
    where
        S: Data<Elem = Complex<f64>>,
    {
        let mut output = input.to_owned();
        for _ in 0..n_times {
            output = output.dot(&self.dmat_t);
        }
        output
    }
}

impl BaseBasics for Chebyshev {
    fn len_phys(&self) -> usize {
        self.n
    }

    fn len_spec(&self) -> usize {
        self.n
    }

    fn coords(&self) -> &Array1<f64> {
        &self.x
    }

    fn interval(&self) -> (f64, f64) {
        self.interval
    }

    /// Centered differences of the grid, one sided at the walls
    fn grid_spacing(&self) -> Array1<f64> {
        let n = self.n;
        let mut dx = Array1::<f64>::zeros(n);
        dx[0] = self.x[1] - self.x[0];
        dx[n - 1] = self.x[n - 1] - self.x[n - 2];
        for i in 1..n - 1 {
            dx[i] = (self.x[i + 1] - self.x[i - 1]) / 2.;
        }
        dx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq<S, D>(result: &ArrayBase<S, D>, expected: &ArrayBase<S, D>, dif: f64)
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        for (a, b) in expected.iter().zip(result.iter()) {
            if (a - b).abs() > dif {
                panic!("Large difference of values, got {} expected {}.", b, a)
            }
        }
    }

    #[test]
    fn test_nodes_ascending_and_mapped() {
        let cheby = Chebyshev::new(9, (-0.5, 0.5));
        assert!((cheby.x[0] + 0.5).abs() < 1e-14);
        assert!((cheby.x[8] - 0.5).abs() < 1e-14);
        assert!(cheby.x[4].abs() < 1e-14);
        for i in 1..9 {
            assert!(cheby.x[i] > cheby.x[i - 1]);
        }
    }

    #[test]
    fn test_differentiation_matrix() {
        let cheby = Chebyshev::new(24, (-0.5, 0.5));
        let v = cheby.x.mapv(|z| (3. * z).sin());
        let expected = cheby.x.mapv(|z| 3. * (3. * z).cos());
        let result = cheby.dmat().dot(&v);
        approx_eq(&result, &expected, 1e-8);
    }

    #[test]
    fn test_differentiate_complex_along_axis1() {
        let cheby = Chebyshev::new(16, (0., 2.));
        let mut data = Array2::<Complex<f64>>::zeros((2, 16));
        for (j, z) in cheby.x.iter().enumerate() {
            data[[0, j]] = Complex::new(z * z, 0.);
            data[[1, j]] = Complex::new(0., z * z * z);
        }
        let result = cheby.differentiate(&data, 2);
        for (j, z) in cheby.x.iter().enumerate() {
            assert!((result[[0, j]].re - 2.).abs() < 1e-7);
            assert!((result[[1, j]].im - 6. * z).abs() < 1e-7);
        }
    }

    #[test]
    fn test_coefficients() {
        let mut cheby = Chebyshev::new(8, (-1., 1.));
        // T_2 = 2x^2 - 1 and T_3 = 4x^3 - 3x
        let mut v = Array2::<f64>::zeros((2, 8));
        for (j, x) in cheby.x.iter().enumerate() {
            v[[0, j]] = 2. * x * x - 1.;
            v[[1, j]] = 4. * x * x * x - 3. * x;
        }
        let coeff = cheby.forward(&v, 1);
        let mut expected = Array2::<f64>::zeros((2, 8));
        expected[[0, 2]] = 1.;
        expected[[1, 3]] = 1.;
        approx_eq(&coeff, &expected, 1e-12);
        approx_eq(&cheby.backward(&coeff, 1), &v, 1e-12);
    }

    #[test]
    fn test_coefficients_along_axis0() {
        let mut cheby = Chebyshev::new(7, (0., 2.));
        let v = Array2::from_shape_fn((7, 3), |(i, j)| cheby.x[i].powi(j as i32));
        let coeff = cheby.forward(&v, 0);
        // constant
        assert!((coeff[[0, 0]] - 1.).abs() < 1e-12);
        assert!(coeff.column(0).iter().skip(1).all(|c| c.abs() < 1e-12));
        approx_eq(&cheby.backward(&coeff, 0), &v, 1e-12);
    }

    #[test]
    fn test_resample_to_finer_and_back() {
        let mut coarse = Chebyshev::new(9, (-0.5, 0.5));
        let mut fine = Chebyshev::new(14, (-0.5, 0.5));
        let v = Array2::from_shape_fn((2, 9), |(i, j)| {
            let z = coarse.x[j];
            1. + z - (i as f64) * z.powi(5)
        });
        let v_fine = coarse.resample(&mut fine, &v);
        for (j, z) in fine.x.iter().enumerate() {
            assert!((v_fine[[0, j]] - (1. + z)).abs() < 1e-12);
            assert!((v_fine[[1, j]] - (1. + z - z.powi(5))).abs() < 1e-12);
        }
        let back = fine.resample(&mut coarse, &v_fine);
        approx_eq(&back, &v, 1e-12);
    }

    #[test]
    fn test_clenshaw_curtis() {
        for n in [5, 8, 33] {
            let cheby = Chebyshev::new(n, (-0.5, 0.5));
            let w = cheby.weights();
            assert!((w.sum() - 1.).abs() < 1e-12);
            let z2: f64 = w.iter().zip(cheby.x.iter()).map(|(w, z)| w * z * z).sum();
            assert!((z2 - 1. / 12.).abs() < 1e-12);
        }
    }

    #[test]
    fn test_grid_spacing() {
        let cheby = Chebyshev::new(5, (-1., 1.));
        let dx = cheby.grid_spacing();
        assert!((dx[0] - (cheby.x[1] + 1.)).abs() < 1e-14);
        assert!((dx[2] - cheby.x[3]).abs() < 1e-14);
    }
}
