//! # Linear operators of a single Fourier mode
//!
//! Per horizontal wavenumber the state is X = [c; b], two blocks of `n`
//! collocation values. For kappa > 0 the first block is the scaled
//! streamfunction c with
//! $$
//! u = i D c, \quad w = \kappa c
//! $$
//! which satisfies continuity exactly. Eliminating pressure leaves
//! $$
//! \partial_t (D^2 - \kappa^2) c - R (D^2 - \kappa^2)^2 c + \kappa b = i D N_u + \kappa N_w
//! $$
//! $$
//! \partial_t b - P (D^2 - \kappa^2) b - F \kappa c = -N_b
//! $$
//! For kappa = 0 the first block carries the mean horizontal velocity, which
//! obeys a plain diffusion equation, and w vanishes.
//!
//! Boundary conditions replace the collocation equations at and next to the
//! walls: c = Dc = 0 and b = 0 (no-slip, fixed buoyancy), resp. u = 0 for the
//! mean mode.
use crate::problem::Params;
use ndarray::prelude::*;
use ndarray::Data;
use num_complex::Complex;

/// Mass matrix M, stiffness matrix L and boundary rows of
/// M dX/dt + L X = F(X).
#[derive(Debug, Clone)]
pub struct ModeOperator {
    /// Horizontal wavenumber
    pub kappa: f64,
    /// Mass matrix
    pub mass: Array2<f64>,
    /// Implicit (linear) operator
    pub stiff: Array2<f64>,
    /// Boundary conditions (row of the system, constraint)
    pub bc: Vec<(usize, Array1<f64>)>,
}

impl ModeOperator {
    /// Operator of wavenumber kappa > 0
    ///
    /// # Arguments
    /// * `kappa` - Wavenumber
    /// * `dmat` - First derivative matrix in z
    /// * `params` - Coefficients of the equations
    pub fn wave(kappa: f64, dmat: &Array2<f64>, params: &Params) -> Self {
        let n = dmat.shape()[0];
        let eye = Array2::<f64>::eye(n);
        let lap = dmat.dot(dmat) - &eye * kappa.powi(2);
        let mut mass = Array2::<f64>::zeros((2 * n, 2 * n));
        let mut stiff = Array2::<f64>::zeros((2 * n, 2 * n));
        mass.slice_mut(s![..n, ..n]).assign(&lap);
        mass.slice_mut(s![n.., n..]).assign(&eye);
        stiff
            .slice_mut(s![..n, ..n])
            .assign(&(lap.dot(&lap) * -params.viscosity));
        stiff.slice_mut(s![..n, n..]).assign(&(&eye * kappa));
        stiff
            .slice_mut(s![n.., ..n])
            .assign(&(&eye * (-params.forcing * kappa)));
        stiff
            .slice_mut(s![n.., n..])
            .assign(&(&lap * -params.diffusivity));
        // c = Dc = 0, b = 0
        let bc = vec![
            (0, unit(2 * n, 0)),
            (1, embed(2 * n, 0, &dmat.row(0))),
            (n - 2, embed(2 * n, 0, &dmat.row(n - 1))),
            (n - 1, unit(2 * n, n - 1)),
            (n, unit(2 * n, n)),
            (2 * n - 1, unit(2 * n, 2 * n - 1)),
        ];
        Self {
            kappa,
            mass,
            stiff,
            bc,
        }
    }

    /// Operator of the horizontal mean (kappa = 0)
    pub fn mean(dmat: &Array2<f64>, params: &Params) -> Self {
        let n = dmat.shape()[0];
        let d2 = dmat.dot(dmat);
        let mass = Array2::<f64>::eye(2 * n);
        let mut stiff = Array2::<f64>::zeros((2 * n, 2 * n));
        stiff
            .slice_mut(s![..n, ..n])
            .assign(&(&d2 * -params.viscosity));
        stiff
            .slice_mut(s![n.., n..])
            .assign(&(&d2 * -params.diffusivity));
        // u = 0, b = 0
        let bc = vec![
            (0, unit(2 * n, 0)),
            (n - 1, unit(2 * n, n - 1)),
            (n, unit(2 * n, n)),
            (2 * n - 1, unit(2 * n, 2 * n - 1)),
        ];
        Self {
            kappa: 0.,
            mass,
            stiff,
            bc,
        }
    }

    /// Matrix of an implicit stage, M + c L, with boundary rows
    pub fn stage_matrix(&self, c: f64) -> Array2<f64> {
        let mut lhs = &self.mass + &(&self.stiff * c);
        for (row, constraint) in &self.bc {
            lhs.row_mut(*row).assign(constraint);
        }
        lhs
    }

    /// Homogeneous boundary values on the right hand side
    pub fn zero_bc_rows<S>(&self, rhs: &mut ArrayBase<S, Ix1>)
    where
        S: ndarray::DataMut<Elem = Complex<f64>>,
    {
        for (row, _) in &self.bc {
            rhs[*row] = Complex::new(0., 0.);
        }
    }
}

fn unit(n: usize, i: usize) -> Array1<f64> {
    let mut v = Array1::<f64>::zeros(n);
    v[i] = 1.;
    v
}

fn embed<S: Data<Elem = f64>>(n: usize, offset: usize, row: &ArrayBase<S, Ix1>) -> Array1<f64> {
    let mut v = Array1::<f64>::zeros(n);
    v.slice_mut(s![offset..offset + row.len()]).assign(row);
    v
}
