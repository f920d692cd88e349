//! # Initial value solver
//! Advances the Boussinesq system of [`crate::problem::Boussinesq2D`] with an
//! implicit-explicit Runge-Kutta scheme.
//!
//! The state holds one row per Fourier mode with the blocks [c; b] of
//! [`super::operators`], collocation values along z. Diffusion, buoyancy
//! coupling and the boundary conditions are implicit, advection is explicit
//! and evaluated pseudo-spectrally. The Nyquist mode of an even grid is kept
//! at zero.
//!
//! # Examples
//!
//! ```
//! use rbc_quickstart::bases::{chebyshev, fourier};
//! use rbc_quickstart::problem::Params;
//! use rbc_quickstart::{Boussinesq2D, Domain, Timestepper};
//! let domain = Domain::new(fourier(16, 4.), chebyshev(9, (-0.5, 0.5)));
//! let params = Params { diffusivity: 1e-2, viscosity: 1e-2, forcing: 1. };
//! let mut solver = Boussinesq2D::new(domain, params)
//!     .build_solver(Timestepper::RK222)
//!     .unwrap();
//! solver.random_perturbation(42, 1e-3).unwrap();
//! solver.stop_iteration = 5;
//! while solver.proceed() {
//!     solver.step(0.01).unwrap();
//! }
//! assert_eq!(solver.iteration, 5);
//! ```
use super::conv_term::convection;
use super::operators::ModeOperator;
use super::Variable;
use crate::bases::BaseBasics;
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::evaluator::{Evaluator, FileHandler, FileMode, GridData, Schedule};
use crate::field::Field2;
use crate::hdf5::{gen_name_path, open, read_2d_at, read_scalar_at, resolve_index, series_len};
use crate::problem::{Boussinesq2D, Params};
use crate::solver::{matvec, Lu, Solve};
use crate::timestepper::{Tableau, Timestepper};
use crate::Integrate;
use ndarray::prelude::*;
use ndarray::Zip;
use num_complex::Complex;
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Solve 2-dimensional Boussinesq equations
pub struct Solver {
    /// Field for derivatives and transforms
    field: Field2,
    /// Buoyancy
    pub b: Field2,
    /// Horizontal Velocity
    pub u: Field2,
    /// Vertical Velocity
    pub w: Field2,
    domain: Domain,
    params: Params,
    dealias: bool,
    tableau: Tableau,
    /// Linear operators, one per Fourier mode
    ops: Vec<ModeOperator>,
    /// Factorized stage matrices
    lu: Vec<Lu>,
    /// Step size of the factorization
    lu_dt: Option<f64>,
    /// [c; b] per Fourier mode
    state: Array2<Complex<f64>>,
    /// Output and diagnostics
    pub evaluator: Evaluator,
    /// Simulation time
    pub sim_time: f64,
    /// Iterations since the start of the simulation, restarts included
    pub iteration: usize,
    /// Iteration at construction or of the loaded state
    pub initial_iteration: usize,
    /// Last step size
    pub dt: f64,
    /// Stop once sim_time reaches this value
    pub stop_sim_time: f64,
    /// Stop once the wall time (seconds) reaches this value
    pub stop_wall_time: f64,
    /// Stop once the iteration reaches this value
    pub stop_iteration: usize,
    start_time: Instant,
}

impl Solver {
    /// Set up operators of all Fourier modes
    ///
    /// # Errors
    /// Returns [`Error::InvalidDomain`] if the vertical grid cannot hold
    /// the boundary conditions or the horizontal grid has no wave.
    pub fn new(problem: &Boussinesq2D, timestepper: Timestepper) -> Result<Self> {
        let domain = problem.domain.clone();
        let [nx, nz] = domain.shape_phys();
        if nx < 2 || nz < 4 {
            return Err(Error::InvalidDomain(format!(
                "grid {} x {}, need nx >= 2 and nz >= 4",
                nx, nz
            )));
        }
        let params = problem.params;
        let dmat = domain.z_basis.dmat();
        let ops: Vec<ModeOperator> = domain
            .x_basis
            .k
            .iter()
            .enumerate()
            .map(|(i, kappa)| {
                if i == 0 {
                    ModeOperator::mean(dmat, &params)
                } else {
                    ModeOperator::wave(*kappa, dmat, &params)
                }
            })
            .collect();
        let [m, n] = domain.shape_spec();
        info!(
            "Building solver: {} x {} grid, {} modes of size {}",
            domain.shape_phys()[0],
            n,
            m,
            2 * n
        );
        Ok(Solver {
            field: Field2::new(&domain),
            b: Field2::new(&domain),
            u: Field2::new(&domain),
            w: Field2::new(&domain),
            params,
            dealias: problem.dealias,
            tableau: timestepper.tableau(),
            ops,
            lu: vec![],
            lu_dt: None,
            state: Array2::zeros((m, 2 * n)),
            evaluator: Evaluator::new(),
            sim_time: 0.,
            iteration: 0,
            initial_iteration: 0,
            dt: 0.,
            stop_sim_time: f64::INFINITY,
            stop_wall_time: f64::INFINITY,
            stop_iteration: usize::MAX,
            start_time: Instant::now(),
            domain,
        })
    }

    /// Domain of the problem
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Coefficients of the problem
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Seconds since the solver was built
    pub fn get_wall_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Register file handler below `dir/name`
    ///
    /// # Errors
    /// File system errors while preparing the directory.
    pub fn add_file_handler<P: AsRef<Path>>(
        &mut self,
        dir: P,
        name: &str,
        max_writes: usize,
        mode: FileMode,
    ) -> Result<&mut FileHandler> {
        let handler = FileHandler::new(dir, name, &self.domain, max_writes, mode)?;
        Ok(self.evaluator.add_file_handler(handler))
    }

    /// False once a stop criterion is met
    pub fn proceed(&self) -> bool {
        if self.sim_time >= self.stop_sim_time {
            info!("Simulation stop time reached.");
            false
        } else if self.get_wall_time() >= self.stop_wall_time {
            info!("Wall stop time reached.");
            false
        } else if self.iteration >= self.stop_iteration {
            info!("Stop iteration reached.");
            false
        } else {
            true
        }
    }

    /// Advance by dt. Handlers that are due are evaluated first,
    /// with the state before the step.
    ///
    /// # Errors
    /// Output errors, a singular stage matrix or a non-finite solution.
    pub fn step(&mut self, dt: f64) -> Result<f64> {
        let schedule = Schedule {
            sim_time: self.sim_time,
            wall_time: self.get_wall_time(),
            iteration: self.iteration,
            timestep: dt,
        };
        if self.evaluator.is_due(&schedule) {
            let data = self.grid_data();
            self.evaluator.evaluate_scheduled(&schedule, &data)?;
        }
        self.advance(dt)?;
        self.sim_time += dt;
        self.iteration += 1;
        self.dt = dt;
        if self
            .state
            .iter()
            .any(|v| !(v.re.is_finite() && v.im.is_finite()))
        {
            return Err(Error::NonFinite {
                iteration: self.iteration,
            });
        }
        Ok(dt)
    }

    /// One IMEX Runge-Kutta step
    fn advance(&mut self, dt: f64) -> Result<()> {
        if self.lu_dt != Some(dt) {
            self.factorize(dt)?;
        }
        let tableau = self.tableau.clone();
        let mx0 = apply_operator(&self.ops, &self.state, |op| &op.mass);
        let mut lx: Vec<Array2<Complex<f64>>> = Vec::with_capacity(tableau.stages());
        let mut fx: Vec<Array2<Complex<f64>>> = Vec::with_capacity(tableau.stages());
        let mut x = self.state.clone();
        for i in 1..=tableau.stages() {
            lx.push(apply_operator(&self.ops, &x, |op| &op.stiff));
            fx.push(self.explicit(&x));
            let mut rhs = mx0.clone();
            for j in 0..i {
                let (h, a) = (tableau.h[i][j], tableau.a[i][j]);
                if h != 0. {
                    rhs.scaled_add(Complex::new(dt * h, 0.), &fx[j]);
                }
                if a != 0. {
                    rhs.scaled_add(Complex::new(-dt * a, 0.), &lx[j]);
                }
            }
            self.solve(&mut rhs);
            x = rhs;
        }
        self.state = x;
        Ok(())
    }

    /// Factorize M + dt a_ii L of all modes
    fn factorize(&mut self, dt: f64) -> Result<()> {
        let c = dt * self.tableau.diagonal();
        self.lu = self
            .ops
            .par_iter()
            .map(|op| Lu::from_matrix(&op.stage_matrix(c)))
            .collect::<Result<Vec<_>>>()?;
        self.lu_dt = Some(dt);
        debug!("Factorized {} stage matrices for dt = {:e}", self.lu.len(), dt);
        Ok(())
    }

    /// Solve stage systems in place
    fn solve(&self, rhs: &mut Array2<Complex<f64>>) {
        let (ops, lu) = (&self.ops, &self.lu);
        Zip::indexed(rhs.outer_iter_mut()).par_for_each(|k, mut row| {
            ops[k].zero_bc_rows(&mut row);
            let b = row.to_owned();
            lu[k].solve(&b, &mut row, 0);
        });
    }

    /// Explicit right hand side F(X)
    fn explicit(&mut self, x: &Array2<Complex<f64>>) -> Array2<Complex<f64>> {
        self.load_fields(x);
        let n = self.domain.shape_spec()[1];
        let (u, w) = if self.dealias {
            (self.u.backward_padded(), self.w.backward_padded())
        } else {
            (self.u.v.to_owned(), self.w.v.to_owned())
        };
        let nb = convection(&self.b, &mut self.field, &u, &w, self.dealias);
        let nu = convection(&self.u, &mut self.field, &u, &w, self.dealias);
        let nw = convection(&self.w, &mut self.field, &u, &w, self.dealias);
        // i D Nu + kappa Nw
        self.field.vhat.assign(&nu);
        let dnu = self.field.grad([0, 1]);
        let mut rhs = Array2::<Complex<f64>>::zeros(x.raw_dim());
        for (k, kappa) in self.domain.x_basis.k.iter().enumerate() {
            if k == 0 {
                rhs.slice_mut(s![0, ..n]).assign(&nu.row(0).mapv(|v| -v));
            } else {
                let row = &dnu.row(k) * Complex::new(0., 1.) + &nw.row(k) * *kappa;
                rhs.slice_mut(s![k, ..n]).assign(&row);
            }
            rhs.slice_mut(s![k, n..]).assign(&nb.row(k).mapv(|v| -v));
        }
        self.drop_nyquist(&mut rhs);
        rhs
    }

    /// The Nyquist mode of even grids is not evolved
    fn drop_nyquist(&self, data: &mut Array2<Complex<f64>>) {
        let x_basis = &self.domain.x_basis;
        if x_basis.n % 2 == 0 {
            data.row_mut(x_basis.m - 1).fill(Complex::new(0., 0.));
        }
    }

    /// Spectral and physical b, u, w of state x
    fn load_fields(&mut self, x: &Array2<Complex<f64>>) {
        let n = self.domain.shape_spec()[1];
        let c = x.slice(s![.., ..n]);
        self.b.vhat.assign(&x.slice(s![.., n..]));
        // u = i D c, w = kappa c
        self.field.vhat.assign(&c);
        let dc = self.field.grad([0, 1]);
        let i = Complex::new(0., 1.);
        for (k, kappa) in self.domain.x_basis.k.iter().enumerate() {
            if k == 0 {
                self.u.vhat.row_mut(0).assign(&c.row(0));
                self.w.vhat.row_mut(0).fill(Complex::new(0., 0.));
            } else {
                self.u.vhat.row_mut(k).assign(&(&dc.row(k) * i));
                self.w.vhat.row_mut(k).assign(&(&c.row(k) * *kappa));
            }
        }
        self.b.backward();
        self.u.backward();
        self.w.backward();
    }

    /// All variables of the current state on the grid
    pub fn grid_data(&mut self) -> GridData {
        let state = self.state.clone();
        self.load_fields(&state);
        let bz = vertical_derivative(&self.b, &mut self.field);
        let uz = vertical_derivative(&self.u, &mut self.field);
        let wz = vertical_derivative(&self.w, &mut self.field);
        GridData {
            b: self.b.v.to_owned(),
            bz,
            u: self.u.v.to_owned(),
            uz,
            w: self.w.v.to_owned(),
            wz,
        }
    }

    /// Single variable of the current state on the grid
    pub fn grid(&mut self, variable: Variable) -> Array2<f64> {
        let data = self.grid_data();
        data.get(variable).to_owned()
    }

    /// Set buoyancy from grid values, shape (nx, nz)
    ///
    /// # Errors
    /// Shape does not match the grid.
    pub fn set_buoyancy(&mut self, b: &Array2<f64>) -> Result<()> {
        check_shape("b", b, self.domain.shape_phys())?;
        let n = self.domain.shape_spec()[1];
        let mut bhat = self.domain.forward(b);
        self.drop_nyquist(&mut bhat);
        self.state.slice_mut(s![.., n..]).assign(&bhat);
        Ok(())
    }

    /// Set velocity from grid values. Only the divergence free part
    /// determined by w and the mean of u is kept.
    ///
    /// # Errors
    /// Shapes do not match the grid.
    pub fn set_velocity(&mut self, u: &Array2<f64>, w: &Array2<f64>) -> Result<()> {
        check_shape("u", u, self.domain.shape_phys())?;
        check_shape("w", w, self.domain.shape_phys())?;
        let n = self.domain.shape_spec()[1];
        let uhat = self.domain.forward(u);
        let mut what = self.domain.forward(w);
        self.drop_nyquist(&mut what);
        for (k, kappa) in self.domain.x_basis.k.iter().enumerate() {
            let mut c = self.state.slice_mut(s![k, ..n]);
            if k == 0 {
                c.assign(&uhat.row(0));
            } else {
                c.assign(&what.row(k).mapv(|v| v / *kappa));
            }
        }
        Ok(())
    }

    /// Random buoyancy perturbation damped towards the plates,
    /// b = F * amp * noise * (zt - z) * (z - zb)
    ///
    /// The standard normal noise is drawn on the full grid from a seeded
    /// generator, so the initial condition is reproducible.
    ///
    /// # Errors
    /// Propagates errors of [`Solver::set_buoyancy`].
    pub fn random_perturbation(&mut self, seed: u64, amp: f64) -> Result<()> {
        use ndarray_rand::rand::rngs::StdRng;
        use ndarray_rand::rand::SeedableRng;
        use ndarray_rand::rand_distr::StandardNormal;
        use ndarray_rand::RandomExt;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut b: Array2<f64> =
            Array2::random_using(self.domain.shape_phys(), StandardNormal, &mut rng);
        let (zb, zt) = self.domain.z_basis.interval();
        let scale = self.params.forcing * amp;
        for (mut col, z) in b.axis_iter_mut(Axis(1)).zip(self.domain.grid(1).iter()) {
            let damp = (zt - z) * (z - zb);
            col.mapv_inplace(|v| scale * v * damp);
        }
        self.set_buoyancy(&b)
    }

    /// Load state from a snapshot file.
    ///
    /// # Arguments
    /// * `path` - Snapshot set or checkpoint
    /// * `index` - Write to load, negative values count from the end
    ///
    /// # Returns
    /// Write number and time step of the loaded write
    ///
    /// # Errors
    /// Missing file or datasets, index out of range, or a grid mismatch.
    pub fn load_state<P: AsRef<Path>>(&mut self, path: P, index: isize) -> Result<(usize, f64)> {
        let path = path.as_ref();
        info!("Loading solver state from: {}", path.display());
        let file = open(path)?;
        let writes = series_len(&file, "scales/sim_time")?;
        let index = resolve_index(index, writes)?;
        let read = |var: Variable| -> Result<Array2<f64>> {
            let data = read_2d_at(&file, &gen_name_path(var.name(), Some("tasks")), index)?;
            check_shape(var.name(), &data, self.domain.shape_phys())?;
            Ok(data)
        };
        let b = read(Variable::B)?;
        let u = read(Variable::U)?;
        let w = read(Variable::W)?;
        let sim_time: f64 = read_scalar_at(&file, "scales/sim_time", index)?;
        let iteration: u64 = read_scalar_at(&file, "scales/iteration", index)?;
        let write: u64 = read_scalar_at(&file, "scales/write_number", index)?;
        let dt: f64 = read_scalar_at(&file, "scales/timestep", index)?;
        self.set_buoyancy(&b)?;
        self.set_velocity(&u, &w)?;
        self.sim_time = sim_time;
        self.iteration = iteration as usize;
        self.initial_iteration = iteration as usize;
        self.dt = dt;
        info!("Loading iteration: {}", iteration);
        info!("Loading write: {}", write);
        info!("Loading sim time: {}", sim_time);
        info!("Loading timestep: {}", dt);
        Ok((write as usize, dt))
    }

    /// Divergence dx(u) + dz(w) of the current state in spectral space
    pub fn divergence(&mut self) -> Array2<Complex<f64>> {
        let state = self.state.clone();
        self.load_fields(&state);
        self.u.grad([1, 0]) + self.w.grad([0, 1])
    }
}

impl Integrate for Solver {
    fn update(&mut self, dt: f64) -> Result<f64> {
        self.step(dt)
    }

    fn proceed(&self) -> bool {
        Solver::proceed(self)
    }

    fn get_time(&self) -> f64 {
        self.sim_time
    }

    fn get_dt(&self) -> f64 {
        self.dt
    }

    fn get_iteration(&self) -> usize {
        self.iteration
    }
}

/// Operator times state, mode by mode
fn apply_operator<F>(ops: &[ModeOperator], x: &Array2<Complex<f64>>, select: F) -> Array2<Complex<f64>>
where
    F: Fn(&ModeOperator) -> &Array2<f64> + Sync,
{
    let mut out = Array2::<Complex<f64>>::zeros(x.raw_dim());
    Zip::indexed(out.outer_iter_mut())
        .and(x.outer_iter())
        .par_for_each(|k, mut o, xk| {
            o.assign(&matvec(select(&ops[k]), &xk));
        });
    out
}

/// dz of field, in physical space
fn vertical_derivative(field: &Field2, deriv_field: &mut Field2) -> Array2<f64> {
    deriv_field.vhat.assign(&field.grad([0, 1]));
    deriv_field.backward();
    deriv_field.v.to_owned()
}

fn check_shape(name: &str, data: &Array2<f64>, expected: [usize; 2]) -> Result<()> {
    if data.shape() != expected {
        return Err(Error::ShapeMismatch {
            name: name.to_string(),
            got: data.shape().to_vec(),
            expected: expected.to_vec(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bases::{chebyshev, fourier};
    use std::f64::consts::PI;

    fn approx_eq<S, D>(result: &ArrayBase<S, D>, expected: &ArrayBase<S, D>, dif: f64)
    where
        S: ndarray::Data<Elem = f64>,
        D: ndarray::Dimension,
    {
        for (a, b) in expected.iter().zip(result.iter()) {
            if (a - b).abs() > dif {
                panic!("Large difference of values, got {} expected {}.", b, a)
            }
        }
    }

    fn solver(nx: usize, nz: usize, params: Params, scheme: Timestepper) -> Solver {
        let domain = Domain::new(fourier(nx, 4.), chebyshev(nz, (-0.5, 0.5)));
        Boussinesq2D::new(domain, params).build_solver(scheme).unwrap()
    }

    fn params() -> Params {
        Params {
            diffusivity: 1e-2,
            viscosity: 1e-2,
            forcing: 1.,
        }
    }

    #[test]
    fn test_zero_state_stays_zero() {
        let mut solver = solver(16, 9, params(), Timestepper::RK222);
        for _ in 0..3 {
            solver.step(0.05).unwrap();
        }
        assert_eq!(solver.iteration, 3);
        assert!((solver.sim_time - 0.15).abs() < 1e-12);
        assert!(solver.grid(Variable::B).iter().all(|v| v.abs() < 1e-14));
        assert!(solver.grid(Variable::U).iter().all(|v| v.abs() < 1e-14));
    }

    /// Without forcing, a buoyancy mode decays like exp(-P (kx^2 + pi^2) t)
    #[test]
    fn test_buoyancy_diffusion() {
        let p = Params {
            diffusivity: 0.05,
            viscosity: 0.05,
            forcing: 0.,
        };
        for scheme in [Timestepper::RK222, Timestepper::RK443] {
            let mut solver = solver(16, 17, p, scheme);
            let kx = 2. * PI / 4.;
            let amp = 1e-6;
            let mut b = solver.domain().ndarr_phys();
            for (i, x) in solver.domain().grid(0).iter().enumerate() {
                for (j, z) in solver.domain().grid(1).iter().enumerate() {
                    b[[i, j]] = amp * (kx * x).cos() * (PI * (z + 0.5)).sin();
                }
            }
            solver.set_buoyancy(&b).unwrap();
            let dt = 0.01;
            for _ in 0..100 {
                solver.step(dt).unwrap();
            }
            let decay = (-p.diffusivity * (kx * kx + PI * PI) * solver.sim_time).exp();
            let expected = &b * decay;
            approx_eq(&solver.grid(Variable::B), &expected, amp * 1e-4);
        }
    }

    /// Mean shear flow decays like exp(-R pi^2 t)
    #[test]
    fn test_mean_flow_diffusion() {
        let p = params();
        let mut solver = solver(8, 17, p, Timestepper::RK222);
        let mut u = solver.domain().ndarr_phys();
        for (j, z) in solver.domain().grid(1).iter().enumerate() {
            u.column_mut(j).fill((PI * (z + 0.5)).sin());
        }
        let w = solver.domain().ndarr_phys();
        solver.set_velocity(&u, &w).unwrap();
        for _ in 0..50 {
            solver.step(0.02).unwrap();
        }
        let expected = &u * (-p.viscosity * PI * PI * solver.sim_time).exp();
        approx_eq(&solver.grid(Variable::U), &expected, 1e-5);
        assert!(solver.grid(Variable::W).iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_perturbation_and_continuity() {
        let mut solver = solver(16, 13, params(), Timestepper::RK222);
        solver.random_perturbation(42, 1e-3).unwrap();
        let b = solver.grid(Variable::B);
        assert!(b.iter().any(|v| v.abs() > 0.));
        let nz = b.shape()[1];
        for i in 0..b.shape()[0] {
            assert!(b[[i, 0]].abs() < 1e-14);
            assert!(b[[i, nz - 1]].abs() < 1e-14);
        }
        // same seed, same field
        let mut other = self::solver(16, 13, params(), Timestepper::RK222);
        other.random_perturbation(42, 1e-3).unwrap();
        approx_eq(&other.grid(Variable::B), &b, 0.);

        for _ in 0..10 {
            solver.step(0.05).unwrap();
        }
        // buoyancy drives flow, flow stays divergence free and no-slip
        let w = solver.grid(Variable::W);
        let u = solver.grid(Variable::U);
        assert!(w.iter().any(|v| v.abs() > 1e-12));
        for i in 0..w.shape()[0] {
            assert!(w[[i, 0]].abs() < 1e-12 && w[[i, nz - 1]].abs() < 1e-12);
            assert!(u[[i, 0]].abs() < 1e-12 && u[[i, nz - 1]].abs() < 1e-12);
        }
        let div = solver.divergence();
        assert!(div.iter().all(|v| v.norm() < 1e-10));
    }

    #[test]
    fn test_proceed() {
        let mut solver = solver(8, 9, params(), Timestepper::RK111);
        solver.stop_sim_time = 0.25;
        let mut steps = 0;
        while solver.proceed() {
            solver.step(0.1).unwrap();
            steps += 1;
        }
        assert_eq!(steps, 3);
        let mut solver = self::solver(8, 9, params(), Timestepper::RK111);
        solver.stop_iteration = 2;
        while solver.proceed() {
            solver.step(0.1).unwrap();
        }
        assert_eq!(solver.iteration, 2);
    }

    #[test]
    fn test_non_finite_state_is_an_error() {
        let mut solver = solver(8, 9, params(), Timestepper::RK222);
        let mut b = solver.domain().ndarr_phys();
        b[[3, 4]] = f64::NAN;
        solver.set_buoyancy(&b).unwrap();
        assert!(matches!(
            solver.step(0.01),
            Err(Error::NonFinite { iteration: 1 })
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let mut solver = solver(8, 9, params(), Timestepper::RK222);
        let b = Array2::<f64>::zeros((8, 8));
        assert!(matches!(
            solver.set_buoyancy(&b),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_snapshot_and_load_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut solver = solver(16, 9, params(), Timestepper::RK222);
        solver.random_perturbation(1, 1e-2).unwrap();
        solver
            .add_file_handler(dir.path(), "snapshots", 10, FileMode::Overwrite)
            .unwrap()
            .set_iter(2)
            .add_system();
        for _ in 0..5 {
            solver.step(0.02).unwrap();
        }
        // writes at iterations 0, 2, 4
        let path = dir.path().join("snapshots").join("snapshots_s1.h5");
        let b_written = {
            let file = open(&path).unwrap();
            read_2d_at(&file, "tasks/b", 2).unwrap()
        };

        let mut restarted = self::solver(16, 9, params(), Timestepper::RK222);
        let (write, dt) = restarted.load_state(&path, -1).unwrap();
        assert_eq!(write, 3);
        assert!((dt - 0.02).abs() < 1e-15);
        assert_eq!(restarted.iteration, 4);
        assert_eq!(restarted.initial_iteration, 4);
        assert!((restarted.sim_time - 0.08).abs() < 1e-12);
        approx_eq(&restarted.grid(Variable::B), &b_written, 1e-12);

        assert!(matches!(
            restarted.load_state(&path, 3),
            Err(Error::InvalidIndex { index: 3, writes: 3 })
        ));
    }
}
