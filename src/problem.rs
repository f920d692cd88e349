//! # Boussinesq equations of Rayleigh-Benard convection
//!
//! Buoyancy b and velocities (u, w) in a box periodic in x and bounded by two
//! plates in z:
//! $$
//! \partial_x u + \partial_z w = 0
//! $$
//! $$
//! \partial_t b - P \nabla^2 b - F w = -(u \partial_x b + w \partial_z b)
//! $$
//! $$
//! \partial_t u - R \nabla^2 u + \partial_x p = -(u \partial_x u + w \partial_z u)
//! $$
//! $$
//! \partial_t w - R \nabla^2 w + \partial_z p - b = -(u \partial_x w + w \partial_z w)
//! $$
//! with b = u = w = 0 on both plates.
//!
//! The pressure is eliminated with a streamfunction, see [`crate::navier`].
use crate::bases::{chebyshev, fourier};
use crate::config::Config;
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::navier::Solver;
use crate::timestepper::Timestepper;

/// Coefficients of the equations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    /// Buoyancy diffusivity P
    pub diffusivity: f64,
    /// Viscosity R
    pub viscosity: f64,
    /// Background buoyancy gradient F
    pub forcing: f64,
}

/// Initial value problem of 2D Boussinesq convection
#[derive(Clone)]
pub struct Boussinesq2D {
    /// Discretized box
    pub domain: Domain,
    /// Coefficients
    pub params: Params,
    /// Dealias nonlinear terms (3/2 rule)
    pub dealias: bool,
}

impl Boussinesq2D {
    /// New problem on domain
    pub fn new(domain: Domain, params: Params) -> Self {
        Self {
            domain,
            params,
            dealias: true,
        }
    }

    /// Problem of an experiment configuration. The box spans
    /// [0, lx) x [-lz/2, lz/2].
    ///
    /// # Errors
    /// Returns [`Error::InvalidDomain`] for grids smaller than
    /// nx = 2, nz = 4 or box lengths that are not positive.
    pub fn from_config(config: &Config) -> Result<Self> {
        let d = &config.domain;
        if d.nx < 2 || d.nz < 4 {
            return Err(Error::InvalidDomain(format!(
                "grid {} x {}, need nx >= 2 and nz >= 4",
                d.nx, d.nz
            )));
        }
        if !(d.lx > 0. && d.lz > 0.) {
            return Err(Error::InvalidDomain(format!(
                "box {} x {}, lengths must be positive",
                d.lx, d.lz
            )));
        }
        let x_basis = fourier(d.nx, d.lx);
        let z_basis = chebyshev(d.nz, (-d.lz / 2., d.lz / 2.));
        let params = Params {
            diffusivity: config.physics.diffusivity(),
            viscosity: config.physics.viscosity(),
            forcing: config.physics.forcing,
        };
        let mut problem = Self::new(Domain::new(x_basis, z_basis), params);
        problem.dealias = d.dealias;
        Ok(problem)
    }

    /// Build the initial value solver.
    ///
    /// # Errors
    /// Propagates errors from assembling the linear operators.
    pub fn build_solver(&self, timestepper: Timestepper) -> Result<Solver> {
        Solver::new(self, timestepper)
    }
}
