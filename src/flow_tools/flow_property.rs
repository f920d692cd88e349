//! # Global flow properties
//! Reductions of grid quantities, e.g. the maximum Reynolds number.
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::evaluator::{GridData, HandlerId, Results};
use crate::navier::Solver;
use ndarray::Array2;

/// Named grid properties evaluated every `cadence` iterations
pub struct GlobalFlowProperty {
    domain: Domain,
    handler: HandlerId,
    properties: Results,
    names: Vec<String>,
}

impl GlobalFlowProperty {
    /// Register on solver
    pub fn new(solver: &mut Solver, cadence: usize) -> Self {
        let handler = solver.evaluator.add_dictionary_handler(cadence);
        let properties = solver.evaluator.dictionary(handler).results();
        Self {
            domain: solver.domain().clone(),
            handler,
            properties,
            names: vec![],
        }
    }

    /// Add property
    ///
    /// # Example
    /// ```ignore
    /// let r = solver.params().viscosity;
    /// flow.add_property(&mut solver, "Re", move |g| {
    ///     (&g.u * &g.u + &g.w * &g.w).mapv(f64::sqrt) / r
    /// });
    /// ```
    pub fn add_property<F>(&mut self, solver: &mut Solver, name: &str, property: F)
    where
        F: Fn(&GridData) -> Array2<f64> + Send + Sync + 'static,
    {
        self.names.push(name.to_string());
        solver
            .evaluator
            .dictionary_mut(self.handler)
            .add_task(name, Box::new(property));
    }

    fn reduce<F>(&self, name: &str, f: F) -> Result<f64>
    where
        F: Fn(&Array2<f64>) -> f64,
    {
        let properties = self
            .properties
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match properties.get(name) {
            Some(values) => Ok(f(values)),
            None if self.names.iter().any(|n| n == name) => {
                Err(Error::NotEvaluated(name.to_string()))
            }
            None => Err(Error::UnknownProperty(name.to_string())),
        }
    }

    /// Maximum over the grid
    ///
    /// # Errors
    /// Unknown or not yet evaluated property.
    pub fn max(&self, name: &str) -> Result<f64> {
        self.reduce(name, |v| v.iter().fold(f64::NEG_INFINITY, |m, x| m.max(*x)))
    }

    /// Minimum over the grid
    ///
    /// # Errors
    /// Unknown or not yet evaluated property.
    pub fn min(&self, name: &str) -> Result<f64> {
        self.reduce(name, |v| v.iter().fold(f64::INFINITY, |m, x| m.min(*x)))
    }

    /// Arithmetic mean over grid points
    ///
    /// # Errors
    /// Unknown or not yet evaluated property.
    pub fn grid_average(&self, name: &str) -> Result<f64> {
        self.reduce(name, |v| v.mean().unwrap_or(0.))
    }

    /// Mean weighted with the cell volumes
    ///
    /// # Errors
    /// Unknown or not yet evaluated property.
    pub fn volume_average(&self, name: &str) -> Result<f64> {
        self.reduce(name, |v| self.domain.volume_average(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bases::{chebyshev, fourier};
    use crate::error::Error;
    use crate::problem::{Boussinesq2D, Params};
    use crate::Timestepper;

    fn solver() -> Solver {
        let domain = Domain::new(fourier(8, 4.), chebyshev(9, (-0.5, 0.5)));
        let params = Params {
            diffusivity: 1e-2,
            viscosity: 1e-2,
            forcing: 0.,
        };
        Boussinesq2D::new(domain, params)
            .build_solver(Timestepper::RK111)
            .unwrap()
    }

    #[test]
    fn test_properties_of_uniform_buoyancy() {
        let mut solver = solver();
        let b = Array2::from_elem(solver.domain().shape_phys(), 2.);
        solver.set_buoyancy(&b).unwrap();
        let mut flow = GlobalFlowProperty::new(&mut solver, 10);
        flow.add_property(&mut solver, "b2", |g| &g.b * &g.b);
        flow.add_property(&mut solver, "speed", |g| {
            (&g.u * &g.u + &g.w * &g.w).mapv(f64::sqrt)
        });
        solver.step(1e-3).unwrap();
        assert!((flow.max("b2").unwrap() - 4.).abs() < 1e-10);
        assert!((flow.min("b2").unwrap() - 4.).abs() < 1e-10);
        assert!((flow.grid_average("b2").unwrap() - 4.).abs() < 1e-10);
        assert!((flow.volume_average("b2").unwrap() - 4.).abs() < 1e-10);
        assert!(flow.max("speed").unwrap().abs() < 1e-14);
    }

    #[test]
    fn test_missing_properties() {
        let mut solver = solver();
        let mut flow = GlobalFlowProperty::new(&mut solver, 10);
        flow.add_property(&mut solver, "Re", |g| g.u.mapv(f64::abs));
        assert!(matches!(flow.max("Re"), Err(Error::NotEvaluated(_))));
        assert!(matches!(flow.max("Nu"), Err(Error::UnknownProperty(_))));
    }
}
