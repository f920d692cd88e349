//! Implicit-explicit Runge-Kutta schemes
//!
//! The semi-discrete system of every Fourier mode reads
//! $$
//! M \frac{dX}{dt} + L X = F(X)
//! $$
//! with stiff linear part L (diffusion) treated implicitly and the
//! nonlinear part F (advection, buoyancy coupling) explicitly.
//!
//! Stage i of an (Ascher-Ruuth-Spiteri) scheme solves
//! $$
//! (M + \delta t a_{ii} L) X_i = M X_0 + \delta t \sum_{j<i} (h_{ij} F_j - a_{ij} L X_j)
//! $$
//! and the last stage is the new solution. All implemented schemes have a
//! constant implicit diagonal, so one factorization per mode and time step
//! size serves all stages.
use serde::{Deserialize, Serialize};

/// Available schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timestepper {
    /// 1st order, 1 stage (backward/forward Euler)
    RK111,
    /// 2nd order, 2 stages
    RK222,
    /// 3rd order, 4 stages
    RK443,
}

/// Butcher tableaus of an IMEX scheme, including the trivial stage 0
#[derive(Debug, Clone)]
pub struct Tableau {
    /// Implicit coefficients a_ij
    pub a: Vec<Vec<f64>>,
    /// Explicit coefficients h_ij
    pub h: Vec<Vec<f64>>,
}

impl Tableau {
    /// Number of stages (excluding stage 0)
    pub fn stages(&self) -> usize {
        self.a.len() - 1
    }

    /// Implicit diagonal, identical for all stages
    pub fn diagonal(&self) -> f64 {
        self.a[1][1]
    }
}

impl Timestepper {
    /// Return tableau of the scheme
    pub fn tableau(&self) -> Tableau {
        match self {
            Timestepper::RK111 => Tableau {
                a: vec![vec![0., 0.], vec![0., 1.]],
                h: vec![vec![0., 0.], vec![1., 0.]],
            },
            Timestepper::RK222 => {
                let gamma = (2. - 2_f64.sqrt()) / 2.;
                let delta = 1. - 1. / (2. * gamma);
                Tableau {
                    a: vec![
                        vec![0., 0., 0.],
                        vec![0., gamma, 0.],
                        vec![0., 1. - gamma, gamma],
                    ],
                    h: vec![
                        vec![0., 0., 0.],
                        vec![gamma, 0., 0.],
                        vec![delta, 1. - delta, 0.],
                    ],
                }
            }
            Timestepper::RK443 => Tableau {
                a: vec![
                    vec![0., 0., 0., 0., 0.],
                    vec![0., 1. / 2., 0., 0., 0.],
                    vec![0., 1. / 6., 1. / 2., 0., 0.],
                    vec![0., -1. / 2., 1. / 2., 1. / 2., 0.],
                    vec![0., 3. / 2., -3. / 2., 1. / 2., 1. / 2.],
                ],
                h: vec![
                    vec![0., 0., 0., 0., 0.],
                    vec![1. / 2., 0., 0., 0., 0.],
                    vec![11. / 18., 1. / 18., 0., 0., 0.],
                    vec![5. / 6., -5. / 6., 1. / 2., 0., 0.],
                    vec![1. / 4., 7. / 4., 3. / 4., -7. / 4., 0.],
                ],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tableaus_consistent() {
        for scheme in [Timestepper::RK111, Timestepper::RK222, Timestepper::RK443] {
            let tab = scheme.tableau();
            let s = tab.stages();
            for i in 1..=s {
                // constant diagonal
                assert!((tab.a[i][i] - tab.diagonal()).abs() < 1e-14);
                // implicit and explicit stages at the same time
                let sum_a: f64 = tab.a[i].iter().sum();
                let sum_h: f64 = tab.h[i].iter().sum();
                assert!((sum_a - sum_h).abs() < 1e-14, "{:?}", scheme);
            }
            let sum_last: f64 = tab.a[s].iter().sum();
            assert!((sum_last - 1.).abs() < 1e-14);
        }
    }

    /// Scalar test equation dx/dt = -lam x + mu x with implicit lam, explicit mu
    #[test]
    fn test_convergence_order() {
        let (lam, mu) = (1.0, 0.5);
        let exact = (-(lam - mu) * 1.0_f64).exp();
        for (scheme, order) in [
            (Timestepper::RK111, 1.),
            (Timestepper::RK222, 2.),
            (Timestepper::RK443, 3.),
        ] {
            let tab = scheme.tableau();
            let err = |n: usize| {
                let dt = 1. / n as f64;
                let mut x = 1.;
                for _ in 0..n {
                    let mut xs = vec![x];
                    for i in 1..=tab.stages() {
                        let mut rhs = x;
                        for j in 0..i {
                            rhs += dt * (tab.h[i][j] * mu * xs[j] - tab.a[i][j] * lam * xs[j]);
                        }
                        xs.push(rhs / (1. + dt * tab.a[i][i] * lam));
                    }
                    x = xs[tab.stages()];
                }
                (x - exact).abs()
            };
            let rate = (err(20) / err(40)).log2();
            assert!(rate > order - 0.3, "{:?}: rate {}", scheme, rate);
        }
    }
}
