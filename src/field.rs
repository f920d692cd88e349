//! # Two dimensional field on the convection domain
use crate::domain::Domain;
use crate::Real;
use ndarray::prelude::*;
use num_complex::Complex;

/// Field struct is the backbone of the solver
///
/// v: ndarray
///
///   Holds data in physical space
///
/// vhat: ndarray
///
///   Holds data in spectral space (Fourier modes in x, grid values in z)
///
/// Field is derived from a domain, which defines forward / backward
/// transforms and derivatives.
///
/// ```
/// use rbc_quickstart::bases::{chebyshev, fourier};
/// use rbc_quickstart::{Domain, Field2};
/// let domain = Domain::new(fourier(8, 4.), chebyshev(5, (-0.5, 0.5)));
/// let mut field = Field2::new(&domain);
/// field.v.fill(1.);
/// field.forward();
/// assert!((field.vhat[[0, 0]].re - 1.).abs() < 1e-12);
/// ```
#[derive(Clone)]
pub struct Field2 {
    /// Domain
    pub domain: Domain,
    /// Field in physical space
    pub v: Array2<Real>,
    /// Field in spectral space
    pub vhat: Array2<Complex<Real>>,
}

impl Field2 {
    /// Returns field of zeros
    pub fn new(domain: &Domain) -> Self {
        Field2 {
            domain: domain.clone(),
            v: domain.ndarr_phys(),
            vhat: domain.ndarr_spec(),
        }
    }

    /// Forward transform 2d
    pub fn forward(&mut self) {
        self.domain.x_basis.forward(&self.v, &mut self.vhat);
    }

    /// Backward transform 2d
    pub fn backward(&mut self) {
        self.domain.x_basis.backward(&self.vhat, &mut self.v);
    }

    /// Gradient in spectral space
    ///
    /// # Arguments
    /// * `deriv` - \[1,0\] for partial x, \[0,1\] for partial z, ...
    pub fn grad(&self, deriv: [usize; 2]) -> Array2<Complex<Real>> {
        let dx = self.domain.x_basis.differentiate(&self.vhat, deriv[0]);
        self.domain.z_basis.differentiate(&dx, deriv[1])
    }

    /// Values of vhat on the padded grid, see [`Domain::backward_padded`]
    pub fn backward_padded(&mut self) -> Array2<Real> {
        self.domain.backward_padded(&self.vhat)
    }
}
