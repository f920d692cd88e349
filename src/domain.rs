//! Two dimensional domain: periodic in x, wall bounded in z
use crate::bases::{Base, BaseBasics, Chebyshev, Fourier};
use ndarray::prelude::*;
use ndarray::Data;
use num_complex::Complex;

/// Grid size of the 3/2 rule
fn padded_size(n: usize) -> usize {
    (3 * n + 1) / 2
}

/// Product of a Fourier basis (x) and a Chebyshev basis (z)
///
/// Fields on the domain live either in physical space, shape (nx, nz),
/// or in mixed spectral space, shape (nx / 2 + 1, nz): Fourier modes
/// along x and grid values along z.
///
/// Nonlinear products are formed on the padded grid, 3/2 times finer in
/// both directions, see [`Domain::backward_padded`] and
/// [`Domain::forward_padded`].
#[derive(Clone)]
pub struct Domain {
    /// Horizontal basis
    pub x_basis: Fourier,
    /// Vertical basis
    pub z_basis: Chebyshev,
    x_pad: Fourier,
    z_pad: Chebyshev,
}

impl Domain {
    /// Return new domain
    pub fn new(x_basis: Fourier, z_basis: Chebyshev) -> Self {
        let x_pad = Fourier::new(padded_size(x_basis.n), x_basis.interval());
        let z_pad = Chebyshev::new(padded_size(z_basis.n), z_basis.interval());
        Domain {
            x_basis,
            z_basis,
            x_pad,
            z_pad,
        }
    }

    /// Grid coordinates along axis
    pub fn grid(&self, axis: usize) -> &Array1<f64> {
        match axis {
            0 => &self.x_basis.x,
            _ => &self.z_basis.x,
        }
    }

    /// Shape in physical space
    pub fn shape_phys(&self) -> [usize; 2] {
        [self.x_basis.len_phys(), self.z_basis.len_phys()]
    }

    /// Shape in spectral space
    pub fn shape_spec(&self) -> [usize; 2] {
        [self.x_basis.len_spec(), self.z_basis.len_spec()]
    }

    /// Shape of the padded grid in physical space
    pub fn shape_padded(&self) -> [usize; 2] {
        [self.x_pad.len_phys(), self.z_pad.len_phys()]
    }

    /// Return array of enum Base
    pub fn bases(&self) -> [Base; 2] {
        [
            Base::from(self.x_basis.clone()),
            Base::from(self.z_basis.clone()),
        ]
    }

    /// Return ndarray with shape of physical space
    pub fn ndarr_phys(&self) -> Array2<f64> {
        Array2::zeros(self.shape_phys())
    }

    /// Return ndarray with shape of spectral space
    pub fn ndarr_spec(&self) -> Array2<Complex<f64>> {
        Array2::zeros(self.shape_spec())
    }

    /// Physical space --> spectral space
    pub fn forward<S: Data<Elem = f64>>(&mut self, v: &ArrayBase<S, Ix2>) -> Array2<Complex<f64>> {
        let mut vhat = self.ndarr_spec();
        self.x_basis.forward(v, &mut vhat);
        vhat
    }

    /// Spectral space --> physical space
    pub fn backward<S: Data<Elem = Complex<f64>>>(
        &mut self,
        vhat: &ArrayBase<S, Ix2>,
    ) -> Array2<f64> {
        let mut v = self.ndarr_phys();
        self.x_basis.backward(vhat, &mut v);
        v
    }

    /// Spectral space --> physical space on the padded grid
    ///
    /// Fourier modes are padded with zeros, the polynomial in z is
    /// evaluated on the finer Chebyshev grid.
    pub fn backward_padded<S: Data<Elem = Complex<f64>>>(
        &mut self,
        vhat: &ArrayBase<S, Ix2>,
    ) -> Array2<f64> {
        let nz = self.z_basis.len_phys();
        let mut vhat_pad = Array2::<Complex<f64>>::zeros((self.x_pad.len_spec(), nz));
        self.x_basis.copy_modes(vhat, &mut vhat_pad);
        let mut v = Array2::<f64>::zeros((self.x_pad.len_phys(), nz));
        self.x_pad.backward(&vhat_pad, &mut v);
        self.z_basis.resample(&mut self.z_pad, &v)
    }

    /// Physical space on the padded grid --> spectral space
    ///
    /// Chebyshev coefficients and Fourier modes beyond the resolution of
    /// the domain are discarded.
    pub fn forward_padded<S: Data<Elem = f64>>(
        &mut self,
        v: &ArrayBase<S, Ix2>,
    ) -> Array2<Complex<f64>> {
        let nz = self.z_basis.len_phys();
        let v_coarse = self.z_pad.resample(&mut self.z_basis, v);
        let mut vhat_pad = Array2::<Complex<f64>>::zeros((self.x_pad.len_spec(), nz));
        self.x_pad.forward(&v_coarse, &mut vhat_pad);
        let mut vhat = self.ndarr_spec();
        self.x_basis.copy_modes(&vhat_pad, &mut vhat);
        vhat
    }

    /// Volume weighted average of data in physical space
    pub fn volume_average<S: Data<Elem = f64>>(&self, v: &ArrayBase<S, Ix2>) -> f64 {
        let (a, b) = self.z_basis.interval();
        let avg_x = v.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(v.shape()[1]));
        avg_x.dot(self.z_basis.weights()) / (b - a)
    }
}
