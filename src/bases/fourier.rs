//! # Fourier
//! Real-to-complex transform of ndarrays from physical space to fourier
//! spectral space and vice versa, along the first axis.
//!
//! The forward transform is normalized, i.e. the zeroth mode is the mean
//! of the data. Coefficient amplitudes are therefore independent of the
//! grid size, which lets modes be copied between resolutions.
use super::BaseBasics;
use ndarray::prelude::*;
use ndarray::{Data, DataMut};
use ndrustfft::{ndfft_r2c_par, ndifft_r2c_par, R2cFftHandler};
use num_complex::Complex;
use std::f64::consts::PI;

/// # Periodic basis of complex exponentials
pub struct Fourier {
    /// Number of grid points
    pub n: usize,
    /// Number of (non-negative) modes, n / 2 + 1
    pub m: usize,
    /// Grid points in physical space
    pub x: Array1<f64>,
    /// Wavenumbers 2 pi k / length
    pub k: Array1<f64>,
    interval: (f64, f64),
    fft_handler: R2cFftHandler<f64>,
}

impl Clone for Fourier {
    fn clone(&self) -> Self {
        Fourier::new(self.n, self.interval)
    }
}

impl Fourier {
    /// Creates a new basis on a periodic interval.
    ///
    /// # Arguments
    /// * `n` - Number of grid points
    /// * `interval` - (start, end), end is not part of the grid
    ///
    /// # Example
    /// ```
    /// use rbc_quickstart::bases::Fourier;
    /// let fourier = Fourier::new(16, (0., 4.));
    /// assert_eq!(fourier.m, 9);
    /// ```
    pub fn new(n: usize, interval: (f64, f64)) -> Self {
        let length = interval.1 - interval.0;
        let x = Array1::from_iter((0..n).map(|i| interval.0 + length * i as f64 / n as f64));
        let m = n / 2 + 1;
        let k = Array1::from_iter((0..m).map(|i| 2. * PI * i as f64 / length));
        Fourier {
            n,
            m,
            x,
            k,
            interval,
            fft_handler: R2cFftHandler::<f64>::new(n),
        }
    }

    /// Transform: physical space --> fourier space along axis 0
    pub fn forward<S1, S2>(&mut self, input: &ArrayBase<S1, Ix2>, output: &mut ArrayBase<S2, Ix2>)
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = Complex<f64>> + DataMut,
    {
        let mut buffer = input.to_owned();
        ndfft_r2c_par(
            &mut buffer,
            &mut output.view_mut(),
            &mut self.fft_handler,
            0,
        );
        let norm = 1. / self.n as f64;
        output.mapv_inplace(|v| v * norm);
    }

    /// Transform: fourier space --> physical space along axis 0
    pub fn backward<S1, S2>(&mut self, input: &ArrayBase<S1, Ix2>, output: &mut ArrayBase<S2, Ix2>)
    where
        S1: Data<Elem = Complex<f64>>,
        S2: Data<Elem = f64> + DataMut,
    {
        let mut buffer = input.to_owned();
        ndifft_r2c_par(
            &mut buffer,
            &mut output.view_mut(),
            &mut self.fft_handler,
            0,
        );
        // undo the 1/n of the inverse, the forward is normalized already
        let n = self.n as f64;
        output.mapv_inplace(|v| v * n);
    }

    /// Copy modes from or to another resolution of this basis.
    ///
    /// Rows beyond the resolved modes are zero. The Nyquist mode of an
    /// even grid is not copied.
    pub fn copy_modes<S1, S2>(&self, input: &ArrayBase<S1, Ix2>, output: &mut ArrayBase<S2, Ix2>)
    where
        S1: Data<Elem = Complex<f64>>,
        S2: Data<Elem = Complex<f64>> + DataMut,
    {
        let resolved = if self.n % 2 == 0 { self.m - 1 } else { self.m };
        let rows = resolved.min(input.shape()[0]).min(output.shape()[0]);
        output.fill(Complex::new(0., 0.));
        output
            .slice_mut(s![..rows, ..])
            .assign(&input.slice(s![..rows, ..]));
    }

    /// Differentiate n_times along axis 0 (performed in spectral space)
    ///
    /// The Nyquist mode of even grids is dropped for odd derivatives.
    pub fn differentiate<S>(&self, input: &ArrayBase<S, Ix2>, n_times: usize) -> Array2<Complex<f64>>
    where
        S: Data<Elem = Complex<f64>>,
    {
        let mut output = input.to_owned();
        if n_times == 0 {
            return output;
        }
        for (mut row, ki) in output.outer_iter_mut().zip(self.k.iter()) {
            let factor = Complex::new(0., *ki).powu(n_times as u32);
            row.mapv_inplace(|v| v * factor);
        }
        if n_times % 2 == 1 && self.n % 2 == 0 {
            output.row_mut(self.m - 1).fill(Complex::new(0., 0.));
        }
        output
    }
}

impl BaseBasics for Fourier {
    fn len_phys(&self) -> usize {
        self.n
    }

    fn len_spec(&self) -> usize {
        self.m
    }

    fn coords(&self) -> &Array1<f64> {
        &self.x
    }

    fn interval(&self) -> (f64, f64) {
        self.interval
    }

    fn grid_spacing(&self) -> Array1<f64> {
        let dx = (self.interval.1 - self.interval.0) / self.n as f64;
        Array1::from_elem(self.n, dx)
    }
}
