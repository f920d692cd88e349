//! # Bases
//! Collection of basis functions which implement forward/backward transforms,
//! differentiation and other methods to conveniently work in different spaces.
//!
//! Implemented:
//! - Fourier (real-to-complex, periodic direction)
//! - Chebyshev (Gauss-Lobatto collocation, wall-bounded direction)
pub mod chebyshev;
pub mod fourier;
pub use chebyshev::Chebyshev;
use enum_dispatch::enum_dispatch;
pub use fourier::Fourier;
use ndarray::prelude::*;

/// Information every basis can answer, independent of
/// the kind of transform it performs.
#[enum_dispatch]
pub trait BaseBasics {
    /// Size in physical space
    fn len_phys(&self) -> usize;
    /// Size in spectral space
    fn len_spec(&self) -> usize;
    /// Coordinates in physical space
    fn coords(&self) -> &Array1<f64>;
    /// Physical interval (lower, upper)
    fn interval(&self) -> (f64, f64);
    /// Local grid spacing at each grid point
    fn grid_spacing(&self) -> Array1<f64>;
}

/// Enum of all implemented basis functions.
#[enum_dispatch(BaseBasics)]
#[derive(Clone)]
pub enum Base {
    /// Periodic real-to-complex Fourier basis
    Fourier(Fourier),
    /// Chebyshev collocation basis
    Chebyshev(Chebyshev),
}

/// Fourier basis on [0, length) with n grid points
pub fn fourier(n: usize, length: f64) -> Fourier {
    Fourier::new(n, (0., length))
}

/// Chebyshev basis on [lower, upper] with n grid points
pub fn chebyshev(n: usize, interval: (f64, f64)) -> Chebyshev {
    Chebyshev::new(n, interval)
}
