//! # Calculate convective terms u*dvdx + w*dvdz
//!
//! With dealiasing, velocities and derivatives are evaluated on the grid
//! padded by the 3/2 rule, the product is formed there and transformed
//! back with the modes beyond the domain resolution discarded.
use crate::field::Field2;
use ndarray::Array2;
use num_complex::Complex;

/// Calculate u*dvdx
///
/// # Input
///
///    *field*: Field2
///        Contains field variable vhat in spectral space
///
///   *deriv_field*: Field2
///        Work field for the derivative
///
///   *u*:  ndarray (2D)
///        Velocity field in physical space, on the padded grid if
///        `dealias` is true
///
///   *deriv*: [usize; 2]
///        \[1,0\] for partial x, \[0,1\] for partial z
///
///   *dealias*: bool
///        Evaluate the derivative on the padded grid
///
/// # Return
/// Array of u*dvdx term in physical space.
pub fn conv_term(
    field: &Field2,
    deriv_field: &mut Field2,
    u: &Array2<f64>,
    deriv: [usize; 2],
    dealias: bool,
) -> Array2<f64> {
    // dvdx
    deriv_field.vhat.assign(&field.grad(deriv));
    if dealias {
        return u * &deriv_field.backward_padded();
    }
    deriv_field.backward();
    // u*dvdx
    u * &deriv_field.v
}

/// Full advection term u*dvdx + w*dvdz of field in spectral space.
///
/// `u` and `w` live on the padded grid if `dealias` is true, on the
/// grid of the domain otherwise.
pub fn convection(
    field: &Field2,
    deriv_field: &mut Field2,
    u: &Array2<f64>,
    w: &Array2<f64>,
    dealias: bool,
) -> Array2<Complex<f64>> {
    let mut conv = conv_term(field, deriv_field, u, [1, 0], dealias);
    conv += &conv_term(field, deriv_field, w, [0, 1], dealias);
    // -> spectral space
    if dealias {
        return deriv_field.domain.forward_padded(&conv);
    }
    deriv_field.v.assign(&conv);
    deriv_field.forward();
    deriv_field.vhat.to_owned()
}
