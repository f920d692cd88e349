//! # Collection of linear algebra Solver
//!
//! The operators of the convection problem are dense and real
//! valued per Fourier mode, while the right hand sides are complex.
pub mod lu;
pub mod matvec;
pub use lu::Lu;
pub use matvec::matvec;
use ndarray::{ArrayBase, Data, DataMut};
use num_complex::Complex;
use std::ops::{Div, Mul, SubAssign};

/// Scalars a real valued operator can act on
pub trait SolverScalar:
    Copy
    + num_traits::Zero
    + SubAssign
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
    + Send
    + Sync
{
}

impl SolverScalar for f64 {}
impl SolverScalar for Complex<f64> {}

/// Solve linear algebraix systems of the form: M x = b.
pub trait Solve<A, D> {
    /// Solves M x = b along axis, output (x) matches input (b)
    /// in type and size.
    fn solve<S1, S2>(&self, input: &ArrayBase<S1, D>, output: &mut ArrayBase<S2, D>, axis: usize)
    where
        S1: Data<Elem = A>,
        S2: Data<Elem = A> + DataMut;
}
