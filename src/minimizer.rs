//! This module provides the base framework for all bounded minimizers present in this crate,
//! such as the base trait and return type.
use crate::bounds::Bounds;
use ndarray::prelude::*;
use rand::Rng;

/// A minimization result, storing various details of the run and the final results.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimResult {
    /// The parameter values with the smallest function value found. Always inside the bounds.
    pub minimum: Array1<f64>,
    /// The function value at `minimum`.
    pub minimum_value: f64,
    /// The number of function evaluations performed.
    pub f_evals: usize,
    /// The number of iterations run.
    pub iterations: usize,
}

/// A general bounded minimizer trait.
///
/// Implementations never request a gradient, so `func` may be non-smooth, non-convex or
/// discontinuous. All randomness is drawn from `rng`, which makes a run reproducible for a
/// seeded generator.
pub trait Minimizer {
    /// Minimizes the scalar value returned by `func` by exploring the box `bounds`.
    fn minimize<F, R>(&self, func: F, bounds: &Bounds, rng: &mut R) -> OptimResult
    where
        F: Fn(ArrayView1<f64>) -> f64,
        R: Rng + ?Sized;
}

impl<'a, M: Minimizer> Minimizer for &'a M {
    fn minimize<F, R>(&self, func: F, bounds: &Bounds, rng: &mut R) -> OptimResult
    where
        F: Fn(ArrayView1<f64>) -> f64,
        R: Rng + ?Sized,
    {
        (**self).minimize(func, bounds, rng)
    }
}
