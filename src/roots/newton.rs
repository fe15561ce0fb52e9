//! Newton's method for square systems `f: R^n -> R^n`.
//!
//! By default the simplified variant is used: the Jacobian is factorized once at the
//! initial guess and reused for every step. This is enough to sharpen a candidate that is
//! already close to a root, and it needs a single Jacobian evaluation.
//!
//! # Examples
//!
//! ```
//! # extern crate ndarray;
//! # extern crate heuristic;
//! # use ndarray::prelude::*;
//! # use heuristic::roots::{NewtonBuilder, NoJacobian, Refiner};
//!
//! let system = |x: ArrayView1<f64>| arr1(&[(1.0 - x[1]) * x[0], x[1] * (2.0 - x[0])]);
//! let newton = NewtonBuilder::default().precision(1e-10).build().unwrap();
//! let root = newton
//!     .refine(&system, None::<NoJacobian>, arr1(&[2.2, 0.9]).view())
//!     .unwrap();
//! println!("root: {}", root);
//! ```

use crate::error::{Error, Result};
use crate::utils::{approx_jacobian, squared_norm};
use ndarray::prelude::*;

/// Pivots smaller than this, relative to the largest entry of the matrix, count as zero.
const SINGULAR_RATIO: f64 = 1e-14;

/// Placeholder type for "no analytic Jacobian", e.g. `None::<NoJacobian>`.
pub type NoJacobian = fn(ArrayView1<f64>) -> Array2<f64>;

/// Sharpens an approximate root of a square system.
pub trait Refiner {
    /// Starts at `x0` and returns a better approximation of a nearby root. When `jacobian`
    /// is `None` it is approximated by finite differences.
    fn refine<F, J>(&self, system: F, jacobian: Option<J>, x0: ArrayView1<f64>) -> Result<Array1<f64>>
    where
        F: Fn(ArrayView1<f64>) -> Array1<f64>,
        J: Fn(ArrayView1<f64>) -> Array2<f64>;
}

#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Newton {
    /// Target for the euclidean norm of the residual.
    #[builder(default = "1e-7")]
    pub precision: f64,

    #[builder(default = "1000")]
    pub max_iter: usize,

    /// Keep the Jacobian of the initial guess instead of recomputing it at every step.
    #[builder(default = "true")]
    pub simplified: bool,
}

/// LU factorization with partial pivoting, stored in place.
#[derive(Debug)]
struct Lu {
    lu: Array2<f64>,
    perm: Vec<usize>,
}

impl Lu {
    /// Factorizes the square matrix `a`.
    fn new(mut a: Array2<f64>) -> Result<Lu> {
        let n = a.nrows();
        let scale = a.fold(0f64, |acc, &x| acc.max(x.abs()));
        if !scale.is_finite() || scale == 0.0 {
            return Err(Error::SingularJacobian);
        }

        let mut perm: Vec<usize> = (0..n).collect();
        for col in 0..n {
            let pivot_row = (col..n).fold(col, |best, row| {
                if a[[row, col]].abs() > a[[best, col]].abs() {
                    row
                } else {
                    best
                }
            });
            if a[[pivot_row, col]].abs() < SINGULAR_RATIO * scale {
                return Err(Error::SingularJacobian);
            }
            if pivot_row != col {
                for j in 0..n {
                    a.swap([col, j], [pivot_row, j]);
                }
                perm.swap(col, pivot_row);
            }
            for row in (col + 1)..n {
                let factor = a[[row, col]] / a[[col, col]];
                a[[row, col]] = factor;
                for j in (col + 1)..n {
                    let val = a[[col, j]];
                    a[[row, j]] -= factor * val;
                }
            }
        }
        Ok(Lu { lu: a, perm })
    }

    /// Solves `A x = b`.
    fn solve(&self, b: ArrayView1<f64>) -> Array1<f64> {
        let n = self.perm.len();
        let mut x: Array1<f64> = self.perm.iter().map(|&p| b[p]).collect();
        for i in 0..n {
            for j in 0..i {
                x[i] -= self.lu[[i, j]] * x[j];
            }
        }
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                x[i] -= self.lu[[i, j]] * x[j];
            }
            x[i] /= self.lu[[i, i]];
        }
        x
    }
}

impl Newton {
    fn factorize<F, J>(&self, system: &F, jacobian: Option<&J>, x: ArrayView1<f64>) -> Result<Lu>
    where
        F: Fn(ArrayView1<f64>) -> Array1<f64>,
        J: Fn(ArrayView1<f64>) -> Array2<f64>,
    {
        let jac = match jacobian {
            Some(jacobian) => jacobian(x),
            None => approx_jacobian(system, x),
        };
        let n = x.len();
        if jac.dim() != (n, n) {
            return Err(Error::JacobianShape {
                rows: jac.nrows(),
                cols: jac.ncols(),
                expected_rows: n,
                expected_cols: n,
            });
        }
        Lu::new(jac)
    }
}

impl Refiner for Newton {
    fn refine<F, J>(&self, system: F, jacobian: Option<J>, x0: ArrayView1<f64>) -> Result<Array1<f64>>
    where
        F: Fn(ArrayView1<f64>) -> Array1<f64>,
        J: Fn(ArrayView1<f64>) -> Array2<f64>,
    {
        let n = x0.len();
        let mut x = x0.to_owned();
        let mut fx = system(x.view());
        if fx.len() != n {
            return Err(Error::SystemDimension {
                expected: n,
                got: fx.len(),
            });
        }
        let mut lu = self.factorize(&system, jacobian.as_ref(), x.view())?;
        let tol = self.precision * self.precision;

        let mut iterations = 0;
        while squared_norm(fx.view()) > tol && iterations < self.max_iter {
            let step = lu.solve(fx.view());
            x -= &step;
            iterations += 1;
            if x.iter().any(|xi| !xi.is_finite()) {
                return Err(Error::NonFinite { iterations });
            }
            fx = system(x.view());
            if !self.simplified {
                lu = self.factorize(&system, jacobian.as_ref(), x.view())?;
            }
        }
        log::trace!("newton stopped after {} iterations at {}", iterations, x);
        Ok(x)
    }
}
