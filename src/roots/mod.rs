//! Finding all roots of a vector function inside a box.
//!
//! [`RootFinder`] combines the pieces of this crate into one pipeline:
//!
//! 1. [`Tuner`] picks particle swarm hyperparameters for the squared residual of the system;
//! 2. [`Bisection`] runs the tuned swarm over the box and recursively over its halves;
//! 3. [`deduplicate`] merges candidates closer than `location_precision` on every axis;
//! 4. if the system is square, [`Newton`] sharpens every candidate to `precision`. A
//!    candidate is kept as it is when this fails or does not reduce its residual.
//!
//! No assumption is made about `f` beyond being defined on the box. The search is a
//! heuristic: it stops at `max_depth` and at `location_precision`, so roots can be missed.
//!
//! # Examples
//!
//! ```
//! # extern crate ndarray;
//! # extern crate heuristic;
//! # use ndarray::prelude::*;
//! # use heuristic::roots::{NoJacobian, RootFinderBuilder, TunerBuilder};
//!
//! let system = |x: ArrayView1<f64>| arr1(&[x[0] * x[0] - 1.0]);
//! let finder = RootFinderBuilder::default()
//!     .location_precision(0.1)
//!     .tuner(TunerBuilder::default().max_iter(20).n_particles(50).swarm_iter(5).build().unwrap())
//!     .build()
//!     .unwrap();
//! let roots = finder
//!     .find_roots_seeded(&system, None::<NoJacobian>, arr1(&[-2.0]).view(), arr1(&[2.0]).view(), 7)
//!     .unwrap();
//! println!("roots: {:?}", roots);
//! ```

mod newton;
mod search;
mod tuner;

pub use self::newton::{Newton, NewtonBuilder, NoJacobian, Refiner};
pub use self::search::{is_root, search_root, Bisection};
pub use self::tuner::{Tuner, TunerBuilder};

use crate::bounds::Bounds;
use crate::error::{positive, Error, Result};
use crate::utils::{residual_objective, squared_norm};
use ndarray::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fewest particles used by the swarm of every root search.
pub const MIN_PARTICLES: usize = 500;

#[derive(Builder, Debug, Clone, PartialEq)]
pub struct RootFinder {
    /// Candidates closer than this on every axis are the same root. Boxes thinner than this
    /// on some axis are not searched.
    #[builder(default = "0.5")]
    pub location_precision: f64,

    /// A point is a root if every component of the system is at most this in absolute value.
    #[builder(default = "0.1")]
    pub root_recognition: f64,

    /// Particles of the root searching swarm. Never less than [`MIN_PARTICLES`].
    #[builder(default = "MIN_PARTICLES")]
    pub n_particles: usize,

    /// Iterations of the root searching swarm.
    #[builder(default = "100")]
    pub max_iter: usize,

    /// Deepest level of bisection. With 0 only the whole box is searched.
    #[builder(default = "64")]
    pub max_depth: usize,

    /// Target residual norm of the Newton refinement.
    #[builder(default = "1e-7")]
    pub precision: f64,

    #[builder(default = "1000")]
    pub refine_max_iter: usize,

    #[builder(default = "Tuner::default()")]
    pub tuner: Tuner,
}

impl RootFinder {
    /// Searches the box `[low, high)` for roots of `system` and returns them refined where
    /// possible. `jacobian` is only used for square systems; when it is `None` a finite
    /// difference approximation takes its place.
    ///
    /// Fails before any search if the bounds are malformed, the parameters are not positive
    /// or `system`/`jacobian` return vectors or matrices of inconsistent size.
    pub fn find_roots<F, J, R>(
        &self,
        system: F,
        jacobian: Option<J>,
        low: ArrayView1<f64>,
        high: ArrayView1<f64>,
        rng: &mut R,
    ) -> Result<Vec<Array1<f64>>>
    where
        F: Fn(ArrayView1<f64>) -> Array1<f64>,
        J: Fn(ArrayView1<f64>) -> Array2<f64>,
        R: Rng + ?Sized,
    {
        let (bounds, m) = self.validate(&system, jacobian.as_ref(), low, high)?;
        let candidates = self.candidates(&system, &bounds, rng)?;
        if m != bounds.dim() {
            return Ok(candidates);
        }
        let newton = Newton {
            precision: self.precision,
            max_iter: self.refine_max_iter,
            simplified: true,
        };
        Ok(refine_roots(&newton, &system, jacobian, candidates))
    }

    /// [`find_roots`](RootFinder::find_roots) with a generator seeded from `seed`.
    pub fn find_roots_seeded<F, J>(
        &self,
        system: F,
        jacobian: Option<J>,
        low: ArrayView1<f64>,
        high: ArrayView1<f64>,
        seed: u64,
    ) -> Result<Vec<Array1<f64>>>
    where
        F: Fn(ArrayView1<f64>) -> Array1<f64>,
        J: Fn(ArrayView1<f64>) -> Array2<f64>,
    {
        self.find_roots(system, jacobian, low, high, &mut StdRng::seed_from_u64(seed))
    }

    /// The deduplicated roots as found by the swarm, before any refinement.
    pub fn find_roots_unrefined<F, R>(
        &self,
        system: F,
        low: ArrayView1<f64>,
        high: ArrayView1<f64>,
        rng: &mut R,
    ) -> Result<Vec<Array1<f64>>>
    where
        F: Fn(ArrayView1<f64>) -> Array1<f64>,
        R: Rng + ?Sized,
    {
        let (bounds, _) = self.validate(&system, None::<&NoJacobian>, low, high)?;
        self.candidates(&system, &bounds, rng)
    }

    /// Checks the input and returns the search box with the output dimension of `system`.
    fn validate<F, J>(
        &self,
        system: &F,
        jacobian: Option<&J>,
        low: ArrayView1<f64>,
        high: ArrayView1<f64>,
    ) -> Result<(Bounds, usize)>
    where
        F: Fn(ArrayView1<f64>) -> Array1<f64>,
        J: Fn(ArrayView1<f64>) -> Array2<f64>,
    {
        positive("location_precision", self.location_precision)?;
        positive("root_recognition", self.root_recognition)?;
        positive("precision", self.precision)?;
        let bounds = Bounds::new(low.to_owned(), high.to_owned())?;

        let n = bounds.dim();
        let m = system(bounds.low()).len();
        if m == 0 {
            return Err(Error::SystemDimension { expected: 1, got: 0 });
        }
        if let Some(jacobian) = jacobian {
            let (rows, cols) = jacobian(bounds.low()).dim();
            if (rows, cols) != (m, n) {
                return Err(Error::JacobianShape {
                    rows,
                    cols,
                    expected_rows: m,
                    expected_cols: n,
                });
            }
        }
        Ok((bounds, m))
    }

    fn candidates<F, R>(&self, system: &F, bounds: &Bounds, rng: &mut R) -> Result<Vec<Array1<f64>>>
    where
        F: Fn(ArrayView1<f64>) -> Array1<f64>,
        R: Rng + ?Sized,
    {
        let objective = residual_objective(system);
        let mut swarm = self.tuner.tune(&objective, bounds, rng)?;
        swarm.n_particles = self.n_particles.max(MIN_PARTICLES);
        swarm.max_iter = self.max_iter;

        let bisection = Bisection {
            system,
            minimizer: swarm,
            root_recognition: self.root_recognition,
            location_precision: self.location_precision,
            max_depth: self.max_depth,
        };
        let found = bisection.run(bounds, rng);
        let total = found.len();
        let unique = deduplicate(found, self.location_precision);
        log::debug!("{} roots found, {} after merging duplicates", total, unique.len());
        Ok(unique)
    }
}

/// True if `a` and `b` differ by less than `location_precision` on every axis.
pub fn is_same_root(a: ArrayView1<f64>, b: ArrayView1<f64>, location_precision: f64) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(ai, bi)| (ai - bi).abs() < location_precision)
}

/// Drops every root that is the same as an earlier one, keeping first-seen order.
pub fn deduplicate(roots: Vec<Array1<f64>>, location_precision: f64) -> Vec<Array1<f64>> {
    let mut unique: Vec<Array1<f64>> = Vec::with_capacity(roots.len());
    for root in roots {
        if !unique
            .iter()
            .any(|u| is_same_root(u.view(), root.view(), location_precision))
        {
            unique.push(root);
        }
    }
    unique
}

/// Refines every root with `refiner`. A root stays unrefined when refinement fails or
/// ends with a larger residual than it started with.
pub fn refine_roots<Rf, F, J>(
    refiner: &Rf,
    system: F,
    jacobian: Option<J>,
    roots: Vec<Array1<f64>>,
) -> Vec<Array1<f64>>
where
    Rf: Refiner,
    F: Fn(ArrayView1<f64>) -> Array1<f64>,
    J: Fn(ArrayView1<f64>) -> Array2<f64>,
{
    let residual = |x: ArrayView1<f64>| squared_norm(system(x).view());
    roots
        .into_iter()
        .map(|root| match refiner.refine(&system, jacobian.as_ref(), root.view()) {
            Ok(refined) if residual(refined.view()) <= residual(root.view()) => refined,
            Ok(refined) => {
                log::debug!("refining {} ended at {} with a larger residual", root, refined);
                root
            }
            Err(e) => {
                log::debug!("keeping {} unrefined: {}", root, e);
                root
            }
        })
        .collect()
}
