//! Derivative-free heuristic minimizers over bounded boxes and a multi-root finder built on
//! top of them.
//!
//! The [`vector`] module holds four population or sampling based minimizers sharing the
//! [`Minimizer`] trait: particle swarm, local unimodal sampling, differential evolution and
//! an artificial bee colony. The [`roots`] module uses a self-tuned particle swarm and
//! recursive bisection to collect the roots of a vector function inside a box, and
//! optionally sharpens them with Newton's method.
//!
//! All randomness is drawn from a caller supplied [`rand::Rng`], so runs with a seeded
//! generator are reproducible. Progress is reported through the [`log`] facade.
//!
//! # Examples
//!
//! ```
//! # extern crate ndarray;
//! # extern crate heuristic;
//! # extern crate rand;
//! # use ndarray::prelude::*;
//! # use rand::SeedableRng;
//! # use rand::rngs::StdRng;
//! use heuristic::{Bounds, Minimizer};
//! use heuristic::vector::DifferentialEvolutionBuilder;
//!
//! let de = DifferentialEvolutionBuilder::default().max_iter(200).build().unwrap();
//! let bounds = Bounds::from_vec(vec![-5.0, -5.0], vec![5.0, 5.0]).unwrap();
//! let res = de.minimize(
//!     |x: ArrayView1<f64>| (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2),
//!     &bounds,
//!     &mut StdRng::seed_from_u64(0),
//! );
//! println!("{:?}", res);
//! ```

#[macro_use]
extern crate derive_builder;

mod bounds;
mod error;
mod minimizer;

pub mod roots;
pub mod utils;
pub mod vector;

pub use crate::bounds::Bounds;
pub use crate::error::{Error, Result};
pub use crate::minimizer::{Minimizer, OptimResult};
pub use crate::roots::{RootFinder, RootFinderBuilder};
