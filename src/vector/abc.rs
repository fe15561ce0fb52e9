//! Artificial bee colony.
//!
//! Each iteration runs three phases over a fixed set of bees:
//!
//! * employed bees try a move along one random coordinate, relative to a random partner,
//!   and keep it if it is better;
//! * onlooker bees are redistributed over the known food sources, with probability
//!   proportional to their fitness (the distance of their value to the worst value);
//! * scout bees replace any source that has not improved for more than `abandon_limit`
//!   iterations by a fresh random point.

use crate::bounds::Bounds;
use crate::minimizer::{Minimizer, OptimResult};
use crate::utils::WrappedFunction;
use ndarray::prelude::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

#[derive(Builder, Debug, Clone, PartialEq)]
pub struct BeeColony {
    #[builder(default = "100")]
    pub n_bees: usize,

    /// Iterations without improvement after which a bee scouts a new random position.
    #[builder(default = "20")]
    pub abandon_limit: usize,

    #[builder(default = "500")]
    pub max_iter: usize,
}

#[derive(Debug, Clone)]
struct Bee {
    position: Array1<f64>,
    value: f64,
    stale: usize,
}

struct Best {
    position: Array1<f64>,
    value: f64,
}

impl Best {
    fn offer(&mut self, bee: &Bee) {
        if bee.value < self.value {
            self.position.assign(&bee.position);
            self.value = bee.value;
        }
    }
}

impl BeeColony {
    fn employed_phase<F, R>(
        &self,
        bees: &mut [Bee],
        best: &mut Best,
        func: &mut WrappedFunction<F>,
        bounds: &Bounds,
        rng: &mut R,
    ) where
        F: Fn(ArrayView1<f64>) -> f64,
        R: Rng + ?Sized,
    {
        let n_bees = bees.len();
        for i in 0..n_bees {
            let k = rng.gen_range(0..n_bees);
            let j = rng.gen_range(0..bounds.dim());
            let phi = -1.0 + 2.0 * rng.gen::<f64>();

            let x_ij = bees[i].position[j];
            let x_kj = bees[k].position[j];
            let mut candidate = bees[i].position.clone();
            candidate[j] = x_ij + phi * (x_ij - x_kj);
            bounds.clamp(&mut candidate);

            let value = func.call(candidate.view());
            let bee = &mut bees[i];
            if value < bee.value {
                bee.position = candidate;
                bee.value = value;
                bee.stale = 0;
            } else {
                bee.stale += 1;
            }
            best.offer(bee);
        }
    }

    fn onlooker_phase<R: Rng + ?Sized>(&self, bees: &mut [Bee], rng: &mut R) {
        let worst = bees
            .iter()
            .fold(::std::f64::NEG_INFINITY, |acc, b| acc.max(b.value));
        let fitness = bees.iter().map(|b| {
            let fit = worst - b.value;
            if fit.is_finite() {
                fit
            } else {
                0.0
            }
        });
        // all sources equally bad: nothing to prefer
        let dist = match WeightedIndex::new(fitness) {
            Ok(dist) => dist,
            Err(_) => return,
        };
        let chosen: Vec<(Array1<f64>, f64)> = (0..bees.len())
            .map(|_| {
                let source = &bees[dist.sample(rng)];
                (source.position.clone(), source.value)
            })
            .collect();
        for (bee, (position, value)) in bees.iter_mut().zip(chosen) {
            bee.position = position;
            bee.value = value;
        }
    }

    fn scout_phase<F, R>(
        &self,
        bees: &mut [Bee],
        best: &mut Best,
        func: &mut WrappedFunction<F>,
        bounds: &Bounds,
        rng: &mut R,
    ) where
        F: Fn(ArrayView1<f64>) -> f64,
        R: Rng + ?Sized,
    {
        for bee in bees.iter_mut().filter(|b| b.stale > self.abandon_limit) {
            bee.position = bounds.sample(rng);
            bee.value = func.call(bee.position.view());
            bee.stale = 0;
            best.offer(bee);
        }
    }
}

impl Minimizer for BeeColony {
    fn minimize<F, R>(&self, func: F, bounds: &Bounds, rng: &mut R) -> OptimResult
    where
        F: Fn(ArrayView1<f64>) -> f64,
        R: Rng + ?Sized,
    {
        let mut func = WrappedFunction::new(func);
        let mut bees: Vec<Bee> = (0..self.n_bees.max(2))
            .map(|_| {
                let position = bounds.sample(rng);
                let value = func.call(position.view());
                Bee {
                    position,
                    value,
                    stale: 0,
                }
            })
            .collect();

        let mut best = Best {
            position: bees[0].position.clone(),
            value: bees[0].value,
        };
        for bee in &bees {
            best.offer(bee);
        }

        for _ in 0..self.max_iter {
            self.employed_phase(&mut bees, &mut best, &mut func, bounds, rng);
            self.onlooker_phase(&mut bees, rng);
            self.scout_phase(&mut bees, &mut best, &mut func, bounds, rng);
        }

        OptimResult {
            minimum: best.position,
            minimum_value: best.value,
            f_evals: func.num,
            iterations: self.max_iter,
        }
    }
}
