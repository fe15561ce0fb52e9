//! Differential evolution, in its classic `rand/1/bin` form.
//!
//! For every agent `x`, three other agents `a`, `b` and `c` are picked at random and a
//! trial vector is built coordinate-wise: with probability `cr` (and always for one forced
//! coordinate) the trial takes `a + f * (b - c)`, otherwise it keeps `x`. The trial replaces
//! `x` if it is strictly better.

use crate::bounds::Bounds;
use crate::minimizer::{Minimizer, OptimResult};
use crate::utils::WrappedFunction;
use ndarray::prelude::*;
use rand::seq::index;
use rand::Rng;

/// Fewest agents that still allow three donors distinct from the current agent.
const MIN_AGENTS: usize = 4;

#[derive(Builder, Debug, Clone, PartialEq)]
pub struct DifferentialEvolution {
    /// Population size. Raised to 4 if smaller.
    #[builder(default = "100")]
    pub n_agents: usize,

    /// Differential weight, usually in `[0, 2]`.
    #[builder(default = "0.8")]
    pub f: f64,

    /// Crossover probability.
    #[builder(default = "0.9")]
    pub cr: f64,

    #[builder(default = "500")]
    pub max_iter: usize,
}

impl DifferentialEvolution {
    /// Three distinct agent indices, none equal to `current`.
    fn donors<R: Rng + ?Sized>(rng: &mut R, n_agents: usize, current: usize) -> [usize; 3] {
        let picked = index::sample(rng, n_agents - 1, 3);
        let skip = |i: usize| if i >= current { i + 1 } else { i };
        [skip(picked.index(0)), skip(picked.index(1)), skip(picked.index(2))]
    }
}

impl Minimizer for DifferentialEvolution {
    fn minimize<F, R>(&self, func: F, bounds: &Bounds, rng: &mut R) -> OptimResult
    where
        F: Fn(ArrayView1<f64>) -> f64,
        R: Rng + ?Sized,
    {
        let mut func = WrappedFunction::new(func);
        let n = bounds.dim();
        let n_agents = self.n_agents.max(MIN_AGENTS);

        let mut agents: Vec<Array1<f64>> = (0..n_agents).map(|_| bounds.sample(rng)).collect();
        let mut values: Vec<f64> = agents.iter().map(|a| func.call(a.view())).collect();
        let mut best = (0..n_agents).fold(0, |acc, i| if values[i] < values[acc] { i } else { acc });

        for _ in 0..self.max_iter {
            for i in 0..n_agents {
                let [a, b, c] = Self::donors(rng, n_agents, i);
                let forced = rng.gen_range(0..n);
                let mut y = agents[i].clone();
                for k in 0..n {
                    if k == forced || rng.gen::<f64>() < self.cr {
                        y[k] = agents[a][k] + self.f * (agents[b][k] - agents[c][k]);
                    }
                }
                bounds.clamp(&mut y);

                let value = func.call(y.view());
                if value < values[i] {
                    agents[i] = y;
                    values[i] = value;
                    if value < values[best] {
                        best = i;
                    }
                }
            }
        }

        OptimResult {
            minimum: agents.swap_remove(best),
            minimum_value: values[best],
            f_evals: func.num,
            iterations: self.max_iter,
        }
    }
}
