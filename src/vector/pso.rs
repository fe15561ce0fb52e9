//! Particle swarm optimization.
//!
//! A population of particles moves through the box. Every particle is pulled towards
//! the best position it has visited itself (weight `phi_p`) and towards the best position
//! the whole swarm has visited (weight `phi_g`), while keeping a fraction `omega` of its
//! previous velocity. Positions are projected back onto the box after each move.
//!
//! # Examples
//!
//! ```
//! # extern crate ndarray;
//! # extern crate heuristic;
//! # extern crate rand;
//! # use ndarray::prelude::*;
//! # use rand::SeedableRng;
//! # use heuristic::{Bounds, Minimizer};
//! # use heuristic::vector::ParticleSwarmBuilder;
//!
//! let function = |x: ArrayView1<f64>| (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2);
//! let swarm = ParticleSwarmBuilder::default()
//!     .n_particles(100)
//!     .max_iter(50)
//!     .build()
//!     .unwrap();
//! let bounds = Bounds::from_vec(vec![-5.0, -5.0], vec![5.0, 5.0]).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let res = swarm.minimize(&function, &bounds, &mut rng);
//! println!("res: {}", res.minimum);
//! ```

use crate::bounds::Bounds;
use crate::minimizer::{Minimizer, OptimResult};
use crate::utils::WrappedFunction;
use ndarray::prelude::*;
use rand::Rng;

/// The hyperparameters of a swarm run.
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct ParticleSwarm {
    /// Inertia, the share of the previous velocity a particle keeps.
    #[builder(default = "1.0")]
    pub omega: f64,

    /// Attraction towards the particle's own best position.
    #[builder(default = "2.0")]
    pub phi_p: f64,

    /// Attraction towards the swarm's best position.
    #[builder(default = "2.0")]
    pub phi_g: f64,

    /// Scales the velocity before it is added to the position.
    #[builder(default = "0.5")]
    pub learning_rate: f64,

    #[builder(default = "500")]
    pub n_particles: usize,

    #[builder(default = "100")]
    pub max_iter: usize,
}

impl ParticleSwarm {
    fn init_velocity<R: Rng + ?Sized>(&self, bounds: &Bounds, rng: &mut R) -> Array1<f64> {
        bounds
            .width()
            .mapv(|w| (2.0 * rng.gen::<f64>() - 1.0) * w.abs())
    }
}

impl Minimizer for ParticleSwarm {
    fn minimize<F, R>(&self, func: F, bounds: &Bounds, rng: &mut R) -> OptimResult
    where
        F: Fn(ArrayView1<f64>) -> f64,
        R: Rng + ?Sized,
    {
        let mut func = WrappedFunction::new(func);
        let n_particles = self.n_particles.max(1);

        let mut x: Vec<Array1<f64>> = (0..n_particles).map(|_| bounds.sample(rng)).collect();
        let mut v: Vec<Array1<f64>> = (0..n_particles)
            .map(|_| self.init_velocity(bounds, rng))
            .collect();
        let mut p = x.clone();
        let mut p_values: Vec<f64> = x.iter().map(|xi| func.call(xi.view())).collect();

        let best = (0..n_particles).fold(0, |acc, i| {
            if p_values[i] < p_values[acc] {
                i
            } else {
                acc
            }
        });
        let mut g = p[best].clone();
        let mut g_value = p_values[best];

        for _ in 0..self.max_iter {
            for i in 0..n_particles {
                let r_p: f64 = rng.gen();
                let r_g: f64 = rng.gen();
                v[i] *= self.omega;
                v[i].scaled_add(r_p * self.phi_p, &(&p[i] - &x[i]));
                v[i].scaled_add(r_g * self.phi_g, &(&g - &x[i]));

                x[i].scaled_add(self.learning_rate, &v[i]);
                bounds.clamp(&mut x[i]);

                let value = func.call(x[i].view());
                if value < p_values[i] {
                    p[i].assign(&x[i]);
                    p_values[i] = value;
                }
                if value < g_value {
                    g.assign(&x[i]);
                    g_value = value;
                }
            }
        }

        OptimResult {
            minimum: g,
            minimum_value: g_value,
            f_evals: func.num,
            iterations: self.max_iter,
        }
    }
}
