//! Meta-optimization of the particle swarm.
//!
//! The swarm has four real hyperparameters: `omega`, `phi_p`, `phi_g` and `learning_rate`.
//! [`Tuner`] treats them as a point of a 4-dimensional box and lets local unimodal sampling
//! search that box. Evaluating a point means running a short swarm with those
//! hyperparameters on the real objective and reading off the best value it reaches.
//!
//! Every step of the outer search is a full swarm run, so tuning is expensive. The root
//! finder runs it once per call and reuses the result for all sub-boxes.

use crate::bounds::Bounds;
use crate::error::Result;
use crate::minimizer::Minimizer;
use crate::vector::{LocalUnimodalSampling, ParticleSwarm};
use ndarray::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;

const OMEGA_MAX: f64 = 2.0;
const PHI_MAX: f64 = 4.0;
const LEARNING_RATE_MIN: f64 = 0.01;
const LEARNING_RATE_MAX: f64 = 1.0;
const XTOL: f64 = 0.01;
const MAX_ITER: usize = 1000;
const N_PARTICLES: usize = 1000;
const SWARM_ITER: usize = 10;

#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Tuner {
    /// `omega` is searched in `[-omega_max, omega_max]`.
    #[builder(default = "OMEGA_MAX")]
    pub omega_max: f64,

    /// Both attraction weights are searched in `[-phi_max, phi_max]`.
    #[builder(default = "PHI_MAX")]
    pub phi_max: f64,

    #[builder(default = "LEARNING_RATE_MIN")]
    pub learning_rate_min: f64,

    #[builder(default = "LEARNING_RATE_MAX")]
    pub learning_rate_max: f64,

    /// Width of the hyperparameter neighbourhood at which the outer search stops.
    #[builder(default = "XTOL")]
    pub xtol: f64,

    /// Iteration budget of the outer search.
    #[builder(default = "MAX_ITER")]
    pub max_iter: usize,

    /// Particles of every inner swarm run.
    #[builder(default = "N_PARTICLES")]
    pub n_particles: usize,

    /// Iterations of every inner swarm run.
    #[builder(default = "SWARM_ITER")]
    pub swarm_iter: usize,
}

impl Default for Tuner {
    fn default() -> Self {
        Tuner {
            omega_max: OMEGA_MAX,
            phi_max: PHI_MAX,
            learning_rate_min: LEARNING_RATE_MIN,
            learning_rate_max: LEARNING_RATE_MAX,
            xtol: XTOL,
            max_iter: MAX_ITER,
            n_particles: N_PARTICLES,
            swarm_iter: SWARM_ITER,
        }
    }
}

impl Tuner {
    /// The box `(omega, phi_p, phi_g, learning_rate)` searched by the outer loop.
    pub fn search_space(&self) -> Result<Bounds> {
        Bounds::from_vec(
            vec![
                -self.omega_max,
                -self.phi_max,
                -self.phi_max,
                self.learning_rate_min,
            ],
            vec![
                self.omega_max,
                self.phi_max,
                self.phi_max,
                self.learning_rate_max,
            ],
        )
    }

    /// The swarm described by a point of the search space, with the tuning budget.
    fn swarm(&self, h: ArrayView1<f64>) -> ParticleSwarm {
        ParticleSwarm {
            omega: h[0],
            phi_p: h[1],
            phi_g: h[2],
            learning_rate: h[3],
            n_particles: self.n_particles,
            max_iter: self.swarm_iter,
        }
    }

    /// Picks swarm hyperparameters that minimize the best value a short swarm run reaches on
    /// `func` over `bounds`. The returned swarm carries the tuning budget in `n_particles`
    /// and `max_iter`; callers set their own before using it.
    pub fn tune<F, R>(&self, func: F, bounds: &Bounds, rng: &mut R) -> Result<ParticleSwarm>
    where
        F: Fn(ArrayView1<f64>) -> f64,
        R: Rng + ?Sized,
    {
        let space = self.search_space()?;
        let outer = LocalUnimodalSampling {
            xtol: self.xtol,
            ftol: 0.0,
            max_iter: self.max_iter,
            beta: 1.0 / 3.0,
        };
        // the inner runs draw from their own stream, the outer search keeps `rng`
        let inner_rng = RefCell::new(StdRng::seed_from_u64(rng.gen()));
        let probe = |h: ArrayView1<f64>| {
            self.swarm(h)
                .minimize(&func, bounds, &mut *inner_rng.borrow_mut())
                .minimum_value
        };

        let res = outer.minimize(probe, &space, rng);
        let swarm = self.swarm(res.minimum.view());
        log::info!(
            "tuned swarm after {} swarm runs: omega={:.4} phi_p={:.4} phi_g={:.4} learning_rate={:.4} (best value {:e})",
            res.f_evals,
            swarm.omega,
            swarm.phi_p,
            swarm.phi_g,
            swarm.learning_rate,
            res.minimum_value
        );
        Ok(swarm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn landscape(x: ArrayView1<f64>) -> f64 {
        ((1.0 - x[1]) * x[0]).powi(2) + (x[1] * (2.0 - x[0])).powi(2)
    }

    fn quick() -> Tuner {
        TunerBuilder::default()
            .max_iter(30)
            .n_particles(30)
            .swarm_iter(5)
            .build()
            .unwrap()
    }

    #[test]
    fn tuned_swarm_lies_in_search_space() {
        let bounds = Bounds::from_vec(vec![-10.0, -10.0], vec![10.0, 10.0]).unwrap();
        let tuner = quick();
        let swarm = tuner
            .tune(landscape, &bounds, &mut StdRng::seed_from_u64(17))
            .unwrap();

        println!("{:?}", swarm);
        assert!(swarm.omega.abs() <= tuner.omega_max);
        assert!(swarm.phi_p.abs() <= tuner.phi_max);
        assert!(swarm.phi_g.abs() <= tuner.phi_max);
        assert!(swarm.learning_rate >= tuner.learning_rate_min);
        assert!(swarm.learning_rate <= tuner.learning_rate_max);
        assert_eq!(swarm.n_particles, 30);
        assert_eq!(swarm.max_iter, 5);
    }

    #[test]
    fn seeded_tuning_is_reproducible() {
        let bounds = Bounds::from_vec(vec![-10.0, -10.0], vec![10.0, 10.0]).unwrap();
        let a = quick().tune(landscape, &bounds, &mut StdRng::seed_from_u64(5));
        let b = quick().tune(landscape, &bounds, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn inverted_search_space_is_rejected() {
        let bounds = Bounds::from_vec(vec![-1.0], vec![1.0]).unwrap();
        let tuner = TunerBuilder::default()
            .learning_rate_min(2.0)
            .build()
            .unwrap();
        let res = tuner.tune(|x: ArrayView1<f64>| x[0], &bounds, &mut StdRng::seed_from_u64(0));
        assert_eq!(
            res,
            Err(Error::InvalidBounds {
                index: 3,
                low: 2.0,
                high: 1.0
            })
        );
    }
}
