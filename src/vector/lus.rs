//! Local unimodal sampling.
//!
//! Starting from a random point of the box, a candidate is drawn uniformly from the
//! neighbourhood `[x - d, x + d]`. Only strictly improving candidates are accepted. After
//! every failed draw the sampling range `d` shrinks by the factor `q = 2^(-beta / n)`,
//! so the search contracts geometrically around the current point.
//!
//! The method is cheap per step and needs few evaluations, which is why it drives the outer
//! loop of [`Tuner`](crate::roots::Tuner), where every evaluation is a full swarm run.

use crate::bounds::Bounds;
use crate::minimizer::{Minimizer, OptimResult};
use crate::utils::WrappedFunction;
use ndarray::prelude::*;
use ndarray::Zip;
use rand::Rng;

#[derive(Builder, Debug, Clone, PartialEq)]
pub struct LocalUnimodalSampling {
    /// The run ends once the sampling range falls below this width on every axis.
    #[builder(default = "1e-2")]
    pub xtol: f64,

    /// The run ends once an accepted move improves the value by less than this.
    /// Zero disables the check.
    #[builder(default = "0.0")]
    pub ftol: f64,

    #[builder(default = "1000")]
    pub max_iter: usize,

    /// Controls how fast the sampling range shrinks. Bigger is faster.
    #[builder(default = "1.0 / 3.0")]
    pub beta: f64,
}

impl Minimizer for LocalUnimodalSampling {
    fn minimize<F, R>(&self, func: F, bounds: &Bounds, rng: &mut R) -> OptimResult
    where
        F: Fn(ArrayView1<f64>) -> f64,
        R: Rng + ?Sized,
    {
        let mut func = WrappedFunction::new(func);
        let n = bounds.dim();
        let q = 2f64.powf(-self.beta / n as f64);

        let mut x = bounds.sample(rng);
        let mut best = func.call(x.view());
        let mut d = bounds.width();
        let mut diam = d.fold(0f64, |acc, &di| acc.max(di));

        let mut iterations = 0;
        while iterations < self.max_iter && diam > self.xtol {
            iterations += 1;
            let mut y = Zip::from(&x)
                .and(&d)
                .map_collect(|&xi, &di| xi + (2.0 * rng.gen::<f64>() - 1.0) * di);
            bounds.clamp(&mut y);

            let value = func.call(y.view());
            if value < best {
                let improvement = best - value;
                x = y;
                best = value;
                if improvement < self.ftol {
                    break;
                }
            } else {
                d *= q;
                diam *= q;
            }
        }

        OptimResult {
            minimum: x,
            minimum_value: best,
            f_evals: func.num,
            iterations,
        }
    }
}
