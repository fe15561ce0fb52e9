extern crate heuristic;
extern crate ndarray;
extern crate rand;

use heuristic::roots::NoJacobian;
use heuristic::RootFinderBuilder;
use ndarray::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A small predator-prey style system with equilibria at (0, 0) and (2, 1).
fn system(x: ArrayView1<f64>) -> Array1<f64> {
    arr1(&[(1.0 - x[1]) * x[0], x[1] * (2.0 - x[0])])
}

fn main() {
    let finder = RootFinderBuilder::default()
        .location_precision(0.5)
        .root_recognition(0.1)
        .build()
        .unwrap();
    let low = arr1(&[-10.0, -10.0]);
    let high = arr1(&[10.0, 10.0]);

    let mut rng = StdRng::from_entropy();
    match finder.find_roots(system, None::<NoJacobian>, low.view(), high.view(), &mut rng) {
        Ok(roots) => {
            println!("found {} roots", roots.len());
            for root in roots {
                println!("{} -> {}", root, system(root.view()));
            }
        }
        Err(e) => println!("search failed: {}", e),
    }
}
