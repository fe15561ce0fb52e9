//! Root search in a single box and the recursive bisection built on top of it.
//!
//! A root search minimizes `sum_i f_i(x)^2` over a box and accepts the minimizer if every
//! component of `f` is within `root_recognition` of zero there.
//!
//! The bisection then halves the box, cycling through the axes, and repeats the search in
//! each half. A half that already holds a root found higher up is not searched again but
//! split straight away, so that its other roots surface once the halves separate them from
//! the known one. Recursion stops at `max_depth` or when the box gets thinner than
//! `location_precision` on some axis.

use crate::bounds::Bounds;
use crate::minimizer::Minimizer;
use crate::utils::residual_objective;
use ndarray::prelude::*;
use rand::Rng;

/// Searches `bounds` for one root of `system`. Returns `None` if the best point found by
/// `minimizer` does not pass the recognition test or lies on an upper face of the box,
/// outside `[low, high)`.
pub fn search_root<F, M, R>(
    system: &F,
    bounds: &Bounds,
    minimizer: &M,
    root_recognition: f64,
    rng: &mut R,
) -> Option<Array1<f64>>
where
    F: Fn(ArrayView1<f64>) -> Array1<f64>,
    M: Minimizer,
    R: Rng + ?Sized,
{
    let res = minimizer.minimize(residual_objective(system), bounds, rng);
    if bounds.contains(res.minimum.view()) && is_root(system, res.minimum.view(), root_recognition) {
        Some(res.minimum)
    } else {
        None
    }
}

/// True if every component of `system(x)` is at most `root_recognition` in absolute value.
/// A system without output components has no roots.
pub fn is_root<F>(system: &F, x: ArrayView1<f64>, root_recognition: f64) -> bool
where
    F: Fn(ArrayView1<f64>) -> Array1<f64>,
{
    let y = system(x);
    !y.is_empty() && y.iter().all(|yi| yi.abs() <= root_recognition)
}

/// State of one box of the recursion.
#[derive(Debug, Clone, PartialEq)]
struct Segment {
    /// The axis of the previous cut. The next cut is along `(axis + 1) % n`.
    axis: usize,
    depth: usize,
    /// Roots found by ancestors that lie in this box.
    roots: Vec<Array1<f64>>,
}

/// Recursive bisection over a box, using `minimizer` for every root search.
#[derive(Debug, Clone)]
pub struct Bisection<'a, F, M> {
    pub system: &'a F,
    pub minimizer: M,
    pub root_recognition: f64,
    pub location_precision: f64,
    pub max_depth: usize,
}

impl<'a, F, M> Bisection<'a, F, M>
where
    F: Fn(ArrayView1<f64>) -> Array1<f64>,
    M: Minimizer,
{
    /// Collects the roots found in `bounds`, in discovery order. The result may contain
    /// several approximations of the same root.
    pub fn run<R: Rng + ?Sized>(&self, bounds: &Bounds, rng: &mut R) -> Vec<Array1<f64>> {
        let top = Segment {
            axis: 0,
            depth: 0,
            roots: Vec::new(),
        };
        self.visit(bounds, top, rng)
    }

    fn visit<R: Rng + ?Sized>(
        &self,
        bounds: &Bounds,
        mut segment: Segment,
        rng: &mut R,
    ) -> Vec<Array1<f64>> {
        if segment.depth > self.max_depth || bounds.is_under_precision(self.location_precision) {
            log::trace!("stop at depth {} in [{}, {}]", segment.depth, bounds.low(), bounds.high());
            return Vec::new();
        }

        let mut found = Vec::new();
        if segment.roots.is_empty() {
            match search_root(self.system, bounds, &self.minimizer, self.root_recognition, rng) {
                Some(root) => {
                    log::debug!("root {} at depth {}", root, segment.depth);
                    segment.roots.push(root.clone());
                    found.push(root);
                }
                None => return found,
            }
        }
        found.extend(self.descend(bounds, segment, rng));
        found
    }

    fn descend<R: Rng + ?Sized>(
        &self,
        bounds: &Bounds,
        segment: Segment,
        rng: &mut R,
    ) -> Vec<Array1<f64>> {
        let axis = (segment.axis + 1) % bounds.dim();
        let depth = segment.depth + 1;
        let (lower, upper) = bounds.split(axis);
        let (lower_roots, upper_roots): (Vec<_>, Vec<_>) = segment
            .roots
            .into_iter()
            .partition(|r| lower.contains(r.view()));

        let mut found = self.visit(
            &lower,
            Segment {
                axis,
                depth,
                roots: lower_roots,
            },
            rng,
        );
        found.extend(self.visit(
            &upper,
            Segment {
                axis,
                depth,
                roots: upper_roots,
            },
            rng,
        ));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minimizer::OptimResult;
    use crate::vector::ParticleSwarmBuilder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::Cell;

    fn system(x: ArrayView1<f64>) -> Array1<f64> {
        arr1(&[(1.0 - x[1]) * x[0], x[1] * (2.0 - x[0])])
    }

    fn square() -> Bounds {
        Bounds::from_vec(vec![-10.0, -10.0], vec![10.0, 10.0]).unwrap()
    }

    /// Returns the center of every box it is asked to search and counts the calls.
    struct Center<'c> {
        calls: &'c Cell<usize>,
    }

    impl<'c> Minimizer for Center<'c> {
        fn minimize<G, R>(&self, func: G, bounds: &Bounds, _rng: &mut R) -> OptimResult
        where
            G: Fn(ArrayView1<f64>) -> f64,
            R: Rng + ?Sized,
        {
            self.calls.set(self.calls.get() + 1);
            let minimum = (&bounds.low() + &bounds.high()) / 2.0;
            let minimum_value = func(minimum.view());
            OptimResult {
                minimum,
                minimum_value,
                f_evals: 1,
                iterations: 0,
            }
        }
    }

    /// Returns a corner of every box it is asked to search.
    struct Corner {
        upper: bool,
    }

    impl Minimizer for Corner {
        fn minimize<G, R>(&self, func: G, bounds: &Bounds, _rng: &mut R) -> OptimResult
        where
            G: Fn(ArrayView1<f64>) -> f64,
            R: Rng + ?Sized,
        {
            let minimum = if self.upper {
                bounds.high().to_owned()
            } else {
                bounds.low().to_owned()
            };
            let minimum_value = func(minimum.view());
            OptimResult {
                minimum,
                minimum_value,
                f_evals: 1,
                iterations: 0,
            }
        }
    }

    #[test]
    fn root_on_upper_face_is_outside_the_box() {
        let edge = |x: ArrayView1<f64>| arr1(&[x[0] - 1.0]);
        let mut rng = StdRng::seed_from_u64(1);
        let below = Bounds::from_vec(vec![-1.0], vec![1.0]).unwrap();
        assert_eq!(
            search_root(&edge, &below, &Corner { upper: true }, 0.1, &mut rng),
            None
        );

        // the same point is the lower face of the neighbouring box
        let above = Bounds::from_vec(vec![1.0], vec![3.0]).unwrap();
        assert_eq!(
            search_root(&edge, &above, &Corner { upper: false }, 0.1, &mut rng),
            Some(arr1(&[1.0]))
        );
    }

    #[test]
    fn empty_output_has_no_roots() {
        let silent = |_: ArrayView1<f64>| Array1::<f64>::zeros(0);
        assert!(!is_root(&silent, arr1(&[0.0]).view(), 0.1));

        let calls = Cell::new(0);
        let bisection = Bisection {
            system: &silent,
            minimizer: Center { calls: &calls },
            root_recognition: 0.1,
            location_precision: 1e-3,
            max_depth: 5,
        };
        let bounds = Bounds::from_vec(vec![0.0], vec![1.0]).unwrap();
        assert!(bisection.run(&bounds, &mut StdRng::seed_from_u64(0)).is_empty());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn recognition_is_componentwise() {
        let x = arr1(&[0.05, 0.02]);
        assert!(is_root(&system, x.view(), 0.1));
        assert!(!is_root(&system, arr1(&[1.0, 1.5]).view(), 0.1));
    }

    #[test]
    fn search_root_on_full_box() {
        let swarm = ParticleSwarmBuilder::default()
            .omega(0.7)
            .phi_p(1.5)
            .phi_g(1.5)
            .learning_rate(1.0)
            .n_particles(200)
            .max_iter(100)
            .build()
            .unwrap();
        let root = search_root(&system, &square(), &swarm, 0.1, &mut StdRng::seed_from_u64(1));
        let root = root.expect("swarm should reach a root");
        assert!(is_root(&system, root.view(), 0.1));
    }

    #[test]
    fn search_root_reports_absence() {
        let shifted = |x: ArrayView1<f64>| arr1(&[x[0].powi(2) + 1.0]);
        let swarm = ParticleSwarmBuilder::default()
            .n_particles(20)
            .max_iter(10)
            .build()
            .unwrap();
        let bounds = Bounds::from_vec(vec![-1.0], vec![1.0]).unwrap();
        assert_eq!(
            search_root(&shifted, &bounds, &swarm, 0.1, &mut StdRng::seed_from_u64(1)),
            None
        );
    }

    #[test]
    fn zero_depth_searches_once() {
        let calls = Cell::new(0);
        let zero = |x: ArrayView1<f64>| arr1(&[0.0 * x[0]]);
        let bisection = Bisection {
            system: &zero,
            minimizer: Center { calls: &calls },
            root_recognition: 0.1,
            location_precision: 1e-3,
            max_depth: 0,
        };
        let bounds = Bounds::from_vec(vec![0.0], vec![1.0]).unwrap();
        let roots = bisection.run(&bounds, &mut StdRng::seed_from_u64(0));

        assert_eq!(roots, vec![arr1(&[0.5])]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn known_roots_skip_the_search() {
        // everything is a root: each box is searched once, its center found, and the half
        // inheriting the center is split without a new search
        let calls = Cell::new(0);
        let zero = |x: ArrayView1<f64>| arr1(&[0.0 * x[0]]);
        let bisection = Bisection {
            system: &zero,
            minimizer: Center { calls: &calls },
            root_recognition: 0.1,
            location_precision: 1e-3,
            max_depth: 2,
        };
        let bounds = Bounds::from_vec(vec![0.0], vec![1.0]).unwrap();
        let roots = bisection.run(&bounds, &mut StdRng::seed_from_u64(0));

        // depth 0: [0, 1) -> 0.5, inherited by the upper half [0.5, 1)
        // depth 1: [0, 0.5) -> 0.25; [0.5, 1) split directly
        // depth 2: [0, 0.25) -> 0.125; [0.25, 0.5) inherits 0.25;
        //          [0.5, 0.75) inherits 0.5; [0.75, 1) -> 0.875
        assert_eq!(
            roots,
            vec![arr1(&[0.5]), arr1(&[0.25]), arr1(&[0.125]), arr1(&[0.875])]
        );
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn no_root_ends_the_branch() {
        let calls = Cell::new(0);
        let far = |x: ArrayView1<f64>| arr1(&[x[0] + 100.0]);
        let bisection = Bisection {
            system: &far,
            minimizer: Center { calls: &calls },
            root_recognition: 0.1,
            location_precision: 1e-3,
            max_depth: 10,
        };
        let bounds = Bounds::from_vec(vec![0.0], vec![1.0]).unwrap();
        assert!(bisection.run(&bounds, &mut StdRng::seed_from_u64(0)).is_empty());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn thin_box_is_not_searched() {
        let calls = Cell::new(0);
        let zero = |x: ArrayView1<f64>| arr1(&[0.0 * x[0]]);
        let bisection = Bisection {
            system: &zero,
            minimizer: Center { calls: &calls },
            root_recognition: 0.1,
            location_precision: 0.5,
            max_depth: 10,
        };
        let bounds = Bounds::from_vec(vec![0.0, 0.0], vec![10.0, 0.4]).unwrap();
        assert!(bisection.run(&bounds, &mut StdRng::seed_from_u64(0)).is_empty());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn bisection_finds_both_roots() {
        let swarm = ParticleSwarmBuilder::default()
            .omega(0.7)
            .phi_p(1.5)
            .phi_g(1.5)
            .learning_rate(1.0)
            .n_particles(200)
            .max_iter(60)
            .build()
            .unwrap();
        let bisection = Bisection {
            system: &system,
            minimizer: &swarm,
            root_recognition: 0.1,
            location_precision: 0.5,
            max_depth: 64,
        };
        let roots = bisection.run(&square(), &mut StdRng::seed_from_u64(23));

        let near = |r: &Array1<f64>, x: f64, y: f64| (r[0] - x).abs() < 0.5 && (r[1] - y).abs() < 0.5;
        assert!(roots.iter().all(|r| near(r, 0.0, 0.0) || near(r, 2.0, 1.0)));
        assert!(roots.iter().any(|r| near(r, 0.0, 0.0)));
        assert!(roots.iter().any(|r| near(r, 2.0, 1.0)));
    }
}
