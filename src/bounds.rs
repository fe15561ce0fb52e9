//! Axis-aligned boxes that constrain every search in this crate.
//!
//! A [`Bounds`] is a pair `(low, high)` with `low[i] <= high[i]` on every axis.
//! Points are considered inside the box on the half-open range `[low, high)`, so the
//! two halves produced by [`Bounds::split`] never both claim the same point.

use crate::error::{Error, Result};
use ndarray::prelude::*;
use ndarray::Zip;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    low: Array1<f64>,
    high: Array1<f64>,
}

impl Bounds {
    /// Creates a box after checking that both corners have the same, non-zero dimension
    /// and that every `low[i]` is finite and not above `high[i]`.
    pub fn new(low: Array1<f64>, high: Array1<f64>) -> Result<Self> {
        if low.len() != high.len() {
            return Err(Error::DimensionMismatch {
                low: low.len(),
                high: high.len(),
            });
        }
        if low.is_empty() {
            return Err(Error::EmptyBounds);
        }
        for (index, (&l, &h)) in low.iter().zip(high.iter()).enumerate() {
            if !l.is_finite() || !h.is_finite() || l > h {
                return Err(Error::InvalidBounds {
                    index,
                    low: l,
                    high: h,
                });
            }
        }
        Ok(Bounds { low, high })
    }

    pub fn from_vec(low: Vec<f64>, high: Vec<f64>) -> Result<Self> {
        Self::new(Array1::from(low), Array1::from(high))
    }

    pub fn low(&self) -> ArrayView1<f64> {
        self.low.view()
    }

    pub fn high(&self) -> ArrayView1<f64> {
        self.high.view()
    }

    pub fn dim(&self) -> usize {
        self.low.len()
    }

    /// Side lengths `high - low` of the box.
    pub fn width(&self) -> Array1<f64> {
        &self.high - &self.low
    }

    /// Draws a point uniformly from the box.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
        Zip::from(&self.low)
            .and(&self.high)
            .map_collect(|&l, &h| l + rng.gen::<f64>() * (h - l))
    }

    /// Projects `x` onto the closed box.
    pub fn clamp(&self, x: &mut Array1<f64>) {
        Zip::from(x)
            .and(&self.low)
            .and(&self.high)
            .for_each(|xi, &l, &h| *xi = xi.max(l).min(h));
    }

    /// True iff `low[i] <= x[i] < high[i]` holds on every axis at once.
    pub fn contains(&self, x: ArrayView1<f64>) -> bool {
        x.len() == self.dim()
            && x
                .iter()
                .zip(self.low.iter().zip(self.high.iter()))
                .all(|(&xi, (&l, &h))| xi >= l && xi < h)
    }

    /// True if the box has become thinner than `precision` along any axis.
    pub fn is_under_precision(&self, precision: f64) -> bool {
        self.low
            .iter()
            .zip(self.high.iter())
            .any(|(&l, &h)| (h - l).abs() < precision)
    }

    /// Cuts the box in half at the midpoint of `axis`, returning `(lower, upper)` halves.
    /// `axis` must be below [`dim`](Bounds::dim).
    pub(crate) fn split(&self, axis: usize) -> (Bounds, Bounds) {
        let mid = self.low[axis] + 0.5 * (self.high[axis] - self.low[axis]);
        let mut lower_high = self.high.clone();
        lower_high[axis] = mid;
        let mut upper_low = self.low.clone();
        upper_low[axis] = mid;
        (
            Bounds {
                low: self.low.clone(),
                high: lower_high,
            },
            Bounds {
                low: upper_low,
                high: self.high.clone(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square() -> Bounds {
        Bounds::from_vec(vec![-10.0, -10.0], vec![10.0, 10.0]).unwrap()
    }

    #[test]
    fn rejects_malformed_corners() {
        assert_eq!(
            Bounds::from_vec(vec![0.0], vec![1.0, 2.0]),
            Err(Error::DimensionMismatch { low: 1, high: 2 })
        );
        assert_eq!(Bounds::from_vec(vec![], vec![]), Err(Error::EmptyBounds));
        assert_eq!(
            Bounds::from_vec(vec![0.0, 3.0], vec![1.0, 2.0]),
            Err(Error::InvalidBounds {
                index: 1,
                low: 3.0,
                high: 2.0
            })
        );
        assert!(Bounds::from_vec(vec![std::f64::NAN], vec![1.0]).is_err());
    }

    #[test]
    fn samples_stay_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        let b = Bounds::from_vec(vec![-1.0, 2.0, 5.0], vec![1.0, 3.0, 5.0]).unwrap();
        for _ in 0..1000 {
            let x = b.sample(&mut rng);
            for i in 0..3 {
                assert!(x[i] >= b.low()[i] && x[i] <= b.high()[i]);
            }
        }
    }

    #[test]
    fn split_halves_share_midpoint() {
        let (lower, upper) = square().split(1);
        assert_eq!(lower.low(), arr1(&[-10.0, -10.0]));
        assert_eq!(lower.high(), arr1(&[10.0, 0.0]));
        assert_eq!(upper.low(), arr1(&[-10.0, 0.0]));
        assert_eq!(upper.high(), arr1(&[10.0, 10.0]));
    }

    #[test]
    fn containment_requires_every_axis() {
        let (lower, upper) = square().split(0);
        // inside on the last axis only
        assert!(!lower.contains(arr1(&[5.0, -5.0]).view()));
        assert!(lower.contains(arr1(&[-5.0, -5.0]).view()));
        // the midpoint belongs to the upper half
        assert!(!lower.contains(arr1(&[0.0, 1.0]).view()));
        assert!(upper.contains(arr1(&[0.0, 1.0]).view()));
    }

    #[test]
    fn clamp_projects_onto_box() {
        let mut x = arr1(&[-20.0, 3.0]);
        square().clamp(&mut x);
        assert_eq!(x, arr1(&[-10.0, 3.0]));
    }

    #[test]
    fn precision_cutoff_checks_any_axis() {
        let b = Bounds::from_vec(vec![0.0, 0.0], vec![0.1, 10.0]).unwrap();
        assert!(b.is_under_precision(0.5));
        assert!(!b.is_under_precision(0.05));
    }
}
