//! generation of points to cluster.
//!
//! Points carry no structure, clusters must emerge from the algorithm.
//! The random source is always given by the caller so that runs can be seeded.

use num_traits::float::Float;

use rand::Rng;
use rand::distr::{Distribution, StandardUniform};
use rand_distr::StandardNormal;

use std::fmt::Debug;

use crate::kmeans::Point;

/// width of the plane used by the front ends
pub const WIDTH: u32 = 70;
/// height of the plane used by the front ends
pub const HEIGHT: u32 = 70;

/// generates nb points uniformly in [0, width) x [0, height)
pub fn uniform_points<T, R>(nb: usize, width: T, height: T, rng: &mut R) -> Vec<Point<T>>
where
    T: Float + Debug,
    StandardUniform: Distribution<T>,
    R: Rng + ?Sized,
{
    let mut points = Vec::<Point<T>>::with_capacity(nb);
    for _ in 0..nb {
        let x: T = rng.sample(StandardUniform);
        let y: T = rng.sample(StandardUniform);
        points.push(Point::new(x * width, y * height));
    }
    points
} // end of uniform_points

/// generates nb points with coordinates independently sampled along each axis as N(mean, dev^2)
pub fn normal_points<T, R>(nb: usize, dev_x: T, dev_y: T, mean_x: T, mean_y: T, rng: &mut R) -> Vec<Point<T>>
where
    T: Float + Debug,
    StandardNormal: Distribution<T>,
    R: Rng + ?Sized,
{
    let mut points = Vec::<Point<T>>::with_capacity(nb);
    for _ in 0..nb {
        let x: T = rng.sample(StandardNormal);
        let y: T = rng.sample(StandardNormal);
        points.push(Point::new(x * dev_x + mean_x, y * dev_y + mean_y));
    }
    points
} // end of normal_points

// end of mod tests
