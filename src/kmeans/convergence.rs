//! trait deciding if a centroid coordinate moved between two iterations

use num_traits::float::Float;

pub trait Convergence {
    /// returns true if the coordinate must be considered as changed. A NaN must always be reported as a move.
    fn moved<T: Float>(&self, previous: T, new: T) -> bool;
}

/// A coordinate has moved as soon as it is not bitwise equal (as a float) to its previous value.
/// This is the Lloyd's stopping rule, termination of oscillating runs relies on the iteration cap.
#[derive(Debug, Copy, Clone, Default)]
pub struct ExactMatch;

impl Convergence for ExactMatch {
    fn moved<T: Float>(&self, previous: T, new: T) -> bool {
        new != previous
    }
}

/// A coordinate has moved if it differs by more than epsilon from its previous value.
#[derive(Debug, Copy, Clone)]
pub struct Tolerance {
    epsilon: f64,
}

impl Tolerance {
    pub fn new(epsilon: f64) -> Self {
        Tolerance {
            epsilon: epsilon.abs(),
        }
    }

    pub fn get_epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl Convergence for Tolerance {
    fn moved<T: Float>(&self, previous: T, new: T) -> bool {
        match T::from(self.epsilon) {
            // written so that NaN gives true
            Some(eps) => !((new - previous).abs() <= eps),
            None => new != previous,
        }
    }
} // end of impl Tolerance

// end of mod tests
