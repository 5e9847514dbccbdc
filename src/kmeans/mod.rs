//! This module implements kmeans clustering of points in the plane with Lloyd's algorithm.
//!
//! - point : points, centroids and euclidean distance
//! - convergence : the test deciding if a centroid moved
//! - lloyd : the iterations and the clustering result

pub mod convergence;
pub mod lloyd;
pub mod point;

pub use convergence::{Convergence, ExactMatch, Tolerance};
pub use lloyd::{ClusteringResult, DEFAULT_ITERATION_CAP, KMeans};
pub use point::{Centroid, ClusterId, Point, euclidean_distance, nearest_centroid};
