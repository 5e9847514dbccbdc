//! defines data description : points to cluster and centroids

use num_traits::float::Float;

use std::fmt::Debug;

/// centroid identifier, it is also the rank of the centroid in the centroid set and the cluster label
pub type ClusterId = usize;

/// a point of the plane to cluster
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point<T> {
    x: T,
    y: T,
    // label affected by the clustering, always a valid rank in the current centroids
    cluster: ClusterId,
}

impl<T> Point<T>
where
    T: Float + Debug,
{
    /// a point is created without cluster, its label defaults to 0 until the first assignment
    pub fn new(x: T, y: T) -> Self {
        Point { x, y, cluster: 0 }
    }

    pub fn get_x(&self) -> T {
        self.x
    }

    pub fn get_y(&self) -> T {
        self.y
    }

    /// gets the points coordinates
    pub fn get_position(&self) -> (T, T) {
        (self.x, self.y)
    }

    /// get the cluster the point is affected to
    pub fn get_cluster(&self) -> ClusterId {
        self.cluster
    }

    pub(crate) fn set_cluster(&mut self, cluster: ClusterId) {
        self.cluster = cluster;
    }
} // end of impl Point

//========================================

/// representative of a cluster. Its id is its rank in the centroid set.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Centroid<T> {
    id: ClusterId,
    x: T,
    y: T,
}

impl<T> Centroid<T>
where
    T: Float + Debug,
{
    pub fn new(id: ClusterId, x: T, y: T) -> Self {
        Centroid { id, x, y }
    }

    /// get id (and cluster label)
    pub fn get_id(&self) -> ClusterId {
        self.id
    }

    pub fn get_x(&self) -> T {
        self.x
    }

    pub fn get_y(&self) -> T {
        self.y
    }

    pub fn get_position(&self) -> (T, T) {
        (self.x, self.y)
    }

    pub(crate) fn set_x(&mut self, x: T) {
        self.x = x;
    }

    pub(crate) fn set_y(&mut self, y: T) {
        self.y = y;
    }

    /// euclidean distance to a point
    pub fn distance_to(&self, point: &Point<T>) -> T {
        euclidean_distance(self.get_position(), point.get_position())
    }
} // end of impl Centroid

/// 2d euclidean distance
pub fn euclidean_distance<T: Float>(a: (T, T), b: (T, T)) -> T {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// returns rank of the nearest centroid.
/// Centroids are scanned in increasing rank and only a strict improvement changes the result,
/// so the lowest rank wins on ties. Returns None if no distance compares below `T::max_value()`
/// (no centroid or only NaN centroids).
pub fn nearest_centroid<T>(point: &Point<T>, centroids: &[Centroid<T>]) -> Option<ClusterId>
where
    T: Float + Debug,
{
    let mut min = T::max_value();
    let mut nearest = None;
    for (rank, centroid) in centroids.iter().enumerate() {
        let dist = centroid.distance_to(point);
        if dist < min {
            min = dist;
            nearest = Some(rank);
        }
    }
    nearest
} // end of nearest_centroid

//========================================================

// end of mod tests
