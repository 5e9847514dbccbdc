//! Lloyd iterations for kmeans in the plane.
//!
//! Initial centroids are data points drawn without replacement by a Fisher-Yates shuffle,
//! then the algorithm alternates nearest centroid assignment and centroid update
//! until no centroid coordinate moves or the iteration limit is reached.
//!
//! Empty clusters are not repaired: their centroid gets NaN coordinates (0/0 mean), such a centroid
//! is never chosen as nearest and is reported as moving at each iteration, so the run ends at the cap.

use num_traits::float::Float;

use rand::Rng;

use cpu_time::ProcessTime;
use std::fmt::Debug;
use std::time::{Duration, Instant};

use super::convergence::{Convergence, ExactMatch};
use super::point::{Centroid, ClusterId, Point, nearest_centroid};

/// iteration cap substituted to a 0 iteration limit
pub const DEFAULT_ITERATION_CAP: usize = 10_000;

/// Parameters of a kmeans run
#[derive(Debug, Copy, Clone)]
pub struct KMeans<C = ExactMatch> {
    nb_cluster: usize,
    // maximum number of iterations, the 0 limit of new is already replaced by the cap
    max_iterations: usize,
    comparator: C,
}

impl KMeans<ExactMatch> {
    /// - nb_cluster : the k of kmeans. Caller must ensure 1 <= nb_cluster <= number of points
    /// - iteration_limit : maximum number of iterations, 0 means [DEFAULT_ITERATION_CAP]
    pub fn new(nb_cluster: usize, iteration_limit: usize) -> Self {
        let max_iterations = if iteration_limit == 0 {
            DEFAULT_ITERATION_CAP
        } else {
            iteration_limit
        };
        KMeans::with_max_iterations(nb_cluster, max_iterations)
    }

    /// as new but max_iterations is taken literally, with 0 the run stops after the initial assignment
    pub fn with_max_iterations(nb_cluster: usize, max_iterations: usize) -> Self {
        KMeans {
            nb_cluster,
            max_iterations,
            comparator: ExactMatch,
        }
    }
}

impl<C> KMeans<C>
where
    C: Convergence,
{
    /// replace the convergence test, see [Tolerance](super::convergence::Tolerance)
    pub fn with_comparator<D: Convergence>(self, comparator: D) -> KMeans<D> {
        KMeans {
            nb_cluster: self.nb_cluster,
            max_iterations: self.max_iterations,
            comparator,
        }
    }

    pub fn get_nb_cluster(&self) -> usize {
        self.nb_cluster
    }

    /// returns the iteration limit actually used
    pub fn get_iteration_limit(&self) -> usize {
        self.max_iterations
    }

    /// runs kmeans, initial centroids are sampled from points with rng
    pub fn run<T, R>(&self, points: Vec<Point<T>>, rng: &mut R) -> ClusteringResult<T>
    where
        T: Float + Debug,
        R: Rng + ?Sized,
    {
        let cpu_start = ProcessTime::now();
        let start = Instant::now();
        //
        let centroids = draw_centroids(&points, self.nb_cluster, rng);
        self.iterate(points, centroids, start, cpu_start)
    }

    /// runs kmeans from given initial centroids. Their ids are reset to their rank.
    pub fn run_from<T>(&self, points: Vec<Point<T>>, centroids: Vec<Centroid<T>>) -> ClusteringResult<T>
    where
        T: Float + Debug,
    {
        let cpu_start = ProcessTime::now();
        let start = Instant::now();
        //
        let centroids = centroids
            .iter()
            .enumerate()
            .map(|(rank, c)| Centroid::new(rank, c.get_x(), c.get_y()))
            .collect();
        self.iterate(points, centroids, start, cpu_start)
    }

    fn iterate<T>(
        &self,
        mut points: Vec<Point<T>>,
        mut centroids: Vec<Centroid<T>>,
        start: Instant,
        cpu_start: ProcessTime,
    ) -> ClusteringResult<T>
    where
        T: Float + Debug,
    {
        let limit = self.get_iteration_limit();
        log::info!(
            "kmeans start, nb points : {}, nb cluster : {}, iteration limit : {}",
            points.len(),
            centroids.len(),
            limit
        );
        if centroids.len() < self.nb_cluster {
            log::warn!(
                "asked for {} clusters, got only {} initial centroids",
                self.nb_cluster,
                centroids.len()
            );
        }
        if centroids.is_empty() {
            log::warn!("no centroid, points are left unassigned");
            return ClusteringResult {
                points,
                centroids,
                nb_iterations: 0,
                converged: true,
                elapsed: start.elapsed(),
                cpu_time: cpu_start.elapsed(),
            };
        }
        // labels coming from a previous run may be out of range for these centroids
        for point in points.iter_mut() {
            point.set_cluster(0);
        }
        assign(&mut points, &centroids);
        let mut changed = true;
        let mut nb_iterations = 0;
        while changed && nb_iterations < limit {
            changed = self.update_centroids(&points, &mut centroids);
            if changed {
                assign(&mut points, &centroids);
            }
            nb_iterations += 1;
            log::debug!("iteration {}, centroids changed : {}", nb_iterations, changed);
        }
        //
        let elapsed = start.elapsed();
        let cpu_time = cpu_start.elapsed();
        if changed {
            log::warn!("kmeans stopped at iteration cap {} without convergence", nb_iterations);
        } else {
            log::info!("kmeans converged after {} iterations", nb_iterations);
        }
        log::info!(
            "sys time(ms) {:.3}, cpu time(ms) {:?}",
            elapsed.as_secs_f64() * 1000.,
            cpu_time.as_millis()
        );
        //
        ClusteringResult {
            points,
            centroids,
            nb_iterations,
            converged: !changed,
            elapsed,
            cpu_time,
        }
    } // end of iterate

    // move each centroid to the mean of its cluster, returns true if some coordinate moved.
    // A coordinate is stored only if the comparator reports a move.
    fn update_centroids<T>(&self, points: &[Point<T>], centroids: &mut [Centroid<T>]) -> bool
    where
        T: Float + Debug,
    {
        let nb_cluster = centroids.len();
        let mut sums = vec![(T::zero(), T::zero()); nb_cluster];
        let mut counts = vec![0usize; nb_cluster];
        for point in points {
            let c = point.get_cluster();
            if let (Some(sum), Some(count)) = (sums.get_mut(c), counts.get_mut(c)) {
                sum.0 = sum.0 + point.get_x();
                sum.1 = sum.1 + point.get_y();
                *count += 1;
            }
        }
        //
        let mut changed = false;
        for (rank, centroid) in centroids.iter_mut().enumerate() {
            if counts[rank] == 0 {
                log::debug!("cluster {} is empty", rank);
            }
            let n = T::from(counts[rank]).unwrap_or_else(T::zero);
            let new_x = sums[rank].0 / n;
            let new_y = sums[rank].1 / n;
            if self.comparator.moved(centroid.get_x(), new_x) {
                centroid.set_x(new_x);
                changed = true;
            }
            if self.comparator.moved(centroid.get_y(), new_y) {
                centroid.set_y(new_y);
                changed = true;
            }
        }
        changed
    } // end of update_centroids
} // end of impl KMeans

// Fisher-Yates shuffle of point ranks, the k first shuffled points give the initial centroids.
// The points themselves are not reordered.
fn draw_centroids<T, R>(points: &[Point<T>], nb_cluster: usize, rng: &mut R) -> Vec<Centroid<T>>
where
    T: Float + Debug,
    R: Rng + ?Sized,
{
    let mut order: Vec<usize> = (0..points.len()).collect();
    let mut i = order.len().saturating_sub(1);
    while i > 0 {
        let j = rng.random_range(0..=i);
        order.swap(i, j);
        i -= 1;
    }
    order
        .iter()
        .take(nb_cluster)
        .enumerate()
        .map(|(id, &rank)| Centroid::new(id, points[rank].get_x(), points[rank].get_y()))
        .collect()
} // end of draw_centroids

// affect each point to its nearest centroid. A point with no reachable centroid keeps its label.
fn assign<T>(points: &mut [Point<T>], centroids: &[Centroid<T>])
where
    T: Float + Debug,
{
    for point in points.iter_mut() {
        if let Some(c) = nearest_centroid(point, centroids) {
            point.set_cluster(c);
        }
    }
}

//========================================

/// result of a kmeans run, possibly not converged if the iteration limit was hit
#[derive(Debug, Clone)]
pub struct ClusteringResult<T> {
    points: Vec<Point<T>>,
    centroids: Vec<Centroid<T>>,
    nb_iterations: usize,
    converged: bool,
    // sys time of initialization and iterations
    elapsed: Duration,
    cpu_time: Duration,
}

impl<T> ClusteringResult<T>
where
    T: Float + Debug,
{
    /// points with their final cluster, in input order
    pub fn get_points(&self) -> &[Point<T>] {
        &self.points
    }

    pub fn get_centroids(&self) -> &[Centroid<T>] {
        &self.centroids
    }

    pub fn get_nb_cluster(&self) -> usize {
        self.centroids.len()
    }

    pub fn get_nb_iterations(&self) -> usize {
        self.nb_iterations
    }

    /// false if the run was stopped by the iteration limit
    pub fn is_converged(&self) -> bool {
        self.converged
    }

    pub fn get_elapsed(&self) -> Duration {
        self.elapsed
    }

    /// elapsed time in milliseconds with sub millisecond precision
    pub fn get_elapsed_ms(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / 1000. / 1000.
    }

    pub fn get_cpu_time(&self) -> Duration {
        self.cpu_time
    }

    /// labels of points in input order
    pub fn get_labels(&self) -> Vec<ClusterId> {
        self.points.iter().map(|p| p.get_cluster()).collect()
    }

    /// number of points in each cluster
    pub fn get_cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.centroids.len()];
        for p in &self.points {
            if let Some(size) = sizes.get_mut(p.get_cluster()) {
                *size += 1;
            }
        }
        sizes
    }

    /// sum of squared distances of points to their centroid. NaN if some centroid is NaN and has members.
    pub fn get_inertia(&self) -> T {
        self.points.iter().fold(T::zero(), |acc, p| {
            let d = match self.centroids.get(p.get_cluster()) {
                Some(centroid) => centroid.distance_to(p),
                None => T::nan(),
            };
            acc + d * d
        })
    }

    /// log cluster sizes and inertia
    pub fn dump_stats(&self) {
        log::info!(
            "nb iterations : {}, converged : {}, inertia : {:.3e}",
            self.nb_iterations,
            self.converged,
            self.get_inertia().to_f64().unwrap_or(f64::NAN)
        );
        for (rank, size) in self.get_cluster_sizes().iter().enumerate() {
            log::info!("cluster : {}, size : {}", rank, size);
        }
    }
} // end of impl ClusteringResult

//========================================================

#[cfg(test)]
mod tests {

    use super::*;

    use crate::generate::uniform_points;
    use crate::kmeans::convergence::Tolerance;

    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn corners() -> Vec<Point<f64>> {
        vec![
            Point::new(0., 0.),
            Point::new(10., 0.),
            Point::new(0., 10.),
            Point::new(10., 10.),
        ]
    }

    // each point is affected to a centroid at minimal distance, lowest rank on ties
    fn check_nearest(result: &ClusteringResult<f64>) {
        for p in result.get_points() {
            let c = p.get_cluster();
            let d = result.get_centroids()[c].distance_to(p);
            for (rank, centroid) in result.get_centroids().iter().enumerate() {
                let other = centroid.distance_to(p);
                assert!(d <= other);
                if rank < c {
                    assert!(d < other);
                }
            }
        }
    }

    #[test]
    fn test_corners_left_right() {
        log_init_test();
        //
        let init = vec![Centroid::new(0, 0., 0.), Centroid::new(1, 10., 0.)];
        let result = KMeans::new(2, 0).run_from(corners(), init);
        assert!(result.is_converged());
        assert!(result.get_nb_iterations() <= 3);
        assert_eq!(result.get_labels(), vec![0, 1, 0, 1]);
        assert_eq!(result.get_centroids()[0].get_position(), (0., 5.));
        assert_eq!(result.get_centroids()[1].get_position(), (10., 5.));
        assert_eq!(result.get_cluster_sizes(), vec![2, 2]);
        assert_eq!(result.get_inertia(), 100.);
        check_nearest(&result);
    }

    #[test]
    fn test_corners_diagonal() {
        log_init_test();
        // (10,0) and (0,10) are at equal distance of both initial centroids and go to cluster 0
        let init = vec![Centroid::new(0, 0., 0.), Centroid::new(1, 10., 10.)];
        let result = KMeans::new(2, 0).run_from(corners(), init);
        assert!(result.is_converged());
        assert_eq!(result.get_nb_iterations(), 2);
        assert_eq!(result.get_labels(), vec![0, 0, 0, 1]);
        let (x, y) = result.get_centroids()[0].get_position();
        assert!((x - 10. / 3.).abs() < 1.0e-12);
        assert!((y - 10. / 3.).abs() < 1.0e-12);
        assert_eq!(result.get_centroids()[1].get_position(), (10., 10.));
        check_nearest(&result);
    }

    #[test]
    fn test_one_cluster_is_mean() {
        log_init_test();
        //
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(234567_u64);
        let points = uniform_points::<f64, _>(50, 70., 70., &mut rng);
        let sum = points
            .iter()
            .fold((0., 0.), |acc, p| (acc.0 + p.get_x(), acc.1 + p.get_y()));
        let mean = (sum.0 / 50., sum.1 / 50.);
        //
        let result = KMeans::new(1, 0).run(points, &mut rng);
        assert!(result.is_converged());
        // one move to the mean, then a reassignment free iteration
        assert_eq!(result.get_nb_iterations(), 2);
        assert_eq!(result.get_centroids()[0].get_position(), mean);
        assert!(result.get_labels().iter().all(|l| *l == 0));
    }

    #[test]
    fn test_k_equals_n() {
        log_init_test();
        //
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4664397_u64);
        let points = uniform_points::<f64, _>(12, 70., 70., &mut rng);
        let result = KMeans::new(12, 0).run(points.clone(), &mut rng);
        assert!(result.is_converged());
        assert_eq!(result.get_nb_iterations(), 1);
        assert_eq!(result.get_cluster_sizes(), vec![1; 12]);
        assert_eq!(result.get_inertia(), 0.);
        // each point is its own centroid
        for p in result.get_points() {
            let c = result.get_centroids()[p.get_cluster()];
            assert_eq!(c.get_position(), p.get_position());
        }
        // points are not reordered by the initial shuffle
        let positions: Vec<(f64, f64)> = result.get_points().iter().map(|p| p.get_position()).collect();
        let expected: Vec<(f64, f64)> = points.iter().map(|p| p.get_position()).collect();
        assert_eq!(positions, expected);
    }

    #[test]
    fn test_uniform_square() {
        log_init_test();
        log::info!("in test_uniform_square");
        //
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(234567_u64);
        let points = uniform_points::<f64, _>(100, 70., 70., &mut rng);
        let kmeans = KMeans::new(5, 0);
        assert_eq!(kmeans.get_iteration_limit(), DEFAULT_ITERATION_CAP);
        let result = kmeans.run(points, &mut rng);
        result.dump_stats();
        //
        assert!(result.get_nb_iterations() <= DEFAULT_ITERATION_CAP);
        assert!(result.is_converged());
        assert_eq!(result.get_nb_cluster(), 5);
        for c in result.get_centroids() {
            let (x, y) = c.get_position();
            assert!((0. ..=70.).contains(&x));
            assert!((0. ..=70.).contains(&y));
        }
        assert_eq!(result.get_cluster_sizes().iter().sum::<usize>(), 100);
        check_nearest(&result);
    }

    #[test]
    fn test_deterministic_seed() {
        log_init_test();
        //
        let run = |seed: u64| {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            let points = uniform_points::<f64, _>(200, 70., 70., &mut rng);
            KMeans::new(7, 0).run(points, &mut rng)
        };
        let r1 = run(1789);
        let r2 = run(1789);
        assert_eq!(r1.get_labels(), r2.get_labels());
        assert_eq!(r1.get_centroids(), r2.get_centroids());
        assert_eq!(r1.get_nb_iterations(), r2.get_nb_iterations());
    }

    #[test]
    fn test_deterministic_trajectory() {
        log_init_test();
        // centroids after 1, 2, .. iterations for a given seed
        let trajectory = |seed: u64| -> Vec<(Vec<Centroid<f64>>, Vec<ClusterId>)> {
            (1..=6)
                .map(|nb_iter| {
                    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                    let points = uniform_points::<f64, _>(200, 70., 70., &mut rng);
                    let result = KMeans::with_max_iterations(7, nb_iter).run(points, &mut rng);
                    assert!(result.get_nb_iterations() <= nb_iter);
                    (result.get_centroids().to_vec(), result.get_labels())
                })
                .collect()
        };
        let t1 = trajectory(1789);
        let t2 = trajectory(1789);
        assert_eq!(t1, t2);
    }

    #[test]
    fn test_zero_iteration() {
        log_init_test();
        //
        let init = vec![Centroid::new(0, 0., 0.), Centroid::new(1, 10., 0.)];
        let result = KMeans::with_max_iterations(2, 0).run_from(corners(), init);
        assert_eq!(result.get_nb_iterations(), 0);
        assert!(!result.is_converged());
        assert_eq!(result.get_labels(), vec![0, 1, 0, 1]);
        assert_eq!(result.get_centroids()[1].get_position(), (10., 0.));
        assert_eq!(KMeans::new(2, 0).get_iteration_limit(), DEFAULT_ITERATION_CAP);
    }

    #[test]
    fn test_labels_from_previous_run() {
        log_init_test();
        // squared distances between these points overflow to inf
        let points = vec![Point::new(0., 0.), Point::new(1.0e200, 0.), Point::new(2.0e200, 0.)];
        let init: Vec<Centroid<f64>> = points
            .iter()
            .enumerate()
            .map(|(rank, p)| Centroid::new(rank, p.get_x(), p.get_y()))
            .collect();
        let first = KMeans::new(3, 0).run_from(points, init);
        assert_eq!(first.get_labels(), vec![0, 1, 2]);
        // rerun with one centroid on the labelled points
        let second = KMeans::new(1, 0).run_from(first.get_points().to_vec(), vec![Centroid::new(0, 0., 0.)]);
        assert!(second.get_labels().iter().all(|l| *l == 0));
        assert_eq!(second.get_cluster_sizes(), vec![3]);
        assert!(second.is_converged());
        let (x, y) = second.get_centroids()[0].get_position();
        assert!((x / 1.0e200 - 1.).abs() < 1.0e-12);
        assert_eq!(y, 0.);
    }

    #[test]
    fn test_iteration_limit() {
        log_init_test();
        //
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(977_u64);
        let points = uniform_points::<f64, _>(500, 70., 70., &mut rng);
        let result = KMeans::new(10, 1).run(points, &mut rng);
        assert_eq!(result.get_nb_iterations(), 1);
        // labels stay valid even if not converged
        assert!(result.get_labels().iter().all(|l| *l < 10));
    }

    #[test]
    fn test_empty_cluster_gives_nan() {
        log_init_test();
        // the second centroid never gets a point
        let points = vec![Point::new(0., 0.), Point::new(1., 0.)];
        let init = vec![Centroid::new(0, 0.5, 0.), Centroid::new(1, 100., 100.)];
        let result = KMeans::new(2, 20).run_from(points.clone(), init.clone());
        assert!(!result.is_converged());
        assert_eq!(result.get_nb_iterations(), 20);
        assert!(result.get_centroids()[1].get_x().is_nan());
        assert!(result.get_centroids()[1].get_y().is_nan());
        assert_eq!(result.get_centroids()[0].get_position(), (0.5, 0.));
        assert_eq!(result.get_labels(), vec![0, 0]);
        // NaN is a move for a tolerant comparator too
        let result = KMeans::new(2, 20)
            .with_comparator(Tolerance::new(1.0e-6))
            .run_from(points, init);
        assert_eq!(result.get_nb_iterations(), 20);
    }

    #[test]
    fn test_no_centroid() {
        let points = vec![Point::new(1., 2.), Point::new(3., 4.)];
        let result = KMeans::new(0, 0).run_from(points, vec![]);
        assert_eq!(result.get_nb_iterations(), 0);
        assert_eq!(result.get_nb_cluster(), 0);
        assert!(result.get_cluster_sizes().is_empty());
    }

    #[test]
    fn test_tolerance_stops_early() {
        log_init_test();
        //
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(234567_u64);
        let points = uniform_points::<f64, _>(300, 70., 70., &mut rng);
        let mut rng_exact = Xoshiro256PlusPlus::seed_from_u64(11_u64);
        let mut rng_tol = Xoshiro256PlusPlus::seed_from_u64(11_u64);
        let exact = KMeans::new(6, 0).run(points.clone(), &mut rng_exact);
        // a huge epsilon stops after the first update
        let tolerant = KMeans::new(6, 0)
            .with_comparator(Tolerance::new(1.0e6))
            .run(points, &mut rng_tol);
        assert_eq!(tolerant.get_nb_iterations(), 1);
        assert!(tolerant.is_converged());
        assert!(exact.get_nb_iterations() >= tolerant.get_nb_iterations());
    }
} // end of mod tests
