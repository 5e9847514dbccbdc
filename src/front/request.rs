//! request parameters shared by the command line and the http form, and the generate, cluster, render pipeline.

use anyhow::anyhow;

use rand::Rng;
use serde::{Deserialize, Deserializer};

use std::str::FromStr;

use crate::generate::{HEIGHT, WIDTH, normal_points, uniform_points};
use crate::kmeans::{ClusteringResult, KMeans, Point};
use crate::render::{RenderConfig, summary, to_svg};

/// Parameters of one run.
///
/// When deserialized (http form), a missing or unparsable value is taken as 0.
/// Integers are signed as in the form, negative values are checked in [RunRequest::check].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunRequest {
    /// number of clusters
    #[serde(deserialize_with = "lenient")]
    pub k: i64,
    /// number of points to generate
    #[serde(deserialize_with = "lenient")]
    pub points: i64,
    /// iteration limit, 0 for the default cap, negative for no iteration
    #[serde(deserialize_with = "lenient")]
    pub limit: i64,
    #[serde(deserialize_with = "lenient")]
    pub devx: f64,
    #[serde(deserialize_with = "lenient")]
    pub devy: f64,
    #[serde(deserialize_with = "lenient")]
    pub meanx: f64,
    #[serde(deserialize_with = "lenient")]
    pub meany: f64,
}

fn lenient<'de, D, V>(deserializer: D) -> Result<V, D::Error>
where
    D: Deserializer<'de>,
    V: FromStr + Default,
{
    let field = String::deserialize(deserializer)?;
    Ok(field.trim().parse::<V>().unwrap_or_default())
}

impl RunRequest {
    /// true if k or points is not set, nothing is to be computed then.
    pub fn is_empty(&self) -> bool {
        self.k == 0 || self.points == 0
    }

    /// checks k <= points, then k > 0 (so points > 0 too)
    pub fn check(&self) -> anyhow::Result<()> {
        if self.k > self.points {
            return Err(anyhow!("K needs to be <= number of points"));
        }
        if self.k < 0 {
            return Err(anyhow!("K needs to be positive"));
        }
        Ok(())
    }

    /// the kmeans parameters. A negative limit stops after the initial assignment.
    pub fn get_kmeans(&self) -> KMeans {
        let k = usize::try_from(self.k).unwrap_or(0);
        match usize::try_from(self.limit) {
            Ok(limit) => KMeans::new(k, limit),
            Err(_) => KMeans::with_max_iterations(k, 0),
        }
    }

    /// normal distribution is used only if the 4 distribution parameters are non zero
    pub fn is_normal(&self) -> bool {
        self.devx != 0. && self.devy != 0. && self.meanx != 0. && self.meany != 0.
    }

    /// generate the points of the request
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Point<f64>> {
        let nb = usize::try_from(self.points).unwrap_or(0);
        if self.is_normal() {
            log::debug!(
                "normal points, dev : ({}, {}) mean : ({}, {})",
                self.devx,
                self.devy,
                self.meanx,
                self.meany
            );
            normal_points(nb, self.devx, self.devy, self.meanx, self.meany, rng)
        } else {
            log::debug!("uniform points in {} x {}", WIDTH, HEIGHT);
            uniform_points(nb, WIDTH as f64, HEIGHT as f64, rng)
        }
    }

    /// Runs the whole pipeline.
    /// Returns None if the request is empty, an error if k > points or k < 0, otherwise the clustering and its html rendering.
    pub fn execute<R: Rng + ?Sized>(&self, rng: &mut R, config: &RenderConfig) -> anyhow::Result<Option<Report>> {
        if self.is_empty() {
            log::debug!("k or points not set, nothing done");
            return Ok(None);
        }
        self.check()?;
        //
        let points = self.generate(rng);
        let result = self.get_kmeans().run(points, rng);
        result.dump_stats();
        let mut html = summary(&result);
        html.push_str(&to_svg(&result, config, rng));
        Ok(Some(Report { result, html }))
    } // end of execute
} // end of impl RunRequest

/// result of a run with its html rendering (summary followed by svg)
pub struct Report {
    result: ClusteringResult<f64>,
    html: String,
}

impl Report {
    pub fn get_result(&self) -> &ClusteringResult<f64> {
        &self.result
    }

    pub fn get_html(&self) -> &str {
        &self.html
    }
}

// end of mod tests
