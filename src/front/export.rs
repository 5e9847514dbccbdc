//! csv dump of a clustering : one record by point then one record by centroid

use anyhow::anyhow;

use num_traits::float::Float;
use serde::Serialize;

use std::fmt::Debug;
use std::path::Path;

use crate::kmeans::ClusteringResult;

#[derive(Debug, Serialize)]
struct Record<'a> {
    kind: &'a str,
    x: f64,
    y: f64,
    cluster: usize,
}

/// writes columns kind,x,y,cluster with kind being "point" or "centroid"
pub fn dump_csv<T>(result: &ClusteringResult<T>, path: &Path) -> anyhow::Result<()>
where
    T: Float + Debug,
{
    let mut writer = match csv::Writer::from_path(path) {
        Ok(writer) => writer,
        Err(e) => {
            log::error!("dump_csv could not open file {}", path.display());
            return Err(anyhow!("dump_csv could not open file {} : {}", path.display(), e));
        }
    };
    let to_f64 = |v: T| v.to_f64().unwrap_or(f64::NAN);
    for p in result.get_points() {
        writer.serialize(Record {
            kind: "point",
            x: to_f64(p.get_x()),
            y: to_f64(p.get_y()),
            cluster: p.get_cluster(),
        })?;
    }
    for c in result.get_centroids() {
        writer.serialize(Record {
            kind: "centroid",
            x: to_f64(c.get_x()),
            y: to_f64(c.get_y()),
            cluster: c.get_id(),
        })?;
    }
    writer.flush()?;
    log::info!(
        "dumped {} points and {} centroids in {}",
        result.get_points().len(),
        result.get_nb_cluster(),
        path.display()
    );
    Ok(())
} // end of dump_csv

// end of mod tests
