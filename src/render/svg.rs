//! svg output of a clustering.
//!
//! Points are drawn as small circles and centroids as larger stroked circles, both filled with the cluster color.
//! Coordinates are scaled and truncated to integers.

use num_traits::float::Float;

use rand::Rng;

use std::collections::HashSet;
use std::fmt::Debug;

use crate::generate::{HEIGHT, WIDTH};
use crate::kmeans::ClusteringResult;

/// colors of the 8 first clusters
pub const PALETTE: [&str; 8] = [
    "#ef4444", "#faa31b", "#009f75", "#fff000", "#82c341", "#88c6ed", "#394ba0", "#d54799",
];

/// geometry of the image
#[derive(Debug, Copy, Clone)]
pub struct RenderConfig {
    // plane dimensions before scaling
    width: u32,
    height: u32,
    scale: f64,
    point_radius: u32,
    centroid_radius: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: WIDTH,
            height: HEIGHT,
            scale: 10.,
            point_radius: 3,
            centroid_radius: 6,
        }
    }
}

impl RenderConfig {
    pub fn new(width: u32, height: u32, scale: f64, point_radius: u32, centroid_radius: u32) -> Self {
        RenderConfig {
            width,
            height,
            scale,
            point_radius,
            centroid_radius,
        }
    }

    /// canvas size in pixels
    pub fn get_canvas_size(&self) -> (u32, u32) {
        (
            (self.width as f64 * self.scale) as u32,
            (self.height as f64 * self.scale) as u32,
        )
    }

    pub fn get_scale(&self) -> f64 {
        self.scale
    }

    pub fn get_point_radius(&self) -> u32 {
        self.point_radius
    }

    pub fn get_centroid_radius(&self) -> u32 {
        self.centroid_radius
    }

    // scaled and truncated coordinate. NaN goes to 0
    fn to_pixel<T: Float>(&self, v: T) -> i64 {
        (v.to_f64().unwrap_or(f64::NAN) * self.scale) as i64
    }
} // end of impl RenderConfig

// number of random colors that can be drawn
const COLOR_SPACE: u32 = 0xffffff;

/// returns one color by cluster. The palette is used first, then distinct random hex colors are drawn.
/// Colors repeat only once every drawable color has been seen.
pub fn cluster_colors<R: Rng + ?Sized>(nb_cluster: usize, rng: &mut R) -> Vec<String> {
    draw_colors(nb_cluster, COLOR_SPACE, rng)
}

// colors drawn in 0..color_space
fn draw_colors<R: Rng + ?Sized>(nb_cluster: usize, color_space: u32, rng: &mut R) -> Vec<String> {
    let mut colors: Vec<String> = PALETTE.iter().take(nb_cluster).map(|c| c.to_string()).collect();
    let mut used: HashSet<String> = colors.iter().cloned().collect();
    let mut seen = HashSet::<u32>::new();
    while colors.len() < nb_cluster {
        let value = rng.random_range(0..color_space);
        seen.insert(value);
        let color = format!("#{:06x}", value);
        if used.insert(color.clone()) || seen.len() >= color_space as usize {
            colors.push(color);
        }
    }
    colors
} // end of draw_colors

/// html paragraph reporting number of iterations and time used
pub fn summary<T>(result: &ClusteringResult<T>) -> String
where
    T: Float + Debug,
{
    format!(
        "<p>Found solution after <b>{} iterations ({:.3} milliseconds)</b></p>",
        result.get_nb_iterations(),
        result.get_elapsed_ms()
    )
}

/// svg document for a clustering result. rng is used only for more than 8 clusters.
pub fn to_svg<T, R>(result: &ClusteringResult<T>, config: &RenderConfig, rng: &mut R) -> String
where
    T: Float + Debug,
    R: Rng + ?Sized,
{
    let colors = cluster_colors(result.get_nb_cluster(), rng);
    let (width, height) = config.get_canvas_size();
    //
    let mut svg = String::new();
    svg.push_str("<?xml version=\"1.0\"?>\n");
    svg.push_str(&format!(
        "<svg width=\"{}\" height=\"{}\"\n     xmlns=\"http://www.w3.org/2000/svg\"\n     xmlns:xlink=\"http://www.w3.org/1999/xlink\">\n",
        width, height
    ));
    for p in result.get_points() {
        svg.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" style=\"fill:{}\" />\n",
            config.to_pixel(p.get_x()),
            config.to_pixel(p.get_y()),
            config.point_radius,
            colors.get(p.get_cluster()).map_or("black", |c| c.as_str())
        ));
    }
    // centroids last so they are drawn over points
    for c in result.get_centroids() {
        svg.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" style=\"stroke:black;fill:{}\" />\n",
            config.to_pixel(c.get_x()),
            config.to_pixel(c.get_y()),
            config.centroid_radius,
            colors.get(c.get_id()).map_or("black", |c| c.as_str())
        ));
    }
    svg.push_str("</svg>\n");
    log::debug!("svg output, {} bytes", svg.len());
    svg
} // end of to_svg

// end of mod tests
