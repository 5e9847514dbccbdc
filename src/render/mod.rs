//! rendering of a clustering result as svg markup

pub mod svg;

pub use svg::{PALETTE, RenderConfig, cluster_colors, summary, to_svg};
