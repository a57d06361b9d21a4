//! Box-fitting layout solver.
//!
//! Partitions the canvas into non-overlapping regions for edge-positioned
//! boxes (scales, legend, title) and a remaining chart area. See
//! [`solve`] for the algorithm.

mod solver;

pub use solver::{solve, ChartLayout, LayoutBox, Position};
