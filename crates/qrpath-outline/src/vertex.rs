//! Vertex extraction: every boundary edge of the grid as a directed
//! departure point.
//!
//! This is stage 1 of rendering, feeding the contour tracer.

use crate::classify::{configuration, departures};
use crate::grid::Grid;
use crate::types::{LatticePoint, Vertex};

/// Extract all boundary-edge departure points of `grid`.
///
/// Visits every lattice point from `(0, 0)` to `(width, height)`
/// inclusive, row by row, and emits one [`Vertex`] per departing
/// direction. Modules outside the grid read as light, so dark modules on
/// the border get a closed outline.
///
/// Every unit edge between a dark and a light module (including the
/// implicit light border) is represented by exactly one vertex at its
/// start point.
#[must_use = "returns the extracted vertices"]
pub fn extract_vertices(grid: &Grid) -> Vec<Vertex> {
    if grid.is_blank() {
        return Vec::new();
    }

    let (width, height) = grid.lattice_extent();
    let mut vertices = Vec::new();

    for row in 0..=height {
        for col in 0..=width {
            let point = LatticePoint::new(col, row);
            let found = departures(configuration(grid, point));
            let is_corner = found.is_corner();
            vertices.extend(
                found
                    .as_slice()
                    .iter()
                    .map(|&direction| Vertex::new(point, direction, is_corner)),
            );
        }
    }

    vertices
}
