//! qrpath-outline: module grid to rounded vector outline (sans-IO).
//!
//! Converts a boolean module grid (such as a QR code) into closed vector
//! outlines with optionally rounded corners, through:
//! classification -> vertex extraction -> contour tracing -> corner
//! smoothing.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! grids and returns structured drawing commands. Turning them into SVG
//! text lives in `qrpath-export`; encoding payloads into grids and all
//! filesystem interaction live in the `qrpath` CLI.
//!
//! ```
//! use qrpath_outline::{Grid, RenderConfig, render};
//!
//! let grid: Grid = "#.\n.#".parse().unwrap();
//! let outline = render(&grid, &RenderConfig::default()).unwrap();
//! // Diagonal neighbours stay two separate shapes.
//! assert_eq!(outline.paths.len(), 2);
//! ```

pub mod classify;
pub mod diagnostics;
pub mod grid;
pub mod smooth;
pub mod trace;
pub mod types;
pub mod vertex;

pub use diagnostics::{Clock, RenderDiagnostics, render_with_diagnostics};
pub use grid::{Grid, GridError};
pub use smooth::smooth_contour;
pub use trace::trace_contours;
pub use types::{
    Contour, ContourPath, Dimensions, Direction, LatticePoint, Outline, OutlineError,
    PathCommand, Point, RenderConfig, Vertex, validate_rounding,
};
pub use vertex::extract_vertices;

/// Extract and trace the boundary contours of `grid`.
///
/// A blank or zero-area grid gives no contours.
///
/// # Errors
///
/// Returns an [`OutlineError`] structural variant if tracing fails,
/// which does not happen for any rectangular grid.
pub fn trace_grid(grid: &Grid) -> Result<Vec<Contour>, OutlineError> {
    trace_contours(&extract_vertices(grid))
}

/// Render the rounded outline of every dark region in `grid`.
///
/// # Pipeline steps
///
/// 1. Classify every lattice point and extract boundary vertices
/// 2. Trace vertices into closed contours
/// 3. Replace corners with Bezier fillets according to
///    [`RenderConfig::rounding`]
///
/// The returned [`Outline`] carries the grid dimensions, needed by
/// serializers to set the coordinate space (e.g. SVG `viewBox`). A blank
/// or zero-area grid gives an outline with no paths.
///
/// # Errors
///
/// Returns [`OutlineError::InvalidConfig`] if the rounding factor is not
/// within `[0, 1]`, and a structural [`OutlineError`] variant if tracing
/// fails.
pub fn render(grid: &Grid, config: &RenderConfig) -> Result<Outline, OutlineError> {
    config.validate()?;
    let contours = trace_grid(grid)?;
    let paths = smooth::smooth_contours(&contours, config.rounding);
    Ok(Outline {
        dimensions: grid.dimensions(),
        paths,
    })
}
