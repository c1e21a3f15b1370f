//! Shared types for the qrpath outline renderer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2D point in lattice units.
///
/// One module of the grid is one unit wide; `x` grows to the right and
/// `y` grows downwards, matching the SVG canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (modules from the left edge).
    pub x: f64,
    /// Vertical position (modules from the top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `other`.
    ///
    /// `t = 0.0` returns `self`, `t = 1.0` returns `other`. The two
    /// weights are applied separately (`self * (1 - t) + other * t`) so
    /// that the endpoints are reproduced exactly.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let s = 1.0 - t;
        Self {
            x: self.x.mul_add(s, other.x * t),
            y: self.y.mul_add(s, other.y * t),
        }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }
}

impl From<LatticePoint> for Point {
    fn from(p: LatticePoint) -> Self {
        Self::new(f64::from(p.col), f64::from(p.row))
    }
}

/// Grid dimensions in modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in modules (number of columns).
    pub width: u32,
    /// Height in modules (number of rows).
    pub height: u32,
}

impl Dimensions {
    /// Returns `true` when either side is zero.
    #[must_use]
    pub const fn is_zero_area(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Direction of a boundary edge leaving a lattice point.
///
/// Variants are declared counter-clockwise as seen on the SVG canvas
/// (y pointing down): East, North, West, South. Turning left therefore
/// means moving to the next variant, turning right to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards increasing column.
    East,
    /// Towards decreasing row (up the page).
    North,
    /// Towards decreasing column.
    West,
    /// Towards increasing row (down the page).
    South,
}

impl Direction {
    /// All directions in counter-clockwise order.
    pub const ALL: [Self; 4] = [Self::East, Self::North, Self::West, Self::South];

    /// Position of this direction in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::East => 0,
            Self::North => 1,
            Self::West => 2,
            Self::South => 3,
        }
    }

    /// Direction at `index` in [`Self::ALL`], taken modulo 4.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// The direction after a 90 degree counter-clockwise turn.
    #[must_use]
    pub const fn turn_left(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The direction after a 90 degree clockwise turn.
    #[must_use]
    pub const fn turn_right(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Unit step `(d_col, d_row)` for this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::East => (1, 0),
            Self::North => (0, -1),
            Self::West => (-1, 0),
            Self::South => (0, 1),
        }
    }
}

/// A grid-line intersection.
///
/// Lattice points lie between and around modules: a grid of
/// `width x height` modules has `(width + 1) x (height + 1)` lattice
/// points. Module `(col, row)` spans the square from lattice point
/// `(col, row)` to `(col + 1, row + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LatticePoint {
    /// Column index of the vertical grid line.
    pub col: i32,
    /// Row index of the horizontal grid line.
    pub row: i32,
}

impl LatticePoint {
    /// Create a new lattice point.
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// The neighbouring lattice point one unit step away.
    ///
    /// Saturates at the `i32` range; grids are bounded far below it.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dc, dr) = direction.delta();
        Self {
            col: self.col.saturating_add(dc),
            row: self.row.saturating_add(dr),
        }
    }
}

impl fmt::Display for LatticePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// A directed boundary-edge departure point.
///
/// The edge runs from [`point`](Self::point) one unit in
/// [`direction`](Self::direction), with dark modules on its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
    /// Where the edge starts.
    pub point: LatticePoint,
    /// Which way the edge leaves.
    pub direction: Direction,
    /// `true` when two edges leave this lattice point (the diagonal
    /// pinch configuration).
    pub is_corner: bool,
}

impl Vertex {
    /// Create a new vertex.
    #[must_use]
    pub const fn new(point: LatticePoint, direction: Direction, is_corner: bool) -> Self {
        Self {
            point,
            direction,
            is_corner,
        }
    }

    /// The lattice point at the far end of this vertex's edge.
    #[must_use]
    pub const fn target(&self) -> LatticePoint {
        self.point.step(self.direction)
    }
}

/// One closed boundary loop.
///
/// Vertices are ordered; the successor of the last vertex is the first.
/// Each vertex's [`target`](Vertex::target) is the next vertex's point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour(Vec<Vertex>);

impl Contour {
    /// Create a contour from an ordered vertex loop.
    #[must_use]
    pub const fn new(vertices: Vec<Vertex>) -> Self {
        Self(vertices)
    }

    /// Returns `true` if the contour has no vertices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of vertices (equal to the number of unit edges).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// The vertices in traversal order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.0
    }

    /// Consumes the contour and returns its vertices.
    #[must_use]
    pub fn into_vertices(self) -> Vec<Vertex> {
        self.0
    }

    /// Twice the signed area enclosed by the loop, in canvas coordinates.
    ///
    /// Negative for loops that run counter-clockwise on the canvas
    /// (outer boundaries of dark regions), positive for clockwise loops
    /// (holes).
    #[must_use]
    pub fn signed_area_doubled(&self) -> i64 {
        self.0
            .iter()
            .map(|v| {
                let a = v.point;
                let b = v.target();
                i64::from(a.col) * i64::from(b.row) - i64::from(b.col) * i64::from(a.row)
            })
            .sum()
    }
}

/// A single path-drawing command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    /// Start a new subpath.
    MoveTo(Point),
    /// Straight segment from the pen position.
    LineTo(Point),
    /// Cubic Bezier segment from the pen position.
    CubicTo {
        /// First control point.
        ctrl1: Point,
        /// Second control point.
        ctrl2: Point,
        /// End point.
        to: Point,
    },
    /// Straight segment back to the subpath start, closing it.
    Close,
}

/// The drawing commands for one contour.
///
/// Starts with [`PathCommand::MoveTo`] and ends with
/// [`PathCommand::Close`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourPath(Vec<PathCommand>);

impl ContourPath {
    /// Create a path from a command list.
    #[must_use]
    pub const fn new(commands: Vec<PathCommand>) -> Self {
        Self(commands)
    }

    /// Returns `true` if the path has no commands.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The commands in drawing order.
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.0
    }

    /// Number of [`PathCommand::LineTo`] commands.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.0
            .iter()
            .filter(|c| matches!(c, PathCommand::LineTo(_)))
            .count()
    }

    /// Number of [`PathCommand::CubicTo`] commands.
    #[must_use]
    pub fn curve_count(&self) -> usize {
        self.0
            .iter()
            .filter(|c| matches!(c, PathCommand::CubicTo { .. }))
            .count()
    }
}

/// The rendered outline of a whole grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Source grid dimensions; serializers use them for the `viewBox`.
    pub dimensions: Dimensions,
    /// One path per contour, in tracing order.
    pub paths: Vec<ContourPath>,
}

impl Outline {
    /// Returns `true` when there is nothing to draw.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Configuration consumed by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Corner rounding factor in `[0, 1]`.
    ///
    /// `0.0` keeps sharp corners; `1.0` turns every simple corner into a
    /// quarter-circle fillet of radius one half module.
    pub rounding: f64,

    /// Fill colour embedded verbatim in the SVG output.
    pub fill_color: String,
}

impl RenderConfig {
    /// Default corner rounding.
    pub const DEFAULT_ROUNDING: f64 = 0.45;

    /// Default fill colour.
    pub const DEFAULT_FILL_COLOR: &'static str = "#000000";

    /// Check that the configuration can be rendered.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::InvalidConfig`] if `rounding` is not a
    /// finite number in `[0, 1]`.
    pub fn validate(&self) -> Result<(), OutlineError> {
        validate_rounding(self.rounding)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rounding: Self::DEFAULT_ROUNDING,
            fill_color: Self::DEFAULT_FILL_COLOR.to_owned(),
        }
    }
}

/// Check a rounding factor.
///
/// # Errors
///
/// Returns [`OutlineError::InvalidConfig`] unless `rounding` is finite
/// and within `[0, 1]`.
pub fn validate_rounding(rounding: f64) -> Result<(), OutlineError> {
    if rounding.is_finite() && (0.0..=1.0).contains(&rounding) {
        Ok(())
    } else {
        Err(OutlineError::InvalidConfig(format!(
            "rounding must be within [0, 1], got {rounding}"
        )))
    }
}

/// Errors that can occur while tracing or rendering an outline.
///
/// The structural variants mean the vertex set does not form a valid
/// boundary graph. They cannot occur for vertices extracted from a
/// rectangular grid and indicate a bug or corrupted input; the render is
/// abandoned without partial output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutlineError {
    /// A traced edge ended at a lattice point with no, or too many,
    /// departing edges.
    #[error("lattice point {point} has {count} departing edges, expected 1 or 2")]
    InvalidDegree {
        /// The lattice point reached.
        point: LatticePoint,
        /// How many vertices depart from it.
        count: usize,
    },

    /// A two-way junction whose departures are not the left and right
    /// turns of the arriving direction.
    #[error("junction at {point} cannot be resolved: arrived heading {arriving:?}, found {found:?}")]
    AmbiguousJunction {
        /// The junction lattice point.
        point: LatticePoint,
        /// Direction of the edge arriving at the junction.
        arriving: Direction,
        /// Directions of the departing edges.
        found: Vec<Direction>,
    },

    /// A walk did not return to its starting vertex.
    #[error("contour starting at {start} does not close")]
    UnclosedContour {
        /// Lattice point of the starting vertex.
        start: LatticePoint,
    },

    /// Render configuration is invalid.
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),
}
