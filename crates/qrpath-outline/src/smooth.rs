//! Corner smoothing: turn a traced contour into drawing commands with
//! rounded corners.
//!
//! Every unit edge is shortened by `rounding / 2` at each end. Straight
//! runs collapse into one line; at each simple 90 degree turn the gap
//! between the shortened edges is bridged with a cubic Bezier whose
//! control points sit [`CIRCLE_TWEAK`] of the way back towards the
//! corner, which approximates a circular fillet. At a diagonal pinch
//! point both boundaries already touch, so the path runs straight into
//! the lattice point instead.
//!
//! This is stage 3 of rendering, after contour tracing.

use crate::types::{Contour, ContourPath, PathCommand, Point, Vertex};

/// Bezier handle length for approximating a quarter circle with one
/// cubic segment, as a fraction of the radius.
pub const CIRCLE_KAPPA: f64 = 0.552_284_749;

/// Distance from the corner to a fillet control point, as a fraction of
/// the shortening distance.
pub const CIRCLE_TWEAK: f64 = 1.0 - CIRCLE_KAPPA;

/// The two inset points of `vertex`'s edge.
///
/// With `s = extra * rounding / 2`, returns the point `s` along the edge
/// from its start and the point `s` before its end.
fn inset(vertex: &Vertex, rounding: f64, extra: f64) -> (Point, Point) {
    let from = Point::from(vertex.point);
    let to = Point::from(vertex.target());
    let s = extra * rounding / 2.0;
    (from.lerp(to, s), to.lerp(from, s))
}

/// Accumulates commands while tracking the pen so zero-length segments
/// can be dropped.
struct PathBuilder {
    commands: Vec<PathCommand>,
    pen: Point,
}

impl PathBuilder {
    fn new(start: Point) -> Self {
        Self {
            commands: vec![PathCommand::MoveTo(start)],
            pen: start,
        }
    }

    fn line_to(&mut self, to: Point) {
        if to != self.pen {
            self.commands.push(PathCommand::LineTo(to));
            self.pen = to;
        }
    }

    fn curve_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        if ctrl1 == self.pen && ctrl2 == self.pen && to == self.pen {
            return;
        }
        self.commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
        self.pen = to;
    }

    fn close(mut self) -> ContourPath {
        self.commands.push(PathCommand::Close);
        ContourPath::new(self.commands)
    }
}

/// Convert one contour into drawing commands.
///
/// `rounding` is expected in `[0, 1]` (see
/// [`validate_rounding`](crate::types::validate_rounding)); `0.0` gives
/// the plain polygon, `1.0` quarter-circle fillets of radius one half.
/// An empty contour gives an empty path.
#[must_use = "returns the contour path"]
pub fn smooth_contour(contour: &Contour, rounding: f64) -> ContourPath {
    let vertices = contour.vertices();
    let Some(first) = vertices.first() else {
        return ContourPath::new(Vec::new());
    };

    let mut path = PathBuilder::new(inset(first, rounding, 1.0).0);

    let successors = vertices.iter().skip(1).chain(std::iter::once(first));
    for (current, next) in vertices.iter().zip(successors) {
        if next.direction == current.direction {
            continue;
        }

        if next.is_corner {
            path.line_to(Point::from(next.point));
        } else {
            let (_, bend_start) = inset(current, rounding, 1.0);
            let (_, ctrl1) = inset(current, rounding, CIRCLE_TWEAK);
            let (ctrl2, _) = inset(next, rounding, CIRCLE_TWEAK);
            let (bend_end, _) = inset(next, rounding, 1.0);

            path.line_to(bend_start);
            path.curve_to(ctrl1, ctrl2, bend_end);
        }
    }

    path.close()
}

/// Convert every contour, in order.
#[must_use = "returns the contour paths"]
pub fn smooth_contours(contours: &[Contour], rounding: f64) -> Vec<ContourPath> {
    contours
        .iter()
        .map(|c| smooth_contour(c, rounding))
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::trace::trace_contours;
    use crate::types::{Direction, LatticePoint};
    use crate::vertex::extract_vertices;

    fn contours_of(picture: &str) -> Vec<Contour> {
        let grid: Grid = picture.parse().unwrap();
        trace_contours(&extract_vertices(&grid)).unwrap()
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn assert_close(a: Point, b: Point) {
        assert!(
            a.distance(b) < 1e-9,
            "expected ({}, {}) to be close to ({}, {})",
            a.x,
            a.y,
            b.x,
            b.y
        );
    }

    #[test]
    fn empty_contour_gives_empty_path() {
        assert!(smooth_contour(&Contour::new(Vec::new()), 0.5).is_empty());
    }

    #[test]
    fn sharp_unit_square() {
        let contours = contours_of("#");
        let path = smooth_contour(&contours[0], 0.0);
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(p(1.0, 1.0)),
                PathCommand::LineTo(p(1.0, 0.0)),
                PathCommand::LineTo(p(0.0, 0.0)),
                PathCommand::LineTo(p(0.0, 1.0)),
                PathCommand::LineTo(p(1.0, 1.0)),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn fully_rounded_unit_square_is_four_arcs() {
        let contours = contours_of("#");
        let path = smooth_contour(&contours[0], 1.0);
        assert_eq!(path.curve_count(), 4);
        assert_eq!(path.line_count(), 0);

        // First arc: from the middle of the right edge, around the
        // top-right corner, to the middle of the top edge.
        assert_eq!(path.commands()[0], PathCommand::MoveTo(p(1.0, 0.5)));
        let PathCommand::CubicTo { ctrl1, ctrl2, to } = path.commands()[1] else {
            unreachable!("expected a curve, got {:?}", path.commands()[1]);
        };
        let handle = CIRCLE_TWEAK / 2.0;
        assert_close(ctrl1, p(1.0, handle));
        assert_close(ctrl2, p(1.0 - handle, 0.0));
        assert_close(to, p(0.5, 0.0));
    }

    #[test]
    fn fillet_approximates_quarter_circle() {
        let contours = contours_of("#");
        let path = smooth_contour(&contours[0], 1.0);
        let PathCommand::CubicTo { ctrl1, ctrl2, to } = path.commands()[1] else {
            unreachable!();
        };
        let from = p(1.0, 0.5);
        // The arc is centred on (0.5, 0.5) with radius 0.5.
        let center = p(0.5, 0.5);
        for i in 0..=16 {
            let t = f64::from(i) / 16.0;
            let point = cubic_point(from, ctrl1, ctrl2, to, t);
            let radius = point.distance(center);
            assert!((radius - 0.5).abs() < 0.5 * 3e-4, "t={t} radius={radius}");
        }
    }

    #[test]
    fn partial_rounding_mixes_lines_and_arcs() {
        let contours = contours_of("#");
        let path = smooth_contour(&contours[0], 0.5);
        assert_eq!(path.curve_count(), 4);
        assert_eq!(path.line_count(), 4);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(p(1.0, 0.75)));
        assert_eq!(path.commands()[1], PathCommand::LineTo(p(1.0, 0.25)));
    }

    #[test]
    fn straight_runs_collapse_into_one_line() {
        let contours = contours_of("####");
        let path = smooth_contour(&contours[0], 0.0);
        // Four sides, no intermediate points along the long edges.
        assert_eq!(path.line_count(), 4);
        assert_eq!(path.curve_count(), 0);
    }

    #[test]
    fn pinch_point_is_not_rounded() {
        let contours = contours_of("#.\n.#");
        for contour in &contours {
            let path = smooth_contour(contour, 1.0);
            // Three rounded corners and a sharp one at the pinch point.
            assert_eq!(path.curve_count(), 3);
            assert!(path
                .commands()
                .contains(&PathCommand::LineTo(p(1.0, 1.0))));
        }
    }

    #[test]
    fn path_starts_with_move_and_ends_with_close() {
        for contour in contours_of("##.\n#.#\n.##") {
            let path = smooth_contour(&contour, 0.45);
            assert!(matches!(path.commands().first(), Some(PathCommand::MoveTo(_))));
            assert_eq!(path.commands().last(), Some(&PathCommand::Close));
        }
    }

    #[test]
    fn inset_points() {
        let vertex = Vertex::new(LatticePoint::new(2, 3), Direction::East, false);
        let (start, end) = inset(&vertex, 0.5, 1.0);
        assert_eq!(start, p(2.25, 3.0));
        assert_eq!(end, p(2.75, 3.0));
    }

    fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
        let u = 1.0 - t;
        let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        p(
            a * p0.x + b * p1.x + c * p2.x + d * p3.x,
            a * p0.y + b * p1.y + c * p2.y + d * p3.y,
        )
    }
}
