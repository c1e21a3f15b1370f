//! Contour tracing: link boundary vertices into closed loops.
//!
//! Vertices live in an arena (the input slice) and are looked up by
//! lattice point through a small index; no vertex refers to another
//! directly. A lattice point has at most two departing vertices.
//!
//! # Winding convention
//!
//! Edges keep dark modules on their left, so the outer boundary of a
//! dark region runs counter-clockwise on the canvas and a hole runs
//! clockwise. At a two-way junction (two dark modules touching only at a
//! corner) the walk always takes the **left** turn. That closes each
//! dark region on its own instead of merging diagonal neighbours into a
//! figure eight.
//!
//! This is stage 2 of rendering, between vertex extraction and corner
//! smoothing.

use std::collections::HashMap;

use crate::types::{Contour, LatticePoint, OutlineError, Vertex};

/// Trace `vertices` into closed contours.
///
/// Every input vertex ends up in exactly one contour. Start vertices are
/// taken from the end of `vertices` backwards; this only affects the
/// order of the returned contours and the starting vertex of each.
///
/// # Errors
///
/// Returns an [`OutlineError`] structural variant if the vertices do not
/// form a valid boundary graph:
///
/// - [`OutlineError::InvalidDegree`] when an edge ends at a lattice point
///   with no or more than two departures,
/// - [`OutlineError::AmbiguousJunction`] when a two-way junction does not
///   offer exactly a left and a right turn,
/// - [`OutlineError::UnclosedContour`] when a walk never returns to its
///   start.
///
/// Vertices produced by [`extract_vertices`](crate::vertex::extract_vertices)
/// always trace without error.
pub fn trace_contours(vertices: &[Vertex]) -> Result<Vec<Contour>, OutlineError> {
    let index = VertexIndex::new(vertices);
    let mut visited = vec![false; vertices.len()];
    let mut contours = Vec::new();

    for start in (0..vertices.len()).rev() {
        if visited[start] {
            continue;
        }

        let members = index.walk(start, &visited)?;
        for &i in &members {
            visited[i] = true;
        }
        contours.push(Contour::new(
            members.into_iter().map(|i| vertices[i]).collect(),
        ));
    }

    Ok(contours)
}

/// Lattice-point lookup over a vertex arena.
struct VertexIndex<'a> {
    vertices: &'a [Vertex],
    by_point: HashMap<LatticePoint, Vec<usize>>,
}

impl<'a> VertexIndex<'a> {
    fn new(vertices: &'a [Vertex]) -> Self {
        let mut by_point: HashMap<LatticePoint, Vec<usize>> = HashMap::new();
        for (i, v) in vertices.iter().enumerate() {
            by_point.entry(v.point).or_default().push(i);
        }
        Self { vertices, by_point }
    }

    /// Follow successors from `start` until the walk returns to it.
    fn walk(&self, start: usize, visited: &[bool]) -> Result<Vec<usize>, OutlineError> {
        let mut members = vec![start];
        let mut current = self.successor(start)?;

        while current != start {
            // Either the walk joined a loop that excludes `start`, or it
            // reached a vertex owned by an earlier contour.
            if visited[current] || members.len() >= self.vertices.len() {
                return Err(OutlineError::UnclosedContour {
                    start: self.vertices[start].point,
                });
            }
            members.push(current);
            current = self.successor(current)?;
        }

        Ok(members)
    }

    /// The vertex that continues the boundary after `current`'s edge.
    fn successor(&self, current: usize) -> Result<usize, OutlineError> {
        let vertex = self.vertices[current];
        let point = vertex.target();
        let candidates = self.by_point.get(&point).map_or(&[][..], Vec::as_slice);

        match *candidates {
            [only] => Ok(only),
            [a, b] => {
                let arriving = vertex.direction;
                let (left, right) = (arriving.turn_left(), arriving.turn_right());
                let (da, db) = (self.vertices[a].direction, self.vertices[b].direction);
                if da == left && db == right {
                    Ok(a)
                } else if db == left && da == right {
                    Ok(b)
                } else {
                    Err(OutlineError::AmbiguousJunction {
                        point,
                        arriving,
                        found: vec![da, db],
                    })
                }
            }
            _ => Err(OutlineError::InvalidDegree {
                point,
                count: candidates.len(),
            }),
        }
    }
}
