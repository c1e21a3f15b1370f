//! Adjacency classification of lattice points.
//!
//! Each lattice point touches four modules. Their dark/light pattern is
//! packed into a 4-bit configuration code, and a compile-time table maps
//! every code to the boundary directions that leave the point.
//!
//! Bit `d` of the code is the module in quadrant `d`: the module ahead
//! and to the left of a walker leaving the point in
//! `Direction::ALL[d]`.
//!
//! | bit | direction | module relative to lattice point `(c, r)` |
//! |-----|-----------|-------------------------------------------|
//! | 0   | East      | `(c, r - 1)`                              |
//! | 1   | North     | `(c - 1, r - 1)`                          |
//! | 2   | West      | `(c - 1, r)`                              |
//! | 3   | South     | `(c, r)`                                  |
//!
//! A boundary edge departs in direction `d` when quadrant `d` is dark and
//! the clockwise neighbouring quadrant `d - 1` (ahead and to the right)
//! is light, so every edge keeps dark modules on its left.

use crate::grid::Grid;
use crate::types::{Direction, LatticePoint};

/// Module offset `(d_col, d_row)` of each quadrant, indexed like
/// [`Direction::ALL`].
const QUADRANT_OFFSETS: [(i32, i32); 4] = [(0, -1), (-1, -1), (-1, 0), (0, 0)];

/// The boundary directions leaving one lattice point (at most two).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departures {
    directions: [Direction; 2],
    len: usize,
}

impl Departures {
    const NONE: Self = Self {
        directions: [Direction::East; 2],
        len: 0,
    };

    /// The departing directions in counter-clockwise order from East.
    #[must_use]
    pub fn as_slice(&self) -> &[Direction] {
        &self.directions[..self.len]
    }

    /// Number of departing directions.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no boundary passes through the point.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` for the diagonal pinch configurations, where two
    /// boundaries meet at one lattice point.
    #[must_use]
    pub const fn is_corner(&self) -> bool {
        self.len > 1
    }
}

/// Departures for every configuration code.
pub const DEPARTURE_TABLE: [Departures; 16] = build_table();

const fn build_table() -> [Departures; 16] {
    let mut table = [Departures::NONE; 16];
    let mut config = 0;
    while config < 16 {
        let mut entry = Departures::NONE;
        let mut d = 0;
        while d < 4 {
            let ahead_left = (config >> d) & 1 == 1;
            let ahead_right = (config >> ((d + 3) % 4)) & 1 == 1;
            if ahead_left && !ahead_right {
                entry.directions[entry.len] = Direction::ALL[d];
                entry.len += 1;
            }
            d += 1;
        }
        table[config] = entry;
        config += 1;
    }
    table
}

/// Look up the departures for a configuration code.
///
/// Only the low four bits of `config` are used.
#[must_use]
pub const fn departures(config: u8) -> Departures {
    DEPARTURE_TABLE[(config & 0x0f) as usize]
}

/// Configuration code of the lattice point `point` in `grid`.
///
/// Modules outside the grid read as light.
#[must_use]
pub fn configuration(grid: &Grid, point: LatticePoint) -> u8 {
    QUADRANT_OFFSETS
        .iter()
        .enumerate()
        .filter(|(_, (dc, dr))| grid.is_dark(point.col + dc, point.row + dr))
        .fold(0, |code, (bit, _)| code | (1 << bit))
}
