//! The boolean module grid supplied by an encoder.

use std::str::FromStr;

use crate::types::Dimensions;

/// Largest accepted width or height, in modules.
///
/// Keeps every lattice coordinate (up to `width + 1` steps, in either
/// direction) comfortably inside `i32`.
pub const MAX_EXTENT: usize = 1 << 30;

/// A rectangular grid of dark (`true`) and light (`false`) modules.
///
/// Stored row-major. Every row has the same length; this is checked at
/// construction so the rest of the crate can rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Build a grid from rows of modules.
    ///
    /// An empty row list, or rows of length zero, give a zero-area grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::RaggedRow`] if any row's length differs from
    /// the first row's, and [`GridError::TooLarge`] if either side
    /// exceeds [`MAX_EXTENT`].
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        check_extent(width, height)?;

        let mut cells = Vec::with_capacity(width * height);
        for (row, cells_in_row) in rows.iter().enumerate() {
            let cells_in_row = cells_in_row.as_ref();
            if cells_in_row.len() != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    found: cells_in_row.len(),
                });
            }
            cells.extend_from_slice(cells_in_row);
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid by evaluating `is_dark(col, row)` for every module.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::TooLarge`] if either side exceeds
    /// [`MAX_EXTENT`].
    pub fn from_fn(
        width: usize,
        height: usize,
        mut is_dark: impl FnMut(usize, usize) -> bool,
    ) -> Result<Self, GridError> {
        check_extent(width, height)?;
        let cells = (0..height)
            .flat_map(|row| (0..width).map(move |col| (col, row)))
            .map(|(col, row)| is_dark(col, row))
            .collect();
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// A copy of this grid surrounded by `margin` light modules on every
    /// side (the QR "quiet zone").
    ///
    /// # Errors
    ///
    /// Returns [`GridError::TooLarge`] if the padded grid would exceed
    /// [`MAX_EXTENT`].
    pub fn with_margin(&self, margin: usize) -> Result<Self, GridError> {
        let padded = |n: usize| n.saturating_add(margin.saturating_mul(2));
        Self::from_fn(padded(self.width), padded(self.height), |col, row| {
            col.checked_sub(margin)
                .zip(row.checked_sub(margin))
                .is_some_and(|(c, r)| self.get(c, r))
        })
    }

    /// Width in modules.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in modules.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Grid dimensions.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: u32::try_from(self.width).unwrap_or(u32::MAX),
            height: u32::try_from(self.height).unwrap_or(u32::MAX),
        }
    }

    /// Returns `true` if the module at `(col, row)` is dark.
    ///
    /// Positions outside the grid read as light.
    #[must_use]
    pub fn get(&self, col: usize, row: usize) -> bool {
        col < self.width && row < self.height && self.cells[row * self.width + col]
    }

    /// Like [`get`](Self::get) with signed coordinates, so lattice
    /// neighbourhoods can look one module past any border.
    #[must_use]
    pub fn is_dark(&self, col: i32, row: i32) -> bool {
        match (usize::try_from(col), usize::try_from(row)) {
            (Ok(c), Ok(r)) => self.get(c, r),
            _ => false,
        }
    }

    /// Number of dark modules.
    #[must_use]
    pub fn dark_count(&self) -> usize {
        self.cells.iter().filter(|&&dark| dark).count()
    }

    /// Returns `true` if there is nothing to outline: zero area or no
    /// dark module.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        !self.cells.contains(&true)
    }

    /// Lattice extent `(width, height)` as signed coordinates.
    ///
    /// Lattice points run from `(0, 0)` to this value inclusive.
    #[must_use]
    pub fn lattice_extent(&self) -> (i32, i32) {
        (
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }

    /// Iterate over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        // `chunks` rejects a zero chunk size; a zero-width grid has no
        // cells, so any positive size yields no rows.
        self.cells.chunks(self.width.max(1))
    }
}

/// Parses a text picture: one line per row, `#` or `1` for dark
/// modules, `.`, `0` or a space for light ones. Empty lines are ignored
/// and a trailing `\r` is stripped.
///
/// ```
/// use qrpath_outline::Grid;
///
/// let grid: Grid = "#.\n.#".parse().unwrap();
/// assert_eq!(grid.width(), 2);
/// assert!(grid.get(0, 0));
/// assert!(!grid.get(1, 0));
/// ```
impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for (line_idx, line) in s.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            let row = line
                .chars()
                .enumerate()
                .map(|(col_idx, ch)| match ch {
                    '#' | '1' => Ok(true),
                    '.' | '0' | ' ' => Ok(false),
                    found => Err(GridError::InvalidCharacter {
                        line: line_idx + 1,
                        column: col_idx + 1,
                        found,
                    }),
                })
                .collect::<Result<Vec<bool>, GridError>>()?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }
}

fn check_extent(width: usize, height: usize) -> Result<(), GridError> {
    if width > MAX_EXTENT || height > MAX_EXTENT {
        Err(GridError::TooLarge { width, height })
    } else {
        Ok(())
    }
}

/// Errors that can occur while building a [`Grid`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A row's length differs from the first row's.
    #[error("row {row} has {found} modules, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },

    /// The grid exceeds [`MAX_EXTENT`] on some side.
    #[error("grid of {width}x{height} modules exceeds the supported size")]
    TooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// A text picture contains a character that is not a module.
    #[error("line {line}, column {column}: unexpected character {found:?}")]
    InvalidCharacter {
        /// One-based line number.
        line: usize,
        /// One-based column number.
        column: usize,
        /// The offending character.
        found: char,
    },
}
