//! Point density and line counts for a complex grid.
//!
//! - `points_per_line`: samples along every full grid line and every boundary.
//! - `n_horizontal_lines` / `n_vertical_lines`: number of spacings per family
//!   (each family draws `n + 1` lines so both rectangle edges are covered).
//!
//! Invariant: the serpentine connector between two lines has
//! `points_per_line / n_lines` samples, so `points_per_line >= n_lines` for
//! both families.
use crate::grid::errors::{GridError, GridResult};

/// Upper bound on lines per family accepted from the presentation layer.
pub const MAX_LINES_PER_FAMILY: usize = 250;

/// Smallest usable number of samples along a line.
pub const MIN_POINTS_PER_LINE: usize = 2;

/// Validated sampling density of a [`ComplexGridArray`](crate::grid::ComplexGridArray).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
///
/// Fields are private: [`GridShape::new`] is the only public constructor, so
/// every shape reaching the geometry code satisfies the invariants above.
///
/// ```compile_fail
/// use complex_graph::grid::GridShape;
///
/// let _ = GridShape { points_per_line: 10, n_horizontal_lines: 0, n_vertical_lines: 2 };
/// ```
pub struct GridShape {
    points_per_line: usize,
    n_horizontal_lines: usize,
    n_vertical_lines: usize,
}

impl GridShape {
    /// Construct and validate a grid shape.
    ///
    /// # Errors
    /// - [`GridError::InvalidLineCount`] if a family has zero lines or more
    ///   than [`MAX_LINES_PER_FAMILY`].
    /// - [`GridError::InvalidPointCount`] if `points_per_line < 2` or
    ///   `points_per_line` is smaller than either line count.
    pub fn new(
        points_per_line: usize, n_horizontal_lines: usize, n_vertical_lines: usize,
    ) -> GridResult<Self> {
        for (family, count) in [("horizontal", n_horizontal_lines), ("vertical", n_vertical_lines)] {
            if count == 0 {
                return Err(GridError::InvalidLineCount {
                    family,
                    count,
                    reason: "At least one line is required.",
                });
            }
            if count > MAX_LINES_PER_FAMILY {
                return Err(GridError::InvalidLineCount {
                    family,
                    count,
                    reason: "Exceeds the maximum of 250 lines per family.",
                });
            }
        }
        if points_per_line < MIN_POINTS_PER_LINE {
            return Err(GridError::InvalidPointCount {
                points: points_per_line,
                reason: "At least 2 points per line are required.",
            });
        }
        if points_per_line < n_horizontal_lines.max(n_vertical_lines) {
            return Err(GridError::InvalidPointCount {
                points: points_per_line,
                reason: "Points per line must be at least the number of lines in each family.",
            });
        }
        Ok(GridShape { points_per_line, n_horizontal_lines, n_vertical_lines })
    }

    /// Built-in views only; callers guarantee the invariants of [`GridShape::new`].
    pub(crate) const fn preset(
        points_per_line: usize, n_horizontal_lines: usize, n_vertical_lines: usize,
    ) -> Self {
        GridShape { points_per_line, n_horizontal_lines, n_vertical_lines }
    }

    pub fn points_per_line(&self) -> usize {
        self.points_per_line
    }

    pub fn n_horizontal_lines(&self) -> usize {
        self.n_horizontal_lines
    }

    pub fn n_vertical_lines(&self) -> usize {
        self.n_vertical_lines
    }
}
