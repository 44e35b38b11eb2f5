//! grid::complex_grid — immutable complex-valued reference grid.
//!
//! Purpose
//! -------
//! Wrap the serpentine geometry of [`crate::grid::geometry`] as complex point
//! sequences and add the four rectangle edges, so a presentation layer can
//! push every sequence through a complex function and draw the result.
//!
//! Key behaviors
//! -------------
//! - [`ComplexGridArray::new`] takes validated [`GridBounds`] and
//!   [`GridShape`] and cannot fail; [`ComplexGridArray::from_dimensions`] is
//!   the fallible entry point for raw user input.
//! - Boundaries are ordered `[x_min, y_min, x_max, y_max]`: the left edge
//!   (x = x_min), bottom edge (y = y_min), right edge (x = x_max) and top
//!   edge (y = y_max), each sampled with `points_per_line` points.
//! - `xlim` / `ylim` are read from the first sample of the corresponding
//!   boundary, so they always agree with the stored arrays.
//! - [`ComplexGridArray::map_with`] applies one evaluator to all six
//!   sequences and returns a [`MappedGrid`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Instances are immutable: there are no `&mut self` methods. Pan/zoom and
//!   density changes build a new instance.
//! - All stored arrays are finite because bounds are validated finite.
//!
//! Downstream usage
//! ----------------
//! - Build once per view, call `map_with` (or
//!   `CompiledFunction::map_grid`) each frame, and replace the grid wholesale
//!   when the view changes.
use std::f64::consts::PI;

use ndarray::{Array1, ArrayView1};
use num_complex::Complex64;

use crate::grid::{
    bounds::GridBounds,
    errors::GridResult,
    geometry::{grid_array, horizontal_grid_array, linspace, vertical_grid_array},
    shape::GridShape,
};

/// Serpentine grid lines and rectangle edges as complex sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexGridArray {
    bounds: GridBounds,
    shape: GridShape,
    horizontal_lines: Array1<Complex64>,
    vertical_lines: Array1<Complex64>,
    boundaries: [Array1<Complex64>; 4],
}

/// The image of every sequence of a [`ComplexGridArray`] under one function.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedGrid {
    pub horizontal_lines: Array1<Complex64>,
    pub vertical_lines: Array1<Complex64>,
    /// Mapped `[x_min, y_min, x_max, y_max]` edges.
    pub boundaries: [Array1<Complex64>; 4],
}

fn to_complex(x: &Array1<f64>, y: &Array1<f64>) -> Array1<Complex64> {
    x.iter().zip(y.iter()).map(|(&re, &im)| Complex64::new(re, im)).collect()
}

impl ComplexGridArray {
    /// Build the grid for validated bounds and shape.
    pub fn new(bounds: GridBounds, shape: GridShape) -> Self {
        let origin = bounds.origin();
        let dims = bounds.dimensions();
        let npl = shape.points_per_line();

        let (hx, hy) = horizontal_grid_array(origin, dims, npl, shape.n_horizontal_lines());
        let (vx, vy) = vertical_grid_array(origin, dims, npl, shape.n_vertical_lines());

        let xs = linspace(bounds.x_min(), bounds.x_max(), npl);
        let ys = linspace(bounds.y_min(), bounds.y_max(), npl);
        let x_min = ys.mapv(|y| Complex64::new(bounds.x_min(), y));
        let y_min = xs.mapv(|x| Complex64::new(x, bounds.y_min()));
        let x_max = ys.mapv(|y| Complex64::new(bounds.x_max(), y));
        let y_max = xs.mapv(|x| Complex64::new(x, bounds.y_max()));

        ComplexGridArray {
            bounds,
            shape,
            horizontal_lines: to_complex(&hx, &hy),
            vertical_lines: to_complex(&vx, &vy),
            boundaries: [x_min, y_min, x_max, y_max],
        }
    }

    /// Validate raw `[x_min, y_min, x_max, y_max]` and counts, then build.
    ///
    /// # Errors
    /// Any [`GridError`](crate::grid::GridError) raised by
    /// [`GridBounds::from_array`] or [`GridShape::new`].
    pub fn from_dimensions(
        dimensions: [f64; 4], points_per_line: usize, n_horizontal_lines: usize,
        n_vertical_lines: usize,
    ) -> GridResult<Self> {
        let bounds = GridBounds::from_array(dimensions)?;
        let shape = GridShape::new(points_per_line, n_horizontal_lines, n_vertical_lines)?;
        Ok(ComplexGridArray::new(bounds, shape))
    }

    /// The general-purpose starting view: `[-π/2, -π/3, π/2, π/3]` with 1000
    /// points per line, 30 horizontal and 40 vertical lines.
    pub fn default_view() -> Self {
        ComplexGridArray::new(
            GridBounds::preset(-PI / 2.0, -PI / 3.0, PI / 2.0, PI / 3.0),
            GridShape::preset(1000, 30, 40),
        )
    }

    /// The wider view used with the zeta preset: `[-8π/5, -π, 8π/5, π]` with
    /// 250 points per line, 48 horizontal and 60 vertical lines.
    pub fn zeta_view() -> Self {
        ComplexGridArray::new(
            GridBounds::preset(-8.0 * PI / 5.0, -PI, 8.0 * PI / 5.0, PI),
            GridShape::preset(250, 48, 60),
        )
    }

    /// Rebuild an equivalent grid from the current limits and density.
    ///
    /// `xlim()`/`ylim()` read back exactly the edges of `bounds`, so the
    /// validated bounds are reused instead of being re-checked.
    pub fn get_copy(&self) -> Self {
        ComplexGridArray::new(self.bounds, self.shape)
    }

    /// Same density, new rectangle.
    pub fn with_bounds(&self, bounds: GridBounds) -> Self {
        ComplexGridArray::new(bounds, self.shape)
    }

    /// Same rectangle, new density.
    pub fn with_shape(&self, shape: GridShape) -> Self {
        ComplexGridArray::new(self.bounds, shape)
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn horizontal_lines(&self) -> ArrayView1<'_, Complex64> {
        self.horizontal_lines.view()
    }

    pub fn vertical_lines(&self) -> ArrayView1<'_, Complex64> {
        self.vertical_lines.view()
    }

    /// Edges ordered `[x_min, y_min, x_max, y_max]`.
    pub fn boundaries(&self) -> [ArrayView1<'_, Complex64>; 4] {
        [
            self.boundaries[0].view(),
            self.boundaries[1].view(),
            self.boundaries[2].view(),
            self.boundaries[3].view(),
        ]
    }

    /// `[Re x_min[0], Re x_max[0]]`.
    pub fn xlim(&self) -> [f64; 2] {
        [self.boundaries[0][0].re, self.boundaries[2][0].re]
    }

    /// `[Im y_min[0], Im y_max[0]]`.
    pub fn ylim(&self) -> [f64; 2] {
        [self.boundaries[1][0].im, self.boundaries[3][0].im]
    }

    pub fn points_per_line(&self) -> usize {
        self.shape.points_per_line()
    }

    pub fn n_horizontal_lines(&self) -> usize {
        self.shape.n_horizontal_lines()
    }

    pub fn n_vertical_lines(&self) -> usize {
        self.shape.n_vertical_lines()
    }

    /// Both families as one complex polyline (horizontal, then the vertical
    /// family reversed).
    pub fn combined_lines(&self) -> Array1<Complex64> {
        let (x, y) = grid_array(
            self.bounds.origin(),
            self.bounds.dimensions(),
            self.shape.points_per_line(),
            self.shape.n_vertical_lines(),
            self.shape.n_horizontal_lines(),
        );
        to_complex(&x, &y)
    }

    /// Apply `f` to both line families and the four edges.
    ///
    /// The first error returned by `f` aborts the mapping and is passed
    /// through untouched.
    pub fn map_with<E, F>(&self, mut f: F) -> Result<MappedGrid, E>
    where
        F: FnMut(ArrayView1<'_, Complex64>) -> Result<Array1<Complex64>, E>,
    {
        let horizontal_lines = f(self.horizontal_lines.view())?;
        let vertical_lines = f(self.vertical_lines.view())?;
        let boundaries = [
            f(self.boundaries[0].view())?,
            f(self.boundaries[1].view())?,
            f(self.boundaries[2].view())?,
            f(self.boundaries[3].view())?,
        ];
        Ok(MappedGrid { horizontal_lines, vertical_lines, boundaries })
    }
}

impl Default for ComplexGridArray {
    fn default() -> Self {
        ComplexGridArray::default_view()
    }
}
