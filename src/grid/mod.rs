//! grid — serpentine reference grids in the complex plane.
//!
//! Purpose
//! -------
//! Produce the point sequences a presentation layer pushes through a complex
//! function: one continuous polyline per line family, the four rectangle
//! edges, and arbitrary parametric paths.
//!
//! Key behaviors
//! -------------
//! - [`geometry`] holds the pure serpentine generator
//!   ([`horizontal_grid_array`], [`vertical_grid_array`], [`grid_array`]).
//! - [`GridBounds`] and [`GridShape`] validate user input; every dimension
//!   error is reported as a [`GridError`] before geometry is generated.
//! - [`ComplexGridArray`] is the immutable complex grid; [`MappedGrid`] is
//!   its image under a function.
//! - [`ParametricPath`] and [`find_zeros`] cover curve sampling and zero
//!   search.
//!
//! Conventions
//! -----------
//! - Rectangles are `[x_min, y_min, x_max, y_max]`; origins are bottom-left.
//! - Line counts are numbers of spacings, so a family draws `n + 1` lines.
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to each file; the end-to-end grid → function →
//!   image flow is covered in `tests/integration_complex_pipeline.rs`.

pub mod bounds;
pub mod complex_grid;
pub mod errors;
pub mod geometry;
pub mod path;
pub mod shape;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::bounds::GridBounds;
pub use self::complex_grid::{ComplexGridArray, MappedGrid};
pub use self::errors::{GridError, GridResult};
pub use self::geometry::{grid_array, horizontal_grid_array, linspace, vertical_grid_array};
pub use self::path::{find_zeros, ParametricPath, ZeroSearchOptions};
pub use self::shape::{GridShape, MAX_LINES_PER_FAMILY};

// ---- Optional convenience prelude for downstream crates -------------------
//
// `use complex_graph::grid::prelude::*;` imports the grid surface in one line.

pub mod prelude {
    pub use super::{
        find_zeros, ComplexGridArray, GridBounds, GridError, GridResult, GridShape, MappedGrid,
        ParametricPath, ZeroSearchOptions,
    };
}
