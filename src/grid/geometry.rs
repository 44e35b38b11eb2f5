//! grid::geometry — serpentine polylines tracing a rectangular lattice.
//!
//! Purpose
//! -------
//! Produce raw `(x, y)` coordinate arrays describing one continuous path per
//! line family, so an entire family can be drawn as a single stroke and
//! mapped through a complex function in one vectorized call.
//!
//! Key behaviors
//! -------------
//! - Lines are emitted at offsets `i · spacing` (`spacing = extent / n_lines`)
//!   for `i = 0..=n_lines`, so both rectangle edges are included.
//! - Even-indexed lines run forward along the primary axis, odd-indexed lines
//!   run backwards; the end of one line sits on the same edge as the start of
//!   the next.
//! - Between consecutive lines a connector of `n_points_per_line / n_lines`
//!   samples runs along the rectangle edge, alternating between the far and
//!   near edge (tracked by a sign-flipping offset from the centre).
//! - The vertical family uses the same walk with the axes swapped.
//!
//! Invariants & assumptions
//! ------------------------
//! - Pure functions of their inputs. No validation happens here: callers
//!   must pass `n_lines >= 1` and `n_points_per_line >= n_lines` (see
//!   [`GridShape`](crate::grid::shape::GridShape)).
//! - Output length is `(n_lines + 1) · n_points_per_line
//!   + n_lines · (n_points_per_line / n_lines)` for each family.
//!
//! Conventions
//! -----------
//! - `origin` is the bottom-left corner `(x0, y0)`; `dimensions` is
//!   `(width, height)`.
//! - [`linspace`] follows the NumPy convention: the last sample equals `end`
//!   exactly.
use ndarray::Array1;

/// `n` evenly spaced samples over the closed interval `[start, end]`.
///
/// `n == 1` yields `[start]`; `n == 0` yields an empty array.
pub fn linspace(start: f64, end: f64, n: usize) -> Array1<f64> {
    match n {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, start),
        _ => {
            let step = (end - start) / ((n - 1) as f64);
            Array1::from_shape_fn(n, |i| if i == n - 1 { end } else { start + step * (i as f64) })
        }
    }
}

/// Serpentine walk along a generic primary/secondary axis pair.
///
/// Returns `(primary, secondary)` coordinates. `primary` runs along each line,
/// `secondary` selects which line.
fn serpentine(
    primary_origin: f64, primary_extent: f64, secondary_origin: f64, secondary_extent: f64,
    n_points_per_line: usize, n_lines: usize,
) -> (Vec<f64>, Vec<f64>) {
    debug_assert!(n_lines >= 1, "serpentine grid requires at least one line");

    let line = linspace(primary_origin, primary_origin + primary_extent, n_points_per_line);
    let n_connector = n_points_per_line / n_lines;
    let spacing = secondary_extent / n_lines as f64;
    let connector = linspace(0.0, spacing, n_connector);

    let centre = primary_origin + primary_extent / 2.0;
    let mut offset_from_centre = primary_extent / 2.0;

    let total = (n_lines + 1) * n_points_per_line + n_lines * n_connector;
    let mut primary = Vec::with_capacity(total);
    let mut secondary = Vec::with_capacity(total);

    for i in 0..=n_lines {
        let level = if i == n_lines {
            secondary_origin + secondary_extent
        } else {
            secondary_origin + spacing * i as f64
        };
        if i % 2 == 0 {
            primary.extend(line.iter().copied());
        } else {
            primary.extend(line.iter().rev().copied());
        }
        secondary.extend(std::iter::repeat(level).take(n_points_per_line));

        if i < n_lines {
            let edge = centre + offset_from_centre;
            primary.extend(std::iter::repeat(edge).take(n_connector));
            secondary.extend(connector.iter().map(|c| c + level));
            offset_from_centre = -offset_from_centre;
        }
    }
    (primary, secondary)
}

/// Serpentine path over the horizontal lines of a rectangle.
///
/// # Arguments
/// - `origin`: bottom-left corner `(x0, y0)`.
/// - `dimensions`: `(width, height)`.
/// - `n_points_per_line`: samples along each horizontal line.
/// - `n_lines`: number of spacings between the bottom and top edges.
///
/// # Returns
/// `(x, y)` arrays of equal length.
pub fn horizontal_grid_array(
    origin: (f64, f64), dimensions: (f64, f64), n_points_per_line: usize, n_lines: usize,
) -> (Array1<f64>, Array1<f64>) {
    let (x0, y0) = origin;
    let (w, h) = dimensions;
    let (x, y) = serpentine(x0, w, y0, h, n_points_per_line, n_lines);
    (Array1::from(x), Array1::from(y))
}

/// Serpentine path over the vertical lines of a rectangle.
///
/// Identical to [`horizontal_grid_array`] with the axes swapped: lines run
/// bottom-to-top for even indices, connectors hug the top/bottom edges.
pub fn vertical_grid_array(
    origin: (f64, f64), dimensions: (f64, f64), n_points_per_line: usize, n_lines: usize,
) -> (Array1<f64>, Array1<f64>) {
    let (x0, y0) = origin;
    let (w, h) = dimensions;
    let (y, x) = serpentine(y0, h, x0, w, n_points_per_line, n_lines);
    (Array1::from(x), Array1::from(y))
}

/// Both families as one polyline: the horizontal path followed by the
/// vertical path traversed in reverse.
pub fn grid_array(
    origin: (f64, f64), dimensions: (f64, f64), n_points_per_line: usize, n_vertical_lines: usize,
    n_horizontal_lines: usize,
) -> (Array1<f64>, Array1<f64>) {
    let (xh, yh) = horizontal_grid_array(origin, dimensions, n_points_per_line, n_horizontal_lines);
    let (xv, yv) = vertical_grid_array(origin, dimensions, n_points_per_line, n_vertical_lines);
    let x: Vec<f64> = xh.iter().chain(xv.iter().rev()).copied().collect();
    let y: Vec<f64> = yh.iter().chain(yv.iter().rev()).copied().collect();
    (Array1::from(x), Array1::from(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `linspace` endpoint conventions.
    // - Output length and closed-bounds containment for both families.
    // - Per-line reversal parity and alternating connector placement.
    // - Continuity: consecutive samples never jump across the rectangle.
    //
    // They intentionally DO NOT cover input validation; the generator is
    // pure and validation lives in `GridShape` / `GridBounds`.
    // -------------------------------------------------------------------------

    const TOL: f64 = 1e-12;

    fn expected_len(n_points: usize, n_lines: usize) -> usize {
        (n_lines + 1) * n_points + n_lines * (n_points / n_lines)
    }

    #[test]
    fn linspace_hits_both_endpoints() {
        let v = linspace(-1.0, 1.0, 5);
        assert_eq!(v.to_vec(), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(linspace(3.0, 4.0, 1).to_vec(), vec![3.0]);
        assert_eq!(linspace(3.0, 4.0, 0).len(), 0);
        let w = linspace(0.1, 0.7, 7);
        assert_eq!(w[6], 0.7);
    }

    #[test]
    // Purpose
    // -------
    // Both arrays have equal, non-zero length and every point lies within
    // the closed rectangle, across several shapes.
    fn families_have_equal_length_and_stay_in_bounds() {
        let shapes = [(2usize, 1usize), (8, 4), (10, 3), (101, 7), (50, 50)];
        let origin = (-1.5, 0.25);
        let dims = (3.0, 2.0);
        for (n_points, n_lines) in shapes {
            for (x, y) in [
                horizontal_grid_array(origin, dims, n_points, n_lines),
                vertical_grid_array(origin, dims, n_points, n_lines),
            ] {
                assert_eq!(x.len(), y.len());
                assert_eq!(x.len(), expected_len(n_points, n_lines));
                for (&xi, &yi) in x.iter().zip(y.iter()) {
                    assert!(xi >= origin.0 - TOL && xi <= origin.0 + dims.0 + TOL, "x={xi}");
                    assert!(yi >= origin.1 - TOL && yi <= origin.1 + dims.1 + TOL, "y={yi}");
                }
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Check the serpentine parity contract on the documented small case.
    //
    // Given
    // -----
    // - n_lines = 4, n_points_per_line = 8 over the unit square, so each
    //   block is 8 line samples followed by 2 connector samples.
    //
    // Expect
    // ------
    // - Even lines equal `linspace(0, 1, 8)`; odd lines equal its reverse.
    // - Each line sits at y = i / 4.
    // - Connector after line i lies on x = 1 for even i and x = 0 for odd i,
    //   starts at the line's level and ends at the next line's level.
    fn horizontal_lines_alternate_direction_and_connector_edge() {
        let (x, y) = horizontal_grid_array((0.0, 0.0), (1.0, 1.0), 8, 4);
        let forward = linspace(0.0, 1.0, 8);
        let block = 8 + 2;

        for i in 0..=4 {
            let start = i * block;
            let segment = x.slice(ndarray::s![start..start + 8]);
            let expected: Vec<f64> = if i % 2 == 0 {
                forward.to_vec()
            } else {
                forward.iter().rev().copied().collect()
            };
            assert_eq!(segment.to_vec(), expected, "line {i} direction");
            for k in start..start + 8 {
                assert_abs_diff_eq!(y[k], i as f64 / 4.0, epsilon = TOL);
            }

            if i < 4 {
                let c0 = start + 8;
                let edge = if i % 2 == 0 { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(x[c0], edge, epsilon = TOL);
                assert_abs_diff_eq!(x[c0 + 1], edge, epsilon = TOL);
                assert_abs_diff_eq!(y[c0], i as f64 / 4.0, epsilon = TOL);
                assert_abs_diff_eq!(y[c0 + 1], (i + 1) as f64 / 4.0, epsilon = TOL);
                // connector shares its edge point with the line end and the next line start
                assert_abs_diff_eq!(x[c0 - 1], x[c0], epsilon = TOL);
                assert_abs_diff_eq!(x[c0 + 2], x[c0 + 1], epsilon = TOL);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // The vertical family mirrors the horizontal one with axes swapped:
    // odd lines run top-to-bottom and connectors alternate top/bottom.
    fn vertical_lines_alternate_direction_and_connector_edge() {
        let (x, y) = vertical_grid_array((0.0, -1.0), (2.0, 2.0), 8, 4);
        let forward = linspace(-1.0, 1.0, 8);
        let block = 10;
        for i in 0..=4 {
            let start = i * block;
            let segment = y.slice(ndarray::s![start..start + 8]).to_vec();
            if i % 2 == 0 {
                assert_eq!(segment, forward.to_vec());
            } else {
                assert_eq!(segment, forward.iter().rev().copied().collect::<Vec<_>>());
            }
            assert_abs_diff_eq!(x[start], i as f64 * 0.5, epsilon = TOL);
            if i < 4 {
                let edge = if i % 2 == 0 { 1.0 } else { -1.0 };
                assert_abs_diff_eq!(y[start + 8], edge, epsilon = TOL);
                assert_abs_diff_eq!(y[start + 9], edge, epsilon = TOL);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // No implicit jump: every step between consecutive samples is at most
    // one line spacing or one along-line step, for odd and even line counts.
    fn path_is_continuous_for_odd_and_even_line_counts() {
        for n_lines in [1usize, 2, 3, 5, 6] {
            let n_points = 30;
            let (x, y) = horizontal_grid_array((0.0, 0.0), (3.0, 1.0), n_points, n_lines);
            let max_step_x = 3.0 / (n_points - 1) as f64;
            let max_step_y = 1.0 / n_lines as f64;
            for k in 1..x.len() {
                let dx = (x[k] - x[k - 1]).abs();
                let dy = (y[k] - y[k - 1]).abs();
                assert!(dx <= max_step_x + TOL, "n_lines={n_lines} k={k} dx={dx}");
                assert!(dy <= max_step_y + TOL, "n_lines={n_lines} k={k} dy={dy}");
            }
        }
    }

    #[test]
    fn grid_array_appends_reversed_vertical_family() {
        let origin = (0.0, 0.0);
        let dims = (1.0, 1.0);
        let (xh, yh) = horizontal_grid_array(origin, dims, 6, 2);
        let (xv, yv) = vertical_grid_array(origin, dims, 6, 3);
        let (x, y) = grid_array(origin, dims, 6, 3, 2);
        assert_eq!(x.len(), xh.len() + xv.len());
        assert_eq!(x[xh.len()], xv[xv.len() - 1]);
        assert_eq!(y[y.len() - 1], yv[0]);
        assert_eq!(y[xh.len() - 1], yh[yh.len() - 1]);
    }
}
