//! Rectangle bounds for a complex grid.
//!
//! A [`GridBounds`] is the validated `[x_min, y_min, x_max, y_max]` rectangle
//! that the presentation layer hands to the core. Construction rejects
//! non-finite values and empty ranges; the pan/zoom helpers return new
//! validated rectangles rather than editing in place.
use crate::grid::errors::{GridError, GridResult};

/// Validated axis-aligned rectangle in the complex plane.
///
/// Invariant: all four bounds are finite, `x_min < x_max` and `y_min < y_max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl GridBounds {
    /// Construct bounds from the four edges.
    ///
    /// # Errors
    /// - [`GridError::NonFiniteBound`] if any edge is NaN or infinite.
    /// - [`GridError::EmptyRange`] if `x_min >= x_max` or `y_min >= y_max`.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> GridResult<Self> {
        for (name, value) in [("x_min", x_min), ("y_min", y_min), ("x_max", x_max), ("y_max", y_max)]
        {
            if !value.is_finite() {
                return Err(GridError::NonFiniteBound { name, value });
            }
        }
        if x_min >= x_max {
            return Err(GridError::EmptyRange { axis: 'x', min: x_min, max: x_max });
        }
        if y_min >= y_max {
            return Err(GridError::EmptyRange { axis: 'y', min: y_min, max: y_max });
        }
        Ok(GridBounds { x_min, y_min, x_max, y_max })
    }

    /// Built-in views only; callers guarantee finite edges with min < max.
    pub(crate) const fn preset(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        GridBounds { x_min, y_min, x_max, y_max }
    }

    /// Construct bounds from `[x_min, y_min, x_max, y_max]`.
    pub fn from_array(dimensions: [f64; 4]) -> GridResult<Self> {
        let [x_min, y_min, x_max, y_max] = dimensions;
        GridBounds::new(x_min, y_min, x_max, y_max)
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Bottom-left corner `(x_min, y_min)`.
    pub fn origin(&self) -> (f64, f64) {
        (self.x_min, self.y_min)
    }

    /// `(width, height)` of the rectangle.
    pub fn dimensions(&self) -> (f64, f64) {
        (self.x_max - self.x_min, self.y_max - self.y_min)
    }

    pub fn centre(&self) -> (f64, f64) {
        ((self.x_min + self.x_max) / 2.0, (self.y_min + self.y_max) / 2.0)
    }

    /// `[x_min, y_min, x_max, y_max]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.x_min, self.y_min, self.x_max, self.y_max]
    }

    /// Enlarge or shrink the rectangle about its centre.
    ///
    /// A factor above 1 zooms out along that axis, below 1 zooms in.
    ///
    /// # Errors
    /// - [`GridError::InvalidScale`] if a factor is non-finite or `<= 0`.
    /// - Any [`GridBounds::new`] error if the result degenerates (e.g. the
    ///   scaled width underflows to zero).
    pub fn scaled(&self, x_factor: f64, y_factor: f64) -> GridResult<Self> {
        for factor in [x_factor, y_factor] {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(GridError::InvalidScale { factor });
            }
        }
        let (xc, yc) = self.centre();
        let (dx, dy) = self.dimensions();
        GridBounds::new(
            xc - x_factor * dx / 2.0,
            yc - y_factor * dy / 2.0,
            xc + x_factor * dx / 2.0,
            yc + y_factor * dy / 2.0,
        )
    }

    /// Shift the rectangle by `(move_by_x, move_by_y)`.
    pub fn translated(&self, move_by_x: f64, move_by_y: f64) -> GridResult<Self> {
        GridBounds::new(
            self.x_min + move_by_x,
            self.y_min + move_by_y,
            self.x_max + move_by_x,
            self.y_max + move_by_y,
        )
    }

    /// Whether `(x, y)` lies inside the closed rectangle, allowing `tol` slack.
    pub fn contains(&self, x: f64, y: f64, tol: f64) -> bool {
        x >= self.x_min - tol && x <= self.x_max + tol && y >= self.y_min - tol && y <= self.y_max + tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Valid rectangles expose origin/dimensions consistent with their edges.
    fn new_accepts_valid_rectangle() {
        let b = GridBounds::new(-2.0, -1.0, 2.0, 3.0).unwrap();
        assert_eq!(b.origin(), (-2.0, -1.0));
        assert_eq!(b.dimensions(), (4.0, 4.0));
        assert_eq!(b.to_array(), [-2.0, -1.0, 2.0, 3.0]);
    }

    #[test]
    // Purpose
    // -------
    // `min >= max` on either axis is a dimension error, never corrected.
    //
    // Expect
    // ------
    // - Equal x bounds → EmptyRange on 'x'; inverted y → EmptyRange on 'y'.
    fn new_rejects_empty_ranges() {
        assert_eq!(
            GridBounds::new(1.0, 0.0, 1.0, 1.0).unwrap_err(),
            GridError::EmptyRange { axis: 'x', min: 1.0, max: 1.0 }
        );
        assert!(matches!(
            GridBounds::new(0.0, 2.0, 1.0, 1.0),
            Err(GridError::EmptyRange { axis: 'y', .. })
        ));
    }

    #[test]
    fn new_rejects_non_finite_bounds() {
        assert!(matches!(
            GridBounds::new(0.0, f64::NEG_INFINITY, 1.0, 1.0),
            Err(GridError::NonFiniteBound { name: "y_min", .. })
        ));
        assert!(matches!(
            GridBounds::from_array([0.0, 0.0, f64::NAN, 1.0]),
            Err(GridError::NonFiniteBound { name: "x_max", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Zooming keeps the centre fixed and multiplies the extents.
    fn scaled_preserves_centre() {
        let b = GridBounds::new(0.0, 0.0, 4.0, 2.0).unwrap();
        let z = b.scaled(0.5, 2.0).unwrap();
        assert_eq!(z.centre(), b.centre());
        assert_relative_eq!(z.dimensions().0, 2.0);
        assert_relative_eq!(z.dimensions().1, 4.0);
        assert!(matches!(b.scaled(0.0, 1.0), Err(GridError::InvalidScale { .. })));
    }

    #[test]
    fn translated_shifts_all_edges() {
        let b = GridBounds::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let t = b.translated(-1.0, 0.5).unwrap();
        assert_eq!(t.to_array(), [-1.0, 0.5, 0.0, 1.5]);
        assert!(t.contains(-0.5, 1.0, 0.0));
        assert!(!t.contains(0.5, 1.0, 0.0));
    }
}
