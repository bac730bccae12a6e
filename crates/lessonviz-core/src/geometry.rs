//! Geometric primitives for diagram layout and positioning.
//!
//! This module provides the small set of geometric types every layout engine
//! works with when it converts domain values (counts, angles, percentages)
//! into canvas coordinates.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Coordinates follow the SVG convention:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Angles are measured in radians from the positive X axis. Because Y grows
//! downward, increasing angles turn clockwise on screen: `-π/2` points to
//! twelve o'clock.

/// A 2D point representing a position in canvas coordinate space.
///
/// # Examples
///
/// ```
/// # use lessonviz_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the point at `radius` from `center` in the direction of `angle` (radians).
    ///
    /// # Examples
    ///
    /// ```
    /// # use lessonviz_core::geometry::Point;
    /// let center = Point::new(100.0, 100.0);
    /// let top = Point::polar(center, 50.0, -std::f32::consts::FRAC_PI_2);
    /// assert!((top.x() - 100.0).abs() < 1e-4);
    /// assert!((top.y() - 50.0).abs() < 1e-4);
    /// ```
    pub fn polar(center: Point, radius: f32, angle: f32) -> Self {
        Self {
            x: radius.mul_add(angle.cos(), center.x),
            y: radius.mul_add(angle.sin(), center.y),
        }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        self.sub_point(other).hypot()
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Creates the smallest bounds containing both corner points, in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns true if the point lies inside or on the edge of the bounds
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_new() {
        let point = Point::new(3.5, 4.2);
        assert_eq!(point.x(), 3.5);
        assert_eq!(point.y(), 4.2);
    }

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(1.0, 2.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.add_point(p2), Point::new(4.0, 6.0));
        assert_eq!(p2.sub_point(p1), Point::new(2.0, 2.0));
    }

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_approx_eq!(f32, p1.distance(p2), 5.0);
    }

    #[test]
    fn test_point_polar_cardinal_directions() {
        let center = Point::new(150.0, 100.0);

        let right = Point::polar(center, 45.0, 0.0);
        assert_approx_eq!(f32, right.x(), 195.0, epsilon = 1e-4);
        assert_approx_eq!(f32, right.y(), 100.0, epsilon = 1e-4);

        // Y grows downward, so +π/2 points to six o'clock
        let bottom = Point::polar(center, 45.0, FRAC_PI_2);
        assert_approx_eq!(f32, bottom.x(), 150.0, epsilon = 1e-4);
        assert_approx_eq!(f32, bottom.y(), 145.0, epsilon = 1e-4);

        let left = Point::polar(center, 45.0, PI);
        assert_approx_eq!(f32, left.x(), 105.0, epsilon = 1e-4);
    }

    #[test]
    fn test_bounds_from_corners_normalizes() {
        let bounds = Bounds::from_corners(Point::new(50.0, 10.0), Point::new(20.0, 40.0));
        assert_eq!(bounds.min_x(), 20.0);
        assert_eq!(bounds.min_y(), 10.0);
        assert_eq!(bounds.max_x(), 50.0);
        assert_eq!(bounds.max_y(), 40.0);
    }

    #[test]
    fn test_bounds_center_and_size() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(40.0, 60.0));
        assert_eq!(bounds.center(), Point::new(30.0, 50.0));
        assert_eq!(bounds.width(), 40.0);
        assert_eq!(bounds.height(), 60.0);
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::new_from_top_left(Point::default(), Size::new(10.0, 10.0));
        assert!(bounds.contains(Point::new(5.0, 5.0)));
        assert!(bounds.contains(Point::new(10.0, 0.0)));
        assert!(!bounds.contains(Point::new(10.1, 5.0)));
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// A polar point always lies at exactly `radius` from its center.
    fn check_polar_distance_is_radius(
        center: Point,
        radius: f32,
        angle: f32,
    ) -> Result<(), TestCaseError> {
        let point = Point::polar(center, radius, angle);
        prop_assert!(approx_eq!(
            f32,
            point.distance(center),
            radius,
            epsilon = 0.01
        ));
        Ok(())
    }

    /// Bounds built from two corners contain both corners and their midpoint.
    fn check_corner_bounds_contain_corners(a: Point, b: Point) -> Result<(), TestCaseError> {
        let bounds = Bounds::from_corners(a, b);
        prop_assert!(bounds.contains(a));
        prop_assert!(bounds.contains(b));
        prop_assert!(bounds.contains(a.midpoint(b)));
        prop_assert!(bounds.width() >= 0.0 && bounds.height() >= 0.0);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn polar_distance_is_radius(
            center in point_strategy(),
            radius in 0.0f32..200.0,
            angle in -10.0f32..10.0,
        ) {
            check_polar_distance_is_radius(center, radius, angle)?;
        }

        #[test]
        fn corner_bounds_contain_corners(a in point_strategy(), b in point_strategy()) {
            check_corner_bounds_contain_corners(a, b)?;
        }
    }
}
