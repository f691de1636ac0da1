//! Geometric primitives for graph layout.
//!
//! This module provides the geometric types the layout engines use to read
//! node extents, compute placements and test edge crossings.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in layout space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`segments_intersect`] - Proper intersection test for two line segments
//!
//! # Coordinate System
//!
//! Strata uses a screen-style coordinate system:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Vertical layered layouts place level 0 at the top and grow downward.

/// A 2D point representing a position in layout coordinate space.
///
/// # Examples
///
/// ```
/// # use strata_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point
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

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
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

/// A rectangular bounding box with minimum and maximum coordinates.
///
/// Node extents, scope viewports and spatial query regions are all
/// expressed as bounds.
///
/// # Examples
///
/// ```
/// # use strata_core::geometry::{Bounds, Point, Size};
/// let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(40.0, 30.0));
/// assert_eq!(bounds.center(), Point::new(30.0, 35.0));
///
/// let moved = bounds.translate(Point::new(-10.0, 5.0));
/// assert_eq!(moved.min_point(), Point::new(0.0, 25.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds from a top-left corner and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
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

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Moves the bounds by the specified offset
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Returns true if the point lies inside or on the border of the bounds
    pub fn contains_point(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Returns true if the two bounds share any area or border
    pub fn intersects(self, other: Bounds) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Returns true if the segment `a`-`b` touches the bounds.
    ///
    /// A segment intersects the bounds when either endpoint is inside, or
    /// when it crosses one of the four sides.
    pub fn intersects_segment(self, a: Point, b: Point) -> bool {
        if self.contains_point(a) || self.contains_point(b) {
            return true;
        }

        let top_left = Point::new(self.min_x, self.min_y);
        let top_right = Point::new(self.max_x, self.min_y);
        let bottom_left = Point::new(self.min_x, self.max_y);
        let bottom_right = Point::new(self.max_x, self.max_y);

        [
            (top_left, top_right),
            (top_right, bottom_right),
            (bottom_right, bottom_left),
            (bottom_left, top_left),
        ]
        .into_iter()
        .any(|(c, d)| segments_touch(a, b, c, d))
    }
}

/// Signed area of the triangle `a`, `b`, `c`; positive when counter-clockwise.
fn orientation(a: Point, b: Point, c: Point) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Returns true if segments `a1`-`a2` and `b1`-`b2` properly cross.
///
/// Segments that only touch at an endpoint, or that are collinear, do not
/// count as crossing. Collinear overlap is a separate cost term in the
/// annealing engine.
///
/// # Examples
///
/// ```
/// # use strata_core::geometry::{Point, segments_intersect};
/// let cross = segments_intersect(
///     Point::new(0.0, 0.0),
///     Point::new(2.0, 2.0),
///     Point::new(0.0, 2.0),
///     Point::new(2.0, 0.0),
/// );
/// assert!(cross);
///
/// let touching = segments_intersect(
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(1.0, 1.0),
///     Point::new(2.0, 0.0),
/// );
/// assert!(!touching);
/// ```
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);

    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// Like [`segments_intersect`] but also true for touching and collinear overlap.
fn segments_touch(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    if segments_intersect(a1, a2, b1, b2) {
        return true;
    }

    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);

    (d1 == 0.0 && on_segment(b1, b2, a1))
        || (d2 == 0.0 && on_segment(b1, b2, a2))
        || (d3 == 0.0 && on_segment(a1, a2, b1))
        || (d4 == 0.0 && on_segment(a1, a2, b2))
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Translating by the difference of centers moves the center onto the target.
    fn check_translate_to_center(bounds: Bounds, target: Point) -> Result<(), TestCaseError> {
        let moved = bounds.translate(target.sub_point(bounds.center()));

        prop_assert!(approx_eq!(f32, moved.center().x(), target.x(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, moved.center().y(), target.y(), epsilon = 0.01));
        Ok(())
    }

    /// Translation preserves size.
    fn check_translate_preserves_size(bounds: Bounds, offset: Point) -> Result<(), TestCaseError> {
        let moved = bounds.translate(offset);

        prop_assert!(approx_eq!(f32, moved.width(), bounds.width(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, moved.height(), bounds.height(), epsilon = 0.01));
        Ok(())
    }

    /// Segment intersection does not depend on argument order.
    fn check_intersection_is_symmetric(
        a1: Point,
        a2: Point,
        b1: Point,
        b2: Point,
    ) -> Result<(), TestCaseError> {
        prop_assert_eq!(
            segments_intersect(a1, a2, b1, b2),
            segments_intersect(b1, b2, a1, a2)
        );
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn translate_to_center(bounds in bounds_strategy(), target in point_strategy()) {
            check_translate_to_center(bounds, target)?;
        }

        #[test]
        fn translate_preserves_size(bounds in bounds_strategy(), offset in point_strategy()) {
            check_translate_preserves_size(bounds, offset)?;
        }

        #[test]
        fn intersection_is_symmetric(
            a1 in point_strategy(),
            a2 in point_strategy(),
            b1 in point_strategy(),
            b2 in point_strategy(),
        ) {
            check_intersection_is_symmetric(a1, a2, b1, b2)?;
        }
    }
}
