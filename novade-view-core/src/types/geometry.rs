//! Geometric primitives shared by views, layer surfaces and outputs.
//!
//! [`Point`] and [`Size`] are generic over their numeric type. [`Rect`] is the
//! integer layout box used for output geometry, usable areas and damage.

use num_traits::Num;
use std::ops::{Add, Sub};

/// A 2D point with generic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point<T: Num + Copy> {
    /// The x-coordinate of the point.
    pub x: T,
    /// The y-coordinate of the point.
    pub y: T,
}

impl<T: Num + Copy> Point<T> {
    /// Creates a new point with the given coordinates.
    pub const fn new(x: T, y: T) -> Self {
        Point { x, y }
    }
}

impl<T: Num + Copy + Eq> Eq for Point<T> {}

impl<T: Num + Copy> Add for Point<T> {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl<T: Num + Copy> Sub for Point<T> {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// A 2D size (width and height) with generic dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size<T: Num + Copy> {
    /// The width component of the size.
    pub width: T,
    /// The height component of the size.
    pub height: T,
}

impl<T: Num + Copy> Size<T> {
    /// Creates a new size with the given width and height.
    pub const fn new(width: T, height: T) -> Self {
        Size { width, height }
    }

    /// Returns `true` if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width.is_zero() || self.height.is_zero()
    }
}

impl<T: Num + Copy + Eq> Eq for Size<T> {}

/// An integer layout box: origin plus extent, in layout or output-local coordinates.
///
/// Width and height are signed so that intermediate arrangement results can
/// go negative and be rejected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new layout box.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    /// Creates a box at the origin with the given size.
    pub const fn from_size(width: i32, height: i32) -> Self {
        Rect { x: 0, y: 0, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns `true` if the box has no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Checks whether a floating point coordinate lies inside the box.
    ///
    /// The left and top edges are inclusive, the right and bottom edges exclusive.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        !self.is_empty()
            && x >= self.x as f64
            && x < self.right() as f64
            && y >= self.y as f64
            && y < self.bottom() as f64
    }

    /// Checks whether two boxes overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Calculates the overlapping area of two boxes, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        if x1 < x2 && y1 < y2 {
            Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Returns the box moved by the given offset.
    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// The center point of the box.
    pub fn center(&self) -> Point<f64> {
        Point::new(
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_point_is_half_open() {
        let rect = Rect::new(0, 0, 200, 100);
        assert!(rect.contains_point(0.0, 0.0));
        assert!(rect.contains_point(199.5, 99.5));
        assert!(!rect.contains_point(200.0, 50.0));
        assert!(!rect.contains_point(50.0, 100.0));
        assert!(!rect.contains_point(-0.1, 50.0));
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 100, 100);
        assert_eq!(a.intersection(&b), Some(Rect::new(50, 50, 50, 50)));
        assert!(a.intersects(&b));

        let c = Rect::new(100, 0, 10, 10);
        assert_eq!(a.intersection(&c), None, "touching edges do not overlap");
    }

    #[test]
    fn empty_rect_contains_nothing() {
        let rect = Rect::new(10, 10, 0, 50);
        assert!(rect.is_empty());
        assert!(!rect.contains_point(10.0, 20.0));
    }

    #[test]
    fn point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, 1.5);
        assert_eq!(a + b, Point::new(4.0, 5.5));
        assert_eq!(a - b, Point::new(2.0, 2.5));
    }

    #[test]
    fn size_is_empty() {
        assert!(Size::new(0u32, 10).is_empty());
        assert!(!Size::new(5u32, 10).is_empty());
    }
}
