//! Geometry primitives for subtitle layout.
//!
//! Two coordinate conventions flow through the engine:
//!
//! ```text
//! Preview canvas  : (0, 0) top-left, y grows downward (points)
//! Export overlay  : (0, 0) bottom-left, y grows upward (pixels)
//! ```
//!
//! Frames produced by the layout engine are expressed in the convention of
//! the target they were laid out for. `Rect::flipped_vertically` converts an
//! export frame into top-left pixel space for rasterizers.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};
use ts_rs::TS;

/// A 2D point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation between two points.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

/// Width and height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Swap width and height (portrait/landscape conversion).
    pub fn transposed(&self) -> Self {
        Self::new(self.height, self.width)
    }

    /// True when either dimension is non-positive or not finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// A rectangular region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn from_coords(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Point::new(x, y), Size::new(width, height))
    }

    /// Rect of `size` whose center sits on the center of `container`.
    pub fn centered_in(size: Size, container: Size) -> Self {
        Self::new(
            Point::new(
                container.width / 2.0 - size.width / 2.0,
                container.height / 2.0 - size.height / 2.0,
            ),
            size,
        )
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Same rect translated by `(dx, dy)`.
    pub fn offset_by(&self, dx: f64, dy: f64) -> Self {
        Self::new(Point::new(self.origin.x + dx, self.origin.y + dy), self.size)
    }

    /// Convert between bottom-left and top-left origin within a container
    /// of the given height. Applying it twice yields the original rect.
    pub fn flipped_vertically(&self, container_height: f64) -> Self {
        Self::new(
            Point::new(self.origin.x, container_height - self.max_y()),
            self.size,
        )
    }

    /// `[left, top, right, bottom]` as f32, for GPU text bounds.
    pub fn to_ltrb(&self) -> [f32; 4] {
        [
            self.min_x() as f32,
            self.min_y() as f32,
            self.max_x() as f32,
            self.max_y() as f32,
        ]
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }
}
