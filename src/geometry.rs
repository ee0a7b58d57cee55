//! Surface geometry: pixel points and rectangles, fractional targets.
//!
//! Elements are positioned with fractions of the surface so the same scene
//! fits any resolution. A [`Target`] carries one fractional rectangle for a
//! wide surface and one for a tall surface; it is resolved into a pixel
//! [`Rect`] on every frame from the surface size current at that moment.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A point in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self - other).length()
    }

    /// Length of this point taken as a vector from the origin.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Dimensions of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Wide surfaces use the `wide` half of a [`Target`].
    #[must_use]
    pub fn is_wide(self) -> bool {
        self.width > self.height
    }

    #[must_use]
    pub fn diagonal(self) -> f64 {
        self.width.hypot(self.height)
    }

    #[must_use]
    pub fn min_side(self) -> f64 {
        self.width.min(self.height)
    }
}

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Half-open containment: the left and top edges are inside, the right
    /// and bottom edges are not. Empty or inverted rectangles contain nothing.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.left < self.right
            && self.top < self.bottom
            && p.x >= self.left
            && p.x < self.right
            && p.y >= self.top
            && p.y < self.bottom
    }
}

/// Rectangle expressed as fractions of the surface width and height.
///
/// Values outside `0..=1` are accepted as given; clamping is the caller's
/// choice (see [`crate::config::ClampPolicy`]).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FracRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl FracRect {
    /// The whole surface.
    pub const FULL: FracRect = FracRect { left: 0.0, top: 0.0, right: 1.0, bottom: 1.0 };

    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// Scale into pixels for a surface of the given size.
    #[must_use]
    pub fn resolve(&self, surface: Size) -> Rect {
        Rect::new(
            self.left * surface.width,
            self.top * surface.height,
            self.right * surface.width,
            self.bottom * surface.height,
        )
    }

    /// Linear interpolation toward `other`; `t = 0` is `self`, `t = 1` is `other`.
    #[must_use]
    pub fn lerp(&self, other: &FracRect, t: f64) -> Self {
        Self::new(
            (other.left - self.left) * t + self.left,
            (other.top - self.top) * t + self.top,
            (other.right - self.right) * t + self.right,
            (other.bottom - self.bottom) * t + self.bottom,
        )
    }
}

/// Justification of content inside its draw area along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    /// Left or top.
    Start,
    #[default]
    Center,
    /// Right or bottom.
    End,
}

impl Justify {
    /// Offset of content inside `leftover` free space.
    #[must_use]
    pub fn offset(self, leftover: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => leftover / 2.0,
            Self::End => leftover,
        }
    }
}

/// Horizontal and vertical justification pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Align {
    pub x: Justify,
    pub y: Justify,
}

impl Align {
    pub const CENTER: Align = Align { x: Justify::Center, y: Justify::Center };

    #[must_use]
    pub fn new(x: Justify, y: Justify) -> Self {
        Self { x, y }
    }
}

/// One of the four screen quadrants, numbered clockwise from the south east
/// (the quadrant nearest the thumb of a right-handed user).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    SouthEast,
    SouthWest,
    NorthWest,
    NorthEast,
}

impl Quadrant {
    /// Quadrant for an index, wrapping modulo 4.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Self::SouthEast,
            1 => Self::SouthWest,
            2 => Self::NorthWest,
            _ => Self::NorthEast,
        }
    }

    /// Placement: a quarter of a wide surface, a horizontal band of a tall one.
    #[must_use]
    pub fn target(self) -> Target {
        const H: f64 = 0.5;
        const Q: f64 = 0.25;
        const T: f64 = 0.75;
        match self {
            Self::SouthEast => Target::new(FracRect::new(H, H, 1.0, 1.0), FracRect::new(0.0, T, 1.0, 1.0)),
            Self::SouthWest => Target::new(FracRect::new(0.0, H, H, 1.0), FracRect::new(0.0, H, 1.0, T)),
            Self::NorthWest => Target::new(FracRect::new(0.0, 0.0, H, H), FracRect::new(0.0, 0.0, 1.0, Q)),
            Self::NorthEast => Target::new(FracRect::new(H, 0.0, 1.0, H), FracRect::new(0.0, Q, 1.0, H)),
        }
    }

    /// Text alignment that pushes content toward the outer corner on wide surfaces.
    #[must_use]
    pub fn wide_align(self) -> Align {
        match self {
            Self::SouthEast => Align::new(Justify::End, Justify::End),
            Self::SouthWest => Align::new(Justify::Start, Justify::End),
            Self::NorthWest => Align::new(Justify::Start, Justify::Start),
            Self::NorthEast => Align::new(Justify::End, Justify::Start),
        }
    }
}

/// Fractional placement of an element for both surface orientations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Target {
    /// Used when the surface is wider than it is tall.
    pub wide: FracRect,
    /// Used otherwise.
    pub tall: FracRect,
}

impl Target {
    #[must_use]
    pub fn new(wide: FracRect, tall: FracRect) -> Self {
        Self { wide, tall }
    }

    /// Same placement regardless of orientation.
    #[must_use]
    pub fn uniform(rect: FracRect) -> Self {
        Self { wide: rect, tall: rect }
    }

    /// The fractional rectangle that applies to `surface`.
    #[must_use]
    pub fn select(&self, surface: Size) -> FracRect {
        if surface.is_wide() { self.wide } else { self.tall }
    }

    /// Pixel draw area on `surface`.
    #[must_use]
    pub fn resolve(&self, surface: Size) -> Rect {
        self.select(surface).resolve(surface)
    }
}
