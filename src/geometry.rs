//! Pure geometry: points, sizes, affine transforms, and the orientation remap.
//!
//! Nothing in this module holds state. The page store uses [`remap_transform`]
//! to re-express annotation coordinates when a page turns, and the viewport
//! uses [`Affine`] for the screen ↔ page conversion.
//!
//! Coordinates are y-down (screen convention), so a positive rotation angle
//! turns clockwise on screen.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in screen, stage, or page space.
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
}

/// Width and height pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The same size with width and height exchanged.
    #[must_use]
    pub fn swapped(self) -> Self {
        Self { width: self.height, height: self.width }
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// The larger of the two dimensions.
    #[must_use]
    pub fn long_edge(self) -> f64 {
        self.width.max(self.height)
    }

    /// Both dimensions multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self { width: self.width * factor, height: self.height * factor }
    }

    /// True when both dimensions are finite and strictly positive.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned box given by its top-left corner and extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The axis-aligned bounding box of two points, regardless of which is the
/// top-left one.
#[must_use]
pub fn bounding_box(a: Point, b: Point) -> Bounds {
    Bounds {
        x: a.x.min(b.x),
        y: a.y.min(b.y),
        width: (b.x - a.x).abs(),
        height: (b.y - a.y).abs(),
    }
}

// =============================================================
// Orientation
// =============================================================

/// Returned when a degree value is not one of 0, 90, 180, 270.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid orientation: {0} (expected 0, 90, 180 or 270)")]
pub struct InvalidOrientation(pub u16);

/// Clockwise page rotation relative to the original upright content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Orientation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    #[must_use]
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Normalize any multiple of 90 (including negatives) to an orientation.
    /// Returns `None` for angles that are not quarter turns.
    #[must_use]
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// One quarter turn clockwise.
    #[must_use]
    pub fn rotated_cw(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg180,
            Self::Deg180 => Self::Deg270,
            Self::Deg270 => Self::Deg0,
        }
    }

    /// One quarter turn counter-clockwise.
    #[must_use]
    pub fn rotated_ccw(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg270,
            Self::Deg90 => Self::Deg0,
            Self::Deg180 => Self::Deg90,
            Self::Deg270 => Self::Deg180,
        }
    }

    /// Whether the page lies on its side (width and height swapped).
    #[must_use]
    pub fn is_sideways(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }

    /// Signed angle from `self` to `new`, normalized to `(-180, 180]`.
    #[must_use]
    pub fn delta_to(self, new: Self) -> f64 {
        let diff = (i32::from(new.degrees()) - i32::from(self.degrees())).rem_euclid(360);
        let diff = if diff > 180 { diff - 360 } else { diff };
        f64::from(diff)
    }
}

impl From<Orientation> for u16 {
    fn from(o: Orientation) -> Self {
        o.degrees()
    }
}

impl TryFrom<u16> for Orientation {
    type Error = InvalidOrientation;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_degrees(i32::from(value)).filter(|o| o.degrees() == value).ok_or(InvalidOrientation(value))
    }
}

/// The content frame of a page with `base` dimensions at `orientation`.
#[must_use]
pub fn oriented_size(base: Size, orientation: Orientation) -> Size {
    if orientation.is_sideways() { base.swapped() } else { base }
}

/// Fold an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

// =============================================================
// Affine
// =============================================================

/// 2×3 affine matrix in the canvas convention:
/// `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[must_use]
    pub fn translate(dx: f64, dy: f64) -> Self {
        Self { e: dx, f: dy, ..Self::IDENTITY }
    }

    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self { a: sx, d: sy, ..Self::IDENTITY }
    }

    /// Clockwise (on a y-down screen) rotation about the origin.
    #[must_use]
    pub fn rotate_deg(degrees: f64) -> Self {
        let (sin, cos) = sin_cos_deg(degrees);
        Self { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 }
    }

    /// The transform that applies `self` first and `next` second.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    #[must_use]
    pub fn apply(self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// The inverse transform, or `None` when the matrix is singular.
    #[must_use]
    pub fn invert(self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

/// Sine and cosine of an angle in degrees, exact for quarter turns.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn sin_cos_deg(degrees: f64) -> (f64, f64) {
    let turns = degrees / 90.0;
    if turns.fract() == 0.0 && turns.abs() < f64::from(i32::MAX) {
        match (turns as i64).rem_euclid(4) {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        }
    } else {
        degrees.to_radians().sin_cos()
    }
}

// =============================================================
// Orientation remap
// =============================================================

/// Affine map that carries a point from a page's content frame at `old` to
/// its content frame at `new`.
///
/// Translate relative to the old frame's center, rotate by the orientation
/// delta, then translate relative to the new frame's center. The result is
/// invertible; `remap_transform(base, new, old)` is its inverse.
#[must_use]
pub fn remap_transform(base: Size, old: Orientation, new: Orientation) -> Affine {
    let from = oriented_size(base, old).center();
    let to = oriented_size(base, new).center();
    Affine::translate(-from.x, -from.y)
        .then(Affine::rotate_deg(old.delta_to(new)))
        .then(Affine::translate(to.x, to.y))
}

/// Remap a single point; see [`remap_transform`].
#[must_use]
pub fn remap(point: Point, base: Size, old: Orientation, new: Orientation) -> Point {
    remap_transform(base, old, new).apply(point)
}
