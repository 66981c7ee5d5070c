use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::PackError;

/// Extents smaller than this are treated as zero when checking fits and
/// leftover space, so sizes that only differ by floating point rounding still
/// line up.
pub const TOLERANCE: f64 = 1e-9;

/// The extents of a box or a region of space, in whatever consistent unit the
/// caller works in.
///
/// Extents are `f64`. Fractional sizes like 0.1 can't be represented exactly,
/// so fits are compared with [`TOLERANCE`]; pick units that keep sizes well
/// above it (millimeters rather than kilometers, for example).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    #[inline]
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Whether something of this size fits inside `other` without rotating.
    #[inline]
    pub fn fits_within(&self, other: &Dimensions) -> bool {
        self.length <= other.length + TOLERANCE
            && self.width <= other.width + TOLERANCE
            && self.height <= other.height + TOLERANCE
    }

    #[inline]
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Length => self.length,
            Axis::Width => self.width,
            Axis::Height => self.height,
        }
    }

    /// Rejects extents that could never describe a real box: zero, negative,
    /// or not finite.
    pub fn validate(&self) -> Result<(), PackError> {
        let valid = |extent: f64| extent.is_finite() && extent > 0.0;

        if valid(self.length) && valid(self.width) && valid(self.height) {
            Ok(())
        } else {
            Err(PackError::DegenerateDimensions { dimensions: *self })
        }
    }
}

impl From<(f64, f64, f64)> for Dimensions {
    fn from((length, width, height): (f64, f64, f64)) -> Self {
        Self::new(length, width, height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "{}x{}x{}",
            self.length, self.width, self.height
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Moves the point along a single axis.
    pub(crate) fn offset(self, axis: Axis, amount: f64) -> Self {
        match axis {
            Axis::Length => Self::new(self.x + amount, self.y, self.z),
            Axis::Width => Self::new(self.x, self.y + amount, self.z),
            Axis::Height => Self::new(self.x, self.y, self.z + amount),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// The three directions space is cut along. The order of the variants is the
/// order subdivision visits them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    Length,
    Width,
    Height,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Length, Axis::Width, Axis::Height];
}

/// An axis-aligned cuboid anchored at its minimum corner.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cuboid {
    pub origin: Point,
    pub size: Dimensions,
}

impl Cuboid {
    #[inline]
    pub fn new(origin: Point, size: Dimensions) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.size.volume()
    }

    #[inline]
    pub fn min(&self) -> Point {
        self.origin
    }

    pub fn max(&self) -> Point {
        Point::new(
            self.origin.x + self.size.length,
            self.origin.y + self.size.width,
            self.origin.z + self.size.height,
        )
    }

    /// Whether `other` lies entirely inside this cuboid. Shared faces count as
    /// inside.
    pub fn contains(&self, other: &Cuboid) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());

        a_min.x <= b_min.x
            && a_min.y <= b_min.y
            && a_min.z <= b_min.z
            && b_max.x <= a_max.x
            && b_max.y <= a_max.y
            && b_max.z <= a_max.z
    }

    /// Whether the interiors of the two cuboids overlap. Cuboids that only
    /// touch along a face, edge or corner do not intersect.
    pub fn intersects(&self, other: &Cuboid) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());

        let x_overlap = a_min.x < b_max.x && b_min.x < a_max.x;
        let y_overlap = a_min.y < b_max.y && b_min.y < a_max.y;
        let z_overlap = a_min.z < b_max.z && b_min.z < a_max.z;

        x_overlap && y_overlap && z_overlap
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn cuboid(origin: (f64, f64, f64), size: (f64, f64, f64)) -> Cuboid {
        Cuboid::new(Point::new(origin.0, origin.1, origin.2), size.into())
    }

    #[test]
    fn fits_is_component_wise() {
        let bin = Dimensions::new(10.0, 10.0, 10.0);

        assert!(Dimensions::new(10.0, 10.0, 10.0).fits_within(&bin));
        assert!(Dimensions::new(1.0, 10.0, 3.0).fits_within(&bin));
        assert!(!Dimensions::new(11.0, 1.0, 1.0).fits_within(&bin));
        assert!(!Dimensions::new(1.0, 1.0, 10.5).fits_within(&bin));
    }

    #[test]
    fn fits_absorb_rounding() {
        let leftover = Dimensions::new(0.3 - 0.1, 1.0, 1.0);

        assert!(leftover.length < 0.2);
        assert!(Dimensions::new(0.2, 1.0, 1.0).fits_within(&leftover));
        assert!(!Dimensions::new(0.2001, 1.0, 1.0).fits_within(&leftover));
    }

    #[test]
    fn degenerate_dimensions_are_rejected() {
        assert!(Dimensions::new(1.0, 2.0, 3.0).validate().is_ok());
        assert!(Dimensions::new(0.0, 2.0, 3.0).validate().is_err());
        assert!(Dimensions::new(1.0, -2.0, 3.0).validate().is_err());
        assert!(Dimensions::new(1.0, 2.0, f64::NAN).validate().is_err());
        assert!(Dimensions::new(f64::INFINITY, 2.0, 3.0).validate().is_err());
    }

    #[test]
    fn touching_cuboids_do_not_intersect() {
        let a = cuboid((0.0, 0.0, 0.0), (4.0, 4.0, 4.0));
        let b = cuboid((4.0, 0.0, 0.0), (6.0, 10.0, 10.0));
        let c = cuboid((3.0, 3.0, 3.0), (2.0, 2.0, 2.0));

        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(b.intersects(&c));
    }

    #[test]
    fn containment() {
        let outer = cuboid((0.0, 0.0, 0.0), (10.0, 10.0, 10.0));

        assert!(outer.contains(&cuboid((4.0, 0.0, 0.0), (6.0, 10.0, 10.0))));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&cuboid((8.0, 0.0, 0.0), (3.0, 1.0, 1.0))));
    }

    #[test]
    fn offset_moves_one_axis() {
        let point = Point::new(1.0, 2.0, 3.0);

        assert_eq!(point.offset(Axis::Length, 4.0), Point::new(5.0, 2.0, 3.0));
        assert_eq!(point.offset(Axis::Width, 4.0), Point::new(1.0, 6.0, 3.0));
        assert_eq!(point.offset(Axis::Height, 4.0), Point::new(1.0, 2.0, 7.0));
    }
}
