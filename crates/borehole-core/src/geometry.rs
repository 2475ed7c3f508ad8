//! Geometric primitives for drawing-space positions.
//!
//! # Overview
//!
//! - [`Point2`] - A planar coordinate used for label/marker matching
//! - [`Point3`] - A spatial coordinate used for resolved borehole positions
//! - [`Coordinates`] - A position as reported by a drawing entity, with an
//!   optional vertical component
//!
//! # Coordinate System
//!
//! Coordinates are taken verbatim from the drawing's world coordinate system:
//!
//! ```text
//!    +Y
//!     ▲
//!     │
//!     │
//!   (0,0) ────────► +X
//! ```
//!
//! Z is the elevation axis. Entities drawn in plan usually carry no Z at all,
//! which is why [`Coordinates`] keeps it optional instead of assuming zero.

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, SeqAccess, Visitor},
    ser::SerializeSeq,
};

/// A 2D point in the drawing's XY plane.
///
/// # Examples
///
/// ```
/// # use borehole_core::geometry::Point2;
/// let label = Point2::new(3.0, 4.0);
/// let origin = Point2::default();
///
/// assert_eq!(label.distance(origin), 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point2 {
    x: f64,
    y: f64,
}

impl Point2 {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A 3D point in drawing space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn z(self) -> f64 {
        self.z
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// A position reported by a drawing entity.
///
/// Entities created in plan view often have no vertical component at all. The
/// distinction between "no Z" and "Z is zero" matters for height resolution,
/// so the vertical component stays optional here and only collapses to zero
/// when converted into a [`Point3`].
///
/// Coordinates deserialize from a two- or three-element array:
///
/// ```
/// # use borehole_core::geometry::Coordinates;
/// #[derive(serde::Deserialize)]
/// struct Probe {
///     at: Coordinates,
/// }
///
/// let planar: Probe = toml::from_str("at = [1.0, 2.0]").unwrap();
/// assert_eq!(planar.at.z(), None);
///
/// let spatial: Probe = toml::from_str("at = [1.0, 2.0, -3.5]").unwrap();
/// assert_eq!(spatial.at.z(), Some(-3.5));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coordinates {
    x: f64,
    y: f64,
    z: Option<f64>,
}

impl Coordinates {
    /// Creates planar coordinates without a vertical component
    pub fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Creates coordinates with an explicit vertical component
    pub fn spatial(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns the vertical component, if the source carried one
    pub fn z(self) -> Option<f64> {
        self.z
    }

    /// Projection used for in-plane matching
    pub fn to_point2(self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Resolves to a 3D point, using zero when the source had no Z
    pub fn to_point3(self) -> Point3 {
        Point3::new(self.x, self.y, self.z.unwrap_or(0.0))
    }

    /// Returns `true` when every present component is finite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_none_or(f64::is_finite)
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((x, y): (f64, f64)) -> Self {
        Self::planar(x, y)
    }
}

impl From<(f64, f64, f64)> for Coordinates {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::spatial(x, y, z)
    }
}

impl Serialize for Coordinates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.z.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.x)?;
        seq.serialize_element(&self.y)?;
        if let Some(z) = self.z {
            seq.serialize_element(&z)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Coordinates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CoordinatesVisitor;

        impl<'de> Visitor<'de> for CoordinatesVisitor {
            type Value = Coordinates;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of two or three finite numbers")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Coordinates, A::Error> {
                let x: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let y: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let z: Option<f64> = seq.next_element()?;

                if seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(4, &self));
                }

                let coordinates = Coordinates { x, y, z };
                if !coordinates.is_finite() {
                    return Err(de::Error::custom(format!(
                        "coordinates must be finite numbers, got {coordinates:?}"
                    )));
                }
                Ok(coordinates)
            }
        }

        deserializer.deserialize_seq(CoordinatesVisitor)
    }
}

/// Deserializes an `f64`, rejecting NaN and infinities.
pub(crate) fn deserialize_finite<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<f64, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom(format!("expected a finite number, got {value}")))
    }
}
