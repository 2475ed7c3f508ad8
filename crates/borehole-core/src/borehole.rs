//! The resolved borehole record.
//!
//! A [`Borehole`] is produced once per survey run from the entity snapshot.
//! Its identity and position never change after creation; the reference flag,
//! the resolved elevation and the relative height are filled in by later
//! pipeline stages.

use std::fmt;

use serde::Serialize;

use crate::{
    geometry::{Coordinates, Point3},
    identifier::BoreholeId,
};

/// Where a borehole's resolved elevation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationSource {
    /// The drawing supplied a usable Z value.
    Drawing,
    /// The caller-supplied reference elevation was used.
    Override,
    /// No vertical data was available; zero was assumed.
    Defaulted,
}

impl fmt::Display for ElevationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElevationSource::Drawing => write!(f, "drawing"),
            ElevationSource::Override => write!(f, "override"),
            ElevationSource::Defaulted => write!(f, "defaulted"),
        }
    }
}

/// Back-references to the snapshot entities a borehole was built from.
///
/// Each field is an index into the matching [`EntitySnapshot`] slice. They
/// are for lookup and reporting only.
///
/// [`EntitySnapshot`]: crate::entity::EntitySnapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Sources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<usize>,
}

impl Sources {
    /// Sources for a borehole read from a symbol insertion
    pub fn symbol(index: usize) -> Self {
        Self {
            symbol: Some(index),
            ..Self::default()
        }
    }

    /// Sources for a borehole built from a label and, optionally, its marker
    pub fn label(label: usize, marker: Option<usize>) -> Self {
        Self {
            label: Some(label),
            marker,
            symbol: None,
        }
    }
}

/// A drilling or survey point with a unique identifier.
///
/// # Examples
///
/// ```
/// use borehole_core::{
///     borehole::{Borehole, Sources},
///     geometry::Coordinates,
///     identifier::BoreholeId,
/// };
///
/// let id: BoreholeId = "7".parse().unwrap();
/// let borehole = Borehole::new(id, Coordinates::spatial(1.0, 2.0, 3.0), Sources::symbol(0));
///
/// assert_eq!(borehole.drawing_elevation(), Some(3.0));
/// assert_eq!(borehole.elevation(), None);
/// assert!(!borehole.is_reference());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Borehole {
    identifier: BoreholeId,
    position: Point3,
    #[serde(skip_serializing_if = "Option::is_none")]
    drawing_elevation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elevation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elevation_source: Option<ElevationSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    relative_height: Option<f64>,
    is_reference: bool,
    sources: Sources,
}

impl Borehole {
    /// Creates a borehole at the given coordinates.
    ///
    /// The coordinates' Z, when present, becomes the drawing elevation; the
    /// resolved position uses zero in its place otherwise.
    pub fn new(
        identifier: BoreholeId,
        coordinates: Coordinates,
        sources: Sources,
    ) -> Self {
        Self {
            identifier,
            position: coordinates.to_point3(),
            drawing_elevation: coordinates.z(),
            elevation: None,
            elevation_source: None,
            relative_height: None,
            is_reference: false,
            sources,
        }
    }

    pub fn identifier(&self) -> &BoreholeId {
        &self.identifier
    }

    pub fn position(&self) -> Point3 {
        self.position
    }

    /// Elevation as reported by the drawing, untouched by height resolution
    pub fn drawing_elevation(&self) -> Option<f64> {
        self.drawing_elevation
    }

    /// Resolved elevation; `None` until heights are computed
    pub fn elevation(&self) -> Option<f64> {
        self.elevation
    }

    pub fn elevation_source(&self) -> Option<ElevationSource> {
        self.elevation_source
    }

    pub fn relative_height(&self) -> Option<f64> {
        self.relative_height
    }

    pub fn is_reference(&self) -> bool {
        self.is_reference
    }

    pub fn sources(&self) -> Sources {
        self.sources
    }

    /// Marks this borehole as the reference, with a relative height of zero
    pub fn mark_reference(&mut self) {
        self.is_reference = true;
        self.relative_height = Some(0.0);
    }

    /// Clears the reference flag and every height-pass result
    pub fn clear_heights(&mut self) {
        self.is_reference = false;
        self.relative_height = None;
        self.elevation = None;
        self.elevation_source = None;
    }

    /// Records the resolved elevation and where it came from
    pub fn resolve_elevation(&mut self, elevation: f64, source: ElevationSource) {
        self.elevation = Some(elevation);
        self.elevation_source = Some(source);
    }

    pub fn set_relative_height(&mut self, relative_height: f64) {
        self.relative_height = Some(relative_height);
    }

    /// Points the borehole at different snapshot entities
    pub fn set_sources(&mut self, sources: Sources) {
        self.sources = sources;
    }
}
