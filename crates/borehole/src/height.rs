//! Relative heights against the reference borehole.

use log::{debug, info, warn};

use borehole_core::borehole::ElevationSource;

use crate::{error::BoreholeError, registry::BoreholeRegistry};

/// Fills in elevations and relative heights for a registry with a reference.
///
/// Results are derived from the immutable drawing elevations and the
/// override only, so running the calculator again over the same registry
/// yields the same values.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeightCalculator;

impl HeightCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Computes every borehole's relative height and returns the reference
    /// elevation they were measured against.
    ///
    /// The reference keeps its drawing elevation unless that is absent or
    /// exactly zero, in which case `reference_elevation_override` applies.
    /// A NaN or infinite drawing elevation counts as absent.
    /// Other boreholes without a drawing elevation are treated as lying at
    /// zero; this is logged at warn level and recorded as
    /// [`ElevationSource::Defaulted`].
    ///
    /// # Errors
    ///
    /// Returns [`BoreholeError::NoReferenceSelected`] if no reference has
    /// been marked.
    pub fn compute(
        &self,
        registry: &mut BoreholeRegistry,
        reference_elevation_override: f64,
    ) -> Result<f64, BoreholeError> {
        let reference = registry
            .reference()
            .ok_or(BoreholeError::NoReferenceSelected)?;

        let (reference_elevation, reference_source) = match reference.drawing_elevation() {
            Some(z) if z != 0.0 && z.is_finite() => (z, ElevationSource::Drawing),
            _ => (reference_elevation_override, ElevationSource::Override),
        };
        info!(
            identifier = reference.identifier().as_str(),
            elevation = reference_elevation,
            source:% = reference_source;
            "Reference elevation resolved"
        );

        for borehole in registry.iter_mut() {
            if borehole.is_reference() {
                borehole.resolve_elevation(reference_elevation, reference_source);
                borehole.set_relative_height(0.0);
                continue;
            }

            let (elevation, source) = match borehole.drawing_elevation() {
                Some(z) if z.is_finite() => (z, ElevationSource::Drawing),
                _ => {
                    warn!(
                        identifier = borehole.identifier().as_str();
                        "Borehole has no elevation, assuming 0"
                    );
                    (0.0, ElevationSource::Defaulted)
                }
            };
            borehole.resolve_elevation(elevation, source);

            let relative_height = elevation - reference_elevation;
            borehole.set_relative_height(relative_height);
            debug!(
                identifier = borehole.identifier().as_str(),
                relative_height = relative_height;
                "Relative height computed"
            );
        }

        Ok(reference_elevation)
    }
}
