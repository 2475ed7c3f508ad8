//! Borehole - identification and relative heights of survey boreholes.
//!
//! Takes a snapshot of drawing entities (symbol insertions, text labels and
//! circle markers), works out which boreholes the drawing shows, picks one as
//! the height reference and computes every other borehole's height relative
//! to it.

pub mod config;
pub mod extractor;
pub mod filter;
pub mod height;
pub mod matcher;
pub mod reference;
pub mod registry;
pub mod report;

mod error;

pub use borehole_core::{borehole, entity, geometry, identifier};

pub use error::{BoreholeError, Severity};

use log::{debug, info};

use borehole_core::{entity::EntitySnapshot, identifier::BoreholeId};

use config::AppConfig;
use extractor::IdentifierExtractor;
use filter::{EntityFilter, FilteredSnapshot};
use height::HeightCalculator;
use reference::ReferenceSelector;
use registry::BoreholeRegistry;
use report::SurveyReport;

/// What the caller asks for about the reference borehole.
///
/// Unset fields fall back to the configured policy and elevation.
#[derive(Debug, Clone, Default)]
pub struct ReferenceRequest {
    identifier: Option<BoreholeId>,
    elevation: Option<f64>,
}

impl ReferenceRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the borehole with this identifier as the reference
    pub fn with_identifier(mut self, identifier: BoreholeId) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Elevation to assign to a reference that has none in the drawing
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn identifier(&self) -> Option<&BoreholeId> {
        self.identifier.as_ref()
    }

    pub fn elevation(&self) -> Option<f64> {
        self.elevation
    }
}

/// Runs the borehole survey pipeline over entity snapshots.
///
/// # Examples
///
/// ```
/// use borehole::{ReferenceRequest, Survey};
/// use borehole::entity::{EntitySnapshot, SymbolInsertion};
///
/// let snapshot = EntitySnapshot::from_entities([
///     SymbolInsertion::new((0.0, 0.0, 0.0)).with_attribute("НОМЕР", "1").into(),
///     SymbolInsertion::new((10.0, 0.0, 5.0)).with_attribute("НОМЕР", "2").into(),
/// ]);
///
/// let survey = Survey::default();
/// let report = survey
///     .run(&snapshot, &ReferenceRequest::new().with_elevation(100.0))
///     .unwrap();
///
/// assert_eq!(report.boreholes().len(), 2);
/// assert_eq!(report.boreholes()[1].relative_height(), Some(-95.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Survey {
    config: AppConfig,
    extractor: IdentifierExtractor,
}

impl Survey {
    /// Creates a survey with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BoreholeError::Config`] if a configured value is out of range
    /// or a custom label pattern is invalid.
    pub fn new(config: AppConfig) -> Result<Self, BoreholeError> {
        config.validate()?;
        let extractor = IdentifierExtractor::with_patterns(config.extraction().patterns())?;
        debug!(rules = extractor.rule_count(); "Label rules compiled");

        Ok(Self { config, extractor })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Filters the snapshot and resolves its boreholes, without heights.
    ///
    /// Source indices of the resolved boreholes refer to `snapshot`.
    pub fn resolve(&self, snapshot: &EntitySnapshot) -> BoreholeRegistry {
        let filtered = EntityFilter::new(self.config.filter()).apply(snapshot);
        self.resolve_filtered(&filtered)
    }

    fn resolve_filtered(&self, filtered: &FilteredSnapshot) -> BoreholeRegistry {
        let mut registry = BoreholeRegistry::resolve(
            filtered.snapshot(),
            &self.extractor,
            self.config.matching(),
        );
        registry.remap_sources(|sources| filtered.original_sources(sources));
        registry
    }

    /// Runs the whole pipeline and returns the sorted result set.
    ///
    /// Entities with a non-finite coordinate are skipped with a warning.
    /// Borehole and duplicate sources index into `snapshot`.
    ///
    /// # Errors
    ///
    /// - [`BoreholeError::EmptyRegistry`] if no borehole could be resolved.
    /// - [`BoreholeError::ReferenceNotFound`] if the requested reference is
    ///   not among the resolved boreholes.
    pub fn run(
        &self,
        snapshot: &EntitySnapshot,
        request: &ReferenceRequest,
    ) -> Result<SurveyReport, BoreholeError> {
        info!(entities = snapshot.len(); "Starting borehole survey");

        let filtered = EntityFilter::new(self.config.filter()).apply(snapshot);
        let mut registry = self.resolve_filtered(&filtered);
        if registry.is_empty() {
            return Err(BoreholeError::EmptyRegistry);
        }
        info!(
            boreholes = registry.len(),
            duplicates = registry.duplicates().len(),
            mode:% = registry.mode();
            "Boreholes resolved"
        );

        ReferenceSelector::new(self.config.reference().policy())
            .select(&mut registry, request.identifier())?;

        let elevation = request
            .elevation()
            .unwrap_or_else(|| self.config.reference().elevation());
        let reference_elevation = HeightCalculator::new().compute(&mut registry, elevation)?;

        let report = SurveyReport::new(registry, &filtered, reference_elevation);
        info!(resolved = report.stats().resolved; "Survey complete");
        Ok(report)
    }
}
