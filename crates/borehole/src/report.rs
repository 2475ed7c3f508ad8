//! The outcome of a survey run.
//!
//! A [`SurveyReport`] is what the pipeline hands to whatever presents the
//! results: boreholes sorted by identifier, duplicates that were dropped and
//! the counters gathered along the way.

use serde::Serialize;

use borehole_core::borehole::{Borehole, ElevationSource};

use crate::{
    filter::FilteredSnapshot,
    registry::{BoreholeRegistry, Duplicate, ResolutionMode},
};

/// Flat, export-friendly view of one borehole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoreholeRecord {
    pub identifier: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_source: Option<ElevationSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_height: Option<f64>,
    pub is_reference: bool,
}

impl From<&Borehole> for BoreholeRecord {
    fn from(borehole: &Borehole) -> Self {
        let position = borehole.position();
        Self {
            identifier: borehole.identifier().to_string(),
            x: position.x(),
            y: position.y(),
            z: position.z(),
            elevation: borehole.elevation(),
            elevation_source: borehole.elevation_source(),
            relative_height: borehole.relative_height(),
            is_reference: borehole.is_reference(),
        }
    }
}

/// Spread of the computed relative heights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeightSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl HeightSummary {
    /// Summarizes the given heights, or `None` when there are none
    pub fn from_heights(heights: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for height in heights {
            count += 1;
            sum += height;
            min = min.min(height);
            max = max.max(height);
        }

        (count > 0).then(|| Self {
            min,
            max,
            mean: sum / count as f64,
        })
    }
}

/// Counters describing one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SurveyStats {
    /// Text labels seen after filtering
    pub labels: usize,
    /// Circle markers seen after filtering
    pub markers: usize,
    /// Symbol insertions seen after filtering
    pub symbols: usize,
    /// Entities removed by layer or name filters
    pub filtered_out: usize,
    /// Entities skipped for a NaN or infinite coordinate
    pub non_finite: usize,
    pub resolved: usize,
    pub duplicates: usize,
    pub fallback_identifiers: usize,
    pub unparsed_labels: usize,
    pub unmatched_markers: usize,
    pub label_only: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heights: Option<HeightSummary>,
}

/// Sorted result set of a survey run.
#[derive(Debug, Clone)]
pub struct SurveyReport {
    mode: ResolutionMode,
    reference_elevation: f64,
    boreholes: Vec<Borehole>,
    duplicates: Vec<Duplicate>,
    stats: SurveyStats,
}

impl SurveyReport {
    /// Consumes a registry whose heights are computed.
    ///
    /// `filtered` is what the registry was resolved from.
    pub fn new(
        registry: BoreholeRegistry,
        filtered: &FilteredSnapshot,
        reference_elevation: f64,
    ) -> Self {
        let source = filtered.snapshot();
        let mode = registry.mode();
        let resolution = registry.stats();
        let (boreholes, duplicates) = registry.into_sorted();

        let heights = HeightSummary::from_heights(
            boreholes
                .iter()
                .filter(|borehole| !borehole.is_reference())
                .filter_map(Borehole::relative_height),
        );

        let stats = SurveyStats {
            labels: source.labels().len(),
            markers: source.markers().len(),
            symbols: source.symbols().len(),
            filtered_out: filtered.filtered_out(),
            non_finite: filtered.non_finite(),
            resolved: boreholes.len(),
            duplicates: duplicates.len(),
            fallback_identifiers: resolution.fallback_identifiers,
            unparsed_labels: resolution.unparsed_labels,
            unmatched_markers: resolution.unmatched_markers,
            label_only: resolution.label_only,
            heights,
        };

        Self {
            mode,
            reference_elevation,
            boreholes,
            duplicates,
            stats,
        }
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Elevation relative heights were measured against
    pub fn reference_elevation(&self) -> f64 {
        self.reference_elevation
    }

    /// Boreholes in identifier order
    pub fn boreholes(&self) -> &[Borehole] {
        &self.boreholes
    }

    pub fn duplicates(&self) -> &[Duplicate] {
        &self.duplicates
    }

    pub fn stats(&self) -> &SurveyStats {
        &self.stats
    }

    pub fn reference(&self) -> Option<&Borehole> {
        self.boreholes.iter().find(|borehole| borehole.is_reference())
    }

    pub fn records(&self) -> Vec<BoreholeRecord> {
        self.boreholes.iter().map(BoreholeRecord::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use float_cmp::assert_approx_eq;

    use borehole_core::entity::{EntitySnapshot, SymbolInsertion};

    use crate::{
        extractor::IdentifierExtractor, filter::EntityFilter, height::HeightCalculator,
        reference::ReferenceSelector,
    };

    #[test]
    fn test_height_summary() {
        assert_eq!(HeightSummary::from_heights([]), None);

        let summary = HeightSummary::from_heights([-95.0, -103.0, 4.0]).unwrap();
        assert_approx_eq!(f64, summary.min, -103.0);
        assert_approx_eq!(f64, summary.max, 4.0);
        assert_approx_eq!(f64, summary.mean, -194.0 / 3.0);
    }

    #[test]
    fn test_report_from_registry() {
        let symbols = vec![
            SymbolInsertion::new((20.0, 0.0, -3.0)).with_attribute("НОМЕР", "3"),
            SymbolInsertion::new((0.0, 0.0, 0.0)).with_attribute("НОМЕР", "1"),
            SymbolInsertion::new((10.0, 0.0, 5.0)).with_attribute("НОМЕР", "2"),
            SymbolInsertion::new((30.0, 0.0, 1.0)).with_attribute("НОМЕР", "2"),
        ];
        let snapshot = EntitySnapshot::from_entities(symbols.iter().cloned().map(Into::into));
        let filtered = EntityFilter::default().apply(&snapshot);
        let mut registry = BoreholeRegistry::from_symbols(&symbols, &IdentifierExtractor::default());
        ReferenceSelector::default()
            .select(&mut registry, Some(&"1".parse().unwrap()))
            .unwrap();
        let reference_elevation = HeightCalculator::new().compute(&mut registry, 100.0).unwrap();

        let report = SurveyReport::new(registry, &filtered, reference_elevation);

        let ids: Vec<String> = report.records().into_iter().map(|r| r.identifier).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(report.reference().unwrap().identifier(), "1");
        assert_eq!(report.duplicates().len(), 1);

        let stats = report.stats();
        assert_eq!(stats.symbols, 4);
        assert_eq!(stats.resolved, 3);
        assert_eq!(stats.duplicates, 1);
        let heights = stats.heights.unwrap();
        assert_approx_eq!(f64, heights.min, -103.0);
        assert_approx_eq!(f64, heights.max, -95.0);
        assert_approx_eq!(f64, heights.mean, -99.0);
    }

    #[test]
    fn test_record_serializes_flat() {
        let borehole = Borehole::new(
            "7".parse().unwrap(),
            (1.0, 2.0, 3.0).into(),
            borehole_core::borehole::Sources::symbol(0),
        );
        let record = BoreholeRecord::from(&borehole);
        let text = toml::to_string(&record).unwrap();
        assert!(text.contains("identifier = \"7\""));
        assert!(text.contains("is_reference = false"));
        assert!(!text.contains("relative_height"));
    }
}
