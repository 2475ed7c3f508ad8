//! The canonical collection of resolved boreholes.
//!
//! A [`BoreholeRegistry`] is built once per run, in one of two modes:
//!
//! - [`ResolutionMode::Symbols`]: every attributed symbol insertion becomes a
//!   borehole. Its number comes from the first attribute value that reads as
//!   one, else from its 1-based position among the processed insertions.
//! - [`ResolutionMode::LabelsAndMarkers`]: numbered text labels are paired
//!   with nearby circles. Labels without a number and circles without a label
//!   are dropped.
//!
//! Identifiers are unique. When two sources resolve to the same identifier
//! the first one is kept and the later one is recorded as a [`Duplicate`].

use std::fmt;

use indexmap::{IndexMap, map::Entry};
use log::{debug, info, warn};
use serde::Serialize;

use borehole_core::{
    borehole::{Borehole, Sources},
    entity::{CircleMarker, EntitySnapshot, SymbolInsertion, TextLabel},
    geometry::{Coordinates, Point2},
    identifier::BoreholeId,
};

use crate::{config::MatchingConfig, extractor::IdentifierExtractor, matcher::SpatialMatcher};

/// Which resolution path produced the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Attributed symbol insertions were read directly.
    Symbols,
    /// Text labels were paired with circular markers.
    #[default]
    LabelsAndMarkers,
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionMode::Symbols => write!(f, "symbol insertions"),
            ResolutionMode::LabelsAndMarkers => write!(f, "labels and markers"),
        }
    }
}

/// A borehole that lost to an earlier one with the same identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    identifier: BoreholeId,
    sources: Sources,
}

impl Duplicate {
    pub fn identifier(&self) -> &BoreholeId {
        &self.identifier
    }

    /// Snapshot entities of the dropped borehole
    pub fn sources(&self) -> Sources {
        self.sources
    }
}

/// Counters collected while resolving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    /// Symbol insertions that fell back to a sequential identifier.
    pub fallback_identifiers: usize,
    /// Labels with no recognizable borehole number.
    pub unparsed_labels: usize,
    /// Markers left without a label.
    pub unmatched_markers: usize,
    /// Boreholes placed at their label because no marker was near.
    pub label_only: usize,
}

/// Insertion-ordered, identifier-keyed set of boreholes.
#[derive(Debug, Clone, Default)]
pub struct BoreholeRegistry {
    boreholes: IndexMap<BoreholeId, Borehole>,
    duplicates: Vec<Duplicate>,
    mode: ResolutionMode,
    stats: ResolutionStats,
}

impl BoreholeRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves boreholes from a snapshot, choosing the mode automatically.
    ///
    /// Symbol insertions take precedence; labels and markers are only
    /// consulted when the snapshot has no symbol insertions at all.
    pub fn resolve(
        snapshot: &EntitySnapshot,
        extractor: &IdentifierExtractor,
        matching: &MatchingConfig,
    ) -> Self {
        if snapshot.symbols().is_empty() {
            info!(
                labels = snapshot.labels().len(),
                markers = snapshot.markers().len();
                "No symbol insertions, resolving from labels and markers"
            );
            Self::from_labels_and_markers(
                snapshot.labels(),
                snapshot.markers(),
                extractor,
                matching,
            )
        } else {
            info!(symbols = snapshot.symbols().len(); "Resolving from symbol insertions");
            Self::from_symbols(snapshot.symbols(), extractor)
        }
    }

    /// Builds one borehole per symbol insertion.
    pub fn from_symbols(symbols: &[SymbolInsertion], extractor: &IdentifierExtractor) -> Self {
        let mut registry = Self {
            mode: ResolutionMode::Symbols,
            ..Self::default()
        };

        for (index, symbol) in symbols.iter().enumerate() {
            let identifier = match extractor.extract_from_attributes(symbol.attribute_values()) {
                Some(identifier) => identifier,
                None => {
                    let fallback = BoreholeId::sequential(index + 1);
                    debug!(
                        symbol = index,
                        identifier = fallback.as_str();
                        "No numbered attribute, using sequential identifier"
                    );
                    registry.stats.fallback_identifiers += 1;
                    fallback
                }
            };

            registry.insert(Borehole::new(
                identifier,
                symbol.position(),
                Sources::symbol(index),
            ));
        }

        info!(boreholes = registry.len(); "Symbol resolution finished");
        registry
    }

    /// Pairs numbered labels with circles and builds one borehole per label.
    ///
    /// 1. Each numbered label takes its nearest free circle within
    ///    `label_to_marker`; the borehole sits at the circle centre.
    /// 2. Each circle still free takes its nearest free numbered label within
    ///    `marker_to_label`.
    /// 3. Numbered labels still free become boreholes at the label position.
    pub fn from_labels_and_markers(
        labels: &[TextLabel],
        markers: &[CircleMarker],
        extractor: &IdentifierExtractor,
        matching: &MatchingConfig,
    ) -> Self {
        let mut registry = Self {
            mode: ResolutionMode::LabelsAndMarkers,
            ..Self::default()
        };

        let identifiers: Vec<Option<BoreholeId>> = labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let identifier = extractor.extract(label.text());
                if identifier.is_none() {
                    debug!(label = index, text = label.text(); "Label has no borehole number");
                }
                identifier
            })
            .collect();
        registry.stats.unparsed_labels = identifiers.iter().filter(|id| id.is_none()).count();

        let label_points: Vec<Point2> = labels.iter().map(|l| l.position().to_point2()).collect();
        let marker_points: Vec<Point2> =
            markers.iter().map(|m| m.center().to_point2()).collect();

        // Unnumbered labels never take part in matching
        let mut label_used: Vec<bool> = identifiers.iter().map(Option::is_none).collect();
        let mut marker_used = vec![false; markers.len()];
        let mut pairs: Vec<(usize, Option<usize>)> = Vec::new();

        let to_marker = SpatialMatcher::new(matching.label_to_marker());
        for label in 0..labels.len() {
            if label_used[label] {
                continue;
            }
            if let Some(hit) =
                to_marker.nearest_available(label_points[label], &marker_points, &marker_used)
            {
                label_used[label] = true;
                marker_used[hit.index] = true;
                pairs.push((label, Some(hit.index)));
            }
        }

        let to_label = SpatialMatcher::new(matching.marker_to_label());
        for marker in 0..markers.len() {
            if marker_used[marker] {
                continue;
            }
            match to_label.nearest_available(marker_points[marker], &label_points, &label_used) {
                Some(hit) => {
                    label_used[hit.index] = true;
                    marker_used[marker] = true;
                    pairs.push((hit.index, Some(marker)));
                }
                None => {
                    debug!(marker = marker; "Marker has no nearby numbered label");
                    registry.stats.unmatched_markers += 1;
                }
            }
        }

        for label in 0..labels.len() {
            if !label_used[label] {
                label_used[label] = true;
                registry.stats.label_only += 1;
                pairs.push((label, None));
            }
        }

        for (label, marker) in pairs {
            let Some(identifier) = identifiers[label].clone() else {
                continue;
            };
            let coordinates = match marker {
                Some(marker) => {
                    let center = markers[marker].center();
                    // A planar circle still inherits the label's elevation
                    match (center.z(), labels[label].position().z()) {
                        (None, Some(z)) => Coordinates::spatial(center.x(), center.y(), z),
                        _ => center,
                    }
                }
                None => labels[label].position(),
            };

            registry.insert(Borehole::new(
                identifier,
                coordinates,
                Sources::label(label, marker),
            ));
        }

        info!(
            boreholes = registry.len(),
            unmatched_markers = registry.stats.unmatched_markers,
            unparsed_labels = registry.stats.unparsed_labels;
            "Label/marker resolution finished"
        );
        registry
    }

    /// Inserts a borehole unless its identifier is already taken.
    ///
    /// Returns `true` when inserted. A rejected borehole is recorded in
    /// [`duplicates`](Self::duplicates).
    pub fn insert(&mut self, borehole: Borehole) -> bool {
        match self.boreholes.entry(borehole.identifier().clone()) {
            Entry::Occupied(existing) => {
                warn!(
                    identifier = borehole.identifier().as_str(),
                    kept:? = existing.get().sources(),
                    dropped:? = borehole.sources();
                    "Duplicate borehole identifier, keeping the first occurrence"
                );
                self.duplicates.push(Duplicate {
                    identifier: borehole.identifier().clone(),
                    sources: borehole.sources(),
                });
                false
            }
            Entry::Vacant(slot) => {
                info!(
                    identifier = borehole.identifier().as_str(),
                    x = borehole.position().x(),
                    y = borehole.position().y();
                    "Borehole resolved"
                );
                slot.insert(borehole);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.boreholes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boreholes.is_empty()
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    pub fn stats(&self) -> ResolutionStats {
        self.stats
    }

    /// Later boreholes that collided with an existing identifier
    pub fn duplicates(&self) -> &[Duplicate] {
        &self.duplicates
    }

    pub fn get(&self, identifier: &BoreholeId) -> Option<&Borehole> {
        self.boreholes.get(identifier)
    }

    pub fn contains(&self, identifier: &BoreholeId) -> bool {
        self.boreholes.contains_key(identifier)
    }

    /// Boreholes in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Borehole> {
        self.boreholes.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Borehole> {
        self.boreholes.values_mut()
    }

    pub(crate) fn get_mut(&mut self, identifier: &BoreholeId) -> Option<&mut Borehole> {
        self.boreholes.get_mut(identifier)
    }

    /// Rewrites the source indices of every borehole and duplicate
    pub(crate) fn remap_sources(&mut self, map: impl Fn(Sources) -> Sources) {
        for borehole in self.boreholes.values_mut() {
            borehole.set_sources(map(borehole.sources()));
        }
        for duplicate in &mut self.duplicates {
            duplicate.sources = map(duplicate.sources);
        }
    }

    /// Borehole at a registration position
    pub(crate) fn get_index(&self, index: usize) -> Option<&Borehole> {
        self.boreholes.get_index(index).map(|(_, borehole)| borehole)
    }

    /// The current reference borehole, if one is selected
    pub fn reference(&self) -> Option<&Borehole> {
        self.iter().find(|borehole| borehole.is_reference())
    }

    /// Boreholes ordered by numeric identifier
    pub fn sorted(&self) -> Vec<&Borehole> {
        let mut boreholes: Vec<&Borehole> = self.iter().collect();
        boreholes.sort_by(|a, b| a.identifier().cmp(b.identifier()));
        boreholes
    }

    /// Consumes the registry, returning boreholes ordered by numeric identifier
    pub fn into_sorted(self) -> (Vec<Borehole>, Vec<Duplicate>) {
        let mut boreholes = self.boreholes;
        boreholes.sort_unstable_keys();
        (boreholes.into_values().collect(), self.duplicates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use borehole_core::geometry::Point3;

    fn resolve_labels(labels: &[TextLabel], markers: &[CircleMarker]) -> BoreholeRegistry {
        BoreholeRegistry::from_labels_and_markers(
            labels,
            markers,
            &IdentifierExtractor::default(),
            &MatchingConfig::default(),
        )
    }

    fn ids(registry: &BoreholeRegistry) -> Vec<&str> {
        registry.iter().map(|b| b.identifier().as_str()).collect()
    }

    #[test]
    fn test_symbols_use_attribute_values() {
        let symbols = [
            SymbolInsertion::new((0.0, 0.0, 0.0)).with_attribute("НОМЕР", "3"),
            SymbolInsertion::new((1.0, 0.0, 0.0)).with_attribute("НОМЕР", "1"),
            SymbolInsertion::new((2.0, 0.0, 0.0)).with_attribute("НОМЕР", "20"),
        ];
        let registry = BoreholeRegistry::from_symbols(&symbols, &IdentifierExtractor::default());

        assert_eq!(registry.mode(), ResolutionMode::Symbols);
        assert_eq!(ids(&registry), ["3", "1", "20"]);
        let sorted: Vec<&str> = registry
            .sorted()
            .iter()
            .map(|b| b.identifier().as_str())
            .collect();
        assert_eq!(sorted, ["1", "3", "20"]);
    }

    #[test]
    fn test_symbol_first_matching_attribute_wins() {
        let symbols = [SymbolInsertion::new((0.0, 0.0))
            .with_attribute("ТИП", "разведочная")
            .with_attribute("НОМЕР", "скв. 8")
            .with_attribute("ГЛУБИНА", "30")];
        let registry = BoreholeRegistry::from_symbols(&symbols, &IdentifierExtractor::default());
        assert_eq!(ids(&registry), ["8"]);
        assert_eq!(registry.stats().fallback_identifiers, 0);
    }

    #[test]
    fn test_symbol_fallback_is_one_based_position() {
        let symbols = [
            SymbolInsertion::new((0.0, 0.0)).with_attribute("НОМЕР", "10"),
            SymbolInsertion::new((1.0, 0.0)).with_attribute("ТИП", "разведочная"),
            SymbolInsertion::new((2.0, 0.0)),
        ];
        let registry = BoreholeRegistry::from_symbols(&symbols, &IdentifierExtractor::default());

        assert_eq!(ids(&registry), ["10", "2", "3"]);
        assert_eq!(registry.stats().fallback_identifiers, 2);
        assert_eq!(
            registry.get(&"2".parse().unwrap()).unwrap().sources(),
            Sources::symbol(1)
        );
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let symbols = [
            SymbolInsertion::new((0.0, 0.0)).with_attribute("НОМЕР", "5"),
            SymbolInsertion::new((9.0, 9.0)).with_attribute("НОМЕР", "5"),
        ];
        let registry = BoreholeRegistry::from_symbols(&symbols, &IdentifierExtractor::default());

        assert_eq!(registry.len(), 1);
        let kept = registry.get(&"5".parse().unwrap()).unwrap();
        assert_eq!(kept.position().x(), 0.0);
        assert_eq!(registry.duplicates().len(), 1);
        assert_eq!(registry.duplicates()[0].identifier(), &"5".parse::<BoreholeId>().unwrap());
        assert_eq!(registry.duplicates()[0].sources(), Sources::symbol(1));
    }

    #[test]
    fn test_fallback_colliding_with_attribute_is_duplicate() {
        let symbols = [
            SymbolInsertion::new((0.0, 0.0)),
            SymbolInsertion::new((1.0, 0.0)).with_attribute("НОМЕР", "1"),
        ];
        let registry = BoreholeRegistry::from_symbols(&symbols, &IdentifierExtractor::default());

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(&"1".parse().unwrap()).unwrap().sources(),
            Sources::symbol(0)
        );
        assert_eq!(registry.duplicates().len(), 1);
    }

    #[test]
    fn test_label_matched_to_circle() {
        let labels = [TextLabel::new("скв. 5", (3.0, 4.0, 0.0))];
        let markers = [CircleMarker::new((3.5, 4.2, 0.0), 1.0)];
        let registry = resolve_labels(&labels, &markers);

        assert_eq!(registry.mode(), ResolutionMode::LabelsAndMarkers);
        assert_eq!(registry.len(), 1);
        let borehole = registry.get(&"5".parse().unwrap()).unwrap();
        assert_eq!(borehole.position(), Point3::new(3.5, 4.2, 0.0));
        assert_eq!(borehole.sources(), Sources::label(0, Some(0)));
    }

    #[test]
    fn test_each_circle_pairs_once() {
        let labels = [
            TextLabel::new("скв. 1", (0.0, 0.0)),
            TextLabel::new("скв. 2", (1.0, 0.0)),
        ];
        let markers = [
            CircleMarker::new((0.5, 0.0), 1.0),
            CircleMarker::new((10.0, 0.0), 1.0),
        ];
        let registry = resolve_labels(&labels, &markers);

        let first = registry.get(&"1".parse().unwrap()).unwrap();
        let second = registry.get(&"2".parse().unwrap()).unwrap();
        assert_eq!(first.sources().marker, Some(0));
        assert_eq!(second.sources().marker, Some(1));
        assert_eq!(second.position().x(), 10.0);
    }

    #[test]
    fn test_label_without_circle_stays_at_label() {
        let labels = [TextLabel::new("скв. 3", (100.0, 100.0))];
        let markers = [CircleMarker::new((0.0, 0.0), 1.0)];
        let registry = resolve_labels(&labels, &markers);

        let borehole = registry.get(&"3".parse().unwrap()).unwrap();
        assert_eq!(borehole.position(), Point3::new(100.0, 100.0, 0.0));
        assert_eq!(borehole.sources(), Sources::label(0, None));
        assert_eq!(registry.stats().unmatched_markers, 1);
        assert_eq!(registry.stats().label_only, 1);
    }

    #[test]
    fn test_unparsed_labels_and_orphan_markers_are_dropped() {
        let labels = [
            TextLabel::new("ось А", (0.0, 0.0)),
            TextLabel::new("скв. 2", (200.0, 0.0)),
        ];
        let markers = [CircleMarker::new((0.1, 0.0), 1.0)];
        let registry = resolve_labels(&labels, &markers);

        assert_eq!(ids(&registry), ["2"]);
        assert_eq!(registry.stats().unparsed_labels, 1);
        assert_eq!(registry.stats().unmatched_markers, 1);
    }

    #[test]
    fn test_marker_pass_uses_its_own_threshold() {
        // Too far for label -> marker, close enough for marker -> label
        let labels = [TextLabel::new("скв. 4", (0.0, 0.0))];
        let markers = [CircleMarker::new((30.0, 0.0), 1.0)];
        let registry = BoreholeRegistry::from_labels_and_markers(
            &labels,
            &markers,
            &IdentifierExtractor::default(),
            &MatchingConfig::new(10.0, 40.0),
        );

        let borehole = registry.get(&"4".parse().unwrap()).unwrap();
        assert_eq!(borehole.sources(), Sources::label(0, Some(0)));
        assert_eq!(borehole.position().x(), 30.0);
        assert_eq!(registry.stats().unmatched_markers, 0);
    }

    #[test]
    fn test_planar_circle_inherits_label_elevation() {
        let labels = [TextLabel::new("скв. 6", (0.0, 0.0, 12.5))];
        let markers = [CircleMarker::new((1.0, 0.0), 1.0)];
        let registry = resolve_labels(&labels, &markers);

        let borehole = registry.get(&"6".parse().unwrap()).unwrap();
        assert_eq!(borehole.drawing_elevation(), Some(12.5));
        assert_eq!(borehole.position(), Point3::new(1.0, 0.0, 12.5));
    }

    #[test]
    fn test_resolve_prefers_symbols() {
        let snapshot = EntitySnapshot::from_entities([
            SymbolInsertion::new((0.0, 0.0))
                .with_attribute("НОМЕР", "7")
                .into(),
            TextLabel::new("скв. 8", (0.0, 0.0)).into(),
            CircleMarker::new((0.0, 0.0), 1.0).into(),
        ]);
        let registry = BoreholeRegistry::resolve(
            &snapshot,
            &IdentifierExtractor::default(),
            &MatchingConfig::default(),
        );

        assert_eq!(registry.mode(), ResolutionMode::Symbols);
        assert_eq!(ids(&registry), ["7"]);
    }

    #[test]
    fn test_resolve_empty_snapshot() {
        let registry = BoreholeRegistry::resolve(
            &EntitySnapshot::new(),
            &IdentifierExtractor::default(),
            &MatchingConfig::default(),
        );
        assert!(registry.is_empty());
        assert!(registry.reference().is_none());
    }

    #[test]
    fn test_into_sorted_orders_numerically() {
        let symbols: Vec<SymbolInsertion> = ["10", "2", "1"]
            .into_iter()
            .map(|n| SymbolInsertion::new((0.0, 0.0)).with_attribute("НОМЕР", n))
            .collect();
        let registry = BoreholeRegistry::from_symbols(&symbols, &IdentifierExtractor::default());

        let (boreholes, duplicates) = registry.into_sorted();
        let sorted: Vec<&str> = boreholes.iter().map(|b| b.identifier().as_str()).collect();
        assert_eq!(sorted, ["1", "2", "10"]);
        assert!(duplicates.is_empty());
    }
}
