//! Flattened drawing entity records.
//!
//! A CAD-access layer walks the drawing and reduces each relevant object to
//! one [`Entity`]: a text label, a circular marker, or an attributed symbol
//! (block) insertion. Nothing here knows about block nesting, transforms or
//! layer visibility; records arrive already flattened into world coordinates.
//!
//! [`EntitySnapshot`] groups a list of entities by kind while keeping their
//! original order, which is what the identification pipeline consumes.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::geometry::{Coordinates, deserialize_finite};

/// A single-line or multi-line text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    text: String,
    position: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layer: Option<String>,
}

impl TextLabel {
    pub fn new(text: impl Into<String>, position: impl Into<Coordinates>) -> Self {
        Self {
            text: text.into(),
            position: position.into(),
            layer: None,
        }
    }

    /// Sets the layer the label was drawn on
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Coordinates {
        self.position
    }

    pub fn layer(&self) -> Option<&str> {
        self.layer.as_deref()
    }
}

/// A circle, typically the plan symbol of a borehole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleMarker {
    center: Coordinates,
    #[serde(deserialize_with = "deserialize_finite")]
    radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layer: Option<String>,
}

impl CircleMarker {
    pub fn new(center: impl Into<Coordinates>, radius: f64) -> Self {
        Self {
            center: center.into(),
            radius,
            layer: None,
        }
    }

    /// Sets the layer the circle was drawn on
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    pub fn center(&self) -> Coordinates {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn layer(&self) -> Option<&str> {
        self.layer.as_deref()
    }
}

/// An insertion of a block that carries attributes.
///
/// Attributes keep the order in which the drawing listed them; the first
/// attribute value that reads as a borehole number wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolInsertion {
    position: Coordinates,
    #[serde(default)]
    attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layer: Option<String>,
    /// Effective block name, when the access layer could resolve it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl SymbolInsertion {
    pub fn new(position: impl Into<Coordinates>) -> Self {
        Self {
            position: position.into(),
            attributes: IndexMap::new(),
            layer: None,
            name: None,
        }
    }

    /// Appends an attribute; a repeated tag replaces the earlier value in place
    pub fn with_attribute(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(tag.into(), value.into());
        self
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn position(&self) -> Coordinates {
        self.position
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Attribute values in drawing order
    pub fn attribute_values(&self) -> impl Iterator<Item = &str> {
        self.attributes.values().map(String::as_str)
    }

    pub fn layer(&self) -> Option<&str> {
        self.layer.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// One flattened drawing entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    Text(TextLabel),
    Circle(CircleMarker),
    Symbol(SymbolInsertion),
}

impl Entity {
    /// Returns the layer the entity was drawn on, if known
    pub fn layer(&self) -> Option<&str> {
        match self {
            Entity::Text(label) => label.layer(),
            Entity::Circle(marker) => marker.layer(),
            Entity::Symbol(symbol) => symbol.layer(),
        }
    }

    /// Returns the entity's reference position
    pub fn position(&self) -> Coordinates {
        match self {
            Entity::Text(label) => label.position(),
            Entity::Circle(marker) => marker.center(),
            Entity::Symbol(symbol) => symbol.position(),
        }
    }

    /// Whether every coordinate, and a circle's radius, is a finite number
    pub fn is_finite(&self) -> bool {
        match self {
            Entity::Circle(marker) => marker.center().is_finite() && marker.radius().is_finite(),
            other => other.position().is_finite(),
        }
    }
}

impl From<TextLabel> for Entity {
    fn from(label: TextLabel) -> Self {
        Entity::Text(label)
    }
}

impl From<CircleMarker> for Entity {
    fn from(marker: CircleMarker) -> Self {
        Entity::Circle(marker)
    }
}

impl From<SymbolInsertion> for Entity {
    fn from(symbol: SymbolInsertion) -> Self {
        Entity::Symbol(symbol)
    }
}

/// Entities of one drawing, grouped by kind.
///
/// Indices into [`labels`](Self::labels), [`markers`](Self::markers) and
/// [`symbols`](Self::symbols) are stable for the lifetime of the snapshot and
/// are what resolved boreholes use to point back at their sources.
///
/// # Examples
///
/// ```
/// use borehole_core::entity::{CircleMarker, EntitySnapshot, TextLabel};
///
/// let snapshot = EntitySnapshot::from_entities([
///     TextLabel::new("скв. 5", (3.0, 4.0, 0.0)).into(),
///     CircleMarker::new((3.5, 4.2, 0.0), 1.0).into(),
/// ]);
///
/// assert_eq!(snapshot.labels().len(), 1);
/// assert_eq!(snapshot.markers().len(), 1);
/// assert!(snapshot.symbols().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SnapshotDocument", into = "SnapshotDocument")]
pub struct EntitySnapshot {
    labels: Vec<TextLabel>,
    markers: Vec<CircleMarker>,
    symbols: Vec<SymbolInsertion>,
}

impl EntitySnapshot {
    /// Creates an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups entities by kind, preserving their relative order
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut snapshot = Self::new();
        for entity in entities {
            snapshot.push(entity);
        }
        debug!(
            labels = snapshot.labels.len(),
            markers = snapshot.markers.len(),
            symbols = snapshot.symbols.len();
            "Entity snapshot assembled"
        );
        snapshot
    }

    /// Adds one entity to the group of its kind
    pub fn push(&mut self, entity: Entity) {
        match entity {
            Entity::Text(label) => self.labels.push(label),
            Entity::Circle(marker) => self.markers.push(marker),
            Entity::Symbol(symbol) => self.symbols.push(symbol),
        }
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn markers(&self) -> &[CircleMarker] {
        &self.markers
    }

    pub fn symbols(&self) -> &[SymbolInsertion] {
        &self.symbols
    }

    /// Total number of entities across all kinds
    pub fn len(&self) -> usize {
        self.labels.len() + self.markers.len() + self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over owned copies of all entities, kind by kind
    fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.labels
            .iter()
            .cloned()
            .map(Entity::Text)
            .chain(self.markers.iter().cloned().map(Entity::Circle))
            .chain(self.symbols.iter().cloned().map(Entity::Symbol))
    }
}

impl FromIterator<Entity> for EntitySnapshot {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self::from_entities(iter)
    }
}

/// On-disk layout of a snapshot: a flat `[[entity]]` array.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SnapshotDocument {
    #[serde(default, rename = "entity")]
    entities: Vec<Entity>,
}

impl From<SnapshotDocument> for EntitySnapshot {
    fn from(document: SnapshotDocument) -> Self {
        Self::from_entities(document.entities)
    }
}

impl From<EntitySnapshot> for SnapshotDocument {
    fn from(snapshot: EntitySnapshot) -> Self {
        Self {
            entities: snapshot.entities().collect(),
        }
    }
}
