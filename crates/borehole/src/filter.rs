//! Layer and block-name filters applied to a snapshot before resolution.

use log::{debug, warn};

use borehole_core::{
    borehole::Sources,
    entity::{Entity, EntitySnapshot},
};

use crate::config::FilterConfig;

/// The entities that passed filtering, plus where each one came from.
///
/// Resolution runs over [`snapshot`](Self::snapshot), so the indices it
/// records point into the filtered lists.
/// [`original_sources`](Self::original_sources) translates them back to the
/// snapshot the caller supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredSnapshot {
    snapshot: EntitySnapshot,
    labels: Vec<usize>,
    markers: Vec<usize>,
    symbols: Vec<usize>,
    input_len: usize,
    non_finite: usize,
}

impl FilteredSnapshot {
    /// Entities that passed the filters
    pub fn snapshot(&self) -> &EntitySnapshot {
        &self.snapshot
    }

    /// Entities skipped because a coordinate or radius was not a finite number
    pub fn non_finite(&self) -> usize {
        self.non_finite
    }

    /// Entities removed by the layer and block-name filters
    pub fn filtered_out(&self) -> usize {
        self.input_len - self.snapshot.len() - self.non_finite
    }

    /// Maps indices into the filtered lists back to the input snapshot.
    pub fn original_sources(&self, sources: Sources) -> Sources {
        Sources {
            label: sources.label.and_then(|i| self.labels.get(i).copied()),
            marker: sources.marker.and_then(|i| self.markers.get(i).copied()),
            symbol: sources.symbol.and_then(|i| self.symbols.get(i).copied()),
        }
    }
}

/// Case-insensitive substring filter over entity layers and symbol names.
///
/// An entity without a layer is dropped while a layer filter is active.
/// Symbol insertions without a block name always pass the name filter.
/// Entities with a NaN or infinite coordinate never pass.
///
/// # Examples
///
/// ```
/// use borehole::{config::FilterConfig, filter::EntityFilter};
/// use borehole_core::entity::{EntitySnapshot, TextLabel};
///
/// let snapshot = EntitySnapshot::from_entities([
///     TextLabel::new("скв. 1", (0.0, 0.0)).with_layer("Оси").into(),
///     TextLabel::new("скв. 2", (5.0, 0.0)).with_layer("СКВ_ТЕКСТ").into(),
/// ]);
///
/// let filter = EntityFilter::new(&FilterConfig::new(Some("скв".into()), None));
/// let filtered = filter.apply(&snapshot);
///
/// assert_eq!(filtered.snapshot().labels().len(), 1);
/// assert_eq!(filtered.filtered_out(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntityFilter {
    layer: Option<String>,
    symbol_name: Option<String>,
}

impl EntityFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            layer: config.layer().map(str::to_lowercase),
            symbol_name: config.symbol_name().map(str::to_lowercase),
        }
    }

    pub fn accepts(&self, entity: &Entity) -> bool {
        if let Some(layer) = &self.layer {
            match entity.layer() {
                Some(entity_layer) if entity_layer.to_lowercase().contains(layer.as_str()) => {}
                _ => return false,
            }
        }

        match (&self.symbol_name, entity) {
            (Some(name), Entity::Symbol(symbol)) => symbol
                .name()
                .is_none_or(|symbol_name| symbol_name.to_lowercase().contains(name.as_str())),
            _ => true,
        }
    }

    /// Returns the accepted entities along with their original indices.
    pub fn apply(&self, snapshot: &EntitySnapshot) -> FilteredSnapshot {
        let mut kept = EntitySnapshot::new();
        let mut non_finite = 0;

        let labels = self.keep(
            snapshot.labels().iter().cloned().map(Entity::Text),
            &mut kept,
            &mut non_finite,
        );
        let markers = self.keep(
            snapshot.markers().iter().cloned().map(Entity::Circle),
            &mut kept,
            &mut non_finite,
        );
        let symbols = self.keep(
            snapshot.symbols().iter().cloned().map(Entity::Symbol),
            &mut kept,
            &mut non_finite,
        );

        debug!(
            before = snapshot.len(),
            after = kept.len(),
            non_finite = non_finite;
            "Entity filters applied"
        );

        FilteredSnapshot {
            snapshot: kept,
            labels,
            markers,
            symbols,
            input_len: snapshot.len(),
            non_finite,
        }
    }

    /// Pushes accepted entities of one kind into `kept`, returning their indices
    fn keep(
        &self,
        entities: impl Iterator<Item = Entity>,
        kept: &mut EntitySnapshot,
        non_finite: &mut usize,
    ) -> Vec<usize> {
        entities
            .enumerate()
            .filter_map(|(index, entity)| {
                if !entity.is_finite() {
                    warn!(
                        index = index,
                        position:? = entity.position();
                        "Entity has a non-finite coordinate, skipping"
                    );
                    *non_finite += 1;
                    return None;
                }
                if !self.accepts(&entity) {
                    return None;
                }
                kept.push(entity);
                Some(index)
            })
            .collect()
    }
}
