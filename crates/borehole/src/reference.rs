//! Reference borehole selection.
//!
//! Exactly one borehole serves as the zero baseline for relative heights.
//! It is either named explicitly or chosen by a [`ReferencePolicy`]. Every
//! built-in policy is deterministic; [`ReferencePolicy::Seeded`] draws
//! pseudo-randomly but from a caller-supplied seed, so the same seed over the
//! same registry always picks the same borehole.

use log::info;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;

use borehole_core::identifier::BoreholeId;

use crate::{error::BoreholeError, registry::BoreholeRegistry};

/// How to pick a reference when none is requested by identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// The first borehole in registration order.
    #[default]
    First,
    /// The borehole with the numerically smallest identifier.
    Lowest,
    /// A pseudo-random borehole drawn from the given seed.
    Seeded(u64),
}

/// Marks one registry entry as the reference.
///
/// # Examples
///
/// ```
/// use borehole::{
///     extractor::IdentifierExtractor,
///     reference::{ReferencePolicy, ReferenceSelector},
///     registry::BoreholeRegistry,
/// };
/// use borehole_core::entity::SymbolInsertion;
///
/// let symbols = [
///     SymbolInsertion::new((0.0, 0.0)).with_attribute("НОМЕР", "9"),
///     SymbolInsertion::new((5.0, 0.0)).with_attribute("НОМЕР", "4"),
/// ];
/// let mut registry = BoreholeRegistry::from_symbols(&symbols, &IdentifierExtractor::default());
///
/// let selector = ReferenceSelector::new(ReferencePolicy::Lowest);
/// let reference = selector.select(&mut registry, None).unwrap();
/// assert_eq!(reference, "4");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceSelector {
    policy: ReferencePolicy,
}

impl ReferenceSelector {
    pub fn new(policy: ReferencePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ReferencePolicy {
        self.policy
    }

    /// Selects the reference and returns its identifier.
    ///
    /// Any previous selection is cleared first, together with every
    /// relative height computed against it. The new reference gets a
    /// relative height of zero.
    ///
    /// # Errors
    ///
    /// - [`BoreholeError::EmptyRegistry`] if the registry has no boreholes.
    /// - [`BoreholeError::ReferenceNotFound`] if `identifier` is given and
    ///   not registered.
    pub fn select(
        &self,
        registry: &mut BoreholeRegistry,
        identifier: Option<&BoreholeId>,
    ) -> Result<BoreholeId, BoreholeError> {
        if registry.is_empty() {
            return Err(BoreholeError::EmptyRegistry);
        }

        let chosen = match identifier {
            Some(identifier) => {
                if !registry.contains(identifier) {
                    return Err(BoreholeError::ReferenceNotFound(identifier.clone()));
                }
                identifier.clone()
            }
            None => self.choose(registry)?,
        };

        for borehole in registry.iter_mut() {
            borehole.clear_heights();
        }
        registry
            .get_mut(&chosen)
            .ok_or_else(|| BoreholeError::ReferenceNotFound(chosen.clone()))?
            .mark_reference();

        info!(
            identifier = chosen.as_str(),
            explicit = identifier.is_some();
            "Reference borehole selected"
        );
        Ok(chosen)
    }

    /// Applies the policy to a non-empty registry
    fn choose(&self, registry: &BoreholeRegistry) -> Result<BoreholeId, BoreholeError> {
        let borehole = match self.policy {
            ReferencePolicy::First => registry.get_index(0),
            ReferencePolicy::Lowest => registry.iter().min_by(|a, b| a.identifier().cmp(b.identifier())),
            ReferencePolicy::Seeded(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                registry.get_index(rng.random_range(0..registry.len()))
            }
        };

        borehole
            .map(|borehole| borehole.identifier().clone())
            .ok_or(BoreholeError::EmptyRegistry)
    }
}
