//! Configuration types for borehole surveys.
//!
//! This module provides configuration structures that control how boreholes
//! are identified, matched and normalized. All types implement
//! [`serde::Deserialize`] and every field has a default, so a configuration
//! file only needs to name the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`ExtractionConfig`] - Optional replacement label patterns.
//! - [`MatchingConfig`] - Distance thresholds for label/marker pairing.
//! - [`FilterConfig`] - Layer and block-name filters applied before resolution.
//! - [`ReferenceConfig`] - Reference selection policy and default elevation.
//!
//! # Example
//!
//! ```
//! # use borehole::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.matching().label_to_marker(), 50.0);
//! assert!(config.validate().is_ok());
//! ```
//!
//! A TOML file overriding a few values:
//!
//! ```toml
//! [matching]
//! label_to_marker = 25.0
//!
//! [filter]
//! layer = "СКВ"
//!
//! [reference]
//! policy = { seeded = 7 }
//! elevation = 120.5
//! ```

use serde::Deserialize;

use crate::{error::BoreholeError, matcher::SpatialMatcher, reference::ReferencePolicy};

/// Top-level configuration combining every section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Identifier extraction section.
    #[serde(default)]
    extraction: ExtractionConfig,

    /// Label/marker matching section.
    #[serde(default)]
    matching: MatchingConfig,

    /// Entity filter section.
    #[serde(default)]
    filter: FilterConfig,

    /// Reference selection section.
    #[serde(default)]
    reference: ReferenceConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        extraction: ExtractionConfig,
        matching: MatchingConfig,
        filter: FilterConfig,
        reference: ReferenceConfig,
    ) -> Self {
        Self {
            extraction,
            matching,
            filter,
            reference,
        }
    }

    pub fn extraction(&self) -> &ExtractionConfig {
        &self.extraction
    }

    pub fn matching(&self) -> &MatchingConfig {
        &self.matching
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    pub fn reference(&self) -> &ReferenceConfig {
        &self.reference
    }

    /// Checks values that deserialize fine but make no sense.
    ///
    /// # Errors
    ///
    /// Returns [`BoreholeError::Config`] for negative or non-finite distances
    /// and for a non-finite reference elevation.
    pub fn validate(&self) -> Result<(), BoreholeError> {
        self.matching.validate()?;
        if !self.reference.elevation.is_finite() {
            return Err(BoreholeError::Config(format!(
                "reference elevation must be finite, got {}",
                self.reference.elevation
            )));
        }
        Ok(())
    }
}

/// Label pattern configuration.
///
/// When `patterns` is empty the built-in Russian survey notation rules are
/// used. Otherwise the listed regular expressions replace them, tried in
/// order against the lower-cased label; each must have a capture group.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    patterns: Vec<String>,
}

impl ExtractionConfig {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// Maximum pairing distances, in drawing units.
///
/// The two directions are configured separately: a label looking for its
/// circle, and a leftover circle looking for a label.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    label_to_marker: f64,
    marker_to_label: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            label_to_marker: SpatialMatcher::DEFAULT_MAX_DISTANCE,
            marker_to_label: SpatialMatcher::DEFAULT_MAX_DISTANCE,
        }
    }
}

impl MatchingConfig {
    pub fn new(label_to_marker: f64, marker_to_label: f64) -> Self {
        Self {
            label_to_marker,
            marker_to_label,
        }
    }

    pub fn label_to_marker(&self) -> f64 {
        self.label_to_marker
    }

    pub fn marker_to_label(&self) -> f64 {
        self.marker_to_label
    }

    fn validate(&self) -> Result<(), BoreholeError> {
        for (name, value) in [
            ("label_to_marker", self.label_to_marker),
            ("marker_to_label", self.marker_to_label),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BoreholeError::Config(format!(
                    "matching.{name} must be a finite, non-negative distance, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Filters applied to the snapshot before any borehole is resolved.
///
/// Both filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Keep only entities whose layer contains this text.
    layer: Option<String>,

    /// Keep only symbol insertions whose block name contains this text.
    symbol_name: Option<String>,
}

impl FilterConfig {
    pub fn new(layer: Option<String>, symbol_name: Option<String>) -> Self {
        Self { layer, symbol_name }
    }

    pub fn layer(&self) -> Option<&str> {
        self.layer.as_deref()
    }

    pub fn symbol_name(&self) -> Option<&str> {
        self.symbol_name.as_deref()
    }
}

/// Reference selection configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Policy used when no reference identifier is requested.
    policy: ReferencePolicy,

    /// Elevation assigned to the reference when the drawing has none.
    elevation: f64,
}

impl ReferenceConfig {
    pub fn new(policy: ReferencePolicy, elevation: f64) -> Self {
        Self { policy, elevation }
    }

    pub fn policy(&self) -> ReferencePolicy {
        self.policy
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }
}
