//! Error types for borehole survey operations.
//!
//! This module provides the main error type [`BoreholeError`] and the
//! [`Severity`] used to decide how a failed run is reported.

use std::{fmt, io, ops::Range};

use thiserror::Error;

use borehole_core::identifier::BoreholeId;

/// The main error type for survey operations.
///
/// Extraction-level misses (a label without a number, a marker without a
/// label) are not errors and never reach this type; they are skipped and
/// logged where they occur.
#[derive(Debug, Error)]
pub enum BoreholeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid entity snapshot: {message}")]
    Snapshot {
        message: String,
        src: String,
        span: Option<Range<usize>>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("No boreholes were resolved from the drawing")]
    EmptyRegistry,

    #[error("Reference borehole `{0}` not found")]
    ReferenceNotFound(BoreholeId),

    #[error("Relative heights requested before a reference borehole was selected")]
    NoReferenceSelected,
}

impl BoreholeError {
    /// Create a new `Snapshot` error pointing into the snapshot text.
    pub fn new_snapshot_error(
        message: impl Into<String>,
        src: impl Into<String>,
        span: Option<Range<usize>>,
    ) -> Self {
        Self::Snapshot {
            message: message.into(),
            src: src.into(),
            span,
        }
    }

    /// How the failure should be surfaced.
    ///
    /// An empty drawing is an empty result rather than a fault, so it is
    /// reported as a warning; everything else is an error.
    pub fn severity(&self) -> Severity {
        match self {
            BoreholeError::EmptyRegistry => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Stable diagnostic code for documentation and searchability
    pub fn code(&self) -> &'static str {
        match self {
            BoreholeError::Io(_) => "borehole::io",
            BoreholeError::Snapshot { .. } => "borehole::snapshot",
            BoreholeError::Config(_) => "borehole::config",
            BoreholeError::Export(_) => "borehole::export",
            BoreholeError::UnsupportedInput(_) => "borehole::unsupported_input",
            BoreholeError::EmptyRegistry => "borehole::empty_registry",
            BoreholeError::ReferenceNotFound(_) => "borehole::reference_not_found",
            BoreholeError::NoReferenceSelected => "borehole::no_reference_selected",
        }
    }

    /// Optional hint on how to fix the problem
    pub fn help(&self) -> Option<&'static str> {
        match self {
            BoreholeError::EmptyRegistry => Some(
                "check that the drawing has borehole symbols with numbered attributes, \
                 or labels such as `скв. 12` near circle markers, and that layer filters \
                 are not excluding them",
            ),
            BoreholeError::ReferenceNotFound(_) => {
                Some("omit the reference to use the configured selection policy")
            }
            BoreholeError::NoReferenceSelected => {
                Some("select a reference borehole before computing heights")
            }
            BoreholeError::UnsupportedInput(_) => Some("entity snapshots must be `.toml` files"),
            BoreholeError::Snapshot { .. } => Some(
                "each `[[entity]]` needs a `kind` of `symbol`, `text` or `circle` \
                 and positions of two or three numbers",
            ),
            _ => None,
        }
    }
}

/// The severity level of a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A fatal error.
    Error,

    /// A non-fatal condition, such as an empty result.
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_is_warning() {
        assert!(BoreholeError::EmptyRegistry.severity().is_warning());
        assert!(!BoreholeError::EmptyRegistry.severity().is_error());
    }

    #[test]
    fn test_reference_not_found_names_identifier() {
        let err = BoreholeError::ReferenceNotFound("42".parse().unwrap());
        assert_eq!(err.to_string(), "Reference borehole `42` not found");
        assert!(err.severity().is_error());
        assert_eq!(err.code(), "borehole::reference_not_found");
        assert!(err.help().is_some());
    }

    #[test]
    fn test_io_conversion() {
        let err: BoreholeError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, BoreholeError::Io(_)));
        assert_eq!(err.code(), "borehole::io");
        assert_eq!(err.help(), None);
    }

    #[test]
    fn test_snapshot_error_keeps_source() {
        let err = BoreholeError::new_snapshot_error("missing field `kind`", "[[entity]]", Some(0..10));
        assert_eq!(
            err.to_string(),
            "Invalid entity snapshot: missing field `kind`"
        );
        match err {
            BoreholeError::Snapshot { src, span, .. } => {
                assert_eq!(src, "[[entity]]");
                assert_eq!(span, Some(0..10));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
