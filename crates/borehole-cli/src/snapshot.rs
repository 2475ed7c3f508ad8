//! Entity snapshot loading.
//!
//! A snapshot is a TOML document with one `[[entity]]` table per drawing
//! entity. Parse failures keep the document text and the failing span so the
//! error adapter can point at the offending entity.

use std::{fs, path::Path};

use log::{debug, info};

use borehole::{BoreholeError, entity::EntitySnapshot};

const SNAPSHOT_EXTENSION: &str = "toml";

/// Reads and parses an entity snapshot file.
///
/// # Errors
///
/// Returns error if:
/// - The file does not have a `.toml` extension
/// - The file cannot be read
/// - The document is not a valid snapshot
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<EntitySnapshot, BoreholeError> {
    let path = path.as_ref();

    let extension = path.extension().and_then(|ext| ext.to_str());
    if !extension.is_some_and(|ext| ext.eq_ignore_ascii_case(SNAPSHOT_EXTENSION)) {
        return Err(BoreholeError::UnsupportedInput(format!(
            "{} is not a `.{SNAPSHOT_EXTENSION}` entity snapshot",
            path.display()
        )));
    }

    let source = fs::read_to_string(path)?;
    debug!(path = path.display().to_string(), bytes = source.len(); "Snapshot read");

    let snapshot = parse_snapshot(&source)?;
    info!(
        path = path.display().to_string(),
        entities = snapshot.len();
        "Snapshot loaded"
    );
    Ok(snapshot)
}

/// Parses snapshot text.
pub fn parse_snapshot(source: &str) -> Result<EntitySnapshot, BoreholeError> {
    toml::from_str(source)
        .map_err(|err| BoreholeError::new_snapshot_error(err.message(), source, err.span()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn test_parse_mixed_snapshot() {
        let source = r#"
            [[entity]]
            kind = "text"
            text = "скв. 5"
            position = [3.0, 4.0, 0.0]

            [[entity]]
            kind = "circle"
            center = [3.5, 4.2]
            radius = 1.0
        "#;

        let snapshot = parse_snapshot(source).unwrap();
        assert_eq!(snapshot.labels().len(), 1);
        assert_eq!(snapshot.markers().len(), 1);
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let source = "[[entity]]\nkind = \"polyline\"\n";
        let err = parse_snapshot(source).unwrap_err();
        match err {
            BoreholeError::Snapshot { message, src, .. } => {
                assert!(message.contains("polyline"), "message: {message}");
                assert_eq!(src, source);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_position_is_rejected() {
        let source = "[[entity]]\nkind = \"symbol\"\nposition = [0.0, 0.0, nan]\n";
        let err = parse_snapshot(source).unwrap_err();
        match err {
            BoreholeError::Snapshot { message, .. } => {
                assert!(message.contains("finite"), "message: {message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("drawing.dwg");
        fs::write(&path, "").unwrap();

        assert!(matches!(
            load_snapshot(&path),
            Err(BoreholeError::UnsupportedInput(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_snapshot(dir.path().join("absent.toml")),
            Err(BoreholeError::Io(_))
        ));
    }
}
