/// Dataset loading
///
/// The catalog ships as a zip archive holding a single JSON document, exported by the
/// offline recommendation pipeline. It is read exactly once, before the server binds.
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::{result::ZipError, ZipArchive};

use crate::{
    error::StartupDataError,
    models::{CatalogEntry, DatasetEntry},
};

/// Source of raw dataset resources
#[cfg_attr(test, mockall::automock)]
pub trait DatasetSource {
    /// Reads the named resource fully into memory
    fn read_resource(&self, name: &str) -> Result<Vec<u8>, StartupDataError>;
}

/// Reads resources out of a zip archive on disk
pub struct ZipArchiveSource {
    path: PathBuf,
}

impl ZipArchiveSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for ZipArchiveSource {
    fn read_resource(&self, name: &str) -> Result<Vec<u8>, StartupDataError> {
        let file = File::open(&self.path)?;
        let mut archive = ZipArchive::new(file)?;

        let mut resource = match archive.by_name(name) {
            Ok(resource) => resource,
            Err(ZipError::FileNotFound) => {
                return Err(StartupDataError::MissingResource(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::new();
        resource.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Loads the catalog entries from `resource` in `source`, in file order
pub fn load(
    source: &dyn DatasetSource,
    resource: &str,
) -> Result<Vec<CatalogEntry>, StartupDataError> {
    let bytes = source.read_resource(resource)?;
    let raw: Vec<DatasetEntry> = serde_json::from_slice(&bytes)?;
    let entries: Vec<CatalogEntry> = raw.into_iter().map(CatalogEntry::from).collect();

    validate_titles(&entries)?;
    warn_duplicate_titles(&entries);

    tracing::info!(
        resource = %resource,
        entries = entries.len(),
        "Loaded dataset"
    );

    Ok(entries)
}

/// Loads the catalog entries from a zip archive on disk
pub fn load_archive(
    path: impl Into<PathBuf>,
    resource: &str,
) -> Result<Vec<CatalogEntry>, StartupDataError> {
    let source = ZipArchiveSource::new(path);
    tracing::info!(archive = %source.path().display(), "Reading dataset archive");
    load(&source, resource)
}

fn validate_titles(entries: &[CatalogEntry]) -> Result<(), StartupDataError> {
    for (position, entry) in entries.iter().enumerate() {
        let untitled = std::iter::once(&entry.searched_film)
            .chain(entry.recommended_films.iter())
            .any(|film| film.title_localized.trim().is_empty());

        if untitled {
            return Err(StartupDataError::EmptyTitle { entry: position });
        }
    }
    Ok(())
}

/// Duplicates are kept: lookups resolve to the first entry
fn warn_duplicate_titles(entries: &[CatalogEntry]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (position, entry) in entries.iter().enumerate() {
        if let Some(first) = seen.get(&entry.searched_film.title_key()) {
            tracing::warn!(
                title = %entry.searched_film.title_localized,
                first_entry = first,
                duplicate_entry = position,
                "Duplicate searched title, lookups resolve to the first entry"
            );
        } else {
            seen.insert(entry.searched_film.title_key(), position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"[
        {
            "Film recherché": { "caracteristique": { "title_fr": "Inception", "runtime": 148 } },
            "Titres recommandés": [
                { "caracteristique": { "title_fr": "Interstellar" } },
                { "caracteristique": { "title_fr": "Tenet" } }
            ]
        },
        {
            "Film recherché": { "caracteristique": { "title_fr": "Amélie" } },
            "Titres recommandés": []
        }
    ]"#;

    fn source_returning(body: &'static str) -> MockDatasetSource {
        let mut source = MockDatasetSource::new();
        source
            .expect_read_resource()
            .returning(move |_| Ok(body.as_bytes().to_vec()));
        source
    }

    #[test]
    fn test_load_preserves_order() {
        let source = source_returning(DATASET);
        let entries = load(&source, "data.json").unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].searched_film.title_localized, "Inception");
        assert_eq!(entries[0].searched_film.runtime_minutes, Some(148));
        assert_eq!(entries[0].recommended_films.len(), 2);
        assert_eq!(entries[1].searched_film.title_localized, "Amélie");
        assert!(entries[1].recommended_films.is_empty());
    }

    #[test]
    fn test_load_requests_named_resource() {
        let mut source = MockDatasetSource::new();
        source
            .expect_read_resource()
            .withf(|name| name == "data_ml_final.json")
            .times(1)
            .returning(|_| Ok(b"[]".to_vec()));

        let entries = load(&source, "data_ml_final.json").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_load_propagates_missing_resource() {
        let mut source = MockDatasetSource::new();
        source
            .expect_read_resource()
            .returning(|name| Err(StartupDataError::MissingResource(name.to_string())));

        let result = load(&source, "data.json");
        assert!(matches!(result, Err(StartupDataError::MissingResource(name)) if name == "data.json"));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let source = source_returning(r#"{ "not": "a list" }"#);
        assert!(matches!(
            load(&source, "data.json"),
            Err(StartupDataError::Malformed(_))
        ));
    }

    #[test]
    fn test_load_rejects_missing_recommendations_key() {
        let source = source_returning(
            r#"[{ "Film recherché": { "caracteristique": { "title_fr": "Inception" } } }]"#,
        );
        assert!(matches!(
            load(&source, "data.json"),
            Err(StartupDataError::Malformed(_))
        ));
    }

    #[test]
    fn test_load_rejects_empty_title() {
        let source = source_returning(
            r#"[
                { "Film recherché": { "caracteristique": { "title_fr": "Inception" } }, "Titres recommandés": [] },
                { "Film recherché": { "caracteristique": { "title_fr": "  " } }, "Titres recommandés": [] }
            ]"#,
        );
        assert!(matches!(
            load(&source, "data.json"),
            Err(StartupDataError::EmptyTitle { entry: 1 })
        ));
    }

    #[test]
    fn test_load_rejects_untitled_recommendation() {
        let source = source_returning(
            r#"[{
                "Film recherché": { "caracteristique": { "title_fr": "Inception" } },
                "Titres recommandés": [{ "caracteristique": { "title_fr": "" } }]
            }]"#,
        );
        assert!(matches!(
            load(&source, "data.json"),
            Err(StartupDataError::EmptyTitle { entry: 0 })
        ));
    }

    #[test]
    fn test_load_keeps_duplicate_titles() {
        let source = source_returning(
            r#"[
                { "Film recherché": { "caracteristique": { "title_fr": "Dune", "runtime": 137 } }, "Titres recommandés": [] },
                { "Film recherché": { "caracteristique": { "title_fr": "DUNE", "runtime": 155 } }, "Titres recommandés": [] }
            ]"#,
        );
        let entries = load(&source, "data.json").unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_load_keeps_dataset_with_fractional_runtime() {
        let source = source_returning(
            r#"[{
                "Film recherché": { "caracteristique": { "title_fr": "Inception", "runtime": 148 } },
                "Titres recommandés": [{ "caracteristique": { "title_fr": "Tenet", "runtime": 150.5 } }]
            }]"#,
        );
        let entries = load(&source, "data.json").unwrap();
        assert_eq!(entries[0].recommended_films[0].runtime_minutes, Some(151));
    }

    #[test]
    fn test_zip_source_rejects_non_zip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data_ml_final.zip");
        std::fs::write(&path, b"not a zip").unwrap();

        let source = ZipArchiveSource::new(path);
        assert!(matches!(
            source.read_resource("data_ml_final.json"),
            Err(StartupDataError::Archive(_))
        ));
    }

    #[test]
    fn test_zip_source_missing_archive() {
        let source = ZipArchiveSource::new("/nonexistent/data_ml_final.zip");
        assert!(matches!(
            source.read_resource("data_ml_final.json"),
            Err(StartupDataError::ArchiveUnreadable(_))
        ));
    }
}
