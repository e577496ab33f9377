use std::path::Path;
use std::sync::Arc;

use crate::{
    config::Config,
    error::StartupDataError,
    models::SearchResetPolicy,
    services::{dataset, display::ImageUrls, CatalogIndex, SessionStore},
};

/// Shared application state
///
/// The catalog is immutable after startup; only the session store is written to.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogIndex>,
    pub sessions: SessionStore,
    pub images: Arc<ImageUrls>,
    pub stylesheet: Arc<str>,
    pub recommendation_limit: usize,
    pub reset_policy: SearchResetPolicy,
}

impl AppState {
    /// Creates the state around an already loaded catalog
    pub fn new(catalog: CatalogIndex, config: &Config) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions: SessionStore::with_ttl(config.session_ttl()),
            images: Arc::new(ImageUrls::new(config.image_base_url.clone())),
            stylesheet: Arc::from(""),
            recommendation_limit: config.recommendation_limit,
            reset_policy: config.search_reset_policy(),
        }
    }

    /// Loads the dataset archive and stylesheet named in `config`
    pub fn load(config: &Config) -> Result<Self, StartupDataError> {
        let entries = dataset::load_archive(&config.archive_path, &config.dataset_entry)?;
        let catalog = CatalogIndex::new(entries);

        tracing::info!(
            films = catalog.len(),
            titles = catalog.list_titles().len(),
            "Catalog index built"
        );

        Ok(Self::new(catalog, config).with_stylesheet(read_stylesheet(&config.stylesheet_path)))
    }

    pub fn with_stylesheet(mut self, stylesheet: impl Into<Arc<str>>) -> Self {
        self.stylesheet = stylesheet.into();
        self
    }
}

/// Styling is cosmetic: a missing stylesheet is served empty
fn read_stylesheet(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(css) => css,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Stylesheet unavailable, serving empty");
            String::new()
        }
    }
}
