use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

pub mod selection;

pub use selection::{SearchResetPolicy, SelectionError, SelectionEvent, SelectionState};

/// Characteristics of one film as shipped in the dataset
///
/// Only the localized title is required. Every other field stays optional here;
/// placeholder text for missing values is chosen at display time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilmRecord {
    /// Localized (French) title, also the search key
    #[serde(rename = "title_fr")]
    pub title_localized: String,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(
        rename = "runtime",
        default,
        deserialize_with = "deserialize_runtime_minutes"
    )]
    pub runtime_minutes: Option<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Option<Genres>,
    /// ISO-8601 date, e.g. "2010-07-16"
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub directors: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl FilmRecord {
    /// Creates a record with only a title set
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title_localized: title.into(),
            backdrop_path: None,
            poster_path: None,
            runtime_minutes: None,
            vote_average: None,
            genres: None,
            release_date: None,
            directors: None,
            actors: None,
            overview: None,
        }
    }

    /// Lowercased title used for case-insensitive matching
    pub fn title_key(&self) -> String {
        self.title_localized.to_lowercase()
    }

    /// Case-insensitive exact title comparison
    pub fn has_title(&self, title: &str) -> bool {
        self.title_localized.to_lowercase() == title.to_lowercase()
    }
}

/// Genres are stored either as one preformatted string or as a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Genres {
    One(String),
    Many(Vec<String>),
}

impl Display for Genres {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Genres::One(genres) => write!(f, "{}", genres),
            Genres::Many(genres) => write!(f, "{}", genres.join(", ")),
        }
    }
}

/// Runtimes exported from dataframes come through as floats (`148.0`)
///
/// Fractional runtimes are rounded to the nearest minute; values that cannot be a
/// duration are dropped rather than failing the whole dataset.
fn deserialize_runtime_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(value.and_then(runtime_minutes))
}

fn runtime_minutes(value: f64) -> Option<u32> {
    let minutes = value.round();
    if !minutes.is_finite() || minutes < 0.0 || minutes > u32::MAX as f64 {
        tracing::warn!(runtime = value, "Ignoring invalid runtime");
        return None;
    }
    if minutes != value {
        tracing::debug!(runtime = value, rounded = minutes, "Rounding fractional runtime");
    }
    Some(minutes as u32)
}

/// One searched film paired with its precomputed recommendations, in ranking order
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogEntry {
    pub searched_film: FilmRecord,
    pub recommended_films: Vec<FilmRecord>,
}

// ============================================================================
// Dataset archive types
// ============================================================================

/// Raw entry as exported by the recommendation pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetEntry {
    #[serde(rename = "Film recherché")]
    pub searched: DatasetFilm,
    #[serde(rename = "Titres recommandés")]
    pub recommended: Vec<DatasetFilm>,
}

/// Wrapper object around a film's characteristics
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetFilm {
    #[serde(rename = "caracteristique")]
    pub characteristics: FilmRecord,
}

impl From<DatasetEntry> for CatalogEntry {
    fn from(entry: DatasetEntry) -> Self {
        CatalogEntry {
            searched_film: entry.searched.characteristics,
            recommended_films: entry
                .recommended
                .into_iter()
                .map(|film| film.characteristics)
                .collect(),
        }
    }
}
