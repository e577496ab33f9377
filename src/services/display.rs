//! Presentation-boundary helpers
//!
//! The catalog keeps missing fields as `None`. Placeholder text and image URLs are
//! produced here, for whatever renders the views.
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::FilmRecord;

pub const UNKNOWN_RUNTIME: &str = "Inconnue";
pub const UNRATED: &str = "Non noté";
pub const UNSPECIFIED_GENRES: &str = "Non spécifié";
pub const UNSPECIFIED_DATE: &str = "Non spécifiée";
pub const UNKNOWN_DIRECTORS: &str = "Inconnu";
pub const UNSPECIFIED_ACTORS: &str = "Non spécifié";
pub const NO_OVERVIEW: &str = "Pas de résumé disponible";
pub const NOT_FOUND_NOTICE: &str = "Aucune information trouvée pour ce film.";

/// Formats an ISO-8601 release date as `DD/MM/YYYY`
///
/// Strings that are not ISO dates come back unchanged.
pub fn format_release_date(release_date: Option<&str>) -> String {
    let Some(raw) = release_date.map(str::trim).filter(|d| !d.is_empty()) else {
        return UNSPECIFIED_DATE.to_string();
    };

    parse_iso_date(raw)
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| {
            tracing::debug!(release_date = %raw, "Unparseable release date");
            raw.to_string()
        })
}

fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Whole-number averages keep one decimal (`8.0`), others print as stored
fn format_vote_average(vote: f64) -> String {
    if vote.fract() == 0.0 {
        format!("{:.1}", vote)
    } else {
        vote.to_string()
    }
}

/// CDN size variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Wide backdrop behind the searched film's title
    Backdrop,
    /// Full-size poster
    Poster,
    /// Poster thumbnail in the recommendation grid
    Thumbnail,
}

impl ImageSize {
    pub fn segment(&self) -> &'static str {
        match self {
            ImageSize::Backdrop => "w1280",
            ImageSize::Poster => "w500",
            ImageSize::Thumbnail => "w200",
        }
    }
}

/// Builds image URLs by concatenation; paths are not validated
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base_url: String,
}

impl ImageUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, size: ImageSize, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("{}/{}{}", self.base_url, size.segment(), p))
    }
}

/// Display strings for a film's detail pane
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FilmDetails {
    pub runtime: String,
    pub vote_average: String,
    pub genres: String,
    pub release_date: String,
    pub directors: String,
    pub actors: String,
    pub overview: String,
}

impl From<&FilmRecord> for FilmDetails {
    fn from(film: &FilmRecord) -> Self {
        Self {
            runtime: film
                .runtime_minutes
                .map(|minutes| format!("{} minutes", minutes))
                .unwrap_or_else(|| UNKNOWN_RUNTIME.to_string()),
            vote_average: film
                .vote_average
                .map(format_vote_average)
                .unwrap_or_else(|| UNRATED.to_string()),
            genres: film
                .genres
                .as_ref()
                .map(|genres| genres.to_string())
                .unwrap_or_else(|| UNSPECIFIED_GENRES.to_string()),
            release_date: format_release_date(film.release_date.as_deref()),
            directors: film
                .directors
                .clone()
                .unwrap_or_else(|| UNKNOWN_DIRECTORS.to_string()),
            actors: film
                .actors
                .clone()
                .unwrap_or_else(|| UNSPECIFIED_ACTORS.to_string()),
            overview: film
                .overview
                .clone()
                .unwrap_or_else(|| NO_OVERVIEW.to_string()),
        }
    }
}

/// A film with its resolved image URLs
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FilmView {
    pub film: FilmRecord,
    pub backdrop_url: Option<String>,
    pub poster_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl FilmView {
    pub fn new(film: &FilmRecord, images: &ImageUrls) -> Self {
        Self {
            film: film.clone(),
            backdrop_url: images.url(ImageSize::Backdrop, film.backdrop_path.as_deref()),
            poster_url: images.url(ImageSize::Poster, film.poster_path.as_deref()),
            thumbnail_url: images.url(ImageSize::Thumbnail, film.poster_path.as_deref()),
        }
    }
}
