use std::collections::{BTreeSet, HashMap};

use crate::models::{CatalogEntry, FilmRecord};

/// Read-only title index over the loaded catalog
///
/// Built once at startup and shared across all sessions without locking.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: Vec<CatalogEntry>,
    /// Lowercased title → position of the first entry carrying it
    by_title: HashMap<String, usize>,
}

impl CatalogIndex {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut by_title = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            by_title
                .entry(entry.searched_film.title_key())
                .or_insert(position);
        }

        Self { entries, by_title }
    }

    /// Distinct searchable titles
    pub fn list_titles(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .map(|entry| entry.searched_film.title_localized.as_str())
            .collect()
    }

    /// Distinct searchable titles in display order
    pub fn sorted_titles(&self) -> Vec<String> {
        self.list_titles().into_iter().map(str::to_string).collect()
    }

    /// Case-insensitive exact match on the searched film's title
    ///
    /// Surrounding whitespace in `query` is ignored.
    ///
    /// Returns the searched film and its full recommendation list, in ranking order.
    pub fn find_by_title(&self, query: &str) -> Option<(&FilmRecord, &[FilmRecord])> {
        self.find_entry(query)
            .map(|entry| (&entry.searched_film, entry.recommended_films.as_slice()))
    }

    pub fn find_entry(&self, query: &str) -> Option<&CatalogEntry> {
        self.by_title
            .get(&query.trim().to_lowercase())
            .and_then(|position| self.entries.get(*position))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, recommended: &[&str]) -> CatalogEntry {
        CatalogEntry {
            searched_film: FilmRecord::new(title),
            recommended_films: recommended.iter().map(|t| FilmRecord::new(*t)).collect(),
        }
    }

    fn sample_index() -> CatalogIndex {
        CatalogIndex::new(vec![
            entry("Inception", &["Interstellar", "Tenet"]),
            entry("Amélie", &["Delicatessen"]),
            entry("Zodiac", &[]),
        ])
    }

    #[test]
    fn test_every_listed_title_resolves() {
        let index = sample_index();
        for title in index.list_titles() {
            let (film, _) = index.find_by_title(title).unwrap();
            assert!(film.has_title(title));
        }
    }

    #[test]
    fn test_find_by_title_is_case_insensitive() {
        let index = sample_index();
        let upper = index.find_by_title("Amélie").unwrap();
        let lower = index.find_by_title("amélie").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.0.title_localized, "Amélie");
        assert_eq!(upper.1[0].title_localized, "Delicatessen");
    }

    #[test]
    fn test_find_by_title_unknown() {
        let index = sample_index();
        assert!(index.find_by_title("no such film").is_none());
        assert!(index.find_by_title("").is_none());
    }

    #[test]
    fn test_find_by_title_is_exact() {
        let index = sample_index();
        assert!(index.find_by_title("Incept").is_none());
        assert!(index.find_by_title("Inception 2").is_none());
    }

    #[test]
    fn test_find_by_title_ignores_surrounding_whitespace() {
        let index = sample_index();
        let (film, _) = index.find_by_title("  inception ").unwrap();
        assert_eq!(film.title_localized, "Inception");
        assert!(index.find_by_title("   ").is_none());
    }

    #[test]
    fn test_duplicate_titles_resolve_to_first_entry() {
        let index = CatalogIndex::new(vec![
            entry("Dune", &["Arrival"]),
            entry("DUNE", &["Blade Runner"]),
        ]);

        let (film, recommended) = index.find_by_title("dune").unwrap();
        assert_eq!(film.title_localized, "Dune");
        assert_eq!(recommended[0].title_localized, "Arrival");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_list_titles_is_distinct() {
        let index = CatalogIndex::new(vec![entry("Dune", &[]), entry("Dune", &[])]);
        assert_eq!(index.list_titles().len(), 1);
    }

    #[test]
    fn test_sorted_titles() {
        let index = sample_index();
        assert_eq!(index.sorted_titles(), vec!["Amélie", "Inception", "Zodiac"]);
    }

    #[test]
    fn test_empty_index() {
        let index = CatalogIndex::default();
        assert!(index.is_empty());
        assert!(index.list_titles().is_empty());
        assert!(index.find_by_title("Inception").is_none());
    }
}
