use crate::models::FilmRecord;

/// Default number of recommendations shown for a searched film
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// Returns at most `n` recommendations, keeping the precomputed ranking order
///
/// Ranking happens upstream when the dataset is built; this is truncation only.
pub fn top_n(recommended: &[FilmRecord], n: usize) -> &[FilmRecord] {
    &recommended[..recommended.len().min(n)]
}

/// Finds a film among the visible recommendations by case-insensitive title
pub fn find_recommendation<'a>(
    recommended: &'a [FilmRecord],
    n: usize,
    title: &str,
) -> Option<&'a FilmRecord> {
    top_n(recommended, n).iter().find(|film| film.has_title(title))
}
