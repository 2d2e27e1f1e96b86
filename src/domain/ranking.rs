use std::cmp::Ordering;

use strsim::normalized_levenshtein;

use super::model::SearchCandidate;

pub const SUBSTRING_BONUS: f64 = 0.2;
pub const TOP_CANDIDATES: usize = 10;

/// Similarity of `query` to "artist album", plus a bonus when the query appears verbatim.
pub fn score(query: &str, artist: &str, album: &str) -> f64 {
    let query = query.to_lowercase();
    let haystack = format!("{} {}", artist, album).to_lowercase();

    let mut score = normalized_levenshtein(&query, &haystack);
    if haystack.contains(&query) {
        score += SUBSTRING_BONUS;
    }
    score
}

/// Score every candidate and keep the best `TOP_CANDIDATES`, highest score first.
/// File count breaks ties.
pub fn rank(
    candidates: impl IntoIterator<Item = SearchCandidate>,
    query: &str,
) -> Vec<SearchCandidate> {
    let mut ranked: Vec<SearchCandidate> = candidates
        .into_iter()
        .map(|mut candidate| {
            candidate.score = score(query, &candidate.artist, &candidate.album);
            candidate
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.count.cmp(&a.count))
    });
    ranked.truncate(TOP_CANDIDATES);
    ranked
}
