//! Fuzzy venue name matching modelled on PostgreSQL's `pg_trgm`.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::models::geo::VenueName;

pub const SIMILARITY_THRESHOLD: f64 = 0.3;
pub const MAX_RESULTS: usize = 10;

/// Trigrams of every alphanumeric word, lower-cased and padded with two
/// leading blanks and one trailing blank.
pub fn trigrams(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    let mut grams = HashSet::new();

    for word in lowered.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        let padded: Vec<char> = "  ".chars().chain(word.chars()).chain(" ".chars()).collect();
        for window in padded.windows(3) {
            grams.insert(window.iter().collect());
        }
    }
    grams
}

pub fn similarity(a: &str, b: &str) -> f64 {
    let left = trigrams(a);
    let right = trigrams(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let shared = left.intersection(&right).count();
    let union = left.len() + right.len() - shared;
    shared as f64 / union as f64
}

/// Lower-case substrings of which every venue matching `query` contains at
/// least one: the query itself and each of its trigrams without padding.
/// Terms that contain a shorter term are dropped. `None` when a term is not
/// ASCII, since SQLite's `lower()` only folds ASCII.
pub fn candidate_terms(query: &str) -> Option<Vec<String>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Some(Vec::new());
    }

    let mut terms: Vec<String> = trigrams(&needle)
        .into_iter()
        .map(|gram| gram.trim().to_string())
        .chain(std::iter::once(needle))
        .collect();
    if terms.iter().any(|t| !t.is_ascii()) {
        return None;
    }

    terms.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    terms.dedup();
    let mut minimal: Vec<String> = Vec::new();
    for term in terms {
        if !minimal.iter().any(|kept| term.contains(kept.as_str())) {
            minimal.push(term);
        }
    }
    minimal.sort();
    Some(minimal)
}

#[derive(Debug, Clone, PartialEq)]
struct Scored {
    prefix: bool,
    substring: bool,
    similarity: f64,
    venue: VenueName,
}

/// Filters and orders `venues` for `query`: prefix matches first, then
/// substring matches, then by similarity. Ties go by name, then id.
pub fn rank_venues(query: &str, venues: Vec<VenueName>) -> Vec<VenueName> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<Scored> = venues
        .into_iter()
        .map(|venue| {
            let name = venue.venue_name.to_lowercase();
            Scored {
                prefix: name.starts_with(&needle),
                substring: name.contains(&needle),
                similarity: similarity(&needle, &name),
                venue,
            }
        })
        .filter(|s| s.prefix || s.substring || s.similarity >= SIMILARITY_THRESHOLD)
        .collect();

    scored.sort_by(|a, b| {
        b.prefix
            .cmp(&a.prefix)
            .then(b.substring.cmp(&a.substring))
            .then(b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal))
            .then_with(|| a.venue.venue_name.cmp(&b.venue.venue_name))
            .then(a.venue.venue_id.cmp(&b.venue.venue_id))
    });

    scored.into_iter().take(MAX_RESULTS).map(|s| s.venue).collect()
}
