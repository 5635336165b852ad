//! # Fuzzy Artist Matching
//!
//! Decides whether an artist name returned by a catalog search corresponds to
//! the artist that was asked for. Exact comparison is too strict for catalog
//! data: search results carry featuring lists (`"Billie Eilish, Khalid"`),
//! punctuation variants (`"Guns N' Roses"` vs `"Guns N Roses"`), reordered
//! names and small typos. Each candidate is therefore scored on a `0.0..=1.0`
//! scale and accepted when the score reaches a configurable cutoff.
//!
//! ## Scoring
//!
//! Both names are normalized first: lowercased, every non-alphanumeric
//! character replaced by a space and runs of whitespace collapsed. Names made
//! of punctuation only (`"!!!"`) keep their trimmed lowercase text instead. A
//! blank candidate never matches. Accents are **not** folded, so `"Beyoncé"`
//! and `"beyonce"` differ by one edit.
//!
//! The score of a candidate is the best of:
//!
//! 1. normalized Levenshtein similarity of the whole names,
//! 2. the same similarity after sorting the words of both names,
//! 3. the similarity against each individual artist of a compound candidate,
//!    split on `,` `&` `/` `;` `+` and the words `feat`, `ft`, `featuring`,
//!    `vs`, `x`.
//!
//! ## Selection
//!
//! Candidates are scanned in input order and the scan stops at the first one
//! whose score is at or above the threshold. [`ArtistMatcher::find_match`]
//! reports which candidate matched so callers can pick the corresponding
//! search result; [`ArtistMatcher::is_match`] only answers yes or no.

use strsim::normalized_levenshtein;
use thiserror::Error;

/// Similarity cutoff used when nothing else is configured.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

const SEPARATOR_CHARS: [char; 5] = [',', '&', '/', ';', '+'];
const SEPARATOR_WORDS: [&str; 5] = ["feat", "ft", "featuring", "vs", "x"];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("query artist must not be empty")]
    EmptyQuery,

    #[error("threshold {0} is outside 0.0..=1.0")]
    InvalidThreshold(f64),
}

/// A validated artist name to match against.
///
/// Construction trims surrounding whitespace and rejects blank names, so the
/// matcher never sees an empty query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistQuery {
    raw: String,
    normalized: String,
}

impl ArtistQuery {
    pub fn new(name: &str) -> Result<Self, MatchError> {
        let raw = name.trim();
        if raw.is_empty() {
            return Err(MatchError::EmptyQuery);
        }

        Ok(Self {
            raw: raw.to_string(),
            normalized: comparable(raw),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// The candidate that satisfied the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistMatch {
    pub index: usize,
    pub candidate: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArtistMatcher {
    threshold: f64,
}

impl Default for ArtistMatcher {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ArtistMatcher {
    pub fn new(threshold: f64) -> Result<Self, MatchError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(MatchError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns `true` if any candidate scores at or above the threshold.
    pub fn is_match<S: AsRef<str>>(&self, query: &ArtistQuery, candidates: &[S]) -> bool {
        self.find_match(query, candidates).is_some()
    }

    /// Returns the first candidate, in input order, that reaches the threshold.
    ///
    /// Remaining candidates are not scored once a match is found.
    pub fn find_match<S: AsRef<str>>(
        &self,
        query: &ArtistQuery,
        candidates: &[S],
    ) -> Option<ArtistMatch> {
        candidates
            .iter()
            .enumerate()
            .find_map(|(index, candidate)| {
                let candidate = candidate.as_ref();
                if candidate.trim().is_empty() {
                    return None;
                }
                let score = score_normalized(&query.normalized, candidate);
                (score >= self.threshold).then(|| ArtistMatch {
                    index,
                    candidate: candidate.to_string(),
                    score,
                })
            })
    }

    /// Scores every candidate. Diagnostic counterpart of [`Self::find_match`].
    pub fn scores<S: AsRef<str>>(&self, query: &ArtistQuery, candidates: &[S]) -> Vec<f64> {
        candidates
            .iter()
            .map(|c| score_normalized(&query.normalized, c.as_ref()))
            .collect()
    }
}

/// Similarity of a query artist and a candidate artist string in `0.0..=1.0`.
pub fn similarity(query: &str, candidate: &str) -> f64 {
    score_normalized(&comparable(query), candidate)
}

/// Lowercases, replaces punctuation with spaces and collapses whitespace.
pub fn normalize(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized form of a name, or its trimmed lowercase text when the name
/// consists of punctuation only (`"!!!"`).
fn comparable(name: &str) -> String {
    let normalized = normalize(name);
    if normalized.is_empty() {
        name.trim().to_lowercase()
    } else {
        normalized
    }
}

/// Splits a compound artist string into its normalized individual artists.
pub fn split_artists(candidate: &str) -> Vec<String> {
    let mut parts = Vec::new();

    for chunk in candidate.split(SEPARATOR_CHARS) {
        let mut current: Vec<&str> = Vec::new();
        let normalized = normalize(chunk);
        if normalized.is_empty() {
            let raw = chunk.trim();
            if !raw.is_empty() {
                parts.push(raw.to_lowercase());
            }
            continue;
        }

        for word in normalized.split(' ') {
            if SEPARATOR_WORDS.contains(&word) {
                if !current.is_empty() {
                    parts.push(current.join(" "));
                    current.clear();
                }
            } else if !word.is_empty() {
                current.push(word);
            }
        }

        if !current.is_empty() {
            parts.push(current.join(" "));
        }
    }

    parts
}

fn sorted_words(name: &str) -> String {
    let mut words: Vec<&str> = name.split(' ').collect();
    words.sort_unstable();
    words.join(" ")
}

fn score_normalized(query: &str, candidate: &str) -> f64 {
    let whole = comparable(candidate);
    if whole.is_empty() || query.is_empty() {
        return 0.0;
    }

    let mut best = normalized_levenshtein(query, &whole);
    if best >= 1.0 {
        return best;
    }

    best = best.max(normalized_levenshtein(
        &sorted_words(query),
        &sorted_words(&whole),
    ));

    for part in split_artists(candidate) {
        best = best.max(normalized_levenshtein(query, &part));
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("  Guns N' Roses "), "guns n roses");
        assert_eq!(normalize("AC/DC"), "ac dc");
        assert_eq!(normalize("Beyoncé"), "beyoncé");
    }

    #[test]
    fn split_artists_handles_separators() {
        assert_eq!(
            split_artists("Billie Eilish, Khalid"),
            vec!["billie eilish", "khalid"]
        );
        assert_eq!(
            split_artists("Calvin Harris feat. Rihanna & Sia"),
            vec!["calvin harris", "rihanna", "sia"]
        );
        assert_eq!(split_artists("Drake"), vec!["drake"]);
        assert!(split_artists(" , ").is_empty());
    }

    #[test]
    fn split_artists_keeps_punctuation_only_names() {
        assert_eq!(split_artists("Nic Offer, !!!"), vec!["nic offer", "!!!"]);
        assert_eq!(split_artists("!!!, Drake"), vec!["!!!", "drake"]);
    }

    #[test]
    fn blank_candidate_scores_zero() {
        assert_eq!(similarity("Drake", ""), 0.0);
        assert_eq!(similarity("!!!", "   "), 0.0);
    }

    #[test]
    fn word_order_does_not_matter() {
        assert_eq!(similarity("Lamar Kendrick", "Kendrick Lamar"), 1.0);
    }

    #[test]
    fn unrelated_names_score_low() {
        assert!(similarity("Drake", "Justin Bieber") < DEFAULT_THRESHOLD);
    }

    #[test]
    fn threshold_is_validated() {
        assert!(ArtistMatcher::new(0.0).is_ok());
        assert!(ArtistMatcher::new(1.0).is_ok());
        assert_eq!(
            ArtistMatcher::new(1.2),
            Err(MatchError::InvalidThreshold(1.2))
        );
        assert!(ArtistMatcher::new(f64::NAN).is_err());
    }

    #[test]
    fn blank_query_is_rejected() {
        assert_eq!(ArtistQuery::new("   "), Err(MatchError::EmptyQuery));
        assert_eq!(ArtistQuery::new(" Drake ").unwrap().as_str(), "Drake");
    }
}
