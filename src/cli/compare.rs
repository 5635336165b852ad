use tabled::Table;

use crate::{
    error, info,
    matching::ArtistQuery,
    success,
    types::MatchTableRow,
    warning,
};

use super::matcher_or_exit;

pub fn compare(artist: String, candidates: Vec<String>, threshold: Option<f64>) {
    let matcher = matcher_or_exit(threshold);
    let query = match ArtistQuery::new(&artist) {
        Ok(q) => q,
        Err(e) => error!("{}", e),
    };

    let found = matcher.find_match(&query, &candidates);
    let rows: Vec<MatchTableRow> = matcher
        .scores(&query, &candidates)
        .into_iter()
        .zip(&candidates)
        .enumerate()
        .map(|(index, (score, candidate))| MatchTableRow {
            index,
            candidate: candidate.clone(),
            score: format!("{:.3}", score),
            accepted: if score >= matcher.threshold() { "yes" } else { "no" }.to_string(),
        })
        .collect();

    info!(
        "Scores for '{}' (threshold {:.2})",
        query.as_str(),
        matcher.threshold()
    );
    if !rows.is_empty() {
        println!("{}", Table::new(rows));
    }

    match found {
        Some(m) => success!("Match: '{}' at index {}", m.candidate, m.index),
        None => warning!("No candidate matches '{}'", query.as_str()),
    }
}
