//! Doctor directory search.
//!
//! Patients type a partial, possibly misspelled name or specialty
//! ("cardio", "dr ramesh", "dermatolgy"). Each doctor is scored by the best
//! Jaro-Winkler match of the query against the name, the specialty, and their
//! individual words.

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::models::Doctor;

/// Minimum similarity to be listed.
const MIN_SCORE: f64 = 0.75;

/// Bonus when a word starts with the query (typing in progress).
const PREFIX_BONUS: f64 = 0.1;

/// A doctor with its match score (0.0 - 1.0).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorMatch {
    pub doctor: Doctor,
    pub score: f64,
}

/// Rank doctors against `query`, best first.
///
/// An empty query lists everyone alphabetically.
pub fn search_doctors(doctors: &[Doctor], query: &str, limit: usize) -> Vec<DoctorMatch> {
    let query = normalize(query);

    if query.is_empty() {
        let mut all: Vec<DoctorMatch> = doctors
            .iter()
            .map(|d| DoctorMatch {
                doctor: d.clone(),
                score: 1.0,
            })
            .collect();
        all.sort_by(|a, b| a.doctor.name.cmp(&b.doctor.name));
        all.truncate(limit);
        return all;
    }

    let mut matches: Vec<DoctorMatch> = doctors
        .iter()
        .map(|d| DoctorMatch {
            doctor: d.clone(),
            score: score_doctor(d, &query),
        })
        .filter(|m| m.score >= MIN_SCORE)
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.doctor.name.cmp(&b.doctor.name))
    });
    matches.truncate(limit);
    matches
}

fn score_doctor(doctor: &Doctor, query: &str) -> f64 {
    let name = normalize(&doctor.name);
    let specialty = normalize(&doctor.specialty);

    [name.as_str(), specialty.as_str()]
        .into_iter()
        .flat_map(|field| std::iter::once(field).chain(field.split(' ')))
        .filter(|candidate| !candidate.is_empty())
        .map(|candidate| {
            let mut score = jaro_winkler(candidate, query);
            if candidate.starts_with(query) {
                score += PREFIX_BONUS;
            }
            score.min(1.0)
        })
        .fold(0.0, f64::max)
}

/// Lowercase, strip punctuation and the "dr" title.
fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|w| *w != "dr" && *w != "doctor")
        .collect::<Vec<_>>()
        .join(" ")
}
