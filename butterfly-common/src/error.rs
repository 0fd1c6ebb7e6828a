//! Error types and utilities for butterfly-osm toolkit
//!
//! Provides the toolkit-wide error type and fuzzy matching for user-supplied
//! identifiers (profile names, option keys).

use strsim::{jaro_winkler, normalized_levenshtein};

/// Minimum combined similarity for a suggestion to be offered.
const MIN_SIMILARITY: f64 = 0.65;

/// Find the best fuzzy match using hybrid semantic + character-based scoring
///
/// Character similarity is Jaro-Winkler (70%) blended with normalized
/// Levenshtein (30%). Identifiers such as `speed_two_directions` get a prefix
/// bonus when the first characters agree closely, and a part bonus when the
/// input matches one `_`-separated component.
fn find_best_fuzzy_match(input: &str, candidates: &[&str]) -> Option<String> {
    let input_lower = input.to_lowercase();
    let mut best_match = None;
    let mut best_score = 0.0f64;

    for candidate in candidates {
        let candidate_lower = candidate.to_lowercase();

        // Transpositions are the common typo for short identifiers ("hkie").
        let jw_score = jaro_winkler(&input_lower, &candidate_lower);
        // Deletions ("fot", "block_frds").
        let lev_score = normalized_levenshtein(&input_lower, &candidate_lower);

        let mut score = (jw_score * 0.7) + (lev_score * 0.3);

        let prefix_len = input_lower.chars().count().min(7);
        if prefix_len >= 4 {
            let input_prefix = input_lower.chars().take(prefix_len).collect::<String>();
            let candidate_prefix = candidate_lower.chars().take(prefix_len).collect::<String>();

            let prefix_similarity = normalized_levenshtein(&input_prefix, &candidate_prefix);
            if prefix_similarity > 0.7 {
                score += 0.2 * prefix_similarity;
            }
        }

        if candidate_lower.contains('_') {
            for part in candidate_lower.split('_') {
                if part.len() >= 4 {
                    let part_similarity = jaro_winkler(&input_lower, part);
                    if part_similarity > 0.85 {
                        score += 0.12 * part_similarity;
                    }
                }
            }
        }

        if score >= MIN_SIMILARITY && score > best_score {
            best_score = score;
            best_match = Some(candidate.to_string());
        }
    }

    best_match
}

/// Suggest a correction for a misspelled identifier.
///
/// Returns `None` when the input already names a candidate (ignoring case) or
/// when nothing is close enough.
pub fn suggest_correction(input: &str, candidates: &[&str]) -> Option<String> {
    if candidates.iter().any(|c| c.eq_ignore_ascii_case(input)) {
        return None;
    }
    find_best_fuzzy_match(input, candidates)
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

/// Main error type for butterfly-osm operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Profile name not recognized
    #[error("Profile '{name}' not found{}", did_you_mean(.suggestion))]
    UnknownProfile {
        name: String,
        suggestion: Option<String>,
    },

    /// Option key not recognized for a profile
    #[error("Unknown option '{key}'{}", did_you_mean(.suggestion))]
    UnknownOption {
        key: String,
        suggestion: Option<String>,
    },

    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid configuration or parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience result type for butterfly-osm operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILES: &[&str] = &["foot", "hike"];
    const OPTIONS: &[&str] = &[
        "name",
        "speed_bits",
        "speed_factor",
        "speed_two_directions",
        "block_private",
        "block_fords",
    ];

    #[test]
    fn test_suggest_correction_profile_typos() {
        assert_eq!(suggest_correction("fot", PROFILES), Some("foot".to_string()));
        assert_eq!(suggest_correction("hkie", PROFILES), Some("hike".to_string()));
        assert_eq!(suggest_correction("hik", PROFILES), Some("hike".to_string()));
    }

    #[test]
    fn test_suggest_correction_option_typos() {
        assert_eq!(
            suggest_correction("block_frds", OPTIONS),
            Some("block_fords".to_string())
        );
        assert_eq!(
            suggest_correction("speed_bit", OPTIONS),
            Some("speed_bits".to_string())
        );
    }

    #[test]
    fn test_suggest_correction_no_match() {
        assert_eq!(suggest_correction("totally-different", PROFILES), None);
        assert_eq!(suggest_correction("foot", PROFILES), None);
        assert_eq!(suggest_correction("HIKE", PROFILES), None);
    }

    #[test]
    fn test_error_display_includes_suggestion() {
        let err = Error::UnknownProfile {
            name: "hkie".to_string(),
            suggestion: Some("hike".to_string()),
        };
        assert_eq!(err.to_string(), "Profile 'hkie' not found (did you mean 'hike'?)");

        let err = Error::UnknownOption {
            key: "colour".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "Unknown option 'colour'");
    }
}
