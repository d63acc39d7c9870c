//! Counterparty text similarity
//!
//! Case-insensitive, tiered: exact match, containment, then the better of
//! word overlap and (for short strings) damped Levenshtein similarity.
//! Returns a value in [0, 1].

/// Only strings this short get the Levenshtein path; bank descriptions are
/// usually longer and word overlap serves them better
const LEVENSHTEIN_MAX_LEN: usize = 10;

/// Damping applied to Levenshtein similarity so a pure edit-distance match
/// never outranks containment
const LEVENSHTEIN_DAMPING: f64 = 0.7;

/// Similarity between two counterparty strings
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    if a == b {
        return 1.0;
    }

    if a.contains(&b) || b.contains(&a) {
        return 0.8;
    }

    let overlap = word_overlap(&a, &b);

    let edit = if a.chars().count() <= LEVENSHTEIN_MAX_LEN
        && b.chars().count() <= LEVENSHTEIN_MAX_LEN
    {
        levenshtein_similarity(&a, &b) * LEVENSHTEIN_DAMPING
    } else {
        0.0
    };

    overlap.max(edit)
}

/// Fraction of significant words (length > 2) shared between the strings,
/// over the larger word count. A word is shared when it appears as a
/// substring of the other string.
fn word_overlap(a: &str, b: &str) -> f64 {
    let words_a: Vec<&str> = a.split_whitespace().filter(|w| w.len() > 2).collect();
    let words_b: Vec<&str> = b.split_whitespace().filter(|w| w.len() > 2).collect();

    let larger = words_a.len().max(words_b.len());
    if larger == 0 {
        return 0.0;
    }

    let shared = words_a.iter().filter(|w| b.contains(*w)).count();
    shared as f64 / larger as f64
}

/// `1 - distance / max_len` over character counts
fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / max_len as f64
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_case_insensitive() {
        assert_eq!(similarity("John Doe", "john doe"), 1.0);
    }

    #[test]
    fn test_containment() {
        assert_eq!(similarity("TRANSFER JOHN DOE RENT", "john doe"), 0.8);
    }

    #[test]
    fn test_word_overlap() {
        // "doe" and "rent" shared out of 3 significant words
        let sim = similarity("john doe rent", "jane doe rent");
        assert!(sim > 0.6 && sim < 0.8, "got {}", sim);
    }

    #[test]
    fn test_short_strings_use_levenshtein() {
        // One edit over 5 chars: (1 - 1/5) * 0.7 = 0.56
        let sim = similarity("marta", "marla");
        assert!((sim - 0.56).abs() < 1e-9, "got {}", sim);
    }

    #[test]
    fn test_long_unrelated_strings_score_zero() {
        assert_eq!(
            similarity("electricity utility company", "gardening supplies ltd"),
            0.0
        );
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(similarity("", "john"), 0.0);
        assert_eq!(similarity("john", ""), 0.0);
    }

    #[test]
    fn test_levenshtein_distance() {
        let a: Vec<char> = "kitten".chars().collect();
        let b: Vec<char> = "sitting".chars().collect();
        assert_eq!(levenshtein(&a, &b), 3);
    }
}
