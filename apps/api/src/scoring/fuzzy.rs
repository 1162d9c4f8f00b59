//! Partial token-set similarity on a 0–100 scale.
//!
//! Both strings are split into whitespace token sets. Any shared token scores 100.
//! Otherwise the sorted token strings are compared with a sliding-window partial
//! ratio: the shorter string is slid across the longer one (window lengths within
//! one char of the shorter string, to tolerate a dropped or extra letter) and the
//! best normalized Levenshtein similarity wins.

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Similarity of `a` and `b` in `[0, 100]`. Empty input scores 0.
pub fn partial_token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    if tokens_a.intersection(&tokens_b).next().is_some() {
        return 100.0;
    }

    let sorted_a = tokens_a.into_iter().collect::<Vec<_>>().join(" ");
    let sorted_b = tokens_b.into_iter().collect::<Vec<_>>().join(" ");
    partial_ratio(&sorted_a, &sorted_b)
}

/// Best similarity of the shorter string against any window of the longer one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    let m = shorter.chars().count();
    if m == 0 {
        return 0.0;
    }

    // Byte offset of every char boundary in `longer`, end included.
    let bounds: Vec<usize> = longer
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(longer.len()))
        .collect();
    let n = bounds.len() - 1;

    let mut best = 0.0_f64;
    for width in m.saturating_sub(1).max(1)..=(m + 1).min(n) {
        for start in 0..=(n - width) {
            let window = &longer[bounds[start]..bounds[start + width]];
            let score = normalized_levenshtein(shorter, window);
            if score > best {
                best = score;
                if best >= 1.0 {
                    return 100.0;
                }
            }
        }
    }

    best * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_100() {
        assert_eq!(partial_token_set_ratio("rust", "rust"), 100.0);
    }

    #[test]
    fn test_shared_token_scores_100() {
        let score = partial_token_set_ratio("machine learning", "computer vision and machine tuning");
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_plural_variant_clears_threshold() {
        let score = partial_token_set_ratio("microservices", "built microservice architecture");
        assert!(score > 90.0, "score was {score}");
    }

    #[test]
    fn test_single_typo_in_short_word_does_not_clear_threshold() {
        let score = partial_token_set_ratio("kubernetes", "deployed kubernete clusters");
        assert!((score - 90.0).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_unrelated_text_scores_low() {
        let score = partial_token_set_ratio("kubernetes", "accountant with payroll experience");
        assert!(score < 60.0, "score was {score}");
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(partial_token_set_ratio("", "anything"), 0.0);
        assert_eq!(partial_token_set_ratio("rust", "   "), 0.0);
        assert_eq!(partial_ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_partial_ratio_is_symmetric() {
        let a = partial_ratio("graphql", "wrote graphq1 resolvers");
        let b = partial_ratio("wrote graphq1 resolvers", "graphql");
        assert_eq!(a, b);
    }

    #[test]
    fn test_multibyte_text_does_not_split_chars() {
        let score = partial_ratio("café", "le café crème");
        assert_eq!(score, 100.0);
    }
}
