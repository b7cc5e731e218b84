//! Lexical similarity between answer texts
//!
//! Word-set overlap (Jaccard index) over lowercased whitespace tokens.
//! Cheap, order-insensitive, and reflexive: a text always scores 1.0
//! against itself, so identical answers are guaranteed to cluster together.

use std::collections::HashSet;

/// Similarity between two texts in [0, 1].
///
/// Intersection over union of the two word sets. Two empty texts have no
/// union and score 0.0.
pub fn lexical_similarity(text1: &str, text2: &str) -> f64 {
    let words1: HashSet<String> = text1.to_lowercase().split_whitespace().map(String::from).collect();
    let words2: HashSet<String> = text2.to_lowercase().split_whitespace().map(String::from).collect();

    let union = words1.union(&words2).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = words1.intersection(&words2).count();

    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts_score_one() {
        assert_eq!(lexical_similarity("Answer: 42", "Answer: 42"), 1.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(lexical_similarity("The Answer", "the answer"), 1.0);
    }

    #[test]
    fn test_disjoint_texts_score_zero() {
        assert_eq!(lexical_similarity("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // {a, b, c} vs {a, b, d}: intersection 2, union 4
        assert_eq!(lexical_similarity("a b c", "a b d"), 0.5);
    }

    #[test]
    fn test_empty_texts_score_zero() {
        assert_eq!(lexical_similarity("", ""), 0.0);
        assert_eq!(lexical_similarity("something", ""), 0.0);
    }

    #[test]
    fn test_word_order_ignored() {
        assert_eq!(lexical_similarity("rust is fast", "fast is rust"), 1.0);
    }
}
