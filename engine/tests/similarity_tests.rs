//! Name similarity tests
//!
//! Covers normalization, edit-distance scoring, and the score bounds the
//! duplicate screen relies on.

use liquidation_engine::services::similarity::{normalize, similarity};
use proptest::prelude::*;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(normalize("  Sharma Traders  "), "sharma traders");
        assert_eq!(normalize("AGRO KING"), "agro king");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("sharma    traders"), "sharma traders");
        assert_eq!(normalize("a\t b\n c"), "a b c");
    }

    #[test]
    fn test_normalize_strips_symbols() {
        assert_eq!(normalize("Sharma & Sons (Pvt.)"), "sharma sons pvt");
        assert_eq!(normalize("Shop #42!"), "shop 42");
        assert_eq!(normalize("***"), "");
    }

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(similarity("Sharma Traders", "Sharma Traders"), 1.0);
        // Identical after normalization also scores 1.0
        assert_eq!(similarity("  SHARMA traders ", "sharma  traders"), 1.0);
    }

    #[test]
    fn test_both_empty_score_one() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("  ", "***"), 1.0);
    }

    #[test]
    fn test_empty_vs_nonempty_scores_zero() {
        assert_eq!(similarity("", "sharma"), 0.0);
        assert_eq!(similarity("sharma", ""), 0.0);
    }

    #[test]
    fn test_single_edit_score() {
        // "sharma traders" (14 chars) vs "sharma trader" = one deletion
        let score = similarity("Sharma Traders", "Sharma Trader");
        assert!((score - (1.0 - 1.0 / 14.0)).abs() < 1e-9);
    }

    #[test]
    fn test_unrelated_names_score_low() {
        let score = similarity("Sharma Traders", "Gupta Agro Centre");
        assert!(score < 0.5);
    }

    #[test]
    fn test_near_duplicates_cross_threshold() {
        assert!(similarity("Mahadev Agro", "Mahadev Agros") > 0.8);
        assert!(similarity("Mahadev Agro", "Shree Balaji Seeds") < 0.8);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn name_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 .,&()'-]{0,24}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Scores always stay inside [0, 1]
        #[test]
        fn prop_similarity_bounded(a in name_strategy(), b in name_strategy()) {
            let score = similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        /// A string is always fully similar to itself
        #[test]
        fn prop_similarity_reflexive(a in name_strategy()) {
            prop_assert_eq!(similarity(&a, &a), 1.0);
        }

        /// Argument order never changes the score
        #[test]
        fn prop_similarity_symmetric(a in name_strategy(), b in name_strategy()) {
            prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
        }

        /// Scoring operates on normalized forms
        #[test]
        fn prop_similarity_normalization_invariant(a in name_strategy(), b in name_strategy()) {
            prop_assert_eq!(similarity(&a, &b), similarity(&normalize(&a), &normalize(&b)));
        }

        /// Normalization is idempotent and stays in the [a-z0-9 ] alphabet
        #[test]
        fn prop_normalize_idempotent(a in "[ -~]{0,40}") {
            let once = normalize(&a);
            prop_assert_eq!(&normalize(&once), &once);
            prop_assert!(once
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
        }
    }
}
