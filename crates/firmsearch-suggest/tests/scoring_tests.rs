use firmsearch_core::types::{Suggestion, SuggestionSource};
use firmsearch_suggest::scoring::{facet_score, rank, text_match_score, NO_MATCH_SCORE};
use proptest::prelude::*;

#[test]
fn match_kinds_score_as_expected() {
    assert_eq!(text_match_score("acme", "ACME"), 1.0);
    assert!((text_match_score("acme", "acme corp") - 0.85).abs() < 1e-6);
    assert!((text_match_score("corp", "acme corp") - 0.65).abs() < 1e-6);
    assert_eq!(text_match_score("acme", "globex"), NO_MATCH_SCORE);
}

#[test]
fn long_candidates_keep_match_kind_order() {
    let filler = "x".repeat(200);
    let prefix = text_match_score("acme", &format!("acme{filler}"));
    let inner = text_match_score("acme", &format!("{filler}acme"));

    assert!(prefix > inner, "{prefix} vs {inner}");
    assert!(inner > NO_MATCH_SCORE, "{inner}");
    assert!((prefix - 0.12).abs() < 1e-6);
    assert!((inner - 0.11).abs() < 1e-6);
}

#[test]
fn popular_facets_outrank_rare_ones() {
    assert!(facet_score("soft", "software", 5000) > facet_score("soft", "software", 10));
    assert_eq!(facet_score("soft", "software", 1000), facet_score("soft", "software", 1_000_000));
}

#[test]
fn rank_sorts_descending_and_truncates() {
    let mut items: Vec<Suggestion> = [0.2_f32, 0.9, 0.5, 0.9]
        .iter()
        .enumerate()
        .map(|(i, s)| Suggestion::new(i.to_string(), SuggestionSource::Company, *s, ""))
        .collect();
    rank(&mut items, 3);

    let texts: Vec<&str> = items.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["1", "3", "2"]);
}

proptest! {
    #[test]
    fn prefix_beats_substring_beats_nothing(
        query in "[a-z]{2,8}",
        tail in "[a-z]{1,15}",
        head in "[0-9]{1,15}",
    ) {
        let exact = text_match_score(&query, &query);
        let prefix = text_match_score(&query, &format!("{query}{tail}"));
        let inner = text_match_score(&query, &format!("{head}{query}"));

        prop_assert_eq!(exact, 1.0);
        prop_assert!(exact > prefix);
        prop_assert!(prefix > inner);
        prop_assert!(inner > NO_MATCH_SCORE);
    }

    #[test]
    fn scores_stay_in_unit_range(query in "\\PC{0,12}", candidate in "\\PC{0,40}") {
        let score = text_match_score(&query, &candidate);
        prop_assert!((NO_MATCH_SCORE..=1.0).contains(&score));
    }
}
