use std::cmp::Ordering;

use firmsearch_core::types::Suggestion;

pub const EXACT_SCORE: f32 = 1.0;
pub const PREFIX_SCORE: f32 = 0.9;
pub const CONTAINS_SCORE: f32 = 0.7;
pub const NO_MATCH_SCORE: f32 = 0.1;
const LENGTH_PENALTY: f32 = 0.01;

/// Case-insensitive closeness of `candidate` to `query`.
///
/// Prefix and substring scores lose 0.01 per extra character. They bottom out one and two
/// penalty steps above the no-match score, so prefix > substring > no match for any length.
#[allow(clippy::cast_precision_loss)]
pub fn text_match_score(query: &str, candidate: &str) -> f32 {
    let q = query.to_lowercase();
    let c = candidate.to_lowercase();
    let extra = c.chars().count().saturating_sub(q.chars().count()) as f32;
    if c == q {
        EXACT_SCORE
    } else if c.starts_with(&q) {
        (PREFIX_SCORE - extra * LENGTH_PENALTY).max(NO_MATCH_SCORE + 2.0 * LENGTH_PENALTY)
    } else if c.contains(&q) {
        (CONTAINS_SCORE - extra * LENGTH_PENALTY).max(NO_MATCH_SCORE + LENGTH_PENALTY)
    } else {
        NO_MATCH_SCORE
    }
}

/// Text match weighted by popularity; counts saturate at 1000.
#[allow(clippy::cast_precision_loss)]
pub fn facet_score(query: &str, value: &str, count: u64) -> f32 {
    let popularity = (count as f32 / 1000.0).min(1.0);
    text_match_score(query, value) * (0.7 + popularity * 0.3)
}

/// Stable sort by descending score, then cut to `limit`.
pub fn rank(suggestions: &mut Vec<Suggestion>, limit: usize) {
    suggestions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    suggestions.truncate(limit);
}
