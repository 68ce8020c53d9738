//! Attributes each document of a page to the lexical or the vector side.
//!
//! A hybrid request is answered by one engine call, so attribution is a heuristic over the
//! document's score and where the query text appears in it.

use firmsearch_core::config::ClassifierSettings;
use firmsearch_core::types::{MatchKind, RetrievedDocument, SearchMode};

const STRONG_SCORE: f32 = 3.0;
const NAME_MATCH_CEILING: f32 = 2.0;
const INDUSTRY_BAND: (f32, f32) = (1.5, 2.5);
const UNMATCHED_FLOOR: f32 = 1.0;
const LOCALITY_FLOOR: f32 = 0.5;

/// What to answer when none of the score rules decide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    #[default]
    Lexical,
    /// Parity of the Java `String.hashCode` of the document id; even is semantic.
    LegacyHashParity,
}

impl FallbackPolicy {
    pub fn from_settings(settings: &ClassifierSettings) -> Self {
        if settings.legacy_hash_parity {
            FallbackPolicy::LegacyHashParity
        } else {
            FallbackPolicy::Lexical
        }
    }

    fn decide(self, doc: &RetrievedDocument) -> MatchKind {
        match self {
            FallbackPolicy::Lexical => MatchKind::Lexical,
            FallbackPolicy::LegacyHashParity => {
                let id = doc.id().unwrap_or_default();
                if java_string_hash(&id) % 2 == 0 {
                    MatchKind::Semantic
                } else {
                    MatchKind::Lexical
                }
            }
        }
    }
}

/// `s[0]*31^(n-1) + ... + s[n-1]` over UTF-16 code units with 32-bit wraparound.
pub fn java_string_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HybridClassifier {
    fallback: FallbackPolicy,
}

impl HybridClassifier {
    pub fn new(fallback: FallbackPolicy) -> Self { Self { fallback } }

    pub fn fallback(&self) -> FallbackPolicy { self.fallback }

    pub fn classify(&self, doc: &RetrievedDocument, query: Option<&str>, mode: SearchMode) -> MatchKind {
        match mode {
            SearchMode::Lexical => MatchKind::Lexical,
            SearchMode::Semantic => MatchKind::Semantic,
            SearchMode::Hybrid => match query {
                Some(q) => self.classify_hybrid(doc, &q.to_lowercase()),
                None => MatchKind::Lexical,
            },
        }
    }

    fn classify_hybrid(&self, doc: &RetrievedDocument, query: &str) -> MatchKind {
        let score = doc.score();
        let mentions = |field: &str| doc.text(field).is_some_and(|v| v.to_lowercase().contains(query));
        let in_name = mentions("name");
        let in_industry = mentions("industry");
        let in_locality = mentions("locality");

        if score > STRONG_SCORE {
            return MatchKind::Semantic;
        }
        if in_name && score <= NAME_MATCH_CEILING {
            return MatchKind::Lexical;
        }
        if in_industry && score > INDUSTRY_BAND.0 && score <= INDUSTRY_BAND.1 {
            return MatchKind::Semantic;
        }
        if !in_name && !in_industry && score > UNMATCHED_FLOOR {
            return MatchKind::Semantic;
        }
        if in_locality && !in_name && !in_industry && score > LOCALITY_FLOOR {
            return MatchKind::Semantic;
        }
        self.fallback.decide(doc)
    }
}
