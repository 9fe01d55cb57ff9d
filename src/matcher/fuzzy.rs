//! Fuzzy intent matcher: keyword containment or normalized edit distance
//!
//! Selection is best score across the whole table; equal scores keep the
//! entry defined first.

use crate::matcher::knowledge::{KnowledgeBase, KnowledgeEntry};
use crate::matcher::levenshtein::similarity;

/// Default acceptance threshold for normalized similarity
pub const DEFAULT_THRESHOLD: f64 = 0.65;

/// Score of one keyword against one input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordScore {
    /// Normalized similarity in [0, 1]
    pub similarity: f64,
    /// Input contains the keyword verbatim
    pub contained: bool,
}

impl KeywordScore {
    /// Score a normalized input against a keyword
    pub fn compute(input: &str, keyword: &str) -> Self {
        Self {
            similarity: similarity(input, keyword),
            contained: input.contains(keyword),
        }
    }

    /// Accepted by containment or by clearing the threshold
    pub fn accepted(&self, threshold: f64) -> bool {
        self.contained || self.similarity >= threshold
    }
}

/// Winning entry for an input
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub entry: &'a KnowledgeEntry,
    /// Keyword that produced the best score
    pub keyword: &'a str,
    pub score: f64,
    /// Position of the entry in the table
    pub index: usize,
}

/// Lowercase and trim
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Best accepted candidate among `(keyword, item)` pairs
///
/// Candidates are visited in iteration order and only a strictly higher
/// score replaces the current best, which keeps ties stable.
pub fn best_fuzzy<'k, T, I>(input: &str, candidates: I, threshold: f64) -> Option<(T, &'k str, f64)>
where
    I: IntoIterator<Item = (&'k str, T)>,
{
    if input.is_empty() {
        return None;
    }

    let mut best: Option<(T, &'k str, f64)> = None;
    for (keyword, item) in candidates {
        let score = KeywordScore::compute(input, keyword);
        if !score.accepted(threshold) {
            continue;
        }
        let beats = best
            .as_ref()
            .map_or(true, |(_, _, current)| score.similarity > *current);
        if beats {
            best = Some((item, keyword, score.similarity));
        }
    }
    best
}

/// Knowledge-base matcher
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    knowledge: KnowledgeBase,
    threshold: f64,
}

impl IntentMatcher {
    pub fn new(knowledge: KnowledgeBase, threshold: f64) -> Self {
        Self { knowledge, threshold }
    }

    /// Match free text against the knowledge base
    ///
    /// Empty (or whitespace-only) input never matches.
    pub fn match_input(&self, input: &str) -> Option<MatchResult<'_>> {
        let normalized = normalize(input);

        let candidates = self
            .knowledge
            .entries()
            .iter()
            .enumerate()
            .flat_map(|(index, entry)| {
                entry.keys.iter().map(move |k| (k.as_str(), (index, entry)))
            });

        best_fuzzy(&normalized, candidates, self.threshold).map(|((index, entry), keyword, score)| {
            MatchResult {
                entry,
                keyword,
                score,
                index,
            }
        })
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new(KnowledgeBase::builtin(), DEFAULT_THRESHOLD)
    }
}
