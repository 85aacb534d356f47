//! Terminology extraction
//!
//! Lexical heuristics for finding recurring technical noun phrases. A
//! candidate is a run of 2–3 consecutive non-stopword tokens whose last
//! word (the head) appears in one of the classification lexicons.

use crate::model::ConceptType;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9_\-]*").expect("valid token regex"));

static CLAUSE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.,;:!?()\[\]{}\n]").expect("valid clause regex"));

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "of", "in", "on", "for", "to", "and", "or", "with", "by", "is", "are",
    "be", "was", "were", "we", "this", "that", "each", "from", "as", "at", "it", "its",
    "which", "our", "using", "use", "uses", "used", "then", "into", "over", "all", "every",
    "until", "while", "if", "else", "return", "not", "can", "has", "have", "per", "via",
    "when", "where", "than", "these", "those", "their", "such", "both", "let", "given",
    "new", "based", "one", "two", "first", "second", "do", "end", "only", "also", "may",
    "must", "should", "will", "more", "most", "some", "any", "between", "within", "without",
];

const DATA_STRUCTURE_HEADS: &[&str] = &[
    "tree", "graph", "matrix", "vector", "array", "list", "queue", "stack", "heap", "table",
    "map", "tensor", "buffer", "index", "trie", "dictionary", "grid", "cache", "embedding",
];

const PARAMETER_HEADS: &[&str] = &[
    "rate", "threshold", "parameter", "coefficient", "factor", "weight", "size", "epsilon",
    "alpha", "beta", "gamma", "lambda", "tolerance", "budget", "limit", "temperature",
    "momentum", "radius", "horizon", "penalty", "bound",
];

const METHOD_HEADS: &[&str] = &[
    "method", "search", "descent", "regression", "algorithm", "approach", "technique",
    "procedure", "sampling", "optimization", "estimation", "propagation", "clustering",
    "traversal", "decomposition", "heuristic", "relaxation", "encoding", "ranking",
];

/// Lowercased word tokens of a text
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect()
}

/// Check if `phrase` occurs as a contiguous token run inside `tokens`
#[must_use]
pub fn contains_phrase(tokens: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty()
        && tokens.len() >= phrase.len()
        && tokens.windows(phrase.len()).any(|w| w == phrase)
}

/// Classify a phrase by its head word
#[must_use]
pub fn classify(phrase: &[String]) -> Option<ConceptType> {
    let head = phrase.last()?.as_str();
    if DATA_STRUCTURE_HEADS.contains(&head) {
        Some(ConceptType::DataStructure)
    } else if PARAMETER_HEADS.contains(&head) {
        Some(ConceptType::Parameter)
    } else if METHOD_HEADS.contains(&head) {
        Some(ConceptType::Method)
    } else {
        None
    }
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Candidate phrases (2–3 tokens, classified head) in one text
///
/// Punctuation and stopwords both end a run.
fn candidates(text: &str) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    for clause in CLAUSE_BREAK.split(text).map(tokenize) {
        for run in clause.split(|t| is_stopword(t)) {
            for len in 2..=3 {
                if run.len() < len {
                    continue;
                }
                out.extend(
                    run.windows(len)
                        .filter(|w| classify(w).is_some())
                        .map(<[String]>::to_vec),
                );
            }
        }
    }
    out
}

/// Phrase counts across a corpus of texts
///
/// Keyed by phrase tokens so iteration order is deterministic.
#[derive(Debug, Default)]
pub struct TermCounts {
    counts: BTreeMap<Vec<String>, usize>,
}

impl TermCounts {
    /// Count candidates across texts
    #[must_use]
    pub fn from_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts: BTreeMap<Vec<String>, usize> = BTreeMap::new();
        for text in texts {
            for phrase in candidates(text) {
                *counts.entry(phrase).or_default() += 1;
            }
        }
        Self { counts }
    }

    /// Phrases with at least `min` occurrences, most frequent first
    #[must_use]
    pub fn frequent(&self, min: usize) -> Vec<(Vec<String>, usize)> {
        let mut out: Vec<(Vec<String>, usize)> = self
            .counts
            .iter()
            .filter(|(_, &n)| n >= min)
            .map(|(p, &n)| (p.clone(), n))
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    /// Occurrences of a phrase
    #[must_use]
    pub fn count(&self, phrase: &[String]) -> usize {
        self.counts.get(phrase).copied().unwrap_or(0)
    }
}

/// Slug for ids (`priority queue` → `priority-queue`)
#[must_use]
pub fn slug(phrase: &[String]) -> String {
    phrase.join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        tokenize(s)
    }

    #[test]
    fn tokenize_lowercases() {
        assert_eq!(words("A Priority-Queue, x1!"), vec!["a", "priority-queue", "x1"]);
    }

    #[test]
    fn classify_by_head() {
        assert_eq!(classify(&words("priority queue")), Some(ConceptType::DataStructure));
        assert_eq!(classify(&words("learning rate")), Some(ConceptType::Parameter));
        assert_eq!(classify(&words("gradient descent")), Some(ConceptType::Method));
        assert_eq!(classify(&words("road networks")), None);
    }

    #[test]
    fn stopwords_break_phrases() {
        let counts = TermCounts::from_texts(["the queue of a priority queue"]);
        assert_eq!(counts.count(&words("priority queue")), 1);
        // "queue of a" is split at "of"
        assert_eq!(counts.frequent(1).len(), 1);
    }

    #[test]
    fn frequent_orders_by_count_then_phrase() {
        let counts = TermCounts::from_texts([
            "adjacency list and priority queue",
            "priority queue again",
            "adjacency list, binary heap",
        ]);
        let top: Vec<String> = counts.frequent(2).into_iter().map(|(p, _)| p.join(" ")).collect();
        assert_eq!(top, vec!["adjacency list", "priority queue"]);
    }

    #[test]
    fn contains_phrase_needs_contiguous_tokens() {
        let tokens = words("push neighbor onto priority queue");
        assert!(contains_phrase(&tokens, &words("priority queue")));
        assert!(!contains_phrase(&tokens, &words("neighbor queue")));
        assert!(!contains_phrase(&tokens, &[]));
    }
}
