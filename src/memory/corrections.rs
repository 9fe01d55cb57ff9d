//! Learned corrections and learned contexts
//!
//! Corrections are user-taught Q→A pairs that override the knowledge base.
//! Contexts are definitions harvested from "X adalah Y" style statements.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::matcher::fuzzy::{best_fuzzy, normalize};

/// Phrases that mark an input as a correction, longest first
const TRIGGER_PHRASES: &[&str] = &[
    "the correct answer is",
    "jawaban yang benar",
    "yang benar",
    "seharusnya",
    "should be",
];

/// Maximum subject length kept for learned contexts
const MAX_SUBJECT_CHARS: usize = 30;

/// A parsed `"<question> <trigger>: <answer>"` input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    /// Normalized question with the trigger phrase removed
    pub question: String,
    pub answer: String,
}

/// Parse a correction; malformed inputs are ordinary chat and yield `None`
pub fn parse_correction(input: &str) -> Option<Correction> {
    let lower = input.to_lowercase();
    if !TRIGGER_PHRASES.iter().any(|t| lower.contains(t)) {
        return None;
    }

    let (question, answer) = input.split_once(':')?;
    let answer = answer.trim();
    if answer.is_empty() {
        return None;
    }

    let mut question = normalize(question);
    for trigger in TRIGGER_PHRASES {
        question = question.replace(trigger, " ");
    }
    let question = question
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c.is_ascii_punctuation())
        .trim()
        .to_string();

    if question.is_empty() {
        return None;
    }

    Some(Correction {
        question,
        answer: answer.to_string(),
    })
}

/// Hit from the corrections table
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionHit<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub score: f64,
}

/// Normalized question → answer; last write wins
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearnedCorrections(BTreeMap<String, String>);

impl LearnedCorrections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a correction, returning the answer it replaced
    pub fn learn(&mut self, correction: Correction) -> Option<String> {
        self.0.insert(correction.question, correction.answer)
    }

    /// Best fuzzy hit for an input, same rules as the knowledge base
    pub fn lookup(&self, input: &str, threshold: f64) -> Option<CorrectionHit<'_>> {
        let normalized = normalize(input);
        let candidates = self.0.iter().map(|(q, a)| (q.as_str(), a.as_str()));
        best_fuzzy(&normalized, candidates, threshold).map(|(answer, question, score)| CorrectionHit {
            question,
            answer,
            score,
        })
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.0.get(&normalize(question)).map(String::as_str)
    }

    /// Remove a correction by question
    pub fn forget(&mut self, question: &str) -> Option<String> {
        self.0.remove(&normalize(question))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(q, a)| (q.as_str(), a.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

static DEFINITION_SPLIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:adalah|itu|yaitu)\b").expect("definition pattern compiles")
});

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:nama (?:saya|aku|ku)|saya adalah|aku adalah)\s+(\w+)")
        .expect("name pattern compiles")
});

/// Words that follow "nama saya" in questions rather than introductions
const NOT_A_NAME: &[&str] = &["siapa", "apa", "adalah", "itu"];

/// Extract the user's name from an introduction ("nama saya Budi")
pub fn extract_name(text: &str) -> Option<String> {
    let captures = NAME_PATTERN.captures(text)?;
    let name = captures.get(1)?.as_str();
    if NOT_A_NAME.contains(&name.to_lowercase().as_str()) {
        return None;
    }
    Some(name.to_string())
}

/// Extract `(subject, definition)` from "X adalah Y" / "X itu Y" / "X yaitu Y"
pub fn extract_definition(text: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = DEFINITION_SPLIT.split(text).collect();
    if parts.len() != 2 {
        return None;
    }

    let subject: String = parts[0].trim().chars().take(MAX_SUBJECT_CHARS).collect();
    let definition = parts[1].trim();
    if subject.is_empty() || definition.is_empty() {
        return None;
    }

    Some((subject.to_lowercase(), definition.to_string()))
}

/// Subject → distinct definitions, in the order they were learned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearnedContexts(BTreeMap<String, Vec<String>>);

impl LearnedContexts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition; returns false if it was already known
    pub fn learn(&mut self, subject: String, definition: String) -> bool {
        let definitions = self.0.entry(subject).or_default();
        if definitions.contains(&definition) {
            return false;
        }
        definitions.push(definition);
        true
    }

    pub fn definitions(&self, subject: &str) -> &[String] {
        self.0.get(&subject.to_lowercase()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(s, d)| (s.as_str(), d.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::DEFAULT_THRESHOLD;

    #[test]
    fn test_parse_indonesian_correction() {
        let correction = parse_correction("ibukota indonesia seharusnya: Jakarta").unwrap();
        assert_eq!(correction.question, "ibukota indonesia");
        assert_eq!(correction.answer, "Jakarta");
    }

    #[test]
    fn test_parse_english_correction() {
        let correction = parse_correction("Capital of France? The correct answer is: Paris").unwrap();
        assert_eq!(correction.question, "capital of france");
        assert_eq!(correction.answer, "Paris");
    }

    #[test]
    fn test_answer_keeps_later_colons() {
        let correction = parse_correction("jam buka toko yang benar: 08:00 - 17:00").unwrap();
        assert_eq!(correction.question, "jam buka toko");
        assert_eq!(correction.answer, "08:00 - 17:00");
    }

    #[test]
    fn test_malformed_corrections_are_chat() {
        assert!(parse_correction("ibukota indonesia seharusnya Jakarta").is_none());
        assert!(parse_correction("ibukota indonesia seharusnya:   ").is_none());
        assert!(parse_correction("seharusnya: Jakarta").is_none());
        assert!(parse_correction("catatan: beli susu").is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let mut corrections = LearnedCorrections::new();
        corrections.learn(parse_correction("ibukota seharusnya: Bandung").unwrap());
        let previous = corrections.learn(parse_correction("ibukota seharusnya: Jakarta").unwrap());
        assert_eq!(previous.as_deref(), Some("Bandung"));
        assert_eq!(corrections.get("ibukota"), Some("Jakarta"));
        assert_eq!(corrections.len(), 1);
    }

    #[test]
    fn test_lookup_fuzzy() {
        let mut corrections = LearnedCorrections::new();
        corrections.learn(parse_correction("ibukota indonesia seharusnya: Jakarta").unwrap());

        let hit = corrections.lookup("Ibukota Indonesia", DEFAULT_THRESHOLD).unwrap();
        assert_eq!(hit.answer, "Jakarta");
        assert_eq!(hit.score, 1.0);

        assert!(corrections.lookup("ibukota indonesa", DEFAULT_THRESHOLD).is_some());
        assert!(corrections.lookup("resep nasi goreng", DEFAULT_THRESHOLD).is_none());
    }

    #[test]
    fn test_forget() {
        let mut corrections = LearnedCorrections::new();
        corrections.learn(parse_correction("ibukota seharusnya: Jakarta").unwrap());
        assert_eq!(corrections.forget("IBUKOTA").as_deref(), Some("Jakarta"));
        assert!(corrections.is_empty());
    }

    #[test]
    fn test_serialized_as_plain_object() {
        let mut corrections = LearnedCorrections::new();
        corrections.learn(parse_correction("ibukota seharusnya: Jakarta").unwrap());
        let json = serde_json::to_value(&corrections).unwrap();
        assert_eq!(json, serde_json::json!({"ibukota": "Jakarta"}));
    }

    #[test]
    fn test_extract_name() {
        assert_eq!(extract_name("Halo, nama saya Budi").as_deref(), Some("Budi"));
        assert_eq!(extract_name("aku adalah Sari dari Bandung").as_deref(), Some("Sari"));
        assert!(extract_name("nama saya siapa?").is_none());
        assert!(extract_name("cuaca hari ini").is_none());
    }

    #[test]
    fn test_extract_definition() {
        let (subject, definition) = extract_definition("Rendang adalah masakan Padang").unwrap();
        assert_eq!(subject, "rendang");
        assert_eq!(definition, "masakan Padang");

        assert!(extract_definition("situasi aman").is_none());
        assert!(extract_definition("itu adalah itu").is_none());
    }

    #[test]
    fn test_contexts_deduplicate() {
        let mut contexts = LearnedContexts::new();
        assert!(contexts.learn("rendang".into(), "masakan Padang".into()));
        assert!(!contexts.learn("rendang".into(), "masakan Padang".into()));
        assert!(contexts.learn("rendang".into(), "enak".into()));
        assert_eq!(contexts.definitions("Rendang").len(), 2);
    }
}
