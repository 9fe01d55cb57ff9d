//! Sentiment rules and mood aggregation
//!
//! Rule groups are tested in priority order and the first hit wins:
//! question markers, then negative affect, then positive affect.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment of a single utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
    Question,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Question => "question",
        }
    }

    /// One-letter tag used in mood trends
    pub fn initial(&self) -> char {
        match self {
            Sentiment::Positive => 'P',
            Sentiment::Negative => 'N',
            Sentiment::Neutral => 'N',
            Sentiment::Question => 'Q',
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static QUESTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\?|apa|siapa|berapa|bagaimana|kenapa|mana|kapan|gimana")
        .expect("question pattern compiles")
});

static NEGATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"sedih|marah|kesal|benci|jelek|bodoh|buruk|frustrasi|capek|lelah|kecewa|sakit|mati|gagal|error|takut|khawatir|cemas",
    )
    .expect("negative pattern compiles")
});

static POSITIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"bagus|hebat|keren|suka|cinta|senang|bahagia|luar biasa|mantap|awesome|amazing|love|happy|gembira|sukses|berhasil|menang",
    )
    .expect("positive pattern compiles")
});

/// Classify free text; first matching group wins, default neutral
pub fn classify(text: &str) -> Sentiment {
    let lower = text.to_lowercase();

    if QUESTION.is_match(&lower) {
        Sentiment::Question
    } else if NEGATIVE.is_match(&lower) {
        Sentiment::Negative
    } else if POSITIVE.is_match(&lower) {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    }
}

/// Majority mood over a window of sentiments
///
/// Questions are not counted. Positive or negative must strictly beat both
/// other classes; every tie resolves to neutral.
pub fn majority_mood<I>(sentiments: I) -> Sentiment
where
    I: IntoIterator<Item = Sentiment>,
{
    let (mut positive, mut negative, mut neutral) = (0usize, 0usize, 0usize);
    for sentiment in sentiments {
        match sentiment {
            Sentiment::Positive => positive += 1,
            Sentiment::Negative => negative += 1,
            Sentiment::Neutral => neutral += 1,
            Sentiment::Question => {}
        }
    }

    if positive > negative && positive > neutral {
        Sentiment::Positive
    } else if negative > positive && negative > neutral {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_outranks_affect() {
        assert_eq!(classify("Kenapa kamu sedih?"), Sentiment::Question);
        assert_eq!(classify("Why are you sad?"), Sentiment::Question);
    }

    #[test]
    fn test_negative() {
        assert_eq!(classify("Aku lagi sedih banget"), Sentiment::Negative);
        assert_eq!(classify("build GAGAL lagi"), Sentiment::Negative);
    }

    #[test]
    fn test_negative_outranks_positive() {
        assert_eq!(classify("senang tapi capek"), Sentiment::Negative);
    }

    #[test]
    fn test_positive() {
        assert_eq!(classify("Mantap, tim kita menang!"), Sentiment::Positive);
        assert_eq!(classify("I love it"), Sentiment::Positive);
    }

    #[test]
    fn test_neutral_default() {
        assert_eq!(classify("ok"), Sentiment::Neutral);
        assert_eq!(classify(""), Sentiment::Neutral);
    }

    #[test]
    fn test_majority_mood() {
        use Sentiment::*;
        assert_eq!(majority_mood(vec![Positive, Positive, Negative]), Positive);
        assert_eq!(majority_mood(vec![Negative, Negative, Neutral]), Negative);
        assert_eq!(majority_mood(vec![Positive, Negative]), Neutral);
        assert_eq!(majority_mood(vec![Positive, Neutral]), Neutral);
        assert_eq!(majority_mood(vec![Question, Question, Positive]), Positive);
        assert_eq!(majority_mood(Vec::new()), Neutral);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Sentiment::Question).unwrap(), "\"question\"");
        let parsed: Sentiment = serde_json::from_str("\"negative\"").unwrap();
        assert_eq!(parsed, Sentiment::Negative);
    }
}
