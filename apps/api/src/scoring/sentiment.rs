//! Sentiment Scorer — turns transcript tone into a score bonus or penalty.
//!
//! Polarity is lexicon-based: every lexicon word found in the transcript contributes
//! its polarity, scaled by a preceding intensifier and flipped (at half strength) by
//! a nearby negator. The transcript's polarity is the mean contribution, in [-1, 1].
//!
//! Thresholds and magnitudes are fixed business rules:
//! polarity > 0.3 → +10, polarity < -0.1 → -5, otherwise 0.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static LEXICON: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    let raw = include_str!("../../lexicon/sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, f64>>(raw).expect("valid sentiment lexicon")
});

pub const LABEL_NO_AUDIO: &str = "No audio detected.";
pub const LABEL_POSITIVE: &str = "Confident & Positive Tone (+10%)";
pub const LABEL_NEGATIVE: &str = "Nervous or Negative Tone (-5%)";
pub const LABEL_NEUTRAL: &str = "Neutral Tone";

const POSITIVE_THRESHOLD: f64 = 0.3;
const NEGATIVE_THRESHOLD: f64 = -0.1;
const POSITIVE_BONUS: i32 = 10;
const NEGATIVE_PENALTY: i32 = -5;

/// How many tokens back a negator still applies.
const NEGATION_WINDOW: usize = 3;
/// Negated words keep half their magnitude with the sign flipped.
const NEGATION_FACTOR: f64 = -0.5;

const NEGATORS: &[&str] = &[
    "not", "no", "never", "cannot", "cant", "dont", "didnt", "doesnt", "isnt", "wasnt",
    "werent", "arent", "wont", "wouldnt", "couldnt", "shouldnt", "hardly", "without",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("incredibly", 1.5),
    ("truly", 1.2),
    ("so", 1.2),
    ("quite", 1.1),
    ("somewhat", 0.7),
    ("slightly", 0.5),
];

/// Tone verdict for one transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentVerdict {
    pub polarity: f64,
    pub adjustment: i32,
    pub label: String,
}

/// Scores a normalized transcript. Blank transcripts mean "no audio", not neutral.
pub fn score_sentiment(transcript: &str) -> SentimentVerdict {
    if transcript.trim().is_empty() {
        return SentimentVerdict {
            polarity: 0.0,
            adjustment: 0,
            label: LABEL_NO_AUDIO.to_string(),
        };
    }

    let polarity = polarity(transcript);
    let (adjustment, label) = adjustment_for_polarity(polarity);
    SentimentVerdict {
        polarity,
        adjustment,
        label: label.to_string(),
    }
}

/// Maps a polarity value onto the fixed bonus/penalty rules.
pub fn adjustment_for_polarity(polarity: f64) -> (i32, &'static str) {
    if polarity > POSITIVE_THRESHOLD {
        (POSITIVE_BONUS, LABEL_POSITIVE)
    } else if polarity < NEGATIVE_THRESHOLD {
        (NEGATIVE_PENALTY, LABEL_NEGATIVE)
    } else {
        (0, LABEL_NEUTRAL)
    }
}

/// Mean lexicon polarity of `text`, clamped to [-1, 1]. 0.0 when no word is in the lexicon.
pub fn polarity(text: &str) -> f64 {
    let tokens: Vec<String> = tokenize(text).collect();
    let mut total = 0.0_f64;
    let mut assessed = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        let Some(&base) = LEXICON.get(token.as_str()) else {
            continue;
        };

        let mut value = base;
        if let Some(factor) = i.checked_sub(1).and_then(|prev| intensifier(&tokens[prev])) {
            value *= factor;
        }
        let negated = (1..=NEGATION_WINDOW).any(|k| i >= k && is_negator(&tokens[i - k]));
        if negated {
            value *= NEGATION_FACTOR;
        }

        total += value.clamp(-1.0, 1.0);
        assessed += 1;
    }

    if assessed == 0 {
        0.0
    } else {
        (total / assessed as f64).clamp(-1.0, 1.0)
    }
}

/// Lowercase word tokens; apostrophes are dropped so "don't" reads as "dont".
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.replace('\'', "").to_lowercase())
        .filter(|t| !t.is_empty())
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token)
}

fn intensifier(token: &str) -> Option<f64> {
    INTENSIFIERS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, factor)| *factor)
}
