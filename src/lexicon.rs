//! Fixed word lists used by the text analyses.

use phf::phf_set;
use serde::Serialize;

pub static POSITIVE_WORDS: phf::Set<&'static str> = phf_set! {
    "love", "great", "excellent", "amazing", "perfect",
    "good", "best", "awesome", "wonderful", "fantastic",
};

pub static NEGATIVE_WORDS: phf::Set<&'static str> = phf_set! {
    "hate", "bad", "terrible", "awful", "worst",
    "poor", "horrible", "useless", "broken", "garbage",
};

pub static STOPWORDS: phf::Set<&'static str> = phf_set! {
    "the", "a", "an", "and", "or", "but", "is", "it", "to", "of", "in", "for", "on",
    "with", "i", "you", "he", "she", "this", "that", "be", "have", "has", "are",
    "was", "were", "very", "so", "as", "from", "by", "at", "my", "me", "if", "can",
    "get", "got", "really", "just", "more", "one", "two", "like", "love", "good",
    "bad",
};

/// Problem phrases counted by the issue-mention analysis, in report order.
pub const ISSUE_TERMS: &[&str] = &[
    "crash",
    "freezing",
    "error",
    "bug",
    "slow",
    "loading",
    "cast",
    "chromecast",
    "payment",
    "login",
    "sign in",
    "buffering",
    "ads",
    "expensive",
    "cancel",
    "removed",
];

/// Feature groups and the phrases that count as a mention of each.
pub const FEATURE_GROUPS: &[(&str, &[&str])] = &[
    ("casting", &["cast", "chromecast"]),
    ("ads", &["ads", "advertisement", "commercial"]),
    ("games", &["games", "gaming"]),
    ("password sharing", &["password", "sharing", "household"]),
    ("ui/ux", &["interface", "design", "layout", "menu"]),
    ("content", &["movie", "series", "show", "content"]),
    ("performance", &["crash", "freeze", "lag", "slow", "loading"]),
    ("pricing", &["price", "expensive", "cost", "subscription"]),
    ("downloads", &["download", "offline"]),
    ("subtitles", &["subtitle", "language", "translation"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Classify review text by lexicon hits.
///
/// Matching is a substring test on the lowercased text. Only one-sided hits
/// count; text with both or neither kind of word is neutral.
pub fn classify(content: &str) -> Sentiment {
    if content.trim().is_empty() {
        return Sentiment::Neutral;
    }
    let lowered = content.to_lowercase();
    let positive = POSITIVE_WORDS.iter().any(|w| lowered.contains(w));
    let negative = NEGATIVE_WORDS.iter().any(|w| lowered.contains(w));

    match (positive, negative) {
        (true, false) => Sentiment::Positive,
        (false, true) => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

/// Maximal runs of `a`-`z` in already-lowercased text.
pub fn tokens(lowered: &str) -> impl Iterator<Item = &str> {
    lowered
        .split(|c: char| !c.is_ascii_lowercase())
        .filter(|t| !t.is_empty())
}
