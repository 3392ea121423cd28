//! Maps free-text questions onto analysis names.

/// `(trigger, analysis)` pairs checked in order; the first trigger found in the
/// lowercased question wins. Narrow triggers sit above the broad ones they overlap.
pub const ROUTES: &[(&str, &str)] = &[
    ("keyword", "keyword_sentiment_analysis"),
    ("summary", "summary_report"),
    ("rating sentiment", "rating_sentiment"),
    ("length by rating", "length_by_rating"),
    ("issue", "issue_mentions"),
    ("problem", "issue_mentions"),
    ("feature", "feature_mentions"),
    ("engagement", "user_engagement_score"),
    ("sentiment", "sentiment_analysis"),
    ("reviewer", "top_reviewers"),
    ("user", "top_reviewers"),
    ("thumbs", "thumbs_up_analysis"),
    ("length", "content_length_analysis"),
    ("topic", "common_topics"),
    ("rating", "rating_by_version"),
    ("trend", "review_trends"),
    ("complete", "review_completeness"),
    ("score", "review_score_distribution"),
    ("version", "version_analysis"),
];

const FILLER_WORDS: &[&str] = &["what", "about", "show", "tell", "give"];

/// Analysis for a question, or `None` if no trigger matches.
pub fn route(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    ROUTES
        .iter()
        .find(|(trigger, _)| lowered.contains(trigger))
        .map(|&(_, analysis)| analysis)
}

/// First word longer than three characters that is neither filler nor a trigger.
///
/// Surrounding punctuation is stripped, so `'download'?` yields `download`.
pub fn extract_keyword(text: &str) -> Option<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .find(|w| {
            w.chars().count() > 3
                && !FILLER_WORDS.contains(&w.as_str())
                && !ROUTES.iter().any(|(trigger, _)| w == trigger)
        })
}
