//! Read-only aggregations over the loaded review dataset.
//!
//! Every function here takes `&Dataset` and returns an [`Outcome`]; none of them
//! mutate shared state, so they can run concurrently against one `Arc<Dataset>`.

pub mod completeness;
pub mod content;
pub mod engagement;
pub mod keywords;
pub mod reviewers;
pub mod scores;
pub mod sentiment;
pub mod summary;
pub mod trends;
pub mod versions;

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

pub use completeness::{Completeness, CompletenessAnalysis, completeness};
pub use content::{
    ContentLength, ContentLengthAnalysis, LengthByRating, LengthByRatingAnalysis, content_length,
    length_by_rating,
};
pub use engagement::{ThumbsUpAnalysis, ThumbsUpStats, thumbs_up};
pub use keywords::{
    CommonTopicsAnalysis, FeatureMentionsAnalysis, IssueMentionsAnalysis, KeywordCount,
    KeywordFrequency, MentionCounts, common_topics, feature_mentions, issue_mentions,
};
pub use reviewers::{
    TopReviewers, TopReviewersAnalysis, UserEngagement, UserEngagementAnalysis, top_reviewers,
    user_engagement,
};
pub use scores::{
    RatingSentimentAnalysis, ScoreDistribution, ScoreDistributionAnalysis,
    rating_sentiment, score_distribution,
};
pub use sentiment::{
    KeywordSentiment, KeywordSentimentAnalysis, SentimentAnalysis,
    SentimentBreakdown, keyword_sentiment, sentiment_breakdown,
};
pub use summary::{SummaryReport, SummaryReportAnalysis, summary_report};
pub use trends::{ReviewTrends, ReviewTrendsAnalysis, TrendPeriod, review_trends};
pub use versions::{
    RatingByVersion, RatingByVersionAnalysis, VersionAnalysis, VersionDistribution, VersionShare,
    rating_by_version, version_distribution,
};

pub const NO_DATA: &str = "No data available";

/// Result of an aggregation: either a value or an explanation of why there is none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    Ready(T),
    NoData(String),
}

impl<T> Outcome<T> {
    pub fn no_data(message: impl Into<String>) -> Self {
        Outcome::NoData(message.into())
    }

    pub fn into_ready(self) -> Option<T> {
        match self {
            Outcome::Ready(value) => Some(value),
            Outcome::NoData(_) => None,
        }
    }

    pub fn no_data_message(&self) -> Option<&str> {
        match self {
            Outcome::Ready(_) => None,
            Outcome::NoData(message) => Some(message),
        }
    }
}

/// Tunables shared by the analyses, normally taken from the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub top_k: usize,
    pub default_keyword: String,
    pub trend_period: TrendPeriod,
    pub trend_periods: usize,
    pub sample_reviews: usize,
    pub sample_chars: usize,
    pub extra_stopwords: Vec<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_k: 10,
            default_keyword: "netflix".to_string(),
            trend_period: TrendPeriod::Day,
            trend_periods: 10,
            sample_reviews: 3,
            sample_chars: 100,
            extra_stopwords: vec!["netflix".to_string()],
        }
    }
}

impl AnalysisOptions {
    /// `limit` if it is a usable positive number, otherwise `top_k`.
    pub fn limit_or_default(&self, limit: Option<usize>) -> usize {
        match limit {
            Some(n) if n > 0 => n,
            _ => self.top_k.max(1),
        }
    }
}

/// `count / total * 100`, or 0 when there is nothing to divide by.
pub fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Median of an already-sorted slice; even lengths average the middle pair.
pub(crate) fn median_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

/// Cut `text` to at most `max_chars` characters without splitting a code point.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Counter that remembers first-seen order so ranked ties stay deterministic.
pub(crate) struct Tally<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Hash + Eq + Clone> Tally<K> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries by count descending; equal counts keep first-seen order.
    pub(crate) fn ranked(mut self) -> Vec<(K, usize)> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries
    }
}

#[cfg(test)]
pub mod tests;
