use schemars::JsonSchema;
use schemars::transform::RecursiveTransform;
use serde::Serialize;

use super::scores::valid_scores;
use super::{
    AnalysisOptions, KeywordCount, NO_DATA, Outcome, SentimentBreakdown, VersionShare,
    common_topics, mean, median_sorted, rating_sentiment, sentiment_breakdown,
    version_distribution,
};
use crate::analysis::{Analysis, AnalysisInput, AnalysisReport};
use crate::schema::strip_non_standard_format;
use crate::types::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct RatingStats {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; absent with fewer than two scores
    pub std_dev: Option<f64>,
    /// Most frequent score, lowest wins a tie
    pub mode: u8,
    pub analyzed: usize,
}

/// One-page overview combining the headline numbers of several analyses.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct SummaryReport {
    pub total_reviews: usize,
    pub ratings: Option<RatingStats>,
    pub rating_sentiment: Option<SentimentBreakdown>,
    pub content_sentiment: Option<SentimentBreakdown>,
    pub top_version: Option<VersionShare>,
    pub top_keyword: Option<KeywordCount>,
}

fn rating_stats(scores: &[u8]) -> Option<RatingStats> {
    let mut values: Vec<f64> = scores.iter().map(|&s| f64::from(s)).collect();
    values.sort_by(f64::total_cmp);
    let mean = mean(&values)?;
    let median = median_sorted(&values)?;

    let std_dev = (values.len() >= 2).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (values.len() - 1) as f64).sqrt()
    });

    let mut counts = [0usize; 6];
    for &s in scores {
        counts[s as usize] += 1;
    }
    // max_by_key keeps the last maximum, so walk from 5 down to make the lowest score win
    let mode = (1..=5u8).rev().max_by_key(|&s| counts[s as usize])?;

    Some(RatingStats {
        mean,
        median,
        std_dev,
        mode,
        analyzed: scores.len(),
    })
}

pub fn summary_report(dataset: &Dataset, options: &AnalysisOptions) -> Outcome<SummaryReport> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    Outcome::Ready(SummaryReport {
        total_reviews: dataset.len(),
        ratings: rating_stats(&valid_scores(dataset)),
        rating_sentiment: rating_sentiment(dataset).into_ready(),
        content_sentiment: sentiment_breakdown(dataset).into_ready(),
        top_version: version_distribution(dataset, options)
            .into_ready()
            .and_then(|v| v.versions.into_iter().next()),
        top_keyword: common_topics(dataset, options)
            .into_ready()
            .and_then(|k| k.keywords.into_iter().next()),
    })
}

pub struct SummaryReportAnalysis;

impl Analysis for SummaryReportAnalysis {
    fn name(&self) -> &'static str {
        "summary_report"
    }

    fn description(&self) -> &'static str {
        "Headline statistics across ratings, sentiment, versions and keywords"
    }

    fn run(&self, dataset: &Dataset, _: &AnalysisInput, options: &AnalysisOptions) -> AnalysisReport {
        AnalysisReport::Summary(summary_report(dataset, options))
    }
}
