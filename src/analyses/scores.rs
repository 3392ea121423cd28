use schemars::JsonSchema;
use schemars::transform::RecursiveTransform;
use serde::Serialize;

use super::{
    AnalysisOptions, NO_DATA, Outcome, SentimentBreakdown, mean, median_sorted, percent,
};
use crate::analysis::{Analysis, AnalysisInput, AnalysisReport};
use crate::coerce;
use crate::schema::strip_non_standard_format;
use crate::types::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct ScoreBucket {
    pub score: u8,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct ScoreDistribution {
    /// One bucket per score value observed, ascending
    pub buckets: Vec<ScoreBucket>,
    pub mean: f64,
    pub median: f64,
    pub min: u8,
    pub max: u8,
    /// Rows with a valid 1-5 score
    pub analyzed: usize,
}

pub(crate) fn valid_scores(dataset: &Dataset) -> Vec<u8> {
    dataset
        .reviews
        .iter()
        .filter_map(|r| coerce::score(r.score.as_deref()))
        .collect()
}

pub fn score_distribution(dataset: &Dataset) -> Outcome<ScoreDistribution> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    let scores = valid_scores(dataset);
    if scores.is_empty() {
        return Outcome::no_data("No valid scores found");
    }

    let mut counts = [0usize; 6];
    for &s in &scores {
        counts[s as usize] += 1;
    }

    let buckets = (1..=5u8)
        .filter(|&s| counts[s as usize] > 0)
        .map(|s| ScoreBucket {
            score: s,
            count: counts[s as usize],
            percentage: percent(counts[s as usize], scores.len()),
        })
        .collect::<Vec<_>>();

    let mut as_f64: Vec<f64> = scores.iter().map(|&s| f64::from(s)).collect();
    as_f64.sort_by(f64::total_cmp);

    Outcome::Ready(ScoreDistribution {
        min: buckets.first().map(|b| b.score).unwrap_or_default(),
        max: buckets.last().map(|b| b.score).unwrap_or_default(),
        buckets,
        mean: mean(&as_f64).unwrap_or_default(),
        median: median_sorted(&as_f64).unwrap_or_default(),
        analyzed: scores.len(),
    })
}

/// Sentiment implied by the star rating alone: 4-5 positive, 3 neutral, 1-2 negative.
pub fn rating_sentiment(dataset: &Dataset) -> Outcome<SentimentBreakdown> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    let scores = valid_scores(dataset);
    if scores.is_empty() {
        return Outcome::no_data("No valid scores found");
    }

    let (mut positive, mut negative, mut neutral) = (0, 0, 0);
    for s in scores {
        match s {
            4..=5 => positive += 1,
            3 => neutral += 1,
            _ => negative += 1,
        }
    }

    Outcome::Ready(SentimentBreakdown::from_counts(positive, negative, neutral))
}

pub struct ScoreDistributionAnalysis;

impl Analysis for ScoreDistributionAnalysis {
    fn name(&self) -> &'static str {
        "review_score_distribution"
    }

    fn description(&self) -> &'static str {
        "Distribution of star ratings with mean and median"
    }

    fn run(&self, dataset: &Dataset, _: &AnalysisInput, _: &AnalysisOptions) -> AnalysisReport {
        AnalysisReport::ScoreDistribution(score_distribution(dataset))
    }
}

pub struct RatingSentimentAnalysis;

impl Analysis for RatingSentimentAnalysis {
    fn name(&self) -> &'static str {
        "rating_sentiment"
    }

    fn description(&self) -> &'static str {
        "Positive/neutral/negative split implied by star ratings"
    }

    fn run(&self, dataset: &Dataset, _: &AnalysisInput, _: &AnalysisOptions) -> AnalysisReport {
        AnalysisReport::RatingSentiment(rating_sentiment(dataset))
    }
}
