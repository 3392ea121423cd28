use rayon::prelude::*;
use schemars::JsonSchema;
use schemars::transform::RecursiveTransform;
use serde::Serialize;

use super::{AnalysisOptions, NO_DATA, Outcome, percent, truncate_chars};
use crate::analysis::{Analysis, AnalysisInput, AnalysisReport};
use crate::coerce;
use crate::lexicon::{self, Sentiment};
use crate::schema::strip_non_standard_format;
use crate::types::{Dataset, Review};

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub total: usize,
    pub positive_pct: f64,
    pub negative_pct: f64,
    pub neutral_pct: f64,
}

impl SentimentBreakdown {
    pub fn from_counts(positive: usize, negative: usize, neutral: usize) -> Self {
        let total = positive + negative + neutral;
        Self {
            positive,
            negative,
            neutral,
            total,
            positive_pct: percent(positive, total),
            negative_pct: percent(negative, total),
            neutral_pct: percent(neutral, total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct SampleReview {
    pub user_name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct KeywordSentiment {
    pub keyword: String,
    pub matches: usize,
    pub breakdown: SentimentBreakdown,
    pub samples: Vec<SampleReview>,
}

fn tally<'a, I>(reviews: I) -> SentimentBreakdown
where
    I: IntoParallelIterator<Item = &'a Review>,
{
    let [positive, negative, neutral] = reviews
        .into_par_iter()
        .map(|r| lexicon::classify(r.text()))
        .fold(
            || [0usize; 3],
            |mut acc, sentiment| {
                let slot = match sentiment {
                    Sentiment::Positive => 0,
                    Sentiment::Negative => 1,
                    Sentiment::Neutral => 2,
                };
                acc[slot] += 1;
                acc
            },
        )
        .reduce(|| [0usize; 3], |a, b| [a[0] + b[0], a[1] + b[1], a[2] + b[2]]);

    SentimentBreakdown::from_counts(positive, negative, neutral)
}

/// Lexicon sentiment across every review; rows without text count as neutral.
pub fn sentiment_breakdown(dataset: &Dataset) -> Outcome<SentimentBreakdown> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }
    Outcome::Ready(tally(&dataset.reviews))
}

/// Lexicon sentiment restricted to reviews containing `keyword` (case-insensitive).
///
/// A missing or blank keyword falls back to `options.default_keyword`.
pub fn keyword_sentiment(
    dataset: &Dataset,
    keyword: Option<&str>,
    options: &AnalysisOptions,
) -> Outcome<KeywordSentiment> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    let keyword = match keyword.map(str::trim) {
        Some(k) if !k.is_empty() => k,
        _ => options.default_keyword.trim(),
    };
    let needle = keyword.to_lowercase();

    let matching: Vec<&Review> = dataset
        .reviews
        .par_iter()
        .filter(|r| r.text().to_lowercase().contains(&needle))
        .collect();

    if matching.is_empty() {
        return Outcome::no_data(format!(
            "No reviews found containing keyword: '{keyword}'"
        ));
    }

    let samples = matching
        .iter()
        .take(options.sample_reviews)
        .map(|r| SampleReview {
            user_name: coerce::text_or_unknown(r.user_name.as_deref()).to_string(),
            content: truncate_chars(r.text(), options.sample_chars).to_string(),
        })
        .collect();

    Outcome::Ready(KeywordSentiment {
        keyword: keyword.to_string(),
        matches: matching.len(),
        breakdown: tally(matching.par_iter().copied()),
        samples,
    })
}

pub struct SentimentAnalysis;

impl Analysis for SentimentAnalysis {
    fn name(&self) -> &'static str {
        "sentiment_analysis"
    }

    fn description(&self) -> &'static str {
        "Positive/negative/neutral split of review text by keyword lexicon"
    }

    fn run(&self, dataset: &Dataset, _: &AnalysisInput, _: &AnalysisOptions) -> AnalysisReport {
        AnalysisReport::Sentiment(sentiment_breakdown(dataset))
    }
}

pub struct KeywordSentimentAnalysis;

impl Analysis for KeywordSentimentAnalysis {
    fn name(&self) -> &'static str {
        "keyword_sentiment_analysis"
    }

    fn description(&self) -> &'static str {
        "Sentiment of the reviews that mention a given keyword"
    }

    fn run(
        &self,
        dataset: &Dataset,
        input: &AnalysisInput,
        options: &AnalysisOptions,
    ) -> AnalysisReport {
        AnalysisReport::KeywordSentiment(keyword_sentiment(
            dataset,
            input.keyword.as_deref(),
            options,
        ))
    }
}
