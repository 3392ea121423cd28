use rayon::prelude::*;
use schemars::JsonSchema;
use schemars::transform::RecursiveTransform;
use serde::Serialize;

use super::{AnalysisOptions, NO_DATA, Outcome, mean, median_sorted};
use crate::analysis::{Analysis, AnalysisInput, AnalysisReport};
use crate::coerce;
use crate::schema::strip_non_standard_format;
use crate::types::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct ContentLength {
    pub mean_chars: f64,
    pub median_chars: f64,
    pub mean_words: f64,
    pub longest: usize,
    pub shortest: usize,
    /// Rows whose content is missing or blank
    pub empty: usize,
    /// Rows with non-blank content
    pub analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct RatingLength {
    pub score: u8,
    pub mean_chars: f64,
    pub longest: usize,
    pub reviews: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct LengthByRating {
    pub ratings: Vec<RatingLength>,
}

/// Character length and word count of non-empty review text.
fn measure(content: Option<&str>) -> Option<(usize, usize)> {
    if !coerce::present(content) {
        return None;
    }
    let text = content.unwrap_or_default();
    Some((text.chars().count(), text.split_whitespace().count()))
}

pub fn content_length(dataset: &Dataset) -> Outcome<ContentLength> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    let measured: Vec<(usize, usize)> = dataset
        .reviews
        .par_iter()
        .filter_map(|r| measure(r.content.as_deref()))
        .collect();

    let empty = dataset.len() - measured.len();
    if measured.is_empty() {
        return Outcome::no_data(format!("All {empty} reviews are empty"));
    }

    let mut chars: Vec<f64> = measured.iter().map(|&(c, _)| c as f64).collect();
    chars.sort_by(f64::total_cmp);
    let words: Vec<f64> = measured.iter().map(|&(_, w)| w as f64).collect();

    Outcome::Ready(ContentLength {
        mean_chars: mean(&chars).unwrap_or_default(),
        median_chars: median_sorted(&chars).unwrap_or_default(),
        mean_words: mean(&words).unwrap_or_default(),
        longest: measured.iter().map(|&(c, _)| c).max().unwrap_or_default(),
        shortest: measured.iter().map(|&(c, _)| c).min().unwrap_or_default(),
        empty,
        analyzed: measured.len(),
    })
}

/// Review length per star rating, for rows with both a valid score and non-empty text.
pub fn length_by_rating(dataset: &Dataset) -> Outcome<LengthByRating> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    // score -> (char sum, longest, reviews)
    let mut buckets = [(0usize, 0usize, 0usize); 6];
    for review in &dataset.reviews {
        let Some(score) = coerce::score(review.score.as_deref()) else {
            continue;
        };
        let Some((chars, _)) = measure(review.content.as_deref()) else {
            continue;
        };
        let bucket = &mut buckets[score as usize];
        bucket.0 += chars;
        bucket.1 = bucket.1.max(chars);
        bucket.2 += 1;
    }

    let ratings: Vec<RatingLength> = (1..=5u8)
        .filter_map(|score| {
            let (sum, longest, reviews) = buckets[score as usize];
            (reviews > 0).then(|| RatingLength {
                score,
                mean_chars: sum as f64 / reviews as f64,
                longest,
                reviews,
            })
        })
        .collect();

    if ratings.is_empty() {
        return Outcome::no_data("No reviews with both a valid score and text");
    }

    Outcome::Ready(LengthByRating { ratings })
}

pub struct ContentLengthAnalysis;

impl Analysis for ContentLengthAnalysis {
    fn name(&self) -> &'static str {
        "content_length_analysis"
    }

    fn description(&self) -> &'static str {
        "Review length in characters and words"
    }

    fn run(&self, dataset: &Dataset, _: &AnalysisInput, _: &AnalysisOptions) -> AnalysisReport {
        AnalysisReport::ContentLength(content_length(dataset))
    }
}

pub struct LengthByRatingAnalysis;

impl Analysis for LengthByRatingAnalysis {
    fn name(&self) -> &'static str {
        "length_by_rating"
    }

    fn description(&self) -> &'static str {
        "Average review length for each star rating"
    }

    fn run(&self, dataset: &Dataset, _: &AnalysisInput, _: &AnalysisOptions) -> AnalysisReport {
        AnalysisReport::LengthByRating(length_by_rating(dataset))
    }
}
