use schemars::JsonSchema;
use schemars::transform::RecursiveTransform;
use serde::Serialize;

use super::{AnalysisOptions, NO_DATA, Outcome, percent};
use crate::analysis::{Analysis, AnalysisInput, AnalysisReport};
use crate::coerce;
use crate::schema::strip_non_standard_format;
use crate::types::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct ThumbsUpStats {
    pub total: u64,
    pub mean: f64,
    pub max: u64,
    pub with_thumbs_up: usize,
    /// Share of analyzed rows with at least one thumbs up
    pub with_thumbs_up_pct: f64,
    /// Rows with a valid thumbs-up count
    pub analyzed: usize,
}

/// Thumbs-up engagement over rows whose count parses; other rows are ignored entirely.
pub fn thumbs_up(dataset: &Dataset) -> Outcome<ThumbsUpStats> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    let counts: Vec<u64> = dataset
        .reviews
        .iter()
        .filter_map(|r| coerce::count(r.thumbs_up_count.as_deref()))
        .collect();

    let Some(&max) = counts.iter().max() else {
        return Outcome::no_data("No thumbs up data available");
    };

    // Counts go up to i64::MAX, so the total saturates and the mean is taken in f64
    let total = counts.iter().fold(0u64, |acc, &c| acc.saturating_add(c));
    let mean = counts.iter().map(|&c| c as f64).sum::<f64>() / counts.len() as f64;
    let with_thumbs_up = counts.iter().filter(|&&c| c > 0).count();

    Outcome::Ready(ThumbsUpStats {
        total,
        mean,
        max,
        with_thumbs_up,
        with_thumbs_up_pct: percent(with_thumbs_up, counts.len()),
        analyzed: counts.len(),
    })
}

pub struct ThumbsUpAnalysis;

impl Analysis for ThumbsUpAnalysis {
    fn name(&self) -> &'static str {
        "thumbs_up_analysis"
    }

    fn description(&self) -> &'static str {
        "Engagement through thumbs-up counts"
    }

    fn run(&self, dataset: &Dataset, _: &AnalysisInput, _: &AnalysisOptions) -> AnalysisReport {
        AnalysisReport::ThumbsUp(thumbs_up(dataset))
    }
}
