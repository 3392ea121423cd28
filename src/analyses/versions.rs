use std::collections::HashMap;

use schemars::JsonSchema;
use schemars::transform::RecursiveTransform;
use serde::Serialize;

use super::{AnalysisOptions, NO_DATA, Outcome, Tally, percent};
use crate::analysis::{Analysis, AnalysisInput, AnalysisReport};
use crate::coerce;
use crate::schema::strip_non_standard_format;
use crate::types::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct VersionShare {
    pub version: String,
    pub reviews: usize,
    /// Share of all rows in the dataset
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct VersionDistribution {
    pub versions: Vec<VersionShare>,
    pub unique_versions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct VersionRating {
    pub version: String,
    pub mean_score: f64,
    /// Reviews for this version with a valid score
    pub reviews: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct RatingByVersion {
    pub versions: Vec<VersionRating>,
    /// Versions with at least one valid score
    pub total_versions: usize,
}

pub fn version_distribution(
    dataset: &Dataset,
    options: &AnalysisOptions,
) -> Outcome<VersionDistribution> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    let mut tally = Tally::new();
    for review in &dataset.reviews {
        tally.add(coerce::text_or_unknown(review.app_version.as_deref()));
    }

    let unique_versions = tally.len();
    let total = dataset.len();
    let versions = tally
        .ranked()
        .into_iter()
        .take(options.top_k.max(1))
        .map(|(version, reviews)| VersionShare {
            version: version.to_string(),
            reviews,
            percentage: percent(reviews, total),
        })
        .collect();

    Outcome::Ready(VersionDistribution {
        versions,
        unique_versions,
    })
}

/// Mean rating per app version, best first. Versions with no valid score are left out.
pub fn rating_by_version(dataset: &Dataset, options: &AnalysisOptions) -> Outcome<RatingByVersion> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    // version -> (first seen, score sum, valid scores)
    let mut per_version: HashMap<&str, (usize, u64, usize)> = HashMap::new();
    for (idx, review) in dataset.reviews.iter().enumerate() {
        let Some(score) = coerce::score(review.score.as_deref()) else {
            continue;
        };
        let version = coerce::text_or_unknown(review.app_version.as_deref());
        let entry = per_version.entry(version).or_insert((idx, 0, 0));
        entry.1 += u64::from(score);
        entry.2 += 1;
    }

    if per_version.is_empty() {
        return Outcome::no_data("No valid scores found");
    }

    let total_versions = per_version.len();
    let mut ratings: Vec<(usize, VersionRating)> = per_version
        .into_iter()
        .map(|(version, (first_seen, sum, n))| {
            (
                first_seen,
                VersionRating {
                    version: version.to_string(),
                    mean_score: sum as f64 / n as f64,
                    reviews: n,
                },
            )
        })
        .collect();

    ratings.sort_by(|(a_idx, a), (b_idx, b)| {
        b.mean_score
            .total_cmp(&a.mean_score)
            .then(a_idx.cmp(b_idx))
    });

    Outcome::Ready(RatingByVersion {
        versions: ratings
            .into_iter()
            .take(options.top_k.max(1))
            .map(|(_, rating)| rating)
            .collect(),
        total_versions,
    })
}

pub struct VersionAnalysis;

impl Analysis for VersionAnalysis {
    fn name(&self) -> &'static str {
        "version_analysis"
    }

    fn description(&self) -> &'static str {
        "Most reviewed app versions and their share of all reviews"
    }

    fn run(&self, dataset: &Dataset, _: &AnalysisInput, options: &AnalysisOptions) -> AnalysisReport {
        AnalysisReport::Versions(version_distribution(dataset, options))
    }
}

pub struct RatingByVersionAnalysis;

impl Analysis for RatingByVersionAnalysis {
    fn name(&self) -> &'static str {
        "rating_by_version"
    }

    fn description(&self) -> &'static str {
        "Average rating per app version, highest first"
    }

    fn run(&self, dataset: &Dataset, _: &AnalysisInput, options: &AnalysisOptions) -> AnalysisReport {
        AnalysisReport::RatingByVersion(rating_by_version(dataset, options))
    }
}
