use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use schemars::transform::RecursiveTransform;
use serde::{Deserialize, Serialize};

use super::{AnalysisOptions, NO_DATA, Outcome};
use crate::analysis::{Analysis, AnalysisInput, AnalysisReport};
use crate::coerce;
use crate::schema::strip_non_standard_format;
use crate::types::Dataset;

/// Calendar bucket used to group reviews over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    Day,
    Month,
}

impl TrendPeriod {
    fn key(self, at: &NaiveDateTime) -> String {
        match self {
            TrendPeriod::Day => at.format("%Y-%m-%d").to_string(),
            TrendPeriod::Month => at.format("%Y-%m").to_string(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrendPeriod::Day => "day",
            TrendPeriod::Month => "month",
        }
    }
}

impl FromStr for TrendPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" | "days" => Ok(TrendPeriod::Day),
            "month" | "monthly" | "months" => Ok(TrendPeriod::Month),
            other => anyhow::bail!("Unknown trend period '{other}'. Use 'day' or 'month'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct TrendBucket {
    /// `YYYY-MM-DD` or `YYYY-MM`
    pub period: String,
    pub reviews: usize,
    /// Mean of valid scores in the period, if any
    pub mean_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct ReviewTrends {
    pub period: TrendPeriod,
    /// Most recent periods, oldest first
    pub buckets: Vec<TrendBucket>,
    pub mean_per_period: f64,
    pub total_periods: usize,
}

/// Review counts per day or month for the most recent `periods` periods.
///
/// Rows whose timestamp does not parse are skipped.
pub fn review_trends(
    dataset: &Dataset,
    period: Option<TrendPeriod>,
    periods: Option<usize>,
    options: &AnalysisOptions,
) -> Outcome<ReviewTrends> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    let period = period.unwrap_or(options.trend_period);
    let periods = match periods {
        Some(n) if n > 0 => n,
        _ => options.trend_periods.max(1),
    };

    // key -> (reviews, score sum, valid scores); keys sort chronologically
    let mut buckets: BTreeMap<String, (usize, u64, usize)> = BTreeMap::new();
    for review in &dataset.reviews {
        let Some(at) = coerce::timestamp(review.at.as_deref()) else {
            continue;
        };
        let entry = buckets.entry(period.key(&at)).or_default();
        entry.0 += 1;
        if let Some(score) = coerce::score(review.score.as_deref()) {
            entry.1 += u64::from(score);
            entry.2 += 1;
        }
    }

    if buckets.is_empty() {
        return Outcome::no_data("No date information available");
    }

    let total_periods = buckets.len();
    let dated: usize = buckets.values().map(|b| b.0).sum();
    let skip = total_periods.saturating_sub(periods);

    let recent = buckets
        .into_iter()
        .skip(skip)
        .map(|(key, (reviews, sum, scored))| TrendBucket {
            period: key,
            reviews,
            mean_score: (scored > 0).then(|| sum as f64 / scored as f64),
        })
        .collect();

    Outcome::Ready(ReviewTrends {
        period,
        buckets: recent,
        mean_per_period: dated as f64 / total_periods as f64,
        total_periods,
    })
}

pub struct ReviewTrendsAnalysis;

impl Analysis for ReviewTrendsAnalysis {
    fn name(&self) -> &'static str {
        "review_trends"
    }

    fn description(&self) -> &'static str {
        "Review volume over recent days or months"
    }

    fn run(
        &self,
        dataset: &Dataset,
        input: &AnalysisInput,
        options: &AnalysisOptions,
    ) -> AnalysisReport {
        AnalysisReport::Trends(review_trends(dataset, input.period, input.limit, options))
    }
}
