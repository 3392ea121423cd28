use schemars::JsonSchema;
use schemars::transform::RecursiveTransform;
use serde::Serialize;

use super::{AnalysisOptions, NO_DATA, Outcome, percent};
use crate::analysis::{Analysis, AnalysisInput, AnalysisReport};
use crate::coerce;
use crate::schema::strip_non_standard_format;
use crate::types::{Dataset, REVIEW_FIELDS};

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct FieldCompleteness {
    pub field: String,
    pub present: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct Completeness {
    pub fields: Vec<FieldCompleteness>,
    pub total: usize,
}

/// Per-column count of rows holding a non-blank value.
pub fn completeness(dataset: &Dataset) -> Outcome<Completeness> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    let total = dataset.len();
    let fields = REVIEW_FIELDS
        .iter()
        .map(|&field| {
            let present = dataset
                .reviews
                .iter()
                .filter(|r| coerce::present(r.field(field)))
                .count();
            FieldCompleteness {
                field: field.to_string(),
                present,
                percentage: percent(present, total),
            }
        })
        .collect();

    Outcome::Ready(Completeness { fields, total })
}

pub struct CompletenessAnalysis;

impl Analysis for CompletenessAnalysis {
    fn name(&self) -> &'static str {
        "review_completeness"
    }

    fn description(&self) -> &'static str {
        "Share of rows with a value for each column"
    }

    fn run(&self, dataset: &Dataset, _: &AnalysisInput, _: &AnalysisOptions) -> AnalysisReport {
        AnalysisReport::Completeness(completeness(dataset))
    }
}
