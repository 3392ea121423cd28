use schemars::JsonSchema;
use schemars::transform::RecursiveTransform;
use serde::{Deserialize, Serialize};

use crate::analyses::Outcome;
use crate::schema::strip_non_standard_format;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoArgsRequest {}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct TopReviewersRequest {
    /// Number of reviewers to return. If omitted or 0, uses the configured top_k (default 10).
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct KeywordSentimentRequest {
    /// Keyword to look for in review text (case-insensitive). If omitted or blank, uses the configured default keyword.
    #[serde(default)]
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct ReviewTrendsRequest {
    /// Bucket size: "day" or "month". If omitted or unrecognized, uses the configured period.
    #[serde(default)]
    pub period: Option<String>,

    /// Number of most recent periods to return. If omitted or 0, uses the configured count.
    #[serde(default)]
    pub periods: Option<usize>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Envelope returned by every analysis tool: exactly one of the two fields is set.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AnalysisResponse<T> {
    /// Why no result could be computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_data: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> From<Outcome<T>> for AnalysisResponse<T> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::Ready(value) => Self {
                no_data: None,
                result: Some(value),
            },
            Outcome::NoData(message) => Self {
                no_data: Some(message),
                result: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyses::reviewers::EngagedUser;
    use crate::analyses::summary::RatingStats;
    use crate::analyses::{
        Completeness, ContentLength, KeywordSentiment, LengthByRating, MentionCounts,
        RatingByVersion, ReviewTrends, ScoreDistribution, SentimentBreakdown, SummaryReport,
        ThumbsUpStats, TopReviewers, VersionDistribution,
    };
    use rmcp::serde_json;
    use schemars::schema_for;
    use schemars::transform::Transform;

    /// Formats that schemars emits for Rust numeric types but that are not
    /// part of the JSON Schema specification.
    const NON_STANDARD_FORMATS: &[&str] = &[
        "uint8", "int8", "uint16", "int16", "uint32", "int32", "uint64", "int64", "uint", "int",
        "float", "double",
    ];

    /// Recursively check that no value in the JSON tree equals any of the
    /// non-standard format strings.
    fn assert_no_non_standard_formats(value: &serde_json::Value, path: &str) {
        match value {
            serde_json::Value::Object(map) => {
                if let Some(fmt) = map.get("format").and_then(|v| v.as_str()) {
                    assert!(
                        !NON_STANDARD_FORMATS.contains(&fmt),
                        "found non-standard format \"{fmt}\" at {path}/format"
                    );
                }
                for (key, val) in map {
                    assert_no_non_standard_formats(val, &format!("{path}/{key}"));
                }
            }
            serde_json::Value::Array(arr) => {
                for (i, val) in arr.iter().enumerate() {
                    assert_no_non_standard_formats(val, &format!("{path}[{i}]"));
                }
            }
            _ => {}
        }
    }

    #[test]
    fn mcp_schemas_contain_no_non_standard_formats() {
        let schemas: Vec<(&str, schemars::Schema)> = vec![
            ("TopReviewersRequest", schema_for!(TopReviewersRequest)),
            ("ReviewTrendsRequest", schema_for!(ReviewTrendsRequest)),
            ("ScoreDistribution", schema_for!(AnalysisResponse<ScoreDistribution>)),
            ("SentimentBreakdown", schema_for!(AnalysisResponse<SentimentBreakdown>)),
            ("TopReviewers", schema_for!(AnalysisResponse<TopReviewers>)),
            ("VersionDistribution", schema_for!(AnalysisResponse<VersionDistribution>)),
            ("ThumbsUpStats", schema_for!(AnalysisResponse<ThumbsUpStats>)),
            ("ContentLength", schema_for!(AnalysisResponse<ContentLength>)),
            ("RatingByVersion", schema_for!(AnalysisResponse<RatingByVersion>)),
            ("ReviewTrends", schema_for!(AnalysisResponse<ReviewTrends>)),
            ("EngagedUser", schema_for!(EngagedUser)),
            ("Completeness", schema_for!(AnalysisResponse<Completeness>)),
            ("KeywordSentiment", schema_for!(AnalysisResponse<KeywordSentiment>)),
            ("LengthByRating", schema_for!(AnalysisResponse<LengthByRating>)),
            ("MentionCounts", schema_for!(AnalysisResponse<MentionCounts>)),
            ("RatingStats", schema_for!(RatingStats)),
            ("SummaryReport", schema_for!(AnalysisResponse<SummaryReport>)),
        ];

        for (name, schema) in &schemas {
            let value = serde_json::to_value(schema).expect("schema should serialize");
            assert_no_non_standard_formats(&value, &format!("#/{name}"));
        }
    }

    #[test]
    fn strip_non_standard_format_is_selective() {
        let mut schema = schemars::json_schema!({
            "type": "string",
            "format": "date-time"
        });

        let mut transform = RecursiveTransform(strip_non_standard_format);
        transform.transform(&mut schema);

        assert_eq!(
            schema.get("format").and_then(|v| v.as_str()),
            Some("date-time"),
            "standard formats must not be stripped"
        );
    }

    #[test]
    fn response_envelope_sets_one_field() {
        let ready: AnalysisResponse<u32> = Outcome::Ready(7).into();
        let value = serde_json::to_value(&ready).expect("serialize");
        assert_eq!(value, serde_json::json!({ "result": 7 }));

        let empty: AnalysisResponse<u32> = Outcome::no_data("No data available").into();
        let value = serde_json::to_value(&empty).expect("serialize");
        assert_eq!(value, serde_json::json!({ "no_data": "No data available" }));
    }
}
