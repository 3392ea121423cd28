use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column names of a review export, in canonical order.
pub const REVIEW_FIELDS: [&str; 8] = [
    "reviewId",
    "userName",
    "content",
    "score",
    "thumbsUpCount",
    "reviewCreatedVersion",
    "at",
    "appVersion",
];

/// One row of the review export, kept as raw text.
///
/// Columns missing from the header and empty cells both come through as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    pub review_id: Option<String>,
    pub user_name: Option<String>,
    pub content: Option<String>,
    pub score: Option<String>,
    pub thumbs_up_count: Option<String>,
    pub review_created_version: Option<String>,
    pub at: Option<String>,
    pub app_version: Option<String>,
}

impl Review {
    /// Raw value of a column by its CSV header name.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "reviewId" => &self.review_id,
            "userName" => &self.user_name,
            "content" => &self.content,
            "score" => &self.score,
            "thumbsUpCount" => &self.thumbs_up_count,
            "reviewCreatedVersion" => &self.review_created_version,
            "at" => &self.at,
            "appVersion" => &self.app_version,
            _ => return None,
        };
        value.as_deref()
    }

    /// Review text, or `""` when absent.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Where the in-memory rows came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetOrigin {
    Source,
    Cache,
    Empty,
}

impl std::fmt::Display for DatasetOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DatasetOrigin::Source => "source file",
            DatasetOrigin::Cache => "cache snapshot",
            DatasetOrigin::Empty => "no data",
        };
        f.write_str(label)
    }
}

/// Immutable review collection shared by every query for the process lifetime.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub reviews: Vec<Review>,
    pub loaded_at: DateTime<Utc>,
    pub origin: DatasetOrigin,
    pub fields: Vec<String>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self {
            reviews: Vec::new(),
            loaded_at: Utc::now(),
            origin: DatasetOrigin::Empty,
            fields: canonical_fields(),
        }
    }

    /// Build a dataset from rows already in memory.
    pub fn from_reviews(reviews: Vec<Review>, origin: DatasetOrigin) -> Self {
        Self {
            reviews,
            loaded_at: Utc::now(),
            origin,
            fields: canonical_fields(),
        }
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

pub fn canonical_fields() -> Vec<String> {
    REVIEW_FIELDS.iter().map(|f| f.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_lookup_by_header_name() {
        let review = Review {
            user_name: Some("ana".into()),
            thumbs_up_count: Some("3".into()),
            ..Review::default()
        };
        assert_eq!(review.field("userName"), Some("ana"));
        assert_eq!(review.field("thumbsUpCount"), Some("3"));
        assert_eq!(review.field("content"), None);
        assert_eq!(review.field("nope"), None);
        assert_eq!(review.text(), "");
    }

    #[test]
    fn review_serializes_with_header_names() {
        let review = Review {
            review_id: Some("r1".into()),
            app_version: Some("8.0".into()),
            ..Review::default()
        };
        let json = simd_json::to_string(&review).expect("serialize");
        assert!(json.contains("\"reviewId\":\"r1\""));
        assert!(json.contains("\"appVersion\":\"8.0\""));
    }
}
