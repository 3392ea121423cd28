use crate::types::{Dataset, DatasetOrigin, Review};

mod keywords;
mod reviewers;
mod trends;

/// Shorthand row builder; blank strings become missing fields.
pub(crate) fn review(user: &str, content: &str, score: &str) -> Review {
    let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
    Review {
        user_name: opt(user),
        content: opt(content),
        score: opt(score),
        ..Review::default()
    }
}

pub(crate) fn dataset(reviews: Vec<Review>) -> Dataset {
    Dataset::from_reviews(reviews, DatasetOrigin::Source)
}

pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}
