use std::collections::HashMap;

use schemars::JsonSchema;
use schemars::transform::RecursiveTransform;
use serde::Serialize;

use super::{AnalysisOptions, NO_DATA, Outcome, Tally};
use crate::analysis::{Analysis, AnalysisInput, AnalysisReport};
use crate::coerce;
use crate::schema::strip_non_standard_format;
use crate::types::Dataset;

const REVIEW_WEIGHT: f64 = 0.4;
const THUMBS_WEIGHT: f64 = 0.3;
const SCORE_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct ReviewerCount {
    pub user_name: String,
    pub reviews: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct TopReviewers {
    pub limit: usize,
    pub reviewers: Vec<ReviewerCount>,
    pub unique_reviewers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct EngagedUser {
    pub user_name: String,
    pub score: f64,
    pub reviews: usize,
    pub thumbs_up: u64,
    /// Mean of the user's valid scores, 0 when none were valid
    pub mean_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct UserEngagement {
    pub users: Vec<EngagedUser>,
    pub total_users: usize,
}

/// Most prolific reviewers; reviews without a user name are grouped as "Unknown".
pub fn top_reviewers(
    dataset: &Dataset,
    limit: Option<usize>,
    options: &AnalysisOptions,
) -> Outcome<TopReviewers> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    let limit = options.limit_or_default(limit);
    let mut tally = Tally::new();
    for review in &dataset.reviews {
        tally.add(coerce::text_or_unknown(review.user_name.as_deref()));
    }

    let unique_reviewers = tally.len();
    let reviewers = tally
        .ranked()
        .into_iter()
        .take(limit)
        .map(|(user, reviews)| ReviewerCount {
            user_name: user.to_string(),
            reviews,
        })
        .collect();

    Outcome::Ready(TopReviewers {
        limit,
        reviewers,
        unique_reviewers,
    })
}

/// `0.4 * reviews + 0.3 * thumbs_up + 0.3 * mean_score`
pub fn engagement_score(reviews: usize, thumbs_up: u64, mean_score: f64) -> f64 {
    reviews as f64 * REVIEW_WEIGHT + thumbs_up as f64 * THUMBS_WEIGHT + mean_score * SCORE_WEIGHT
}

#[derive(Default)]
struct UserTotals {
    first_seen: usize,
    reviews: usize,
    thumbs_up: u64,
    score_sum: u64,
    score_count: usize,
}

pub fn user_engagement(dataset: &Dataset, options: &AnalysisOptions) -> Outcome<UserEngagement> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    let mut totals: HashMap<&str, UserTotals> = HashMap::new();
    for (idx, review) in dataset.reviews.iter().enumerate() {
        let user = coerce::text_or_unknown(review.user_name.as_deref());
        let entry = totals.entry(user).or_insert_with(|| UserTotals {
            first_seen: idx,
            ..UserTotals::default()
        });
        entry.reviews += 1;
        if let Some(thumbs) = coerce::count(review.thumbs_up_count.as_deref()) {
            entry.thumbs_up = entry.thumbs_up.saturating_add(thumbs);
        }
        if let Some(score) = coerce::score(review.score.as_deref()) {
            entry.score_sum += u64::from(score);
            entry.score_count += 1;
        }
    }

    let total_users = totals.len();
    let mut scored: Vec<(usize, EngagedUser)> = totals
        .into_iter()
        .map(|(user, t)| {
            let mean_score = if t.score_count == 0 {
                0.0
            } else {
                t.score_sum as f64 / t.score_count as f64
            };
            let user = EngagedUser {
                user_name: user.to_string(),
                score: engagement_score(t.reviews, t.thumbs_up, mean_score),
                reviews: t.reviews,
                thumbs_up: t.thumbs_up,
                mean_score,
            };
            (t.first_seen, user)
        })
        .collect();

    scored.sort_by(|(a_idx, a), (b_idx, b)| {
        b.score.total_cmp(&a.score).then(a_idx.cmp(b_idx))
    });

    let users = scored
        .into_iter()
        .take(options.top_k.max(1))
        .map(|(_, user)| user)
        .collect();

    Outcome::Ready(UserEngagement { users, total_users })
}

pub struct TopReviewersAnalysis;

impl Analysis for TopReviewersAnalysis {
    fn name(&self) -> &'static str {
        "top_reviewers"
    }

    fn description(&self) -> &'static str {
        "Most active reviewers by number of reviews"
    }

    fn run(
        &self,
        dataset: &Dataset,
        input: &AnalysisInput,
        options: &AnalysisOptions,
    ) -> AnalysisReport {
        AnalysisReport::TopReviewers(top_reviewers(dataset, input.limit, options))
    }
}

pub struct UserEngagementAnalysis;

impl Analysis for UserEngagementAnalysis {
    fn name(&self) -> &'static str {
        "user_engagement_score"
    }

    fn description(&self) -> &'static str {
        "Composite engagement score per user from reviews, thumbs up and rating"
    }

    fn run(&self, dataset: &Dataset, _: &AnalysisInput, options: &AnalysisOptions) -> AnalysisReport {
        AnalysisReport::UserEngagement(user_engagement(dataset, options))
    }
}
