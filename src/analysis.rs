use serde::Serialize;

use crate::analyses::{
    AnalysisOptions, Completeness, ContentLength, KeywordFrequency, KeywordSentiment,
    LengthByRating, MentionCounts, Outcome, RatingByVersion, ReviewTrends, ScoreDistribution,
    SentimentBreakdown, SummaryReport, ThumbsUpStats, TopReviewers, TrendPeriod, UserEngagement,
    VersionDistribution,
};
use crate::types::Dataset;

/// Optional argument passed to an analysis; each analysis reads at most one field.
#[derive(Debug, Clone, Default)]
pub struct AnalysisInput {
    pub limit: Option<usize>,
    pub keyword: Option<String>,
    pub period: Option<TrendPeriod>,
}

/// Result of any registered analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "outcome", rename_all = "snake_case")]
pub enum AnalysisReport {
    ScoreDistribution(Outcome<ScoreDistribution>),
    Sentiment(Outcome<SentimentBreakdown>),
    TopReviewers(Outcome<TopReviewers>),
    Versions(Outcome<VersionDistribution>),
    ThumbsUp(Outcome<ThumbsUpStats>),
    ContentLength(Outcome<ContentLength>),
    CommonTopics(Outcome<KeywordFrequency>),
    RatingByVersion(Outcome<RatingByVersion>),
    Trends(Outcome<ReviewTrends>),
    UserEngagement(Outcome<UserEngagement>),
    Completeness(Outcome<Completeness>),
    KeywordSentiment(Outcome<KeywordSentiment>),
    RatingSentiment(Outcome<SentimentBreakdown>),
    LengthByRating(Outcome<LengthByRating>),
    IssueMentions(Outcome<MentionCounts>),
    FeatureMentions(Outcome<MentionCounts>),
    Summary(Outcome<SummaryReport>),
}

impl AnalysisReport {
    /// The explanation carried by a no-data outcome, if that is what this is.
    pub fn no_data_message(&self) -> Option<&str> {
        match self {
            AnalysisReport::ScoreDistribution(o) => o.no_data_message(),
            AnalysisReport::Sentiment(o) | AnalysisReport::RatingSentiment(o) => {
                o.no_data_message()
            }
            AnalysisReport::TopReviewers(o) => o.no_data_message(),
            AnalysisReport::Versions(o) => o.no_data_message(),
            AnalysisReport::ThumbsUp(o) => o.no_data_message(),
            AnalysisReport::ContentLength(o) => o.no_data_message(),
            AnalysisReport::CommonTopics(o) => o.no_data_message(),
            AnalysisReport::RatingByVersion(o) => o.no_data_message(),
            AnalysisReport::Trends(o) => o.no_data_message(),
            AnalysisReport::UserEngagement(o) => o.no_data_message(),
            AnalysisReport::Completeness(o) => o.no_data_message(),
            AnalysisReport::KeywordSentiment(o) => o.no_data_message(),
            AnalysisReport::LengthByRating(o) => o.no_data_message(),
            AnalysisReport::IssueMentions(o) | AnalysisReport::FeatureMentions(o) => {
                o.no_data_message()
            }
            AnalysisReport::Summary(o) => o.no_data_message(),
        }
    }
}

/// A named, catalogued query over the review dataset.
pub trait Analysis: Send + Sync {
    /// Stable identifier used by the MCP tool list, the router and the CLI
    fn name(&self) -> &'static str;

    /// One-line description for the analysis catalog
    fn description(&self) -> &'static str;

    fn run(&self, dataset: &Dataset, input: &AnalysisInput, options: &AnalysisOptions)
    -> AnalysisReport;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
}

/// Registry of every analysis, in catalog order
#[derive(Default)]
pub struct AnalysisRegistry {
    analyses: Vec<Box<dyn Analysis>>,
}

impl AnalysisRegistry {
    pub fn new() -> Self {
        Self {
            analyses: Vec::new(),
        }
    }

    pub fn register<A: Analysis + 'static>(&mut self, analysis: A) {
        self.analyses.push(Box::new(analysis));
    }

    /// Look up an analysis by name, ignoring ASCII case.
    pub fn get_by_name(&self, name: &str) -> Option<&dyn Analysis> {
        let name = name.trim();
        self.analyses
            .iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
            .map(|a| a.as_ref())
    }

    pub fn catalog(&self) -> Vec<CatalogEntry> {
        self.analyses
            .iter()
            .map(|a| CatalogEntry {
                name: a.name(),
                description: a.description(),
            })
            .collect()
    }

    /// Run every analysis with default input.
    pub fn run_all(
        &self,
        dataset: &Dataset,
        options: &AnalysisOptions,
    ) -> Vec<(&'static str, AnalysisReport)> {
        let input = AnalysisInput::default();
        self.analyses
            .iter()
            .map(|a| (a.name(), a.run(dataset, &input, options)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.analyses.len()
    }
}
