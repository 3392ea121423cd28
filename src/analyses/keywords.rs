use std::collections::HashSet;

use rayon::prelude::*;
use schemars::JsonSchema;
use schemars::transform::RecursiveTransform;
use serde::Serialize;

use super::{AnalysisOptions, NO_DATA, Outcome, Tally, percent};
use crate::analysis::{Analysis, AnalysisInput, AnalysisReport};
use crate::lexicon::{self, FEATURE_GROUPS, ISSUE_TERMS, STOPWORDS};
use crate::schema::strip_non_standard_format;
use crate::types::Dataset;

const KEYWORD_LIMIT: usize = 15;
const MIN_KEYWORD_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct KeywordFrequency {
    pub keywords: Vec<KeywordCount>,
    pub unique_keywords: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct Mention {
    pub term: String,
    /// Reviews mentioning the term at least once
    pub reviews: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(transform = RecursiveTransform(strip_non_standard_format))]
pub struct MentionCounts {
    pub mentions: Vec<Mention>,
    pub total_reviews: usize,
}

/// Most frequent words across all review text.
///
/// Words are maximal runs of `a`-`z` after lowercasing. Stopwords (built-in plus
/// `options.extra_stopwords`) and words of three letters or fewer are dropped.
pub fn common_topics(dataset: &Dataset, options: &AnalysisOptions) -> Outcome<KeywordFrequency> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    let extra: HashSet<String> = options
        .extra_stopwords
        .iter()
        .map(|w| w.trim().to_lowercase())
        .collect();
    let keep = |word: &str| {
        word.len() >= MIN_KEYWORD_LEN && !STOPWORDS.contains(word) && !extra.contains(word)
    };

    // Tokenize in parallel; collect keeps row order so tie-breaking stays stable.
    let per_row: Vec<Vec<String>> = dataset
        .reviews
        .par_iter()
        .map(|r| {
            let lowered = r.text().to_lowercase();
            lexicon::tokens(&lowered)
                .filter(|w| keep(*w))
                .map(str::to_owned)
                .collect()
        })
        .collect();

    let mut tally = Tally::new();
    for word in per_row.into_iter().flatten() {
        tally.add(word);
    }

    let unique_keywords = tally.len();
    let keywords = tally
        .ranked()
        .into_iter()
        .take(KEYWORD_LIMIT)
        .map(|(word, count)| KeywordCount { word, count })
        .collect();

    Outcome::Ready(KeywordFrequency {
        keywords,
        unique_keywords,
    })
}

/// Number of reviews whose lowercased text contains any of `terms`.
fn rows_mentioning(lowered: &[String], terms: &[&str]) -> usize {
    lowered
        .par_iter()
        .filter(|text| terms.iter().any(|t| text.contains(t)))
        .count()
}

fn lowered_texts(dataset: &Dataset) -> Vec<String> {
    dataset
        .reviews
        .par_iter()
        .map(|r| r.text().to_lowercase())
        .collect()
}

fn ranked_mentions(counts: Vec<(&str, usize)>, total: usize) -> Vec<Mention> {
    let mut mentions: Vec<Mention> = counts
        .into_iter()
        .map(|(term, reviews)| Mention {
            term: term.to_string(),
            reviews,
            percentage: percent(reviews, total),
        })
        .collect();
    mentions.sort_by(|a, b| b.reviews.cmp(&a.reviews));
    mentions
}

/// How often known problem terms (crashes, buffering, login...) come up.
/// Terms nobody mentions are left out.
pub fn issue_mentions(dataset: &Dataset) -> Outcome<MentionCounts> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    let lowered = lowered_texts(dataset);
    let counts = ISSUE_TERMS
        .iter()
        .map(|&term| (term, rows_mentioning(&lowered, &[term])))
        .filter(|&(_, n)| n > 0)
        .collect();

    Outcome::Ready(MentionCounts {
        mentions: ranked_mentions(counts, dataset.len()),
        total_reviews: dataset.len(),
    })
}

/// Reviews touching each feature group; a review counts once per group.
pub fn feature_mentions(dataset: &Dataset) -> Outcome<MentionCounts> {
    if dataset.is_empty() {
        return Outcome::no_data(NO_DATA);
    }

    let lowered = lowered_texts(dataset);
    let counts = FEATURE_GROUPS
        .iter()
        .map(|&(group, terms)| (group, rows_mentioning(&lowered, terms)))
        .collect();

    Outcome::Ready(MentionCounts {
        mentions: ranked_mentions(counts, dataset.len()),
        total_reviews: dataset.len(),
    })
}

pub struct CommonTopicsAnalysis;

impl Analysis for CommonTopicsAnalysis {
    fn name(&self) -> &'static str {
        "common_topics"
    }

    fn description(&self) -> &'static str {
        "Most frequent keywords in review text"
    }

    fn run(&self, dataset: &Dataset, _: &AnalysisInput, options: &AnalysisOptions) -> AnalysisReport {
        AnalysisReport::CommonTopics(common_topics(dataset, options))
    }
}

pub struct IssueMentionsAnalysis;

impl Analysis for IssueMentionsAnalysis {
    fn name(&self) -> &'static str {
        "issue_mentions"
    }

    fn description(&self) -> &'static str {
        "How often common problems such as crashes or buffering are mentioned"
    }

    fn run(&self, dataset: &Dataset, _: &AnalysisInput, _: &AnalysisOptions) -> AnalysisReport {
        AnalysisReport::IssueMentions(issue_mentions(dataset))
    }
}

pub struct FeatureMentionsAnalysis;

impl Analysis for FeatureMentionsAnalysis {
    fn name(&self) -> &'static str {
        "feature_mentions"
    }

    fn description(&self) -> &'static str {
        "Which product features reviews talk about most"
    }

    fn run(&self, dataset: &Dataset, _: &AnalysisInput, _: &AnalysisOptions) -> AnalysisReport {
        AnalysisReport::FeatureMentions(feature_mentions(dataset))
    }
}
