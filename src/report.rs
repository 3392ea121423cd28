//! Plain-text rendering of analysis results and dataset descriptions.

use crate::analyses::{
    Completeness, ContentLength, KeywordFrequency, KeywordSentiment, LengthByRating,
    MentionCounts, NO_DATA, Outcome, RatingByVersion, ReviewTrends, ScoreDistribution,
    SentimentBreakdown, SummaryReport, ThumbsUpStats, TopReviewers, UserEngagement,
    VersionDistribution,
};
use crate::analysis::{AnalysisReport, CatalogEntry};
use crate::types::Dataset;
use crate::utils::{
    NumberFormatOptions, format_decimal, format_number, format_percent, format_period_for_display,
};

fn heading(title: &str) -> String {
    format!("{title}\n{}\n", "=".repeat(title.chars().count()))
}

fn section<T>(title: &str, outcome: &Outcome<T>, body: impl FnOnce(&T) -> Vec<String>) -> String {
    let mut out = heading(title);
    let lines = match outcome {
        Outcome::Ready(value) => body(value),
        Outcome::NoData(message) => vec![message.clone()],
    };
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn count_pct(count: usize, pct: f64, fmt: &NumberFormatOptions) -> String {
    format!("{} ({})", format_number(count, fmt), format_percent(pct))
}

fn sentiment_lines(s: &SentimentBreakdown, fmt: &NumberFormatOptions) -> Vec<String> {
    vec![
        format!("Positive: {}", count_pct(s.positive, s.positive_pct, fmt)),
        format!("Negative: {}", count_pct(s.negative, s.negative_pct, fmt)),
        format!("Neutral: {}", count_pct(s.neutral, s.neutral_pct, fmt)),
        format!("Total: {}", format_number(s.total, fmt)),
    ]
}

fn score_lines(d: &ScoreDistribution, fmt: &NumberFormatOptions) -> Vec<String> {
    let mut lines: Vec<String> = d
        .buckets
        .iter()
        .map(|b| format!("{} stars: {}", b.score, count_pct(b.count, b.percentage, fmt)))
        .collect();
    lines.push(String::new());
    lines.push(format!("Average Score: {}", format_decimal(d.mean, fmt)));
    lines.push(format!("Median Score: {}", format_decimal(d.median, fmt)));
    lines.push(format!("Score Range: {} to {}", d.min, d.max));
    lines.push(format!("Reviews Analyzed: {}", format_number(d.analyzed, fmt)));
    lines
}

fn reviewer_lines(t: &TopReviewers, fmt: &NumberFormatOptions) -> Vec<String> {
    let mut lines: Vec<String> = t
        .reviewers
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}: {} reviews", i + 1, r.user_name, format_number(r.reviews, fmt)))
        .collect();
    lines.push(format!("Unique Reviewers: {}", format_number(t.unique_reviewers, fmt)));
    lines
}

fn version_lines(v: &VersionDistribution, fmt: &NumberFormatOptions) -> Vec<String> {
    let mut lines: Vec<String> = v
        .versions
        .iter()
        .map(|s| format!("{}: {}", s.version, count_pct(s.reviews, s.percentage, fmt)))
        .collect();
    lines.push(format!("Unique Versions: {}", format_number(v.unique_versions, fmt)));
    lines
}

fn thumbs_lines(t: &ThumbsUpStats, fmt: &NumberFormatOptions) -> Vec<String> {
    vec![
        format!("Total Thumbs Up: {}", format_number(t.total, fmt)),
        format!("Average per Review: {}", format_decimal(t.mean, fmt)),
        format!("Most Thumbs Up: {}", format_number(t.max, fmt)),
        format!(
            "Reviews with Thumbs Up: {}",
            count_pct(t.with_thumbs_up, t.with_thumbs_up_pct, fmt)
        ),
        format!("Reviews Analyzed: {}", format_number(t.analyzed, fmt)),
    ]
}

fn length_lines(c: &ContentLength, fmt: &NumberFormatOptions) -> Vec<String> {
    vec![
        format!("Average Length: {} characters", format_decimal(c.mean_chars, fmt)),
        format!("Median Length: {} characters", format_decimal(c.median_chars, fmt)),
        format!("Average Words: {}", format_decimal(c.mean_words, fmt)),
        format!("Longest Review: {} characters", format_number(c.longest, fmt)),
        format!("Shortest Review: {} characters", format_number(c.shortest, fmt)),
        format!("Empty Reviews: {}", format_number(c.empty, fmt)),
        format!("Reviews Analyzed: {}", format_number(c.analyzed, fmt)),
    ]
}

fn keyword_lines(k: &KeywordFrequency, fmt: &NumberFormatOptions) -> Vec<String> {
    let mut lines: Vec<String> = k
        .keywords
        .iter()
        .enumerate()
        .map(|(i, kw)| format!("{}. {}: {}", i + 1, kw.word, format_number(kw.count, fmt)))
        .collect();
    lines.push(format!("Unique Keywords: {}", format_number(k.unique_keywords, fmt)));
    lines
}

fn rating_by_version_lines(r: &RatingByVersion, fmt: &NumberFormatOptions) -> Vec<String> {
    let mut lines: Vec<String> = r
        .versions
        .iter()
        .map(|v| {
            format!(
                "{}: {} average ({} reviews)",
                v.version,
                format_decimal(v.mean_score, fmt),
                format_number(v.reviews, fmt)
            )
        })
        .collect();
    lines.push(format!("Versions Rated: {}", format_number(r.total_versions, fmt)));
    lines
}

fn trend_lines(t: &ReviewTrends, fmt: &NumberFormatOptions) -> Vec<String> {
    let mut lines: Vec<String> = t
        .buckets
        .iter()
        .map(|b| {
            let mean = b
                .mean_score
                .map(|m| format!(", average {}", format_decimal(m, fmt)))
                .unwrap_or_default();
            format!(
                "{}: {} reviews{mean}",
                format_period_for_display(&b.period),
                format_number(b.reviews, fmt)
            )
        })
        .collect();
    lines.push(format!(
        "Average per {}: {}",
        t.period.as_str(),
        format_decimal(t.mean_per_period, fmt)
    ));
    lines.push(format!("Total Periods: {}", format_number(t.total_periods, fmt)));
    lines
}

fn engagement_lines(u: &UserEngagement, fmt: &NumberFormatOptions) -> Vec<String> {
    let mut lines: Vec<String> = u
        .users
        .iter()
        .enumerate()
        .map(|(i, e)| {
            format!(
                "{}. {}: score {} ({} reviews, {} thumbs up, {} average)",
                i + 1,
                e.user_name,
                format_decimal(e.score, fmt),
                format_number(e.reviews, fmt),
                format_number(e.thumbs_up, fmt),
                format_decimal(e.mean_score, fmt)
            )
        })
        .collect();
    lines.push(format!("Total Users: {}", format_number(u.total_users, fmt)));
    lines
}

fn completeness_lines(c: &Completeness, fmt: &NumberFormatOptions) -> Vec<String> {
    let mut lines: Vec<String> = c
        .fields
        .iter()
        .map(|f| format!("{}: {}", f.field, count_pct(f.present, f.percentage, fmt)))
        .collect();
    lines.push(format!("Total Rows: {}", format_number(c.total, fmt)));
    lines
}

fn keyword_sentiment_lines(k: &KeywordSentiment, fmt: &NumberFormatOptions) -> Vec<String> {
    let mut lines = vec![format!(
        "Reviews mentioning '{}': {}",
        k.keyword,
        format_number(k.matches, fmt)
    )];
    lines.extend(sentiment_lines(&k.breakdown, fmt));
    if !k.samples.is_empty() {
        lines.push(String::new());
        lines.push("Samples:".to_string());
        lines.extend(
            k.samples
                .iter()
                .map(|s| format!("- {}: {}", s.user_name, s.content)),
        );
    }
    lines
}

fn length_by_rating_lines(l: &LengthByRating, fmt: &NumberFormatOptions) -> Vec<String> {
    l.ratings
        .iter()
        .map(|r| {
            format!(
                "{} stars: {} characters average, longest {} ({} reviews)",
                r.score,
                format_decimal(r.mean_chars, fmt),
                format_number(r.longest, fmt),
                format_number(r.reviews, fmt)
            )
        })
        .collect()
}

fn mention_lines(m: &MentionCounts, fmt: &NumberFormatOptions) -> Vec<String> {
    let mut lines: Vec<String> = m
        .mentions
        .iter()
        .map(|x| format!("{}: {}", x.term, count_pct(x.reviews, x.percentage, fmt)))
        .collect();
    if lines.is_empty() {
        lines.push("No mentions found".to_string());
    }
    lines.push(format!("Reviews Scanned: {}", format_number(m.total_reviews, fmt)));
    lines
}

fn summary_lines(s: &SummaryReport, fmt: &NumberFormatOptions) -> Vec<String> {
    let mut lines = vec![format!("Total Reviews: {}", format_number(s.total_reviews, fmt))];

    if let Some(r) = &s.ratings {
        lines.push(format!("Average Rating: {}", format_decimal(r.mean, fmt)));
        lines.push(format!("Median Rating: {}", format_decimal(r.median, fmt)));
        if let Some(sd) = r.std_dev {
            lines.push(format!("Rating Std Dev: {}", format_decimal(sd, fmt)));
        }
        lines.push(format!("Most Common Rating: {}", r.mode));
    }
    if let Some(rs) = &s.rating_sentiment {
        lines.push(format!(
            "Rating Sentiment: {} positive, {} negative, {} neutral",
            format_percent(rs.positive_pct),
            format_percent(rs.negative_pct),
            format_percent(rs.neutral_pct)
        ));
    }
    if let Some(cs) = &s.content_sentiment {
        lines.push(format!(
            "Content Sentiment: {} positive, {} negative, {} neutral",
            format_percent(cs.positive_pct),
            format_percent(cs.negative_pct),
            format_percent(cs.neutral_pct)
        ));
    }
    if let Some(v) = &s.top_version {
        lines.push(format!(
            "Top Version: {} ({})",
            v.version,
            format_percent(v.percentage)
        ));
    }
    if let Some(k) = &s.top_keyword {
        lines.push(format!(
            "Top Keyword: {} ({})",
            k.word,
            format_number(k.count, fmt)
        ));
    }
    lines
}

/// Render any analysis result as a titled plain-text block.
pub fn render(report: &AnalysisReport, fmt: &NumberFormatOptions) -> String {
    match report {
        AnalysisReport::ScoreDistribution(o) => {
            section("Review Score Distribution", o, |d| score_lines(d, fmt))
        }
        AnalysisReport::Sentiment(o) => section("Sentiment Analysis", o, |s| sentiment_lines(s, fmt)),
        AnalysisReport::TopReviewers(o) => section("Top Reviewers", o, |t| reviewer_lines(t, fmt)),
        AnalysisReport::Versions(o) => section("App Version Distribution", o, |v| version_lines(v, fmt)),
        AnalysisReport::ThumbsUp(o) => section("Thumbs Up Analysis", o, |t| thumbs_lines(t, fmt)),
        AnalysisReport::ContentLength(o) => {
            section("Review Length Analysis", o, |c| length_lines(c, fmt))
        }
        AnalysisReport::CommonTopics(o) => section("Common Keywords", o, |k| keyword_lines(k, fmt)),
        AnalysisReport::RatingByVersion(o) => {
            section("Rating by Version", o, |r| rating_by_version_lines(r, fmt))
        }
        AnalysisReport::Trends(o) => section("Review Trends", o, |t| trend_lines(t, fmt)),
        AnalysisReport::UserEngagement(o) => {
            section("User Engagement", o, |u| engagement_lines(u, fmt))
        }
        AnalysisReport::Completeness(o) => {
            section("Data Completeness", o, |c| completeness_lines(c, fmt))
        }
        AnalysisReport::KeywordSentiment(o) => {
            section("Keyword Sentiment", o, |k| keyword_sentiment_lines(k, fmt))
        }
        AnalysisReport::RatingSentiment(o) => {
            section("Rating Sentiment", o, |s| sentiment_lines(s, fmt))
        }
        AnalysisReport::LengthByRating(o) => {
            section("Review Length by Rating", o, |l| length_by_rating_lines(l, fmt))
        }
        AnalysisReport::IssueMentions(o) => section("Issue Mentions", o, |m| mention_lines(m, fmt)),
        AnalysisReport::FeatureMentions(o) => {
            section("Feature Mentions", o, |m| mention_lines(m, fmt))
        }
        AnalysisReport::Summary(o) => section("Summary Report", o, |s| summary_lines(s, fmt)),
    }
}

pub fn overview_text(dataset: &Dataset, fmt: &NumberFormatOptions) -> String {
    if dataset.is_empty() {
        return NO_DATA.to_string();
    }
    format!(
        "{}Total Reviews: {}\nLoaded At: {}\nLoaded From: {}\nColumns: {}\n",
        heading("Review Dataset Overview"),
        format_number(dataset.len(), fmt),
        dataset.loaded_at.to_rfc3339(),
        dataset.origin,
        dataset.fields.join(", ")
    )
}

/// Column list with how many rows fill each one, plus the first record as JSON.
pub fn structure_text(dataset: &Dataset, fmt: &NumberFormatOptions) -> String {
    let Some(first) = dataset.reviews.first() else {
        return NO_DATA.to_string();
    };

    let mut out = heading("Review Dataset Structure");
    for field in &dataset.fields {
        let present = dataset
            .reviews
            .iter()
            .filter(|r| crate::coerce::present(r.field(field)))
            .count();
        out.push_str(&format!(
            "  - {field}: {} of {} rows present\n",
            format_number(present, fmt),
            format_number(dataset.len(), fmt)
        ));
    }

    let sample = simd_json::to_string_pretty(first)
        .unwrap_or_else(|e| format!("(sample record could not be serialized: {e})"));
    out.push_str("\nSample Record:\n");
    out.push_str(&sample);
    out.push('\n');
    out
}

pub fn catalog_text(catalog: &[CatalogEntry]) -> String {
    let mut out = heading("Available Analyses");
    for (i, entry) in catalog.iter().enumerate() {
        out.push_str(&format!("{}. {} - {}\n", i + 1, entry.name, entry.description));
    }
    out
}
