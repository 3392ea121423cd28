use std::str::FromStr;

use super::{assert_close, dataset, review};
use crate::analyses::{AnalysisOptions, TrendPeriod, review_trends};
use crate::types::Review;

fn dated(at: &str, score: &str) -> Review {
    Review {
        at: Some(at.to_string()),
        ..review("u", "", score)
    }
}

#[test]
fn test_trend_period_parsing() {
    assert_eq!(TrendPeriod::from_str("Day").unwrap(), TrendPeriod::Day);
    assert_eq!(TrendPeriod::from_str("monthly").unwrap(), TrendPeriod::Month);
    assert!(TrendPeriod::from_str("weekly").is_err());
}

#[test]
fn test_daily_trends_keep_most_recent_periods() {
    let ds = dataset(vec![
        dated("2024-01-03 10:00:00", "5"),
        dated("2024-01-01 09:00:00", "1"),
        dated("2024-01-02 08:00:00", "4"),
        dated("2024-01-03 23:59:59", "3"),
        dated("garbage", "5"),
    ]);
    let trends = review_trends(&ds, Some(TrendPeriod::Day), Some(2), &AnalysisOptions::default())
        .into_ready()
        .unwrap();

    assert_eq!(trends.total_periods, 3);
    let periods: Vec<_> = trends.buckets.iter().map(|b| b.period.as_str()).collect();
    assert_eq!(periods, ["2024-01-02", "2024-01-03"]);
    assert_eq!(trends.buckets[1].reviews, 2);
    assert_close(trends.buckets[1].mean_score.unwrap(), 4.0);
    assert_close(trends.mean_per_period, 4.0 / 3.0);
}

#[test]
fn test_monthly_trends_group_by_month() {
    let ds = dataset(vec![
        dated("2024-01-03", "5"),
        dated("2024-01-20T10:00:00Z", ""),
        dated("02/10/2024", "2"),
    ]);
    let trends = review_trends(&ds, Some(TrendPeriod::Month), None, &AnalysisOptions::default())
        .into_ready()
        .unwrap();

    assert_eq!(trends.period, TrendPeriod::Month);
    assert_eq!(trends.buckets.len(), 2);
    assert_eq!(trends.buckets[0].period, "2024-01");
    assert_eq!(trends.buckets[0].reviews, 2);
    assert_close(trends.buckets[0].mean_score.unwrap(), 5.0);
    assert_eq!(trends.buckets[1].period, "2024-02");
}

#[test]
fn test_trends_without_dates() {
    let ds = dataset(vec![review("a", "no date", "5")]);
    let outcome = review_trends(&ds, None, None, &AnalysisOptions::default());
    assert_eq!(
        outcome.no_data_message(),
        Some("No date information available")
    );
}
