use super::{assert_close, dataset, review};
use crate::analyses::reviewers::engagement_score;
use crate::analyses::{AnalysisOptions, top_reviewers, user_engagement};
use crate::types::Review;

#[test]
fn test_top_reviewers_groups_missing_names_as_unknown() {
    let ds = dataset(vec![
        review("ana", "", "5"),
        review("", "", "4"),
        review("  ", "", "3"),
        review("ana", "", "2"),
        review("bo", "", "1"),
    ]);
    let top = top_reviewers(&ds, Some(5), &AnalysisOptions::default())
        .into_ready()
        .unwrap();

    assert_eq!(top.unique_reviewers, 3);
    assert_eq!(top.reviewers[0].user_name, "ana");
    assert_eq!(top.reviewers[0].reviews, 2);
    assert_eq!(top.reviewers[1].user_name, "Unknown");
    assert_eq!(top.reviewers[1].reviews, 2);
    assert_eq!(top.reviewers[2].user_name, "bo");
}

#[test]
fn test_top_reviewers_ties_keep_first_seen_order() {
    let ds = dataset(vec![
        review("zed", "", ""),
        review("amy", "", ""),
        review("kim", "", ""),
    ]);
    let top = top_reviewers(&ds, Some(2), &AnalysisOptions::default())
        .into_ready()
        .unwrap();
    let names: Vec<_> = top.reviewers.iter().map(|r| r.user_name.as_str()).collect();
    assert_eq!(names, ["zed", "amy"]);
    assert_eq!(top.limit, 2);
}

#[test]
fn test_top_reviewers_zero_limit_uses_top_k() {
    let options = AnalysisOptions {
        top_k: 1,
        ..AnalysisOptions::default()
    };
    let ds = dataset(vec![review("a", "", ""), review("b", "", "")]);
    let top = top_reviewers(&ds, Some(0), &options).into_ready().unwrap();
    assert_eq!(top.reviewers.len(), 1);
}

#[test]
fn test_engagement_score_weights() {
    assert_close(engagement_score(2, 10, 4.0), 0.8 + 3.0 + 1.2);
    assert!(engagement_score(3, 0, 1.0) > engagement_score(2, 0, 1.0));
    assert!(engagement_score(1, 5, 1.0) > engagement_score(1, 4, 1.0));
    assert!(engagement_score(1, 0, 5.0) > engagement_score(1, 0, 4.0));
}

#[test]
fn test_user_engagement_ranks_by_score() {
    let ds = dataset(vec![
        Review {
            thumbs_up_count: Some("10".into()),
            ..review("quiet", "", "5")
        },
        review("busy", "", "1"),
        review("busy", "", "1"),
        Review {
            thumbs_up_count: Some("oops".into()),
            ..review("busy", "", "")
        },
    ]);
    let engagement = user_engagement(&ds, &AnalysisOptions::default())
        .into_ready()
        .unwrap();

    assert_eq!(engagement.total_users, 2);
    let quiet = &engagement.users[0];
    assert_eq!(quiet.user_name, "quiet");
    assert_close(quiet.score, 0.4 + 3.0 + 1.5);

    let busy = &engagement.users[1];
    assert_eq!(busy.reviews, 3);
    assert_eq!(busy.thumbs_up, 0);
    assert_close(busy.mean_score, 1.0);
}

#[test]
fn test_user_engagement_saturates_huge_thumbs_up() {
    let huge = || Review {
        thumbs_up_count: Some(i64::MAX.to_string()),
        ..review("viral", "", "5")
    };
    let ds = dataset(vec![huge(), huge(), huge()]);
    let engagement = user_engagement(&ds, &AnalysisOptions::default())
        .into_ready()
        .unwrap();

    let viral = &engagement.users[0];
    assert_eq!(viral.reviews, 3);
    assert_eq!(viral.thumbs_up, u64::MAX);
    assert!(viral.score.is_finite());
}
