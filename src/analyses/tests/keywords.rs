use super::{dataset, review};
use crate::analyses::{AnalysisOptions, common_topics, feature_mentions, issue_mentions};
use crate::lexicon::STOPWORDS;

#[test]
fn test_common_topics_drops_stopwords_and_short_words() {
    let ds = dataset(vec![
        review("a", "Netflix streaming is great, streaming works", "5"),
        review("b", "the app has really good streaming and downloads", "4"),
        review("c", "Downloads fail. App bad", "1"),
    ]);
    let topics = common_topics(&ds, &AnalysisOptions::default())
        .into_ready()
        .unwrap();

    assert_eq!(topics.keywords[0].word, "streaming");
    assert_eq!(topics.keywords[0].count, 3);
    assert_eq!(topics.keywords[1].word, "downloads");

    for kw in &topics.keywords {
        assert!(kw.word.len() >= 4, "{} is too short", kw.word);
        assert!(!STOPWORDS.contains(kw.word.as_str()));
        assert_ne!(kw.word, "netflix");
    }
}

#[test]
fn test_common_topics_caps_at_fifteen() {
    let text = (b'a'..=b'z')
        .map(|c| String::from_utf8(vec![c; 5]).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" ");
    let ds = dataset(vec![review("a", &text, "3")]);
    let topics = common_topics(&ds, &AnalysisOptions::default())
        .into_ready()
        .unwrap();
    assert_eq!(topics.keywords.len(), 15);
    assert_eq!(topics.unique_keywords, 26);
    assert_eq!(topics.keywords[0].word, "aaaaa");
}

#[test]
fn test_issue_mentions_counts_reviews_once() {
    let ds = dataset(vec![
        review("a", "Crash after crash after CRASH", "1"),
        review("b", "constant buffering", "2"),
        review("c", "lovely", "5"),
    ]);
    let issues = issue_mentions(&ds).into_ready().unwrap();

    assert_eq!(issues.total_reviews, 3);
    let crash = issues.mentions.iter().find(|m| m.term == "crash").unwrap();
    assert_eq!(crash.reviews, 1);
    assert!(issues.mentions.iter().all(|m| m.reviews > 0));
    assert!(issues.mentions.iter().any(|m| m.term == "buffering"));
}

#[test]
fn test_feature_mentions_reports_every_group() {
    let ds = dataset(vec![
        review("a", "Chromecast support and cast button", "4"),
        review("b", "too expensive subscription", "2"),
    ]);
    let features = feature_mentions(&ds).into_ready().unwrap();

    let casting = features
        .mentions
        .iter()
        .find(|m| m.term == "casting")
        .unwrap();
    assert_eq!(casting.reviews, 1);
    let pricing = features
        .mentions
        .iter()
        .find(|m| m.term == "pricing")
        .unwrap();
    assert_eq!(pricing.reviews, 1);
    assert_eq!(features.mentions[0].reviews, 1);
}
