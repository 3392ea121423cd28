//! Loads the review export once, preferring the JSON cache snapshot.
//!
//! The cache is a point-in-time copy written after the first successful parse.
//! It is never compared against the source, so a changed export needs
//! [`refresh`] (or a manual delete) before it is picked up.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::types::{Dataset, DatasetOrigin, Review, canonical_fields};

/// Source export and its cache snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub source: PathBuf,
    pub cache: PathBuf,
}

impl DataPaths {
    pub fn new(source: impl Into<PathBuf>, cache: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            cache: cache.into(),
        }
    }

    /// Use the default cache location next to `source`.
    pub fn from_source(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let cache = default_cache_path(&source);
        Self { source, cache }
    }
}

/// `reviews.csv` caches to `reviews_cache.json` in the same directory.
pub fn default_cache_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("reviews");
    source.with_file_name(format!("{stem}_cache.json"))
}

/// Load the dataset and hand out the shared handle used by every adapter.
pub fn init(paths: &DataPaths) -> Arc<Dataset> {
    Arc::new(load(paths))
}

/// Delete the cache snapshot so the next load re-parses the source.
pub fn refresh(paths: &DataPaths) -> Result<()> {
    if paths.cache.exists() {
        fs::remove_file(&paths.cache)
            .with_context(|| format!("Failed to remove cache {}", paths.cache.display()))?;
        info!("Removed cache snapshot {}", paths.cache.display());
    }
    Ok(())
}

/// Load reviews from the cache if present, otherwise from the source export.
///
/// Never fails: a missing source with no cache yields an empty dataset.
pub fn load(paths: &DataPaths) -> Dataset {
    let started = Instant::now();

    if paths.cache.exists() {
        match read_cache(&paths.cache) {
            Ok(reviews) => {
                info!(
                    rows = reviews.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Loaded reviews from cache {}",
                    paths.cache.display()
                );
                return Dataset::from_reviews(reviews, DatasetOrigin::Cache);
            }
            Err(e) => warn!("Ignoring unreadable cache: {e:#}"),
        }
    }

    let (fields, reviews) = match parse_source(&paths.source) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("No review data loaded: {e:#}");
            return Dataset::empty();
        }
    };

    if let Err(e) = write_cache(&paths.cache, &reviews) {
        warn!("Could not write cache snapshot: {e:#}");
    }

    info!(
        rows = reviews.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Parsed reviews from {}",
        paths.source.display()
    );

    Dataset {
        reviews,
        loaded_at: Utc::now(),
        origin: DatasetOrigin::Source,
        fields,
    }
}

fn read_cache(path: &Path) -> Result<Vec<Review>> {
    let mut bytes =
        fs::read(path).with_context(|| format!("Failed to read cache {}", path.display()))?;
    simd_json::from_slice(&mut bytes)
        .with_context(|| format!("Failed to parse cache {}", path.display()))
}

fn write_cache(path: &Path, reviews: &[Review]) -> Result<()> {
    let bytes = simd_json::to_vec(reviews).context("Failed to serialize reviews")?;
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote cache snapshot {}", path.display());
    Ok(())
}

fn parse_source(path: &Path) -> Result<(Vec<String>, Vec<Review>)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    // Excel exports prefix the first header with a BOM.
    let headers: StringRecord = reader
        .headers()
        .with_context(|| format!("Failed to read header row of {}", path.display()))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect();

    let fields = if headers.is_empty() {
        canonical_fields()
    } else {
        headers.iter().map(str::to_string).collect()
    };

    let mut reviews = Vec::new();
    let mut skipped = 0usize;

    for (idx, record) in reader.records().enumerate() {
        let parsed = record
            .map_err(anyhow::Error::from)
            .and_then(|r| r.deserialize::<Review>(Some(&headers)).map_err(Into::into));
        match parsed {
            Ok(review) => reviews.push(review),
            Err(e) => {
                skipped += 1;
                // +2: one for the header row, one for 1-based line numbers
                debug!(line = idx + 2, "Skipping malformed row: {e}");
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {skipped} malformed rows in {}", path.display());
    }

    Ok((fields, reviews))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
reviewId,userName,content,score,thumbsUpCount,reviewCreatedVersion,at,appVersion
r1,Ana,I love the new cast feature,5,3,8.1.0,2024-03-01 10:00:00,8.1.0
r2,Ben,\"Crashes, again\",1,0,8.0.0,2024-03-02 11:00:00,8.0.0
r3,,,N/A,x,,,
";

    fn write_source(dir: &TempDir, body: &str) -> DataPaths {
        let source = dir.path().join("reviews.csv");
        fs::write(&source, body).expect("write csv");
        DataPaths::from_source(source)
    }

    #[test]
    fn default_cache_sits_next_to_source() {
        let paths = DataPaths::from_source("/data/netflix_data.csv");
        assert_eq!(paths.cache, PathBuf::from("/data/netflix_data_cache.json"));
    }

    #[test]
    fn parses_source_and_writes_cache() {
        let dir = TempDir::new().expect("tempdir");
        let paths = write_source(&dir, SAMPLE);

        let dataset = load(&paths);
        assert_eq!(dataset.origin, DatasetOrigin::Source);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.fields.len(), 8);
        assert_eq!(dataset.reviews[1].content.as_deref(), Some("Crashes, again"));
        assert_eq!(dataset.reviews[2].score.as_deref(), Some("N/A"));
        assert_eq!(dataset.reviews[2].user_name, None);
        assert!(paths.cache.exists(), "cache should be written on first parse");
    }

    #[test]
    fn cache_round_trip_matches_source_parse() {
        let dir = TempDir::new().expect("tempdir");
        let paths = write_source(&dir, SAMPLE);

        let from_source = load(&paths);
        let from_cache = load(&paths);

        assert_eq!(from_cache.origin, DatasetOrigin::Cache);
        assert_eq!(from_source.reviews, from_cache.reviews);
    }

    #[test]
    fn cache_is_preferred_even_when_source_changes() {
        let dir = TempDir::new().expect("tempdir");
        let paths = write_source(&dir, SAMPLE);
        load(&paths);

        fs::write(&paths.source, "reviewId,content\nz,changed\n").expect("rewrite");
        let dataset = load(&paths);
        assert_eq!(dataset.origin, DatasetOrigin::Cache);
        assert_eq!(dataset.len(), 3);

        refresh(&paths).expect("refresh");
        let dataset = load(&paths);
        assert_eq!(dataset.origin, DatasetOrigin::Source);
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn missing_source_without_cache_is_empty() {
        let dir = TempDir::new().expect("tempdir");
        let paths = DataPaths::from_source(dir.path().join("absent.csv"));

        let dataset = load(&paths);
        assert!(dataset.is_empty());
        assert_eq!(dataset.origin, DatasetOrigin::Empty);
        assert!(!paths.cache.exists());
    }

    #[test]
    fn corrupt_cache_falls_back_to_source() {
        let dir = TempDir::new().expect("tempdir");
        let paths = write_source(&dir, SAMPLE);
        fs::write(&paths.cache, b"{not json").expect("write junk");

        let dataset = load(&paths);
        assert_eq!(dataset.origin, DatasetOrigin::Source);
        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn header_order_and_bom_do_not_matter() {
        let dir = TempDir::new().expect("tempdir");
        let paths = write_source(
            &dir,
            "\u{feff}score,content,userName,extra\n4,fine app,Cy,ignored\n",
        );

        let dataset = load(&paths);
        assert_eq!(dataset.len(), 1);
        let review = &dataset.reviews[0];
        assert_eq!(review.score.as_deref(), Some("4"));
        assert_eq!(review.user_name.as_deref(), Some("Cy"));
        assert_eq!(review.review_id, None);
        assert_eq!(dataset.fields[0], "score");
    }
}
