use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyses::{AnalysisOptions, TrendPeriod};
use crate::dataset::DataPaths;
use crate::utils::NumberFormatOptions;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub analysis: AnalysisConfig,
    pub formatting: FormattingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub source: String,
    /// Empty means `<source stem>_cache.json` next to the source
    pub cache: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    pub top_k: usize,
    pub default_keyword: String,
    pub trend_period: TrendPeriod,
    pub trend_periods: usize,
    pub sample_reviews: usize,
    pub sample_chars: usize,
    pub extra_stopwords: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FormattingConfig {
    pub number_comma: bool,
    pub number_human: bool,
    pub locale: String,
    pub decimal_places: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: "netflix_data.csv".to_string(),
            cache: "".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let options = AnalysisOptions::default();
        Self {
            top_k: options.top_k,
            default_keyword: options.default_keyword,
            trend_period: options.trend_period,
            trend_periods: options.trend_periods,
            sample_reviews: options.sample_reviews,
            sample_chars: options.sample_chars,
            extra_stopwords: options.extra_stopwords,
        }
    }
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            number_comma: false,
            number_human: false,
            locale: "en".to_string(),
            decimal_places: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

thread_local! {
    static TEST_CONFIG_PATH: RefCell<Option<PathBuf>> = const { RefCell::new(None) };
}

#[cfg(test)]
pub fn set_test_config_path(path: PathBuf) {
    TEST_CONFIG_PATH.with(|p| *p.borrow_mut() = Some(path));
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(test)]
        {
            if let Some(path) = TEST_CONFIG_PATH.with(|p| p.borrow().clone()) {
                return Ok(path);
            }
        }

        Ok(dirs::home_dir()
            .context("Could not find home directory")?
            .join(".reviewscope.toml"))
    }

    pub fn load() -> Result<Option<Config>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(Some(config))
    }

    /// The saved config, or defaults when none has been written yet.
    pub fn load_or_default() -> Result<Config> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save(&self, silent: bool) -> Result<()> {
        let config_path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, content).context("Failed to write config file")?;

        if !silent {
            println!("✅ Configuration saved to: {}", config_path.display());
        }

        Ok(())
    }

    /// Resolve the data paths, letting command-line overrides win.
    pub fn data_paths(&self, source: Option<&Path>, cache: Option<&Path>) -> DataPaths {
        let source = source
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&self.data.source));
        let cache = cache.map(Path::to_path_buf).or_else(|| {
            (!self.data.cache.trim().is_empty()).then(|| PathBuf::from(&self.data.cache))
        });

        match cache {
            Some(cache) => DataPaths::new(source, cache),
            None => DataPaths::from_source(source),
        }
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        let a = &self.analysis;
        AnalysisOptions {
            top_k: a.top_k.max(1),
            default_keyword: a.default_keyword.clone(),
            trend_period: a.trend_period,
            trend_periods: a.trend_periods.max(1),
            sample_reviews: a.sample_reviews,
            sample_chars: a.sample_chars,
            extra_stopwords: a.extra_stopwords.clone(),
        }
    }

    pub fn number_format(&self) -> NumberFormatOptions {
        NumberFormatOptions {
            use_comma: self.formatting.number_comma,
            use_human: self.formatting.number_human,
            locale: self.formatting.locale.clone(),
            decimal_places: self.formatting.decimal_places,
        }
    }
}

// CLI helper functions
pub fn create_default_config(overwrite: bool) -> Result<()> {
    let config = Config::default();
    if !std::fs::exists(Config::config_path()?)? || overwrite {
        config.save(true)?;

        println!("📝 Created default configuration file.");
        println!("📍 Point it at your review export with:");
        println!("   reviewscope config set data-source ./reviews.csv");
        println!("or");
        println!("   {}", Config::config_path()?.display());
    } else {
        println!("Configuration already exists.  Pass `--overwrite` to overwrite.");
    }

    Ok(())
}

pub fn show_config() -> Result<()> {
    match Config::load()? {
        Some(config) => {
            let paths = config.data_paths(None, None);
            println!("🔧 Current configuration:");
            println!("   Data Source: {}", paths.source.display());
            println!("   Data Cache: {}", paths.cache.display());
            println!("   Top K: {}", config.analysis.top_k);
            println!("   Default Keyword: {}", config.analysis.default_keyword);
            println!("   Trend Period: {}", config.analysis.trend_period.as_str());
            println!("   Trend Periods: {}", config.analysis.trend_periods);
            println!(
                "   Extra Stopwords: {}",
                config.analysis.extra_stopwords.join(", ")
            );
            println!("   Number Comma: {}", config.formatting.number_comma);
            println!("   Number Human: {}", config.formatting.number_human);
            println!("   Locale: {}", config.formatting.locale);
            println!("   Decimal Places: {}", config.formatting.decimal_places);
            println!("   Log Level: {}", config.logging.level);
        }
        None => {
            println!("❌ No configuration file found.");
            println!("   Run 'reviewscope config init' to create one.");
        }
    }
    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    value
        .parse::<bool>()
        .context("Invalid boolean value. Use 'true' or 'false'")
}

fn parse_positive(value: &str) -> Result<usize> {
    let n = value.parse::<usize>().context("Invalid number value")?;
    if n == 0 {
        anyhow::bail!("Value must be greater than zero");
    }
    Ok(n)
}

pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default()?;

    match key {
        "data-source" => config.data.source = value.to_string(),
        "data-cache" => config.data.cache = value.to_string(),
        "top-k" => config.analysis.top_k = parse_positive(value)?,
        "default-keyword" => {
            if value.trim().is_empty() {
                anyhow::bail!("Default keyword cannot be empty");
            }
            config.analysis.default_keyword = value.trim().to_string();
        }
        "trend-period" => config.analysis.trend_period = value.parse()?,
        "trend-periods" => config.analysis.trend_periods = parse_positive(value)?,
        "number-comma" => config.formatting.number_comma = parse_bool(value)?,
        "number-human" => config.formatting.number_human = parse_bool(value)?,
        "locale" => {
            config.formatting.locale = value.to_string();
        }
        "decimal-places" => {
            let places = value.parse::<usize>().context("Invalid number value")?;
            config.formatting.decimal_places = places;
        }
        "log-level" => config.logging.level = value.to_string(),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }

    config.save(false)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_config() -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("tempdir");
        let config_path = dir.path().join(".reviewscope.toml");
        set_test_config_path(config_path.clone());
        (dir, config_path)
    }

    #[test]
    fn default_config_round_trip() {
        let (_dir, _path) = setup_test_config();
        create_default_config(true).expect("create_default_config");

        let loaded = Config::load()
            .expect("load config")
            .expect("config should exist");

        assert_eq!(loaded.data.source, "netflix_data.csv");
        assert_eq!(loaded.data.cache, "");
        assert_eq!(loaded.analysis.top_k, 10);
        assert_eq!(loaded.analysis.trend_period, TrendPeriod::Day);
        assert_eq!(loaded.analysis.extra_stopwords, vec!["netflix".to_string()]);
        assert_eq!(loaded.formatting.locale, "en");
        assert_eq!(loaded.logging.level, "info");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let (_dir, path) = setup_test_config();
        fs::write(&path, "[analysis]\ntop_k = 3\n").expect("write config");

        let loaded = Config::load_or_default().expect("load config");
        assert_eq!(loaded.analysis.top_k, 3);
        assert_eq!(loaded.analysis.default_keyword, "netflix");
        assert_eq!(loaded.data.source, "netflix_data.csv");
    }

    #[test]
    fn missing_config_loads_defaults() {
        let (_dir, _path) = setup_test_config();
        assert!(Config::load().expect("load config").is_none());
        let options = Config::load_or_default()
            .expect("defaults")
            .analysis_options();
        assert_eq!(options, AnalysisOptions::default());
    }

    #[test]
    fn set_config_value_behaviour() {
        let (_dir, _path) = setup_test_config();
        create_default_config(true).expect("create_default_config");

        set_config_value("data-source", "reviews.csv").expect("set data-source");
        set_config_value("top-k", "5").expect("set top-k");
        set_config_value("default-keyword", "download").expect("set default-keyword");
        set_config_value("trend-period", "monthly").expect("set trend-period");
        set_config_value("trend-periods", "6").expect("set trend-periods");
        set_config_value("number-comma", "true").expect("set number-comma");
        set_config_value("locale", "de").expect("set locale");
        set_config_value("decimal-places", "3").expect("set decimal-places");
        set_config_value("log-level", "debug").expect("set log-level");

        let cfg = Config::load()
            .expect("load config")
            .expect("config should exist");

        assert_eq!(cfg.data.source, "reviews.csv");
        assert_eq!(cfg.analysis.top_k, 5);
        assert_eq!(cfg.analysis.default_keyword, "download");
        assert_eq!(cfg.analysis.trend_period, TrendPeriod::Month);
        assert_eq!(cfg.analysis.trend_periods, 6);
        assert!(cfg.formatting.number_comma);
        assert_eq!(cfg.formatting.locale, "de");
        assert_eq!(cfg.formatting.decimal_places, 3);
        assert_eq!(cfg.logging.level, "debug");

        let err = set_config_value("unknown-key", "value").unwrap_err();
        let msg = format!("{err}");
        assert!(
            msg.contains("Unknown config key"),
            "unexpected error message: {msg}"
        );
        let err = set_config_value("number-human", "not-a-bool").unwrap_err();
        let msg = format!("{err}");
        assert!(
            msg.contains("Invalid boolean value"),
            "unexpected error message: {msg}"
        );
        assert!(set_config_value("top-k", "0").is_err());
        assert!(set_config_value("trend-period", "weekly").is_err());
    }

    #[test]
    fn data_paths_precedence() {
        let mut config = Config::default();
        let paths = config.data_paths(None, None);
        assert_eq!(paths.source, PathBuf::from("netflix_data.csv"));
        assert_eq!(paths.cache, PathBuf::from("netflix_data_cache.json"));

        config.data.cache = "snap.json".to_string();
        let paths = config.data_paths(Some(Path::new("other.csv")), None);
        assert_eq!(paths.source, PathBuf::from("other.csv"));
        assert_eq!(paths.cache, PathBuf::from("snap.json"));

        let paths = config.data_paths(None, Some(Path::new("cli.json")));
        assert_eq!(paths.cache, PathBuf::from("cli.json"));
    }
}
