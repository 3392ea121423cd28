use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use analyses::{
    CommonTopicsAnalysis, CompletenessAnalysis, ContentLengthAnalysis, FeatureMentionsAnalysis,
    IssueMentionsAnalysis, KeywordSentimentAnalysis, LengthByRatingAnalysis,
    RatingByVersionAnalysis, RatingSentimentAnalysis, ReviewTrendsAnalysis,
    ScoreDistributionAnalysis, SentimentAnalysis, SummaryReportAnalysis, ThumbsUpAnalysis,
    TopReviewersAnalysis, TrendPeriod, UserEngagementAnalysis, VersionAnalysis,
};
use analysis::{AnalysisInput, AnalysisRegistry, AnalysisReport};
use types::DatasetOrigin;

mod analyses;
mod analysis;
mod chat;
mod coerce;
mod config;
mod dataset;
mod lexicon;
mod logging;
mod mcp;
mod report;
mod router;
mod schema;
mod types;
mod utils;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "reviewscope")]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Review export to analyze (overrides `data.source`)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Cache snapshot location (overrides `data.cache`)
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Use comma-separated number formatting
    #[arg(long, global = true)]
    number_comma: bool,

    /// Use human-readable number formatting (k, m, b, t)
    #[arg(short = 'H', long, global = true)]
    number_human: bool,

    /// Locale for number formatting (en, de, fr, es, it, ja, ko, zh)
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Number of decimal places for means and human-readable numbers
    #[arg(long, global = true)]
    decimal_places: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as an MCP (Model Context Protocol) server over stdio
    Mcp,
    /// Ask questions about the reviews in the terminal
    Chat,
    /// Run one analysis and print its report
    Run(RunArgs),
    /// Output every analysis as JSON
    Stats(StatsArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Analysis name, as listed by `reviewscope run list`
    analysis: String,

    /// How many entries to return (top_reviewers, review_trends)
    #[arg(long)]
    limit: Option<usize>,

    /// Keyword for keyword_sentiment_analysis
    #[arg(long)]
    keyword: Option<String>,

    /// Trend bucket: day or month
    #[arg(long)]
    period: Option<String>,

    /// Print the result as JSON instead of a text report
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Delete the cache snapshot and re-read the source first
    #[arg(long, default_value_t = false)]
    refresh: bool,
}

#[derive(Args)]
struct StatsArgs {
    /// Pretty-print JSON instead of a single line
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    subcommand: ConfigSubcommands,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Create default configuration file
    Init {
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key (data-source, data-cache, top-k, default-keyword, trend-period,
        /// trend-periods, number-comma, number-human, locale, decimal-places, log-level)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Config commands must work even when the file on disk does not parse.
    let command = match cli.command {
        Commands::Config(config_args) => {
            handle_config_subcommand(config_args).await;
            return;
        }
        other => other,
    };

    let config = match config::Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {e:#}");
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(&config.logging.level) {
        eprintln!("Error setting up logging: {e:#}");
    }

    // Create format options merging config defaults with CLI overrides
    let config_format = config.number_format();
    let format_options = utils::NumberFormatOptions {
        use_comma: cli.number_comma || config_format.use_comma,
        use_human: cli.number_human || config_format.use_human,
        locale: cli.locale.unwrap_or(config_format.locale),
        decimal_places: cli.decimal_places.unwrap_or(config_format.decimal_places),
    };
    let paths = config.data_paths(cli.data.as_deref(), cli.cache.as_deref());
    let options = config.analysis_options();

    match command {
        Commands::Mcp => {
            let dataset = dataset::init(&paths);
            let registry = Arc::new(create_analysis_registry());
            if let Err(e) = mcp::run_mcp_server(dataset, registry, options, format_options).await {
                eprintln!("MCP server error: {e:#}");
                std::process::exit(1);
            }
        }
        Commands::Chat => {
            let session = chat::ChatSession::new(
                dataset::init(&paths),
                Arc::new(create_analysis_registry()),
                options,
                format_options,
            );
            if let Err(e) = chat::run_chat(session).await {
                eprintln!("Chat error: {e:#}");
                std::process::exit(1);
            }
        }
        Commands::Run(args) => {
            if let Err(e) = run_analysis(args, &paths, &options, &format_options) {
                eprintln!("Error running analysis: {e:#}");
                std::process::exit(1);
            }
        }
        Commands::Stats(args) => {
            if let Err(e) = run_stats(args, &paths, &options) {
                eprintln!("Error generating JSON stats: {e:#}");
                std::process::exit(1);
            }
        }
        Commands::Config(_) => {}
    }
}

pub fn create_analysis_registry() -> AnalysisRegistry {
    let mut registry = AnalysisRegistry::new();

    // Catalog order
    registry.register(ScoreDistributionAnalysis);
    registry.register(SentimentAnalysis);
    registry.register(TopReviewersAnalysis);
    registry.register(VersionAnalysis);
    registry.register(ThumbsUpAnalysis);
    registry.register(ContentLengthAnalysis);
    registry.register(CommonTopicsAnalysis);
    registry.register(RatingByVersionAnalysis);
    registry.register(ReviewTrendsAnalysis);
    registry.register(UserEngagementAnalysis);
    registry.register(CompletenessAnalysis);
    registry.register(KeywordSentimentAnalysis);
    registry.register(RatingSentimentAnalysis);
    registry.register(LengthByRatingAnalysis);
    registry.register(IssueMentionsAnalysis);
    registry.register(FeatureMentionsAnalysis);
    registry.register(SummaryReportAnalysis);

    registry
}

/// Unknown period names fall back to the configured period.
fn parse_period(raw: Option<&str>) -> Option<TrendPeriod> {
    let raw = raw?;
    match raw.parse() {
        Ok(period) => Some(period),
        Err(e) => {
            tracing::warn!("{e:#}");
            None
        }
    }
}

fn run_analysis(
    args: RunArgs,
    paths: &dataset::DataPaths,
    options: &analyses::AnalysisOptions,
    format_options: &utils::NumberFormatOptions,
) -> Result<()> {
    let registry = create_analysis_registry();

    if args.analysis.eq_ignore_ascii_case("list") {
        print!("{}", report::catalog_text(&registry.catalog()));
        return Ok(());
    }

    let analysis = registry.get_by_name(&args.analysis).with_context(|| {
        let names: Vec<_> = registry.catalog().iter().map(|e| e.name).collect();
        format!(
            "Unknown analysis '{}'. Available: {}",
            args.analysis,
            names.join(", ")
        )
    })?;

    if args.refresh {
        dataset::refresh(paths)?;
    }
    let dataset = dataset::init(paths);

    let input = AnalysisInput {
        limit: args.limit,
        keyword: args.keyword,
        period: parse_period(args.period.as_deref()),
    };
    let result = analysis.run(&dataset, &input, options);

    if args.json {
        let json = simd_json::to_string_pretty(&result)?;
        println!("{json}");
    } else {
        print!("{}", report::render(&result, format_options));
    }

    Ok(())
}

#[derive(Serialize)]
struct StatsOutput {
    total_reviews: usize,
    origin: DatasetOrigin,
    loaded_at: chrono::DateTime<chrono::Utc>,
    analyses: BTreeMap<&'static str, AnalysisReport>,
}

fn run_stats(
    args: StatsArgs,
    paths: &dataset::DataPaths,
    options: &analyses::AnalysisOptions,
) -> Result<()> {
    let registry = create_analysis_registry();
    let dataset = dataset::init(paths);

    let output = StatsOutput {
        total_reviews: dataset.len(),
        origin: dataset.origin,
        loaded_at: dataset.loaded_at,
        analyses: registry.run_all(&dataset, options).into_iter().collect(),
    };

    if args.pretty {
        let json = simd_json::to_string_pretty(&output)?;
        println!("{json}");
    } else {
        let json = simd_json::to_string(&output)?;
        println!("{json}");
    }

    Ok(())
}

async fn handle_config_subcommand(config_args: ConfigArgs) {
    match config_args.subcommand {
        ConfigSubcommands::Init { overwrite } => {
            if let Err(e) = config::create_default_config(overwrite) {
                eprintln!("Error creating config: {e}");
                std::process::exit(1);
            }
        }
        ConfigSubcommands::Show => {
            if let Err(e) = config::show_config() {
                eprintln!("Error showing config: {e:#}");
                std::process::exit(1);
            }
        }
        ConfigSubcommands::Set { key, value } => {
            if let Err(e) = config::set_config_value(&key, &value) {
                eprintln!("Error setting config: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_in_catalog_order() {
        let catalog = create_analysis_registry().catalog();
        assert_eq!(catalog.first().map(|e| e.name), Some("review_score_distribution"));
        assert_eq!(catalog[11].name, "keyword_sentiment_analysis");
        assert_eq!(catalog.last().map(|e| e.name), Some("summary_report"));
    }

    #[test]
    fn run_command_parses_arguments() {
        let cli = Cli::try_parse_from([
            "reviewscope",
            "--data",
            "reviews.csv",
            "run",
            "top_reviewers",
            "--limit",
            "5",
            "--json",
        ])
        .expect("valid arguments");

        assert_eq!(cli.data, Some(PathBuf::from("reviews.csv")));
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.analysis, "top_reviewers");
                assert_eq!(args.limit, Some(5));
                assert!(args.json);
                assert!(!args.refresh);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn unknown_period_falls_back() {
        assert_eq!(parse_period(Some("month")), Some(TrendPeriod::Month));
        assert_eq!(parse_period(Some("weekly")), None);
        assert_eq!(parse_period(None), None);
    }
}
