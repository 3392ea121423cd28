use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::analyses::AnalysisOptions;
use crate::analysis::{AnalysisInput, AnalysisRegistry};
use crate::report;
use crate::router;
use crate::types::Dataset;
use crate::utils::NumberFormatOptions;

const NO_MATCH_HINT: &str =
    "Ask about one of the analyses above, or use words like 'sentiment', 'score' or 'reviewer'.";

/// What the loop should do after a line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// Line-oriented question answering over one loaded dataset.
pub struct ChatSession {
    dataset: Arc<Dataset>,
    registry: Arc<AnalysisRegistry>,
    options: AnalysisOptions,
    format: NumberFormatOptions,
}

impl ChatSession {
    pub fn new(
        dataset: Arc<Dataset>,
        registry: Arc<AnalysisRegistry>,
        options: AnalysisOptions,
        format: NumberFormatOptions,
    ) -> Self {
        Self {
            dataset,
            registry,
            options,
            format,
        }
    }

    fn catalog(&self) -> String {
        report::catalog_text(&self.registry.catalog())
    }

    pub fn respond(&self, line: &str) -> Reply {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "quit" | "exit" => return Reply::Quit,
            "help" | "?" => return Reply::Text(self.catalog()),
            "" => return Reply::Text(String::new()),
            _ => {}
        }

        let Some(name) = router::route(line) else {
            return Reply::Text(format!("{}\n{NO_MATCH_HINT}\n", self.catalog()));
        };
        let Some(analysis) = self.registry.get_by_name(name) else {
            return Reply::Text(format!("Analysis '{name}' is not available\n"));
        };
        debug!("Routed '{line}' to {name}");

        let input = AnalysisInput {
            keyword: (name == "keyword_sentiment_analysis")
                .then(|| router::extract_keyword(line))
                .flatten(),
            ..AnalysisInput::default()
        };
        let result = analysis.run(&self.dataset, &input, &self.options);
        Reply::Text(report::render(&result, &self.format))
    }
}

/// Read questions from stdin until `quit`, `exit` or end of input.
pub async fn run_chat(session: ChatSession) -> Result<()> {
    println!(
        "Loaded {} reviews. Type 'help' for the list of analyses, 'quit' to leave.",
        session.dataset.len()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        match session.respond(&line) {
            Reply::Quit => break,
            Reply::Text(text) if text.is_empty() => {}
            Reply::Text(text) => println!("{text}"),
        }
    }

    Ok(())
}
