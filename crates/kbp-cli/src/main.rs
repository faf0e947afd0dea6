//! KBP CLI - Command-line interface
//!
//! Usage:
//!   kbp evaluate --dir <rules> --test <examples.jsonl> [--predictions stdout|<path>]
//!   kbp classify --dir <rules> --input <inputs.jsonl>
//!   kbp rules --dir <rules>

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kbp_core::{KbpConfig, LoggingConfig};
use kbp_extractor::dataset::{open_predictions, read_dataset, read_inputs};
use kbp_extractor::{RelationExtractor, SemgrexExtractor};

#[derive(Parser)]
#[command(name = "kbp")]
#[command(about = "Rule-based KBP relation classifier")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score the classifier against a labeled dataset
    Evaluate {
        /// Directory of semgrex rule files
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Labeled examples (JSON Lines)
        #[arg(long)]
        test: PathBuf,
        /// Where to write per-example predictions: `stdout` or a file path
        #[arg(long)]
        predictions: Option<String>,
    },
    /// Classify unlabeled inputs
    Classify {
        /// Directory of semgrex rule files
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Inputs (JSON Lines)
        #[arg(long)]
        input: PathBuf,
    },
    /// Show how many rules were loaded per relation
    Rules {
        /// Directory of semgrex rule files
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

impl Commands {
    fn dir(&self) -> Option<&PathBuf> {
        match self {
            Commands::Evaluate { dir, .. }
            | Commands::Classify { dir, .. }
            | Commands::Rules { dir } => dir.as_ref(),
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<KbpConfig> {
    let config = match path {
        Some(path) => KbpConfig::from_file(path.clone())?.with_env_override()?,
        None => KbpConfig::from_env()?,
    };
    Ok(config)
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(logging.include_location)
        .with_line_number(logging.include_location);

    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(dir) = cli.command.dir() {
        config.extractor.rules_dir = dir.clone();
    }
    init_logging(&config.logging);

    let extractor = SemgrexExtractor::from_config(&config.extractor).with_context(|| {
        format!(
            "loading rules from {}",
            config.extractor.rules_dir.display()
        )
    })?;
    tracing::debug!(
        "Loaded {} rules for {} relations",
        extractor.rules().total_patterns(),
        extractor.rules().len()
    );

    match cli.command {
        Commands::Evaluate {
            test, predictions, ..
        } => {
            let examples = read_dataset(&test)?;
            let mut sink = predictions.as_deref().map(open_predictions).transpose()?;
            let evaluation = extractor.compute_accuracy(
                &examples,
                sink.as_mut().map(|out| out.as_mut() as &mut dyn Write),
            )?;
            println!("{}", evaluation.report());
        }
        Commands::Classify { input, .. } => {
            for input in read_inputs(&input)? {
                println!("{}", extractor.classify(&input));
            }
        }
        Commands::Rules { .. } => {
            let rules = extractor.rules();
            for relation in rules.relations() {
                let count = rules.get(relation).map_or(0, <[_]>::len);
                println!("{relation}\t{count}");
            }
            println!(
                "{} relations, {} rules",
                rules.len(),
                rules.total_patterns()
            );
        }
    }

    Ok(())
}
