// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::sync::Arc;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use serde_json::json;

use glossalign::analysis::interlinear;
use glossalign::app_config::{self, Config};
use glossalign::file_utils::FileManager;
use glossalign::{AppError, BatchProcessor, BatchReport, WhatlangDetector};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the structural fingerprint of each document
    Fingerprint {
        /// Annotation files or directories to search for .eaf files
        #[arg(value_name = "INPUT_PATH", required = true)]
        inputs: Vec<PathBuf>,

        /// Render time subdivisions and inclusions as symbolic subdivisions
        #[arg(long)]
        lump: bool,
    },

    /// Export interlinear glossed text as CSV, one file per document
    Export {
        /// Annotation files or directories to search for .eaf files
        #[arg(value_name = "INPUT_PATH", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (defaults to each document's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tier ID to use as gloss tier whenever a document has it
        #[arg(long)]
        gloss_tier: Option<String>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Print the tier roles of each document as JSON
    Roles {
        /// Annotation files or directories to search for .eaf files
        #[arg(value_name = "INPUT_PATH", required = true)]
        inputs: Vec<PathBuf>,

        /// Include the annotation text maps of every role tier
        #[arg(long)]
        maps: bool,
    },

    /// Print tier statistics of each document as JSON
    Stats {
        /// Annotation files or directories to search for .eaf files
        #[arg(value_name = "INPUT_PATH", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Generate shell completions for glossalign
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// glossalign - interlinear glossed text from ELAN annotation files
#[derive(Parser, Debug)]
#[command(name = "glossalign")]
#[command(version)]
#[command(about = "Interlinear glossed text extraction from ELAN annotation files")]
#[command(long_about = "glossalign reads ELAN (.eaf) annotation files, works out which tiers hold the
transcription, translation, glosses and comments, and exports aligned interlinear text.

EXAMPLES:
    glossalign fingerprint corpus/                 # Tier structure of every document
    glossalign fingerprint --lump story.eaf        # Lumped fingerprint
    glossalign export -o out/ corpus/              # CSV export, one file per document
    glossalign export --gloss-tier gl@A story.eaf  # Force the gloss tier
    glossalign roles --maps story.eaf              # Tier roles with their texts
    glossalign --log-level debug stats corpus/     # Statistics with debug logging
    glossalign completions bash > glossalign.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Number of documents processed concurrently
    #[arg(short, long, global = true)]
    jobs: Option<usize>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // The max level is lowered once the config is read
        metadata.level() <= self.level.min(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Accept every level here; the effective level is set once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "glossalign", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let jobs = cli.jobs.unwrap_or(config.batch.jobs);

    match cli.command {
        Commands::Fingerprint { inputs, lump } => run_fingerprint(config, jobs, &inputs, lump).await,
        Commands::Export { inputs, output, gloss_tier, force_overwrite } => {
            run_export(config, jobs, &inputs, output, gloss_tier, force_overwrite).await
        }
        Commands::Roles { inputs, maps } => run_roles(config, jobs, &inputs, maps).await,
        Commands::Stats { inputs } => run_stats(config, jobs, &inputs).await,
        Commands::Completions { .. } => Ok(()),
    }
}

// Load or create the configuration, then apply the log level
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = Path::new(&cli.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", cli.config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    config
        .validate()
        .map_err(|e| AppError::Config(format!("{:#}", e)))
        .context("Configuration validation failed")?;

    Ok(config)
}

fn processor(config: Config, jobs: usize) -> BatchProcessor {
    BatchProcessor::new(config, Arc::new(WhatlangDetector))
        .with_jobs(jobs)
        .with_progress(true)
}

fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let documents = FileManager::collect_documents(inputs)?;
    if documents.is_empty() {
        return Err(anyhow!("No .eaf files found in {:?}", inputs));
    }
    Ok(documents)
}

// Fail the run when any document failed, after everything else was reported
fn finish<T>(report: &BatchReport<T>) -> Result<()> {
    if report.is_clean() {
        return Ok(());
    }
    Err(anyhow!(
        "{} of {} documents failed",
        report.failures.len(),
        report.total()
    ))
}

async fn run_fingerprint(mut config: Config, jobs: usize, inputs: &[PathBuf], lump: bool) -> Result<()> {
    let documents = collect_inputs(inputs)?;
    config.fingerprint.lumped |= lump;

    let report = processor(config, jobs)
        .run(&documents, |analysis| Ok(analysis.fingerprint().to_string()))
        .await;

    for (path, fingerprint) in &report.successes {
        println!("{}\t{}", path.display(), fingerprint);
    }
    finish(&report)
}

async fn run_export(
    mut config: Config,
    jobs: usize,
    inputs: &[PathBuf],
    output: Option<PathBuf>,
    gloss_tier: Option<String>,
    force_overwrite: bool,
) -> Result<()> {
    let documents = collect_inputs(inputs)?;
    if gloss_tier.is_some() {
        config.alignment.gloss_tier_override = gloss_tier;
    }
    if let Some(dir) = &output {
        FileManager::ensure_dir(dir)?;
    }

    let report = processor(config, jobs)
        .run(&documents, move |analysis| {
            let input = &analysis.document().source().path;
            let output_dir = match &output {
                Some(dir) => dir.clone(),
                None => input.parent().unwrap_or(Path::new(".")).to_path_buf(),
            };
            let output_file = FileManager::generate_output_path(input, &output_dir, "csv");

            if output_file.exists() && !force_overwrite {
                warn!("Output file already exists: {:?}. Use -f to force overwrite.", output_file);
                return Ok(None);
            }

            let lines = analysis.interlinear_lines();
            interlinear::write_csv_file(&lines, &output_file)?;
            Ok(Some((output_file, lines.len())))
        })
        .await;

    for (_, written) in &report.successes {
        if let Some((output_file, count)) = written {
            info!("Success: {:?} ({} lines)", output_file, count);
        }
    }
    finish(&report)
}

async fn run_roles(config: Config, jobs: usize, inputs: &[PathBuf], maps: bool) -> Result<()> {
    let documents = collect_inputs(inputs)?;

    let report = processor(config, jobs)
        .run(&documents, move |analysis| {
            let roles: serde_json::Map<String, serde_json::Value> = analysis
                .assignments()
                .into_iter()
                .map(|(tier, role)| (tier, json!(role)))
                .collect();

            let mut entry = json!({
                "document": analysis.document().identifier(),
                "roles": roles,
            });
            if maps {
                entry["maps"] = serde_json::to_value(analysis.role_maps())?;
            }
            Ok(entry)
        })
        .await;

    let entries: Vec<_> = report.successes.iter().map(|(_, entry)| entry).collect();
    println!("{}", serde_json::to_string_pretty(&entries).context("Failed to serialize roles")?);
    finish(&report)
}

async fn run_stats(config: Config, jobs: usize, inputs: &[PathBuf]) -> Result<()> {
    let documents = collect_inputs(inputs)?;

    let report = processor(config, jobs)
        .run(&documents, |analysis| Ok(analysis.stats()))
        .await;

    let stats: Vec<_> = report.successes.iter().map(|(_, stats)| stats).collect();
    println!("{}", serde_json::to_string_pretty(&stats).context("Failed to serialize statistics")?);
    finish(&report)
}
