//! fraudprep CLI Module
//!
//! Command-line glue: load a table, optionally derive the fraud label and
//! split, then clean and balance it.

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::preprocessing::{clean, summarize, CleaningConfig, PipelineStep, DEFAULT_LABEL_COLUMN};
use crate::synthetic::{class_counts, ClassCounts, RandomOverSampler, Sampler};
use crate::utils::{
    matrix_to_frame, train_test_split, DataLoader, DataSaver, DEFAULT_SPLIT_SEED,
    DEFAULT_TRAIN_FRACTION,
};

/// Account types counted as fraud when deriving the label
pub const FRAUD_ACCOUNT_TYPES: [&str; 3] = ["fraudster_event", "fraudster", "fraudster_att"];

/// Rows read to infer CSV column types unless overridden
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 100;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn kv(key: &str, val: &str) {
    println!("  {:<18} {}", muted(key), val.white());
}

fn describe_counts(counts: &ClassCounts) -> String {
    let share = counts
        .positive_proportion()
        .map(|p| format!("{:.1}%", p * 100.0))
        .unwrap_or_else(|| "n/a".to_string());
    format!("{} positive / {} negative ({})", counts.positive, counts.negative, share)
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "fraudprep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Feature cleaning and class balancing for fraud/churn models")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a table and oversample the positive class
    Clean(CleanArgs),

    /// Show columns, dtypes and missing counts of a table
    Info {
        /// Input data file (JSON, JSON lines or CSV)
        #[arg(short, long)]
        data: PathBuf,

        /// Rows read to infer CSV column types
        #[arg(long, default_value_t = DEFAULT_INFER_SCHEMA_LENGTH)]
        infer_schema_length: usize,
    },
}

/// Which part of the train/test split to clean
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SplitPart {
    Train,
    Test,
    None,
}

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    /// Input data file (JSON, JSON lines or CSV)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Cleaning configuration (JSON); defaults to the fraud schema
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use the ride-sharing churn schema instead of the fraud schema
    #[arg(long, conflicts_with = "config")]
    pub churn: bool,

    /// Derive the `fraud` label from this account-type column
    #[arg(long)]
    pub fraud_label_from: Option<String>,

    /// Part of the split to clean
    #[arg(long, value_enum, default_value = "train")]
    pub split: SplitPart,

    /// Fraction of rows in the training part
    #[arg(long, default_value_t = DEFAULT_TRAIN_FRACTION)]
    pub train_fraction: f64,

    /// Seed of the train/test split
    #[arg(long, default_value_t = DEFAULT_SPLIT_SEED)]
    pub split_seed: u64,

    /// Override the target positive proportion
    #[arg(long)]
    pub target_proportion: Option<f64>,

    /// Seed for oversampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Drop reference dummies and standardize the scale columns
    #[arg(long)]
    pub regression: bool,

    /// Write the balanced matrix and labels to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rows read to infer CSV column types
    #[arg(long, default_value_t = DEFAULT_INFER_SCHEMA_LENGTH)]
    pub infer_schema_length: usize,
}

impl CleanArgs {
    /// Resolve the configuration from file, preset and overrides
    pub fn resolve_config(&self) -> anyhow::Result<CleaningConfig> {
        let mut config = match (&self.config, self.churn) {
            (Some(path), _) => CleaningConfig::from_json_file(path)?,
            (None, true) => CleaningConfig::churn(),
            (None, false) => CleaningConfig::default(),
        };

        if let Some(tp) = self.target_proportion {
            config.target_proportion = tp;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.regression {
            config.regression = true;
        }
        if let Some(source) = &self.fraud_label_from {
            config.pre_steps.push(PipelineStep::DeriveLabelFromMembership {
                source: source.clone(),
                positives: FRAUD_ACCOUNT_TYPES.iter().map(|s| s.to_string()).collect(),
                label: DEFAULT_LABEL_COLUMN.to_string(),
            });
        }

        config.validate()?;
        Ok(config)
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_clean(args: &CleanArgs) -> anyhow::Result<()> {
    section("Clean");

    let config = args.resolve_config()?;

    step_run("Loading data");
    let start = Instant::now();
    let df = DataLoader::new()
        .with_infer_schema_length(args.infer_schema_length)
        .load_auto(&args.data)?;
    step_done(&format!("{} rows × {} cols in {:?}", df.height(), df.width(), start.elapsed()));

    let df = match args.split {
        SplitPart::None => df,
        part => {
            let (train, test) = train_test_split(&df, args.train_fraction, args.split_seed)?;
            if part == SplitPart::Train { train } else { test }
        }
    };

    if !config.pre_steps.is_empty() {
        let names: Vec<&str> = config.pre_steps.steps().iter().map(|step| step.name()).collect();
        kv("Pre-steps", &names.join(" → "));
    }

    step_run("Cleaning");
    let start = Instant::now();
    let (x, y) = clean(&df, &config)?;
    step_done(&format!("{} rows × {} features in {:?}", x.nrows(), x.ncols(), start.elapsed()));
    let before = class_counts(&y)?;

    let sampler = RandomOverSampler::from_config(&config);
    step_run(&format!("Balancing to {:.0}% positive", sampler.target_proportion() * 100.0));
    let balanced = sampler.resample(&x, &y)?;
    step_done(&format!("{} rows", balanced.x.nrows()));
    let after = class_counts(&balanced.y)?;

    println!();
    kv("Before", &describe_counts(&before));
    kv("After", &describe_counts(&after));
    kv("Added rows", &balanced.n_synthetic.to_string());

    if let Some(output) = &args.output {
        write_output(output, &config, &balanced.x, &balanced.y)?;
    }

    println!();
    Ok(())
}

fn write_output(
    path: &Path,
    config: &CleaningConfig,
    x: &ndarray::Array2<f64>,
    y: &ndarray::Array1<i64>,
) -> anyhow::Result<()> {
    step_run(&format!("Saving → {}", path.display()));
    let mut frame = matrix_to_frame(x, y, &config.output_features(), &config.label_column)?;
    DataSaver::save_csv(&mut frame, path)?;
    step_done(&format!("{} rows × {} cols", frame.height(), frame.width()));
    Ok(())
}

pub fn cmd_info(data: &Path, infer_schema_length: usize) -> anyhow::Result<()> {
    section("Info");

    let df = DataLoader::new()
        .with_infer_schema_length(infer_schema_length)
        .load_auto(data)?;
    kv("Rows", &df.height().to_string());
    kv("Columns", &df.width().to_string());
    println!();

    for column in summarize(&df) {
        println!(
            "  {:<28} {:<12} {}",
            column.name.white(),
            muted(&column.dtype),
            if column.null_count > 0 {
                format!("{} missing", column.null_count).yellow()
            } else {
                dim("complete")
            }
        );
    }

    println!();
    Ok(())
}
