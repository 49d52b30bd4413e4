use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod annotate;
mod config;
mod extract;
mod format;
mod merge;
mod partition;
mod run;

/// mznovo - MGF and Mascot results to de novo sequencing training data
#[derive(Parser)]
#[command(name = "mznovo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Split options shared by `partition` and `run`
#[derive(clap::Args, Debug, Default)]
pub struct SplitArgs {
    /// Probability of assigning a row to the train split (default: 0.8)
    #[arg(long)]
    train: Option<f64>,

    /// Probability of assigning a row to the validation split (default: 0.1)
    #[arg(long)]
    valid: Option<f64>,

    /// Probability of assigning a row to the test split (default: 0.1)
    #[arg(long)]
    test: Option<f64>,

    /// Fix the random seed for a reproducible split
    #[arg(long)]
    seed: Option<u64>,

    /// Keep all rows of a spectrum in the same split
    #[arg(long)]
    by_spectrum: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Keep only TITLE, PEPMASS, CHARGE, SCANS and RTINSECONDS and drop empty spectra
    Format {
        /// Input MGF file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output MGF file path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Concatenate MGF files, prefixing scans with F<index>:
    MergeMgf {
        /// Merged MGF file path
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        /// Input MGF files, in merge order
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Build a feature table from an MGF file
    Extract {
        /// Input MGF file path
        #[arg(value_name = "MGF")]
        input: PathBuf,

        /// Mascot XML results to join on spectrum title
        #[arg(long, value_name = "XML")]
        mascot: Option<PathBuf>,

        /// Output CSV path (defaults to <stem>_features.csv)
        #[arg(short, long, value_name = "CSV")]
        output: Option<PathBuf>,
    },

    /// Concatenate feature tables, prefixing scans with F<index>:
    MergeFeatures {
        /// Merged CSV file path
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        /// Input feature CSV files, in merge order
        #[arg(value_name = "CSV", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Split a feature table into train, valid and test files
    Partition {
        /// Feature CSV file path
        #[arg(value_name = "CSV")]
        input: PathBuf,

        /// Load split settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[command(flatten)]
        split: SplitArgs,
    },

    /// Write a copy of an MGF file with SEQ= annotations from Mascot results
    Annotate {
        /// Input MGF file path
        #[arg(value_name = "MGF")]
        input: PathBuf,

        /// Mascot XML results
        #[arg(value_name = "XML")]
        mascot: PathBuf,

        /// Output MGF path (defaults to <stem>_annotated.mgf)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Run the whole batch over every matching MGF file in a directory
    Run {
        /// Directory holding the MGF and Mascot XML files
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Dataset name used in merged output file names
        #[arg(short, long)]
        name: Option<String>,

        /// Output directory (defaults to DIR)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,

        /// Extract features without Mascot annotation
        #[arg(long)]
        no_annotate: bool,

        #[command(flatten)]
        split: SplitArgs,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Format { input, output } => format::run(input, output),
        Commands::MergeMgf { output, inputs } => merge::run_mgf(inputs, output),
        Commands::Extract {
            input,
            mascot,
            output,
        } => extract::run(input, mascot, output),
        Commands::MergeFeatures { output, inputs } => merge::run_features(inputs, output),
        Commands::Partition {
            input,
            config,
            split,
        } => partition::run(input, config, split),
        Commands::Annotate {
            input,
            mascot,
            output,
        } => annotate::run(input, mascot, output),
        Commands::Run {
            dir,
            config,
            name,
            output,
            no_annotate,
            split,
        } => run::run(dir, config, name, output, no_annotate, split),
    }
}
