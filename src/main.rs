//! perfilar CLI - Dataset Profiling and Quality Assessment
//!
//! Command-line interface for perfilar operations.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::uninlined_format_args)]

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};

use perfilar::cli::{
    cmd_categories, cmd_check, cmd_correlate, cmd_missing, cmd_score, cmd_serve, cmd_summary,
    OutputFormat,
};
use perfilar::AggregateStats;

/// perfilar - Dataset Profiling and Quality Heuristics in Pure Rust
#[derive(Parser)]
#[command(name = "perfilar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display per-column profile of a dataset
    Summary {
        /// Path to dataset file (csv, json, jsonl, parquet)
        path: PathBuf,
        /// Distinct sample values to show per column
        #[arg(long, default_value = "3")]
        samples: usize,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Display missing-value ranking of a dataset
    Missing {
        /// Path to dataset file
        path: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Check data quality: flags and bounded score
    Check {
        /// Path to dataset file
        path: PathBuf,
        /// Distinct sample values to retain per column
        #[arg(long, default_value = "3")]
        samples: usize,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Display the Pearson correlation matrix over numeric columns
    Correlate {
        /// Path to dataset file
        path: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Display the most frequent values of string columns
    Categories {
        /// Path to dataset file
        path: PathBuf,
        /// String columns to examine, in source order
        #[arg(long, default_value = "5")]
        max_columns: usize,
        /// Top values to report per column
        #[arg(long, default_value = "5")]
        top_k: usize,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Score pre-aggregated dataset statistics
    Score {
        /// Row count
        #[arg(long)]
        rows: i64,
        /// Column count
        #[arg(long)]
        cols: i64,
        /// Worst per-column missing share (0..1)
        #[arg(long, default_value = "0.0")]
        max_missing_share: f64,
        /// Number of numeric columns
        #[arg(long, default_value = "0")]
        numeric_cols: i64,
        /// Number of categorical columns
        #[arg(long, default_value = "0")]
        categorical_cols: i64,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Start the HTTP quality-assessment service
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000", env = "PERFILAR_PORT")]
        port: u16,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Summary {
            path,
            samples,
            format,
        } => cmd_summary(&path, samples, format),
        Commands::Missing { path, format } => cmd_missing(&path, format),
        Commands::Check {
            path,
            samples,
            format,
        } => cmd_check(&path, samples, format),
        Commands::Correlate { path, format } => cmd_correlate(&path, format),
        Commands::Categories {
            path,
            max_columns,
            top_k,
            format,
        } => cmd_categories(&path, max_columns, top_k, format),
        Commands::Score {
            rows,
            cols,
            max_missing_share,
            numeric_cols,
            categorical_cols,
            format,
        } => cmd_score(
            &AggregateStats {
                n_rows: rows,
                n_cols: cols,
                max_missing_share,
                numeric_cols,
                categorical_cols,
            },
            format,
        ),
        Commands::Serve { port } => cmd_serve(port),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
