//! perfilar - Dataset Profiling and Quality Heuristics in Pure Rust
//!
//! A small library and service for validating whether a tabular dataset
//! is suitable for downstream modeling. Given a table (or pre-aggregated
//! dataset statistics) it produces per-column descriptive statistics, a
//! missing-value ranking, a fixed catalog of diagnostic flags, and a
//! bounded quality score.
//!
//! # Design Principles
//!
//! 1. **Pure core** - summarization and scoring are pure functions over
//!    immutable, request-scoped values
//! 2. **Arrow-backed** - tables are Arrow `RecordBatch`es; CSV, JSON
//!    Lines and Parquet ingestion
//! 3. **Fixed flag catalog** - flag names and penalty magnitudes are an
//!    output contract, reproduced exactly
//!
//! # Quick Start
//!
//! ```no_run
//! use perfilar::{compute_quality_flags, missing_table, summarize, Table};
//!
//! let table = Table::from_csv("data/train.csv").unwrap();
//! let summary = summarize(&table);
//! let missing = missing_table(&table);
//! let flags = compute_quality_flags(&summary, &missing).unwrap();
//!
//! if flags.quality_score >= 0.5 {
//!     println!("usable for modeling");
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_precision_loss,
        clippy::float_cmp
    )
)]
// Allow some pedantic lints for cleaner code
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

/// CLI module for command-line interface
pub mod cli;
pub mod error;
pub mod profile;
pub mod serve;
pub mod table;

// Re-exports for convenience
// Re-export arrow types commonly needed
pub use arrow::{
    array::RecordBatch,
    datatypes::{Schema, SchemaRef},
};
pub use error::{Error, Result};
pub use profile::{
    assess_aggregate, compute_quality_flags, correlation_matrix, missing_table, summarize,
    summarize_with_options, top_categories, AggregateAssessment, AggregateStats, CategoryCount,
    ColumnCategories, ColumnProfile, CorrelationMatrix, DatasetSummary, MissingEntry,
    MissingTable, ProfileOptions, QualityFlags, DEFAULT_CATEGORY_COLUMNS, DEFAULT_SAMPLE_VALUES,
    DEFAULT_TOP_K,
};
pub use table::{CsvOptions, Table};
