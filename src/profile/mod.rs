//! Dataset profiling and quality heuristics.
//!
//! Three stages, each a pure function over its inputs:
//!
//! 1. Column profiling - per-column descriptive statistics
//!    ([`ColumnProfile`]).
//! 2. Dataset summarization - profiles for every column in source order
//!    ([`DatasetSummary`]) plus a missing-value ranking ([`MissingTable`]).
//! 3. Flag evaluation - a fixed catalog of heuristic checks folded into a
//!    bounded quality score ([`QualityFlags`]).
//!
//! Two exploratory helpers sit beside the pipeline: a Pearson
//! [`CorrelationMatrix`] over numeric columns and top-value counts for
//! string columns ([`top_categories`]).
//!
//! Data flows strictly one way: table -> summary + missing table -> flags.
//! Nothing here holds state between calls; identical inputs always produce
//! identical output.
//!
//! # Example
//!
//! ```no_run
//! use perfilar::{compute_quality_flags, missing_table, summarize, Table};
//!
//! let table = Table::from_csv("data.csv").unwrap();
//! let summary = summarize(&table);
//! let missing = missing_table(&table);
//! let flags = compute_quality_flags(&summary, &missing).unwrap();
//! println!("quality score: {:.3}", flags.quality_score);
//! ```

// Statistical computation over usize counts
#![allow(clippy::cast_precision_loss)]

mod categories;
mod column;
mod correlation;
mod flags;
mod summary;


pub use categories::{
    top_categories, CategoryCount, ColumnCategories, DEFAULT_CATEGORY_COLUMNS, DEFAULT_TOP_K,
};
pub use column::{ColumnProfile, ProfileOptions, DEFAULT_SAMPLE_VALUES};
pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use flags::{
    assess_aggregate, compute_quality_flags, AggregateAssessment, AggregateStats, QualityFlags,
};
pub use summary::{missing_table, summarize, summarize_with_options, DatasetSummary, MissingEntry, MissingTable};
