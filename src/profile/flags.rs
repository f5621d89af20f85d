//! Quality flag evaluation and scoring.
//!
//! Two deliberately separate scoring paths:
//!
//! - [`compute_quality_flags`] - the full-table path over a
//!   [`DatasetSummary`] and [`MissingTable`], producing the fixed flag
//!   catalog and the penalty-based quality score.
//! - [`assess_aggregate`] - the aggregate-only path over caller-supplied
//!   counts. Its thresholds (50 rows, 0.3 missing share) differ from the
//!   full-table path's (100 rows, 0.5) and the two are kept distinct for
//!   output compatibility; do not unify them.

use serde::{Deserialize, Serialize};

use super::summary::{DatasetSummary, MissingTable};
use crate::error::{Error, Result};

/// Full-table path: minimum row count before `too_few_rows` fires.
const MIN_ROWS: usize = 100;
/// Full-table path: maximum column count before `too_many_columns` fires.
const MAX_COLUMNS: usize = 100;
/// Full-table path: missing share above which `too_many_missing` fires.
const MISSING_SHARE_LIMIT: f64 = 0.5;
/// A numeric min-zero column is "high-zero" when its distinct count is at
/// most this fraction of its non-missing count.
const HIGH_ZERO_UNIQUE_RATIO: f64 = 0.7;

const PENALTY_FEW_ROWS: f64 = 0.2;
const PENALTY_MANY_COLUMNS: f64 = 0.1;
const PENALTY_CONSTANT_COLUMNS: f64 = 0.15;
const PENALTY_HIGH_ZERO: f64 = 0.15;

/// Aggregate path: minimum row count before `too_few_rows` fires.
const AGGREGATE_MIN_ROWS: i64 = 50;
/// Aggregate path: missing share above which `too_many_missing` fires.
const AGGREGATE_MISSING_SHARE_LIMIT: f64 = 0.3;
/// Score at or above which a dataset is considered usable for modeling.
const OK_FOR_MODEL_THRESHOLD: f64 = 0.5;

/// The fixed catalog of quality flags for the full-table path.
///
/// Field names are part of the output contract; consumers match on them
/// exactly. Name lists preserve source column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityFlags {
    /// Fewer than 100 rows.
    pub too_few_rows: bool,
    /// More than 100 columns.
    pub too_many_columns: bool,
    /// Worst per-column missing share; 0.0 with no columns.
    pub max_missing_share: f64,
    /// `max_missing_share` exceeds 0.5.
    pub too_many_missing: bool,
    /// At least one column with at most one distinct value.
    pub has_constant_columns: bool,
    /// Count of constant columns.
    pub constant_columns_count: usize,
    /// Constant column names in source order.
    pub constant_column_names: Vec<String>,
    /// At least one high-zero numeric column.
    pub has_many_zero_values: bool,
    /// Count of high-zero columns.
    pub high_zero_columns: usize,
    /// High-zero column names in source order.
    pub high_zero_column_names: Vec<String>,
    /// Penalty-based score clamped to [0, 1].
    pub quality_score: f64,
}

/// Pre-aggregated dataset statistics for the aggregate-only path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Row count of the dataset.
    pub n_rows: i64,
    /// Column count of the dataset.
    pub n_cols: i64,
    /// Worst per-column missing share, in [0, 1].
    pub max_missing_share: f64,
    /// Number of numeric columns.
    pub numeric_cols: i64,
    /// Number of categorical columns.
    pub categorical_cols: i64,
}

/// Result of the aggregate-only path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateAssessment {
    /// `(1 - max_missing_share) * (numeric_cols / n_cols)`, clamped.
    pub quality_score: f64,
    /// Whether the score clears the modeling threshold (0.5).
    pub ok_for_model: bool,
    /// Fewer than 50 rows.
    pub too_few_rows: bool,
    /// `max_missing_share` exceeds 0.3.
    pub too_many_missing: bool,
}

/// Evaluate the fixed flag catalog over a summary and missing table.
///
/// The two inputs must describe the same table. Both are normally
/// derived from one table in sequence, so a mismatch indicates a caller
/// bug; it is rejected rather than silently scored. Identical inputs
/// always produce identical output.
///
/// # Errors
///
/// Returns [`Error::ColumnMismatch`] if the missing table names a column
/// the summary lacks, or a populated table's summary has a column the
/// missing table lacks.
pub fn compute_quality_flags(
    summary: &DatasetSummary,
    missing: &MissingTable,
) -> Result<QualityFlags> {
    check_consistency(summary, missing)?;

    let too_few_rows = summary.row_count < MIN_ROWS;
    let too_many_columns = summary.column_count > MAX_COLUMNS;

    let max_missing_share = missing.max_share();
    let too_many_missing = max_missing_share > MISSING_SHARE_LIMIT;

    let constant_column_names: Vec<String> = summary
        .columns
        .iter()
        .filter(|col| col.unique_count <= 1)
        .map(|col| col.name.clone())
        .collect();

    let high_zero_column_names: Vec<String> = summary
        .columns
        .iter()
        .filter(|col| is_high_zero(col))
        .map(|col| col.name.clone())
        .collect();

    let mut score = 1.0;
    score -= max_missing_share;
    if too_few_rows {
        score -= PENALTY_FEW_ROWS;
    }
    if too_many_columns {
        score -= PENALTY_MANY_COLUMNS;
    }
    if !constant_column_names.is_empty() {
        score -= PENALTY_CONSTANT_COLUMNS;
    }
    if !high_zero_column_names.is_empty() {
        score -= PENALTY_HIGH_ZERO;
    }
    let quality_score = score.clamp(0.0, 1.0);

    Ok(QualityFlags {
        too_few_rows,
        too_many_columns,
        max_missing_share,
        too_many_missing,
        has_constant_columns: !constant_column_names.is_empty(),
        constant_columns_count: constant_column_names.len(),
        constant_column_names,
        has_many_zero_values: !high_zero_column_names.is_empty(),
        high_zero_columns: high_zero_column_names.len(),
        high_zero_column_names,
        quality_score,
    })
}

/// Score pre-aggregated dataset statistics.
///
/// # Errors
///
/// Returns [`Error::InvalidRequest`] when `n_rows` or `n_cols` is not
/// positive; no score is computed in that case.
pub fn assess_aggregate(stats: &AggregateStats) -> Result<AggregateAssessment> {
    if stats.n_rows <= 0 || stats.n_cols <= 0 {
        return Err(Error::invalid_request("n_rows and n_cols must be > 0"));
    }

    let score = (1.0 - stats.max_missing_share) * (stats.numeric_cols as f64 / stats.n_cols as f64);
    let quality_score = score.clamp(0.0, 1.0);

    Ok(AggregateAssessment {
        quality_score,
        ok_for_model: quality_score >= OK_FOR_MODEL_THRESHOLD,
        too_few_rows: stats.n_rows < AGGREGATE_MIN_ROWS,
        too_many_missing: stats.max_missing_share > AGGREGATE_MISSING_SHARE_LIMIT,
    })
}

/// A numeric column whose minimum is exactly zero and whose distinct
/// count is low relative to its population is likely dominated by
/// repeated zeros.
fn is_high_zero(col: &super::column::ColumnProfile) -> bool {
    if !col.is_numeric || col.non_null_count == 0 {
        return false;
    }
    let Some(min) = col.min else {
        return false;
    };
    if min != 0.0 {
        return false;
    }
    let limit = (col.non_null_count as f64 * HIGH_ZERO_UNIQUE_RATIO).floor() as usize;
    col.unique_count <= limit
}

/// Both inputs are derived from the same table in normal flow; a
/// populated table must rank every summarized column, and the ranking
/// must never name an unknown column.
fn check_consistency(summary: &DatasetSummary, missing: &MissingTable) -> Result<()> {
    for entry in missing.iter() {
        if summary.column(&entry.column).is_none() {
            return Err(Error::column_mismatch(entry.column.clone()));
        }
    }

    if summary.row_count > 0 {
        for col in &summary.columns {
            if missing.get(&col.name).is_none() {
                return Err(Error::column_mismatch(col.name.clone()));
            }
        }
    }

    Ok(())
}
