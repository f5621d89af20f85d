//! Dataset summarization.
//!
//! Applies the column profiler to every column of a table and builds the
//! missing-value ranking used by the flag engine.

use std::cmp::Ordering;

use arrow::array::ArrayRef;
use serde::Serialize;

use super::column::{profile_column, ColumnProfile, ProfileOptions};
use crate::table::Table;

/// Column-level profiles for a whole table, in source column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// Number of rows in the source table.
    pub row_count: usize,
    /// Number of columns in the source table.
    pub column_count: usize,
    /// One profile per column, preserving source order.
    pub columns: Vec<ColumnProfile>,
}

impl DatasetSummary {
    /// Look up a column profile by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// One row of the missing-value ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingEntry {
    /// Column name.
    pub column: String,
    /// Count of missing values in the column.
    pub missing_count: usize,
    /// `missing_count / row_count`.
    pub missing_share: f64,
}

/// Per-column missing-value counts and shares, held sorted descending by
/// share with ties broken by original column order.
///
/// Empty (but well-formed) for a table with zero rows or zero columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MissingTable {
    entries: Vec<MissingEntry>,
}

impl MissingTable {
    /// Number of ranked columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no columns are ranked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in ranked (descending-share) order.
    pub fn iter(&self) -> impl Iterator<Item = &MissingEntry> {
        self.entries.iter()
    }

    /// Look up a column's `(missing_count, missing_share)` by name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<(usize, f64)> {
        self.entries
            .iter()
            .find(|e| e.column == column)
            .map(|e| (e.missing_count, e.missing_share))
    }

    /// Worst missing share across all columns; 0.0 when empty.
    #[must_use]
    pub fn max_share(&self) -> f64 {
        // Ranked descending, so the head holds the maximum.
        self.entries.first().map_or(0.0, |e| e.missing_share)
    }
}

/// Summarize a table with default profiling options.
///
/// Never fails on well-formed tabular input; a zero-row or zero-column
/// table yields a summary with empty or zeroed profiles.
#[must_use]
pub fn summarize(table: &Table) -> DatasetSummary {
    summarize_with_options(table, &ProfileOptions::default())
}

/// Summarize a table, profiling each column in source order.
#[must_use]
pub fn summarize_with_options(table: &Table, options: &ProfileOptions) -> DatasetSummary {
    let schema = table.schema();
    let row_count = table.row_count();

    let columns = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let arrays: Vec<ArrayRef> = table
                .batches()
                .iter()
                .map(|batch| batch.column(idx).clone())
                .collect();
            profile_column(field, &arrays, row_count, options)
        })
        .collect();

    DatasetSummary {
        row_count,
        column_count: schema.fields().len(),
        columns,
    }
}

/// Build the per-column missing-value ranking for a table.
///
/// Empty and well-formed for zero-row or zero-column tables. The sort is
/// stable: equal shares keep original column order.
#[must_use]
pub fn missing_table(table: &Table) -> MissingTable {
    if table.row_count() == 0 || table.column_count() == 0 {
        return MissingTable::default();
    }

    let row_count = table.row_count() as f64;
    let schema = table.schema();

    let mut entries: Vec<MissingEntry> = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let missing_count: usize = table
                .batches()
                .iter()
                .map(|batch| batch.column(idx).null_count())
                .sum();
            MissingEntry {
                column: field.name().clone(),
                missing_count,
                missing_share: missing_count as f64 / row_count,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.missing_share
            .partial_cmp(&a.missing_share)
            .unwrap_or(Ordering::Equal)
    });

    MissingTable { entries }
}
