//! Top-value counts for string columns.

use std::collections::HashMap;

use arrow::{
    array::{Array, LargeStringArray, StringArray},
    datatypes::DataType,
};
use serde::Serialize;

use crate::table::Table;

/// Default number of string columns examined.
pub const DEFAULT_CATEGORY_COLUMNS: usize = 5;

/// Default number of top values reported per column.
pub const DEFAULT_TOP_K: usize = 5;

/// One row of a column's top-value table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    /// The value.
    pub value: String,
    /// Occurrences among the column's non-missing values.
    pub count: usize,
    /// `count` relative to the total of the reported top values.
    pub share: f64,
}

/// Most frequent values of one string column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnCategories {
    /// Column name.
    pub column: String,
    /// Values by descending count, ties in first-occurrence order.
    pub categories: Vec<CategoryCount>,
}

/// Count the most frequent values of the table's string columns.
///
/// Examines at most `max_columns` string columns in source order and
/// reports up to `top_k` values for each, ordered by descending count
/// with ties broken by first occurrence. Shares are relative to the
/// total of the reported values, so each column's shares sum to 1.
/// Columns with no non-missing values are skipped.
#[must_use]
pub fn top_categories(table: &Table, max_columns: usize, top_k: usize) -> Vec<ColumnCategories> {
    let schema = table.schema();

    let candidates: Vec<usize> = schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| matches!(field.data_type(), DataType::Utf8 | DataType::LargeUtf8))
        .map(|(idx, _)| idx)
        .take(max_columns)
        .collect();

    let mut result = Vec::new();
    for idx in candidates {
        let mut ranked = value_counts(table, idx);
        if ranked.is_empty() {
            continue;
        }

        ranked.truncate(top_k);
        let total: usize = ranked.iter().map(|(_, count)| count).sum();

        let categories = ranked
            .into_iter()
            .map(|(value, count)| CategoryCount {
                value,
                count,
                share: count as f64 / total as f64,
            })
            .collect();

        result.push(ColumnCategories {
            column: schema.field(idx).name().clone(),
            categories,
        });
    }

    result
}

/// Count distinct non-missing values of one column, sorted by descending
/// count; the sort is stable, so ties keep first-occurrence order.
fn value_counts(table: &Table, idx: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for batch in table.batches() {
        let array = batch.column(idx);
        for row in 0..array.len() {
            if array.is_null(row) {
                continue;
            }
            let value = if let Some(arr) = array.as_any().downcast_ref::<StringArray>() {
                arr.value(row).to_string()
            } else if let Some(arr) = array.as_any().downcast_ref::<LargeStringArray>() {
                arr.value(row).to_string()
            } else {
                continue;
            };
            if let Some(count) = counts.get_mut(&value) {
                *count += 1;
            } else {
                counts.insert(value.clone(), 1);
                order.push(value);
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|value| {
            let count = counts.get(&value).copied().unwrap_or(0);
            (value, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}
