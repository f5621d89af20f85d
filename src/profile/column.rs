//! Column profiling.
//!
//! Computes per-column descriptive statistics: counts, missing share,
//! cardinality, sample values, and numeric range/mean/std where the
//! declared type is numeric.

use std::collections::HashSet;

use arrow::{
    array::{Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray},
    compute::cast,
    datatypes::{DataType, Field},
    util::display::array_value_to_string,
};
use serde::Serialize;

/// Default number of sample values retained per column.
pub const DEFAULT_SAMPLE_VALUES: usize = 3;

/// Read-only profiling configuration, fixed at process start.
#[derive(Debug, Clone, Copy)]
pub struct ProfileOptions {
    /// Maximum number of distinct sample values to retain per column.
    pub sample_values: usize,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            sample_values: DEFAULT_SAMPLE_VALUES,
        }
    }
}

/// Descriptive statistics for a single column.
///
/// `min`/`max`/`mean`/`std` are `Some` exactly when the column is numeric
/// and has at least one non-missing value; `None` means "not computed",
/// which is distinct from a computed zero. `std` uses the sample standard
/// deviation (n-1 divisor) and is `NaN` when exactly one non-missing
/// value exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    /// Column name, unique within a dataset.
    pub name: String,
    /// Storage type tag as reported by the schema (free-form).
    pub declared_type: String,
    /// Count of non-missing values.
    pub non_null_count: usize,
    /// Count of missing values.
    pub missing_count: usize,
    /// `missing_count / row_count`; 0.0 for a zero-row table.
    pub missing_share: f64,
    /// Count of distinct non-missing values.
    pub unique_count: usize,
    /// Up to K distinct non-missing values, string-rendered, in
    /// first-occurrence order.
    pub sample_values: Vec<String>,
    /// Whether the declared type belongs to the numeric family.
    pub is_numeric: bool,
    /// Minimum value (numeric columns with data only).
    pub min: Option<f64>,
    /// Maximum value (numeric columns with data only).
    pub max: Option<f64>,
    /// Arithmetic mean (numeric columns with data only).
    pub mean: Option<f64>,
    /// Sample standard deviation (numeric columns with data only).
    pub std: Option<f64>,
}

/// Whether a declared type is in the numeric family (integers and
/// floats; text, categorical, boolean and temporal types are not).
pub(crate) fn is_numeric_type(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
    )
}

/// Profile one column given its arrays across all batches.
///
/// `arrays` hold the column's chunks in batch order; `row_count` is the
/// table's total row count. Never fails: rendering falls back to a
/// placeholder and un-castable values are skipped rather than erroring.
pub(crate) fn profile_column(
    field: &Field,
    arrays: &[ArrayRef],
    row_count: usize,
    options: &ProfileOptions,
) -> ColumnProfile {
    let missing_count: usize = arrays.iter().map(|a| a.null_count()).sum();
    let non_null_count = row_count.saturating_sub(missing_count);
    let missing_share = if row_count > 0 {
        missing_count as f64 / row_count as f64
    } else {
        0.0
    };

    // Distinct-value enumeration in first-occurrence order over the
    // rendered values, scanning batches in order and rows in order
    // within each batch. Sample values come from the same enumeration,
    // so they are deterministic for identical input.
    let mut seen: HashSet<String> = HashSet::new();
    let mut first_seen: Vec<String> = Vec::new();
    for array in arrays {
        for row in 0..array.len() {
            if array.is_null(row) {
                continue;
            }
            let rendered = render_value(array.as_ref(), row);
            if seen.insert(rendered.clone()) {
                first_seen.push(rendered);
            }
        }
    }
    let unique_count = first_seen.len();
    let mut sample_values = first_seen;
    sample_values.truncate(options.sample_values);

    let is_numeric = is_numeric_type(field.data_type());
    let (min, max, mean, std) = if is_numeric && non_null_count > 0 {
        numeric_stats(arrays)
    } else {
        (None, None, None, None)
    };

    ColumnProfile {
        name: field.name().clone(),
        declared_type: field.data_type().to_string(),
        non_null_count,
        missing_count,
        missing_share,
        unique_count,
        sample_values,
        is_numeric,
        min,
        max,
        mean,
        std,
    }
}

/// Render one non-null array element as a string.
fn render_value(array: &dyn Array, row: usize) -> String {
    if let Some(arr) = array.as_any().downcast_ref::<StringArray>() {
        arr.value(row).to_string()
    } else if let Some(arr) = array.as_any().downcast_ref::<Int64Array>() {
        arr.value(row).to_string()
    } else if let Some(arr) = array.as_any().downcast_ref::<Int32Array>() {
        arr.value(row).to_string()
    } else if let Some(arr) = array.as_any().downcast_ref::<Float64Array>() {
        arr.value(row).to_string()
    } else if let Some(arr) = array.as_any().downcast_ref::<Float32Array>() {
        arr.value(row).to_string()
    } else if let Some(arr) = array.as_any().downcast_ref::<BooleanArray>() {
        arr.value(row).to_string()
    } else {
        array_value_to_string(array, row).unwrap_or_else(|_| "?".to_string())
    }
}

/// Exact min/max, mean, and sample standard deviation over the
/// non-missing numeric values.
fn numeric_stats(arrays: &[ArrayRef]) -> (Option<f64>, Option<f64>, Option<f64>, Option<f64>) {
    let mut values: Vec<f64> = Vec::new();

    for array in arrays {
        let Ok(float_array) = cast(array, &DataType::Float64) else {
            continue;
        };
        let Some(floats) = float_array.as_any().downcast_ref::<Float64Array>() else {
            continue;
        };
        for row in 0..floats.len() {
            if !floats.is_null(row) {
                values.push(floats.value(row));
            }
        }
    }

    if values.is_empty() {
        return (None, None, None, None);
    }

    let n = values.len() as f64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for v in &values {
        min = min.min(*v);
        max = max.max(*v);
        sum += v;
    }
    let mean = sum / n;

    // n - 1 divisor; a single value yields 0/0 = NaN, preserved.
    let sq_dev: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    let variance = sq_dev / (n - 1.0);

    (Some(min), Some(max), Some(mean), Some(variance.sqrt()))
}
