//! Pearson correlation over numeric columns.

use arrow::{
    array::{Array, Float64Array},
    compute::cast,
    datatypes::DataType,
};
use serde::Serialize;

use super::column::is_numeric_type;
use crate::table::Table;

/// Pairwise Pearson correlations between the numeric columns of a table.
///
/// Square and symmetric; the value at `(i, j)` is the correlation between
/// `columns[i]` and `columns[j]`, computed over the rows where both values
/// are present and finite. A pair with fewer than two such rows, or one
/// involving a constant column, yields `NaN` (serialized as JSON null).
/// Empty when the table has no numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Numeric column names, in source order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Matrix rows, one per column, in column order.
    #[must_use]
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Correlation for a pair of columns by name.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    /// True when the source table had no numeric columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Compute the Pearson correlation matrix over a table's numeric columns.
#[must_use]
pub fn correlation_matrix(table: &Table) -> CorrelationMatrix {
    let schema = table.schema();

    let mut columns: Vec<String> = Vec::new();
    let mut series: Vec<Vec<Option<f64>>> = Vec::new();
    for (idx, field) in schema.fields().iter().enumerate() {
        if !is_numeric_type(field.data_type()) {
            continue;
        }
        columns.push(field.name().clone());
        series.push(column_values(table, idx));
    }

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix { columns, values }
}

/// Collect one column as `Option<f64>` per row, batches in order.
fn column_values(table: &Table, idx: usize) -> Vec<Option<f64>> {
    let mut out: Vec<Option<f64>> = Vec::with_capacity(table.row_count());
    for batch in table.batches() {
        let Ok(float_array) = cast(batch.column(idx), &DataType::Float64) else {
            out.extend(std::iter::repeat(None).take(batch.num_rows()));
            continue;
        };
        let Some(floats) = float_array.as_any().downcast_ref::<Float64Array>() else {
            out.extend(std::iter::repeat(None).take(batch.num_rows()));
            continue;
        };
        for row in 0..floats.len() {
            if floats.is_null(row) {
                out.push(None);
            } else {
                out.push(Some(floats.value(row)));
            }
        }
    }
    out
}

/// Pearson r over the rows where both values are present and finite.
fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((*x, *y)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // A constant column gives 0/0 = NaN, the same absent-value convention
    // as the single-sample standard deviation.
    cov / (var_x * var_y).sqrt()
}
