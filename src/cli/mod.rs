//! perfilar CLI - dataset profiling and quality assessment commands.

use std::path::{Path, PathBuf};

use crate::{
    profile::{
        assess_aggregate, compute_quality_flags, correlation_matrix, missing_table,
        summarize_with_options, top_categories, AggregateStats, ProfileOptions,
    },
    table::Table,
    Error, Result,
};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Load a table from a file path based on extension.
pub(crate) fn load_table(path: &Path) -> Result<Table> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        "csv" => Table::from_csv(path),
        "json" | "jsonl" => Table::from_json(path),
        "parquet" => Table::from_parquet(path),
        ext => Err(Error::unsupported_format(ext)),
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::parse(e.to_string()))
}

/// Print the per-column profile of a dataset.
pub fn cmd_summary(path: &PathBuf, samples: usize, format: OutputFormat) -> Result<()> {
    let table = load_table(path)?;
    let options = ProfileOptions {
        sample_values: samples,
    };
    let summary = summarize_with_options(&table, &options);

    if format == OutputFormat::Json {
        println!("{}", to_pretty_json(&summary)?);
        return Ok(());
    }

    println!("Dataset Summary");
    println!("===============");
    println!("File: {}", path.display());
    println!("Rows: {}", summary.row_count);
    println!("Columns: {}", summary.column_count);
    println!();
    println!(
        "{:<24} {:<12} {:>9} {:>9} {:>8} {:>8}  {}",
        "name", "type", "non_null", "missing", "share", "unique", "samples"
    );
    for col in &summary.columns {
        println!(
            "{:<24} {:<12} {:>9} {:>9} {:>8.3} {:>8}  {}",
            col.name,
            col.declared_type,
            col.non_null_count,
            col.missing_count,
            col.missing_share,
            col.unique_count,
            col.sample_values.join(", ")
        );
    }

    let numeric: Vec<_> = summary.columns.iter().filter(|c| c.is_numeric).collect();
    if !numeric.is_empty() {
        println!();
        println!(
            "{:<24} {:>12} {:>12} {:>12} {:>12}",
            "numeric column", "min", "max", "mean", "std"
        );
        for col in numeric {
            println!(
                "{:<24} {:>12} {:>12} {:>12} {:>12}",
                col.name,
                fmt_stat(col.min),
                fmt_stat(col.max),
                fmt_stat(col.mean),
                fmt_stat(col.std),
            );
        }
    }

    Ok(())
}

/// Print the missing-value ranking of a dataset.
pub fn cmd_missing(path: &PathBuf, format: OutputFormat) -> Result<()> {
    let table = load_table(path)?;
    let missing = missing_table(&table);

    if format == OutputFormat::Json {
        println!("{}", to_pretty_json(&missing)?);
        return Ok(());
    }

    println!("Missing Values");
    println!("==============");
    if missing.is_empty() {
        println!("(empty table)");
        return Ok(());
    }
    println!("{:<24} {:>9} {:>8}", "column", "missing", "share");
    for entry in missing.iter() {
        println!(
            "{:<24} {:>9} {:>8.3}",
            entry.column, entry.missing_count, entry.missing_share
        );
    }

    Ok(())
}

/// Run the full quality check: summary, missing table, flags and score.
pub fn cmd_check(path: &PathBuf, samples: usize, format: OutputFormat) -> Result<()> {
    let table = load_table(path)?;
    let options = ProfileOptions {
        sample_values: samples,
    };
    let summary = summarize_with_options(&table, &options);
    let missing = missing_table(&table);
    let flags = compute_quality_flags(&summary, &missing)?;

    if format == OutputFormat::Json {
        println!("{}", to_pretty_json(&flags)?);
        return Ok(());
    }

    println!("Data Quality Report");
    println!("===================");
    println!("File: {}", path.display());
    println!("Rows: {}", summary.row_count);
    println!("Columns: {}", summary.column_count);
    println!();
    println!("Quality Score: {:.3}", flags.quality_score);
    println!();
    println!("too_few_rows:         {}", flags.too_few_rows);
    println!("too_many_columns:     {}", flags.too_many_columns);
    println!("max_missing_share:    {:.3}", flags.max_missing_share);
    println!("too_many_missing:     {}", flags.too_many_missing);
    println!(
        "constant columns:     {} ({})",
        flags.constant_columns_count,
        flags.constant_column_names.join(", ")
    );
    println!(
        "high-zero columns:    {} ({})",
        flags.high_zero_columns,
        flags.high_zero_column_names.join(", ")
    );

    Ok(())
}

/// Print the Pearson correlation matrix over numeric columns.
pub fn cmd_correlate(path: &PathBuf, format: OutputFormat) -> Result<()> {
    let table = load_table(path)?;
    let matrix = correlation_matrix(&table);

    if format == OutputFormat::Json {
        println!("{}", to_pretty_json(&matrix)?);
        return Ok(());
    }

    println!("Correlation Matrix");
    println!("==================");
    if matrix.is_empty() {
        println!("(no numeric columns)");
        return Ok(());
    }
    print!("{:<24}", "");
    for name in matrix.columns() {
        print!(" {name:>12}");
    }
    println!();
    for (name, row) in matrix.columns().iter().zip(matrix.values()) {
        print!("{name:<24}");
        for r in row {
            if r.is_nan() {
                print!(" {:>12}", "-");
            } else {
                print!(" {r:>12.4}");
            }
        }
        println!();
    }

    Ok(())
}

/// Print the most frequent values of string columns.
pub fn cmd_categories(
    path: &PathBuf,
    max_columns: usize,
    top_k: usize,
    format: OutputFormat,
) -> Result<()> {
    let table = load_table(path)?;
    let columns = top_categories(&table, max_columns, top_k);

    if format == OutputFormat::Json {
        println!("{}", to_pretty_json(&columns)?);
        return Ok(());
    }

    println!("Top Categories");
    println!("==============");
    if columns.is_empty() {
        println!("(no string columns with data)");
        return Ok(());
    }
    for col in columns {
        println!();
        println!("{}", col.column);
        println!("{:<24} {:>9} {:>8}", "value", "count", "share");
        for cat in col.categories {
            println!("{:<24} {:>9} {:>8.3}", cat.value, cat.count, cat.share);
        }
    }

    Ok(())
}

/// Score pre-aggregated dataset statistics.
pub fn cmd_score(stats: &AggregateStats, format: OutputFormat) -> Result<()> {
    let assessment = assess_aggregate(stats)?;

    if format == OutputFormat::Json {
        println!("{}", to_pretty_json(&assessment)?);
        return Ok(());
    }

    println!("Aggregate Quality");
    println!("=================");
    println!("Score: {:.3}", assessment.quality_score);
    println!("Usable for modeling: {}", assessment.ok_for_model);
    println!("too_few_rows:     {}", assessment.too_few_rows);
    println!("too_many_missing: {}", assessment.too_many_missing);

    Ok(())
}

/// Start the HTTP service.
pub fn cmd_serve(port: u16) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let runtime = tokio::runtime::Runtime::new().map_err(|e| Error::Io {
        path: None,
        source: e,
    })?;
    runtime.block_on(crate::serve::run(port))
}

fn fmt_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}
