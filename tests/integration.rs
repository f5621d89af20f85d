//! Integration tests for perfilar.
//!
//! Drive the full pipeline from files on disk: ingest -> summarize ->
//! missing table -> quality flags.

#![allow(clippy::float_cmp)]

use std::{io::Write, sync::Arc};

use arrow::{
    array::{Float64Array, Int64Array, RecordBatch, StringArray},
    datatypes::{DataType, Field, Schema},
};
use perfilar::{compute_quality_flags, missing_table, summarize, Error, Table};

fn write_temp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_csv_end_to_end() {
    let csv = "\
id,constant,zeros,score
1,5,0,10.5
2,5,0,
3,5,0,11.5
4,5,10,12.0
";
    let file = write_temp(csv, ".csv");
    let table = Table::from_csv(file.path()).unwrap();
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.column_count(), 4);

    let summary = summarize(&table);
    let missing = missing_table(&table);
    let flags = compute_quality_flags(&summary, &missing).unwrap();

    // The score column has the only missing value and ranks first.
    let worst = missing.iter().next().unwrap();
    assert_eq!(worst.column, "score");
    assert_eq!(worst.missing_count, 1);
    assert_eq!(missing.max_share(), 0.25);

    assert!(flags.too_few_rows);
    assert!(flags.has_constant_columns);
    assert_eq!(flags.constant_column_names, vec!["constant".to_string()]);
    assert!(flags.has_many_zero_values);
    assert_eq!(flags.high_zero_column_names, vec!["zeros".to_string()]);

    // 1.0 - 0.25 (missing) - 0.2 (rows) - 0.15 (constant) - 0.15 (zeros)
    assert!((flags.quality_score - 0.25).abs() < 1e-12);
}

#[test]
fn test_csv_header_only_is_empty_input() {
    let file = write_temp("id,name\n", ".csv");
    let err = Table::from_csv(file.path()).unwrap_err();
    assert!(matches!(err, Error::EmptyTable));
}

#[test]
fn test_csv_garbage_is_parse_error() {
    let file = write_temp("a,b\n1,2,3,4,5\n6\n", ".csv");
    let err = Table::from_csv(file.path()).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn test_jsonl_end_to_end() {
    let jsonl = "\
{\"id\": 1, \"label\": \"a\"}
{\"id\": 2, \"label\": \"b\"}
{\"id\": 3, \"label\": null}
";
    let file = write_temp(jsonl, ".jsonl");
    let table = Table::from_json(file.path()).unwrap();
    assert_eq!(table.row_count(), 3);

    let summary = summarize(&table);
    let label = summary.column("label").unwrap();
    assert_eq!(label.non_null_count, 2);
    assert_eq!(label.missing_count, 1);
    assert!(!label.is_numeric);

    let id = summary.column("id").unwrap();
    assert!(id.is_numeric);
    assert_eq!(id.min, Some(1.0));
    assert_eq!(id.max, Some(3.0));
}

#[test]
fn test_parquet_end_to_end() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("score", DataType::Float64, true),
        Field::new("name", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3])),
            Arc::new(Float64Array::from(vec![Some(0.5), None, Some(2.5)])),
            Arc::new(StringArray::from(vec!["a", "b", "c"])),
        ],
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.parquet");
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = parquet::arrow::ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let table = Table::from_parquet(&path).unwrap();
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.column_count(), 3);

    let summary = summarize(&table);
    let score = summary.column("score").unwrap();
    assert_eq!(score.missing_count, 1);
    assert_eq!(score.mean, Some(1.5));
}

#[test]
fn test_pipeline_is_deterministic() {
    let csv = "a,b\n1,x\n2,y\n1,x\n3,\n";
    let file = write_temp(csv, ".csv");

    let run = || {
        let table = Table::from_csv(file.path()).unwrap();
        let summary = summarize(&table);
        let missing = missing_table(&table);
        compute_quality_flags(&summary, &missing).unwrap()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_count_invariants_hold_for_ingested_data() {
    let csv = "x,y,z\n1,,a\n2,3.5,b\n,4.5,\n4,5.5,d\n";
    let file = write_temp(csv, ".csv");
    let table = Table::from_csv(file.path()).unwrap();
    let summary = summarize(&table);

    for col in &summary.columns {
        assert_eq!(col.non_null_count + col.missing_count, summary.row_count);
        assert!(col.unique_count <= col.non_null_count);
        assert!((0.0..=1.0).contains(&col.missing_share));
        if col.is_numeric && col.non_null_count >= 2 {
            let (min, max, mean) = (col.min.unwrap(), col.max.unwrap(), col.mean.unwrap());
            assert!(min <= mean && mean <= max);
            assert!(col.std.unwrap() >= 0.0);
        }
    }
}
