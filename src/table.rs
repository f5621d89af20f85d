//! In-memory table representation for perfilar.
//!
//! A [`Table`] is a fixed set of named columns stored as Arrow
//! `RecordBatch`es sharing one schema. Tables are immutable and
//! request-scoped; profiling never mutates them.

use std::{
    io::{BufReader, Read, Seek, SeekFrom},
    path::Path,
    sync::Arc,
};

use arrow::{array::RecordBatch, datatypes::SchemaRef};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::{Error, Result};

/// Options for CSV parsing.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Whether the first line is a header row.
    pub has_header: bool,
    /// Field delimiter. `None` uses comma.
    pub delimiter: Option<u8>,
    /// Number of rows to sample when inferring the schema.
    pub infer_rows: usize,
    /// Rows per record batch.
    pub batch_size: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: None,
            infer_rows: 1000,
            batch_size: 8192,
        }
    }
}

/// An immutable in-memory table backed by Arrow RecordBatches.
///
/// The missing-value sentinel is Arrow validity (null). A column's
/// declared type is the Arrow `DataType` display string as reported by
/// the schema, not normalized across input formats.
///
/// # Example
///
/// ```no_run
/// use perfilar::Table;
///
/// let table = Table::from_csv("data.csv").unwrap();
/// println!("{} rows, {} columns", table.row_count(), table.column_count());
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    batches: Vec<RecordBatch>,
    schema: SchemaRef,
    row_count: usize,
}

impl Table {
    /// Creates a table from a vector of RecordBatches.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch list is empty or the batches have
    /// inconsistent schemas.
    pub fn new(batches: Vec<RecordBatch>) -> Result<Self> {
        let Some(first) = batches.first() else {
            return Err(Error::EmptyTable);
        };
        let schema = first.schema();

        for (i, batch) in batches.iter().enumerate().skip(1) {
            if batch.schema() != schema {
                return Err(Error::schema_mismatch(format!(
                    "batch {} has different schema than batch 0",
                    i
                )));
            }
        }

        let row_count = batches.iter().map(|b| b.num_rows()).sum();

        Ok(Self {
            batches,
            schema,
            row_count,
        })
    }

    /// Creates a table from a single RecordBatch.
    ///
    /// # Errors
    ///
    /// Never fails for a well-formed batch; zero rows are allowed here so
    /// the profiler's zero-row edge case stays constructible.
    pub fn from_batch(batch: RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let row_count = batch.num_rows();
        Ok(Self {
            batches: vec![batch],
            schema,
            row_count,
        })
    }

    /// Loads a table from a CSV file with default options.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the bytes are not valid CSV, and the
    /// empty-table error if the parsed table has zero rows.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_csv_with_options(path, CsvOptions::default())
    }

    /// Loads a table from a CSV file with options.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Table::from_csv`].
    pub fn from_csv_with_options(path: impl AsRef<Path>, options: CsvOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;
        let mut reader = BufReader::new(file);
        let table = Self::from_csv_reader_with_options(&mut reader, options)?;
        Ok(table)
    }

    /// Parses CSV from any seekable reader (file, cursor over uploaded
    /// bytes) with default options.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the bytes are not valid CSV, and the
    /// empty-table error if the parsed table has zero rows.
    pub fn from_csv_reader<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        Self::from_csv_reader_with_options(reader, CsvOptions::default())
    }

    /// Parses CSV from any seekable reader with options.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Table::from_csv_reader`].
    pub fn from_csv_reader_with_options<R: Read + Seek>(
        reader: &mut R,
        options: CsvOptions,
    ) -> Result<Self> {
        use arrow_csv::{reader::Format, ReaderBuilder};

        let mut format = Format::default().with_header(options.has_header);
        if let Some(delim) = options.delimiter {
            format = format.with_delimiter(delim);
        }

        let (inferred, _) = format
            .infer_schema(&mut *reader, Some(options.infer_rows))
            .map_err(|e| Error::parse(format!("cannot read CSV: {e}")))?;

        reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| Error::Io { path: None, source: e })?;

        let mut builder = ReaderBuilder::new(Arc::new(inferred))
            .with_batch_size(options.batch_size)
            .with_header(options.has_header);
        if let Some(delim) = options.delimiter {
            builder = builder.with_delimiter(delim);
        }

        let csv_reader = builder
            .build(reader)
            .map_err(|e| Error::parse(format!("cannot read CSV: {e}")))?;

        let batches: Vec<RecordBatch> = csv_reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::parse(format!("cannot read CSV: {e}")))?;

        if batches.is_empty() || batches.iter().all(|b| b.num_rows() == 0) {
            return Err(Error::EmptyTable);
        }

        Self::new(batches)
    }

    /// Loads a table from a JSON Lines file.
    ///
    /// Each line should be a valid JSON object representing a row.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the bytes are not valid JSON Lines, and
    /// the empty-table error if the parsed table has zero rows.
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        use arrow_json::ReaderBuilder;

        let path = path.as_ref();

        let infer_file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;
        let (inferred, _) =
            arrow_json::reader::infer_json_schema(BufReader::new(infer_file), Some(1000))
                .map_err(|e| Error::parse(format!("cannot read JSON: {e}")))?;

        let file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;
        let reader = ReaderBuilder::new(Arc::new(inferred))
            .build(BufReader::new(file))
            .map_err(|e| Error::parse(format!("cannot read JSON: {e}")))?;

        let batches: Vec<RecordBatch> = reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::parse(format!("cannot read JSON: {e}")))?;

        if batches.is_empty() || batches.iter().all(|b| b.num_rows() == 0) {
            return Err(Error::EmptyTable);
        }

        Self::new(batches)
    }

    /// Loads a table from a Parquet file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is not valid
    /// Parquet, or contains zero rows.
    pub fn from_parquet(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let reader = builder.build()?;

        let batches: Vec<RecordBatch> = reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::Arrow)?;

        if batches.is_empty() || batches.iter().all(|b| b.num_rows() == 0) {
            return Err(Error::EmptyTable);
        }

        Self::new(batches)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.schema.fields().len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Returns the schema.
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    /// Returns the underlying record batches in order.
    #[must_use]
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }
}
