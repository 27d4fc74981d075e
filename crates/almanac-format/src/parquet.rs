//! Apache Parquet output format.

use almanac_types::{Bar, Observation};
use arrow::array::{Date32Array, Float64Array, TimestampMicrosecondArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::Datelike;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

use crate::{FormatError, Formatter};

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Parquet formatter.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    fn observation_schema() -> Schema {
        Schema::new(vec![
            Field::new("date", DataType::Date32, false),
            Field::new("value", DataType::Float64, true),
        ])
    }

    fn bar_schema() -> Schema {
        Schema::new(vec![
            Field::new(
                "timestamp",
                DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
                false,
            ),
            Field::new("open", DataType::Float64, true),
            Field::new("high", DataType::Float64, true),
            Field::new("low", DataType::Float64, true),
            Field::new("close", DataType::Float64, true),
            Field::new("adj_close", DataType::Float64, true),
            Field::new("volume", DataType::UInt64, true),
        ])
    }

    fn observations_to_batch(observations: &[Observation]) -> Result<RecordBatch, FormatError> {
        let dates: Vec<_> = observations
            .iter()
            .map(|o| o.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
            .collect();
        let values: Vec<_> = observations.iter().map(|o| o.value).collect();

        RecordBatch::try_new(
            Arc::new(Self::observation_schema()),
            vec![
                Arc::new(Date32Array::from(dates)),
                Arc::new(Float64Array::from(values)),
            ],
        )
        .map_err(|e| FormatError::Parquet(e.to_string()))
    }

    fn bars_to_batch(bars: &[Bar]) -> Result<RecordBatch, FormatError> {
        let timestamps: Vec<_> = bars.iter().map(|b| b.timestamp.timestamp_micros()).collect();
        let column = |f: fn(&Bar) -> Option<f64>| -> Float64Array {
            bars.iter().map(f).collect::<Vec<_>>().into()
        };
        let volumes: Vec<_> = bars.iter().map(|b| b.volume).collect();

        RecordBatch::try_new(
            Arc::new(Self::bar_schema()),
            vec![
                Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC")),
                Arc::new(column(|b| b.open)),
                Arc::new(column(|b| b.high)),
                Arc::new(column(|b| b.low)),
                Arc::new(column(|b| b.close)),
                Arc::new(column(|b| b.adj_close)),
                Arc::new(UInt64Array::from(volumes)),
            ],
        )
        .map_err(|e| FormatError::Parquet(e.to_string()))
    }

    fn write_batches<T, W, F>(
        &self,
        rows: &[T],
        schema: Schema,
        to_batch: F,
        writer: W,
    ) -> Result<(), FormatError>
    where
        W: Write + Send,
        F: Fn(&[T]) -> Result<RecordBatch, FormatError>,
    {
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, Arc::new(schema), Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in rows.chunks(self.row_group_size.max(1)) {
            let batch = to_batch(chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }
}

impl Formatter for ParquetFormatter {
    fn write_observations<W: Write + Send>(
        &self,
        observations: &[Observation],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_batches(
            observations,
            Self::observation_schema(),
            Self::observations_to_batch,
            writer,
        )
    }

    fn write_bars<W: Write + Send>(&self, bars: &[Bar], writer: W) -> Result<(), FormatError> {
        self.write_batches(bars, Self::bar_schema(), Self::bars_to_batch, writer)
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::io::Cursor;

    fn observations() -> Vec<Observation> {
        vec![
            Observation::new(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap(), Some(3.95)),
            Observation::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), None),
        ]
    }

    #[test]
    fn test_parquet_observations() {
        let mut output = Cursor::new(Vec::new());
        ParquetFormatter::new()
            .write_observations(&observations(), &mut output)
            .unwrap();

        // Parquet files start with "PAR1" magic bytes
        let data = output.into_inner();
        assert!(data.len() > 4);
        assert_eq!(&data[0..4], b"PAR1");
    }

    #[test]
    fn test_observation_batch() {
        let batch = ParquetFormatter::observations_to_batch(&observations()).unwrap();
        assert_eq!(batch.num_rows(), 2);

        let dates = batch.column(0).as_any().downcast_ref::<Date32Array>().unwrap();
        assert_eq!(dates.value(0), 1);

        let values = batch.column(1).as_any().downcast_ref::<Float64Array>().unwrap();
        assert!(values.is_null(1));
    }

    #[test]
    fn test_parquet_bars() {
        let bar = Bar {
            close: Some(472.65),
            volume: Some(10),
            ..Bar::empty(Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap())
        };
        let mut output = Cursor::new(Vec::new());
        ParquetFormatter::new()
            .with_row_group_size(1)
            .write_bars(&[bar, bar], &mut output)
            .unwrap();
        assert_eq!(&output.into_inner()[0..4], b"PAR1");
    }

    #[test]
    fn test_bar_schema() {
        let schema = ParquetFormatter::bar_schema();
        assert_eq!(schema.fields().len(), 7);
        assert!(schema.field_with_name("adj_close").unwrap().is_nullable());
    }
}
