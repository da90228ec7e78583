//! Typed column access on record batches, plus Date32 conversion.

use arrow::array::{Array, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};

use crate::error::{Result, StoreError};

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Days since the Unix epoch, as stored in Arrow `Date32`.
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

/// Inverse of [`date_to_days`].
pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    days.checked_add(EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

fn column<'a, T: Array + 'static>(
    batch: &'a RecordBatch,
    name: &str,
    expected: &str,
) -> Result<&'a T> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| StoreError::Column {
            name: name.to_string(),
            reason: "missing".to_string(),
        })?;
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| StoreError::Column {
            name: name.to_string(),
            reason: format!("expected {expected}, found {}", batch.column(idx).data_type()),
        })
}

pub fn col_utf8<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    column::<StringArray>(batch, name, "Utf8")
}

pub fn col_date32<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Date32Array> {
    column::<Date32Array>(batch, name, "Date32")
}

pub fn col_f64<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array> {
    column::<Float64Array>(batch, name, "Float64")
}

pub fn col_i64<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int64Array> {
    column::<Int64Array>(batch, name, "Int64")
}
