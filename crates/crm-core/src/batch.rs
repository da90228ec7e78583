//! Conversion between joined rows and Arrow record batches.
//!
//! Flags are stored as `0`/`1` integers and dates as `Date32`, matching the
//! snapshot schema in `crm_store::schema`.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, Date32Array, Float64Array, Int64Array, StringArray,
};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crm_store::schema::*;
use crm_store::{
    col_date32, col_f64, col_i64, col_utf8, date_to_days, days_to_date, pipeline_schema,
    StoreError,
};

use crate::model::JoinedDeal;

fn utf8<'a>(rows: &'a [JoinedDeal], f: impl Fn(&'a JoinedDeal) -> Option<&'a str>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<StringArray>())
}

fn f64s(rows: &[JoinedDeal], f: impl Fn(&JoinedDeal) -> Option<f64>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<Float64Array>())
}

fn i64s(rows: &[JoinedDeal], f: impl Fn(&JoinedDeal) -> Option<i64>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<Int64Array>())
}

fn dates(rows: &[JoinedDeal], f: impl Fn(&JoinedDeal) -> Option<chrono::NaiveDate>) -> ArrayRef {
    Arc::new(
        rows.iter()
            .map(|r| f(r).map(date_to_days))
            .collect::<Date32Array>(),
    )
}

/// Encode joined rows as a single batch with the pipeline schema.
pub fn encode(rows: &[JoinedDeal]) -> Result<RecordBatch, ArrowError> {
    let columns: Vec<ArrayRef> = vec![
        utf8(rows, |r| r.opportunity_id.as_deref()),
        utf8(rows, |r| Some(r.sales_agent.as_str())),
        utf8(rows, |r| Some(r.product.as_str())),
        utf8(rows, |r| r.account.as_deref()),
        utf8(rows, |r| Some(r.deal_stage.as_str())),
        dates(rows, |r| r.engage_date),
        dates(rows, |r| r.close_date),
        f64s(rows, |r| r.close_value),
        i64s(rows, |r| r.deal_age),
        i64s(rows, |r| Some(i64::from(r.is_won))),
        i64s(rows, |r| Some(i64::from(r.is_lost))),
        utf8(rows, |r| r.sector.as_deref()),
        i64s(rows, |r| r.year_established),
        f64s(rows, |r| r.revenue),
        i64s(rows, |r| r.employees),
        utf8(rows, |r| r.office_location.as_deref()),
        utf8(rows, |r| r.subsidiary_of.as_deref()),
        utf8(rows, |r| r.manager.as_deref()),
        utf8(rows, |r| r.regional_office.as_deref()),
        utf8(rows, |r| r.series.as_deref()),
        f64s(rows, |r| r.sales_price),
    ];
    RecordBatch::try_new(pipeline_schema(), columns)
}

fn opt_str(arr: &StringArray, i: usize) -> Option<String> {
    (!arr.is_null(i)).then(|| arr.value(i).to_string())
}

fn req_str(arr: &StringArray, i: usize, name: &str) -> Result<String, StoreError> {
    opt_str(arr, i).ok_or_else(|| StoreError::Column {
        name: name.to_string(),
        reason: format!("null at row {i}"),
    })
}

fn opt_f64(arr: &Float64Array, i: usize) -> Option<f64> {
    (!arr.is_null(i)).then(|| arr.value(i))
}

fn opt_i64(arr: &Int64Array, i: usize) -> Option<i64> {
    (!arr.is_null(i)).then(|| arr.value(i))
}

fn opt_date(arr: &Date32Array, i: usize) -> Option<chrono::NaiveDate> {
    (!arr.is_null(i)).then(|| days_to_date(arr.value(i))).flatten()
}

fn flag(arr: &Int64Array, i: usize) -> bool {
    opt_i64(arr, i).is_some_and(|v| v != 0)
}

/// Decode a snapshot batch back into joined rows.
pub fn decode(batch: &RecordBatch) -> Result<Vec<JoinedDeal>, StoreError> {
    let opportunity_id = col_utf8(batch, OPPORTUNITY_ID)?;
    let sales_agent = col_utf8(batch, SALES_AGENT)?;
    let product = col_utf8(batch, PRODUCT)?;
    let account = col_utf8(batch, ACCOUNT)?;
    let deal_stage = col_utf8(batch, DEAL_STAGE)?;
    let engage_date = col_date32(batch, ENGAGE_DATE)?;
    let close_date = col_date32(batch, CLOSE_DATE)?;
    let close_value = col_f64(batch, CLOSE_VALUE)?;
    let deal_age = col_i64(batch, DEAL_AGE)?;
    let is_won = col_i64(batch, IS_WON)?;
    let is_lost = col_i64(batch, IS_LOST)?;
    let sector = col_utf8(batch, SECTOR)?;
    let year_established = col_i64(batch, YEAR_ESTABLISHED)?;
    let revenue = col_f64(batch, REVENUE)?;
    let employees = col_i64(batch, EMPLOYEES)?;
    let office_location = col_utf8(batch, OFFICE_LOCATION)?;
    let subsidiary_of = col_utf8(batch, SUBSIDIARY_OF)?;
    let manager = col_utf8(batch, MANAGER)?;
    let regional_office = col_utf8(batch, REGIONAL_OFFICE)?;
    let series = col_utf8(batch, SERIES)?;
    let sales_price = col_f64(batch, SALES_PRICE)?;

    (0..batch.num_rows())
        .map(|i| {
            Ok(JoinedDeal {
                opportunity_id: opt_str(opportunity_id, i),
                sales_agent: req_str(sales_agent, i, SALES_AGENT)?,
                product: req_str(product, i, PRODUCT)?,
                account: opt_str(account, i),
                deal_stage: req_str(deal_stage, i, DEAL_STAGE)?,
                engage_date: opt_date(engage_date, i),
                close_date: opt_date(close_date, i),
                close_value: opt_f64(close_value, i),
                deal_age: opt_i64(deal_age, i),
                is_won: flag(is_won, i),
                is_lost: flag(is_lost, i),
                sector: opt_str(sector, i),
                year_established: opt_i64(year_established, i),
                revenue: opt_f64(revenue, i),
                employees: opt_i64(employees, i),
                office_location: opt_str(office_location, i),
                subsidiary_of: opt_str(subsidiary_of, i),
                manager: opt_str(manager, i),
                regional_office: opt_str(regional_office, i),
                series: opt_str(series, i),
                sales_price: opt_f64(sales_price, i),
            })
        })
        .collect()
}
